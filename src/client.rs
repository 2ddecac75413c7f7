//! OMRバックエンドへのHTTPクライアント
//!
//! 契約:
//! - POST {base}/upload  multipart（フィールド名 "image"）→ ScanResult JSON
//! - GET  {base}/outputs/{filename} → 処理済み画像
//! - GET  {base}/docs → 200 なら到達可能
//!
//! エラーはすべて UploadError の分類へ写し、リトライはしない

use crate::error::{OmrScanError, Result};
use omr_scan_common::{output_filename, ScanResult, UploadError};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 2xxでもボディの error フィールドで失敗を返すことがある
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
    error: Option<String>,
}

pub struct OmrClient {
    base_url: String,
    client: reqwest::Client,
}

impl OmrClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url: String = base_url.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OmrScanError::Config(format!("HTTPクライアント初期化失敗: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 画像ファイルを検証してアップロードし、採点結果を返す
    ///
    /// 画像以外のファイルはリクエストを出さずに弾く
    pub async fn process_file(&self, path: &Path) -> Result<ScanResult> {
        if !path.exists() {
            return Err(OmrScanError::FileNotFound(path.display().to_string()));
        }

        let mime = mime_guess::from_path(path).first_or_octet_stream();
        if mime.type_() != mime_guess::mime::IMAGE {
            return Err(UploadError::InvalidFileType.into());
        }

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.png")
            .to_string();
        let bytes = tokio::fs::read(path).await?;

        self.process_bytes(file_name, mime.as_ref(), bytes).await
    }

    /// 画像バイト列をアップロードする（multipartフィールド名は "image" 固定）
    pub async fn process_bytes(
        &self,
        file_name: String,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<ScanResult> {
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime)
            .map_err(|e| UploadError::Unexpected(e.to_string()))?;
        let form = Form::new().part("image", part);

        let response = self
            .client
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_send_error)?;

        // ステータスに関わらず、構造化された error フィールドを優先して表示する
        if let Ok(ErrorBody {
            error: Some(message),
        }) = serde_json::from_str::<ErrorBody>(&body)
        {
            return Err(UploadError::ServerReported(message).into());
        }

        if status == StatusCode::PAYLOAD_TOO_LARGE {
            return Err(UploadError::FileTooLarge.into());
        }
        if !status.is_success() {
            return Err(UploadError::Unexpected(format!("HTTP {status}")).into());
        }

        serde_json::from_str::<ScanResult>(&body)
            .map_err(|e| UploadError::Unexpected(format!("不正なレスポンス: {e}")).into())
    }

    /// GET /docs が200を返せば到達可能とみなす
    pub async fn health_check(&self) -> bool {
        match self
            .client
            .get(format!("{}/docs", self.base_url))
            .send()
            .await
        {
            Ok(response) => response.status() == StatusCode::OK,
            Err(_) => false,
        }
    }

    /// 処理済み画像を dir にダウンロードして保存先パスを返す
    ///
    /// server_path はサーバOS依存の区切りのままで良い
    pub async fn fetch_output(&self, server_path: &str, dir: &Path) -> Result<PathBuf> {
        let Some(name) = output_filename(server_path) else {
            return Err(OmrScanError::OutputFetch(format!(
                "不正な出力パス: {server_path}"
            )));
        };

        let url = format!("{}/outputs/{}", self.base_url, name);
        let response = self.client.get(&url).send().await.map_err(map_send_error)?;
        if !response.status().is_success() {
            return Err(OmrScanError::OutputFetch(format!(
                "HTTP {} ({url})",
                response.status()
            )));
        }

        let bytes = response.bytes().await.map_err(map_send_error)?;
        tokio::fs::create_dir_all(dir).await?;
        let dest = dir.join(name);
        tokio::fs::write(&dest, &bytes).await?;
        Ok(dest)
    }
}

/// reqwestのエラーを分類へ写す
fn map_send_error(err: reqwest::Error) -> OmrScanError {
    if err.is_timeout() || err.is_connect() {
        UploadError::Unreachable(err.to_string()).into()
    } else {
        UploadError::Unexpected(err.to_string()).into()
    }
}
