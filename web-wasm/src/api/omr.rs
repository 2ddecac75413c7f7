//! OMRバックエンド連携
//!
//! 契約:
//! - POST {API_BASE_URL}/upload  multipart（フィールド名 "image"）→ 採点結果JSON
//! - GET  {API_BASE_URL}/outputs/{filename}  処理済み画像
//! - GET  {API_BASE_URL}/docs  ヘルスチェック（200なら稼働中）

use omr_scan_common::{output_url, ScanResult, UploadError};
use serde::Deserialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FormData, Request, RequestInit, RequestMode, Response};

/// バックエンドURL（FastAPI開発サーバ）
pub const API_BASE_URL: &str = "http://127.0.0.1:8000";

/// 2xxでもボディの error フィールドで失敗を返すことがある
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
    error: Option<String>,
}

/// 選択された画像をアップロードして採点結果を受け取る
///
/// 失敗は表示用メッセージ1つに集約する（自動リトライなし）
pub async fn process_omr_image(file: &File) -> Result<ScanResult, String> {
    let form = FormData::new().map_err(js_error)?;
    form.append_with_blob("image", file).map_err(js_error)?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    // Content-Typeはブラウザがboundary付きで設定する
    opts.set_body(form.as_ref());

    let url = format!("{}/upload", API_BASE_URL);
    let request = Request::new_with_str_and_init(&url, &opts).map_err(js_error)?;

    let window = web_sys::window().ok_or_else(|| "windowが取得できません".to_string())?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|err| {
            web_sys::console::error_1(&err);
            UploadError::Unreachable("fetchに失敗しました".into()).to_string()
        })?;
    let resp: Response = resp_value.dyn_into().map_err(js_error)?;

    let status = resp.status();
    if status == 413 {
        return Err(UploadError::FileTooLarge.to_string());
    }

    let json_value = match resp.json() {
        Ok(promise) => JsFuture::from(promise).await.ok(),
        Err(_) => None,
    };

    // ステータスに関わらず、構造化された error フィールドを優先して表示する
    if let Some(value) = &json_value {
        let body: ErrorBody = serde_wasm_bindgen::from_value(value.clone()).unwrap_or_default();
        if let Some(message) = body.error {
            return Err(UploadError::ServerReported(message).to_string());
        }
    }

    if !resp.ok() {
        return Err(UploadError::Unexpected(format!("HTTP {status}")).to_string());
    }

    let Some(value) = json_value else {
        return Err(UploadError::Unexpected("ボディがJSONではありません".into()).to_string());
    };
    serde_wasm_bindgen::from_value::<ScanResult>(value)
        .map_err(|e| UploadError::Unexpected(format!("不正なレスポンス: {e}")).to_string())
}

/// バックエンドが稼働しているか（GET /docs が200）
pub async fn check_server_health() -> bool {
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let url = format!("{}/docs", API_BASE_URL);
    let Ok(request) = Request::new_with_str_and_init(&url, &opts) else {
        return false;
    };
    let Some(window) = web_sys::window() else {
        return false;
    };

    match JsFuture::from(window.fetch_with_request(&request)).await {
        Ok(value) => value
            .dyn_into::<Response>()
            .map(|resp| resp.status() == 200)
            .unwrap_or(false),
        Err(err) => {
            web_sys::console::error_1(&err);
            false
        }
    }
}

/// 出力画像の表示URL（サーバ側パスをファイル名へ正規化して結合）
pub fn output_image_url(server_path: &str) -> Option<String> {
    output_url(API_BASE_URL, server_path)
}

fn js_error(value: JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| "JavaScriptエラー".to_string())
}
