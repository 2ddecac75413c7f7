use omr_scan_common::UploadError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OmrScanError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("{0}")]
    Upload(#[from] UploadError),

    #[error("出力画像の取得に失敗: {0}")]
    OutputFetch(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OmrScanError>;
