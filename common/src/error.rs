//! エラー型定義

use thiserror::Error;

/// アップロード〜採点までのクライアント側エラー分類
///
/// どの種別も1回の試行で確定し、自動リトライはしない。
/// 表示は常に1件のみで、次のイベントで置き換わる
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("画像ファイルを選択してください（対応形式: JPEG, PNG など）")]
    InvalidFileType,

    #[error("ファイルが選択されていません")]
    NoFileSelected,

    #[error("サーバーに接続できません: {0}")]
    Unreachable(String),

    #[error("サーバーがエラーを返しました: {0}")]
    ServerReported(String),

    #[error("ファイルサイズが大きすぎます。小さい画像を選択してください")]
    FileTooLarge,

    #[error("予期しないサーバー応答: {0}")]
    Unexpected(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, UploadError>;
