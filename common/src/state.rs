//! アップロードセッションの状態遷移
//!
//! Idle → FileSelected → Processing → Succeeded/Failed の状態機械。
//! 遷移は (状態, イベント) の純関数なので、描画レイヤなしで
//! 単体テストできる。各UIは apply() の結果を表示するだけ

use crate::error::UploadError;
use crate::types::{FileMeta, ScanResult};

/// 処理フェーズ（常にどれか1つだけ）
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Phase {
    #[default]
    Idle,
    FileSelected,
    Processing,
    Succeeded(ScanResult),
    Failed(String),
}

/// 状態機械へのイベント
#[derive(Debug, Clone)]
pub enum UploadEvent {
    FileChosen(FileMeta),
    FileRemoved,
    ProcessRequested,
    ProcessSucceeded(ScanResult),
    ProcessFailed(String),
}

/// アップロードセッション
///
/// 選択中ファイルのメタデータと処理フェーズを所有する。
/// 更新は apply() 経由のみ
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadSession {
    pub file: Option<FileMeta>,
    pub phase: Phase,
}

impl UploadSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// イベントを適用して次の状態を返す
    pub fn apply(self, event: UploadEvent) -> UploadSession {
        match event {
            UploadEvent::FileChosen(meta) => {
                if !meta.is_image() {
                    // 選択中ファイルは変更しない
                    return UploadSession {
                        phase: Phase::Failed(UploadError::InvalidFileType.to_string()),
                        ..self
                    };
                }
                UploadSession {
                    file: Some(meta),
                    phase: Phase::FileSelected,
                }
            }

            UploadEvent::FileRemoved => {
                // 処理中の取り消しは未対応
                if self.phase == Phase::Processing {
                    return self;
                }
                UploadSession::default()
            }

            UploadEvent::ProcessRequested => {
                // 多重送信ガード: 処理中の再要求は無視
                if self.phase == Phase::Processing {
                    return self;
                }
                if self.file.is_none() {
                    return UploadSession {
                        phase: Phase::Failed(UploadError::NoFileSelected.to_string()),
                        ..self
                    };
                }
                UploadSession {
                    phase: Phase::Processing,
                    ..self
                }
            }

            UploadEvent::ProcessSucceeded(result) => {
                // 処理中以外への結果到着は破棄
                if self.phase != Phase::Processing {
                    return self;
                }
                UploadSession {
                    phase: Phase::Succeeded(result),
                    ..self
                }
            }

            UploadEvent::ProcessFailed(message) => {
                if self.phase != Phase::Processing {
                    return self;
                }
                UploadSession {
                    phase: Phase::Failed(message),
                    ..self
                }
            }
        }
    }

    /// process要求を受け付けられる状態か
    pub fn can_process(&self) -> bool {
        self.file.is_some() && self.phase != Phase::Processing
    }

    pub fn is_processing(&self) -> bool {
        self.phase == Phase::Processing
    }

    /// 表示中のエラーメッセージ（常に1件以下）
    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&ScanResult> {
        match &self.phase {
            Phase::Succeeded(result) => Some(result),
            _ => None,
        }
    }
}
