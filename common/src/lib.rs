//! OMR Scan Common Library
//!
//! CLI・デスクトップ・Web(WASM)で共有される型と状態管理

pub mod error;
pub mod format;
pub mod paths;
pub mod state;
pub mod types;

pub use error::{Result, UploadError};
pub use format::{
    answer_label, format_file_size, sorted_question_ids, subject_label, SUBJECT_FULL_SCORE,
    UNANSWERED_LABEL,
};
pub use paths::{output_filename, output_url};
pub use state::{Phase, UploadEvent, UploadSession};
pub use types::{FileMeta, OutputPaths, ScanResult};
