//! omr-scan-rust
//!
//! OMRシート採点サービスのクライアント。画像をアップロードし、
//! 採点結果（合計点・科目別・検出解答）と処理済み画像を表示・保存する

pub mod cli;
pub mod client;
pub mod config;
pub mod display;
pub mod error;
