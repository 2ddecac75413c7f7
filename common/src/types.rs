//! 採点結果の型定義
//!
//! バックエンドの /upload レスポンスをそのまま保持する:
//! - ScanResult: 採点結果（合計点・科目別・解答・出力画像パス）
//! - FileMeta: 選択中ファイルの表示用メタデータ

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 選択中ファイルの表示用メタデータ
///
/// 画像本体のバイト列は保持しない。実体はブラウザのFileハンドル、
/// またはディスク上のパスが所有する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    pub name: String,
    pub size: u64,
    pub mime: String,
}

impl FileMeta {
    pub fn new(name: impl Into<String>, size: u64, mime: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            mime: mime.into(),
        }
    }

    /// MIMEタイプが画像を示すか
    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }
}

/// 出力画像のサーバ側パス
///
/// バックエンドのOS依存でパス区切りが混在する（例: "outputs\\x_rectified.png"）。
/// 表示前に paths::output_filename で正規化すること
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputPaths {
    pub rectified: Option<String>,
    pub overlay: Option<String>,
}

/// 採点結果
///
/// バックエンドのレスポンスを加工せずに保持する。answers の空文字は未回答
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanResult {
    pub sheet_id: String,
    pub version: String,
    pub total_score: i64,
    pub per_subject_scores: BTreeMap<String, i64>,
    pub answers: BTreeMap<String, String>,
    pub confidences: BTreeMap<String, f64>,
    pub paths: OutputPaths,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_meta_is_image() {
        assert!(FileMeta::new("exam.png", 2048, "image/png").is_image());
        assert!(FileMeta::new("photo.jpeg", 100, "image/jpeg").is_image());
        assert!(!FileMeta::new("notes.txt", 10, "text/plain").is_image());
        assert!(!FileMeta::new("sheet.pdf", 10, "application/pdf").is_image());
    }

    #[test]
    fn test_scan_result_default() {
        let result = ScanResult::default();
        assert_eq!(result.total_score, 0);
        assert!(result.per_subject_scores.is_empty());
        assert!(result.answers.is_empty());
        assert!(result.paths.rectified.is_none());
    }

    #[test]
    fn test_scan_result_deserialize() {
        let json = r#"{
            "sheet_id": "0a1b2c",
            "version": "v1",
            "total_score": 85,
            "per_subject_scores": {"math": 18, "physics": 15},
            "answers": {"Q1": "A", "Q2": ""},
            "confidences": {"Q1": 0.93},
            "paths": {"rectified": "outputs\\0a1b2c_rectified.png"}
        }"#;

        let result: ScanResult = serde_json::from_str(json).expect("デシリアライズ失敗");
        assert_eq!(result.total_score, 85);
        assert_eq!(result.per_subject_scores["math"], 18);
        assert_eq!(result.answers["Q2"], "");
        assert_eq!(
            result.paths.rectified.as_deref(),
            Some("outputs\\0a1b2c_rectified.png")
        );
        assert!(result.paths.overlay.is_none());
    }

    #[test]
    fn test_scan_result_deserialize_minimal() {
        // フィールド欠けはすべてデフォルトで埋まる
        let result: ScanResult =
            serde_json::from_str(r#"{"total_score": 42}"#).expect("デシリアライズ失敗");
        assert_eq!(result.total_score, 42);
        assert_eq!(result.sheet_id, "");
        assert!(result.confidences.is_empty());
    }

    #[test]
    fn test_scan_result_roundtrip_preserves_fields() {
        let mut result = ScanResult {
            sheet_id: "abc".into(),
            total_score: 60,
            ..Default::default()
        };
        result.answers.insert("Q1".into(), "C".into());

        let json = serde_json::to_string(&result).expect("シリアライズ失敗");
        let back: ScanResult = serde_json::from_str(&json).expect("デシリアライズ失敗");
        assert_eq!(back, result);
    }
}
