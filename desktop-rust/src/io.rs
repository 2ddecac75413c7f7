use anyhow::{Context, Result};
use omr_scan_common::ScanResult;
use std::path::{Path, PathBuf};

/// Parse the CLI's `process --json` stdout.
pub fn parse_scan_output(stdout: &[u8]) -> Result<ScanResult> {
    let text = String::from_utf8_lossy(stdout);
    serde_json::from_str(text.trim()).context("parse scan result json")
}

/// Where the CLI drops the rectified/overlay images for display.
pub fn outputs_dir() -> PathBuf {
    std::env::temp_dir().join("omr-scan-outputs")
}

const IMAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("webp", "image/webp"),
];

/// MIME type for a picked file, by extension. Unknown extensions get a
/// non-image type so the session rejects them.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let Some(ext) = ext else {
        return "application/octet-stream";
    };
    IMAGE_EXTENSIONS
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
        .unwrap_or("application/octet-stream")
}
