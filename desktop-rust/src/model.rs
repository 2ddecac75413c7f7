use omr_scan_common::UploadSession;
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub session: UploadSession,
    pub selected_path: Option<PathBuf>,
}
