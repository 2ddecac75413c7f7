//! OmrClientの結合テスト
//!
//! axumでモックバックエンドを立てて /upload・/outputs・/docs の契約を検証する

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

use omr_scan_common::UploadError;
use omr_scan_rust::client::OmrClient;
use omr_scan_rust::error::OmrScanError;

const TIMEOUT: Duration = Duration::from_secs(5);

async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind失敗");
    let addr = listener.local_addr().expect("アドレス取得失敗");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve失敗");
    });
    format!("http://{addr}")
}

fn write_sample_image(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("exam.png");
    std::fs::write(&path, b"fake png bytes for upload").expect("書き込み失敗");
    path
}

fn upload_error(err: OmrScanError) -> UploadError {
    match err {
        OmrScanError::Upload(inner) => inner,
        other => panic!("想定外のエラー種別: {other}"),
    }
}

/// 正常系ハンドラ: multipartのフィールド名を検査しつつ固定の結果を返す
async fn upload_ok(
    State(hits): State<Arc<AtomicUsize>>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    hits.fetch_add(1, Ordering::SeqCst);

    let mut field_names = Vec::new();
    while let Some(field) = multipart.next_field().await.expect("multipart読み取り失敗") {
        field_names.push(field.name().unwrap_or_default().to_string());
        let _ = field.bytes().await.expect("フィールド読み取り失敗");
    }
    assert_eq!(field_names, vec!["image".to_string()]);

    Json(json!({
        "sheet_id": "0a1b2c",
        "version": "v1",
        "total_score": 85,
        "per_subject_scores": {"math": 18},
        "answers": {"Q1": "A", "Q2": ""},
        "confidences": {"Q1": 0.93},
        "paths": {
            "rectified": "outputs\\0a1b2c_rectified.png",
            "overlay": "outputs/0a1b2c_overlay.png"
        }
    }))
}

#[tokio::test]
async fn test_upload_passes_result_through() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/upload", post(upload_ok))
        .with_state(hits.clone());
    let base = spawn_backend(app).await;

    let dir = tempdir().expect("tempdir失敗");
    let image = write_sample_image(dir.path());

    let client = OmrClient::new(base, TIMEOUT).expect("クライアント生成失敗");
    let result = client.process_file(&image).await.expect("採点失敗");

    // レスポンスのフィールドは加工されずそのまま届く
    assert_eq!(result.sheet_id, "0a1b2c");
    assert_eq!(result.total_score, 85);
    assert_eq!(result.per_subject_scores["math"], 18);
    assert_eq!(result.answers["Q1"], "A");
    assert_eq!(result.answers["Q2"], "");
    assert_eq!(
        result.paths.rectified.as_deref(),
        Some("outputs\\0a1b2c_rectified.png")
    );
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_non_image_rejected_without_request() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/upload", post(upload_ok))
        .with_state(hits.clone());
    let base = spawn_backend(app).await;

    let dir = tempdir().expect("tempdir失敗");
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "not an image").expect("書き込み失敗");

    let client = OmrClient::new(base, TIMEOUT).expect("クライアント生成失敗");
    let err = client.process_file(&path).await.unwrap_err();

    assert!(matches!(
        upload_error(err),
        UploadError::InvalidFileType
    ));
    // ネットワークへは一切出ない
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_file() {
    let client = OmrClient::new("http://127.0.0.1:8000", TIMEOUT).expect("クライアント生成失敗");
    let err = client
        .process_file(std::path::Path::new("/nonexistent/exam.png"))
        .await
        .unwrap_err();
    assert!(matches!(err, OmrScanError::FileNotFound(_)));
}

#[tokio::test]
async fn test_server_error_field() {
    // 2xx + ボディの error フィールド
    let app = Router::new().route(
        "/upload",
        post(|_: Multipart| async { Json(json!({"error": "invalid image"})) }),
    );
    let base = spawn_backend(app).await;

    let dir = tempdir().expect("tempdir失敗");
    let image = write_sample_image(dir.path());

    let client = OmrClient::new(base, TIMEOUT).expect("クライアント生成失敗");
    let err = client.process_file(&image).await.unwrap_err();

    assert!(matches!(
        upload_error(err),
        UploadError::ServerReported(message) if message == "invalid image"
    ));
}

#[tokio::test]
async fn test_http_413_maps_to_file_too_large() {
    let app = Router::new().route(
        "/upload",
        post(|| async { StatusCode::PAYLOAD_TOO_LARGE }),
    );
    let base = spawn_backend(app).await;

    let dir = tempdir().expect("tempdir失敗");
    let image = write_sample_image(dir.path());

    let client = OmrClient::new(base, TIMEOUT).expect("クライアント生成失敗");
    let err = client.process_file(&image).await.unwrap_err();

    let message = format!("{err}");
    assert!(matches!(upload_error(err), UploadError::FileTooLarge));
    assert!(message.contains("大きすぎます"));
}

#[tokio::test]
async fn test_plain_500_is_unexpected() {
    let app = Router::new().route(
        "/upload",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base = spawn_backend(app).await;

    let dir = tempdir().expect("tempdir失敗");
    let image = write_sample_image(dir.path());

    let client = OmrClient::new(base, TIMEOUT).expect("クライアント生成失敗");
    let err = client.process_file(&image).await.unwrap_err();

    assert!(matches!(
        upload_error(err),
        UploadError::Unexpected(message) if message.contains("500")
    ));
}

#[tokio::test]
async fn test_malformed_body_is_unexpected() {
    let app = Router::new().route("/upload", post(|| async { "definitely not json" }));
    let base = spawn_backend(app).await;

    let dir = tempdir().expect("tempdir失敗");
    let image = write_sample_image(dir.path());

    let client = OmrClient::new(base, TIMEOUT).expect("クライアント生成失敗");
    let err = client.process_file(&image).await.unwrap_err();

    assert!(matches!(upload_error(err), UploadError::Unexpected(_)));
}

#[tokio::test]
async fn test_connection_refused_is_unreachable() {
    // 一度bindして即closeしたポートへ接続する
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind失敗");
    let addr = listener.local_addr().expect("アドレス取得失敗");
    drop(listener);

    let dir = tempdir().expect("tempdir失敗");
    let image = write_sample_image(dir.path());

    let client = OmrClient::new(format!("http://{addr}"), TIMEOUT).expect("クライアント生成失敗");
    let err = client.process_file(&image).await.unwrap_err();

    assert!(matches!(upload_error(err), UploadError::Unreachable(_)));
}

#[tokio::test]
async fn test_health_check() {
    let app = Router::new().route("/docs", get(|| async { "Swagger UI" }));
    let base = spawn_backend(app).await;

    let client = OmrClient::new(base, TIMEOUT).expect("クライアント生成失敗");
    assert!(client.health_check().await);

    // /docs が無い（404）なら到達不能扱い
    let app = Router::new().route("/upload", post(|| async { StatusCode::OK }));
    let base = spawn_backend(app).await;
    let client = OmrClient::new(base, TIMEOUT).expect("クライアント生成失敗");
    assert!(!client.health_check().await);
}

#[tokio::test]
async fn test_fetch_output_normalizes_filename() {
    let app = Router::new().route(
        "/outputs/:name",
        get(|Path(name): Path<String>| async move {
            assert_eq!(name, "0a1b2c_rectified.png");
            (StatusCode::OK, b"image bytes".to_vec())
        }),
    );
    let base = spawn_backend(app).await;

    let dir = tempdir().expect("tempdir失敗");
    let client = OmrClient::new(base, TIMEOUT).expect("クライアント生成失敗");

    // Windows式のサーバパスでもファイル名だけで取得する
    let dest = client
        .fetch_output(r"C:\out\0a1b2c_rectified.png", dir.path())
        .await
        .expect("ダウンロード失敗");

    assert_eq!(
        dest.file_name().and_then(|n| n.to_str()),
        Some("0a1b2c_rectified.png")
    );
    assert_eq!(std::fs::read(&dest).expect("読み込み失敗"), b"image bytes");
}

#[tokio::test]
async fn test_fetch_output_404() {
    let app = Router::new();
    let base = spawn_backend(app).await;

    let dir = tempdir().expect("tempdir失敗");
    let client = OmrClient::new(base, TIMEOUT).expect("クライアント生成失敗");
    let err = client
        .fetch_output("outputs/missing.png", dir.path())
        .await
        .unwrap_err();

    assert!(matches!(err, OmrScanError::OutputFetch(_)));
}
