use std::io::Cursor;

use axum::body::Body;
use axum::http::{Request, header};
use tower::ServiceExt as _;

use super::*;

const BOUNDARY: &str = "bongocat-test-boundary";

fn public_dir(label: &str) -> PathBuf {
    let dir =
        std::env::temp_dir().join(format!("bongocat-server-{label}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn app(dir: &Path) -> (Router, Arc<ProcessingStats>) {
    let stats = Arc::new(ProcessingStats::new());
    let cfg = ServerConfig::new(SocketAddr::from(([127, 0, 0, 1], 0)), dir);
    (router(cfg, stats.clone()), stats)
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([0, 128, 255, 255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

fn multipart_request(field: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"cat.png\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/bongo-cat/process-photo")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, value)
}

fn generated_files(dir: &Path) -> usize {
    std::fs::read_dir(dir.join(GENERATED_DIR))
        .map(|rd| rd.count())
        .unwrap_or(0)
}

#[tokio::test]
async fn index_lists_endpoints() {
    let dir = public_dir("index");
    let (app, _) = app(&dir);
    let (status, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    let endpoints = body["endpoints"].as_array().unwrap();
    assert!(endpoints.iter().any(|e| e == "/bongo-cat/process-photo"));
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let dir = public_dir("404");
    let (app, _) = app(&dir);
    let (status, body) = send(&app, get("/nope/nothing-here")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn missing_ui_is_404() {
    let dir = public_dir("ui");
    let (app, _) = app(&dir);
    let (status, body) = send(&app, get("/ui")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "UI not found");
}

#[tokio::test]
async fn upload_produces_gif_and_counts_it() {
    let dir = public_dir("upload");
    let (app, stats) = app(&dir);

    let (status, body) = send(&app, multipart_request("photo", "image/png", &png(64, 48))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true);

    let url = body["gifUrl"].as_str().unwrap();
    assert!(url.starts_with("/generated/bongo-cat-"));
    assert!(url.ends_with(".gif"));
    let on_disk = std::fs::read(dir.join(url.trim_start_matches('/'))).unwrap();
    assert!(on_disk.starts_with(b"GIF89a"));
    assert_eq!(stats.processed_images(), 1);

    let (_, snapshot) = send(&app, get("/bongo-cat/stats")).await;
    assert_eq!(snapshot["bongoCat"]["processedImages"], 1);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn generated_gif_is_served_statically() {
    let dir = public_dir("static");
    let (app, _) = app(&dir);
    let (_, body) = send(&app, multipart_request("photo", "image/png", &png(32, 32))).await;
    let url = body["gifUrl"].as_str().unwrap().to_owned();

    let resp = app.clone().oneshot(get(&url)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.starts_with(b"GIF89a"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn non_image_upload_is_rejected() {
    let dir = public_dir("mime");
    let (app, stats) = app(&dir);
    let (status, body) = send(&app, multipart_request("photo", "text/plain", b"hello")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Only image files are allowed!");
    assert_eq!(stats.processed_images(), 0);
}

#[tokio::test]
async fn missing_photo_field_is_rejected() {
    let dir = public_dir("nofield");
    let (app, _) = app(&dir);
    let (status, body) = send(&app, multipart_request("avatar", "image/png", &png(20, 20))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No photo uploaded");
}

#[tokio::test]
async fn too_small_image_is_a_client_error_without_output() {
    let dir = public_dir("small");
    let (app, stats) = app(&dir);
    let (status, body) = send(&app, multipart_request("photo", "image/png", &png(5, 5))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().contains("image too small"));
    assert_eq!(generated_files(&dir), 0);
    assert_eq!(stats.processed_images(), 0);
}

#[tokio::test]
async fn undecodable_image_is_a_client_error() {
    let dir = public_dir("garbage");
    let (app, _) = app(&dir);
    let (status, _) = send(&app, multipart_request("photo", "image/png", b"not a png")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(generated_files(&dir), 0);
}

#[test]
fn gif_names_are_unique() {
    let a = unique_gif_name();
    let b = unique_gif_name();
    assert_ne!(a, b);
    assert!(a.starts_with("bongo-cat-") && a.ends_with(".gif"));
}
