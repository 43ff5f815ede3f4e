mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::TestApp;
use recipe_api::test_utils::test_helpers;
use serde_json::{json, Value};

const BOUNDARY: &str = "X-RECIPE-BOUNDARY";

/// 1x1 transparent PNG.
const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

fn upload_url(id: i64) -> String {
    format!("/api/recipe/recipes/{}/upload-image/", id)
}

fn multipart_body(field: &str, filename: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

async fn upload(app: &TestApp, token: &str, recipe_id: i64, body: Vec<u8>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(upload_url(recipe_id))
        .header(header::AUTHORIZATION, format!("Token {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap();
    app.send(request).await
}

fn stored_path(image_url: &str) -> String {
    image_url
        .strip_prefix("/media/")
        .unwrap_or_else(|| panic!("unexpected image url {}", image_url))
        .to_string()
}

#[tokio::test]
async fn test_upload_image_to_recipe() {
    let app = TestApp::new().await;
    let (user_id, token) = app.user("user@example.com").await;
    let recipe_id = test_helpers::create_test_recipe(&app.pool, user_id, "Photo Food")
        .await
        .unwrap();

    let (status, body) = upload(
        &app,
        &token,
        recipe_id,
        multipart_body("image", "photo.PNG", "image/png", PNG_BYTES),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "unexpected body: {}", body);
    assert_eq!(body["id"], recipe_id);
    let image = body["image"].as_str().unwrap();
    assert!(image.starts_with("/media/uploads/recipe/"));
    assert!(image.ends_with(".png"));
    assert!(app.media.path().join(stored_path(image)).is_file());

    // Detail view reports the same image
    let (_, detail) = app
        .get(&format!("/api/recipe/recipes/{}/", recipe_id), Some(&token))
        .await;
    assert_eq!(detail["image"], image);
}

#[tokio::test]
async fn test_uploaded_image_is_served() {
    let app = TestApp::new().await;
    let (user_id, token) = app.user("user@example.com").await;
    let recipe_id = test_helpers::create_test_recipe(&app.pool, user_id, "Served")
        .await
        .unwrap();

    let (_, body) = upload(
        &app,
        &token,
        recipe_id,
        multipart_body("image", "photo.png", "image/png", PNG_BYTES),
    )
    .await;
    let image = body["image"].as_str().unwrap();

    let response = tower::ServiceExt::oneshot(
        app.router.clone(),
        Request::builder().uri(image).body(Body::empty()).unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], PNG_BYTES);
}

#[tokio::test]
async fn test_upload_image_bad_request() {
    let app = TestApp::new().await;
    let (user_id, token) = app.user("user@example.com").await;
    let recipe_id = test_helpers::create_test_recipe(&app.pool, user_id, "Not An Image")
        .await
        .unwrap();

    let (status, body) = upload(
        &app,
        &token,
        recipe_id,
        multipart_body("image", "notimage.png", "image/png", b"notimage"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("image").is_some());

    let (_, detail) = app
        .get(&format!("/api/recipe/recipes/{}/", recipe_id), Some(&token))
        .await;
    assert_eq!(detail["image"], Value::Null);
}

#[tokio::test]
async fn test_upload_without_image_field() {
    let app = TestApp::new().await;
    let (user_id, token) = app.user("user@example.com").await;
    let recipe_id = test_helpers::create_test_recipe(&app.pool, user_id, "No Field")
        .await
        .unwrap();

    let (status, body) = upload(
        &app,
        &token,
        recipe_id,
        multipart_body("photo", "photo.png", "image/png", PNG_BYTES),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["image"][0], "No file was submitted.");
}

#[tokio::test]
async fn test_upload_with_json_body_is_bad_request() {
    let app = TestApp::new().await;
    let (user_id, token) = app.user("user@example.com").await;
    let recipe_id = test_helpers::create_test_recipe(&app.pool, user_id, "Wrong Encoding")
        .await
        .unwrap();

    let (status, body) = app
        .post(&upload_url(recipe_id), Some(&token), json!({"image": "photo.png"}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.is_object());
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_upload_to_other_users_recipe_is_not_found() {
    let app = TestApp::new().await;
    let (_, token) = app.user("user@example.com").await;
    let (other_id, _) = app.user("other@example.com").await;
    let recipe_id = test_helpers::create_test_recipe(&app.pool, other_id, "Someone Else's")
        .await
        .unwrap();

    let (status, _) = upload(
        &app,
        &token,
        recipe_id,
        multipart_body("image", "photo.png", "image/png", PNG_BYTES),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_replacing_image_removes_previous_file() {
    let app = TestApp::new().await;
    let (user_id, token) = app.user("user@example.com").await;
    let recipe_id = test_helpers::create_test_recipe(&app.pool, user_id, "Twice")
        .await
        .unwrap();

    let (_, first) = upload(
        &app,
        &token,
        recipe_id,
        multipart_body("image", "first.png", "image/png", PNG_BYTES),
    )
    .await;
    let (_, second) = upload(
        &app,
        &token,
        recipe_id,
        multipart_body("image", "second.png", "image/png", PNG_BYTES),
    )
    .await;

    let first_path = stored_path(first["image"].as_str().unwrap());
    let second_path = stored_path(second["image"].as_str().unwrap());
    assert_ne!(first_path, second_path);
    assert!(!app.media.path().join(first_path).exists());
    assert!(app.media.path().join(second_path).is_file());
}

#[tokio::test]
async fn test_deleting_recipe_removes_image() {
    let app = TestApp::new().await;
    let (user_id, token) = app.user("user@example.com").await;
    let recipe_id = test_helpers::create_test_recipe(&app.pool, user_id, "Short Lived")
        .await
        .unwrap();

    let (_, body) = upload(
        &app,
        &token,
        recipe_id,
        multipart_body("image", "photo.png", "image/png", PNG_BYTES),
    )
    .await;
    let path = stored_path(body["image"].as_str().unwrap());

    let (status, _) = app
        .delete(&format!("/api/recipe/recipes/{}/", recipe_id), Some(&token))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(!app.media.path().join(path).exists());
}
