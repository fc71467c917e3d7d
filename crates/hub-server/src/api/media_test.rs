use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use hub_core::ResourceType;
use serde_json::json;

use crate::api::test_support::{body_json, json_request, TestApp};

const BOUNDARY: &str = "hub-test-boundary";

fn multipart_request(token: Option<&str>, field: &str, mime: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; \
             filename=\"clip.bin\"\r\nContent-Type: {mime}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/api/media/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body)).expect("request")
}

#[tokio::test]
async fn video_upload_is_relayed_as_video_into_the_callers_folder() {
    let app = TestApp::new();
    let (user_id, token) = app.influencer();

    let response = app
        .send(multipart_request(Some(&token), "file", "video/mp4", b"frames"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["resource_type"], "video");
    assert_eq!(json["public_id"], format!("influencerhub/{user_id}/asset"));
    assert!(json["secure_url"].as_str().expect("url").starts_with("https://"));

    let uploads = app.media.uploads.lock().expect("uploads");
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].resource_type, ResourceType::Video);
    assert_eq!(uploads[0].folder, format!("influencerhub/{user_id}"));
    assert_eq!(&uploads[0].bytes[..], b"frames");
    assert_eq!(uploads[0].content_type.as_deref(), Some("video/mp4"));
}

#[tokio::test]
async fn image_upload_needs_identity_but_no_role() {
    let app = TestApp::new();
    let (_, token) = app.user_without_profile();

    let response = app
        .send(multipart_request(Some(&token), "file", "image/png", b"pixels"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["resource_type"], "image");
}

#[tokio::test]
async fn upload_without_token_is_unauthorized() {
    let app = TestApp::new();
    let response = app
        .send(multipart_request(None, "file", "image/png", b"pixels"))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(app.media.uploads.lock().expect("uploads").is_empty());
}

#[tokio::test]
async fn missing_file_field_is_rejected() {
    let app = TestApp::new();
    let (_, token) = app.brand();

    let response = app
        .send(multipart_request(Some(&token), "avatar", "image/png", b"pixels"))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "file is required");
}

#[tokio::test]
async fn non_multipart_body_is_rejected() {
    let app = TestApp::new();
    let (_, token) = app.brand();

    let response = app
        .send(json_request(
            Method::POST,
            "/api/media/upload",
            Some(&token),
            &json!({ "file": "nope" }),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn file_over_the_cap_is_too_large() {
    let app = TestApp::with_upload_limit(16);
    let (_, token) = app.brand();

    let response = app
        .send(multipart_request(Some(&token), "file", "image/png", &[7u8; 64]))
        .await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(app.media.uploads.lock().expect("uploads").is_empty());
}

#[tokio::test]
async fn provider_error_message_is_passed_through() {
    let app = TestApp::new();
    let (_, token) = app.brand();
    *app.media.fail_with.lock().expect("fail_with") = Some("Invalid image file".to_string());

    let response = app
        .send(multipart_request(Some(&token), "file", "image/png", b"pixels"))
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "Invalid image file");
}
