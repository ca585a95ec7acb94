//! End-to-end tests for the HTTP surface: register/login, upload/stream,
//! likes, comments, and delete authorization.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use tower::ServiceExt;
use vidbin::config::Config;

const BOUNDARY: &str = "vidbin-test-boundary";

async fn spawn_app() -> Router {
    let unique = uuid::Uuid::new_v4();
    let db_path = std::env::temp_dir().join(format!("vidbin-test-{unique}.db"));
    let upload_path = std::env::temp_dir().join(format!("vidbin-test-uploads-{unique}"));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.storage.upload_path = upload_path.display().to_string();
    // keep test passwords fast to hash
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    let state = vidbin::api::create_app_state_from_config(config)
        .await
        .expect("failed to create app state");
    vidbin::api::router(state).await
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn bare_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn multipart_body(title: &str, description: &str, filename: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in [("title", title), ("description", description)] {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: video/mp4\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(token: &str, title: &str, description: &str, bytes: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(multipart_body(
            title,
            description,
            "clip.mp4",
            bytes,
        )))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

async fn register(app: &Router, username: &str) {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/register",
            None,
            serde_json::json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "password": "correct-horse"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

async fn login(app: &Router, username: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/login",
            None,
            serde_json::json!({ "username": username, "password": "correct-horse" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    body["data"]["access_token"].as_str().unwrap().to_string()
}

async fn upload(app: &Router, token: &str, title: &str) -> i64 {
    let response = app
        .clone()
        .oneshot(upload_request(token, title, "a test clip", b"fake video bytes"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_register_duplicate_username_conflicts() {
    let app = spawn_app().await;

    register(&app, "alice").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/register",
            None,
            serde_json::json!({
                "username": "alice",
                "email": "other@example.com",
                "password": "correct-horse"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_rejects_bad_input() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/register",
            None,
            serde_json::json!({ "username": "", "email": "a@b.c", "password": "correct-horse" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/register",
            None,
            serde_json::json!({ "username": "bob", "email": "a@b.c", "password": "short" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let app = spawn_app().await;

    register(&app, "alice").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/login",
            None,
            serde_json::json!({ "username": "alice", "password": "wrong-password" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // unknown user looks the same as a wrong password
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/login",
            None,
            serde_json::json!({ "username": "nobody", "password": "wrong-password" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = login(&app, "alice").await;
    assert_eq!(token.len(), 64);
}

#[tokio::test]
async fn test_upload_requires_auth() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(upload_request("garbage-token", "My Clip", "desc", b"bytes"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_upload_then_list_shows_video() {
    let app = spawn_app().await;

    register(&app, "alice").await;
    let token = login(&app, "alice").await;

    let id = upload(&app, &token, "My First Clip").await;

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/videos", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let videos = body["data"].as_array().unwrap();
    let entry = videos
        .iter()
        .find(|v| v["id"].as_i64() == Some(id))
        .expect("uploaded video should be listed");

    assert_eq!(entry["title"], "My First Clip");
    assert_eq!(entry["uploader"], "alice");
    assert_eq!(entry["likes"], 0);
}

#[tokio::test]
async fn test_upload_rejects_empty_fields() {
    let app = spawn_app().await;

    register(&app, "alice").await;
    let token = login(&app, "alice").await;

    let response = app
        .clone()
        .oneshot(upload_request(&token, "  ", "desc", b"bytes"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(upload_request(&token, "Title", "desc", b""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_stream_returns_file_bytes() {
    let app = spawn_app().await;

    register(&app, "alice").await;
    let token = login(&app, "alice").await;
    let id = upload(&app, &token, "Streamable").await;

    let response = app
        .clone()
        .oneshot(bare_request("GET", &format!("/video/{id}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"fake video bytes");

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/video/99999", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_like_toggle_roundtrip() {
    let app = spawn_app().await;

    register(&app, "alice").await;
    let token = login(&app, "alice").await;
    let id = upload(&app, &token, "Likeable").await;

    let response = app
        .clone()
        .oneshot(bare_request("POST", &format!("/like/{id}"), Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["likes"], 1);
    assert_eq!(body["data"]["liked"], true);

    let response = app
        .clone()
        .oneshot(bare_request("POST", &format!("/liked/{id}"), Some(&token)))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body["data"]["liked"], true);

    // second toggle restores the original count
    let response = app
        .clone()
        .oneshot(bare_request("POST", &format!("/like/{id}"), Some(&token)))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body["data"]["likes"], 0);
    assert_eq!(body["data"]["liked"], false);

    let response = app
        .clone()
        .oneshot(bare_request("POST", &format!("/liked/{id}"), Some(&token)))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body["data"]["liked"], false);

    let response = app
        .clone()
        .oneshot(bare_request("POST", "/like/99999", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(bare_request("POST", &format!("/like/{id}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_requires_ownership() {
    let app = spawn_app().await;

    register(&app, "alice").await;
    register(&app, "mallory").await;
    let alice = login(&app, "alice").await;
    let mallory = login(&app, "mallory").await;

    let id = upload(&app, &alice, "Alice's Clip").await;

    let response = app
        .clone()
        .oneshot(bare_request("DELETE", &format!("/video/{id}"), Some(&mallory)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(bare_request("DELETE", &format!("/video/{id}"), Some(&alice)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(bare_request("GET", "/videos", None))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert!(
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .all(|v| v["id"].as_i64() != Some(id))
    );

    // file is gone too
    let response = app
        .clone()
        .oneshot(bare_request("GET", &format!("/video/{id}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comments_in_creation_order() {
    let app = spawn_app().await;

    register(&app, "alice").await;
    let token = login(&app, "alice").await;
    let id = upload(&app, &token, "Commentable").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/comment/{id}"),
            Some(&token),
            serde_json::json!({ "content": "   " }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    for content in ["first!", "second thoughts"] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/comment/{id}"),
                Some(&token),
                serde_json::json!({ "content": content }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(bare_request("GET", &format!("/comments/{id}"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let comments = body["data"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["content"], "first!");
    assert_eq!(comments[0]["user"], "alice");
    assert_eq!(comments[1]["content"], "second thoughts");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/comment/99999",
            Some(&token),
            serde_json::json!({ "content": "into the void" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let app = spawn_app().await;

    register(&app, "alice").await;
    let token = login(&app, "alice").await;

    let response = app
        .clone()
        .oneshot(bare_request("POST", "/logout", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(upload_request(&token, "After Logout", "desc", b"bytes"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
