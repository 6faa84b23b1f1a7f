use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::{Value, json};

use photogram_infra::{InMemoryPhotoStorage, JwtConfig};
use photogram_shared::dto::AuthResponse;

use super::configure_routes;
use crate::state::AppState;

const PHOTO_LIMIT: usize = 1024;
const BOUNDARY: &str = "photogram-test-boundary";

fn state_with(photos: Arc<InMemoryPhotoStorage>) -> AppState {
    AppState::in_memory(photos, &JwtConfig::default(), PHOTO_LIMIT)
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(configure_routes),
        )
        .await
    };
}

fn multipart_body(photo: &[u8], caption: Option<&str>) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"photo\"; filename=\"sunset.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(photo);
    body.extend_from_slice(b"\r\n");
    if let Some(caption) = caption {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"caption\"\r\n\r\n{caption}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

macro_rules! register {
    ($app:expr, $name:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({ "name": $name, "password": "correct-horse" }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let auth: AuthResponse = test::read_body_json(resp).await;
        auth.access_token
    }};
}

macro_rules! upload {
    ($app:expr, $token:expr, $photo:expr, $caption:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer($token))
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(multipart_body($photo, $caption))
            .to_request();
        test::call_service(&$app, req).await
    }};
}

#[actix_web::test]
async fn test_health_check() {
    let app = app!(state_with(Arc::new(InMemoryPhotoStorage::new())));

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn test_register_login_and_me() {
    let app = app!(state_with(Arc::new(InMemoryPhotoStorage::new())));
    let _token = register!(app, "alice");

    let duplicate = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "name": "alice", "password": "another-password" }))
        .to_request();
    let resp = test::call_service(&app, duplicate).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["detail"], "Name 'alice' is already registered");

    let wrong = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "name": "alice", "password": "wrong-password" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, wrong).await.status(),
        StatusCode::UNAUTHORIZED
    );

    let login = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "name": "alice", "password": "correct-horse" }))
        .to_request();
    let auth: AuthResponse = test::call_and_read_body_json(&app, login).await;

    let me = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(bearer(&auth.access_token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, me).await;
    assert_eq!(body["data"]["name"], "alice");
}

#[actix_web::test]
async fn test_short_password_is_rejected() {
    let app = app!(state_with(Arc::new(InMemoryPhotoStorage::new())));

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "name": "bob", "password": "short" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_upload_requires_token() {
    let app = app!(state_with(Arc::new(InMemoryPhotoStorage::new())));

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart_body(b"jpeg", None))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_post_lifecycle() {
    let photos = Arc::new(InMemoryPhotoStorage::new());
    let app = app!(state_with(photos.clone()));
    let token = register!(app, "alice");

    let resp = upload!(app, &token, b"not-really-a-jpeg", Some("Sunset"));
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let post_id = created["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["data"]["caption"], "Sunset");
    assert_eq!(photos.len().await, 1);

    let get = test::TestRequest::get()
        .uri(&format!("/api/posts/{post_id}"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, get).await;
    assert_eq!(body["data"]["like_count"], 0);

    // Like once, then again.
    let like = || {
        test::TestRequest::post()
            .uri(&format!("/api/posts/{post_id}/likes"))
            .insert_header(bearer(&token))
            .to_request()
    };
    assert_eq!(
        test::call_service(&app, like()).await.status(),
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        test::call_service(&app, like()).await.status(),
        StatusCode::BAD_REQUEST
    );

    let status = test::TestRequest::get()
        .uri(&format!("/api/posts/{post_id}/likes/me"))
        .insert_header(bearer(&token))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, status).await;
    assert_eq!(body["data"]["liked"], true);

    let comment = test::TestRequest::post()
        .uri(&format!("/api/posts/{post_id}/comments"))
        .insert_header(bearer(&token))
        .set_json(json!({ "message": "Lovely" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, comment).await.status(),
        StatusCode::CREATED
    );

    let comments = test::TestRequest::get()
        .uri(&format!("/api/posts/{post_id}/comments"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, comments).await;
    assert_eq!(body["data"][0]["message"], "Lovely");

    let search = test::TestRequest::get()
        .uri("/api/posts/search?author_name=ali&caption=Sun")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, search).await;
    assert_eq!(body["data"][0]["post_id"], post_id.as_str());
    assert_eq!(body["data"][0]["like_count"], 1);

    let delete = test::TestRequest::delete()
        .uri(&format!("/api/posts/{post_id}"))
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(
        test::call_service(&app, delete).await.status(),
        StatusCode::NO_CONTENT
    );

    let gone = test::TestRequest::get()
        .uri(&format!("/api/posts/{post_id}/comments"))
        .to_request();
    assert_eq!(
        test::call_service(&app, gone).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn test_oversized_upload_is_rejected_before_storage() {
    let photos = Arc::new(InMemoryPhotoStorage::new());
    let app = app!(state_with(photos.clone()));
    let token = register!(app, "alice");

    let resp = upload!(app, &token, &vec![0u8; PHOTO_LIMIT + 1], None);
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(photos.is_empty().await);
}

#[actix_web::test]
async fn test_unknown_post_is_not_found() {
    let app = app!(state_with(Arc::new(InMemoryPhotoStorage::new())));
    let token = register!(app, "alice");

    let req = test::TestRequest::post()
        .uri(&format!("/api/posts/{}/likes", uuid::Uuid::new_v4()))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 404);
}

#[actix_web::test]
async fn test_inverted_search_range_is_bad_request() {
    let app = app!(state_with(Arc::new(InMemoryPhotoStorage::new())));

    let req = test::TestRequest::get()
        .uri("/api/posts/search?created_from=2025-02-01T00:00:00Z&created_to=2025-01-01T00:00:00Z")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
