//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod form;
mod health;
mod likes;
mod posts;
mod tags;

use actix_web::{error::InternalError, web};

use crate::middleware::error::AppError;

/// Extractor failures render like every other error: `{"error": ...}`.
fn extractor_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PathConfig::default().error_handler(|err, _req| {
        InternalError::from_response(
            err.to_string(),
            actix_web::ResponseError::error_response(&AppError::NotFound("Not found".to_string())),
        )
        .into()
    }))
    .app_data(web::JsonConfig::default().error_handler(|err, _req| {
        let app_error = AppError::BadRequest(err.to_string());
        InternalError::from_response(err, actix_web::ResponseError::error_response(&app_error))
            .into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        let app_error = AppError::BadRequest(err.to_string());
        InternalError::from_response(err, actix_web::ResponseError::error_response(&app_error))
            .into()
    }));
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    extractor_config(cfg);

    cfg
        // Public routes
        .route("/health", web::get().to(health::health_check))
        // Account routes
        .route("/register", web::post().to(auth::register))
        .route("/login", web::post().to(auth::login))
        .route("/profile", web::get().to(auth::profile))
        .route("/logout", web::post().to(auth::logout))
        // Posts
        .route("/upload-content-image", web::post().to(posts::upload_content_image))
        .route("/post", web::post().to(posts::create_post))
        .route("/post", web::put().to(posts::update_post))
        .route("/post", web::get().to(posts::list_posts))
        .route("/post/{id}", web::get().to(posts::get_post))
        .route("/post/{id}", web::delete().to(posts::delete_post))
        .route("/posts/tag/{tag_name}", web::get().to(posts::posts_by_tag))
        .route("/user/{id}/posts", web::get().to(posts::posts_by_user))
        .route("/tags", web::get().to(tags::list_tags))
        // Comments
        .route("/comment", web::post().to(comments::create_comment))
        .route("/post/{id}/comments", web::get().to(comments::list_comments))
        .route("/comment/{id}", web::delete().to(comments::delete_comment))
        // Likes
        .route("/like/post/{id}", web::post().to(likes::toggle_post_like))
        .route("/like/comment/{id}", web::post().to(likes::toggle_comment_like))
        .route("/post/{id}/likes", web::get().to(likes::post_likes))
        .route("/comment/{id}/likes", web::get().to(likes::comment_likes));
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::cookie::Cookie;
    use actix_web::dev::{Service, ServiceResponse};
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};
    use serde_json::{Value, json};

    use thoughtlane_core::services::SessionGate;
    use thoughtlane_infra::{JwtConfig, JwtTokenService};

    use super::*;
    use crate::state::AppState;

    const BOUNDARY: &str = "thoughtlane-test-boundary";
    const MAX_UPLOAD: usize = 1024;

    fn state() -> AppState {
        let tokens = JwtTokenService::new(JwtConfig {
            secret: "handler-test-secret-0123".to_string(),
            expiration_hours: 1,
            issuer: "thoughtlane-test".to_string(),
        });
        AppState::in_memory(SessionGate::new(Arc::new(tokens)), MAX_UPLOAD)
    }

    async fn app() -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
    {
        test::init_service(
            App::new()
                .app_data(web::Data::new(state()))
                .configure(configure_routes),
        )
        .await
    }

    fn multipart(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((filename, content_type, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn multipart_request(
        method: test::TestRequest,
        token: &str,
        body: Vec<u8>,
    ) -> actix_http::Request {
        method
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .cookie(Cookie::new("token", token.to_string()))
            .set_payload(body)
            .to_request()
    }

    /// Register and log in; returns the session token.
    async fn sign_in<S>(app: &S, username: &str) -> String
    where
        S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    {
        let credentials = json!({ "username": username, "password": "password123" });

        let resp = test::call_service(
            app,
            test::TestRequest::post()
                .uri("/register")
                .set_json(&credentials)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = test::call_service(
            app,
            test::TestRequest::post()
                .uri("/login")
                .set_json(&credentials)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let cookie = resp
            .response()
            .cookies()
            .find(|c| c.name() == "token")
            .expect("login sets the session cookie");
        assert!(cookie.http_only().unwrap_or(false));
        cookie.value().to_string()
    }

    async fn create_post<S>(app: &S, token: &str, title: &str, tags: &str) -> Value
    where
        S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    {
        let body = multipart(
            &[
                ("title", title),
                ("summary", "A summary"),
                ("content", "<p>Body</p>"),
                ("tags", tags),
            ],
            Some(("cover.png", "image/png", &[0x89, 0x50, 0x4e, 0x47])),
        );
        let resp =
            test::call_service(app, multipart_request(test::TestRequest::post().uri("/post"), token, body))
                .await;
        assert_eq!(resp.status(), StatusCode::OK);
        test::read_body_json(resp).await
    }

    #[actix_web::test]
    async fn test_health_check() {
        let app = app().await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "ok");
    }

    #[actix_web::test]
    async fn test_profile_requires_credential() {
        let app = app().await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/profile").to_request()).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Not authenticated" }));
    }

    #[actix_web::test]
    async fn test_login_then_profile() {
        let app = app().await;
        let token = sign_in(&app, "alice@example.com").await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/profile")
                .cookie(Cookie::new("token", token.clone()))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["username"], "alice@example.com");

        // Bearer header works too.
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/profile")
                .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_wrong_password_is_unauthorized() {
        let app = app().await;
        sign_in(&app, "bob").await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/login")
                .set_json(json!({ "username": "bob", "password": "not-the-one" }))
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_post_comment_like_flow() {
        let app = app().await;
        let alice = sign_in(&app, "alice@example.com").await;
        let bob = sign_in(&app, "bob@example.com").await;

        let post = create_post(&app, &alice, "Hello", r#"["rust","web"]"#).await;
        let post_id = post["id"].as_str().unwrap().to_string();
        assert_eq!(post["author"]["name"], "alice");
        assert!(post["cover"].is_string());

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri(&format!("/post/{post_id}")).to_request(),
        )
        .await;
        let fetched: Value = test::read_body_json(resp).await;
        assert_eq!(fetched["tags"], json!(["rust", "web"]));

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/comment")
                .cookie(Cookie::new("token", bob.clone()))
                .set_json(json!({ "post_id": post_id, "content": "Nice post" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/like/post/{post_id}"))
                .cookie(Cookie::new("token", bob.clone()))
                .to_request(),
        )
        .await;
        let toggled: Value = test::read_body_json(resp).await;
        assert_eq!(toggled, json!({ "liked": true, "likeCount": 1 }));

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/post?limit=5&page=1")
                .cookie(Cookie::new("token", bob.clone()))
                .to_request(),
        )
        .await;
        let listing: Value = test::read_body_json(resp).await;
        assert_eq!(listing[0]["likeCount"], 1);
        assert_eq!(listing[0]["userLiked"], true);

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/post/{post_id}/comments"))
                .to_request(),
        )
        .await;
        let comments: Value = test::read_body_json(resp).await;
        assert_eq!(comments[0]["content"], "Nice post");
        assert_eq!(comments[0]["author"]["name"], "bob");

        let resp = test::call_service(&app, test::TestRequest::get().uri("/posts/tag/rust").to_request())
            .await;
        let tagged: Value = test::read_body_json(resp).await;
        assert_eq!(tagged.as_array().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_non_author_cannot_delete() {
        let app = app().await;
        let alice = sign_in(&app, "alice").await;
        let bob = sign_in(&app, "bob").await;
        let post = create_post(&app, &alice, "Mine", "[]").await;
        let uri = format!("/post/{}", post["id"].as_str().unwrap());

        let resp = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&uri)
                .cookie(Cookie::new("token", bob))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&uri)
                .cookie(Cookie::new("token", alice))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "success": true }));

        let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_oversized_upload_is_rejected() {
        let app = app().await;
        let token = sign_in(&app, "carol").await;
        let big = vec![0u8; MAX_UPLOAD + 1];
        let body = multipart(&[], Some(("huge.png", "image/png", &big)));

        let resp = test::call_service(
            &app,
            multipart_request(test::TestRequest::post().uri("/upload-content-image"), &token, body),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_form_text_shares_one_budget() {
        let app = app().await;
        let token = sign_in(&app, "dave").await;
        let half = "x".repeat(MAX_UPLOAD / 2 + 10);
        let body = multipart(&[("title", half.as_str()), ("content", half.as_str())], None);

        let resp = test::call_service(
            &app,
            multipart_request(test::TestRequest::post().uri("/post"), &token, body),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_form_part_count_is_bounded() {
        let app = app().await;
        let token = sign_in(&app, "erin").await;
        let names: Vec<String> = (0..20).map(|i| format!("extra{i}")).collect();
        let fields: Vec<(&str, &str)> = names.iter().map(|n| (n.as_str(), "v")).collect();
        let body = multipart(&fields, None);

        let resp = test::call_service(
            &app,
            multipart_request(test::TestRequest::post().uri("/post"), &token, body),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_second_file_part_is_rejected() {
        let app = app().await;
        let token = sign_in(&app, "frank").await;
        let mut body = multipart(&[], Some(("a.png", "image/png", &[1, 2, 3])));
        // Splice a second file part in front of the closing boundary.
        body.truncate(body.len() - format!("--{BOUNDARY}--\r\n").len());
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"b.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(&[4, 5, 6]);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let resp = test::call_service(
            &app,
            multipart_request(test::TestRequest::post().uri("/upload-content-image"), &token, body),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_malformed_id_is_not_found() {
        let app = app().await;

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/post/not-a-uuid").to_request()).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }
}
