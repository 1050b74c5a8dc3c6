use std::path::Path;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use serde_json::{Value, json};

use folio_infra::{PasswordConfig, UploadConfig};
use folio_shared::dto::{EntryResponse, PostReadingResponse, PostResponse, UploadResponse};

use super::{configure_routes, json_config};
use crate::config::AppConfig;
use crate::middleware::auth::SESSION_COOKIE;
use crate::state::AppState;

fn test_config(upload_dir: &Path) -> AppConfig {
    AppConfig {
        passwords: PasswordConfig::fast_for_tests(),
        uploads: UploadConfig {
            dir: upload_dir.to_path_buf(),
            max_bytes: 1024,
        },
        ..AppConfig::default()
    }
}

macro_rules! app {
    ($config:expr) => {{
        let config: AppConfig = $config;
        let state = AppState::in_memory(&config).unwrap();
        test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .app_data(json_config())
                .configure(configure_routes),
        )
        .await
    }};
}

const BOUNDARY: &str = "folio-form-boundary";

/// A `multipart/form-data` request body holding one file part.
fn upload_form(field: &str, filename: &str, contents: &[u8]) -> (String, Vec<u8>) {
    let mut body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

/// Registers `admin` and returns the session cookie.
macro_rules! sign_up {
    ($app:expr) => {{
        let req = TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({ "username": "admin", "password": "correct horse" }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        resp.response()
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
            .expect("session cookie")
            .into_owned()
    }};
}

#[actix_rt::test]
async fn test_health() {
    let tmp = tempfile::tempdir().unwrap();
    let app = app!(test_config(tmp.path()));

    let resp = test::call_service(&app, TestRequest::get().uri("/api/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
}

#[actix_rt::test]
async fn test_admin_routes_require_a_session() {
    let tmp = tempfile::tempdir().unwrap();
    let app = app!(test_config(tmp.path()));

    let req = TestRequest::post()
        .uri("/api/admin/posts")
        .set_json(json!({ "title": "Hello" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = TestRequest::delete()
        .uri("/api/admin/posts/00000000-0000-0000-0000-000000000000")
        .cookie(actix_web::cookie::Cookie::new(SESSION_COOKIE, "forged"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_post_lifecycle() {
    let tmp = tempfile::tempdir().unwrap();
    let app = app!(test_config(tmp.path()));
    let cookie = sign_up!(app);

    let req = TestRequest::post()
        .uri("/api/admin/posts")
        .cookie(cookie.clone())
        .set_json(json!({
            "title": "Hello",
            "body": "# Hi\nworld",
            "synopsis": "s",
            "cover_image": "c.png"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: PostResponse = test::read_body_json(resp).await;
    assert_eq!(created.likes, 0);
    let post_uri = format!("/api/posts/{}", created.id);

    let resp = test::call_service(&app, TestRequest::get().uri(&post_uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let reading: PostReadingResponse = test::read_body_json(resp).await;
    assert_eq!(reading.post.title, "Hello");
    assert!(reading.html.contains(r#"<h1 id="hi">Hi</h1>"#));
    assert!(reading.html.contains("<p>world</p>"));
    assert!(reading.more_posts.is_empty());

    for _ in 0..2 {
        let req = TestRequest::post()
            .uri(&format!("{post_uri}/like"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    let req = TestRequest::get().uri("/api/posts?search=HEL").to_request();
    let found: Vec<PostResponse> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(found.len(), 1);
    let req = TestRequest::get().uri("/api/posts?search=xyz").to_request();
    let found: Vec<PostResponse> = test::call_and_read_body_json(&app, req).await;
    assert!(found.is_empty());

    let req = TestRequest::put()
        .uri(&format!("/api/admin/posts/{}", created.id))
        .cookie(cookie.clone())
        .set_json(json!({ "title": "Hello again", "body": "edited" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: PostResponse = test::read_body_json(resp).await;
    assert_eq!(updated.title, "Hello again");
    assert_eq!(updated.likes, 2);
    assert_eq!(updated.date, created.date);

    let req = TestRequest::delete()
        .uri(&format!("/api/admin/posts/{}", created.id))
        .cookie(cookie)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let resp = test::call_service(&app, TestRequest::get().uri(&post_uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_bad_requests() {
    let tmp = tempfile::tempdir().unwrap();
    let app = app!(test_config(tmp.path()));
    let cookie = sign_up!(app);

    let resp = test::call_service(
        &app,
        TestRequest::get().uri("/api/posts/not-an-id").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 400);

    let req = TestRequest::post()
        .uri("/api/admin/posts")
        .cookie(cookie.clone())
        .set_json(json!({ "title": "   " }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = TestRequest::post()
        .uri("/api/admin/posts")
        .cookie(cookie)
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = TestRequest::post()
        .uri("/api/posts/00000000-0000-0000-0000-000000000000/like")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_rt::test]
async fn test_portfolio_and_home() {
    let tmp = tempfile::tempdir().unwrap();
    let app = app!(test_config(tmp.path()));

    let home: Value =
        test::call_and_read_body_json(&app, TestRequest::get().uri("/api/home").to_request())
            .await;
    assert!(home["featured"].is_null());
    assert_eq!(home["posts"], json!([]));

    let cookie = sign_up!(app);
    let req = TestRequest::post()
        .uri("/api/admin/portfolio")
        .cookie(cookie.clone())
        .set_json(json!({
            "title": "Folio",
            "repo": "https://git.example/folio",
            "url": "https://folio.example",
            "cover_image": "f.png"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let entry: EntryResponse = test::read_body_json(resp).await;

    let home: Value =
        test::call_and_read_body_json(&app, TestRequest::get().uri("/api/home").to_request())
            .await;
    assert_eq!(home["featured"]["id"], entry.id);

    let req = TestRequest::put()
        .uri(&format!("/api/admin/portfolio/{}", entry.id))
        .cookie(cookie.clone())
        .set_json(json!({ "title": "Folio v2" }))
        .to_request();
    let updated: EntryResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated.title, "Folio v2");

    let req = TestRequest::get()
        .uri(&format!("/api/portfolio/{}", entry.id))
        .to_request();
    let fetched: EntryResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched.title, "Folio v2");

    let req = TestRequest::delete()
        .uri(&format!("/api/admin/portfolio/{}", entry.id))
        .cookie(cookie)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], entry.id);

    let list: Vec<EntryResponse> =
        test::call_and_read_body_json(&app, TestRequest::get().uri("/api/portfolio").to_request())
            .await;
    assert!(list.is_empty());
}

#[actix_rt::test]
async fn test_login_and_session_status() {
    let tmp = tempfile::tempdir().unwrap();
    let app = app!(test_config(tmp.path()));

    let status: Value = test::call_and_read_body_json(
        &app,
        TestRequest::get().uri("/api/auth/session").to_request(),
    )
    .await;
    assert_eq!(status["authenticated"], false);

    sign_up!(app);

    for (username, password) in [("admin", "wrong"), ("nobody", "correct horse")] {
        let req = TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "username": username, "password": password }))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::UNAUTHORIZED
        );
    }

    let req = TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": "admin", "password": "correct horse" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .unwrap()
        .into_owned();
    assert_eq!(cookie.http_only(), Some(true));

    let req = TestRequest::get()
        .uri("/api/auth/session")
        .cookie(cookie)
        .to_request();
    let status: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(status["authenticated"], true);
}

#[actix_rt::test]
async fn test_duplicate_and_disabled_registration() {
    let tmp = tempfile::tempdir().unwrap();
    let app = app!(test_config(tmp.path()));
    sign_up!(app);

    let req = TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "username": "admin", "password": "other" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::CONFLICT
    );

    let closed = app!(AppConfig {
        registration_enabled: false,
        ..test_config(tmp.path())
    });
    let req = TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "username": "admin", "password": "pw" }))
        .to_request();
    assert_eq!(
        test::call_service(&closed, req).await.status(),
        StatusCode::FORBIDDEN
    );
}

#[cfg(feature = "rate-limit")]
#[actix_rt::test]
async fn test_login_is_rate_limited() {
    use folio_infra::RateLimitConfig;
    use std::time::Duration;

    let tmp = tempfile::tempdir().unwrap();
    let app = app!(AppConfig {
        login_rate_limit: RateLimitConfig {
            max_requests: 2,
            window: Duration::from_secs(60),
        },
        ..test_config(tmp.path())
    });

    // A fresh X-Forwarded-For on every attempt must not buy a fresh budget.
    let attempt = |peer: &str, n: u32| {
        TestRequest::post()
            .uri("/api/auth/login")
            .peer_addr(peer.parse().unwrap())
            .insert_header(("x-forwarded-for", format!("203.0.113.{n}")))
            .set_json(json!({ "username": "admin", "password": "guess" }))
            .to_request()
    };

    for n in 0..2 {
        let resp = test::call_service(&app, attempt("10.0.0.1:40000", n)).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
    let resp = test::call_service(&app, attempt("10.0.0.1:40001", 2)).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(resp.headers().contains_key("retry-after"));

    let resp = test::call_service(&app, attempt("10.0.0.2:40000", 3)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_upload_and_markdown_preview() {
    let tmp = tempfile::tempdir().unwrap();
    let app = app!(test_config(tmp.path()));
    let cookie = sign_up!(app);

    let upload = |form: (String, Vec<u8>)| {
        TestRequest::post()
            .uri("/api/admin/uploads")
            .cookie(cookie.clone())
            .insert_header(("content-type", form.0))
            .set_payload(form.1)
            .to_request()
    };

    let form = upload_form("file", "Cover.PNG", b"\x89PNG fake image");
    let resp = test::call_service(&app, upload(form)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let uploaded: UploadResponse = test::read_body_json(resp).await;
    assert!(uploaded.filename.ends_with(".png"));
    assert_eq!(
        std::fs::read(tmp.path().join(&uploaded.filename)).unwrap(),
        b"\x89PNG fake image"
    );

    // Empty file, wrong field name, and a file over the 1 KiB test cap.
    for form in [
        upload_form("file", "empty.png", b""),
        upload_form("image", "cover.png", b"data"),
        upload_form("file", "big.png", &[0u8; 2048]),
    ] {
        assert_eq!(
            test::call_service(&app, upload(form)).await.status(),
            StatusCode::BAD_REQUEST
        );
    }
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);

    let req = TestRequest::post()
        .uri("/api/admin/markdown")
        .cookie(cookie)
        .set_json(json!({ "markdown": "## Notes\n\n[docs](https://docs.rs)" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(html.contains(r#"<h2 id="notes">"#));
    assert!(html.contains(r#"target="_blank""#));
}
