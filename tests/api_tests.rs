use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;
use vitrine::config::Config;

/// Credentials seeded by the admin migration (must match m20260302_seed_admin.rs)
const ADMIN_EMAIL: &str = "admin@vitrine.local";
const ADMIN_PASSWORD: &str = "changeme";

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    // A single pooled connection keeps every query on the same in-memory db.
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;
    config.server.secure_cookies = false;

    let state = vitrine::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    vitrine::api::router(state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_authed(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: &serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");

    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Logs in and returns the session cookie, or None on rejection.
async fn login(app: &Router, email: &str, password: &str) -> Option<String> {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            &json!({"email": email, "password": password}),
        ))
        .await
        .unwrap();

    if response.status() != StatusCode::OK {
        return None;
    }

    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(ToString::to_string)
}

async fn login_admin(app: &Router) -> String {
    login(app, ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .expect("seeded admin must be able to log in")
}

#[tokio::test]
async fn test_login_rejects_bad_credentials_and_accepts_good_ones() {
    let app = spawn_app().await;

    assert!(login(&app, ADMIN_EMAIL, "wrongpass").await.is_none());
    assert!(login(&app, "nobody@vitrine.local", ADMIN_PASSWORD).await.is_none());

    let cookie = login_admin(&app).await;

    let response = app
        .clone()
        .oneshot(get_authed("/api/auth/me", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["email"], ADMIN_EMAIL);
    assert_eq!(body["data"]["role"], "admin");
}

#[tokio::test]
async fn test_admin_routes_reject_missing_and_garbage_sessions() {
    let app = spawn_app().await;

    let response = app.clone().oneshot(get("/api/admin/users")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(get_authed("/api/admin/users", "id=not-a-real-session"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_invalidates_session() {
    let app = spawn_app().await;
    let cookie = login_admin(&app).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/logout")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_authed("/api/admin/dashboard", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_viewer_capabilities_fail_closed() {
    let app = spawn_app().await;
    let admin_cookie = login_admin(&app).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admin/users",
            Some(&admin_cookie),
            &json!({
                "name": "Read Only",
                "email": "viewer@vitrine.local",
                "password": "viewerpass",
                "role": "viewer",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let viewer_cookie = login(&app, "viewer@vitrine.local", "viewerpass")
        .await
        .expect("viewer should authenticate");

    // Viewers can read content...
    let response = app
        .clone()
        .oneshot(get_authed("/api/admin/posts", &viewer_cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // ...but hold neither VIEW_USERS, MANAGE_SETTINGS nor MANAGE_CONTENT.
    let response = app
        .clone()
        .oneshot(get_authed("/api/admin/users", &viewer_cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(get_authed("/api/admin/settings", &viewer_cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admin/posts",
            Some(&viewer_cookie),
            &json!({"title": "Nope", "slug": "nope", "content": "x"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_self_modification_guard() {
    let app = spawn_app().await;
    let cookie = login_admin(&app).await;

    let me = body_json(
        app.clone()
            .oneshot(get_authed("/api/auth/me", &cookie))
            .await
            .unwrap(),
    )
    .await;
    let my_id = me["data"]["id"].as_i64().unwrap();

    // Changing one's own role is rejected even with MANAGE_USERS.
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/admin/users/{my_id}"),
            Some(&cookie),
            &json!({"role": "viewer"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Deactivating oneself is rejected.
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/admin/users/{my_id}"),
            Some(&cookie),
            &json!({"is_active": false}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Deleting oneself is rejected.
    let response = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            &format!("/api/admin/users/{my_id}"),
            Some(&cookie),
            &json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The account is untouched afterwards.
    let me_after = body_json(
        app.clone()
            .oneshot(get_authed("/api/auth/me", &cookie))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(me_after["data"]["role"], "admin");
}

#[tokio::test]
async fn test_inactive_and_passwordless_accounts_never_authenticate() {
    let app = spawn_app().await;
    let cookie = login_admin(&app).await;

    // Inactive account with a correct password.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admin/users",
            Some(&cookie),
            &json!({
                "name": "Benched",
                "email": "benched@vitrine.local",
                "password": "benchedpass",
                "role": "editor",
                "is_active": false,
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(login(&app, "benched@vitrine.local", "benchedpass").await.is_none());

    // Account without a password hash at all.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admin/users",
            Some(&cookie),
            &json!({
                "name": "No Credentials",
                "email": "sso-only@vitrine.local",
                "role": "editor",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(login(&app, "sso-only@vitrine.local", "").await.is_none());
    assert!(login(&app, "sso-only@vitrine.local", "anything").await.is_none());
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let app = spawn_app().await;
    let cookie = login_admin(&app).await;

    let payload = json!({
        "name": "Duplicate",
        "email": ADMIN_EMAIL,
        "password": "duplicated",
        "role": "editor",
    });

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/admin/users", Some(&cookie), &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_settings_round_trip_through_api() {
    let app = spawn_app().await;
    let cookie = login_admin(&app).await;

    let nested = json!({
        "general": {
            "site_name": "Vitrine Consulting",
            "posts_per_page": 12,
            "maintenance_mode": false,
        },
        "social": {
            "links": {"github": "https://github.com/vitrine"},
            "show_footer_icons": true,
        },
    });

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/api/admin/settings", Some(&cookie), &nested))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(
        app.clone()
            .oneshot(get_authed("/api/admin/settings", &cookie))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(body["data"]["general"]["site_name"], "Vitrine Consulting");
    assert_eq!(body["data"]["general"]["posts_per_page"], 12);
    assert_eq!(body["data"]["general"]["maintenance_mode"], false);
    assert_eq!(
        body["data"]["social"]["links"],
        json!({"github": "https://github.com/vitrine"})
    );
    assert_eq!(body["data"]["social"]["show_footer_icons"], true);
}

#[tokio::test]
async fn test_settings_reject_non_object_category() {
    let app = spawn_app().await;
    let cookie = login_admin(&app).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/admin/settings",
            Some(&cookie),
            &json!({"general": "not-an-object"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_slug_conflict_leaves_existing_post_unmodified() {
    let app = spawn_app().await;
    let cookie = login_admin(&app).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admin/posts",
            Some(&cookie),
            &json!({
                "title": "Original",
                "slug": "shared-slug",
                "content": "original body",
                "status": "published",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let original = body_json(response).await;
    let original_id = original["data"]["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admin/posts",
            Some(&cookie),
            &json!({
                "title": "Impostor",
                "slug": "shared-slug",
                "content": "other body",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = body_json(
        app.clone()
            .oneshot(get_authed(
                &format!("/api/admin/posts/{original_id}"),
                &cookie,
            ))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["data"]["title"], "Original");
    assert_eq!(body["data"]["content"], "original body");
}

#[tokio::test]
async fn test_draft_visible_to_admin_but_not_public() {
    let app = spawn_app().await;
    let cookie = login_admin(&app).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admin/posts",
            Some(&cookie),
            &json!({
                "title": "Work in progress",
                "slug": "work-in-progress",
                "content": "drafty",
                "status": "draft",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let post = body_json(response).await;
    let post_id = post["data"]["id"].as_i64().unwrap();
    assert_eq!(post["data"]["published_at"], serde_json::Value::Null);

    let response = app
        .clone()
        .oneshot(get_authed(&format!("/api/admin/posts/{post_id}"), &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get("/api/public/posts/work-in-progress"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_publish_transition_sets_and_clears_published_at() {
    let app = spawn_app().await;
    let cookie = login_admin(&app).await;

    let post = body_json(
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/admin/posts",
                Some(&cookie),
                &json!({
                    "title": "Lifecycle",
                    "slug": "lifecycle",
                    "content": "body",
                    "status": "draft",
                }),
            ))
            .await
            .unwrap(),
    )
    .await;
    let id = post["data"]["id"].as_i64().unwrap();

    let published = body_json(
        app.clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/admin/posts/{id}"),
                Some(&cookie),
                &json!({
                    "title": "Lifecycle",
                    "slug": "lifecycle",
                    "content": "body",
                    "status": "published",
                }),
            ))
            .await
            .unwrap(),
    )
    .await;
    assert!(published["data"]["published_at"].is_string());

    // Public route now serves it.
    let response = app
        .clone()
        .oneshot(get("/api/public/posts/lifecycle"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let archived = body_json(
        app.clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/admin/posts/{id}"),
                Some(&cookie),
                &json!({
                    "title": "Lifecycle",
                    "slug": "lifecycle",
                    "content": "body",
                    "status": "archived",
                }),
            ))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(archived["data"]["published_at"], serde_json::Value::Null);

    let response = app
        .clone()
        .oneshot(get("/api/public/posts/lifecycle"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rejected_mutation_has_no_side_effects() {
    let app = spawn_app().await;
    let cookie = login_admin(&app).await;

    let post = body_json(
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/admin/posts",
                Some(&cookie),
                &json!({
                    "title": "Untouchable",
                    "slug": "untouchable",
                    "content": "before",
                    "status": "published",
                }),
            ))
            .await
            .unwrap(),
    )
    .await;
    let id = post["data"]["id"].as_i64().unwrap();

    // Unauthenticated update attempt.
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/admin/posts/{id}"),
            None,
            &json!({
                "title": "Hacked",
                "slug": "untouchable",
                "content": "after",
                "status": "draft",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Unauthenticated delete attempt.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/admin/posts/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Snapshot after the rejected calls is identical to what was created.
    let body = body_json(
        app.clone()
            .oneshot(get_authed(&format!("/api/admin/posts/{id}"), &cookie))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["data"]["title"], "Untouchable");
    assert_eq!(body["data"]["content"], "before");
    assert_eq!(body["data"]["status"], "published");
}

#[tokio::test]
async fn test_public_contact_creates_inquiry() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/public/contact",
            None,
            &json!({
                "name": "Prospect",
                "email": "prospect@client.test",
                "company": "Client Co",
                "message": "We need a Rust team.",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Invalid email is rejected with a validation error.
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/public/contact",
            None,
            &json!({"name": "X", "email": "nope", "message": "hi"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let cookie = login_admin(&app).await;
    let body = body_json(
        app.clone()
            .oneshot(get_authed("/api/admin/inquiries", &cookie))
            .await
            .unwrap(),
    )
    .await;

    let inquiries = body["data"]["inquiries"].as_array().unwrap();
    assert_eq!(inquiries.len(), 1);
    assert_eq!(inquiries[0]["email"], "prospect@client.test");
    assert_eq!(inquiries[0]["is_read"], false);
}

#[tokio::test]
async fn test_health_probes_are_public() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(get("/api/system/health/live"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get("/api/system/health/ready"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
