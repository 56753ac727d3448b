use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;
use vitrine::config::Config;

const ADMIN_EMAIL: &str = "admin@vitrine.local";
const ADMIN_PASSWORD: &str = "changeme";

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;
    config.server.secure_cookies = false;

    let state = vitrine::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    vitrine::api::router(state)
}

async fn login_admin(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(ToString::to_string)
        .expect("session cookie")
}

fn authed_json(method: &str, uri: &str, cookie: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, cookie)
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_public_team_hides_inactive_members() {
    let app = spawn_app().await;
    let cookie = login_admin(&app).await;

    for (name, active) in [("Ada", true), ("Grace", true), ("Alumni", false)] {
        let response = app
            .clone()
            .oneshot(authed_json(
                "POST",
                "/api/admin/team",
                &cookie,
                &json!({
                    "name": name,
                    "title": "Engineer",
                    "is_active": active,
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    // Admin listing shows everyone.
    let body = body_json(
        app.clone()
            .oneshot(
                Request::builder()
                    .uri("/api/admin/team")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    // Public listing hides the inactive member.
    let body = body_json(
        app.clone()
            .oneshot(
                Request::builder()
                    .uri("/api/public/team")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap(),
    )
    .await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Ada", "Grace"]);
}

#[tokio::test]
async fn test_public_projects_show_published_only_in_sort_order() {
    let app = spawn_app().await;
    let cookie = login_admin(&app).await;

    let fixtures = [
        ("second-study", "published", 2),
        ("first-study", "published", 1),
        ("secret-study", "draft", 0),
    ];
    for (slug, status, sort_order) in fixtures {
        let response = app
            .clone()
            .oneshot(authed_json(
                "POST",
                "/api/admin/projects",
                &cookie,
                &json!({
                    "title": slug,
                    "slug": slug,
                    "content": "case study body",
                    "status": status,
                    "sort_order": sort_order,
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let body = body_json(
        app.clone()
            .oneshot(
                Request::builder()
                    .uri("/api/public/projects")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap(),
    )
    .await;

    let slugs: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, vec!["first-study", "second-study"]);

    // Draft case study is unreachable by slug.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/public/projects/secret-study")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dashboard_counts_reflect_content() {
    let app = spawn_app().await;
    let cookie = login_admin(&app).await;

    let response = app
        .clone()
        .oneshot(authed_json(
            "POST",
            "/api/admin/posts",
            &cookie,
            &json!({
                "title": "Only published posts count as published",
                "slug": "counting",
                "content": "body",
                "status": "published",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(
        app.clone()
            .oneshot(
                Request::builder()
                    .uri("/api/admin/dashboard")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(body["data"]["posts"], 1);
    assert_eq!(body["data"]["published_posts"], 1);
    assert_eq!(body["data"]["users"], 1);
    assert_eq!(body["data"]["unread_inquiries"], 0);
}

#[tokio::test]
async fn test_invalid_slug_is_a_validation_error() {
    let app = spawn_app().await;
    let cookie = login_admin(&app).await;

    let response = app
        .clone()
        .oneshot(authed_json(
            "POST",
            "/api/admin/posts",
            &cookie,
            &json!({
                "title": "Bad slug",
                "slug": "Not A Slug!",
                "content": "body",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("slug"));
}
