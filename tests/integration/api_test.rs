//! HTTP surface tests driving the full router with an in-memory store.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use parlor_auth::{encode_token, IdentityClaims};
use parlor_common::Config;
use parlor_moderation::{MemoryStore, ModerationStore, Post, UserRecord};
use serde_json::{json, Value};
use tower::ServiceExt;

const JWT_SECRET: &str = "integration-test-secret";
const LEGACY_ROOT: &str = "legacy-root";

fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        jwt_issuer: None,
        jwt_audience: None,
        legacy_super_admins: vec![LEGACY_ROOT.to_string()],
        legacy_admin_emails: vec![],
        log_level: "debug".to_string(),
        port: 0,
    }
}

async fn app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    store
        .upsert_user(&UserRecord::new("author-1", None, Utc::now()))
        .await
        .unwrap();
    store
        .insert_post(&Post {
            id: "post-1".to_string(),
            author_id: "author-1".to_string(),
            category_id: "general".to_string(),
            created_at: Utc::now(),
        })
        .await
        .unwrap();

    let app = parlor_app::create_app(test_config(), store.clone())
        .await
        .unwrap();
    (app, store)
}

fn token_for(sub: &str, email: Option<&str>) -> String {
    let now = Utc::now().timestamp() as u64;
    let claims = IdentityClaims {
        sub: sub.to_string(),
        email: email.map(|e| e.to_string()),
        iat: now,
        exp: now + 3600,
    };
    encode_token(&claims, JWT_SECRET).unwrap()
}

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn delete(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_check_is_public() {
    let (app, _) = app().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let (app, _) = app().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/v1/moderation/reports")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let (app, _) = app().await;
    let response = app
        .oneshot(get("/v1/moderation/reports", "not-a-jwt"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_admin_is_forbidden_from_moderation() {
    let (app, _) = app().await;
    let token = token_for("ordinary-user", Some("user@example.com"));

    let response = app
        .clone()
        .oneshot(get("/v1/moderation/reports", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "AUTHORIZATION_ERROR");

    let response = app
        .oneshot(post_json(
            "/v1/moderation/admins",
            &token,
            json!({"user_id": "someone", "role": "admin"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn legacy_super_admin_can_grant_roles() {
    let (app, _) = app().await;
    let root = token_for(LEGACY_ROOT, None);

    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/moderation/admins",
            &root,
            json!({"user_id": "mod-1", "role": "admin"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["user_id"], "mod-1");
    assert_eq!(body["role"], "admin");
    assert_eq!(body["revision"], 1);

    // The new admin can use moderation routes immediately
    let mod_token = token_for("mod-1", None);
    let response = app
        .oneshot(get("/v1/moderation/reports", &mod_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn plain_admin_cannot_grant_roles() {
    let (app, _) = app().await;
    let root = token_for(LEGACY_ROOT, None);
    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/moderation/admins",
            &root,
            json!({"user_id": "mod-1", "role": "admin"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let mod_token = token_for("mod-1", None);
    let response = app
        .oneshot(post_json(
            "/v1/moderation/admins",
            &mod_token,
            json!({"user_id": "mod-2", "role": "admin"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn revoked_admin_loses_access() {
    let (app, _) = app().await;
    let root = token_for(LEGACY_ROOT, None);
    app.clone()
        .oneshot(post_json(
            "/v1/moderation/admins",
            &root,
            json!({"user_id": "mod-1", "role": "admin"}),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(delete("/v1/moderation/admins/mod-1", &root))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let mod_token = token_for("mod-1", None);
    let response = app
        .oneshot(get("/v1/moderation/reports", &mod_token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn report_can_only_be_filed_as_self() {
    let (app, _) = app().await;
    let token = token_for("reporter-1", None);

    let response = app
        .oneshot(post_json(
            "/v1/reports",
            &token,
            json!({
                "post_id": "post-1",
                "reported_by": "someone-else",
                "reason": "spam"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn report_filing_and_review_round_trip() {
    let (app, store) = app().await;
    let reporter = token_for("reporter-1", None);

    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/reports",
            &reporter,
            json!({
                "post_id": "post-1",
                "reported_by": "reporter-1",
                "reason": "spam",
                "description": "reposted ad"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let report = json_body(response).await;
    assert_eq!(report["status"], "pending");
    assert_eq!(report["admin_action"], "none");
    let report_id = report["id"].as_str().unwrap().to_string();

    // The legacy super-admin reviews it with a post deletion
    let root = token_for(LEGACY_ROOT, None);
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/v1/moderation/reports/{}/review", report_id),
            &root,
            json!({"action": "delete_post", "notes": "removed"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(store.get_post("post-1").await.unwrap().is_none());

    // No longer pending
    let response = app
        .oneshot(get("/v1/moderation/reports", &root))
        .await
        .unwrap();
    let pending = json_body(response).await;
    assert_eq!(pending.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn reviewing_a_reviewed_report_conflicts() {
    let (app, _) = app().await;
    let reporter = token_for("reporter-1", None);
    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/reports",
            &reporter,
            json!({"post_id": "post-1", "reported_by": "reporter-1", "reason": "spam"}),
        ))
        .await
        .unwrap();
    let report_id = json_body(response).await["id"].as_str().unwrap().to_string();

    let root = token_for(LEGACY_ROOT, None);
    let review_uri = format!("/v1/moderation/reports/{}/review", report_id);
    let response = app
        .clone()
        .oneshot(post_json(&review_uri, &root, json!({"action": "dismiss"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(post_json(&review_uri, &root, json!({"action": "ban_user"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn empty_report_reason_is_rejected() {
    let (app, _) = app().await;
    let token = token_for("reporter-1", None);

    let response = app
        .oneshot(post_json(
            "/v1/reports",
            &token,
            json!({"post_id": "post-1", "reported_by": "reporter-1", "reason": ""}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ban_endpoints_manage_the_banned_list() {
    let (app, _) = app().await;
    let root = token_for(LEGACY_ROOT, None);

    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/moderation/users/author-1/ban",
            &root,
            json!({"reason": "spam"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(get("/v1/moderation/users/banned", &root))
        .await
        .unwrap();
    let banned = json_body(response).await;
    assert_eq!(banned[0]["user_id"], "author-1");
    assert_eq!(banned[0]["ban_reason"], "spam");

    let response = app
        .clone()
        .oneshot(delete("/v1/moderation/users/author-1/ban", &root))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(get("/v1/moderation/users/banned", &root))
        .await
        .unwrap();
    let banned = json_body(response).await;
    assert_eq!(banned.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn category_lifecycle_over_http() {
    let (app, _) = app().await;
    let root = token_for(LEGACY_ROOT, None);

    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/moderation/categories",
            &root,
            json!({"name": "Science & Tech", "order": 1}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let category = json_body(response).await;
    assert_eq!(category["id"], "science_tech");

    // Duplicate name rejected
    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/moderation/categories",
            &root,
            json!({"name": "science & tech", "order": 2}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    app.clone()
        .oneshot(post_json(
            "/v1/moderation/categories",
            &root,
            json!({"name": "General Talk", "order": 2}),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(delete(
            "/v1/moderation/categories/science_tech?migrate_to=general_talk",
            &root,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["migrated_posts"], 0);
}

#[tokio::test]
async fn dashboard_loads_and_snapshots() {
    let (app, _) = app().await;
    let root = token_for(LEGACY_ROOT, None);

    // Before any load every slice is idle
    let response = app
        .clone()
        .oneshot(get("/v1/moderation/dashboard", &root))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let snapshot = json_body(response).await;
    assert_eq!(snapshot["reports"]["state"], "idle");

    let response = app
        .clone()
        .oneshot(post_json("/v1/moderation/dashboard/load", &root, json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get("/v1/moderation/dashboard", &root))
        .await
        .unwrap();
    let snapshot = json_body(response).await;
    assert_eq!(snapshot["reports"]["state"], "loaded");
    assert_eq!(snapshot["banned_users"]["state"], "loaded");
    assert_eq!(snapshot["admins"]["state"], "loaded");
    assert_eq!(snapshot["categories"]["state"], "loaded");
}
