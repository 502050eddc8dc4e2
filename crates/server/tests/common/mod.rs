#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use migration::MigratorTrait;
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::auth::{ServerAuthConfig, ServerState};
use server::routes;

pub const TEST_PASSWORD: &str = "Velvet-Quasar27";

pub fn skip_db_tests() -> bool {
    std::env::var("SKIP_DB_TESTS").is_ok()
}

/// Connect, migrate, and build the router the way startup does, with a
/// fixed test secret.
pub async fn build_app() -> anyhow::Result<(Router, sea_orm::DatabaseConnection)> {
    let db = models::db::connect().await?;
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("migrations notice: {}", e);
    }
    let state = ServerState {
        db: db.clone(),
        auth: ServerAuthConfig {
            jwt_secret: "test-secret".into(),
            access_token_minutes: 30,
            refresh_token_days: 7,
        },
    };
    Ok((routes::build_router(state, CorsLayer::very_permissive()), db))
}

/// Drive the router in-process and decode the JSON body.
pub async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> anyhow::Result<(StatusCode, Value)> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let body = match body {
        Some(v) => Body::from(serde_json::to_vec(&v)?),
        None => Body::empty(),
    };
    let resp = app.clone().oneshot(builder.body(body)?).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}

pub struct TestUser {
    pub email: String,
    pub user_id: Uuid,
    pub access: String,
    pub refresh: String,
}

/// Register a fresh user and hand back its identity and tokens.
pub async fn register_user(app: &Router, name: &str) -> anyhow::Result<TestUser> {
    let email = format!("user_{}@example.com", Uuid::new_v4());
    let (status, body) = call(
        app,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "name": name,
            "email": email,
            "password": TEST_PASSWORD,
            "confirm_password": TEST_PASSWORD,
        })),
    )
    .await?;
    anyhow::ensure!(status == StatusCode::CREATED, "register failed: {status} {body}");
    Ok(TestUser {
        email,
        user_id: body["data"]["user"]["id"]
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or_else(|| anyhow::anyhow!("no user id in {body}"))?,
        access: body["data"]["tokens"]["access"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("no access token in {body}"))?
            .to_string(),
        refresh: body["data"]["tokens"]["refresh"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("no refresh token in {body}"))?
            .to_string(),
    })
}

pub fn patient_payload(first: &str, last: &str) -> Value {
    json!({
        "first_name": first,
        "last_name": last,
        "date_of_birth": "1990-01-15",
        "gender": "F",
        "blood_group": "O+",
        "phone": "123-456-7890",
    })
}

pub fn doctor_payload(email: &str, license: &str) -> Value {
    json!({
        "first_name": "Gregory",
        "last_name": "House",
        "email": email,
        "specialization": "nephrology",
        "license_number": license,
        "years_of_experience": 20,
        "hospital_name": "Princeton-Plainsboro",
        "city": "Princeton",
    })
}
