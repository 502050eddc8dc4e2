mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::{build_app, call, register_user, skip_db_tests, TEST_PASSWORD};

#[tokio::test]
async fn test_register_and_login_flow() -> anyhow::Result<()> {
    if skip_db_tests() {
        return Ok(());
    }
    let (app, _db) = build_app().await?;

    let user = register_user(&app, "Tester").await?;
    assert_ne!(user.access, user.refresh);

    let (status, body) = call(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": user.email, "password": TEST_PASSWORD })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Login successful.");
    assert!(body["data"]["tokens"]["access"].is_string());
    assert!(body["data"]["tokens"]["refresh"].is_string());
    Ok(())
}

#[tokio::test]
async fn test_register_duplicate_email_rejected() -> anyhow::Result<()> {
    if skip_db_tests() {
        return Ok(());
    }
    let (app, _db) = build_app().await?;

    let email = format!("dup_{}@example.com", Uuid::new_v4());
    let payload = json!({
        "name": "First",
        "email": email,
        "password": TEST_PASSWORD,
        "confirm_password": TEST_PASSWORD,
    });
    let (status, _) = call(&app, "POST", "/auth/register", None, Some(payload.clone())).await?;
    assert_eq!(status, StatusCode::CREATED);

    // Same address, different case: still a duplicate.
    let mut second = payload;
    second["email"] = json!(email.to_uppercase());
    let (status, body) = call(&app, "POST", "/auth/register", None, Some(second)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Registration failed.");
    assert!(body["errors"]["email"][0]
        .as_str()
        .unwrap()
        .contains("already exists"));
    Ok(())
}

#[tokio::test]
async fn test_register_collects_password_errors() -> anyhow::Result<()> {
    if skip_db_tests() {
        return Ok(());
    }
    let (app, _db) = build_app().await?;

    let (status, body) = call(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({
            "name": "Tester",
            "email": format!("pw_{}@example.com", Uuid::new_v4()),
            "password": "123",
            "confirm_password": "456",
        })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    // Both the weak password and the mismatch are reported at once.
    assert!(body["errors"]["password"].as_array().map(|a| !a.is_empty()).unwrap_or(false));
    assert_eq!(body["errors"]["confirm_password"][0], "Passwords do not match.");
    Ok(())
}

#[tokio::test]
async fn test_login_wrong_password() -> anyhow::Result<()> {
    if skip_db_tests() {
        return Ok(());
    }
    let (app, _db) = build_app().await?;

    let user = register_user(&app, "Tester").await?;
    let (status, body) = call(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": user.email, "password": "wrong-pass-1" })),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Login failed.");
    Ok(())
}

#[tokio::test]
async fn test_login_deactivated_user_rejected() -> anyhow::Result<()> {
    if skip_db_tests() {
        return Ok(());
    }
    let (app, db) = build_app().await?;

    let user = register_user(&app, "Tester").await?;
    models::user::set_active(&db, user.user_id, false).await?;

    let (status, body) = call(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": user.email, "password": TEST_PASSWORD })),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["errors"]["non_field_errors"][0]
        .as_str()
        .unwrap()
        .contains("deactivated"));
    Ok(())
}

#[tokio::test]
async fn test_me_requires_bearer_token() -> anyhow::Result<()> {
    if skip_db_tests() {
        return Ok(());
    }
    let (app, _db) = build_app().await?;

    let (status, body) = call(&app, "GET", "/auth/me", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["status_code"], 401);

    let user = register_user(&app, "Tester").await?;
    let (status, body) = call(&app, "GET", "/auth/me", Some(&user.access), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["email"], user.email);

    let (status, _) = call(&app, "GET", "/auth/me", Some("garbage-token"), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn test_refresh_and_logout_lifecycle() -> anyhow::Result<()> {
    if skip_db_tests() {
        return Ok(());
    }
    let (app, _db) = build_app().await?;
    let user = register_user(&app, "Tester").await?;

    // A refresh token mints a new access token.
    let (status, body) = call(
        &app,
        "POST",
        "/auth/token/refresh",
        None,
        Some(json!({ "refresh": user.refresh })),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    let new_access = body["data"]["access"].as_str().unwrap().to_string();
    let (status, _) = call(&app, "GET", "/auth/me", Some(&new_access), None).await?;
    assert_eq!(status, StatusCode::OK);

    // An access token is not accepted by the refresh endpoint.
    let (status, _) = call(
        &app,
        "POST",
        "/auth/token/refresh",
        None,
        Some(json!({ "refresh": user.access })),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Logout revokes the refresh token.
    let (status, body) = call(&app, "POST", "/auth/logout", None, Some(json!({ "refresh": user.refresh }))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logged out successfully.");

    let (status, _) = call(
        &app,
        "POST",
        "/auth/token/refresh",
        None,
        Some(json!({ "refresh": user.refresh })),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Revoking again reports the token as dead.
    let (status, body) = call(&app, "POST", "/auth/logout", None, Some(json!({ "refresh": user.refresh }))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid or expired token.");

    // And a missing token is its own failure.
    let (status, body) = call(&app, "POST", "/auth/logout", None, Some(json!({}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Refresh token is required.");
    Ok(())
}
