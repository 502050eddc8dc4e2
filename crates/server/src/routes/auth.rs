use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use service::auth::domain::{AuthSession, AuthUser, LoginInput, RegisterInput, TokenPair};
use service::auth::errors::AuthError;
use service::validation::FieldErrors;

use crate::auth::{CurrentUser, ServerState};
use crate::envelope::Envelope;
use crate::errors::ApiError;

#[derive(Serialize)]
pub struct UserOut {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl From<&AuthUser> for UserOut {
    fn from(user: &AuthUser) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct SessionData {
    pub user: UserOut,
    pub tokens: TokenPair,
}

impl From<AuthSession> for SessionData {
    fn from(session: AuthSession) -> Self {
        Self { user: UserOut::from(&session.user), tokens: session.tokens }
    }
}

#[derive(Serialize)]
pub struct MeData {
    pub user: UserOut,
}

#[derive(Serialize)]
pub struct AccessData {
    pub access: String,
}

#[derive(Deserialize)]
pub struct RefreshBody {
    pub refresh: Option<String>,
}

#[utoipa::path(post, path = "/auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 201, description = "Registered"), (status = 400, description = "Validation failed")))]
pub async fn register(
    State(state): State<ServerState>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<Envelope<SessionData>>), ApiError> {
    let session = state.auth_service().register(input).await.map_err(|e| match e {
        AuthError::Validation(errors) => ApiError::validation("Registration failed.", errors),
        other => ApiError::from(other),
    })?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::with_message("User registered successfully.", SessionData::from(session))),
    ))
}

#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged in"), (status = 401, description = "Login failed")))]
pub async fn login(
    State(state): State<ServerState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<Envelope<SessionData>>, ApiError> {
    let session = state.auth_service().login(input).await.map_err(|e| match e {
        AuthError::InvalidCredentials | AuthError::Inactive => {
            let mut errors = FieldErrors::new();
            errors.add_non_field(e.to_string());
            ApiError::login_failed(errors)
        }
        AuthError::Validation(errors) => ApiError::login_failed(errors),
        other => ApiError::from(other),
    })?;
    Ok(Json(Envelope::with_message("Login successful.", SessionData::from(session))))
}

#[utoipa::path(post, path = "/auth/logout", tag = "auth", request_body = crate::openapi::RefreshRequest, responses((status = 200, description = "Logged out"), (status = 400, description = "Missing or dead token")))]
pub async fn logout(
    State(state): State<ServerState>,
    Json(body): Json<RefreshBody>,
) -> Result<(StatusCode, Json<Envelope<()>>), ApiError> {
    let Some(refresh) = body.refresh.filter(|t| !t.trim().is_empty()) else {
        return Ok((StatusCode::BAD_REQUEST, Json(Envelope::failure("Refresh token is required."))));
    };
    match state.auth_service().revoke_refresh(&refresh).await {
        Ok(()) => Ok((StatusCode::OK, Json(Envelope::message("Logged out successfully.")))),
        Err(AuthError::InvalidToken) => {
            Ok((StatusCode::BAD_REQUEST, Json(Envelope::failure("Invalid or expired token."))))
        }
        Err(other) => Err(ApiError::from(other)),
    }
}

#[utoipa::path(post, path = "/auth/token/refresh", tag = "auth", request_body = crate::openapi::RefreshRequest, responses((status = 200, description = "New access token"), (status = 401, description = "Invalid refresh token")))]
pub async fn refresh(
    State(state): State<ServerState>,
    Json(body): Json<RefreshBody>,
) -> Result<Json<Envelope<AccessData>>, ApiError> {
    let Some(refresh) = body.refresh.filter(|t| !t.trim().is_empty()) else {
        let mut errors = FieldErrors::new();
        errors.add("refresh", "This field is required.");
        return Err(ApiError::validation("Token refresh failed.", errors));
    };
    let access = state
        .auth_service()
        .refresh_access(&refresh)
        .await
        .map_err(ApiError::from)?;
    Ok(Json(Envelope::data(AccessData { access })))
}

#[utoipa::path(get, path = "/auth/me", tag = "auth", responses((status = 200, description = "Current user"), (status = 401, description = "Unauthenticated")))]
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<Envelope<MeData>> {
    Json(Envelope::data(MeData { user: UserOut::from(&user) }))
}
