use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use sea_orm::DatabaseConnection;
use tracing::warn;

use service::auth::{
    domain::AuthUser,
    errors::AuthError,
    repo::seaorm::SeaOrmAuthRepository,
    service::{AuthConfig, AuthService},
};

use crate::errors::ApiError;

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
    pub access_token_minutes: i64,
    pub refresh_token_days: i64,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
}

impl ServerState {
    pub fn auth_service(&self) -> AuthService<SeaOrmAuthRepository> {
        let repo = Arc::new(SeaOrmAuthRepository { db: self.db.clone() });
        AuthService::new(
            repo,
            AuthConfig {
                jwt_secret: self.auth.jwt_secret.clone(),
                access_token_minutes: self.auth.access_token_minutes,
                refresh_token_days: self.auth.refresh_token_days,
                password_algorithm: "argon2".into(),
            },
        )
    }
}

/// Caller identity resolved by the bearer middleware.
#[derive(Clone)]
pub struct CurrentUser(pub AuthUser);

/// Protected-route middleware: verify `Authorization: Bearer <access>` and
/// stash the resolved user in request extensions.
pub async fn require_bearer_user(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = req.uri().path().to_string();
    let token = match bearer_token(&req) {
        Some(token) => token,
        None => {
            warn!(path = %path, "missing Authorization bearer token");
            return Err(AuthError::MissingToken.into());
        }
    };
    let user = state.auth_service().resolve_access(&token).await.map_err(|e| {
        warn!(path = %path, code = e.code(), "access token rejected");
        ApiError::from(e)
    })?;
    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}

fn bearer_token(req: &Request) -> Option<String> {
    let header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?;
    header
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}
