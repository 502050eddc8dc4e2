use std::sync::Arc;

use argon2::{password_hash::{PasswordHasher, PasswordVerifier, SaltString}, Argon2, PasswordHash};
use chrono::Duration;
use rand::rngs::OsRng;
use tracing::{debug, info, instrument};

use super::domain::{AuthSession, AuthUser, LoginInput, RegisterInput, TokenPair};
use super::errors::AuthError;
use super::jwt;
use super::password;
use super::repository::AuthRepository;
use crate::validation::{self, FieldErrors};

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_token_minutes: i64,
    pub refresh_token_days: i64,
    pub password_algorithm: String,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            access_token_minutes: 30,
            refresh_token_days: 7,
            password_algorithm: "argon2".into(),
        }
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self {
        Self { repo, cfg }
    }

    /// Register a new user with a hashed password and issue a token pair.
    ///
    /// Every field failure is collected; nothing is persisted unless the
    /// whole payload validates.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig::new("secret"));
    /// let input = RegisterInput {
    ///     name: "Test".into(),
    ///     email: "user@example.com".into(),
    ///     password: "Str0ng-Entropy!".into(),
    ///     confirm_password: "Str0ng-Entropy!".into(),
    /// };
    /// let session = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(session.user.email, "user@example.com");
    /// assert_ne!(session.tokens.access, session.tokens.refresh);
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthSession, AuthError> {
        let mut errors = FieldErrors::new();

        let name = match validation::require_trimmed(&input.name, "Name") {
            Ok(name) => name,
            Err(msg) => {
                errors.add("name", msg);
                String::new()
            }
        };

        let email = match validation::normalize_email(&input.email) {
            Ok(email) => {
                if self.repo.find_user_by_email(&email).await?.is_some() {
                    debug!("email already registered");
                    errors.add("email", "A user with this email already exists.");
                }
                email
            }
            Err(msg) => {
                errors.add("email", msg);
                String::new()
            }
        };

        errors.extend_field(
            "password",
            password::validate(&input.password, &[input.email.as_str(), input.name.as_str()]),
        );
        if input.password != input.confirm_password {
            errors.add("confirm_password", "Passwords do not match.");
        }

        if !errors.is_empty() {
            return Err(AuthError::Validation(errors));
        }

        let user = self.repo.create_user(&name, &email).await?;
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();
        let _cred = self
            .repo
            .upsert_password(user.id, hash, self.cfg.password_algorithm.clone())
            .await?;

        let tokens = self.issue_tokens(&user)?;
        info!(user_id = %user.id, email = %user.email, "user_registered");
        Ok(AuthSession { user, tokens })
    }

    /// Authenticate a user and issue a fresh token pair.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo.clone(), AuthConfig::new("secret"));
    /// let _ = tokio_test::block_on(svc.register(RegisterInput {
    ///     name: "N".into(),
    ///     email: "u@example.org".into(),
    ///     password: "Orbital-Velocity9".into(),
    ///     confirm_password: "Orbital-Velocity9".into(),
    /// }));
    /// let session = tokio_test::block_on(svc.login(LoginInput {
    ///     email: "U@Example.org".into(),
    ///     password: "Orbital-Velocity9".into(),
    /// })).unwrap();
    /// assert_eq!(session.user.email, "u@example.org");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let email = input.email.trim().to_lowercase();
        let user = self
            .repo
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let cred = self
            .repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default()
            .verify_password(input.password.as_bytes(), &parsed)
            .is_err()
        {
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AuthError::Inactive);
        }

        let tokens = self.issue_tokens(&user)?;
        info!(user_id = %user.id, "user_logged_in");
        Ok(AuthSession { user, tokens })
    }

    /// Mint a short-lived access token and a longer-lived refresh token.
    pub fn issue_tokens(&self, user: &AuthUser) -> Result<TokenPair, AuthError> {
        let access = jwt::issue(
            &self.cfg.jwt_secret,
            user.id,
            &user.email,
            jwt::TOKEN_TYPE_ACCESS,
            Duration::minutes(self.cfg.access_token_minutes),
        )?;
        let refresh = jwt::issue(
            &self.cfg.jwt_secret,
            user.id,
            &user.email,
            jwt::TOKEN_TYPE_REFRESH,
            Duration::days(self.cfg.refresh_token_days),
        )?;
        Ok(TokenPair { access, refresh })
    }

    /// Exchange a valid, unrevoked refresh token for a new access token.
    pub async fn refresh_access(&self, refresh_token: &str) -> Result<String, AuthError> {
        let claims = jwt::decode_token(&self.cfg.jwt_secret, refresh_token)?;
        if claims.token_type != jwt::TOKEN_TYPE_REFRESH {
            return Err(AuthError::InvalidToken);
        }
        if self.repo.is_token_revoked(&claims.jti).await? {
            return Err(AuthError::InvalidToken);
        }
        let user = self
            .repo
            .find_user_by_id(claims.user_id()?)
            .await?
            .ok_or(AuthError::InvalidToken)?;
        if !user.is_active {
            return Err(AuthError::Inactive);
        }
        jwt::issue(
            &self.cfg.jwt_secret,
            user.id,
            &user.email,
            jwt::TOKEN_TYPE_ACCESS,
            Duration::minutes(self.cfg.access_token_minutes),
        )
    }

    /// Revoke a refresh token so it can no longer mint access tokens.
    /// A malformed, expired or already-revoked token is an error.
    pub async fn revoke_refresh(&self, refresh_token: &str) -> Result<(), AuthError> {
        let claims = jwt::decode_token(&self.cfg.jwt_secret, refresh_token)?;
        if claims.token_type != jwt::TOKEN_TYPE_REFRESH {
            return Err(AuthError::InvalidToken);
        }
        let user_id = claims.user_id()?;
        let inserted = self
            .repo
            .revoke_token(&claims.jti, user_id, claims.expires_at())
            .await?;
        if !inserted {
            return Err(AuthError::InvalidToken);
        }
        info!(%user_id, "refresh_token_revoked");
        Ok(())
    }

    /// Resolve the caller behind a bearer access token. Used by every
    /// protected endpoint.
    pub async fn resolve_access(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        let claims = jwt::decode_token(&self.cfg.jwt_secret, access_token)?;
        if claims.token_type != jwt::TOKEN_TYPE_ACCESS {
            return Err(AuthError::InvalidToken);
        }
        if self.repo.is_token_revoked(&claims.jti).await? {
            return Err(AuthError::InvalidToken);
        }
        let user = self
            .repo
            .find_user_by_id(claims.user_id()?)
            .await?
            .ok_or(AuthError::InvalidToken)?;
        if !user.is_active {
            return Err(AuthError::Inactive);
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;

    fn service() -> (Arc<MockAuthRepository>, AuthService<MockAuthRepository>) {
        let repo = Arc::new(MockAuthRepository::default());
        (repo.clone(), AuthService::new(repo, AuthConfig::new("test-secret")))
    }

    fn register_input(email: &str) -> RegisterInput {
        RegisterInput {
            name: "Tester".into(),
            email: email.into(),
            password: "Velvet-Quasar27".into(),
            confirm_password: "Velvet-Quasar27".into(),
        }
    }

    #[tokio::test]
    async fn register_issues_distinct_tokens() {
        let (_, svc) = service();
        let session = svc.register(register_input("a@example.com")).await.unwrap();
        assert_ne!(session.tokens.access, session.tokens.refresh);
        assert!(session.user.is_active);
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email_case_insensitively() {
        let (_, svc) = service();
        svc.register(register_input("dup@example.com")).await.unwrap();
        let err = svc.register(register_input("DUP@example.com")).await.unwrap_err();
        match err {
            AuthError::Validation(errors) => assert!(errors.get("email").is_some()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn register_collects_all_field_errors() {
        let (_, svc) = service();
        let err = svc
            .register(RegisterInput {
                name: "   ".into(),
                email: "broken".into(),
                password: "123".into(),
                confirm_password: "456".into(),
            })
            .await
            .unwrap_err();
        match err {
            AuthError::Validation(errors) => {
                assert!(errors.get("name").is_some());
                assert!(errors.get("email").is_some());
                assert!(errors.get("password").is_some());
                assert!(errors.get("confirm_password").is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn login_rejects_wrong_password_and_unknown_email() {
        let (_, svc) = service();
        svc.register(register_input("who@example.com")).await.unwrap();
        let wrong = svc
            .login(LoginInput { email: "who@example.com".into(), password: "nope-nope".into() })
            .await;
        assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));
        let unknown = svc
            .login(LoginInput { email: "ghost@example.com".into(), password: "whatever".into() })
            .await;
        assert!(matches!(unknown, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn login_rejects_deactivated_user_with_distinct_error() {
        let (repo, svc) = service();
        svc.register(register_input("gone@example.com")).await.unwrap();
        repo.set_active("gone@example.com", false);
        let err = svc
            .login(LoginInput { email: "gone@example.com".into(), password: "Velvet-Quasar27".into() })
            .await;
        assert!(matches!(err, Err(AuthError::Inactive)));
    }

    #[tokio::test]
    async fn refresh_rotates_access_only_until_revoked() {
        let (_, svc) = service();
        let session = svc.register(register_input("r@example.com")).await.unwrap();

        let access = svc.refresh_access(&session.tokens.refresh).await.unwrap();
        let user = svc.resolve_access(&access).await.unwrap();
        assert_eq!(user.email, "r@example.com");

        // An access token is not a refresh token.
        assert!(matches!(
            svc.refresh_access(&session.tokens.access).await,
            Err(AuthError::InvalidToken)
        ));

        svc.revoke_refresh(&session.tokens.refresh).await.unwrap();
        assert!(matches!(
            svc.refresh_access(&session.tokens.refresh).await,
            Err(AuthError::InvalidToken)
        ));
        // Second revocation reports the token as already dead.
        assert!(matches!(
            svc.revoke_refresh(&session.tokens.refresh).await,
            Err(AuthError::InvalidToken)
        ));
    }
}
