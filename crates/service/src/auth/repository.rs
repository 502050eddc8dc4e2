use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::domain::{AuthUser, Credentials};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError>;
    async fn create_user(&self, name: &str, email: &str) -> Result<AuthUser, AuthError>;

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError>;
    async fn upsert_password(&self, user_id: Uuid, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError>;

    /// Record a refresh-token revocation; false means the jti was already revoked.
    async fn revoke_token(&self, jti: &str, user_id: Uuid, expires_at: DateTime<Utc>) -> Result<bool, AuthError>;
    async fn is_token_revoked(&self, jti: &str) -> Result<bool, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<HashMap<String, AuthUser>>, // key: email
        creds: Mutex<HashMap<Uuid, Credentials>>, // key: user_id
        revoked: Mutex<HashSet<String>>,          // jti set
    }

    impl MockAuthRepository {
        /// Test helper: flip the active flag on a stored user.
        pub fn set_active(&self, email: &str, active: bool) {
            let mut users = self.users.lock().unwrap();
            if let Some(user) = users.get_mut(email) {
                user.is_active = active;
            }
        }
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().unwrap();
            Ok(users.get(email).cloned())
        }

        async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError> {
            let users = self.users.lock().unwrap();
            Ok(users.values().find(|u| u.id == id).cloned())
        }

        async fn create_user(&self, name: &str, email: &str) -> Result<AuthUser, AuthError> {
            let mut users = self.users.lock().unwrap();
            if users.contains_key(email) {
                let mut errors = crate::validation::FieldErrors::new();
                errors.add("email", "A user with this email already exists.");
                return Err(AuthError::Validation(errors));
            }
            let now = Utc::now().fixed_offset();
            let user = AuthUser {
                id: Uuid::new_v4(),
                name: name.to_string(),
                email: email.to_string(),
                is_active: true,
                is_staff: false,
                created_at: now,
                updated_at: now,
            };
            users.insert(email.to_string(), user.clone());
            Ok(user)
        }

        async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
            let creds = self.creds.lock().unwrap();
            Ok(creds.get(&user_id).cloned())
        }

        async fn upsert_password(&self, user_id: Uuid, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError> {
            let mut creds = self.creds.lock().unwrap();
            let c = Credentials { user_id, password_hash, password_algorithm };
            creds.insert(user_id, c.clone());
            Ok(c)
        }

        async fn revoke_token(&self, jti: &str, _user_id: Uuid, _expires_at: DateTime<Utc>) -> Result<bool, AuthError> {
            let mut revoked = self.revoked.lock().unwrap();
            Ok(revoked.insert(jti.to_string()))
        }

        async fn is_token_revoked(&self, jti: &str) -> Result<bool, AuthError> {
            let revoked = self.revoked.lock().unwrap();
            Ok(revoked.contains(jti))
        }
    }
}
