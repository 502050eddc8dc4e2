//! HS256 token minting and verification. Access and refresh tokens share
//! one claim shape and differ in `token_type` and lifetime; the `jti`
//! feeds the revocation set.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::AuthError;

pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub token_type: String,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::InvalidToken)
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

pub fn issue(
    secret: &str,
    user_id: Uuid,
    email: &str,
    token_type: &str,
    ttl: Duration,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        token_type: token_type.to_string(),
        jti: Uuid::new_v4().to_string(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AuthError::TokenError(e.to_string()))
}

pub fn decode_token(secret: &str, token: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|_| AuthError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_preserves_claims() {
        let uid = Uuid::new_v4();
        let token = issue("secret", uid, "a@b.com", TOKEN_TYPE_ACCESS, Duration::minutes(5)).unwrap();
        let claims = decode_token("secret", &token).unwrap();
        assert_eq!(claims.user_id().unwrap(), uid);
        assert_eq!(claims.token_type, TOKEN_TYPE_ACCESS);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = issue("secret", Uuid::new_v4(), "a@b.com", TOKEN_TYPE_ACCESS, Duration::minutes(5)).unwrap();
        assert!(decode_token("other", &token).is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let token = issue("secret", Uuid::new_v4(), "a@b.com", TOKEN_TYPE_REFRESH, Duration::hours(-2)).unwrap();
        assert!(decode_token("secret", &token).is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(decode_token("secret", "not-a-jwt").is_err());
    }
}
