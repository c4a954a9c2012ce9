//! Authentication and authorization utilities
//!
//! Provides:
//! - JWT access/refresh token generation and validation
//! - Argon2 password hashing
//! - Request auth context extraction
//!
//! The middleware applying these lives in the gateway and can be
//! disabled by configuration; nothing in here branches on that flag.

use crate::db::models::UserRole;
use crate::errors::{AppError, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::FromRequestParts, http::request::Parts};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token kind carried inside JWT claims
pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

/// Extracted authentication context available to handlers
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Authenticated user (or the configured fallback when auth is off)
    pub user_id: Uuid,

    /// Role granted to this request
    pub role: UserRole,

    /// True when the auth middleware ran with enforcement disabled
    pub bypassed: bool,
}

impl AuthContext {
    /// Require the admin role, returning Forbidden otherwise
    pub fn require_admin(&self) -> Result<()> {
        if self.role == UserRole::Admin {
            Ok(())
        } else {
            Err(AppError::Forbidden {
                message: "Admin role required".to_string(),
            })
        }
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Role at issue time
    pub role: String,

    /// "access" or "refresh"
    pub token_type: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl JwtClaims {
    pub fn is_access(&self) -> bool {
        self.token_type == TOKEN_TYPE_ACCESS
    }

    pub fn is_refresh(&self) -> bool {
        self.token_type == TOKEN_TYPE_REFRESH
    }

    /// Parse the subject back into a user id
    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub).map_err(|_| AppError::Unauthorized {
            message: "Invalid token subject".to_string(),
        })
    }
}

/// JWT token manager for the access/refresh token pair
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager with the given secret
    pub fn new(secret: &str, access_expire_minutes: u64, refresh_expire_days: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl_secs: (access_expire_minutes * 60) as i64,
            refresh_ttl_secs: (refresh_expire_days * 24 * 3600) as i64,
        }
    }

    pub fn from_config(config: &crate::config::AuthConfig) -> Self {
        Self::new(
            &config.jwt_secret,
            config.access_token_expire_minutes,
            config.refresh_token_expire_days,
        )
    }

    /// Generate a short-lived access token
    pub fn generate_access_token(&self, user_id: Uuid, role: UserRole) -> Result<String> {
        self.generate(user_id, role, TOKEN_TYPE_ACCESS, self.access_ttl_secs)
    }

    /// Generate a long-lived refresh token
    pub fn generate_refresh_token(&self, user_id: Uuid, role: UserRole) -> Result<String> {
        self.generate(user_id, role, TOKEN_TYPE_REFRESH, self.refresh_ttl_secs)
    }

    fn generate(
        &self,
        user_id: Uuid,
        role: UserRole,
        token_type: &str,
        ttl_secs: i64,
    ) -> Result<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(ttl_secs);

        let claims = JwtClaims {
            sub: user_id.to_string(),
            role: String::from(role),
            token_type: token_type.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| AppError::Internal {
            message: format!("Failed to generate token: {}", e),
        })
    }

    /// Validate and decode a JWT token
    pub fn validate_token(&self, token: &str) -> Result<JwtClaims> {
        decode::<JwtClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::ExpiredToken,
                _ => AppError::Unauthorized {
                    message: "Invalid token".to_string(),
                },
            })
    }
}

/// Hash a password for storage
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal {
            message: format!("Failed to hash password: {}", e),
        })
}

/// Verify a password against a stored hash
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Extract the bearer token from an Authorization header value
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

/// Axum extractor for AuthContext.
///
/// The gateway's auth middleware inserts the context as a request
/// extension; a missing context means the route was wired without it.
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized {
                message: "Missing authentication context".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_roundtrip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash));
        assert!(!verify_password("wrong password", &hash));
        assert!(!verify_password("anything", "not-a-valid-hash"));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_bearer_token("abc123"), None);
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test_secret", 480, 30);
        let user_id = Uuid::new_v4();

        let token = manager
            .generate_access_token(user_id, UserRole::Staff)
            .unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.role, "staff");
        assert!(claims.is_access());
        assert!(!claims.is_refresh());
    }

    #[test]
    fn test_refresh_token_type() {
        let manager = JwtManager::new("test_secret", 480, 30);
        let user_id = Uuid::new_v4();

        let token = manager
            .generate_refresh_token(user_id, UserRole::Admin)
            .unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert!(claims.is_refresh());
        assert_eq!(claims.role, "admin");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let manager = JwtManager::new("secret_a", 480, 30);
        let other = JwtManager::new("secret_b", 480, 30);

        let token = manager
            .generate_access_token(Uuid::new_v4(), UserRole::Staff)
            .unwrap();
        assert!(matches!(
            other.validate_token(&token),
            Err(AppError::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_require_admin() {
        let ctx = AuthContext {
            user_id: Uuid::new_v4(),
            role: UserRole::Staff,
            bypassed: false,
        };
        assert!(ctx.require_admin().is_err());

        let ctx = AuthContext {
            role: UserRole::Admin,
            ..ctx
        };
        assert!(ctx.require_admin().is_ok());
    }
}
