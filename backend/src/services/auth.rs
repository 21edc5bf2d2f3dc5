//! Authentication service: default account bootstrap, credential checks and tokens

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;

use shared::User;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: SqlitePool,
    jwt_secret: String,
    access_token_expiry: i64,
    default_username: String,
    default_password: String,
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Username
    pub uid: i64,
    pub exp: i64,
    pub iat: i64,
}

/// Issued access token
#[derive(Debug, Serialize)]
pub struct AuthToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password_hash: String,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: SqlitePool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
            default_username: config.auth.default_username.clone(),
            default_password: config.auth.default_password.clone(),
        }
    }

    /// Lowercase hex SHA-256 of the UTF-8 secret
    pub fn hash_password(password: &str) -> String {
        let digest = Sha256::digest(password.as_bytes());
        digest.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Create the configured default account when no users exist yet.
    ///
    /// Returns true when an account was created.
    pub async fn bootstrap_default_user(&self) -> AppResult<bool> {
        let user_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await?;

        if user_count > 0 {
            return Ok(false);
        }

        sqlx::query("INSERT INTO users (username, password_hash) VALUES (?, ?)")
            .bind(&self.default_username)
            .bind(Self::hash_password(&self.default_password))
            .execute(&self.db)
            .await?;

        tracing::warn!(
            username = %self.default_username,
            "Created default user; change its password before exposing the server"
        );
        Ok(true)
    }

    /// Usernames are matched after trimming surrounding whitespace
    async fn find_user(&self, username: &str) -> AppResult<Option<UserRow>> {
        let user = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash FROM users WHERE username = ?",
        )
        .bind(username.trim())
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    /// True when the username exists and the secret hashes to its stored verifier
    pub async fn verify_user(&self, username: &str, password: &str) -> AppResult<bool> {
        let verified = self
            .find_user(username)
            .await?
            .map(|user| user.password_hash == Self::hash_password(password))
            .unwrap_or(false);

        Ok(verified)
    }

    /// Check the credentials and issue an access token
    pub async fn login(&self, input: LoginInput) -> AppResult<AuthToken> {
        let user = self
            .find_user(&input.username)
            .await?
            .filter(|user| user.password_hash == Self::hash_password(&input.password))
            .ok_or(AppError::InvalidCredentials)?;

        let access_token = self.generate_token(user.id, &user.username)?;

        tracing::info!(user_id = user.id, "User logged in");

        Ok(AuthToken {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
            user: User {
                id: user.id,
                username: user.username,
            },
        })
    }

    fn generate_token(&self, user_id: i64, username: &str) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: username.to_string(),
            uid: user_id,
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.access_token_expiry)).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
    }

    /// Validate an access token and return its claims
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_is_lowercase_sha256_hex() {
        assert_eq!(
            AuthService::hash_password("admin"),
            "8c6976e5b5410415bde908bd4dee15dfb167a9c873fc4bb8a81f6f2ab448a918"
        );
        assert_eq!(
            AuthService::hash_password(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
