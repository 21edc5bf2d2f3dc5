//! Authentication tests
//!
//! Default account bootstrap, credential verification and token round trips

mod common;

use bistro_ledger_backend::services::auth::{AuthService, LoginInput};
use bistro_ledger_backend::{AppError, Config};

use common::test_pool;

fn login(username: &str, password: &str) -> LoginInput {
    LoginInput {
        username: username.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn test_bootstrap_creates_default_user_once() {
    let service = AuthService::new(test_pool().await, &Config::default());

    assert!(service.bootstrap_default_user().await.unwrap());
    assert!(!service.bootstrap_default_user().await.unwrap());

    assert!(service.verify_user("admin", "admin").await.unwrap());
    assert!(!service.verify_user("admin", "Admin").await.unwrap());
    assert!(!service.verify_user("nobody", "admin").await.unwrap());
}

#[tokio::test]
async fn test_bootstrap_reads_configured_credentials() {
    let mut config = Config::default();
    config.auth.default_username = "owner".to_string();
    config.auth.default_password = "s3cret".to_string();
    let service = AuthService::new(test_pool().await, &config);

    service.bootstrap_default_user().await.unwrap();

    assert!(service.verify_user("owner", "s3cret").await.unwrap());
    assert!(!service.verify_user("admin", "admin").await.unwrap());
}

#[tokio::test]
async fn test_stored_verifier_is_sha256_hex() {
    let pool = test_pool().await;
    let service = AuthService::new(pool.clone(), &Config::default());
    service.bootstrap_default_user().await.unwrap();

    let stored: String = sqlx::query_scalar("SELECT password_hash FROM users WHERE username = ?")
        .bind("admin")
        .fetch_one(&pool)
        .await
        .unwrap();

    assert_eq!(stored, AuthService::hash_password("admin"));
    assert_eq!(stored.len(), 64);
    assert!(stored.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
}

#[tokio::test]
async fn test_login_issues_valid_token() {
    let service = AuthService::new(test_pool().await, &Config::default());
    service.bootstrap_default_user().await.unwrap();

    let token = service.login(login("admin", "admin")).await.unwrap();
    assert_eq!(token.token_type, "Bearer");
    assert_eq!(token.user.username, "admin");

    let claims = service.validate_token(&token.access_token).unwrap();
    assert_eq!(claims.sub, "admin");
    assert_eq!(claims.uid, token.user.id);
    assert!(claims.exp > claims.iat);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let service = AuthService::new(test_pool().await, &Config::default());
    service.bootstrap_default_user().await.unwrap();

    assert!(matches!(
        service.login(login("admin", "wrong")).await,
        Err(AppError::InvalidCredentials)
    ));
    assert!(matches!(
        service.login(login("ghost", "admin")).await,
        Err(AppError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn test_username_whitespace_is_ignored_on_every_path() {
    let service = AuthService::new(test_pool().await, &Config::default());
    service.bootstrap_default_user().await.unwrap();

    assert!(service.verify_user(" admin ", "admin").await.unwrap());
    let token = service.login(login(" admin ", "admin")).await.unwrap();
    assert_eq!(token.user.username, "admin");

    // Passwords are taken verbatim
    assert!(!service.verify_user("admin", " admin").await.unwrap());
}

#[tokio::test]
async fn test_token_from_other_secret_is_rejected() {
    let pool = test_pool().await;
    let service = AuthService::new(pool.clone(), &Config::default());
    service.bootstrap_default_user().await.unwrap();
    let token = service.login(login("admin", "admin")).await.unwrap();

    let mut other = Config::default();
    other.jwt.secret = "another-secret".to_string();
    let verifier = AuthService::new(pool, &other);

    assert!(matches!(
        verifier.validate_token(&token.access_token),
        Err(AppError::Unauthorized(_))
    ));
    assert!(verifier.validate_token("not-a-token").is_err());
}
