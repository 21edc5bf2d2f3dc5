//! Error handling for Bistro Ledger
//!
//! Provides consistent error responses in English and Portuguese

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{LedgerError, ValidationError};

fn is_corrupt_position(err: &LedgerError) -> bool {
    matches!(err, LedgerError::CorruptPosition { .. })
}
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    // Caller input errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Ledger rule violated: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Duplicate name: {resource} '{name}' already exists")]
    DuplicateName { resource: String, name: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Storage errors
    #[error("Persistence failure: {0}")]
    PersistenceFailure(#[from] sqlx::Error),

    #[error("Migration failure: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Turn a uniqueness violation into `DuplicateName`; anything else is a persistence failure
    pub fn from_write(err: sqlx::Error, resource: &str, name: &str) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::DuplicateName {
                    resource: resource.to_string(),
                    name: name.to_string(),
                }
            }
            _ => AppError::PersistenceFailure(err),
        }
    }

    pub fn not_found(resource: &str) -> Self {
        AppError::NotFound(resource.to_string())
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Ledger(err) if is_corrupt_position(err) => "CORRUPT_STOCK_POSITION",
            AppError::Validation(_) | AppError::Ledger(_) => "VALIDATION_ERROR",
            AppError::DuplicateName { .. } => "DUPLICATE_NAME",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::PersistenceFailure(_) | AppError::Migration(_) => "PERSISTENCE_FAILURE",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_pt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code().to_string();
        let (status, error_detail) = match &self {
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code,
                    message_en: "Invalid username or password".to_string(),
                    message_pt: "Usuário ou senha inválidos".to_string(),
                    field: None,
                },
            ),
            AppError::Unauthorized(message) => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code,
                    message_en: message.clone(),
                    message_pt: "Não autorizado".to_string(),
                    field: None,
                },
            ),
            AppError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code,
                    message_en: err.to_string(),
                    message_pt: format!("Dados inválidos: {}", err),
                    field: err.field().map(str::to_string),
                },
            ),
            // Stored stock is already invalid; the caller cannot fix that
            AppError::Ledger(err) if is_corrupt_position(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code,
                    message_en: err.to_string(),
                    message_pt: "A posição de estoque armazenada está corrompida".to_string(),
                    field: None,
                },
            ),
            AppError::Ledger(err) => {
                let message_pt = match err {
                    LedgerError::Overflow { .. } => "Valores grandes demais para o estoque",
                    _ => "Quantidade e preço devem ser positivos",
                };
                (
                    StatusCode::BAD_REQUEST,
                    ErrorDetail {
                        code,
                        message_en: err.to_string(),
                        message_pt: message_pt.to_string(),
                        field: None,
                    },
                )
            }
            AppError::DuplicateName { resource, name } => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code,
                    message_en: format!("A {} named '{}' already exists", resource, name),
                    message_pt: format!("Já existe um(a) {} com o nome '{}'", resource, name),
                    field: Some("name".to_string()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code,
                    message_en: format!("{} not found", resource),
                    message_pt: format!("{} não encontrado(a)", resource),
                    field: None,
                },
            ),
            AppError::PersistenceFailure(_) | AppError::Migration(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code,
                    message_en: "The change could not be saved".to_string(),
                    message_pt: "Não foi possível salvar a alteração".to_string(),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code,
                    message_en: msg.clone(),
                    message_pt: "Erro interno do servidor".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers and services
pub type AppResult<T> = Result<T, AppError>;
