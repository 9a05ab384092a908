use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Error returned by the services and rendered by the HTTP layer.
///
/// Domain variants carry a short `title` shown to the caller and a `detail`
/// naming where and why the operation failed.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{title}: {detail}")]
    BadRequest { title: String, detail: String },
    #[error("{title}: {detail}")]
    Validation { title: String, detail: String },
    #[error("{title}: {detail}")]
    NotFound { title: String, detail: String },
    #[error("{title}: {detail}")]
    Forbidden { title: String, detail: String },
    #[error("{title}: {detail}")]
    Conflict { title: String, detail: String },
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),
    #[error("Invalid path parameter: {0}")]
    InvalidPath(#[from] PathRejection),
    #[error("Invalid query string: {0}")]
    InvalidQuery(#[from] QueryRejection),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn bad_request(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::BadRequest {
            title: title.into(),
            detail: detail.into(),
        }
    }

    pub fn validation(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Validation {
            title: title.into(),
            detail: detail.into(),
        }
    }

    pub fn not_found(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::NotFound {
            title: title.into(),
            detail: detail.into(),
        }
    }

    pub fn forbidden(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Forbidden {
            title: title.into(),
            detail: detail.into(),
        }
    }

    pub fn conflict(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Conflict {
            title: title.into(),
            detail: detail.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. }
            | AppError::InvalidBody(_)
            | AppError::InvalidPath(_)
            | AppError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// True when the store rejected a write because of a UNIQUE constraint.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false)
}

/// A store error reporting a UNIQUE violation, for exercising write paths in tests.
#[cfg(test)]
pub(crate) fn unique_violation(constraint: &'static str) -> sqlx::Error {
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::borrow::Cow;

    #[derive(Debug)]
    struct UniqueViolation(&'static str);

    impl std::fmt::Display for UniqueViolation {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "duplicate key value violates unique constraint \"{}\"", self.0)
        }
    }

    impl std::error::Error for UniqueViolation {}

    impl DatabaseError for UniqueViolation {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed("23505"))
        }

        fn constraint(&self) -> Option<&str> {
            Some(self.0)
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::UniqueViolation
        }
    }

    sqlx::Error::Database(Box::new(UniqueViolation(constraint)))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (error, details) = match &self {
            AppError::BadRequest { title, detail }
            | AppError::Validation { title, detail }
            | AppError::NotFound { title, detail }
            | AppError::Forbidden { title, detail }
            | AppError::Conflict { title, detail } => (title.clone(), detail.clone()),
            AppError::InvalidBody(rejection) => {
                ("Corpo da requisição inválido.".to_string(), rejection.body_text())
            }
            AppError::InvalidPath(rejection) => {
                ("Parâmetro de rota inválido.".to_string(), rejection.body_text())
            }
            AppError::InvalidQuery(rejection) => {
                ("Parâmetros de consulta inválidos.".to_string(), rejection.body_text())
            }
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                ("Erro no servidor.".to_string(), "Falha ao acessar o banco de dados.".to_string())
            }
            AppError::Internal(err) => {
                tracing::error!(error = ?err, "internal error");
                ("Erro no servidor.".to_string(), err.to_string())
            }
        };

        let body = Json(json!({
            "error": error,
            "details": details,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
