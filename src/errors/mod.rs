use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;
use log::error;

/// Failures reported by an `EmployeeStore`.
#[derive(Debug)]
pub enum StoreError {
    NotFound,
    Database(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::NotFound => write!(f, "Employee not found"),
            StoreError::Database(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            other => StoreError::Database(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::Database(err.to_string())
    }
}

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    OperationFailed { message: String, detail: String },
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl AppError {
    pub fn operation_failed(message: &str, detail: impl fmt::Display) -> Self {
        AppError::OperationFailed {
            message: message.to_string(),
            detail: detail.to_string(),
        }
    }

    /// Maps a store failure onto the HTTP error for the operation named by
    /// `message`. A missing record is always a 404.
    pub fn from_store(message: &'static str) -> impl Fn(StoreError) -> AppError {
        move |err| match err {
            StoreError::NotFound => AppError::NotFound("Not found".to_string()),
            StoreError::Database(detail) => AppError::operation_failed(message, detail),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::OperationFailed { message, detail } => write!(f, "{}: {}", message, detail),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::OperationFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound(msg) => HttpResponse::NotFound().json(ErrorResponse { error: msg.clone() }),
            AppError::OperationFailed { message, detail } => {
                error!("{}: {}", message, detail);
                HttpResponse::InternalServerError().json(ErrorResponse { error: message.clone() })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_rows_map_to_not_found() {
        assert!(matches!(StoreError::from(sqlx::Error::RowNotFound), StoreError::NotFound));
        assert!(matches!(
            StoreError::from(sqlx::Error::PoolTimedOut),
            StoreError::Database(_)
        ));
    }

    #[test]
    fn store_errors_pick_status_codes() {
        let to_http = AppError::from_store("Failed to fetch employee");
        assert_eq!(to_http(StoreError::NotFound).status_code(), StatusCode::NOT_FOUND);

        let failed = to_http(StoreError::Database("disk I/O error".into()));
        assert_eq!(failed.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(failed.to_string(), "Failed to fetch employee: disk I/O error");
    }
}
