use crate::model::leave_request::LeaveStatus;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::{Display, Error};
use serde_json::json;

pub type LeaveResult<T> = Result<T, LeaveError>;

#[derive(Debug, Display, Error)]
pub enum LeaveError {
    #[display(fmt = "Employee not found with id: {}", employee_id)]
    EmployeeNotFound { employee_id: u64 },

    #[display(fmt = "Leave request not found with id: {}", request_id)]
    LeaveRequestNotFound { request_id: u64 },

    #[display(
        fmt = "Insufficient leave balance: {} day(s) requested, {} remaining",
        requested,
        remaining
    )]
    InsufficientBalance { requested: i64, remaining: i64 },

    #[display(fmt = "Leave request {} is already {}", request_id, status)]
    AlreadyProcessed {
        request_id: u64,
        status: LeaveStatus,
    },

    #[display(fmt = "start_date {} cannot be after end_date {}", start_date, end_date)]
    InvalidRange {
        start_date: chrono::NaiveDate,
        end_date: chrono::NaiveDate,
    },

    #[display(fmt = "Storage error: {}", source)]
    Storage { source: StorageError },
}

impl LeaveError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LeaveError::EmployeeNotFound { .. } | LeaveError::LeaveRequestNotFound { .. }
        )
    }
}

impl From<StorageError> for LeaveError {
    fn from(source: StorageError) -> Self {
        LeaveError::Storage { source }
    }
}

impl ResponseError for LeaveError {
    fn status_code(&self) -> StatusCode {
        match self {
            LeaveError::EmployeeNotFound { .. } | LeaveError::LeaveRequestNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            LeaveError::InsufficientBalance { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            LeaveError::AlreadyProcessed { .. } => StatusCode::CONFLICT,
            LeaveError::InvalidRange { .. } => StatusCode::BAD_REQUEST,
            LeaveError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            // backend details stay in the logs
            LeaveError::Storage { .. } => "Internal Server Error".to_string(),
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({ "message": message }))
    }
}

/// Failure reported by a directory or leave store backend.
#[derive(Debug, Display, Error)]
pub enum StorageError {
    #[display(fmt = "database error: {}", source)]
    Database { source: sqlx::Error },

    #[display(fmt = "corrupt record {}: {}", id, reason)]
    Corrupt {
        id: u64,
        reason: String,
    },
}

impl From<sqlx::Error> for StorageError {
    fn from(source: sqlx::Error) -> Self {
        StorageError::Database { source }
    }
}

impl From<sqlx::Error> for LeaveError {
    fn from(source: sqlx::Error) -> Self {
        LeaveError::Storage {
            source: source.into(),
        }
    }
}
