use serde::Serialize;

use crate::application::Written;
use crate::domain::errors::{DomainError, ErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Ok,
    Validation,
    NotFound,
    Internal,
}

impl From<ErrorKind> for ResponseStatus {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Validation => ResponseStatus::Validation,
            ErrorKind::NotFound => ResponseStatus::NotFound,
            ErrorKind::Internal => ResponseStatus::Internal,
        }
    }
}

/// Outcome shape handed to whatever transport sits in front of the writers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceResponse<T> {
    pub succeeded: bool,
    pub message: String,
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ServiceResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        ServiceResponse {
            succeeded: true,
            message: message.into(),
            status: ResponseStatus::Ok,
            data: Some(data),
        }
    }

    pub fn failure(err: &DomainError) -> Self {
        ServiceResponse {
            succeeded: false,
            message: err.message().to_string(),
            status: err.kind().into(),
            data: None,
        }
    }
}

impl<T> From<Result<Written<T>, DomainError>> for ServiceResponse<T> {
    fn from(result: Result<Written<T>, DomainError>) -> Self {
        match result {
            Ok(written) => ServiceResponse::success(written.value, written.message),
            Err(err) => ServiceResponse::failure(&err),
        }
    }
}
