use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt::{self, Debug, Display};

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Internal,
    InvalidInput,
    RoutingFailure,
    StorageFailure,
    AuthFailure,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self.code {
            101 => ErrorKind::InvalidInput,
            102 => ErrorKind::RoutingFailure,
            103 => ErrorKind::StorageFailure,
            104 => ErrorKind::AuthFailure,
            _ => ErrorKind::Internal,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for Error {}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        database_error(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        unexpected_error(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        unexpected_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.kind() {
            ErrorKind::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            ErrorKind::InvalidInput => (StatusCode::BAD_REQUEST, self.message.as_str()),
            ErrorKind::RoutingFailure => (StatusCode::BAD_GATEWAY, self.message.as_str()),
            ErrorKind::StorageFailure => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.message.as_str())
            }
            ErrorKind::AuthFailure => (StatusCode::UNAUTHORIZED, self.message.as_str()),
        };

        let body = Json(json!({
            "code": self.code,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub fn invalid_input_error(message: impl Into<String>) -> Error {
    Error {
        code: 101,
        message: message.into(),
    }
}

pub fn routing_failure(reason: impl Display) -> Error {
    Error {
        code: 102,
        message: format!("Route calculation failed: {}", reason),
    }
}

pub fn storage_failure(message: impl Into<String>) -> Error {
    Error {
        code: 103,
        message: message.into(),
    }
}

pub fn auth_failure(message: impl Into<String>) -> Error {
    Error {
        code: 104,
        message: message.into(),
    }
}

pub fn env_var_error(err: env::VarError) -> Error {
    Error {
        code: 1,
        message: format!("environment variable error: {}", err),
    }
}

pub fn database_error<T: Debug>(err: T) -> Error {
    tracing::error!(?err, "database error");
    Error {
        code: 2,
        message: "database error".into(),
    }
}

pub fn reqwest_error(err: reqwest::Error) -> Error {
    tracing::error!(%err, "reqwest error");
    Error {
        code: 3,
        message: "reqwest error".into(),
    }
}

pub fn upstream_error() -> Error {
    Error {
        code: 4,
        message: "upstream error".into(),
    }
}

pub fn unexpected_error<T: Debug>(err: T) -> Error {
    tracing::error!(?err, "unexpected error");
    Error {
        code: 5,
        message: "unexpected error".into(),
    }
}

pub fn configuration_error(message: impl Into<String>) -> Error {
    Error {
        code: 6,
        message: message.into(),
    }
}
