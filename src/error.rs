use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{checkout::CheckoutStage, response::ErrorBody};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::OrmError(err) => {
                tracing::error!(error = %err, "database operation failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, axum::Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Validation failures that block a checkout step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Please fill in all card details")]
    MissingCardDetails,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Email address is not valid")]
    InvalidEmail,

    #[error("Unknown product {0}")]
    UnknownProduct(i64),

    #[error("Cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        from: CheckoutStage,
        to: CheckoutStage,
    },
}

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),

    #[error("rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("local store io: {0}")]
    Io(#[from] std::io::Error),

    #[error("local store json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("Please enter email and password")]
    MissingCredentials,

    #[error("Login failed: {0}")]
    Rejected(String),

    #[error("Login failed. Please try again.")]
    Remote(#[from] RemoteError),
}
