//! Fintrack is a personal finance tracker served as an HTTP JSON API.
//!
//! Users register and log in with an email and password, create accounts and
//! categories, and record income and expense transactions against their
//! accounts. Each account keeps a running balance that is adjusted whenever
//! one of its transactions is created, updated or deleted.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod account;
mod app_state;
mod auth;
mod category;
mod database_id;
mod db;
mod endpoints;
mod logging;
mod password;
mod routing;
#[cfg(test)]
mod test_utils;
mod transaction;
mod user;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use password::{MIN_PASSWORD_LENGTH, PasswordHash, ValidatedPassword};
pub use routing::build_router;
pub use user::{User, UserId};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an email/password combination that does not match a
    /// registered user.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The request did not carry a bearer token.
    #[error("no token provided")]
    MissingToken,

    /// The bearer token could not be verified, or it has expired.
    #[error("invalid or expired token")]
    InvalidToken,

    /// Signing a new auth token failed.
    ///
    /// This error should only be logged on the server; the client receives a
    /// generic internal server error.
    #[error("could not create auth token")]
    TokenCreation,

    /// An unexpected error occurred in the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The string used to register or log in is not a valid email address.
    #[error("\"{0}\" is not a valid email address")]
    InvalidEmail(String),

    /// The password used to register a user is shorter than
    /// [MIN_PASSWORD_LENGTH].
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters long")]
    PasswordTooShort,

    /// An empty string was used as the display name when registering a user.
    #[error("name cannot be empty")]
    EmptyUserName,

    /// The email used to register a user already belongs to another user.
    #[error("email already used")]
    DuplicateEmail,

    /// An empty string was used to create or rename an account.
    #[error("account name cannot be empty")]
    EmptyAccountName,

    /// An empty string was used to create or rename a category.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// The category name already exists for this user.
    #[error("the category \"{0}\" already exists")]
    DuplicateCategoryName(String),

    /// A transaction amount that is negative or not a number.
    ///
    /// Amounts are magnitudes; the sign comes from the transaction type.
    #[error("{0} is not a valid transaction amount")]
    InvalidAmount(f64),

    /// The request body could not be parsed, or required fields are missing.
    #[error("invalid request body: {0}")]
    InvalidRequestBody(String),

    /// The requested resource was not found.
    ///
    /// This error is also returned for resources owned by another user so
    /// that their existence is not leaked.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The account ID does not refer to an account owned by the caller.
    #[error("account not found")]
    AccountNotFound,

    /// The category ID does not refer to a category owned by the caller.
    #[error("category not found")]
    CategoryNotFound,

    /// Tried to update an account that does not exist
    #[error("tried to update an account that is not in the database")]
    UpdateMissingAccount,

    /// Tried to delete an account that does not exist
    #[error("tried to delete an account that is not in the database")]
    DeleteMissingAccount,

    /// Tried to update a category that does not exist
    #[error("tried to update a category that is not in the database")]
    UpdateMissingCategory,

    /// Tried to delete a category that does not exist
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("user.email") =>
            {
                Error::DuplicateEmail
            }
            // Code 787 occurs when a FOREIGN KEY constraint failed. The row a
            // write referred to is gone, e.g. a stale token for a deleted user.
            rusqlite::Error::SqliteFailure(sql_error, Some(_))
                if sql_error.extended_code == 787 =>
            {
                Error::NotFound
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => Error::SqlError(error),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self {
            Error::InvalidCredentials | Error::MissingToken | Error::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            Error::InvalidEmail(_)
            | Error::PasswordTooShort
            | Error::EmptyUserName
            | Error::EmptyAccountName
            | Error::EmptyCategoryName
            | Error::DuplicateCategoryName(_)
            | Error::InvalidAmount(_)
            | Error::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Error::DuplicateEmail => StatusCode::CONFLICT,
            Error::NotFound
            | Error::AccountNotFound
            | Error::CategoryNotFound
            | Error::UpdateMissingAccount
            | Error::DeleteMissingAccount
            | Error::UpdateMissingCategory
            | Error::DeleteMissingCategory
            | Error::UpdateMissingTransaction
            | Error::DeleteMissingTransaction => StatusCode::NOT_FOUND,
            Error::TokenCreation
            | Error::HashingError(_)
            | Error::DatabaseLockError
            | Error::SqlError(_) => {
                tracing::error!("an unexpected error occurred: {self}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Internal errors are not intended to be shown to the client.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "internal server error".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod error_response_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::Error;

    #[test]
    fn not_owned_resources_are_indistinguishable_from_absent_ones() {
        let response = Error::NotFound.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let response = Error::HashingError("bcrypt exploded".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn duplicate_email_maps_to_conflict() {
        let response = Error::DuplicateEmail.into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
