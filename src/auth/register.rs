//! Defines the endpoint for registering a new user.

use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use email_address::EmailAddress;
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState, Error,
    password::{PasswordHash, ValidatedPassword},
    user::insert_user,
};

/// The state needed to register a user.
#[derive(Clone)]
pub struct RegisterState {
    /// The database connection for managing users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegisterState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for registering a user.
#[derive(Debug, Deserialize)]
pub struct RegisterData {
    /// The display name for the new user.
    pub name: String,
    /// The email address the user will log in with.
    pub email: String,
    /// The plain text password. It is hashed before storage.
    pub password: String,
}

/// A route handler for registering a new user.
pub async fn register_user(
    State(state): State<RegisterState>,
    payload: Result<Json<RegisterData>, JsonRejection>,
) -> Response {
    let Json(data) = match payload {
        Ok(json) => json,
        Err(rejection) => return Error::InvalidRequestBody(rejection.body_text()).into_response(),
    };

    if data.name.trim().is_empty() {
        return Error::EmptyUserName.into_response();
    }

    let email = match EmailAddress::from_str(&data.email) {
        Ok(email) => email,
        Err(_) => return Error::InvalidEmail(data.email).into_response(),
    };

    let password = match ValidatedPassword::new(&data.password) {
        Ok(password) => password,
        Err(error) => return error.into_response(),
    };

    let password_hash = match PasswordHash::new(password, PasswordHash::DEFAULT_COST) {
        Ok(password_hash) => password_hash,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match insert_user(data.name.trim(), &email, &password_hash, &connection) {
        Ok(user) => (
            StatusCode::CREATED,
            Json(json!({ "message": "User created", "userId": user.id })),
        )
            .into_response(),
        Err(error) => error.into_response(),
    }
}
