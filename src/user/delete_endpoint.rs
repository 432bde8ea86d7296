//! Defines the endpoint for deleting the calling user and all their data.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde_json::json;

use crate::{AppState, Error, auth::Claims, user::delete_user};

/// The state needed to delete a user.
#[derive(Clone)]
pub struct DeleteUserState {
    /// The database connection for managing users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteUserState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting the calling user.
///
/// Deleting a user cascades to their accounts, categories, and transactions.
/// The user to delete is taken from the bearer token, never from the request.
pub async fn delete_user_endpoint(State(state): State<DeleteUserState>, claims: Claims) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match delete_user(claims.user_id, &connection) {
        Ok(()) => Json(json!({ "message": "User deleted" })).into_response(),
        Err(error) => error.into_response(),
    }
}
