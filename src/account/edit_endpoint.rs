//! Defines the endpoint for updating an existing account.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{core::update_account, create_endpoint::AccountData},
    auth::Claims,
    database_id::DatabaseId,
};

/// The state needed to update an account.
#[derive(Clone)]
pub struct EditAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for updating the name and balance of one of the caller's
/// accounts.
pub async fn edit_account_endpoint(
    State(state): State<EditAccountState>,
    claims: Claims,
    Path(account_id): Path<DatabaseId>,
    payload: Result<Json<AccountData>, JsonRejection>,
) -> Response {
    let Json(data) = match payload {
        Ok(json) => json,
        Err(rejection) => return Error::InvalidRequestBody(rejection.body_text()).into_response(),
    };

    if data.name.trim().is_empty() {
        return Error::EmptyAccountName.into_response();
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match update_account(
        account_id,
        data.name.trim(),
        data.balance,
        claims.user_id,
        &connection,
    ) {
        Ok(account) => Json(account).into_response(),
        Err(error) => error.into_response(),
    }
}
