//! Defines the endpoint for deleting a transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState, Error, auth::Claims, database_id::DatabaseId, transaction::delete_transaction,
};

/// The state needed to delete a transaction.
#[derive(Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting one of the caller's transactions.
///
/// The transaction's signed contribution is reversed out of the owning
/// account's balance in the same atomic unit as the delete.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    claims: Claims,
    Path(transaction_id): Path<DatabaseId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match delete_transaction(transaction_id, claims.user_id, &connection) {
        Ok(()) => Json(json!({ "message": "Transaction deleted" })).into_response(),
        Err(error) => error.into_response(),
    }
}
