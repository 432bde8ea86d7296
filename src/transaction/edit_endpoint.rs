//! Defines the endpoint for updating an existing transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::Claims,
    database_id::DatabaseId,
    transaction::{TransactionKind, UpdateTransaction, update_transaction},
};

/// The state needed to update a transaction.
#[derive(Clone)]
pub struct EditTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for updating a transaction.
///
/// The owning account cannot be changed, so there is no account field.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdateData {
    /// The category the transaction is filed under.
    pub category_id: DatabaseId,
    /// The magnitude of the transaction.
    pub amount: f64,
    /// Whether the amount was earned or spent.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// An optional free-form note.
    #[serde(default)]
    pub note: Option<String>,
}

/// A route handler for updating one of the caller's transactions.
///
/// The owning account's balance is reconciled by `new_signed - old_signed` in
/// the same atomic unit as the update.
pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    claims: Claims,
    Path(transaction_id): Path<DatabaseId>,
    payload: Result<Json<TransactionUpdateData>, JsonRejection>,
) -> Response {
    let Json(data) = match payload {
        Ok(json) => json,
        Err(rejection) => return Error::InvalidRequestBody(rejection.body_text()).into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let update = UpdateTransaction {
        category_id: data.category_id,
        amount: data.amount,
        kind: data.kind,
        note: data.note,
    };

    match update_transaction(transaction_id, update, claims.user_id, &connection) {
        Ok(transaction) => Json(transaction).into_response(),
        Err(error) => error.into_response(),
    }
}
