//! Defines the endpoint for creating a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::Claims,
    database_id::DatabaseId,
    transaction::{NewTransaction, TransactionKind, create_transaction},
};

/// The state needed to create a transaction.
#[derive(Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for creating a transaction.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionData {
    /// The account the transaction belongs to.
    pub account_id: DatabaseId,
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

/// A route handler for creating a new transaction.
///
/// The owning account's balance is adjusted in the same atomic unit as the
/// insert.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    claims: Claims,
    payload: Result<Json<TransactionData>, JsonRejection>,
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

    let new_transaction = NewTransaction {
        account_id: data.account_id,
        category_id: data.category_id,
        amount: data.amount,
        kind: data.kind,
        note: data.note,
    };

    match create_transaction(new_transaction, claims.user_id, &connection) {
        Ok(transaction) => (StatusCode::CREATED, Json(transaction)).into_response(),
        Err(error) => error.into_response(),
    }
}
