//! Defines the endpoint for deleting an account.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde_json::json;

use crate::{AppState, Error, account::delete_account, auth::Claims, database_id::DatabaseId};

/// The state needed to delete an account.
#[derive(Clone)]
pub struct DeleteAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting one of the caller's accounts.
///
/// The account's transactions are deleted with it.
pub async fn delete_account_endpoint(
    State(state): State<DeleteAccountState>,
    claims: Claims,
    Path(account_id): Path<DatabaseId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match delete_account(account_id, claims.user_id, &connection) {
        Ok(()) => Json(json!({ "message": "Account deleted" })).into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod delete_account_endpoint_tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{
        account::Account,
        category::Category,
        endpoints::{self, format_endpoint},
        test_utils::{create_test_user, get_test_server, get_test_state},
        transaction::Transaction,
    };

    #[tokio::test]
    async fn can_delete_account() {
        let state = get_test_state();
        let (_, token) = create_test_user(&state, "foo@bar.baz");
        let server = get_test_server(state);

        let account = server
            .post(endpoints::ACCOUNTS)
            .authorization_bearer(&token)
            .json(&json!({ "name": "Cash", "balance": 100.0 }))
            .await
            .json::<Account>();

        server
            .delete(&format_endpoint(endpoints::ACCOUNT, account.id))
            .authorization_bearer(&token)
            .await
            .assert_status_ok();

        let accounts = server
            .get(endpoints::ACCOUNTS)
            .authorization_bearer(&token)
            .await
            .json::<Vec<Account>>();
        assert_eq!(accounts, []);
    }

    #[tokio::test]
    async fn delete_account_cascades_to_its_transactions() {
        let state = get_test_state();
        let (_, token) = create_test_user(&state, "foo@bar.baz");
        let server = get_test_server(state);

        let account = server
            .post(endpoints::ACCOUNTS)
            .authorization_bearer(&token)
            .json(&json!({ "name": "Cash", "balance": 100.0 }))
            .await
            .json::<Account>();
        let category = server
            .post(endpoints::CATEGORIES)
            .authorization_bearer(&token)
            .json(&json!({ "name": "Food" }))
            .await
            .json::<Category>();
        server
            .post(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .json(&json!({
                "accountId": account.id,
                "categoryId": category.id,
                "amount": 30.0,
                "type": "expense",
            }))
            .await
            .assert_status(StatusCode::CREATED);

        server
            .delete(&format_endpoint(endpoints::ACCOUNT, account.id))
            .authorization_bearer(&token)
            .await
            .assert_status_ok();

        let transactions = server
            .get(endpoints::TRANSACTIONS)
            .authorization_bearer(&token)
            .await
            .json::<Vec<Transaction>>();
        assert_eq!(transactions, []);
    }

    #[tokio::test]
    async fn delete_account_fails_for_other_users_account() {
        let state = get_test_state();
        let (_, token) = create_test_user(&state, "foo@bar.baz");
        let (_, other_token) = create_test_user(&state, "other@bar.baz");
        let server = get_test_server(state);

        let account = server
            .post(endpoints::ACCOUNTS)
            .authorization_bearer(&token)
            .json(&json!({ "name": "Cash", "balance": 100.0 }))
            .await
            .json::<Account>();

        server
            .delete(&format_endpoint(endpoints::ACCOUNT, account.id))
            .authorization_bearer(&other_token)
            .await
            .assert_status(StatusCode::NOT_FOUND);

        // The account is still there for its owner.
        let accounts = server
            .get(endpoints::ACCOUNTS)
            .authorization_bearer(&token)
            .await
            .json::<Vec<Account>>();
        assert_eq!(accounts.len(), 1);
    }
}
