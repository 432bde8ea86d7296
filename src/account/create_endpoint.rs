//! Defines the endpoint for creating a new account.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{AppState, Error, account::create_account, auth::Claims};

/// The state needed to create an account.
#[derive(Clone)]
pub struct CreateAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for creating or updating an account.
#[derive(Debug, Deserialize)]
pub struct AccountData {
    /// The account name.
    pub name: String,
    /// The balance in dollars.
    pub balance: f64,
}

/// A route handler for creating a new account owned by the caller.
pub async fn create_account_endpoint(
    State(state): State<CreateAccountState>,
    claims: Claims,
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

    match create_account(data.name.trim(), data.balance, claims.user_id, &connection) {
        Ok(account) => (StatusCode::CREATED, Json(account)).into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod create_account_endpoint_tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{
        account::Account,
        endpoints,
        test_utils::{create_test_user, get_test_server, get_test_state},
    };

    #[tokio::test]
    async fn can_create_account() {
        let state = get_test_state();
        let (user_id, token) = create_test_user(&state, "foo@bar.baz");
        let server = get_test_server(state);

        let response = server
            .post(endpoints::ACCOUNTS)
            .authorization_bearer(token)
            .json(&json!({ "name": "Cash", "balance": 100.0 }))
            .await;

        response.assert_status(StatusCode::CREATED);

        let account = response.json::<Account>();
        assert!(account.id > 0);
        assert_eq!(account.name, "Cash");
        assert_eq!(account.balance, 100.0);
        assert_eq!(account.user_id, user_id);
    }

    #[tokio::test]
    async fn create_account_fails_on_missing_balance() {
        let state = get_test_state();
        let (_, token) = create_test_user(&state, "foo@bar.baz");
        let server = get_test_server(state);

        server
            .post(endpoints::ACCOUNTS)
            .authorization_bearer(token)
            .json(&json!({ "name": "Cash" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_account_fails_on_blank_name() {
        let state = get_test_state();
        let (_, token) = create_test_user(&state, "foo@bar.baz");
        let server = get_test_server(state);

        server
            .post(endpoints::ACCOUNTS)
            .authorization_bearer(token)
            .json(&json!({ "name": " ", "balance": 0.0 }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_account_rejects_anonymous_requests() {
        let server = get_test_server(get_test_state());

        server
            .post(endpoints::ACCOUNTS)
            .json(&json!({ "name": "Cash", "balance": 100.0 }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
