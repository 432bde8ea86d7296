//! Defines the endpoint for deleting a category.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde_json::json;

use crate::{AppState, Error, auth::Claims, category::delete_category, database_id::DatabaseId};

/// The state needed to delete a category.
#[derive(Clone)]
pub struct DeleteCategoryState {
    /// The database connection for managing categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting one of the caller's categories.
///
/// Transactions filed under the category are deleted with it, with their
/// balance contributions reversed first.
pub async fn delete_category_endpoint(
    State(state): State<DeleteCategoryState>,
    claims: Claims,
    Path(category_id): Path<DatabaseId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match delete_category(category_id, claims.user_id, &connection) {
        Ok(()) => Json(json!({ "message": "Category deleted" })).into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod delete_category_endpoint_tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{
        account::Account,
        category::Category,
        endpoints::{self, format_endpoint},
        test_utils::{create_test_user, get_test_server, get_test_state},
    };

    #[tokio::test]
    async fn can_delete_category() {
        let state = get_test_state();
        let (_, token) = create_test_user(&state, "foo@bar.baz");
        let server = get_test_server(state);

        let category = server
            .post(endpoints::CATEGORIES)
            .authorization_bearer(&token)
            .json(&json!({ "name": "Groceries" }))
            .await
            .json::<Category>();

        server
            .delete(&format_endpoint(endpoints::CATEGORY, category.id))
            .authorization_bearer(&token)
            .await
            .assert_status_ok();

        let categories = server
            .get(endpoints::CATEGORIES)
            .authorization_bearer(&token)
            .await
            .json::<Vec<Category>>();
        assert_eq!(categories, []);
    }

    #[tokio::test]
    async fn delete_category_restores_account_balances() {
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
            .json(&json!({ "name": "Eating Out" }))
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
            .delete(&format_endpoint(endpoints::CATEGORY, category.id))
            .authorization_bearer(&token)
            .await
            .assert_status_ok();

        let accounts = server
            .get(endpoints::ACCOUNTS)
            .authorization_bearer(&token)
            .await
            .json::<Vec<Account>>();
        assert_eq!(accounts[0].balance, 100.0);
    }

    #[tokio::test]
    async fn delete_category_fails_for_other_users_category() {
        let state = get_test_state();
        let (_, token) = create_test_user(&state, "foo@bar.baz");
        let (_, other_token) = create_test_user(&state, "other@bar.baz");
        let server = get_test_server(state);

        let category = server
            .post(endpoints::CATEGORIES)
            .authorization_bearer(&token)
            .json(&json!({ "name": "Mine" }))
            .await
            .json::<Category>();

        server
            .delete(&format_endpoint(endpoints::CATEGORY, category.id))
            .authorization_bearer(&other_token)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
