//! Defines the endpoint for renaming an existing category.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::Claims,
    category::{CategoryName, domain::CategoryData, update_category},
    database_id::DatabaseId,
};

/// The state needed to update a category.
#[derive(Clone)]
pub struct EditCategoryState {
    /// The database connection for managing categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for renaming one of the caller's categories.
pub async fn edit_category_endpoint(
    State(state): State<EditCategoryState>,
    claims: Claims,
    Path(category_id): Path<DatabaseId>,
    payload: Result<Json<CategoryData>, JsonRejection>,
) -> Response {
    let Json(data) = match payload {
        Ok(json) => json,
        Err(rejection) => return Error::InvalidRequestBody(rejection.body_text()).into_response(),
    };

    let name = match CategoryName::new(&data.name) {
        Ok(name) => name,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match update_category(category_id, name, claims.user_id, &connection) {
        Ok(category) => Json(category).into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod edit_category_endpoint_tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::{
        category::Category,
        endpoints::{self, format_endpoint},
        test_utils::{create_test_user, get_test_server, get_test_state},
    };

    #[tokio::test]
    async fn can_rename_category() {
        let state = get_test_state();
        let (_, token) = create_test_user(&state, "foo@bar.baz");
        let server = get_test_server(state);

        let category = server
            .post(endpoints::CATEGORIES)
            .authorization_bearer(&token)
            .json(&json!({ "name": "Original" }))
            .await
            .json::<Category>();

        let response = server
            .put(&format_endpoint(endpoints::CATEGORY, category.id))
            .authorization_bearer(&token)
            .json(&json!({ "name": "Updated" }))
            .await;

        response.assert_status_ok();

        let updated = response.json::<Category>();
        assert_eq!(updated.id, category.id);
        assert_eq!(updated.name.as_ref(), "Updated");
    }

    #[tokio::test]
    async fn rename_fails_for_other_users_category() {
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
            .put(&format_endpoint(endpoints::CATEGORY, category.id))
            .authorization_bearer(&other_token)
            .json(&json!({ "name": "Stolen" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn rename_fails_on_empty_name() {
        let state = get_test_state();
        let (_, token) = create_test_user(&state, "foo@bar.baz");
        let server = get_test_server(state);

        let category = server
            .post(endpoints::CATEGORIES)
            .authorization_bearer(&token)
            .json(&json!({ "name": "Original" }))
            .await
            .json::<Category>();

        server
            .put(&format_endpoint(endpoints::CATEGORY, category.id))
            .authorization_bearer(&token)
            .json(&json!({ "name": "" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
