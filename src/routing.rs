//! Application router configuration mapping each endpoint to its handler.

use axum::{
    Router,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};

use crate::{
    AppState, Error,
    account::{
        create_account_endpoint, delete_account_endpoint, edit_account_endpoint,
        list_accounts_endpoint,
    },
    auth::{get_protected, log_in, register_user},
    category::{
        create_category_endpoint, delete_category_endpoint, edit_category_endpoint,
        list_categories_endpoint,
    },
    endpoints,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_transaction_endpoint, list_transactions_endpoint,
    },
    user::delete_user_endpoint,
};

/// Return a router with all the app's routes.
///
/// There is no auth middleware layer: protected handlers declare a `Claims`
/// argument, which rejects requests without a valid bearer token before the
/// handler body runs.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::REGISTER, post(register_user))
        .route(endpoints::LOG_IN, post(log_in))
        .route(endpoints::PROTECTED, get(get_protected))
        .route(
            endpoints::ACCOUNTS,
            get(list_accounts_endpoint).post(create_account_endpoint),
        )
        .route(
            endpoints::ACCOUNT,
            put(edit_account_endpoint).delete(delete_account_endpoint),
        )
        .route(
            endpoints::CATEGORIES,
            get(list_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            put(edit_category_endpoint).delete(delete_category_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(edit_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(endpoints::DELETE_USER, delete(delete_user_endpoint))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Unknown paths get the same JSON error body as missing resources.
async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}
