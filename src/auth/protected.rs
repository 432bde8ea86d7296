//! A minimal endpoint for clients to check that their token is still valid.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::auth::Claims;

/// A route handler that echoes the caller's token claims.
pub async fn get_protected(claims: Claims) -> Response {
    Json(json!({
        "message": "Protected data",
        "userId": claims.user_id,
        "email": claims.email,
    }))
    .into_response()
}

#[cfg(test)]
mod protected_endpoint_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{AppState, auth::encode_token, build_router, endpoints, user::UserId};

    fn get_test_state() -> AppState {
        let db_connection =
            Connection::open_in_memory().expect("Could not open database in memory.");

        AppState::new(db_connection, "foobar").expect("Could not create app state.")
    }

    #[tokio::test]
    async fn rejects_missing_header() {
        let server = TestServer::new(build_router(get_test_state()));

        server
            .get(endpoints::PROTECTED)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn rejects_garbage_token() {
        let server = TestServer::new(build_router(get_test_state()));

        server
            .get(endpoints::PROTECTED)
            .authorization_bearer("not.a.token")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn returns_claims_for_valid_token() {
        let state = get_test_state();
        let token = encode_token(UserId::new(42), "foo@bar.baz", &state.jwt_keys.encoding_key)
            .expect("Could not encode token.");
        let server = TestServer::new(build_router(state));

        let response = server
            .get(endpoints::PROTECTED)
            .authorization_bearer(token)
            .await;

        response.assert_status_ok();

        let body = response.json::<serde_json::Value>();
        assert_eq!(body["userId"], 42);
        assert_eq!(body["email"], "foo@bar.baz");
    }
}
