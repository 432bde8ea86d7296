//! Defines the endpoint for logging in a user.

use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use email_address::EmailAddress;
use jsonwebtoken::EncodingKey;
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, Error, auth::encode_token, user::get_user_by_email};

/// The state needed to log in a user.
#[derive(Clone)]
pub struct LogInState {
    /// The database connection for looking up users.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The key for signing new auth tokens.
    pub encoding_key: EncodingKey,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            encoding_key: state.jwt_keys.encoding_key.clone(),
        }
    }
}

/// The request body for logging in.
#[derive(Debug, Deserialize)]
pub struct LogInData {
    /// Email entered during sign-in.
    pub email: String,
    /// Password entered during sign-in.
    pub password: String,
}

/// A route handler for logging in a user.
///
/// On success the response carries a signed bearer token that the client sends
/// with every subsequent request.
pub async fn log_in(
    State(state): State<LogInState>,
    payload: Result<Json<LogInData>, JsonRejection>,
) -> Response {
    let Json(data) = match payload {
        Ok(json) => json,
        Err(rejection) => return Error::InvalidRequestBody(rejection.body_text()).into_response(),
    };

    let email = match EmailAddress::from_str(&data.email) {
        Ok(email) => email,
        Err(_) => return Error::InvalidEmail(data.email).into_response(),
    };

    if data.password.is_empty() {
        return Error::InvalidRequestBody("password cannot be empty".to_owned()).into_response();
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let user = match get_user_by_email(&email, &connection) {
        Ok(user) => user,
        // Do not reveal whether the email is registered.
        Err(Error::NotFound) => return Error::InvalidCredentials.into_response(),
        Err(error) => return error.into_response(),
    };

    match user.password_hash.verify(&data.password) {
        Ok(true) => {}
        Ok(false) => return Error::InvalidCredentials.into_response(),
        Err(error) => return Error::HashingError(error.to_string()).into_response(),
    }

    let token = match encode_token(user.id, user.email.as_ref(), &state.encoding_key) {
        Ok(token) => token,
        Err(error) => return error.into_response(),
    };

    Json(json!({
        "message": "Login successful",
        "token": token,
        "user": {
            "id": user.id,
            "name": user.name,
            "email": user.email,
        },
    }))
    .into_response()
}

#[cfg(test)]
mod log_in_endpoint_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{AppState, build_router, endpoints};

    fn get_test_server() -> TestServer {
        let db_connection =
            Connection::open_in_memory().expect("Could not open database in memory.");
        let state = AppState::new(db_connection, "foobar").expect("Could not create app state.");

        TestServer::new(build_router(state))
    }

    async fn register_test_user(server: &TestServer) {
        server
            .post(endpoints::REGISTER)
            .json(&json!({
                "name": "Jo",
                "email": "foo@bar.baz",
                "password": "averysafeandsecurepassword",
            }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    #[tokio::test]
    async fn log_in_succeeds_with_valid_credentials() {
        let server = get_test_server();
        register_test_user(&server).await;

        let response = server
            .post(endpoints::LOG_IN)
            .json(&json!({
                "email": "foo@bar.baz",
                "password": "averysafeandsecurepassword",
            }))
            .await;

        response.assert_status_ok();

        let body = response.json::<Value>();
        assert_eq!(body["message"], "Login successful");
        assert!(!body["token"].as_str().unwrap().is_empty());
        assert_eq!(body["user"]["name"], "Jo");
        assert_eq!(body["user"]["email"], "foo@bar.baz");
    }

    #[tokio::test]
    async fn log_in_fails_with_wrong_password() {
        let server = get_test_server();
        register_test_user(&server).await;

        server
            .post(endpoints::LOG_IN)
            .json(&json!({
                "email": "foo@bar.baz",
                "password": "definitelyNotTheCorrectPassword",
            }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn log_in_fails_with_unknown_email() {
        let server = get_test_server();

        server
            .post(endpoints::LOG_IN)
            .json(&json!({
                "email": "nobody@bar.baz",
                "password": "averysafeandsecurepassword",
            }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn log_in_fails_with_missing_body() {
        let server = get_test_server();

        server
            .post(endpoints::LOG_IN)
            .content_type("application/json")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn token_from_log_in_grants_access_to_protected_routes() {
        let server = get_test_server();
        register_test_user(&server).await;

        let token = server
            .post(endpoints::LOG_IN)
            .json(&json!({
                "email": "foo@bar.baz",
                "password": "averysafeandsecurepassword",
            }))
            .await
            .json::<Value>()["token"]
            .as_str()
            .unwrap()
            .to_owned();

        let response = server
            .get(endpoints::PROTECTED)
            .authorization_bearer(token)
            .await;

        response.assert_status_ok();

        let body = response.json::<Value>();
        assert_eq!(body["email"], "foo@bar.baz");
    }
}
