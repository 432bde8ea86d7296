//! Helpers shared by the endpoint tests.

use axum_test::TestServer;
use rusqlite::Connection;

use crate::{AppState, auth::encode_token, build_router, user::UserId};

/// Create an [AppState] backed by a fresh in-memory database.
pub fn get_test_state() -> AppState {
    let db_connection = Connection::open_in_memory().expect("Could not open database in memory.");

    AppState::new(db_connection, "foobar").expect("Could not create app state.")
}

/// Start a test server for the full application router.
pub fn get_test_server(state: AppState) -> TestServer {
    TestServer::new(build_router(state))
}

/// Insert a user directly into the database and mint a token for them.
///
/// Bypasses the register endpoint so tests don't pay for password hashing.
pub fn create_test_user(state: &AppState, email: &str) -> (UserId, String) {
    let connection = state.db_connection.lock().unwrap();

    connection
        .execute(
            "INSERT INTO user (name, email, password) VALUES ('Test', ?1, 'not-a-real-hash')",
            [email],
        )
        .expect("could not insert test user");

    let user_id = UserId::new(connection.last_insert_rowid());
    drop(connection);

    let token =
        encode_token(user_id, email, &state.jwt_keys.encoding_key).expect("could not encode token");

    (user_id, token)
}
