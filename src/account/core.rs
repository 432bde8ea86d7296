//! Defines the core account model and its database queries.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, Row, Transaction as SqlTransaction, TransactionBehavior, params};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::DatabaseId, user::UserId};

/// A named balance bucket owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// The id for the account.
    pub id: DatabaseId,
    /// The name of the account, e.g. "Cash" or "Checking".
    pub name: String,
    /// The running balance.
    ///
    /// Kept equal to the signed sum of the account's transactions by the
    /// balance reconciliation in the transaction module.
    pub balance: f64,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// The user who owns the account.
    pub user_id: UserId,
}

pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            balance REAL NOT NULL,
            created_at TEXT NOT NULL,
            user_id INTEGER NOT NULL,
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_account(row: &Row) -> Result<Account, rusqlite::Error> {
    let id = row.get(0)?;
    let name = row.get(1)?;
    let balance = row.get(2)?;
    let created_at = row.get(3)?;
    let user_id = UserId::new(row.get(4)?);

    Ok(Account {
        id,
        name,
        balance,
        created_at,
        user_id,
    })
}

/// Create an account owned by `user_id` and return it with its generated ID.
///
/// # Errors
/// This function will return an error if:
/// - `user_id` does not refer to a valid user,
/// - or there is some other SQL error.
pub fn create_account(
    name: &str,
    balance: f64,
    user_id: UserId,
    connection: &Connection,
) -> Result<Account, Error> {
    let created_at = Utc::now();

    connection.execute(
        "INSERT INTO account (name, balance, created_at, user_id) VALUES (?1, ?2, ?3, ?4)",
        params![name, balance, created_at, user_id.as_i64()],
    )?;

    let id = connection.last_insert_rowid();

    Ok(Account {
        id,
        name: name.to_owned(),
        balance,
        created_at,
        user_id,
    })
}

/// Retrieve all of a user's accounts ordered by ID.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn get_accounts_by_user(
    user_id: UserId,
    connection: &Connection,
) -> Result<Vec<Account>, Error> {
    connection
        .prepare(
            "SELECT id, name, balance, created_at, user_id FROM account
            WHERE user_id = :user_id
            ORDER BY id ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row_to_account)?
        .map(|maybe_account| maybe_account.map_err(|error| error.into()))
        .collect()
}

/// Retrieve one of the user's accounts by ID.
///
/// Another user's account is indistinguishable from a missing one.
///
/// # Errors
/// Returns [Error::NotFound] if `account_id` does not refer to an account
/// owned by `user_id`.
pub fn get_account(
    account_id: DatabaseId,
    user_id: UserId,
    connection: &Connection,
) -> Result<Account, Error> {
    connection
        .prepare(
            "SELECT id, name, balance, created_at, user_id FROM account
            WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            &[(":id", &account_id), (":user_id", &user_id.as_i64())],
            map_row_to_account,
        )
        .map_err(|error| error.into())
}

/// Update the name and balance of one of the user's accounts.
///
/// # Errors
/// Returns [Error::UpdateMissingAccount] if `account_id` does not refer to an
/// account owned by `user_id`.
pub fn update_account(
    account_id: DatabaseId,
    name: &str,
    balance: f64,
    user_id: UserId,
    connection: &Connection,
) -> Result<Account, Error> {
    let sql_transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let rows_affected = sql_transaction.execute(
        "UPDATE account SET name = ?1, balance = ?2 WHERE id = ?3 AND user_id = ?4",
        params![name, balance, account_id, user_id.as_i64()],
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingAccount);
    }

    let account = get_account(account_id, user_id, &sql_transaction)?;

    sql_transaction.commit()?;

    Ok(account)
}

/// Delete one of the user's accounts.
///
/// The declared foreign key cascades the deletion to the account's
/// transactions.
///
/// # Errors
/// Returns [Error::DeleteMissingAccount] if `account_id` does not refer to an
/// account owned by `user_id`.
pub fn delete_account(
    account_id: DatabaseId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM account WHERE id = ?1 AND user_id = ?2",
        params![account_id, user_id.as_i64()],
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingAccount);
    }

    Ok(())
}
