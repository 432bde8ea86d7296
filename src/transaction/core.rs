//! Defines the core transaction model and its database queries.
//!
//! Every mutating operation here runs inside a single SQL transaction that
//! also applies the matching balance delta to the owning account, so an
//! account's stored balance always equals the signed sum of its transactions
//! no matter how requests interleave.

use chrono::{DateTime, Utc};
use rusqlite::{
    Connection, Row, Transaction as SqlTransaction, TransactionBehavior, params,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::DatabaseId,
    transaction::reconcile::{apply_balance_delta, signed_amount},
    user::UserId,
};

/// Whether a transaction adds money to its account or removes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming into the account.
    Income,
    /// Money leaving the account.
    Expense,
}

impl TransactionKind {
    fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(FromSqlError::Other(
                format!("unknown transaction kind {other}").into(),
            )),
        }
    }
}

/// A dated income or expense event affecting exactly one account's balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: DatabaseId,
    /// The account the transaction belongs to.
    pub account_id: DatabaseId,
    /// The category the transaction is filed under.
    pub category_id: DatabaseId,
    /// The magnitude of the transaction. The sign comes from `kind`.
    pub amount: f64,
    /// Whether the amount was earned or spent.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// A free-form note about the transaction.
    pub note: Option<String>,
    /// When the transaction was recorded. Set by the server at creation and
    /// never changed by updates.
    pub date: DateTime<Utc>,
}

/// The data needed to create a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The account the transaction belongs to.
    pub account_id: DatabaseId,
    /// The category the transaction is filed under.
    pub category_id: DatabaseId,
    /// The magnitude of the transaction.
    pub amount: f64,
    /// Whether the amount was earned or spent.
    pub kind: TransactionKind,
    /// A free-form note about the transaction.
    pub note: Option<String>,
}

/// The data for updating a transaction.
///
/// There is no account field: the owning account cannot change, which also
/// means a transaction can never migrate to another user's account.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateTransaction {
    /// The category the transaction is filed under.
    pub category_id: DatabaseId,
    /// The magnitude of the transaction.
    pub amount: f64,
    /// Whether the amount was earned or spent.
    pub kind: TransactionKind,
    /// A free-form note about the transaction.
    pub note: Option<String>,
}

pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            account_id INTEGER NOT NULL,
            category_id INTEGER NOT NULL,
            amount REAL NOT NULL,
            kind TEXT NOT NULL CHECK(kind IN ('income', 'expense')),
            note TEXT,
            date TEXT NOT NULL,
            FOREIGN KEY(account_id) REFERENCES account(id) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_account ON \"transaction\"(account_id);
        CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
    )?;

    Ok(())
}

fn map_row_to_transaction(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        account_id: row.get(1)?,
        category_id: row.get(2)?,
        amount: row.get(3)?,
        kind: row.get(4)?,
        note: row.get(5)?,
        date: row.get(6)?,
    })
}

fn validate_amount(amount: f64) -> Result<(), Error> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount(amount));
    }

    Ok(())
}

/// Check that `account_id` refers to an account owned by `user_id`.
///
/// Another user's account gets the same error as a missing one.
fn ensure_account_owned(
    account_id: DatabaseId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    connection
        .query_row(
            "SELECT id FROM account WHERE id = ?1 AND user_id = ?2",
            params![account_id, user_id.as_i64()],
            |row| row.get::<_, i64>(0),
        )
        .map(|_| ())
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::AccountNotFound,
            error => error.into(),
        })
}

/// Check that `category_id` refers to a category owned by `user_id`.
///
/// Another user's category gets the same error as a missing one.
fn ensure_category_owned(
    category_id: DatabaseId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    connection
        .query_row(
            "SELECT id FROM category WHERE id = ?1 AND user_id = ?2",
            params![category_id, user_id.as_i64()],
            |row| row.get::<_, i64>(0),
        )
        .map(|_| ())
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::CategoryNotFound,
            error => error.into(),
        })
}

/// Create a transaction and adjust the owning account's balance.
///
/// The ownership checks, the insert, and the balance increment run inside a
/// single SQL transaction so that concurrent requests on the same account
/// cannot interleave between them.
///
/// # Errors
/// This function will return an error if:
/// - `amount` is negative or not a number,
/// - `account_id` or `category_id` do not refer to resources owned by
///   `user_id`,
/// - or there is some other SQL error.
pub fn create_transaction(
    data: NewTransaction,
    user_id: UserId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    validate_amount(data.amount)?;

    let sql_transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    ensure_account_owned(data.account_id, user_id, &sql_transaction)?;
    ensure_category_owned(data.category_id, user_id, &sql_transaction)?;

    let date = Utc::now();

    sql_transaction.execute(
        "INSERT INTO \"transaction\" (account_id, category_id, amount, kind, note, date)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            data.account_id,
            data.category_id,
            data.amount,
            data.kind,
            data.note,
            date
        ],
    )?;

    let id = sql_transaction.last_insert_rowid();

    apply_balance_delta(
        data.account_id,
        signed_amount(data.kind, data.amount),
        &sql_transaction,
    )?;

    sql_transaction.commit()?;

    Ok(Transaction {
        id,
        account_id: data.account_id,
        category_id: data.category_id,
        amount: data.amount,
        kind: data.kind,
        note: data.note,
        date,
    })
}

/// Retrieve one of the user's transactions by ID.
///
/// Ownership is checked through the owning account, so another user's
/// transaction is indistinguishable from a missing one.
///
/// # Errors
/// Returns [Error::NotFound] if `transaction_id` does not refer to a
/// transaction owned by `user_id`.
pub fn get_transaction(
    transaction_id: DatabaseId,
    user_id: UserId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(
            "SELECT t.id, t.account_id, t.category_id, t.amount, t.kind, t.note, t.date
            FROM \"transaction\" t
            INNER JOIN account a ON t.account_id = a.id
            WHERE t.id = :id AND a.user_id = :user_id",
        )?
        .query_row(
            &[(":id", &transaction_id), (":user_id", &user_id.as_i64())],
            map_row_to_transaction,
        )
        .map_err(|error| error.into())
}

/// Retrieve all the user's transactions, newest first.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn get_transactions_by_user(
    user_id: UserId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT t.id, t.account_id, t.category_id, t.amount, t.kind, t.note, t.date
            FROM \"transaction\" t
            INNER JOIN account a ON t.account_id = a.id
            WHERE a.user_id = :user_id
            ORDER BY t.date DESC, t.id DESC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row_to_transaction)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Update a transaction and reconcile the owning account's balance.
///
/// The balance receives `new_signed - old_signed`. The reassigned category's
/// ownership is re-checked rather than trusted from the original lookup.
///
/// # Errors
/// This function will return an error if:
/// - `amount` is negative or not a number,
/// - `transaction_id` does not refer to a transaction owned by `user_id`,
/// - `category_id` does not refer to a category owned by `user_id`,
/// - or there is some other SQL error.
pub fn update_transaction(
    transaction_id: DatabaseId,
    data: UpdateTransaction,
    user_id: UserId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    validate_amount(data.amount)?;

    let sql_transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let old = match get_transaction(transaction_id, user_id, &sql_transaction) {
        Ok(transaction) => transaction,
        Err(Error::NotFound) => return Err(Error::UpdateMissingTransaction),
        Err(error) => return Err(error),
    };

    ensure_category_owned(data.category_id, user_id, &sql_transaction)?;

    sql_transaction.execute(
        "UPDATE \"transaction\" SET category_id = ?1, amount = ?2, kind = ?3, note = ?4
        WHERE id = ?5",
        params![
            data.category_id,
            data.amount,
            data.kind,
            data.note,
            transaction_id
        ],
    )?;

    let delta = signed_amount(data.kind, data.amount) - signed_amount(old.kind, old.amount);
    apply_balance_delta(old.account_id, delta, &sql_transaction)?;

    sql_transaction.commit()?;

    Ok(Transaction {
        id: old.id,
        account_id: old.account_id,
        category_id: data.category_id,
        amount: data.amount,
        kind: data.kind,
        note: data.note,
        date: old.date,
    })
}

/// Delete a transaction and reverse its contribution to the owning account's
/// balance.
///
/// # Errors
/// Returns [Error::DeleteMissingTransaction] if `transaction_id` does not
/// refer to a transaction owned by `user_id`.
pub fn delete_transaction(
    transaction_id: DatabaseId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let sql_transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let old = match get_transaction(transaction_id, user_id, &sql_transaction) {
        Ok(transaction) => transaction,
        Err(Error::NotFound) => return Err(Error::DeleteMissingTransaction),
        Err(error) => return Err(error),
    };

    sql_transaction.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1",
        params![transaction_id],
    )?;

    apply_balance_delta(
        old.account_id,
        -signed_amount(old.kind, old.amount),
        &sql_transaction,
    )?;

    sql_transaction.commit()?;

    Ok(())
}
