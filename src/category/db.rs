//! Database operations for categories.

use rusqlite::{Connection, Row, Transaction as SqlTransaction, TransactionBehavior, params};

use crate::{
    Error,
    category::{Category, CategoryName},
    database_id::DatabaseId,
    user::UserId,
};

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            user_id INTEGER NOT NULL,
            UNIQUE(name, user_id),
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_category_user ON category(user_id);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let user_id = UserId::new(row.get(2)?);

    Ok(Category {
        id,
        name: CategoryName::new_unchecked(&raw_name),
        user_id,
    })
}

// Handle the unique (name, user_id) constraint violation.
fn map_duplicate_name_error(error: rusqlite::Error, name: &CategoryName) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
            if sql_error.extended_code == 2067 && desc.contains("category.name") =>
        {
            Error::DuplicateCategoryName(name.to_string())
        }
        error => error.into(),
    }
}

/// Create a category for `user_id` and return it with its generated ID.
///
/// # Errors
/// This function will return an error if:
/// - the user already has a category with this name,
/// - `user_id` does not refer to a valid user,
/// - or there is some other SQL error.
pub fn create_category(
    name: CategoryName,
    user_id: UserId,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .execute(
            "INSERT INTO category (name, user_id) VALUES (?1, ?2)",
            (name.as_ref(), user_id.as_i64()),
        )
        .map_err(|error| map_duplicate_name_error(error, &name))?;

    let id = connection.last_insert_rowid();

    Ok(Category { id, name, user_id })
}

/// Retrieve all the user's categories ordered alphabetically by name.
///
/// # Errors
/// This function will return an error if there is an SQL error.
pub fn get_all_categories(
    user_id: UserId,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, name, user_id FROM category
            WHERE user_id = :user_id
            ORDER BY name ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Rename one of the user's categories.
///
/// Another user's category is indistinguishable from a missing one.
///
/// # Errors
/// Returns [Error::UpdateMissingCategory] if `category_id` does not refer to
/// a category owned by `user_id`, or [Error::DuplicateCategoryName] if the
/// new name is already taken.
pub fn update_category(
    category_id: DatabaseId,
    new_name: CategoryName,
    user_id: UserId,
    connection: &Connection,
) -> Result<Category, Error> {
    let rows_affected = connection
        .execute(
            "UPDATE category SET name = ?1 WHERE id = ?2 AND user_id = ?3",
            (new_name.as_ref(), category_id, user_id.as_i64()),
        )
        .map_err(|error| map_duplicate_name_error(error, &new_name))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingCategory);
    }

    Ok(Category {
        id: category_id,
        name: new_name,
        user_id,
    })
}

/// Delete one of the user's categories along with the transactions filed
/// under it.
///
/// The doomed transactions' contributions are reversed out of their accounts'
/// balances before the rows go, so every account balance still equals the
/// signed sum of its remaining transactions afterwards. The whole sequence
/// runs inside one SQL transaction.
///
/// # Errors
/// Returns [Error::DeleteMissingCategory] if `category_id` does not refer to
/// a category owned by `user_id`.
pub fn delete_category(
    category_id: DatabaseId,
    user_id: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let sql_transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let owned = sql_transaction.query_row(
        "SELECT id FROM category WHERE id = ?1 AND user_id = ?2",
        params![category_id, user_id.as_i64()],
        |row| row.get::<_, i64>(0),
    );

    match owned {
        Ok(_) => {}
        Err(rusqlite::Error::QueryReturnedNoRows) => return Err(Error::DeleteMissingCategory),
        Err(error) => return Err(error.into()),
    }

    sql_transaction.execute(
        "UPDATE account
        SET balance = balance - (
            SELECT COALESCE(SUM(CASE WHEN t.kind = 'income' THEN t.amount ELSE -t.amount END), 0)
            FROM \"transaction\" t
            WHERE t.category_id = ?1 AND t.account_id = account.id
        )
        WHERE id IN (SELECT account_id FROM \"transaction\" WHERE category_id = ?1)",
        params![category_id],
    )?;

    sql_transaction.execute(
        "DELETE FROM \"transaction\" WHERE category_id = ?1",
        params![category_id],
    )?;

    sql_transaction.execute("DELETE FROM category WHERE id = ?1", params![category_id])?;

    sql_transaction.commit()?;

    Ok(())
}
