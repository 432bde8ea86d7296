//! Keeps account balances equal to the signed sum of their transactions.
//!
//! Every transaction mutation computes a signed delta and applies it to the
//! owning account's stored balance:
//!
//! - create: `+amount` for income, `-amount` for expenses
//! - update: `new_signed - old_signed`
//! - delete: `-old_signed`
//!
//! The caller is responsible for running the mutation and
//! [apply_balance_delta] inside the same SQL transaction.

use rusqlite::{Connection, params};

use crate::{Error, database_id::DatabaseId, transaction::TransactionKind};

/// A transaction's contribution to its account's balance: positive for
/// income, negative for expenses.
pub fn signed_amount(kind: TransactionKind, amount: f64) -> f64 {
    match kind {
        TransactionKind::Income => amount,
        TransactionKind::Expense => -amount,
    }
}

/// Add `delta` to the stored balance of `account_id`.
///
/// The increment happens in SQL so that two concurrent mutations on the same
/// account cannot lose an update to a stale read in application memory.
///
/// # Errors
/// Returns [Error::AccountNotFound] if `account_id` does not refer to an
/// account.
pub fn apply_balance_delta(
    account_id: DatabaseId,
    delta: f64,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE account SET balance = balance + ?1 WHERE id = ?2",
        params![delta, account_id],
    )?;

    if rows_affected == 0 {
        return Err(Error::AccountNotFound);
    }

    Ok(())
}

#[cfg(test)]
mod signed_amount_tests {
    use crate::transaction::{TransactionKind, signed_amount};

    #[test]
    fn income_counts_positive() {
        assert_eq!(signed_amount(TransactionKind::Income, 30.0), 30.0);
    }

    #[test]
    fn expense_counts_negative() {
        assert_eq!(signed_amount(TransactionKind::Expense, 30.0), -30.0);
    }

    #[test]
    fn update_delta_covers_all_kind_combinations() {
        // Updating a transaction applies `new_signed - old_signed` to the
        // account. Starting from an old transaction of 30, changing to 50:
        let cases = [
            (TransactionKind::Income, TransactionKind::Income, 20.0),
            (TransactionKind::Income, TransactionKind::Expense, -80.0),
            (TransactionKind::Expense, TransactionKind::Income, 80.0),
            (TransactionKind::Expense, TransactionKind::Expense, -20.0),
        ];

        for (old_kind, new_kind, want) in cases {
            let got = signed_amount(new_kind, 50.0) - signed_amount(old_kind, 30.0);
            assert_eq!(
                got, want,
                "update from {old_kind:?} 30 to {new_kind:?} 50: got delta {got}, want {want}"
            );
        }
    }
}
