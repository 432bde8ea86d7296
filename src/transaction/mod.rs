//! Transaction management: the model, the balance reconciliation that keeps
//! account balances consistent, and the CRUD endpoints.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod get_endpoint;
mod list_endpoint;
mod reconcile;

pub use core::{
    NewTransaction, Transaction, TransactionKind, UpdateTransaction, create_transaction,
    create_transaction_table, delete_transaction, get_transaction, get_transactions_by_user,
    update_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use get_endpoint::get_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;
pub use reconcile::{apply_balance_delta, signed_amount};
