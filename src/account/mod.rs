//! Account management: the model, its database queries, and the CRUD endpoints.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;

pub use core::{
    Account, create_account, create_account_table, delete_account, get_account,
    get_accounts_by_user, map_row_to_account, update_account,
};
pub use create_endpoint::create_account_endpoint;
pub use delete_endpoint::delete_account_endpoint;
pub use edit_endpoint::edit_account_endpoint;
pub use list_endpoint::list_accounts_endpoint;
