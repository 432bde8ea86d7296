//! The user model, its database queries, and the account-deletion endpoint.

mod core;
mod delete_endpoint;

pub use core::{
    User, UserId, create_user_table, delete_user, get_user_by_email, insert_user, map_row_to_user,
};
pub use delete_endpoint::delete_user_endpoint;
