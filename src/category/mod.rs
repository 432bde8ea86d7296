//! Category management: the model, its database queries, and the CRUD endpoints.

mod create_endpoint;
mod db;
mod delete_endpoint;
mod domain;
mod edit_endpoint;
mod list_endpoint;

pub use create_endpoint::create_category_endpoint;
pub use db::{
    create_category, create_category_table, delete_category, get_all_categories, update_category,
};
pub use delete_endpoint::delete_category_endpoint;
pub use domain::{Category, CategoryName};
pub use edit_endpoint::edit_category_endpoint;
pub use list_endpoint::list_categories_endpoint;
