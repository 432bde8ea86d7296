//! User authentication: registration, login, and bearer-token verification.

mod log_in;
mod protected;
mod register;
mod token;

pub use log_in::log_in;
pub use protected::get_protected;
pub use register::register_user;
pub use token::{Claims, TOKEN_DURATION_DAYS, decode_token, encode_token};
