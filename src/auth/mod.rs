//! Password hashing and bearer-token handling.

pub mod password;
pub mod token;

pub use token::{Claims, TokenIssuer};
