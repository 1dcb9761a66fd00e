//! OAuth client-credentials token handling.

pub mod cache;
pub mod token;

pub use cache::*;
pub use token::*;
