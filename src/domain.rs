//! Carrier-agnostic request/response shapes and the structural validator guarding them.

pub mod address;
pub mod id;
pub mod package;
pub mod rate;
pub mod validate;

pub use address::*;
pub use id::*;
pub use package::*;
pub use rate::*;
pub use validate::*;
