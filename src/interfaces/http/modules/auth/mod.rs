//! Authentication module: admin login and session introspection

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
