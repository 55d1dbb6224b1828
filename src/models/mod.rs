//! Request and response bodies of the storefront API.
//!
//! Every model ignores response fields it does not know and leaves unset
//! fields out of request bodies.

pub mod auth;
pub mod category;
pub mod error;
pub mod product;
pub mod user;

pub use auth::{LoginRequest, LoginResponse};
pub use category::Category;
pub use error::{ApiError, ENTITY_NOT_FOUND};
pub use product::Product;
pub use user::{DEFAULT_ROLE, User};
