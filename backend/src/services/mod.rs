//! Business logic layer

mod auth;

pub use auth::AuthService;
