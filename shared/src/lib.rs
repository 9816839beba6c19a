//! Portal Auth Shared Library
//!
//! This crate contains the wire types shared between the backend and any
//! client of the authentication API.

pub mod types;

// Re-export commonly used items
pub use types::*;
