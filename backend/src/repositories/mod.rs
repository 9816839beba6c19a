//! Data access layer

mod user;

pub use user::{NewUser, UserRecord, UserRepository};
