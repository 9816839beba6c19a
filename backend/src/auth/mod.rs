//! Authentication primitives
//!
//! JWT issuance/verification, bcrypt password hashing, and the session-token
//! extractor for protected routes.

mod jwt;
mod middleware;
mod password;

pub use jwt::{JwtService, SessionClaims, TokenError, VerificationClaims};
pub use middleware::SessionUser;
pub use password::PasswordService;
