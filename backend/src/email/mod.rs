//! Outbound email dispatch
//!
//! The workflow talks to a narrow [`EmailSender`] trait; the production
//! implementation sends over SMTP via lettre, and tests swap in
//! [`MockEmailSender`].

mod sender;
pub mod templates;

pub use sender::{EmailSender, EmailService, MockEmailSender, SmtpEmailSender};
