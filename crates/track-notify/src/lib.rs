//! # track-notify
//!
//! Operator notifications over SMTP: first-open alerts and follow-up
//! reminders for unopened messages.
//!
//! ## Features
//!
//! - **Composition**: pure entity-to-mail functions, unit testable without
//!   a relay
//! - **Transport**: STARTTLS relay via lettre, built once at startup
//!
//! ## Example
//!
//! ```ignore
//! use track_notify::{first_open_email, Mailer};
//!
//! let mailer = Mailer::from_config(&smtp_config)?;
//! let email = first_open_email(&track, &open);
//! mailer.send(&email).await?;
//! ```

pub mod compose;
pub mod mailer;

// Re-export commonly used types
pub use compose::{first_open_email, follow_up_email, format_elapsed, EmailContent};
pub use mailer::{Mailer, NotifyError, NotifyResult};
