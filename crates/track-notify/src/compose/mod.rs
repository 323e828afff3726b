mod messages;

pub use messages::{first_open_email, follow_up_email, format_elapsed, EmailContent};
