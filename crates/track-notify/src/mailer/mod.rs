mod smtp;

pub use smtp::{Mailer, NotifyError, NotifyResult};
