//! Domain entities - core business objects

mod open_event;
mod track;

pub use open_event::{NewOpenEvent, OpenEvent};
pub use track::{RecipientRollup, TrackOpenSummary, TrackedMessage};
