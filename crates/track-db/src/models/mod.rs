//! Database models - direct representations of table rows

mod open_event;
mod track;

pub use open_event::{HourBucketModel, OpenEventModel, WeekdayBucketModel};
pub use track::{RecipientRollupModel, TrackModel, TrackSummaryModel};
