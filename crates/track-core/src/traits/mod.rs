//! Repository traits (ports)

mod repositories;

pub use repositories::{
    HourBucket, OpenEventRepository, RepoResult, TrackFilter, TrackRepository, WeekdayBucket,
};
