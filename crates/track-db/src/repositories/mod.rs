//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in track-core.
//! The suppression window arrives as a parameter and is evaluated inside the
//! queries, so genuineness is always computed over the stored rows as they are.

mod error;
mod open_event;
mod track;

pub use open_event::PgOpenEventRepository;
pub use track::PgTrackRepository;

/// Suppression window as fractional seconds for make_interval()
pub(crate) fn suppression_secs(window: chrono::Duration) -> f64 {
    window.num_milliseconds() as f64 / 1000.0
}
