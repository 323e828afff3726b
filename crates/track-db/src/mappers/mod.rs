//! Mappers between database models and domain entities
//!
//! - `From<Model> for Entity`: Convert database rows to domain objects
//! - `*Insert` structs: Prepare entity data for database operations

mod open_event;
mod track;

pub use open_event::OpenEventInsert;
