//! Roster loading and publication
//!
//! - `source`: CSV discovery and parsing, shared with encounter loading
//! - `store`: the player roster and its atomically replaced snapshot

pub mod source;
mod store;

pub use source::{discover, parse_records, read_source, SOURCE_EXTENSION};
pub use store::{Roster, RosterStore};
