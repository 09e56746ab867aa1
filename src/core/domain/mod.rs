//! Domain types.

pub mod entry;
pub mod record;

pub use entry::{format_timestamp, parse_metadata, Entry, Metadata};
pub use record::{PlaintextRecord, Record};
