//! Rows of AirNow hourly files.

pub mod record;

pub use record::RawRecord;
