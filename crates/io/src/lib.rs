// Source acquisition: ledger exports and the blocklist report

pub mod batch;
pub mod csv;
pub mod error;
pub mod json;
pub mod sources;
pub mod text;
pub mod xlsx;

pub use error::IoError;
pub use sources::{collect_sources, read_tables};
