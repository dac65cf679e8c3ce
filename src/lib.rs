pub mod config;
pub mod decode;
pub mod error;
pub mod fetch;
pub mod process;
pub mod render;
pub mod table;

#[cfg(test)]
mod testutil;

pub use config::Config;
pub use decode::{Cell, RawSheet};
pub use error::{DecodeError, IngestError, NetworkError};
pub use fetch::Source;
pub use process::{IngestOutcome, Pipeline};
pub use table::{ColumnDescriptor, NormalizedRow, TableSnapshot, TableState, TableWatcher};
