#![forbid(unsafe_code)]
//! splitscan-core: shared kernel for the splitscan connector.
//!
//! Pure types only: the declared output schema, the typed field values a
//! resolved row is made of, the scan-wide batch identity, and the read
//! configuration handed to split openers. There is **no I/O** here.
//!
//! Crates that use this:
//! - splitscan-io: the split batch scanner, batch row resolvers, and the
//!   in-memory / Parquet split adapters.
//! - splitscan-cli: the host driver binary.

pub mod config;
pub mod error;
pub mod id;
pub mod prelude;
pub mod schema;
pub mod types;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
