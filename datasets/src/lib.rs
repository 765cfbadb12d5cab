//! `shelfcast-datasets` loads retail sales tables into memory.
//!
//! ## The Big Picture
//!
//! `shelfcast-datasets` is a crate in the `shelfcast` workspace, a toolkit to forecast retail
//! demand from historical sales. It owns the tabular side of the workspace: a CSV file with a
//! header row becomes a [`SalesFrame`], an ordered set of named columns. No schema is enforced
//! at load time, so extra columns are carried along and missing ones only surface once a
//! consumer asks for them.
//!
//! ## Current state
//!
//! * [`load_csv`] / [`read_csv`] read a table, [`write_csv`] writes one back
//! * [`generate::sales`] (feature `generate`) produces a synthetic daily sales history for tests
//!   and benchmarks
//!
//! The generator and its tests are only compiled with the feature enabled, run them with
//! `cargo test -p shelfcast-datasets --features generate`.
//!
//! ## Example
//!
//! ```no_run
//! let frame = shelfcast_datasets::load_csv("data/sales.csv").unwrap();
//! println!("Loaded {} records", frame.height());
//! ```
mod error;
mod frame;
mod io;

#[cfg(feature = "generate")]
pub mod generate;

pub use error::{DatasetError, Result};
pub use frame::{Cell, Column, SalesFrame};
pub use io::{load_csv, read_csv, write_csv};
