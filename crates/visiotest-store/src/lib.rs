//! visiotest-store — Record store implementations and configuration.
//!
//! Implements the `RecordStore` trait with a logging mock that mirrors a
//! stubbed backend and a JSON-lines file store for durable local history.

pub mod config;
pub mod error;
pub mod json_file;
pub mod mock;

pub use config::{create_store, load_config, StoreConfig, VisiotestConfig};
pub use error::StoreError;
pub use json_file::JsonFileStore;
pub use mock::MockStore;
