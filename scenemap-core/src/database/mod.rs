//! Record store port and its adapters.

pub mod memory;
#[cfg(feature = "database")]
pub mod postgres;
pub mod ports;

pub use memory::InMemoryRecordStore;
#[cfg(feature = "database")]
pub use postgres::PostgresRecordStore;
pub use ports::{RecordStore, StoreResult, StoredRecord};
