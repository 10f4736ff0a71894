//! # Adapters Module
//!
//! Concrete implementations of the outbound ports.
//!
//! ## Modules
//!
//! - `memory_store`: ordered in-memory registry store with secondary indexes
//! - `write_set`: per-message write buffer committed only on success
//! - `balance_ledger`: in-memory fee sink
//! - `static_config`: validated, immutable configuration provider

pub mod balance_ledger;
pub mod memory_store;
pub mod static_config;
pub mod write_set;

pub use balance_ledger::BalanceLedger;
pub use memory_store::InMemoryRegistryStore;
pub use static_config::StaticConfigProvider;
pub use write_set::{WriteBatch, WriteOp, WriteSet};
