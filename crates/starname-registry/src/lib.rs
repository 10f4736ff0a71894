//! # Starname Registry
//!
//! A name registry of *domains* containing *accounts*. Accounts resolve to
//! owner-controlled resources, carry certificates and metadata, and both
//! domains and accounts expire, renew and change hands under per-domain
//! rules. Every operation charges a fee.
//!
//! ## Message Flow
//!
//! ```text
//! RegistryMsg ──validate_basic──→ DomainController ──→ AccountController
//!                                     (checks)            (checks)
//!                                                            ↓
//!                      store ←──commit── Executors ←── FeeController ──→ FeeSink
//!                                      (WriteSet)                      (reserve)
//!
//! The reserved fee is committed after the store commit succeeds and
//! released back to the payer on any failure.
//! ```
//!
//! ## Domain Invariants
//!
//! | Invariant | Description |
//! |-----------|-------------|
//! | Paired empty account | Every domain owns exactly one empty-name account, created with it |
//! | Closed accounts | Accounts of closed domains never expire on their own |
//! | Renewal ceiling | `valid_until` never exceeds `now + period * (count_max + 1)` |
//! | Deterministic fees | The fee depends only on the message, the domain and the schedule |
//! | Fee floor | No fee is below the configured default |
//! | Atomic messages | A message applies all of its writes and its fee, or nothing |
//! | Caller clock | Time is always passed in, never read |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Entities, messages, configuration, controllers, fee controller
//! - `ports/` - Inbound API and outbound store, fee sink and config traits
//! - `executor/` - Domain and account state mutations
//! - `adapters/` - In-memory store, write set, balance ledger, static config
//! - `service/` - Message dispatch and queries
//! - `events` - Events emitted per delivered message
//!
//! ## Usage
//!
//! ```ignore
//! use starname_registry::*;
//!
//! let mut service = RegistryService::new(RegistryDependencies {
//!     store: InMemoryRegistryStore::new(),
//!     fee_sink: BalanceLedger::new().with_balance(alice, Coin::new("tiov", 1_000)),
//!     config: StaticConfigProvider::default(),
//! });
//!
//! let outcome = service.deliver(
//!     MsgRegisterDomain {
//!         name: "iov-one".into(),
//!         admin: alice,
//!         broker: None,
//!         domain_type: DomainType::Closed,
//!         payer: None,
//!     }
//!     .into(),
//!     now,
//! )?;
//! ```

pub mod adapters;
pub mod domain;
pub mod events;
pub mod executor;
pub mod ports;
pub mod service;

// Re-export key types for convenience
pub use adapters::{BalanceLedger, InMemoryRegistryStore, StaticConfigProvider, WriteBatch, WriteSet};
pub use domain::*;
pub use events::{MsgOutcome, RegistryEvent};
pub use executor::{AccountExecutor, DomainExecutor};
pub use ports::inbound::{PageRequest, RegistryApi, RegistryQueryApi};
pub use ports::outbound::{
    AccountStore, ConfigProvider, DomainStore, FeeReceipt, FeeSink, RegistryStore,
};
pub use service::{RegistryDependencies, RegistryQueries, RegistryService};
