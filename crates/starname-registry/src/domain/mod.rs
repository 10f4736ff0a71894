//! # Domain Layer - Registry Subsystem
//!
//! Pure business logic with no I/O of its own. Storage is reached only
//! through the outbound port traits.
//!
//! ## Components
//!
//! - `entities`: Domain, Account, Resource, AccountKey, Coin
//! - `messages`: the twelve registry operations and `RegistryMsg`
//! - `config` / `fees`: RegistryConfig, Pattern, FeeSchedule, RegistryGenesisConfig
//! - `decimal`: fixed-point `Dec` used for fee parameters
//! - `domain_controller` / `account_controller`: ordered validation chains
//! - `fee_controller`: fee computation
//! - `errors`: RegistryError and its classification
//!
//! ## Data Types
//!
//! - Address: `[u8; 20]`
//! - Timestamp: unix seconds (`u64`), always supplied by the caller

pub mod account_controller;
pub mod config;
pub mod decimal;
pub mod domain_controller;
pub mod entities;
pub mod errors;
pub mod fee_controller;
pub mod fees;
pub mod messages;

pub use account_controller::AccountController;
pub use config::*;
pub use decimal::{Dec, DecError, DEC_PRECISION};
pub use domain_controller::DomainController;
pub use entities::*;
pub use errors::*;
pub use fee_controller::FeeController;
pub use fees::FeeSchedule;
pub use messages::*;
