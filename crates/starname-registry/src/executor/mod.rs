//! # Executors
//!
//! State mutations for domains and accounts. Executors assume every
//! precondition has already been checked by the controllers and only fail
//! when the underlying store does.

pub mod account;
pub mod domain;

pub use account::AccountExecutor;
pub use domain::DomainExecutor;
