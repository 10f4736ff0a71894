//! Ports layer for the registry subsystem.
//!
//! Defines the hexagonal architecture port traits:
//! - Inbound (Driving) ports: API exposed to message submitters
//! - Outbound (Driven) ports: Storage, fee collection and configuration

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
