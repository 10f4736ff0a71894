//! # Inbound Ports (Driving Ports)
//!
//! The API the registry exposes to message submitters and readers.

use crate::domain::{Account, Address, Domain, RegistryError, RegistryMsg, Timestamp};
use crate::events::MsgOutcome;
use serde::{Deserialize, Serialize};

/// Default page size for listing queries.
pub const DEFAULT_PAGE_LIMIT: usize = 100;

/// Offset/limit pagination over results ordered by primary key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl PageRequest {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }
}

/// State-changing API.
pub trait RegistryApi {
    /// Process one message at block time `now`.
    ///
    /// ## Atomicity
    ///
    /// Either every effect of the message (state changes and fee) is
    /// applied, or none is.
    ///
    /// ## Errors
    ///
    /// - `InvalidMessage`: stateless validation failed
    /// - any controller rejection, in chain order
    /// - `FeeCollection`: the payer could not cover the fee
    fn deliver(&mut self, msg: RegistryMsg, now: Timestamp) -> Result<MsgOutcome, RegistryError>;
}

/// Read-only API.
pub trait RegistryQueryApi {
    /// ## Errors
    ///
    /// - `DomainDoesNotExist`
    fn domain(&self, name: &str) -> Result<Domain, RegistryError>;

    /// Resolve `name*domain`. The empty account is addressed as `*domain`.
    ///
    /// ## Errors
    ///
    /// - `InvalidStarname`: not exactly one separator
    /// - `AccountDoesNotExist`
    fn starname(&self, starname: &str) -> Result<Account, RegistryError>;

    /// Accounts of an existing domain.
    fn domain_accounts(&self, domain: &str, page: PageRequest)
        -> Result<Vec<Account>, RegistryError>;

    fn owner_accounts(&self, owner: &Address, page: PageRequest)
        -> Result<Vec<Account>, RegistryError>;

    fn owner_domains(&self, owner: &Address, page: PageRequest)
        -> Result<Vec<Domain>, RegistryError>;
}
