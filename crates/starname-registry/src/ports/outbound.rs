//! Outbound (Driven) ports for the registry subsystem.
//!
//! The registry never owns its storage engine, its token ledger or its
//! configuration source. These traits describe the capabilities it needs
//! from them.

use crate::domain::{
    Account, AccountKey, Address, Coin, Domain, FeeError, FeeSchedule, RegistryConfig, StoreError,
};

/// Domain records keyed by name, with a secondary index on admin.
pub trait DomainStore {
    /// Reads a domain. `Ok(None)` is the not-found signal.
    fn get_domain(&self, name: &str) -> Result<Option<Domain>, StoreError>;

    /// Inserts or replaces a domain.
    fn put_domain(&mut self, domain: Domain) -> Result<(), StoreError>;

    /// Removes a domain. Removing a missing domain is not an error.
    fn delete_domain(&mut self, name: &str) -> Result<(), StoreError>;

    /// Names of the domains administered by `admin`, in ascending order.
    fn domain_names_by_admin(&self, admin: &Address) -> Result<Vec<String>, StoreError>;
}

/// Account records keyed by (domain, name), with secondary indexes on
/// domain and owner.
///
/// Implementations must keep both indexes consistent with the primary
/// records on every put and delete, including owner changes.
pub trait AccountStore {
    /// Reads an account. `Ok(None)` is the not-found signal.
    fn get_account(&self, key: &AccountKey) -> Result<Option<Account>, StoreError>;

    /// Inserts or replaces an account.
    fn put_account(&mut self, account: Account) -> Result<(), StoreError>;

    /// Removes an account. Removing a missing account is not an error.
    fn delete_account(&mut self, key: &AccountKey) -> Result<(), StoreError>;

    /// Keys of every account in `domain`, in ascending order.
    fn account_keys_by_domain(&self, domain: &str) -> Result<Vec<AccountKey>, StoreError>;

    /// Keys of every account owned by `owner`, in ascending order.
    fn account_keys_by_owner(&self, owner: &Address) -> Result<Vec<AccountKey>, StoreError>;
}

/// Full storage capability required by the dispatch layer.
pub trait RegistryStore: DomainStore + AccountStore {}

impl<T: DomainStore + AccountStore + ?Sized> RegistryStore for T {}

/// A fee withdrawn from its payer but not yet handed to the collector.
///
/// Every receipt must end in exactly one of [`FeeSink::commit`] or
/// [`FeeSink::release`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a reserved fee must be committed or released"]
pub struct FeeReceipt {
    pub payer: Address,
    pub fee: Coin,
}

/// Destination of product fees.
///
/// Collection is two-phase so that the fee settles together with the
/// message's state writes: it is reserved while the message runs, then
/// committed once the writes are applied, or released if anything failed.
pub trait FeeSink {
    /// Withdraws `fee` from `payer` and holds it.
    ///
    /// A failure must leave balances untouched.
    fn reserve(&mut self, payer: &Address, fee: &Coin) -> Result<FeeReceipt, FeeError>;

    /// Hands a held fee to the protocol collector.
    fn commit(&mut self, receipt: FeeReceipt);

    /// Returns a held fee to its payer.
    fn release(&mut self, receipt: FeeReceipt);
}

/// Source of configuration and fees, immutable for one message.
pub trait ConfigProvider {
    fn config(&self) -> &RegistryConfig;
    fn fees(&self) -> &FeeSchedule;
}
