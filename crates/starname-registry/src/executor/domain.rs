//! Domain executor.
//!
//! Applies validated mutations to a domain, its paired empty-name account and,
//! for delete and transfer, every other account under the domain.

use super::account::AccountExecutor;
use crate::domain::{
    Account, Address, Domain, RegistryConfig, RegistryError, Timestamp, TransferFlag,
    EMPTY_ACCOUNT_NAME,
};
use crate::ports::RegistryStore;

/// Mutates and persists one domain and the accounts it cascades to.
pub struct DomainExecutor<'s, S: RegistryStore + ?Sized> {
    store: &'s mut S,
    domain: Domain,
    config: Option<&'s RegistryConfig>,
}

impl<'s, S: RegistryStore + ?Sized> DomainExecutor<'s, S> {
    pub fn new(store: &'s mut S, domain: Domain) -> Self {
        Self {
            store,
            domain,
            config: None,
        }
    }

    /// Provide configuration, required by config-driven `renew`.
    pub fn with_config(mut self, config: &'s RegistryConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn state(&self) -> &Domain {
        &self.domain
    }

    pub fn into_state(self) -> Domain {
        self.domain
    }

    fn empty_account(&self) -> Result<Account, RegistryError> {
        match self.store.get_account(&self.domain.empty_account_key())? {
            Some(account) => Ok(account),
            None => panic!(
                "failed to get empty account in domain {}",
                self.domain.name
            ),
        }
    }

    /// Persist the domain and its empty-name account.
    pub fn create(&mut self) -> Result<(), RegistryError> {
        self.store.put_domain(self.domain.clone())?;

        let empty = Account::new(
            self.domain.name.clone(),
            EMPTY_ACCOUNT_NAME,
            self.domain.admin,
            self.domain.valid_until,
        );
        AccountExecutor::new(&mut *self.store, empty).create()?;

        tracing::debug!(
            domain = %self.domain.name,
            domain_type = %self.domain.domain_type,
            admin = %hex::encode(self.domain.admin),
            valid_until = self.domain.valid_until,
            "domain created"
        );
        Ok(())
    }

    /// Extend the domain.
    ///
    /// With `None`, adds one domain renewal period and mirrors the new expiry
    /// onto the empty-name account. With `Some(valid_until)`, moves the
    /// domain expiry to that value and leaves accounts untouched.
    ///
    /// # Panics
    ///
    /// In config-driven mode, if no configuration was provided or the
    /// empty-name account is missing.
    pub fn renew(&mut self, account_valid_until: Option<Timestamp>) -> Result<(), RegistryError> {
        if let Some(valid_until) = account_valid_until {
            self.domain.valid_until = valid_until;
            self.store.put_domain(self.domain.clone())?;
            tracing::debug!(
                domain = %self.domain.name,
                valid_until,
                "domain expiry aligned with account renewal"
            );
            return Ok(());
        }

        let config = match self.config {
            Some(config) => config,
            None => panic!("configuration is required to renew a domain"),
        };
        self.domain.valid_until = self
            .domain
            .valid_until
            .saturating_add(config.domain_renewal_period);
        self.store.put_domain(self.domain.clone())?;

        let mut empty = self.empty_account()?;
        empty.valid_until = self.domain.valid_until;
        self.store.put_account(empty)?;

        tracing::debug!(
            domain = %self.domain.name,
            valid_until = self.domain.valid_until,
            "domain renewed"
        );
        Ok(())
    }

    /// Delete every account under the domain, then the domain itself.
    pub fn delete(self) -> Result<(), RegistryError> {
        let keys = self.store.account_keys_by_domain(&self.domain.name)?;
        for key in &keys {
            self.store.delete_account(key)?;
        }
        self.store.delete_domain(&self.domain.name)?;

        tracing::debug!(
            domain = %self.domain.name,
            accounts_deleted = keys.len(),
            "domain deleted"
        );
        Ok(())
    }

    /// Hand the domain to `new_owner`, cascading to accounts per `flag`.
    ///
    /// The empty-name account always follows the domain. Then:
    /// - `Flush`: every other account is deleted and the empty-name account
    ///   is reset.
    /// - `Owned`: accounts the previous admin owned are transferred.
    /// - `ResetNone`: nothing else changes.
    pub fn transfer(&mut self, flag: TransferFlag, new_owner: Address) -> Result<(), RegistryError> {
        let old_owner = self.domain.admin;
        self.domain.admin = new_owner;
        self.store.put_domain(self.domain.clone())?;

        let empty = self.empty_account()?;
        AccountExecutor::new(&mut *self.store, empty).transfer(new_owner, false)?;

        let mut affected = 0usize;
        match flag {
            TransferFlag::ResetNone => {}
            TransferFlag::Flush => {
                for key in self.store.account_keys_by_domain(&self.domain.name)? {
                    if key.is_empty_account() {
                        let empty = self.empty_account()?;
                        AccountExecutor::new(&mut *self.store, empty).transfer(new_owner, true)?;
                        continue;
                    }
                    self.store.delete_account(&key)?;
                    affected += 1;
                }
            }
            TransferFlag::Owned => {
                let owned = self.store.account_keys_by_owner(&old_owner)?;
                for key in owned.into_iter().filter(|k| k.domain == self.domain.name) {
                    if let Some(account) = self.store.get_account(&key)? {
                        AccountExecutor::new(&mut *self.store, account)
                            .transfer(new_owner, false)?;
                        affected += 1;
                    }
                }
            }
        }

        tracing::debug!(
            domain = %self.domain.name,
            flag = %flag,
            new_owner = %hex::encode(new_owner),
            accounts_affected = affected,
            "domain transferred"
        );
        Ok(())
    }
}
