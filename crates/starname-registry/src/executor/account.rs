//! Account executor.
//!
//! Applies one mutation to one account and persists it. No validation is
//! performed here: the caller must have run the matching account checks.

use crate::domain::{Account, Address, Certificate, RegistryConfig, RegistryError, Resource};
use crate::ports::AccountStore;

/// Mutates and persists a single account.
pub struct AccountExecutor<'s, S: AccountStore + ?Sized> {
    store: &'s mut S,
    account: Account,
    config: Option<&'s RegistryConfig>,
}

impl<'s, S: AccountStore + ?Sized> AccountExecutor<'s, S> {
    pub fn new(store: &'s mut S, account: Account) -> Self {
        Self {
            store,
            account,
            config: None,
        }
    }

    /// Provide configuration, required by `renew`.
    pub fn with_config(mut self, config: &'s RegistryConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Current state of the account, including applied mutations.
    pub fn state(&self) -> &Account {
        &self.account
    }

    pub fn into_state(self) -> Account {
        self.account
    }

    fn save(&mut self) -> Result<(), RegistryError> {
        self.store.put_account(self.account.clone())?;
        Ok(())
    }

    pub fn create(&mut self) -> Result<(), RegistryError> {
        self.save()?;
        tracing::debug!(
            account = %self.account.key().starname(),
            owner = %hex::encode(self.account.owner),
            valid_until = self.account.valid_until,
            "account created"
        );
        Ok(())
    }

    pub fn delete(self) -> Result<(), RegistryError> {
        let key = self.account.key();
        self.store.delete_account(&key)?;
        tracing::debug!(account = %key.starname(), "account deleted");
        Ok(())
    }

    /// Hand the account to `new_owner`, optionally clearing resources,
    /// certificates and metadata.
    pub fn transfer(&mut self, new_owner: Address, reset: bool) -> Result<(), RegistryError> {
        self.account.owner = new_owner;
        if reset {
            self.account.reset_contents();
        }
        self.save()?;
        tracing::debug!(
            account = %self.account.key().starname(),
            new_owner = %hex::encode(new_owner),
            reset,
            "account transferred"
        );
        Ok(())
    }

    /// Extend the expiry by one account renewal period.
    ///
    /// # Panics
    ///
    /// If no configuration was provided.
    pub fn renew(&mut self) -> Result<(), RegistryError> {
        let config = match self.config {
            Some(config) => config,
            None => panic!("configuration is required to renew an account"),
        };
        self.account.valid_until = self
            .account
            .valid_until
            .saturating_add(config.account_renewal_period);
        self.save()?;
        tracing::debug!(
            account = %self.account.key().starname(),
            valid_until = self.account.valid_until,
            "account renewed"
        );
        Ok(())
    }

    /// Replace the resource list wholesale.
    pub fn replace_resources(&mut self, resources: Vec<Resource>) -> Result<(), RegistryError> {
        self.account.resources = resources;
        self.save()?;
        tracing::debug!(
            account = %self.account.key().starname(),
            count = self.account.resources.len(),
            "account resources replaced"
        );
        Ok(())
    }

    pub fn update_metadata(&mut self, metadata_uri: String) -> Result<(), RegistryError> {
        self.account.metadata_uri = metadata_uri;
        self.save()?;
        tracing::debug!(account = %self.account.key().starname(), "account metadata updated");
        Ok(())
    }

    pub fn add_certificate(&mut self, certificate: Certificate) -> Result<(), RegistryError> {
        self.account.certificates.push(certificate);
        self.save()?;
        tracing::debug!(
            account = %self.account.key().starname(),
            count = self.account.certificates.len(),
            "certificate added"
        );
        Ok(())
    }

    /// Remove the certificate at `index`.
    ///
    /// `index` must come from a `certificate_exists` check run against the
    /// same, unmodified account.
    ///
    /// # Panics
    ///
    /// If `index` is out of bounds.
    pub fn delete_certificate(&mut self, index: usize) -> Result<(), RegistryError> {
        self.account.certificates.remove(index);
        self.save()?;
        tracing::debug!(
            account = %self.account.key().starname(),
            index,
            "certificate deleted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryRegistryStore;

    const OWNER: Address = [1u8; 20];
    const NEW_OWNER: Address = [2u8; 20];

    fn sample() -> Account {
        let mut account = Account::new("iov-one", "alice", OWNER, 100);
        account.resources.push(Resource::new("blockchain:eth", "0xabc"));
        account.certificates = vec![vec![1], vec![2], vec![3]];
        account.metadata_uri = "ipfs:abc".into();
        account
    }

    #[test]
    fn test_create_and_delete() {
        let mut store = InMemoryRegistryStore::new();
        AccountExecutor::new(&mut store, sample()).create().unwrap();
        let key = sample().key();
        assert_eq!(store.get_account(&key).unwrap(), Some(sample()));

        AccountExecutor::new(&mut store, sample()).delete().unwrap();
        assert_eq!(store.get_account(&key).unwrap(), None);
    }

    #[test]
    fn test_transfer_with_and_without_reset() {
        let mut store = InMemoryRegistryStore::new();

        let mut ex = AccountExecutor::new(&mut store, sample());
        ex.transfer(NEW_OWNER, false).unwrap();
        assert_eq!(ex.state().owner, NEW_OWNER);
        assert_eq!(ex.state().certificates.len(), 3);

        let mut ex = AccountExecutor::new(&mut store, sample());
        ex.transfer(NEW_OWNER, true).unwrap();
        let state = ex.into_state();
        assert!(state.resources.is_empty());
        assert!(state.certificates.is_empty());
        assert!(state.metadata_uri.is_empty());

        assert_eq!(store.get_account(&state.key()).unwrap(), Some(state));
        assert!(store.account_keys_by_owner(&OWNER).unwrap().is_empty());
    }

    #[test]
    fn test_renew_adds_one_period() {
        let mut store = InMemoryRegistryStore::new();
        let config = RegistryConfig::default().with_account_renewal(50, 1);
        let mut ex = AccountExecutor::new(&mut store, sample()).with_config(&config);
        ex.renew().unwrap();
        ex.renew().unwrap();
        assert_eq!(ex.state().valid_until, 200);
    }

    #[test]
    fn test_certificates_and_metadata() {
        let mut store = InMemoryRegistryStore::new();
        let mut ex = AccountExecutor::new(&mut store, sample());

        ex.add_certificate(vec![4]).unwrap();
        ex.delete_certificate(1).unwrap();
        assert_eq!(ex.state().certificates, vec![vec![1], vec![3], vec![4]]);

        ex.replace_resources(vec![]).unwrap();
        ex.update_metadata("https://example.org".into()).unwrap();
        let state = ex.into_state();
        assert!(state.resources.is_empty());
        assert_eq!(state.metadata_uri, "https://example.org");
        assert_eq!(store.get_account(&state.key()).unwrap(), Some(state));
    }

    #[test]
    #[should_panic(expected = "configuration is required")]
    fn test_renew_without_config_panics() {
        let mut store = InMemoryRegistryStore::new();
        let _ = AccountExecutor::new(&mut store, sample()).renew();
    }
}
