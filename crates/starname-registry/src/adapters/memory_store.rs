use crate::domain::{Account, AccountKey, Address, Domain, StoreError};
use crate::ports::outbound::{AccountStore, DomainStore};
use std::collections::{BTreeMap, BTreeSet};

/// In-memory registry store.
///
/// Primary records live in ordered maps; the admin, domain and owner
/// indexes are ordered sets rebuilt incrementally on every put and delete,
/// so scans come back sorted without an extra pass.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRegistryStore {
    domains: BTreeMap<String, Domain>,
    accounts: BTreeMap<AccountKey, Account>,
    domains_by_admin: BTreeSet<(Address, String)>,
    accounts_by_domain: BTreeSet<(String, AccountKey)>,
    accounts_by_owner: BTreeSet<(Address, AccountKey)>,
}

impl InMemoryRegistryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn domain_count(&self) -> usize {
        self.domains.len()
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    fn unindex_account(&mut self, account: &Account) {
        let key = account.key();
        self.accounts_by_domain
            .remove(&(account.domain.clone(), key.clone()));
        self.accounts_by_owner.remove(&(account.owner, key));
    }
}

impl DomainStore for InMemoryRegistryStore {
    fn get_domain(&self, name: &str) -> Result<Option<Domain>, StoreError> {
        Ok(self.domains.get(name).cloned())
    }

    fn put_domain(&mut self, domain: Domain) -> Result<(), StoreError> {
        if let Some(previous) = self.domains.get(&domain.name) {
            self.domains_by_admin
                .remove(&(previous.admin, previous.name.clone()));
        }
        self.domains_by_admin
            .insert((domain.admin, domain.name.clone()));
        self.domains.insert(domain.name.clone(), domain);
        Ok(())
    }

    fn delete_domain(&mut self, name: &str) -> Result<(), StoreError> {
        if let Some(previous) = self.domains.remove(name) {
            self.domains_by_admin.remove(&(previous.admin, previous.name));
        }
        Ok(())
    }

    fn domain_names_by_admin(&self, admin: &Address) -> Result<Vec<String>, StoreError> {
        Ok(self
            .domains_by_admin
            .range((*admin, String::new())..)
            .take_while(|(a, _)| a == admin)
            .map(|(_, name)| name.clone())
            .collect())
    }
}

impl AccountStore for InMemoryRegistryStore {
    fn get_account(&self, key: &AccountKey) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.get(key).cloned())
    }

    fn put_account(&mut self, account: Account) -> Result<(), StoreError> {
        let key = account.key();
        if let Some(previous) = self.accounts.get(&key).cloned() {
            self.unindex_account(&previous);
        }
        self.accounts_by_domain
            .insert((account.domain.clone(), key.clone()));
        self.accounts_by_owner.insert((account.owner, key.clone()));
        self.accounts.insert(key, account);
        Ok(())
    }

    fn delete_account(&mut self, key: &AccountKey) -> Result<(), StoreError> {
        if let Some(previous) = self.accounts.remove(key) {
            self.unindex_account(&previous);
        }
        Ok(())
    }

    fn account_keys_by_domain(&self, domain: &str) -> Result<Vec<AccountKey>, StoreError> {
        Ok(self
            .accounts_by_domain
            .iter()
            .filter(|(d, _)| d == domain)
            .map(|(_, key)| key.clone())
            .collect())
    }

    fn account_keys_by_owner(&self, owner: &Address) -> Result<Vec<AccountKey>, StoreError> {
        Ok(self
            .accounts_by_owner
            .iter()
            .filter(|(o, _)| o == owner)
            .map(|(_, key)| key.clone())
            .collect())
    }
}
