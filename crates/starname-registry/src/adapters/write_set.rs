//! Buffered writes over a registry store.
//!
//! A message handler runs every check, fee computation and executor against
//! a [`WriteSet`]. Reads see the buffered changes layered over the base
//! store; nothing reaches the base store until the resulting [`WriteBatch`]
//! is applied. Dropping the write set discards the message's effects.

use crate::domain::{Account, AccountKey, Address, Domain, StoreError};
use crate::ports::outbound::{AccountStore, DomainStore, RegistryStore};
use std::collections::{BTreeMap, BTreeSet};

/// One buffered store mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    PutDomain(Domain),
    DeleteDomain(String),
    PutAccount(Account),
    DeleteAccount(AccountKey),
}

/// Final state of every key a message touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Write the batch into `store`.
    ///
    /// Each key appears at most once, so application order is irrelevant.
    /// A store that can fail mid-batch must provide its own rollback.
    pub fn apply<S: RegistryStore + ?Sized>(self, store: &mut S) -> Result<(), StoreError> {
        for op in self.ops {
            match op {
                WriteOp::PutDomain(domain) => store.put_domain(domain)?,
                WriteOp::DeleteDomain(name) => store.delete_domain(&name)?,
                WriteOp::PutAccount(account) => store.put_account(account)?,
                WriteOp::DeleteAccount(key) => store.delete_account(&key)?,
            }
        }
        Ok(())
    }
}

/// Read-through overlay that buffers writes.
///
/// `None` in an overlay map marks a pending delete.
pub struct WriteSet<'a, S: RegistryStore + ?Sized> {
    base: &'a S,
    domains: BTreeMap<String, Option<Domain>>,
    accounts: BTreeMap<AccountKey, Option<Account>>,
}

impl<'a, S: RegistryStore + ?Sized> WriteSet<'a, S> {
    pub fn new(base: &'a S) -> Self {
        Self {
            base,
            domains: BTreeMap::new(),
            accounts: BTreeMap::new(),
        }
    }

    /// Release the base store and return the buffered changes.
    pub fn into_batch(self) -> WriteBatch {
        let domains = self.domains.into_iter().map(|(name, domain)| match domain {
            Some(domain) => WriteOp::PutDomain(domain),
            None => WriteOp::DeleteDomain(name),
        });
        let accounts = self.accounts.into_iter().map(|(key, account)| match account {
            Some(account) => WriteOp::PutAccount(account),
            None => WriteOp::DeleteAccount(key),
        });
        WriteBatch {
            ops: domains.chain(accounts).collect(),
        }
    }

    /// Merge base index results with buffered accounts matching `keep`.
    fn merge_keys(
        &self,
        base: Vec<AccountKey>,
        keep: impl Fn(&Account) -> bool,
    ) -> Vec<AccountKey> {
        let mut keys: BTreeSet<AccountKey> = base
            .into_iter()
            .filter(|key| !self.accounts.contains_key(key))
            .collect();
        keys.extend(
            self.accounts
                .iter()
                .filter_map(|(key, account)| account.as_ref().map(|a| (key, a)))
                .filter(|(_, account)| keep(*account))
                .map(|(key, _)| key.clone()),
        );
        keys.into_iter().collect()
    }
}

impl<S: RegistryStore + ?Sized> DomainStore for WriteSet<'_, S> {
    fn get_domain(&self, name: &str) -> Result<Option<Domain>, StoreError> {
        match self.domains.get(name) {
            Some(buffered) => Ok(buffered.clone()),
            None => self.base.get_domain(name),
        }
    }

    fn put_domain(&mut self, domain: Domain) -> Result<(), StoreError> {
        self.domains.insert(domain.name.clone(), Some(domain));
        Ok(())
    }

    fn delete_domain(&mut self, name: &str) -> Result<(), StoreError> {
        self.domains.insert(name.to_string(), None);
        Ok(())
    }

    fn domain_names_by_admin(&self, admin: &Address) -> Result<Vec<String>, StoreError> {
        let mut names: BTreeSet<String> = self
            .base
            .domain_names_by_admin(admin)?
            .into_iter()
            .filter(|name| !self.domains.contains_key(name))
            .collect();
        names.extend(
            self.domains
                .values()
                .flatten()
                .filter(|domain| domain.admin == *admin)
                .map(|domain| domain.name.clone()),
        );
        Ok(names.into_iter().collect())
    }
}

impl<S: RegistryStore + ?Sized> AccountStore for WriteSet<'_, S> {
    fn get_account(&self, key: &AccountKey) -> Result<Option<Account>, StoreError> {
        match self.accounts.get(key) {
            Some(buffered) => Ok(buffered.clone()),
            None => self.base.get_account(key),
        }
    }

    fn put_account(&mut self, account: Account) -> Result<(), StoreError> {
        self.accounts.insert(account.key(), Some(account));
        Ok(())
    }

    fn delete_account(&mut self, key: &AccountKey) -> Result<(), StoreError> {
        self.accounts.insert(key.clone(), None);
        Ok(())
    }

    fn account_keys_by_domain(&self, domain: &str) -> Result<Vec<AccountKey>, StoreError> {
        let base = self.base.account_keys_by_domain(domain)?;
        Ok(self.merge_keys(base, |account| account.domain == domain))
    }

    fn account_keys_by_owner(&self, owner: &Address) -> Result<Vec<AccountKey>, StoreError> {
        let base = self.base.account_keys_by_owner(owner)?;
        Ok(self.merge_keys(base, |account| account.owner == *owner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryRegistryStore;
    use crate::domain::DomainType;

    const A: Address = [1u8; 20];
    const B: Address = [2u8; 20];

    fn base() -> InMemoryRegistryStore {
        let mut store = InMemoryRegistryStore::new();
        store
            .put_domain(Domain::new("dom", A, 10, DomainType::Closed))
            .unwrap();
        store.put_account(Account::new("dom", "", A, 10)).unwrap();
        store.put_account(Account::new("dom", "x", A, 10)).unwrap();
        store
    }

    #[test]
    fn test_reads_see_buffered_writes_only_after_apply() {
        let mut store = base();

        let mut ws = WriteSet::new(&store);
        ws.put_account(Account::new("dom", "y", B, 10)).unwrap();
        ws.delete_account(&AccountKey::new("dom", "x")).unwrap();
        ws.put_domain(Domain::new("dom", B, 20, DomainType::Closed))
            .unwrap();

        assert_eq!(
            ws.account_keys_by_domain("dom").unwrap(),
            vec![AccountKey::new("dom", ""), AccountKey::new("dom", "y")]
        );
        assert_eq!(ws.domain_names_by_admin(&A).unwrap(), Vec::<String>::new());
        assert_eq!(ws.domain_names_by_admin(&B).unwrap(), vec!["dom"]);
        assert!(ws.get_account(&AccountKey::new("dom", "x")).unwrap().is_none());

        let batch = ws.into_batch();
        assert_eq!(batch.len(), 3);
        assert!(store.get_account(&AccountKey::new("dom", "x")).unwrap().is_some());

        batch.apply(&mut store).unwrap();
        assert!(store.get_account(&AccountKey::new("dom", "x")).unwrap().is_none());
        assert_eq!(store.get_domain("dom").unwrap().unwrap().admin, B);
    }

    #[test]
    fn test_owner_change_moves_key_between_owner_scans() {
        let store = base();
        let mut ws = WriteSet::new(&store);
        ws.put_account(Account::new("dom", "x", B, 10)).unwrap();

        assert_eq!(
            ws.account_keys_by_owner(&A).unwrap(),
            vec![AccountKey::new("dom", "")]
        );
        assert_eq!(
            ws.account_keys_by_owner(&B).unwrap(),
            vec![AccountKey::new("dom", "x")]
        );
    }

    #[test]
    fn test_dropped_write_set_leaves_base_untouched() {
        let store = base();
        {
            let mut ws = WriteSet::new(&store);
            ws.delete_domain("dom").unwrap();
            assert_eq!(ws.get_domain("dom").unwrap(), None);
        }
        assert!(store.get_domain("dom").unwrap().is_some());
        assert_eq!(store.account_count(), 2);
    }
}
