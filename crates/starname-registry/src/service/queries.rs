//! Read-only queries over committed registry state.

use crate::domain::{Account, AccountKey, Address, Domain, RegistryError, STARNAME_SEPARATOR};
use crate::ports::inbound::{PageRequest, RegistryQueryApi};
use crate::ports::outbound::RegistryStore;

/// Query service borrowing a registry store.
pub struct RegistryQueries<'a, S: RegistryStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: RegistryStore + ?Sized> RegistryQueries<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    fn load_accounts(
        &self,
        keys: impl Iterator<Item = AccountKey>,
    ) -> Result<Vec<Account>, RegistryError> {
        let mut accounts = Vec::new();
        for key in keys {
            match self.store.get_account(&key)? {
                Some(account) => accounts.push(account),
                None => {
                    tracing::warn!(account = %key.starname(), "index entry without account");
                }
            }
        }
        Ok(accounts)
    }
}

fn paginate<T>(items: Vec<T>, page: PageRequest) -> impl Iterator<Item = T> {
    items.into_iter().skip(page.offset).take(page.limit)
}

/// Split `name*domain` into its key. Exactly one separator is allowed and
/// the domain part must be non-empty.
pub fn parse_starname(starname: &str) -> Result<AccountKey, RegistryError> {
    match starname.split_once(STARNAME_SEPARATOR) {
        Some((name, domain)) if !domain.is_empty() && !domain.contains(STARNAME_SEPARATOR) => {
            Ok(AccountKey::new(domain, name))
        }
        _ => Err(RegistryError::InvalidStarname(starname.to_string())),
    }
}

impl<S: RegistryStore + ?Sized> RegistryQueryApi for RegistryQueries<'_, S> {
    fn domain(&self, name: &str) -> Result<Domain, RegistryError> {
        self.store
            .get_domain(name)?
            .ok_or_else(|| RegistryError::DomainDoesNotExist(name.to_string()))
    }

    fn starname(&self, starname: &str) -> Result<Account, RegistryError> {
        let key = parse_starname(starname)?;
        self.store
            .get_account(&key)?
            .ok_or_else(|| RegistryError::AccountDoesNotExist(key.starname()))
    }

    fn domain_accounts(
        &self,
        domain: &str,
        page: PageRequest,
    ) -> Result<Vec<Account>, RegistryError> {
        self.domain(domain)?;
        let keys = self.store.account_keys_by_domain(domain)?;
        self.load_accounts(paginate(keys, page))
    }

    fn owner_accounts(
        &self,
        owner: &Address,
        page: PageRequest,
    ) -> Result<Vec<Account>, RegistryError> {
        let keys = self.store.account_keys_by_owner(owner)?;
        self.load_accounts(paginate(keys, page))
    }

    fn owner_domains(
        &self,
        owner: &Address,
        page: PageRequest,
    ) -> Result<Vec<Domain>, RegistryError> {
        let names = self.store.domain_names_by_admin(owner)?;
        let mut domains = Vec::new();
        for name in paginate(names, page) {
            if let Some(domain) = self.store.get_domain(&name)? {
                domains.push(domain);
            }
        }
        Ok(domains)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryRegistryStore;
    use crate::domain::DomainType;
    use crate::ports::outbound::{AccountStore, DomainStore};

    const ALICE: Address = [1u8; 20];
    const BOB: Address = [2u8; 20];

    fn store() -> InMemoryRegistryStore {
        let mut store = InMemoryRegistryStore::new();
        store
            .put_domain(Domain::new("iov-one", ALICE, 100, DomainType::Open))
            .unwrap();
        for name in ["", "a", "b", "c"] {
            store
                .put_account(Account::new("iov-one", name, ALICE, 100))
                .unwrap();
        }
        store
            .put_account(Account::new("iov-one", "d", BOB, 100))
            .unwrap();
        store
    }

    #[test]
    fn test_parse_starname() {
        assert_eq!(
            parse_starname("alice*iov").unwrap(),
            AccountKey::new("iov", "alice")
        );
        assert_eq!(parse_starname("*iov").unwrap(), AccountKey::new("iov", ""));
        for bad in ["alice", "alice*", "a*b*c", ""] {
            assert!(
                matches!(parse_starname(bad), Err(RegistryError::InvalidStarname(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_resolve_and_not_found() {
        let store = store();
        let queries = RegistryQueries::new(&store);
        assert_eq!(queries.starname("d*iov-one").unwrap().owner, BOB);
        assert!(matches!(
            queries.starname("zz*iov-one"),
            Err(RegistryError::AccountDoesNotExist(_))
        ));
        assert!(matches!(
            queries.domain("missing"),
            Err(RegistryError::DomainDoesNotExist(_))
        ));
    }

    #[test]
    fn test_pagination() {
        let store = store();
        let queries = RegistryQueries::new(&store);

        let page = queries
            .domain_accounts("iov-one", PageRequest::new(1, 2))
            .unwrap();
        let names: Vec<_> = page.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);

        let owned = queries.owner_accounts(&ALICE, PageRequest::default()).unwrap();
        assert_eq!(owned.len(), 4);
        assert_eq!(
            queries.owner_domains(&ALICE, PageRequest::default()).unwrap().len(),
            1
        );
        assert!(queries
            .owner_domains(&BOB, PageRequest::default())
            .unwrap()
            .is_empty());
    }
}
