//! Account validation chain.
//!
//! Mirrors [`DomainController`]: checks are queued, then evaluated in order by
//! [`AccountController::validate`]. Checks whose outcome depends on the
//! parent domain read it through an injected domain controller; the caller
//! is expected to have validated that controller already.

use super::config::RegistryConfig;
use super::domain_controller::{require_config, DomainController};
use super::entities::{
    Account, AccountKey, Address, Certificate, Domain, DomainType, Resource, Timestamp,
};
use super::errors::RegistryError;
use crate::ports::RegistryStore;
use std::collections::HashSet;

#[derive(Clone, Debug)]
enum AccountCheck {
    MustExist,
    MustNotExist,
    ValidName,
    NotExpired,
    Renewable,
    OwnedBy(Address),
    CertificateLimitNotExceeded,
    CertificateSizeNotExceeded(usize),
    CertificateNotExist(Certificate),
    CertificateExists(Certificate),
    ValidResources(Vec<Resource>),
    ResourceLimitNotExceeded(usize),
    MetadataSizeNotExceeded(usize),
    RegistrableBy(Address),
    DeletableBy(Address),
    TransferableBy(Address),
    ResettableBy(Address, bool),
}

/// Lazily loads one account and runs an ordered chain of checks against it.
pub struct AccountController<'a, S: RegistryStore + ?Sized> {
    store: &'a S,
    key: AccountKey,
    now: Timestamp,
    config: Option<&'a RegistryConfig>,
    domain_ctrl: Option<DomainController<'a, S>>,
    account: Option<Account>,
    loaded: bool,
    certificate_index: Option<usize>,
    checks: Vec<AccountCheck>,
}

fn domain_of<'c, 'a, S: RegistryStore + ?Sized>(
    ctrl: &'c mut Option<DomainController<'a, S>>,
) -> Result<&'c Domain, RegistryError> {
    match ctrl {
        Some(ctrl) => ctrl.require(),
        None => panic!("domain controller is required for this check but was not provided"),
    }
}

fn existing<'c>(account: &'c Option<Account>, key: &AccountKey) -> &'c Account {
    match account {
        Some(account) => account,
        None => panic!(
            "validation check is not allowed on non existing account '{}'",
            key.starname()
        ),
    }
}

impl<'a, S: RegistryStore + ?Sized> AccountController<'a, S> {
    pub fn new(
        store: &'a S,
        domain: impl Into<String>,
        name: impl Into<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            store,
            key: AccountKey::new(domain, name),
            now,
            config: None,
            domain_ctrl: None,
            account: None,
            loaded: false,
            certificate_index: None,
            checks: Vec::new(),
        }
    }

    /// Provide configuration, required by name, renewal, limit and grace
    /// period checks.
    pub fn with_config(mut self, config: &'a RegistryConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Inject the parent domain controller, required by checks that depend
    /// on the domain type or admin.
    pub fn with_domain_controller(mut self, ctrl: DomainController<'a, S>) -> Self {
        self.domain_ctrl = Some(ctrl);
        self
    }

    /// Seed the cache with an already loaded account.
    pub fn with_account(mut self, account: Account) -> Self {
        self.account = Some(account);
        self.loaded = true;
        self
    }

    pub fn key(&self) -> &AccountKey {
        &self.key
    }

    pub fn must_exist(&mut self) -> &mut Self {
        self.checks.push(AccountCheck::MustExist);
        self
    }

    pub fn must_not_exist(&mut self) -> &mut Self {
        self.checks.push(AccountCheck::MustNotExist);
        self
    }

    pub fn valid_name(&mut self) -> &mut Self {
        self.checks.push(AccountCheck::ValidName);
        self
    }

    /// Closed-domain accounts never expire on their own; open-domain accounts
    /// expire once `valid_until < now`.
    pub fn not_expired(&mut self) -> &mut Self {
        self.checks.push(AccountCheck::NotExpired);
        self
    }

    pub fn renewable(&mut self) -> &mut Self {
        self.checks.push(AccountCheck::Renewable);
        self
    }

    pub fn owned_by(&mut self, addr: Address) -> &mut Self {
        self.checks.push(AccountCheck::OwnedBy(addr));
        self
    }

    pub fn certificate_limit_not_exceeded(&mut self) -> &mut Self {
        self.checks.push(AccountCheck::CertificateLimitNotExceeded);
        self
    }

    pub fn certificate_size_not_exceeded(&mut self, cert: &[u8]) -> &mut Self {
        self.checks
            .push(AccountCheck::CertificateSizeNotExceeded(cert.len()));
        self
    }

    pub fn certificate_not_exist(&mut self, cert: &[u8]) -> &mut Self {
        self.checks
            .push(AccountCheck::CertificateNotExist(cert.to_vec()));
        self
    }

    /// Fails unless `cert` is present; on success its position is captured
    /// and available through [`certificate_index`](Self::certificate_index).
    ///
    /// Queue this right before an index-based delete so that no mutation can
    /// shift positions in between.
    pub fn certificate_exists(&mut self, cert: &[u8]) -> &mut Self {
        self.checks
            .push(AccountCheck::CertificateExists(cert.to_vec()));
        self
    }

    /// Every entry must match the configured patterns and URIs must be
    /// unique within `resources`. Existing resources are not considered.
    pub fn valid_resources(&mut self, resources: &[Resource]) -> &mut Self {
        self.checks
            .push(AccountCheck::ValidResources(resources.to_vec()));
        self
    }

    pub fn resource_limit_not_exceeded(&mut self, resources: &[Resource]) -> &mut Self {
        self.checks
            .push(AccountCheck::ResourceLimitNotExceeded(resources.len()));
        self
    }

    pub fn metadata_size_not_exceeded(&mut self, metadata: &str) -> &mut Self {
        self.checks
            .push(AccountCheck::MetadataSizeNotExceeded(metadata.len()));
        self
    }

    /// Closed domains only accept registrations from the admin.
    pub fn registrable_by(&mut self, addr: Address) -> &mut Self {
        self.checks.push(AccountCheck::RegistrableBy(addr));
        self
    }

    /// Closed: domain admin any time, anyone after the domain grace period.
    /// Open: owner any time, anyone after the account grace period.
    pub fn deletable_by(&mut self, addr: Address) -> &mut Self {
        self.checks.push(AccountCheck::DeletableBy(addr));
        self
    }

    /// Closed: domain admin only. Open: account owner only.
    pub fn transferable_by(&mut self, addr: Address) -> &mut Self {
        self.checks.push(AccountCheck::TransferableBy(addr));
        self
    }

    /// On open domains the domain admin may never request a reset.
    pub fn resettable_by(&mut self, addr: Address, reset: bool) -> &mut Self {
        self.checks.push(AccountCheck::ResettableBy(addr, reset));
        self
    }

    /// Run the queued checks in order, stopping at the first failure.
    pub fn validate(&mut self) -> Result<(), RegistryError> {
        let checks = std::mem::take(&mut self.checks);
        for check in checks {
            self.run(check)?;
        }
        Ok(())
    }

    /// The cached account.
    ///
    /// # Panics
    ///
    /// If the account was never loaded or does not exist.
    pub fn account(&self) -> &Account {
        existing(&self.account, &self.key)
    }

    pub fn into_account(self) -> Account {
        match self.account {
            Some(account) => account,
            None => panic!(
                "account '{}' requested before its existence was established",
                self.key.starname()
            ),
        }
    }

    /// The parent domain as cached by the injected controller.
    ///
    /// # Panics
    ///
    /// If no domain controller was injected or its domain was never loaded.
    pub fn domain(&self) -> &Domain {
        match &self.domain_ctrl {
            Some(ctrl) => ctrl.domain(),
            None => panic!("domain controller is required but was not provided"),
        }
    }

    /// Split into the cached account and the parent domain, if a domain
    /// controller was injected.
    pub fn into_parts(self) -> (Account, Option<Domain>) {
        let domain = self.domain_ctrl.map(DomainController::into_domain);
        let account = match self.account {
            Some(account) => account,
            None => panic!(
                "account '{}' requested before its existence was established",
                self.key.starname()
            ),
        };
        (account, domain)
    }

    /// Position captured by the last successful `certificate_exists` check.
    ///
    /// # Panics
    ///
    /// If no `certificate_exists` check has succeeded.
    pub fn certificate_index(&self) -> usize {
        match self.certificate_index {
            Some(index) => index,
            None => panic!("certificate index requested without a certificate_exists check"),
        }
    }

    fn ensure_loaded(&mut self) -> Result<(), RegistryError> {
        if !self.loaded {
            self.account = self.store.get_account(&self.key)?;
            self.loaded = true;
        }
        Ok(())
    }

    fn require(&mut self) -> Result<&Account, RegistryError> {
        self.ensure_loaded()?;
        Ok(existing(&self.account, &self.key))
    }

    fn run(&mut self, check: AccountCheck) -> Result<(), RegistryError> {
        match check {
            AccountCheck::MustExist => self.check_exists(),
            AccountCheck::MustNotExist => self.check_not_exists(),
            AccountCheck::ValidName => self.check_valid_name(),
            AccountCheck::NotExpired => self.check_not_expired(),
            AccountCheck::Renewable => self.check_renewable(),
            AccountCheck::OwnedBy(addr) => self.check_owned_by(&addr),
            AccountCheck::CertificateLimitNotExceeded => self.check_certificate_limit(),
            AccountCheck::CertificateSizeNotExceeded(size) => self.check_certificate_size(size),
            AccountCheck::CertificateNotExist(cert) => self.check_certificate_not_exist(&cert),
            AccountCheck::CertificateExists(cert) => self.check_certificate_exists(&cert),
            AccountCheck::ValidResources(resources) => self.check_valid_resources(&resources),
            AccountCheck::ResourceLimitNotExceeded(count) => self.check_resource_limit(count),
            AccountCheck::MetadataSizeNotExceeded(size) => self.check_metadata_size(size),
            AccountCheck::RegistrableBy(addr) => self.check_registrable_by(&addr),
            AccountCheck::DeletableBy(addr) => self.check_deletable_by(&addr),
            AccountCheck::TransferableBy(addr) => self.check_transferable_by(&addr),
            AccountCheck::ResettableBy(addr, reset) => self.check_resettable_by(&addr, reset),
        }
    }

    fn check_exists(&mut self) -> Result<(), RegistryError> {
        self.ensure_loaded()?;
        if self.account.is_none() {
            return Err(RegistryError::AccountDoesNotExist(self.key.starname()));
        }
        Ok(())
    }

    fn check_not_exists(&mut self) -> Result<(), RegistryError> {
        self.ensure_loaded()?;
        if self.account.is_some() {
            return Err(RegistryError::AccountAlreadyExists(self.key.starname()));
        }
        Ok(())
    }

    fn check_valid_name(&self) -> Result<(), RegistryError> {
        if !require_config(self.config)
            .valid_account_name
            .is_match(&self.key.name)
        {
            return Err(RegistryError::InvalidAccountName(self.key.name.clone()));
        }
        Ok(())
    }

    fn check_not_expired(&mut self) -> Result<(), RegistryError> {
        self.ensure_loaded()?;
        let domain = domain_of(&mut self.domain_ctrl)?;
        let account = existing(&self.account, &self.key);

        // Closed-domain accounts live as long as their domain.
        if domain.domain_type == DomainType::Closed {
            return Ok(());
        }
        if account.valid_until >= self.now {
            return Ok(());
        }
        Err(RegistryError::AccountExpired(self.key.starname()))
    }

    fn check_renewable(&mut self) -> Result<(), RegistryError> {
        let config = require_config(self.config);
        let now = self.now;
        let account = self.require()?;

        let deadline = account
            .valid_until
            .saturating_add(config.account_grace_period);
        if now > deadline {
            return Err(RegistryError::RenewalDeadlineExceeded {
                name: account.key().starname(),
                deadline,
                now,
            });
        }

        let new_valid_until = account
            .valid_until
            .saturating_add(config.account_renewal_period);
        let maximum_valid_until = now.saturating_add(
            config
                .account_renewal_period
                .saturating_mul(config.account_renewal_count_max as u64 + 1),
        );
        if new_valid_until > maximum_valid_until {
            return Err(RegistryError::Unauthorized(format!(
                "unable to renew account {}, renewal would be after maximum allowed {}",
                account.key().starname(),
                maximum_valid_until
            )));
        }
        Ok(())
    }

    fn check_owned_by(&mut self, addr: &Address) -> Result<(), RegistryError> {
        let account = self.require()?;
        if account.owner == *addr {
            return Ok(());
        }
        Err(RegistryError::Unauthorized(format!(
            "{} is not allowed to perform operations on account {} owned by {}",
            hex::encode(addr),
            account.key().starname(),
            hex::encode(account.owner)
        )))
    }

    fn check_certificate_limit(&mut self) -> Result<(), RegistryError> {
        let config = require_config(self.config);
        let account = self.require()?;
        if account.certificates.len() >= config.certificate_count_max as usize {
            return Err(RegistryError::CertificateLimitReached {
                max: config.certificate_count_max,
            });
        }
        Ok(())
    }

    fn check_certificate_size(&self, size: usize) -> Result<(), RegistryError> {
        let config = require_config(self.config);
        if size as u64 > config.certificate_size_max {
            return Err(RegistryError::CertificateSizeExceeded {
                size,
                max: config.certificate_size_max,
            });
        }
        Ok(())
    }

    fn check_certificate_not_exist(&mut self, cert: &[u8]) -> Result<(), RegistryError> {
        let account = self.require()?;
        if account.certificates.iter().any(|c| c.as_slice() == cert) {
            return Err(RegistryError::CertificateExists);
        }
        Ok(())
    }

    fn check_certificate_exists(&mut self, cert: &[u8]) -> Result<(), RegistryError> {
        let account = self.require()?;
        match account
            .certificates
            .iter()
            .position(|c| c.as_slice() == cert)
        {
            Some(index) => {
                self.certificate_index = Some(index);
                Ok(())
            }
            None => Err(RegistryError::CertificateDoesNotExist(hex::encode(cert))),
        }
    }

    fn check_valid_resources(&self, resources: &[Resource]) -> Result<(), RegistryError> {
        let config = require_config(self.config);
        let valid_uri = &config.valid_uri;
        let valid_resource = &config.valid_resource;

        let mut seen = HashSet::with_capacity(resources.len());
        for resource in resources {
            if !seen.insert(resource.uri.as_str()) {
                return Err(RegistryError::InvalidResource(format!(
                    "duplicate URI {}",
                    resource.uri
                )));
            }
            if !valid_uri.is_match(&resource.uri) {
                return Err(RegistryError::InvalidResource(format!(
                    "{} is not a valid URI",
                    resource.uri
                )));
            }
            if !valid_resource.is_match(&resource.resource) {
                return Err(RegistryError::InvalidResource(format!(
                    "{} is not a valid resource",
                    resource.resource
                )));
            }
        }
        Ok(())
    }

    fn check_resource_limit(&self, count: usize) -> Result<(), RegistryError> {
        let config = require_config(self.config);
        if count > config.resources_max as usize {
            return Err(RegistryError::ResourceLimitExceeded {
                count,
                max: config.resources_max,
            });
        }
        Ok(())
    }

    fn check_metadata_size(&self, size: usize) -> Result<(), RegistryError> {
        let config = require_config(self.config);
        if size as u64 > config.metadata_size_max {
            return Err(RegistryError::MetadataSizeExceeded {
                size,
                max: config.metadata_size_max,
            });
        }
        Ok(())
    }

    fn check_registrable_by(&mut self, addr: &Address) -> Result<(), RegistryError> {
        let domain = domain_of(&mut self.domain_ctrl)?;
        if domain.domain_type == DomainType::Closed && domain.admin != *addr {
            return Err(RegistryError::Unauthorized(format!(
                "only the admin of closed domain {} can register accounts",
                domain.name
            )));
        }
        Ok(())
    }

    fn check_deletable_by(&mut self, addr: &Address) -> Result<(), RegistryError> {
        let config = require_config(self.config);
        let now = self.now;
        self.ensure_loaded()?;
        let domain = domain_of(&mut self.domain_ctrl)?;
        let account = existing(&self.account, &self.key);

        match domain.domain_type {
            DomainType::Closed => {
                let domain_grace_finished =
                    now > domain.valid_until.saturating_add(config.domain_grace_period);
                if domain_grace_finished || domain.admin == *addr {
                    return Ok(());
                }
                Err(RegistryError::Unauthorized(format!(
                    "only the admin of domain {} can delete its accounts",
                    domain.name
                )))
            }
            DomainType::Open => {
                let account_grace_finished =
                    now > account.valid_until.saturating_add(config.account_grace_period);
                if account_grace_finished || account.owner == *addr {
                    return Ok(());
                }
                Err(RegistryError::AccountGracePeriodNotFinished(
                    account.key().starname(),
                ))
            }
        }
    }

    fn check_transferable_by(&mut self, addr: &Address) -> Result<(), RegistryError> {
        self.ensure_loaded()?;
        let domain = domain_of(&mut self.domain_ctrl)?;
        let account = existing(&self.account, &self.key);

        match domain.domain_type {
            DomainType::Closed if domain.admin != *addr => {
                Err(RegistryError::Unauthorized(format!(
                    "only the admin of domain {} can transfer its accounts",
                    domain.name
                )))
            }
            DomainType::Open if account.owner != *addr => {
                Err(RegistryError::Unauthorized(format!(
                    "only the owner of account {} can transfer it",
                    account.key().starname()
                )))
            }
            _ => Ok(()),
        }
    }

    fn check_resettable_by(&mut self, addr: &Address, reset: bool) -> Result<(), RegistryError> {
        let domain = domain_of(&mut self.domain_ctrl)?;
        if domain.domain_type == DomainType::Open && reset && domain.admin == *addr {
            return Err(RegistryError::Unauthorized(
                "the domain admin cannot reset account contents on open domains".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryRegistryStore;
    use crate::domain::MAX_VALID_UNTIL;
    use crate::ports::{AccountStore, DomainStore};

    const ADMIN: Address = [1u8; 20];
    const OWNER: Address = [2u8; 20];
    const STRANGER: Address = [3u8; 20];

    fn test_config() -> RegistryConfig {
        RegistryConfig::default()
            .with_account_renewal(100, 2)
            .with_account_grace_period(10)
            .with_domain_grace_period(20)
            .with_certificate_limits(4, 2)
            .with_resources_max(2)
            .with_metadata_size_max(5)
    }

    fn setup(domain_type: DomainType, account_valid_until: Timestamp) -> InMemoryRegistryStore {
        let mut store = InMemoryRegistryStore::new();
        store
            .put_domain(Domain::new("iov-one", ADMIN, 1_000, domain_type))
            .unwrap();
        store
            .put_account(Account::new("iov-one", "", ADMIN, 1_000))
            .unwrap();
        let mut account = Account::new("iov-one", "alice", OWNER, account_valid_until);
        account.certificates.push(vec![1, 2]);
        account.certificates.push(vec![3, 4]);
        store.put_account(account).unwrap();
        store
    }

    fn controller<'a>(
        store: &'a InMemoryRegistryStore,
        config: &'a RegistryConfig,
        name: &str,
        now: Timestamp,
    ) -> AccountController<'a, InMemoryRegistryStore> {
        let mut domain_ctrl = DomainController::new(store, "iov-one", now).with_config(config);
        domain_ctrl.must_exist().validate().unwrap();
        AccountController::new(store, "iov-one", name, now)
            .with_config(config)
            .with_domain_controller(domain_ctrl)
    }

    #[test]
    fn test_existence_checks() {
        let store = setup(DomainType::Open, 500);
        let config = test_config();

        let mut ctrl = controller(&store, &config, "alice", 0);
        assert!(ctrl.must_exist().validate().is_ok());
        assert_eq!(ctrl.account().owner, OWNER);

        let mut ctrl = controller(&store, &config, "", 0);
        assert_eq!(
            ctrl.must_not_exist().validate(),
            Err(RegistryError::AccountAlreadyExists("*iov-one".into()))
        );

        let mut ctrl = controller(&store, &config, "bob", 0);
        assert_eq!(
            ctrl.must_exist().validate(),
            Err(RegistryError::AccountDoesNotExist("bob*iov-one".into()))
        );
    }

    #[test]
    fn test_valid_name() {
        let store = setup(DomainType::Open, 500);
        let config = test_config();
        let mut ctrl = controller(&store, &config, "Bad Name", 0);
        assert!(matches!(
            ctrl.valid_name().validate(),
            Err(RegistryError::InvalidAccountName(_))
        ));
    }

    #[test]
    fn test_not_expired_open_and_closed() {
        let config = test_config();

        let store = setup(DomainType::Open, 500);
        let mut ctrl = controller(&store, &config, "alice", 500);
        assert!(ctrl.must_exist().not_expired().validate().is_ok());
        let mut ctrl = controller(&store, &config, "alice", 501);
        assert!(matches!(
            ctrl.must_exist().not_expired().validate(),
            Err(RegistryError::AccountExpired(_))
        ));

        let store = setup(DomainType::Closed, 500);
        let mut ctrl = controller(&store, &config, "alice", 900);
        assert!(ctrl.must_exist().not_expired().validate().is_ok());
    }

    #[test]
    fn test_renewable() {
        let config = test_config();
        let store = setup(DomainType::Open, 500);

        let mut ctrl = controller(&store, &config, "alice", 400);
        assert!(ctrl.must_exist().renewable().validate().is_ok());

        // 500 + 100 > 250 + 300
        let mut ctrl = controller(&store, &config, "alice", 250);
        assert!(matches!(
            ctrl.must_exist().renewable().validate(),
            Err(RegistryError::Unauthorized(_))
        ));

        let mut ctrl = controller(&store, &config, "alice", 511);
        assert!(matches!(
            ctrl.must_exist().renewable().validate(),
            Err(RegistryError::RenewalDeadlineExceeded { .. })
        ));
    }

    #[test]
    fn test_certificate_checks() {
        let config = test_config();
        let store = setup(DomainType::Open, 500);

        let mut ctrl = controller(&store, &config, "alice", 0);
        assert_eq!(
            ctrl.must_exist().certificate_not_exist(&[3, 4]).validate(),
            Err(RegistryError::CertificateExists)
        );
        assert!(ctrl.certificate_not_exist(&[9]).validate().is_ok());
        assert_eq!(
            ctrl.certificate_limit_not_exceeded().validate(),
            Err(RegistryError::CertificateLimitReached { max: 2 })
        );
        assert!(matches!(
            ctrl.certificate_size_not_exceeded(&[0; 5]).validate(),
            Err(RegistryError::CertificateSizeExceeded { size: 5, max: 4 })
        ));

        assert!(ctrl.certificate_exists(&[3, 4]).validate().is_ok());
        assert_eq!(ctrl.certificate_index(), 1);
        assert_eq!(
            ctrl.certificate_exists(&[7]).validate(),
            Err(RegistryError::CertificateDoesNotExist("07".into()))
        );
    }

    #[test]
    fn test_resource_checks() {
        let config = test_config();
        let store = setup(DomainType::Open, 500);
        let mut ctrl = controller(&store, &config, "alice", 0);

        let ok = vec![
            Resource::new("blockchain:eth", "0xabc"),
            Resource::new("blockchain:btc", "bc1q"),
        ];
        assert!(ctrl
            .valid_resources(&ok)
            .resource_limit_not_exceeded(&ok)
            .validate()
            .is_ok());

        let dup = vec![
            Resource::new("blockchain:eth", "a"),
            Resource::new("blockchain:eth", "b"),
        ];
        assert!(matches!(
            ctrl.valid_resources(&dup).validate(),
            Err(RegistryError::InvalidResource(_))
        ));

        let bad = vec![Resource::new("blockchain eth", "a")];
        assert!(ctrl.valid_resources(&bad).validate().is_err());

        let too_many = vec![
            Resource::new("a", "1"),
            Resource::new("b", "2"),
            Resource::new("c", "3"),
        ];
        assert_eq!(
            ctrl.resource_limit_not_exceeded(&too_many).validate(),
            Err(RegistryError::ResourceLimitExceeded { count: 3, max: 2 })
        );

        assert!(ctrl.metadata_size_not_exceeded("12345").validate().is_ok());
        assert!(ctrl.metadata_size_not_exceeded("123456").validate().is_err());
    }

    #[test]
    fn test_registrable_by() {
        let config = test_config();

        let store = setup(DomainType::Closed, MAX_VALID_UNTIL);
        let mut ctrl = controller(&store, &config, "bob", 0);
        assert!(ctrl.registrable_by(ADMIN).validate().is_ok());
        assert!(matches!(
            ctrl.registrable_by(STRANGER).validate(),
            Err(RegistryError::Unauthorized(_))
        ));

        let store = setup(DomainType::Open, 500);
        let mut ctrl = controller(&store, &config, "bob", 0);
        assert!(ctrl.registrable_by(STRANGER).validate().is_ok());
    }

    #[test]
    fn test_deletable_by_closed_uses_domain_grace() {
        let config = test_config();
        let store = setup(DomainType::Closed, MAX_VALID_UNTIL);

        let mut ctrl = controller(&store, &config, "alice", 1_020);
        assert!(ctrl.must_exist().deletable_by(ADMIN).validate().is_ok());
        assert!(ctrl.deletable_by(OWNER).validate().is_err());

        let mut ctrl = controller(&store, &config, "alice", 1_021);
        assert!(ctrl.must_exist().deletable_by(STRANGER).validate().is_ok());
    }

    #[test]
    fn test_deletable_by_open_uses_account_grace() {
        let config = test_config();
        let store = setup(DomainType::Open, 500);

        let mut ctrl = controller(&store, &config, "alice", 510);
        assert!(ctrl.must_exist().deletable_by(OWNER).validate().is_ok());
        assert!(matches!(
            ctrl.deletable_by(ADMIN).validate(),
            Err(RegistryError::AccountGracePeriodNotFinished(name)) if name == "alice*iov-one"
        ));

        let mut ctrl = controller(&store, &config, "alice", 511);
        assert!(ctrl.must_exist().deletable_by(STRANGER).validate().is_ok());
    }

    #[test]
    fn test_transferable_and_resettable() {
        let config = test_config();

        let store = setup(DomainType::Closed, MAX_VALID_UNTIL);
        let mut ctrl = controller(&store, &config, "alice", 0);
        assert!(ctrl
            .must_exist()
            .transferable_by(ADMIN)
            .resettable_by(ADMIN, true)
            .validate()
            .is_ok());
        assert!(ctrl.transferable_by(OWNER).validate().is_err());

        let store = setup(DomainType::Open, 500);
        let mut ctrl = controller(&store, &config, "alice", 0);
        assert!(ctrl
            .must_exist()
            .transferable_by(OWNER)
            .resettable_by(OWNER, true)
            .validate()
            .is_ok());
        assert!(ctrl.transferable_by(ADMIN).validate().is_err());
        assert!(matches!(
            ctrl.resettable_by(ADMIN, true).validate(),
            Err(RegistryError::Unauthorized(_))
        ));
        assert!(ctrl.resettable_by(ADMIN, false).validate().is_ok());
    }

    #[test]
    fn test_into_parts() {
        let config = test_config();
        let store = setup(DomainType::Open, 500);
        let mut ctrl = controller(&store, &config, "alice", 0);
        ctrl.must_exist().validate().unwrap();
        assert_eq!(ctrl.domain().name, "iov-one");

        let (account, domain) = ctrl.into_parts();
        assert_eq!(account.name, "alice");
        assert_eq!(domain.map(|d| d.admin), Some(ADMIN));
    }

    #[test]
    #[should_panic(expected = "domain controller is required")]
    fn test_domain_dependent_check_without_domain_controller_panics() {
        let store = setup(DomainType::Open, 500);
        let mut ctrl = AccountController::new(&store, "iov-one", "alice", 0);
        let _ = ctrl.must_exist().registrable_by(ADMIN).validate();
    }

    #[test]
    #[should_panic(expected = "certificate index requested")]
    fn test_certificate_index_without_check_panics() {
        let store = setup(DomainType::Open, 500);
        let ctrl = AccountController::new(&store, "iov-one", "alice", 0);
        ctrl.certificate_index();
    }
}
