//! Domain validation chain.
//!
//! Checks are queued by the fluent methods and evaluated in order by
//! [`DomainController::validate`], which stops at the first failure. The
//! domain record is read from the store at most once and cached for the rest
//! of the chain (and for the executor that runs afterwards).
//!
//! ```ignore
//! let mut ctrl = DomainController::new(&store, "iov-one", now).with_config(&config);
//! ctrl.must_exist().renewable().validate()?;
//! let domain = ctrl.into_domain();
//! ```
//!
//! Checks that inspect the domain record panic when the domain does not
//! exist: callers must establish existence (usually with `must_exist`)
//! first. That is a programming error, not a business rejection.

use super::config::RegistryConfig;
use super::entities::{Address, Domain, DomainType, Timestamp, TransferFlag};
use super::errors::RegistryError;
use crate::ports::DomainStore;

#[derive(Clone, Debug)]
enum DomainCheck {
    MustExist,
    MustNotExist,
    ValidName,
    NotExpired,
    Admin(Address),
    Type(DomainType),
    Transferable(TransferFlag),
    Renewable,
    DeletableBy(Address),
}

/// Lazily loads one domain and runs an ordered chain of checks against it.
pub struct DomainController<'a, S: DomainStore + ?Sized> {
    store: &'a S,
    name: String,
    now: Timestamp,
    config: Option<&'a RegistryConfig>,
    domain: Option<Domain>,
    loaded: bool,
    checks: Vec<DomainCheck>,
}

pub(crate) fn require_config(config: Option<&RegistryConfig>) -> &RegistryConfig {
    match config {
        Some(config) => config,
        None => panic!("configuration is required for this check but was not provided"),
    }
}

impl<'a, S: DomainStore + ?Sized> DomainController<'a, S> {
    pub fn new(store: &'a S, name: impl Into<String>, now: Timestamp) -> Self {
        Self {
            store,
            name: name.into(),
            now,
            config: None,
            domain: None,
            loaded: false,
            checks: Vec::new(),
        }
    }

    /// Provide configuration, required by `valid_name`, `renewable` and
    /// `deletable_by`.
    pub fn with_config(mut self, config: &'a RegistryConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Seed the cache with an already loaded domain.
    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = Some(domain);
        self.loaded = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn now(&self) -> Timestamp {
        self.now
    }

    /// Fails with `DomainDoesNotExist` unless the domain exists.
    pub fn must_exist(&mut self) -> &mut Self {
        self.checks.push(DomainCheck::MustExist);
        self
    }

    /// Fails with `DomainAlreadyExists` if the domain exists.
    pub fn must_not_exist(&mut self) -> &mut Self {
        self.checks.push(DomainCheck::MustNotExist);
        self
    }

    /// Fails with `InvalidDomainName` unless the name matches the configured
    /// pattern.
    pub fn valid_name(&mut self) -> &mut Self {
        self.checks.push(DomainCheck::ValidName);
        self
    }

    /// Fails with `DomainExpired` once `valid_until <= now`.
    pub fn not_expired(&mut self) -> &mut Self {
        self.checks.push(DomainCheck::NotExpired);
        self
    }

    /// Fails with `Unauthorized` unless `addr` is the domain admin.
    pub fn admin(&mut self, addr: Address) -> &mut Self {
        self.checks.push(DomainCheck::Admin(addr));
        self
    }

    /// Fails with `InvalidDomainType` unless the domain has the given type.
    pub fn domain_type(&mut self, expected: DomainType) -> &mut Self {
        self.checks.push(DomainCheck::Type(expected));
        self
    }

    /// Open domains only accept `TransferFlag::ResetNone`.
    pub fn transferable(&mut self, flag: TransferFlag) -> &mut Self {
        self.checks.push(DomainCheck::Transferable(flag));
        self
    }

    /// Renewal must happen before the grace period ends and must not push
    /// the expiry beyond `now + period * (count_max + 1)`.
    pub fn renewable(&mut self) -> &mut Self {
        self.checks.push(DomainCheck::Renewable);
        self
    }

    /// Closed: admin any time, anyone after the grace period.
    /// Open: anyone after the grace period, nobody before.
    pub fn deletable_by(&mut self, addr: Address) -> &mut Self {
        self.checks.push(DomainCheck::DeletableBy(addr));
        self
    }

    /// Run the queued checks in order, stopping at the first failure.
    ///
    /// The queue is drained, so the controller can be reused for a second
    /// chain against the same cached record.
    pub fn validate(&mut self) -> Result<(), RegistryError> {
        let checks = std::mem::take(&mut self.checks);
        for check in checks {
            self.run(check)?;
        }
        Ok(())
    }

    /// The cached domain.
    ///
    /// # Panics
    ///
    /// If the domain was never loaded or does not exist.
    pub fn domain(&self) -> &Domain {
        match &self.domain {
            Some(domain) => domain,
            None => panic!(
                "domain '{}' requested before its existence was established",
                self.name
            ),
        }
    }

    /// Consume the controller and return the cached domain.
    ///
    /// # Panics
    ///
    /// If the domain was never loaded or does not exist.
    pub fn into_domain(self) -> Domain {
        match self.domain {
            Some(domain) => domain,
            None => panic!(
                "domain '{}' requested before its existence was established",
                self.name
            ),
        }
    }

    pub(crate) fn config(&self) -> Option<&'a RegistryConfig> {
        self.config
    }

    fn ensure_loaded(&mut self) -> Result<(), RegistryError> {
        if !self.loaded {
            self.domain = self.store.get_domain(&self.name)?;
            self.loaded = true;
        }
        Ok(())
    }

    /// Load the domain if needed and return it, panicking when it does not
    /// exist.
    pub(crate) fn require(&mut self) -> Result<&Domain, RegistryError> {
        self.ensure_loaded()?;
        match &self.domain {
            Some(domain) => Ok(domain),
            None => panic!(
                "validation check is not allowed on non existing domain '{}'",
                self.name
            ),
        }
    }

    fn run(&mut self, check: DomainCheck) -> Result<(), RegistryError> {
        match check {
            DomainCheck::MustExist => self.check_exists(),
            DomainCheck::MustNotExist => self.check_not_exists(),
            DomainCheck::ValidName => self.check_valid_name(),
            DomainCheck::NotExpired => self.check_not_expired(),
            DomainCheck::Admin(addr) => self.check_admin(&addr),
            DomainCheck::Type(expected) => self.check_type(expected),
            DomainCheck::Transferable(flag) => self.check_transferable(flag),
            DomainCheck::Renewable => self.check_renewable(),
            DomainCheck::DeletableBy(addr) => self.check_deletable_by(&addr),
        }
    }

    fn check_exists(&mut self) -> Result<(), RegistryError> {
        self.ensure_loaded()?;
        if self.domain.is_none() {
            return Err(RegistryError::DomainDoesNotExist(self.name.clone()));
        }
        Ok(())
    }

    fn check_not_exists(&mut self) -> Result<(), RegistryError> {
        self.ensure_loaded()?;
        if self.domain.is_some() {
            return Err(RegistryError::DomainAlreadyExists(self.name.clone()));
        }
        Ok(())
    }

    fn check_valid_name(&self) -> Result<(), RegistryError> {
        if !require_config(self.config).valid_domain_name.is_match(&self.name) {
            return Err(RegistryError::InvalidDomainName(self.name.clone()));
        }
        Ok(())
    }

    fn check_not_expired(&mut self) -> Result<(), RegistryError> {
        let now = self.now;
        let domain = self.require()?;
        if now < domain.valid_until {
            return Ok(());
        }
        Err(RegistryError::DomainExpired(domain.name.clone()))
    }

    fn check_admin(&mut self, addr: &Address) -> Result<(), RegistryError> {
        let domain = self.require()?;
        if domain.admin == *addr {
            return Ok(());
        }
        Err(RegistryError::Unauthorized(format!(
            "{} is not the admin of domain {}",
            hex::encode(addr),
            domain.name
        )))
    }

    fn check_type(&mut self, expected: DomainType) -> Result<(), RegistryError> {
        let domain = self.require()?;
        if domain.domain_type == expected {
            return Ok(());
        }
        Err(RegistryError::InvalidDomainType {
            name: domain.name.clone(),
            expected,
            actual: domain.domain_type,
        })
    }

    fn check_transferable(&mut self, flag: TransferFlag) -> Result<(), RegistryError> {
        let domain = self.require()?;
        match domain.domain_type {
            DomainType::Open if flag != TransferFlag::ResetNone => {
                Err(RegistryError::Unauthorized(format!(
                    "unable to transfer open domain {} with flag {}",
                    domain.name, flag
                )))
            }
            _ => Ok(()),
        }
    }

    fn check_renewable(&mut self) -> Result<(), RegistryError> {
        let config = require_config(self.config);
        let now = self.now;
        let domain = self.require()?;

        let deadline = domain.valid_until.saturating_add(config.domain_grace_period);
        if now > deadline {
            return Err(RegistryError::RenewalDeadlineExceeded {
                name: domain.name.clone(),
                deadline,
                now,
            });
        }

        // Creation consumes one period, hence the +1.
        let new_valid_until = domain
            .valid_until
            .saturating_add(config.domain_renewal_period);
        let maximum_valid_until = now.saturating_add(
            config
                .domain_renewal_period
                .saturating_mul(config.domain_renewal_count_max as u64 + 1),
        );
        if new_valid_until > maximum_valid_until {
            return Err(RegistryError::Unauthorized(format!(
                "unable to renew domain {}, renewal would be after maximum allowed {}",
                domain.name, maximum_valid_until
            )));
        }
        Ok(())
    }

    fn check_deletable_by(&mut self, addr: &Address) -> Result<(), RegistryError> {
        let config = require_config(self.config);
        let now = self.now;
        let domain = self.require()?;
        let grace_finished = now > domain.valid_until.saturating_add(config.domain_grace_period);

        match domain.domain_type {
            DomainType::Closed => {
                if grace_finished || domain.admin == *addr {
                    return Ok(());
                }
                Err(RegistryError::Unauthorized(
                    "only the admin can delete the domain before the grace period is finished"
                        .into(),
                ))
            }
            DomainType::Open => {
                if grace_finished {
                    return Ok(());
                }
                Err(RegistryError::DomainGracePeriodNotFinished(
                    domain.name.clone(),
                ))
            }
        }
    }
}
