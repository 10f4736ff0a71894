//! Core registry entities.
//!
//! A `Domain` is the top-level namespace unit. Every domain owns a set of
//! `Account`s, one of which (the account with the empty name) is created
//! together with the domain and tracks its ownership and expiry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 20-byte account address.
pub type Address = [u8; 20];

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// Opaque certificate blob.
pub type Certificate = Vec<u8>;

/// Name of the account paired with every domain.
pub const EMPTY_ACCOUNT_NAME: &str = "";

/// Separator used in starname keys (`name*domain`) and account primary keys.
pub const STARNAME_SEPARATOR: char = '*';

/// Expiry assigned to accounts of closed domains (year 10754).
pub const MAX_VALID_UNTIL: Timestamp = 277_206_115_200;

/// Domain type.
///
/// - `Closed`: the domain admin controls the lifecycle of every account.
/// - `Open`: accounts are owned and renewed independently of the admin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainType {
    Open,
    Closed,
}

impl fmt::Display for DomainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainType::Open => write!(f, "open"),
            DomainType::Closed => write!(f, "closed"),
        }
    }
}

/// What happens to the accounts of a domain when the domain changes hands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TransferFlag {
    /// Delete every account except the empty-name one.
    Flush = 0,
    /// Transfer the accounts owned by the previous admin.
    Owned = 1,
    /// Leave every account untouched.
    ResetNone = 2,
}

impl TryFrom<u8> for TransferFlag {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TransferFlag::Flush),
            1 => Ok(TransferFlag::Owned),
            2 => Ok(TransferFlag::ResetNone),
            other => Err(other),
        }
    }
}

impl fmt::Display for TransferFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

/// A registered domain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    /// Primary key, immutable after creation.
    pub name: String,
    pub admin: Address,
    pub broker: Option<Address>,
    pub valid_until: Timestamp,
    pub domain_type: DomainType,
}

impl Domain {
    /// Build a domain with no broker.
    pub fn new(
        name: impl Into<String>,
        admin: Address,
        valid_until: Timestamp,
        domain_type: DomainType,
    ) -> Self {
        Self {
            name: name.into(),
            admin,
            broker: None,
            valid_until,
            domain_type,
        }
    }

    /// Key of the account created together with this domain.
    pub fn empty_account_key(&self) -> AccountKey {
        AccountKey::new(&self.name, EMPTY_ACCOUNT_NAME)
    }
}

/// A (uri, resource) pair an account resolves to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resource {
    pub uri: String,
    pub resource: String,
}

impl Resource {
    pub fn new(uri: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            resource: resource.into(),
        }
    }
}

/// Primary key of an account: the pair (domain, name).
///
/// Ordering is by domain first so that range scans over one domain are
/// contiguous.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountKey {
    pub domain: String,
    pub name: String,
}

impl AccountKey {
    pub fn new(domain: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            name: name.into(),
        }
    }

    /// Whether this key addresses the domain's paired account.
    pub fn is_empty_account(&self) -> bool {
        self.name.is_empty()
    }

    /// Human readable starname form: `name*domain`.
    pub fn starname(&self) -> String {
        format!("{}{}{}", self.name, STARNAME_SEPARATOR, self.domain)
    }
}

impl fmt::Display for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.domain, STARNAME_SEPARATOR, self.name)
    }
}

/// A named entry inside a domain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub domain: String,
    /// Empty for the account paired with the domain.
    pub name: String,
    pub owner: Address,
    pub broker: Option<Address>,
    pub valid_until: Timestamp,
    pub resources: Vec<Resource>,
    pub certificates: Vec<Certificate>,
    pub metadata_uri: String,
}

impl Account {
    /// Build an account with no resources, certificates, metadata or broker.
    pub fn new(
        domain: impl Into<String>,
        name: impl Into<String>,
        owner: Address,
        valid_until: Timestamp,
    ) -> Self {
        Self {
            domain: domain.into(),
            name: name.into(),
            owner,
            broker: None,
            valid_until,
            resources: Vec::new(),
            certificates: Vec::new(),
            metadata_uri: String::new(),
        }
    }

    pub fn key(&self) -> AccountKey {
        AccountKey::new(&self.domain, &self.name)
    }

    /// Clear everything an owner attached to the account.
    pub fn reset_contents(&mut self) {
        self.certificates.clear();
        self.resources.clear();
        self.metadata_uri.clear();
    }
}

/// An amount of a single denomination.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: u128,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_key_ordering_groups_by_domain() {
        let a = AccountKey::new("alpha", "zz");
        let b = AccountKey::new("beta", "");
        assert!(a < b);
        assert!(AccountKey::new("alpha", "") < a);
    }

    #[test]
    fn test_account_key_formats() {
        let key = AccountKey::new("iov", "alice");
        assert_eq!(key.to_string(), "iov*alice");
        assert_eq!(key.starname(), "alice*iov");
        assert!(!key.is_empty_account());
        assert!(AccountKey::new("iov", EMPTY_ACCOUNT_NAME).is_empty_account());
    }

    #[test]
    fn test_transfer_flag_from_u8() {
        assert_eq!(TransferFlag::try_from(0), Ok(TransferFlag::Flush));
        assert_eq!(TransferFlag::try_from(1), Ok(TransferFlag::Owned));
        assert_eq!(TransferFlag::try_from(2), Ok(TransferFlag::ResetNone));
        assert_eq!(TransferFlag::try_from(3), Err(3));
        assert_eq!(TransferFlag::Owned.to_string(), "1");
    }

    #[test]
    fn test_reset_contents() {
        let mut account = Account::new("iov", "alice", [1u8; 20], 10);
        account.resources.push(Resource::new("blockchain:eth", "0xabc"));
        account.certificates.push(vec![1, 2, 3]);
        account.metadata_uri = "https://example.org".into();

        account.reset_contents();

        assert!(account.resources.is_empty());
        assert!(account.certificates.is_empty());
        assert!(account.metadata_uri.is_empty());
        assert_eq!(account.owner, [1u8; 20]);
    }

    #[test]
    fn test_domain_type_serde() {
        let json = serde_json::to_string(&DomainType::Closed).unwrap();
        assert_eq!(json, "\"closed\"");
        let parsed: DomainType = serde_json::from_str("\"open\"").unwrap();
        assert_eq!(parsed, DomainType::Open);
    }
}
