//! Registry configuration.
//!
//! Durations are whole seconds. Name and resource rules are [`Pattern`]s:
//! regular expressions compiled once, when the configuration is built or
//! deserialized, and shared by every check afterwards.
//!
//! # Example
//!
//! ```ignore
//! use starname_registry::domain::RegistryConfig;
//!
//! let config = RegistryConfig::default()
//!     .with_domain_renewal(31_557_600, 2)
//!     .with_resources_max(5);
//! config.validate()?;
//! ```

use super::errors::ConfigError;
use super::fees::FeeSchedule;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One year, as used by the production network.
pub const SECONDS_PER_YEAR: u64 = 31_557_600;

/// Thirty days.
pub const DEFAULT_GRACE_PERIOD: u64 = 2_592_000;

/// A compiled regular expression that serializes as its source text.
#[derive(Clone, Debug)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(source: &str) -> Result<Self, ConfigError> {
        Regex::new(source)
            .map(Self)
            .map_err(|e| ConfigError::InvalidPattern {
                pattern: source.to_string(),
                reason: e.to_string(),
            })
    }

    /// Compile a pattern that is part of the built-in defaults.
    ///
    /// # Panics
    ///
    /// If `source` does not compile.
    fn builtin(source: &'static str) -> Self {
        match Self::new(source) {
            Ok(pattern) => pattern,
            Err(err) => panic!("built-in pattern is invalid: {err}"),
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn regex(&self) -> &Regex {
        &self.0
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Pattern {}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pattern {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Self::new(&source).map_err(serde::de::Error::custom)
    }
}

/// Registry configuration, immutable for the duration of one message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Pattern every domain name must match
    pub valid_domain_name: Pattern,
    /// Pattern every account name must match
    pub valid_account_name: Pattern,
    /// Pattern for resource URIs
    pub valid_uri: Pattern,
    /// Pattern for resource values
    pub valid_resource: Pattern,

    /// Length of one domain renewal (seconds)
    pub domain_renewal_period: u64,
    /// Number of renewals a domain may be ahead of the current time
    pub domain_renewal_count_max: u32,
    /// Window after expiry before a domain can be claimed by anyone (seconds)
    pub domain_grace_period: u64,

    /// Length of one account renewal (seconds)
    pub account_renewal_period: u64,
    /// Number of renewals an account may be ahead of the current time
    pub account_renewal_count_max: u32,
    /// Window after expiry before an account can be deleted by anyone (seconds)
    pub account_grace_period: u64,

    /// Maximum resources per account
    pub resources_max: u32,
    /// Maximum certificate size (bytes)
    pub certificate_size_max: u64,
    /// Maximum certificates per account
    pub certificate_count_max: u32,
    /// Maximum metadata URI length (bytes)
    pub metadata_size_max: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            valid_domain_name: Pattern::builtin(r"^[-_a-z0-9]{4,16}$"),
            valid_account_name: Pattern::builtin(r"^[-_\.a-z0-9]{1,64}$"),
            valid_uri: Pattern::builtin(r"^[-a-z0-9A-Z:]+$"),
            valid_resource: Pattern::builtin(r"^[a-z0-9A-Z]+$"),
            domain_renewal_period: SECONDS_PER_YEAR,
            domain_renewal_count_max: 2,
            domain_grace_period: DEFAULT_GRACE_PERIOD,
            account_renewal_period: SECONDS_PER_YEAR,
            account_renewal_count_max: 3,
            account_grace_period: DEFAULT_GRACE_PERIOD,
            resources_max: 3,
            certificate_size_max: 10_000,
            certificate_count_max: 3,
            metadata_size_max: 86_400,
        }
    }
}

impl RegistryConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.domain_renewal_period == 0 {
            return Err(ConfigError::InvalidValue {
                field: "domain_renewal_period",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.account_renewal_period == 0 {
            return Err(ConfigError::InvalidValue {
                field: "account_renewal_period",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// Builder-style method to set domain renewal rules
    pub fn with_domain_renewal(mut self, period: u64, count_max: u32) -> Self {
        self.domain_renewal_period = period;
        self.domain_renewal_count_max = count_max;
        self
    }

    /// Builder-style method to set the domain grace period
    pub fn with_domain_grace_period(mut self, seconds: u64) -> Self {
        self.domain_grace_period = seconds;
        self
    }

    /// Builder-style method to set account renewal rules
    pub fn with_account_renewal(mut self, period: u64, count_max: u32) -> Self {
        self.account_renewal_period = period;
        self.account_renewal_count_max = count_max;
        self
    }

    /// Builder-style method to set the account grace period
    pub fn with_account_grace_period(mut self, seconds: u64) -> Self {
        self.account_grace_period = seconds;
        self
    }

    /// Builder-style method to set the account name pattern
    pub fn with_valid_account_name(mut self, pattern: Pattern) -> Self {
        self.valid_account_name = pattern;
        self
    }

    /// Builder-style method to set the domain name pattern
    pub fn with_valid_domain_name(mut self, pattern: Pattern) -> Self {
        self.valid_domain_name = pattern;
        self
    }

    /// Builder-style method to set the resource limit
    pub fn with_resources_max(mut self, max: u32) -> Self {
        self.resources_max = max;
        self
    }

    /// Builder-style method to set certificate limits
    pub fn with_certificate_limits(mut self, size_max: u64, count_max: u32) -> Self {
        self.certificate_size_max = size_max;
        self.certificate_count_max = count_max;
        self
    }

    /// Builder-style method to set the metadata limit
    pub fn with_metadata_size_max(mut self, max: u64) -> Self {
        self.metadata_size_max = max;
        self
    }
}

/// Configuration and fee schedule loaded together, as found in a genesis
/// document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryGenesisConfig {
    #[serde(default)]
    pub config: RegistryConfig,
    #[serde(default)]
    pub fees: FeeSchedule,
}

impl RegistryGenesisConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let genesis: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        genesis.validate()?;
        Ok(genesis)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.config.validate()?;
        self.fees.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = RegistryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.domain_renewal_period, SECONDS_PER_YEAR);
        assert_eq!(config.account_renewal_count_max, 3);
    }

    #[test]
    fn test_default_patterns() {
        let config = RegistryConfig::default();
        let domain = &config.valid_domain_name;
        assert!(domain.is_match("iov-one"));
        assert!(!domain.is_match("abc"));
        assert!(!domain.is_match("UPPER"));

        let account = &config.valid_account_name;
        assert!(account.is_match("alice.bob"));
        assert!(!account.is_match(""));

        assert!(config.valid_uri.is_match("asset:iov"));
        assert!(!config.valid_resource.is_match("0x-abc"));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = Pattern::new("([a-z").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidPattern { ref pattern, .. } if pattern.as_str() == "([a-z"
        ));

        let json = r#"{"valid_domain_name": "([a-z"}"#;
        assert!(serde_json::from_str::<RegistryConfig>(json).is_err());
    }

    #[test]
    fn test_pattern_compiled_once_and_shared_by_clones() {
        let config = RegistryConfig::default()
            .with_valid_domain_name("^[a-z]{3}$".parse().unwrap());
        let copy = config.clone();
        assert!(copy.valid_domain_name.is_match("abc"));
        assert_eq!(copy, config);
        assert_eq!(
            config.valid_domain_name.regex().as_str(),
            config.valid_domain_name.as_str()
        );

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["valid_domain_name"], "^[a-z]{3}$");
        let back: RegistryConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_zero_renewal_period_rejected() {
        let config = RegistryConfig::default().with_account_renewal(0, 1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "account_renewal_period",
                ..
            })
        ));
    }

    #[test]
    fn test_genesis_from_json() {
        let json = r#"{
            "config": {
                "domain_renewal_period": 100,
                "domain_grace_period": 10,
                "resources_max": 5
            },
            "fees": {
                "fee_coin_denom": "tiov",
                "fee_coin_price": "0.5",
                "fee_default": "1"
            }
        }"#;

        let genesis = RegistryGenesisConfig::from_json_str(json).unwrap();
        assert_eq!(genesis.config.domain_renewal_period, 100);
        assert_eq!(genesis.config.resources_max, 5);
        // Unspecified fields fall back to defaults.
        assert_eq!(genesis.config.certificate_count_max, 3);
        assert_eq!(genesis.fees.fee_coin_denom, "tiov");
        assert_eq!(genesis.fees.fee_coin_price, "0.5".parse().unwrap());
    }

    #[test]
    fn test_genesis_rejects_malformed_json() {
        assert!(matches!(
            RegistryGenesisConfig::from_json_str("{ not json"),
            Err(ConfigError::Malformed(_))
        ));
        assert!(matches!(
            RegistryGenesisConfig::from_json_str(r#"{"fees": {"fee_coin_price": "0"}}"#),
            Err(ConfigError::InvalidValue {
                field: "fee_coin_price",
                ..
            })
        ));
    }
}
