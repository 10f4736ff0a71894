use crate::domain::{ConfigError, FeeSchedule, RegistryConfig, RegistryGenesisConfig};
use crate::ports::outbound::ConfigProvider;

/// Configuration fixed at construction time.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigProvider {
    config: RegistryConfig,
    fees: FeeSchedule,
}

impl StaticConfigProvider {
    /// Build a provider, rejecting invalid configuration up front.
    pub fn new(config: RegistryConfig, fees: FeeSchedule) -> Result<Self, ConfigError> {
        config.validate()?;
        fees.validate()?;
        Ok(Self { config, fees })
    }

    pub fn from_genesis(genesis: RegistryGenesisConfig) -> Result<Self, ConfigError> {
        Self::new(genesis.config, genesis.fees)
    }

    /// Parse and validate a JSON genesis document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Self::from_genesis(RegistryGenesisConfig::from_json_str(json)?)
    }
}

impl ConfigProvider for StaticConfigProvider {
    fn config(&self) -> &RegistryConfig {
        &self.config
    }

    fn fees(&self) -> &FeeSchedule {
        &self.fees
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_configuration() {
        let config = RegistryConfig::default().with_account_renewal(0, 1);
        let err = StaticConfigProvider::new(config, FeeSchedule::default()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = StaticConfigProvider::from_json_str(r#"{"config": {"valid_uri": "(("}}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }

    #[test]
    fn test_from_json_uses_defaults_for_missing_fields() {
        let provider =
            StaticConfigProvider::from_json_str(r#"{"config": {"resources_max": 3}}"#).unwrap();
        assert_eq!(provider.config().resources_max, 3);
        assert_eq!(provider.fees(), &FeeSchedule::default());
    }
}
