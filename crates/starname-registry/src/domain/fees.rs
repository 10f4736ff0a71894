//! Fee schedule.
//!
//! Every parameter is a fixed-point amount expressed in the product's
//! reference unit. The amount charged is that parameter divided by the
//! current `fee_coin_price`, truncated, in `fee_coin_denom`.

use super::decimal::Dec;
use super::errors::ConfigError;
use serde::{Deserialize, Serialize};

/// Per-operation fee parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSchedule {
    pub fee_coin_denom: String,
    pub fee_coin_price: Dec,
    /// Floor applied to every fee, and the fee of operations without a
    /// dedicated parameter.
    pub fee_default: Dec,

    // Accounts
    pub register_account_closed: Dec,
    pub register_account_open: Dec,
    pub transfer_account_closed: Dec,
    pub transfer_account_open: Dec,
    pub replace_account_resources: Dec,
    pub add_account_certificate: Dec,
    pub del_account_certificate: Dec,
    pub set_account_metadata: Dec,

    // Domains, tiered by name length
    pub register_domain_1: Dec,
    pub register_domain_2: Dec,
    pub register_domain_3: Dec,
    pub register_domain_4: Dec,
    pub register_domain_5: Dec,
    pub register_domain_default: Dec,
    pub register_open_domain_multiplier: Dec,
    pub transfer_domain_closed: Dec,
    pub transfer_domain_open: Dec,
    pub renew_domain_open: Dec,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        let ten = Dec::from_int(10);
        Self {
            fee_coin_denom: "tiov".to_string(),
            fee_coin_price: ten,
            fee_default: ten,
            register_account_closed: ten,
            register_account_open: ten,
            transfer_account_closed: ten,
            transfer_account_open: ten,
            replace_account_resources: ten,
            add_account_certificate: ten,
            del_account_certificate: ten,
            set_account_metadata: ten,
            register_domain_1: ten,
            register_domain_2: ten,
            register_domain_3: ten,
            register_domain_4: ten,
            register_domain_5: ten,
            register_domain_default: ten,
            register_open_domain_multiplier: Dec::from_int(2),
            transfer_domain_closed: ten,
            transfer_domain_open: ten,
            renew_domain_open: ten,
        }
    }
}

impl FeeSchedule {
    /// Validate the schedule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fee_coin_denom.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "fee_coin_denom",
                reason: "must not be empty".to_string(),
            });
        }
        if self.fee_coin_price.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "fee_coin_price",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.fee_default.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "fee_default",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Builder-style method to set the fee coin and its price
    pub fn with_fee_coin(mut self, denom: impl Into<String>, price: Dec) -> Self {
        self.fee_coin_denom = denom.into();
        self.fee_coin_price = price;
        self
    }

    /// Builder-style method to set the default (floor) fee
    pub fn with_fee_default(mut self, fee: Dec) -> Self {
        self.fee_default = fee;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule_is_valid() {
        let fees = FeeSchedule::default();
        assert!(fees.validate().is_ok());
        assert_eq!(fees.register_open_domain_multiplier, Dec::from_int(2));
    }

    #[test]
    fn test_validate_rejects_zero_price() {
        let fees = FeeSchedule::default().with_fee_coin("tiov", Dec::ZERO);
        assert!(matches!(
            fees.validate(),
            Err(ConfigError::InvalidValue {
                field: "fee_coin_price",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_denom_and_zero_default() {
        let fees = FeeSchedule::default().with_fee_coin(" ", Dec::ONE);
        assert!(fees.validate().is_err());

        let fees = FeeSchedule::default().with_fee_default(Dec::ZERO);
        assert!(matches!(
            fees.validate(),
            Err(ConfigError::InvalidValue {
                field: "fee_default",
                ..
            })
        ));
    }

    #[test]
    fn test_serde_roundtrip_uses_decimal_strings() {
        let fees = FeeSchedule::default();
        let json = serde_json::to_value(&fees).unwrap();
        assert_eq!(json["fee_default"], "10.000000000000000000");
        assert_eq!(json["register_open_domain_multiplier"], "2.000000000000000000");
    }
}
