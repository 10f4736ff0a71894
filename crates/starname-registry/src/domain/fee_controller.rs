//! Fee computation.
//!
//! `get_fee` is a pure function of the operation, the domain it targets and
//! the fee schedule (plus the account count for closed-domain renewals). The
//! result is never below the configured default fee.

use super::decimal::Dec;
use super::entities::{Coin, Domain, DomainType};
use super::errors::RegistryError;
use super::fees::FeeSchedule;
use super::messages::MsgKind;
use crate::ports::AccountStore;

/// Computes the fee owed for one operation on one domain.
pub struct FeeController<'a> {
    fees: &'a FeeSchedule,
    domain: &'a Domain,
    accounts: Option<&'a dyn AccountStore>,
}

fn overflow(what: &str) -> RegistryError {
    RegistryError::FeeComputation(format!("{what} overflows"))
}

impl<'a> FeeController<'a> {
    pub fn new(fees: &'a FeeSchedule, domain: &'a Domain) -> Self {
        Self {
            fees,
            domain,
            accounts: None,
        }
    }

    /// Provide the account store, required to price closed-domain renewals.
    pub fn with_accounts(mut self, accounts: &'a dyn AccountStore) -> Self {
        self.accounts = Some(accounts);
        self
    }

    /// Fee owed for `kind`, in the configured fee coin.
    pub fn get_fee(&self, kind: MsgKind) -> Result<Coin, RegistryError> {
        let mut fee = self.fee_param(kind)?;
        if fee < self.fees.fee_default {
            fee = self.fees.fee_default;
        }

        let amount = fee
            .checked_quo_floor(self.fees.fee_coin_price)
            .ok_or_else(|| RegistryError::FeeComputation("fee coin price is zero".into()))?;

        Ok(Coin::new(self.fees.fee_coin_denom.clone(), amount))
    }

    fn fee_param(&self, kind: MsgKind) -> Result<Dec, RegistryError> {
        let fees = self.fees;
        let fee = match kind {
            MsgKind::RegisterDomain => self.register_domain()?,
            MsgKind::RenewDomain => self.renew_domain()?,
            MsgKind::TransferDomain => {
                self.by_type(fees.transfer_domain_open, fees.transfer_domain_closed)
            }
            MsgKind::RegisterAccount | MsgKind::RenewAccount => {
                self.by_type(fees.register_account_open, fees.register_account_closed)
            }
            MsgKind::TransferAccount => {
                self.by_type(fees.transfer_account_open, fees.transfer_account_closed)
            }
            MsgKind::ReplaceAccountResources => fees.replace_account_resources,
            MsgKind::AddAccountCertificate => fees.add_account_certificate,
            MsgKind::DeleteAccountCertificate => fees.del_account_certificate,
            MsgKind::ReplaceAccountMetadata => fees.set_account_metadata,
            MsgKind::DeleteDomain | MsgKind::DeleteAccount => fees.fee_default,
        };
        Ok(fee)
    }

    fn by_type(&self, open: Dec, closed: Dec) -> Dec {
        match self.domain.domain_type {
            DomainType::Open => open,
            DomainType::Closed => closed,
        }
    }

    /// Tiered by name length; open domains pay the multiplier on top.
    fn register_domain(&self) -> Result<Dec, RegistryError> {
        let fees = self.fees;
        let base = match self.domain.name.len() {
            1 => fees.register_domain_1,
            2 => fees.register_domain_2,
            3 => fees.register_domain_3,
            4 => fees.register_domain_4,
            5 => fees.register_domain_5,
            _ => fees.register_domain_default,
        };
        match self.domain.domain_type {
            DomainType::Open => base
                .checked_mul(fees.register_open_domain_multiplier)
                .ok_or_else(|| overflow("open domain registration fee")),
            DomainType::Closed => Ok(base),
        }
    }

    /// Open domains pay a flat fee. Closed domains renew every account in
    /// bulk: the registration fee plus one closed-account fee per account.
    fn renew_domain(&self) -> Result<Dec, RegistryError> {
        if self.domain.domain_type == DomainType::Open {
            return Ok(self.fees.renew_domain_open);
        }

        let accounts = match self.accounts {
            Some(accounts) => accounts,
            None => panic!("account store is required to price a closed domain renewal"),
        };
        let account_count = accounts.account_keys_by_domain(&self.domain.name)?.len() as u64;

        let per_account = self
            .fees
            .register_account_closed
            .checked_mul_int(account_count)
            .ok_or_else(|| overflow("account surcharge"))?;

        self.register_domain()?
            .checked_add(per_account)
            .ok_or_else(|| overflow("closed domain renewal fee"))
    }
}
