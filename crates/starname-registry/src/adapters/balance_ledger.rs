use crate::domain::{Address, Coin, FeeError};
use crate::ports::outbound::{FeeReceipt, FeeSink};
use std::collections::BTreeMap;

/// In-memory token balances with a single protocol fee collector.
///
/// Reserved fees leave the payer's balance at once and sit in `held` until
/// they are committed to `collected` or released back to the payer.
#[derive(Debug, Default, Clone)]
pub struct BalanceLedger {
    balances: BTreeMap<(Address, String), u128>,
    held: BTreeMap<String, u128>,
    collected: BTreeMap<String, u128>,
}

impl BalanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `address` with `coin`, on top of any existing balance.
    pub fn with_balance(mut self, address: Address, coin: Coin) -> Self {
        self.credit(address, &coin);
        self
    }

    pub fn credit(&mut self, address: Address, coin: &Coin) {
        let balance = self.balances.entry((address, coin.denom.clone())).or_default();
        *balance = balance.saturating_add(coin.amount);
    }

    pub fn balance(&self, address: &Address, denom: &str) -> u128 {
        self.balances
            .get(&(*address, denom.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Total collected in `denom` since creation.
    pub fn collected(&self, denom: &str) -> u128 {
        self.collected.get(denom).copied().unwrap_or(0)
    }

    /// Reserved in `denom` and not yet committed or released.
    pub fn held(&self, denom: &str) -> u128 {
        self.held.get(denom).copied().unwrap_or(0)
    }

    /// # Panics
    ///
    /// If `fee` was never reserved.
    fn take_held(&mut self, fee: &Coin) {
        let held = self.held(&fee.denom);
        if held < fee.amount {
            panic!("fee {fee} settled without a matching reservation");
        }
        self.held.insert(fee.denom.clone(), held - fee.amount);
    }
}

impl FeeSink for BalanceLedger {
    fn reserve(&mut self, payer: &Address, fee: &Coin) -> Result<FeeReceipt, FeeError> {
        let receipt = FeeReceipt {
            payer: *payer,
            fee: fee.clone(),
        };
        if fee.is_zero() {
            return Ok(receipt);
        }

        let available = self.balance(payer, &fee.denom);
        if available < fee.amount {
            return Err(FeeError::InsufficientFunds {
                denom: fee.denom.clone(),
                required: fee.amount,
                available,
            });
        }
        // Held plus collected must still fit once this fee is committed.
        let collected = self.collected(&fee.denom);
        let held = self
            .held(&fee.denom)
            .checked_add(fee.amount)
            .filter(|held| held.checked_add(collected).is_some())
            .ok_or_else(|| FeeError::Overflow(fee.denom.clone()))?;

        self.balances
            .insert((*payer, fee.denom.clone()), available - fee.amount);
        self.held.insert(fee.denom.clone(), held);
        Ok(receipt)
    }

    fn commit(&mut self, receipt: FeeReceipt) {
        let FeeReceipt { fee, .. } = receipt;
        if fee.is_zero() {
            return;
        }
        self.take_held(&fee);
        let collected = self.collected.entry(fee.denom).or_default();
        *collected = collected.saturating_add(fee.amount);
    }

    fn release(&mut self, receipt: FeeReceipt) {
        let FeeReceipt { payer, fee } = receipt;
        if fee.is_zero() {
            return;
        }
        self.take_held(&fee);
        self.credit(payer, &fee);
    }
}
