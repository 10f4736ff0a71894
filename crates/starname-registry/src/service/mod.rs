//! # Registry Service
//!
//! The dispatch layer. For every message it:
//! 1. Runs stateless `validate_basic`
//! 2. Runs the domain and account controller chains for that message
//! 3. Computes the fee and reserves it from the payer
//! 4. Runs the executors
//! 5. Commits the buffered writes to the store
//! 6. Commits the reserved fee, or releases it if any step failed
//!
//! Steps 2 to 4 run against a [`WriteSet`]; any failure drops it and the
//! store is left untouched.

mod account_handlers;
mod domain_handlers;
pub mod queries;

pub use queries::RegistryQueries;

use crate::adapters::{WriteBatch, WriteSet};
use crate::domain::{
    Account, AccountController, Address, Coin, Domain, FeeController, FeeSchedule, MsgKind,
    RegistryConfig, RegistryError, RegistryMsg, Timestamp,
};
use crate::events::MsgOutcome;
use crate::ports::inbound::RegistryApi;
use crate::ports::outbound::{ConfigProvider, FeeReceipt, FeeSink, RegistryStore};
use starname_telemetry::{log_event, log_registry_event, REGISTRY_SUBSYSTEM};

/// Dependencies for [`RegistryService`].
pub struct RegistryDependencies<ST, FS, CP> {
    pub store: ST,
    pub fee_sink: FS,
    pub config: CP,
}

/// The registry service.
///
/// Owns its store, fee sink and configuration provider. Messages are
/// processed strictly one at a time through [`RegistryApi::deliver`].
pub struct RegistryService<ST, FS, CP>
where
    ST: RegistryStore,
    FS: FeeSink,
    CP: ConfigProvider,
{
    pub(crate) store: ST,
    pub(crate) fee_sink: FS,
    pub(crate) config: CP,
}

impl<ST, FS, CP> RegistryService<ST, FS, CP>
where
    ST: RegistryStore,
    FS: FeeSink,
    CP: ConfigProvider,
{
    pub fn new(deps: RegistryDependencies<ST, FS, CP>) -> Self {
        log_event!(
            info,
            REGISTRY_SUBSYSTEM,
            "[starname] registry service initialised",
            domain_renewal_period = deps.config.config().domain_renewal_period,
            account_renewal_period = deps.config.config().account_renewal_period,
            fee_denom = %deps.config.fees().fee_coin_denom
        );
        Self {
            store: deps.store,
            fee_sink: deps.fee_sink,
            config: deps.config,
        }
    }

    pub fn store(&self) -> &ST {
        &self.store
    }

    pub fn fee_sink(&self) -> &FS {
        &self.fee_sink
    }

    pub fn fee_sink_mut(&mut self) -> &mut FS {
        &mut self.fee_sink
    }

    pub fn config_provider(&self) -> &CP {
        &self.config
    }

    /// Read-only view over the committed state.
    pub fn queries(&self) -> RegistryQueries<'_, ST> {
        RegistryQueries::new(&self.store)
    }

    /// Run one message against a fresh write set.
    ///
    /// Returns the fees reserved along the way whatever the outcome; the
    /// caller settles them.
    fn handle(
        &mut self,
        msg: RegistryMsg,
        now: Timestamp,
    ) -> (Result<(MsgOutcome, WriteBatch), RegistryError>, Vec<FeeReceipt>) {
        if let Err(err) = msg.validate_basic() {
            return (Err(err), Vec::new());
        }

        let mut ctx = MsgContext {
            store: WriteSet::new(&self.store),
            fee_sink: &mut self.fee_sink,
            receipts: Vec::new(),
            config: self.config.config(),
            fees: self.config.fees(),
            now,
            kind: msg.kind(),
            payer: msg.fee_payer(),
        };

        let outcome = match msg {
            RegistryMsg::RegisterDomain(m) => domain_handlers::register_domain(&mut ctx, m),
            RegistryMsg::RenewDomain(m) => domain_handlers::renew_domain(&mut ctx, m),
            RegistryMsg::DeleteDomain(m) => domain_handlers::delete_domain(&mut ctx, m),
            RegistryMsg::TransferDomain(m) => domain_handlers::transfer_domain(&mut ctx, m),
            RegistryMsg::RegisterAccount(m) => account_handlers::register_account(&mut ctx, m),
            RegistryMsg::RenewAccount(m) => account_handlers::renew_account(&mut ctx, m),
            RegistryMsg::DeleteAccount(m) => account_handlers::delete_account(&mut ctx, m),
            RegistryMsg::TransferAccount(m) => account_handlers::transfer_account(&mut ctx, m),
            RegistryMsg::ReplaceAccountResources(m) => {
                account_handlers::replace_account_resources(&mut ctx, m)
            }
            RegistryMsg::AddAccountCertificate(m) => {
                account_handlers::add_account_certificate(&mut ctx, m)
            }
            RegistryMsg::DeleteAccountCertificate(m) => {
                account_handlers::delete_account_certificate(&mut ctx, m)
            }
            RegistryMsg::ReplaceAccountMetadata(m) => {
                account_handlers::replace_account_metadata(&mut ctx, m)
            }
        };

        let MsgContext { store, receipts, .. } = ctx;
        (outcome.map(|outcome| (outcome, store.into_batch())), receipts)
    }
}

impl<ST, FS, CP> RegistryApi for RegistryService<ST, FS, CP>
where
    ST: RegistryStore,
    FS: FeeSink,
    CP: ConfigProvider,
{
    fn deliver(&mut self, msg: RegistryMsg, now: Timestamp) -> Result<MsgOutcome, RegistryError> {
        let kind = msg.kind();
        let domain = msg.domain().to_string();
        let account = msg.account_name().unwrap_or_default().to_string();

        let (handled, receipts) = self.handle(msg, now);
        let committed = handled.and_then(|(outcome, batch)| {
            let writes = batch.len();
            batch.apply(&mut self.store)?;
            Ok((outcome, writes))
        });

        match committed {
            Ok((outcome, writes)) => {
                for receipt in receipts {
                    self.fee_sink.commit(receipt);
                }
                log_registry_event!(
                    info,
                    "[starname] message delivered",
                    domain,
                    account,
                    kind = %kind,
                    fee = %outcome.fee,
                    writes
                );
                Ok(outcome)
            }
            Err(err) => {
                let released = receipts.len();
                for receipt in receipts {
                    self.fee_sink.release(receipt);
                }
                log_registry_event!(
                    warn,
                    "[starname] message rejected",
                    domain,
                    account,
                    kind = %kind,
                    error_kind = ?err.kind(),
                    error = %err,
                    fees_released = released
                );
                Err(err)
            }
        }
    }
}

/// Everything one message handler may touch.
pub(crate) struct MsgContext<'a, S, F>
where
    S: RegistryStore + ?Sized,
    F: FeeSink + ?Sized,
{
    pub(crate) store: WriteSet<'a, S>,
    fee_sink: &'a mut F,
    receipts: Vec<FeeReceipt>,
    pub(crate) config: &'a RegistryConfig,
    fees: &'a FeeSchedule,
    pub(crate) now: Timestamp,
    kind: MsgKind,
    payer: Address,
}

impl<S, F> MsgContext<'_, S, F>
where
    S: RegistryStore + ?Sized,
    F: FeeSink + ?Sized,
{
    /// Compute the fee for this message against `domain` and reserve it
    /// from the payer. The reservation is settled by `deliver`.
    pub(crate) fn charge(&mut self, domain: &Domain) -> Result<Coin, RegistryError> {
        let fee = FeeController::new(self.fees, domain)
            .with_accounts(&self.store)
            .get_fee(self.kind)?;
        let receipt = self.fee_sink.reserve(&self.payer, &fee)?;
        self.receipts.push(receipt);
        tracing::debug!(
            kind = %self.kind,
            payer = %hex::encode(self.payer),
            fee = %fee,
            "fee reserved"
        );
        Ok(fee)
    }
}

/// Split a validated account controller into its account and domain.
///
/// # Panics
///
/// If no domain controller was injected.
pub(crate) fn validated<S: RegistryStore + ?Sized>(ctrl: AccountController<'_, S>) -> (Account, Domain) {
    match ctrl.into_parts() {
        (account, Some(domain)) => (account, domain),
        (_, None) => panic!("account handlers must inject a domain controller"),
    }
}
