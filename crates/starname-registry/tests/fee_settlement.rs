//! Fees settle together with the state writes of their message.

use starname_registry::*;
use std::cell::Cell;

const ALICE: Address = [0xa1; 20];
const FUNDS: u128 = 1_000_000;
const NOW: Timestamp = 1_000_000;

/// In-memory store whose scans or writes can be switched to fail.
#[derive(Default)]
struct FlakyStore {
    inner: InMemoryRegistryStore,
    fail_scans: Cell<bool>,
    fail_writes: Cell<bool>,
}

impl FlakyStore {
    fn scan(&self) -> Result<(), StoreError> {
        if self.fail_scans.get() {
            return Err(StoreError::Backend("index unavailable".into()));
        }
        Ok(())
    }

    fn write(&self) -> Result<(), StoreError> {
        if self.fail_writes.get() {
            return Err(StoreError::Backend("disk full".into()));
        }
        Ok(())
    }
}

impl DomainStore for FlakyStore {
    fn get_domain(&self, name: &str) -> Result<Option<Domain>, StoreError> {
        self.inner.get_domain(name)
    }

    fn put_domain(&mut self, domain: Domain) -> Result<(), StoreError> {
        self.write()?;
        self.inner.put_domain(domain)
    }

    fn delete_domain(&mut self, name: &str) -> Result<(), StoreError> {
        self.write()?;
        self.inner.delete_domain(name)
    }

    fn domain_names_by_admin(&self, admin: &Address) -> Result<Vec<String>, StoreError> {
        self.scan()?;
        self.inner.domain_names_by_admin(admin)
    }
}

impl AccountStore for FlakyStore {
    fn get_account(&self, key: &AccountKey) -> Result<Option<Account>, StoreError> {
        self.inner.get_account(key)
    }

    fn put_account(&mut self, account: Account) -> Result<(), StoreError> {
        self.write()?;
        self.inner.put_account(account)
    }

    fn delete_account(&mut self, key: &AccountKey) -> Result<(), StoreError> {
        self.write()?;
        self.inner.delete_account(key)
    }

    fn account_keys_by_domain(&self, domain: &str) -> Result<Vec<AccountKey>, StoreError> {
        self.scan()?;
        self.inner.account_keys_by_domain(domain)
    }

    fn account_keys_by_owner(&self, owner: &Address) -> Result<Vec<AccountKey>, StoreError> {
        self.scan()?;
        self.inner.account_keys_by_owner(owner)
    }
}

type Service = RegistryService<FlakyStore, BalanceLedger, StaticConfigProvider>;

fn service_with_domain() -> Service {
    starname_telemetry::init_test_tracing();
    let mut service = RegistryService::new(RegistryDependencies {
        store: FlakyStore::default(),
        fee_sink: BalanceLedger::new().with_balance(ALICE, Coin::new("tiov", FUNDS)),
        config: StaticConfigProvider::new(RegistryConfig::default(), FeeSchedule::default())
            .unwrap(),
    });
    service
        .deliver(
            MsgRegisterDomain {
                name: "iov-one".into(),
                admin: ALICE,
                broker: None,
                domain_type: DomainType::Closed,
                payer: None,
            }
            .into(),
            NOW,
        )
        .unwrap();
    service
}

fn ledger_snapshot(service: &Service) -> (u128, u128, u128) {
    let ledger = service.fee_sink();
    (
        ledger.balance(&ALICE, "tiov"),
        ledger.collected("tiov"),
        ledger.held("tiov"),
    )
}

#[test]
fn test_store_failure_in_executor_refunds_fee() {
    let mut service = service_with_domain();
    let before = ledger_snapshot(&service);
    assert_eq!(before.2, 0);

    service.store().fail_scans.set(true);
    let err = service
        .deliver(
            MsgDeleteDomain {
                domain: "iov-one".into(),
                owner: ALICE,
                payer: None,
            }
            .into(),
            NOW,
        )
        .unwrap_err();
    service.store().fail_scans.set(false);

    assert_eq!(
        err,
        RegistryError::Store(StoreError::Backend("index unavailable".into()))
    );
    assert!(service.queries().domain("iov-one").is_ok());
    assert_eq!(ledger_snapshot(&service), before);
}

#[test]
fn test_failed_commit_refunds_fee() {
    let mut service = service_with_domain();
    let before = ledger_snapshot(&service);

    service.store().fail_writes.set(true);
    let err = service
        .deliver(
            MsgRegisterAccount {
                domain: "iov-one".into(),
                name: "alice".into(),
                owner: ALICE,
                registerer: ALICE,
                broker: None,
                resources: vec![],
                payer: None,
            }
            .into(),
            NOW,
        )
        .unwrap_err();
    service.store().fail_writes.set(false);

    assert_eq!(err.kind(), ErrorKind::Internal);
    assert!(service.queries().starname("alice*iov-one").is_err());
    assert_eq!(ledger_snapshot(&service), before);
}

#[test]
fn test_successful_message_commits_fee() {
    let mut service = service_with_domain();
    let (balance, collected, _) = ledger_snapshot(&service);

    let outcome = service
        .deliver(
            MsgRegisterAccount {
                domain: "iov-one".into(),
                name: "alice".into(),
                owner: ALICE,
                registerer: ALICE,
                broker: None,
                resources: vec![],
                payer: None,
            }
            .into(),
            NOW,
        )
        .unwrap();

    assert!(outcome.fee.amount > 0);
    assert_eq!(
        ledger_snapshot(&service),
        (
            balance - outcome.fee.amount,
            collected + outcome.fee.amount,
            0
        )
    );
}
