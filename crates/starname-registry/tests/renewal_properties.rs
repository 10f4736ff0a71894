//! Renewal invariants checked over generated configurations.

use proptest::prelude::*;
use starname_registry::*;

const ADMIN: Address = [0xa1; 20];

fn service(
    config: RegistryConfig,
) -> RegistryService<InMemoryRegistryStore, BalanceLedger, StaticConfigProvider> {
    RegistryService::new(RegistryDependencies {
        store: InMemoryRegistryStore::new(),
        fee_sink: BalanceLedger::new().with_balance(ADMIN, Coin::new("tiov", u64::MAX as u128)),
        config: StaticConfigProvider::new(config, FeeSchedule::default()).unwrap(),
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_domain_renewal_is_monotonic_and_capped(
        period in 1u64..10_000,
        count_max in 0u32..5,
        attempts in 0usize..8,
        now in 0u64..1_000_000,
    ) {
        let config = RegistryConfig::default().with_domain_renewal(period, count_max);
        let mut service = service(config);
        service
            .deliver(
                MsgRegisterDomain {
                    name: "iov-one".into(),
                    admin: ADMIN,
                    broker: None,
                    domain_type: DomainType::Open,
                    payer: None,
                }
                .into(),
                now,
            )
            .unwrap();

        let ceiling = now + period * (count_max as u64 + 1);
        let mut expected = now + period;
        for _ in 0..attempts {
            let result = service.deliver(
                MsgRenewDomain {
                    domain: "iov-one".into(),
                    signer: ADMIN,
                    payer: None,
                }
                .into(),
                now,
            );
            if expected + period <= ceiling {
                prop_assert!(result.is_ok());
                expected += period;
            } else {
                prop_assert_eq!(result.unwrap_err().kind(), ErrorKind::Unauthorized);
            }
            let domain = service.queries().domain("iov-one").unwrap();
            prop_assert_eq!(domain.valid_until, expected);
            prop_assert!(domain.valid_until <= ceiling);
            prop_assert_eq!(
                service.queries().starname("*iov-one").unwrap().valid_until,
                expected
            );
        }
    }

    #[test]
    fn prop_account_renewal_never_passes_ceiling(
        period in 1u64..10_000,
        count_max in 0u32..5,
        attempts in 0usize..8,
    ) {
        let now = 1_000_000u64;
        let config = RegistryConfig::default().with_account_renewal(period, count_max);
        let mut service = service(config);
        service
            .deliver(
                MsgRegisterDomain {
                    name: "iov-one".into(),
                    admin: ADMIN,
                    broker: None,
                    domain_type: DomainType::Open,
                    payer: None,
                }
                .into(),
                now,
            )
            .unwrap();
        service
            .deliver(
                MsgRegisterAccount {
                    domain: "iov-one".into(),
                    name: "alice".into(),
                    owner: ADMIN,
                    registerer: ADMIN,
                    broker: None,
                    resources: vec![],
                    payer: None,
                }
                .into(),
                now,
            )
            .unwrap();

        let ceiling = now + period * (count_max as u64 + 1);
        let mut previous = now + period;
        for _ in 0..attempts {
            let accepted = service
                .deliver(
                    MsgRenewAccount {
                        domain: "iov-one".into(),
                        name: "alice".into(),
                        signer: ADMIN,
                        payer: None,
                    }
                    .into(),
                    now,
                )
                .is_ok();
            let current = service.queries().starname("alice*iov-one").unwrap().valid_until;
            if accepted {
                prop_assert_eq!(current, previous + period);
            } else {
                prop_assert_eq!(current, previous);
            }
            prop_assert!(current <= ceiling);
            previous = current;
        }
    }
}
