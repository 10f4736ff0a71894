//! Events emitted by successfully processed registry messages.
//!
//! Attribute keys are stable: indexers match on them.

use crate::domain::{Address, Certificate, Coin, DomainType, MsgKind, Resource, TransferFlag};
use serde::{Deserialize, Serialize};

/// Module name stamped on every event.
pub const MODULE_NAME: &str = "starname";

pub const ATTR_MODULE: &str = "module";
pub const ATTR_DOMAIN_NAME: &str = "domain_name";
pub const ATTR_ACCOUNT_NAME: &str = "account_name";
pub const ATTR_OWNER: &str = "owner";
pub const ATTR_BROKER: &str = "broker";
pub const ATTR_REGISTERER: &str = "registerer";
pub const ATTR_RESOURCES: &str = "resources";
pub const ATTR_DOMAIN_TYPE: &str = "domain_type";
pub const ATTR_NEW_CERTIFICATE: &str = "new_certificate";
pub const ATTR_DELETED_CERTIFICATE: &str = "deleted_certificate";
pub const ATTR_NEW_METADATA: &str = "new_metadata";
pub const ATTR_NEW_RESOURCES: &str = "new_resources";
pub const ATTR_NEW_ACCOUNT_OWNER: &str = "new_account_owner";
pub const ATTR_TRANSFER_ACCOUNT_RESET: &str = "transfer_account_reset";
pub const ATTR_TRANSFER_DOMAIN_FLAG: &str = "transfer_domain_flag";
pub const ATTR_NEW_DOMAIN_OWNER: &str = "new_domain_owner";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegistryEvent {
    DomainRegistered {
        domain: String,
        domain_type: DomainType,
        owner: Address,
        broker: Option<Address>,
    },
    DomainRenewed {
        domain: String,
        owner: Address,
    },
    DomainDeleted {
        domain: String,
        owner: Address,
    },
    DomainTransferred {
        domain: String,
        owner: Address,
        new_owner: Address,
        flag: TransferFlag,
    },
    AccountRegistered {
        domain: String,
        name: String,
        owner: Address,
        registerer: Address,
        broker: Option<Address>,
        resources: Vec<Resource>,
    },
    AccountRenewed {
        domain: String,
        name: String,
        owner: Address,
    },
    AccountDeleted {
        domain: String,
        name: String,
        owner: Address,
    },
    AccountTransferred {
        domain: String,
        name: String,
        owner: Address,
        new_owner: Address,
        reset: bool,
    },
    AccountResourcesReplaced {
        domain: String,
        name: String,
        owner: Address,
        resources: Vec<Resource>,
    },
    AccountCertificateAdded {
        domain: String,
        name: String,
        owner: Address,
        certificate: Certificate,
    },
    AccountCertificateDeleted {
        domain: String,
        name: String,
        owner: Address,
        certificate: Certificate,
    },
    AccountMetadataReplaced {
        domain: String,
        name: String,
        owner: Address,
        metadata_uri: String,
    },
}

fn address(addr: &Address) -> String {
    hex::encode(addr)
}

fn broker(addr: &Option<Address>) -> String {
    addr.as_ref().map(address).unwrap_or_default()
}

fn resources(list: &[Resource]) -> String {
    serde_json::to_string(list).unwrap_or_default()
}

impl RegistryEvent {
    /// Kind of the message that produced this event.
    pub fn kind(&self) -> MsgKind {
        match self {
            RegistryEvent::DomainRegistered { .. } => MsgKind::RegisterDomain,
            RegistryEvent::DomainRenewed { .. } => MsgKind::RenewDomain,
            RegistryEvent::DomainDeleted { .. } => MsgKind::DeleteDomain,
            RegistryEvent::DomainTransferred { .. } => MsgKind::TransferDomain,
            RegistryEvent::AccountRegistered { .. } => MsgKind::RegisterAccount,
            RegistryEvent::AccountRenewed { .. } => MsgKind::RenewAccount,
            RegistryEvent::AccountDeleted { .. } => MsgKind::DeleteAccount,
            RegistryEvent::AccountTransferred { .. } => MsgKind::TransferAccount,
            RegistryEvent::AccountResourcesReplaced { .. } => MsgKind::ReplaceAccountResources,
            RegistryEvent::AccountCertificateAdded { .. } => MsgKind::AddAccountCertificate,
            RegistryEvent::AccountCertificateDeleted { .. } => MsgKind::DeleteAccountCertificate,
            RegistryEvent::AccountMetadataReplaced { .. } => MsgKind::ReplaceAccountMetadata,
        }
    }

    /// Render as ordered `(key, value)` pairs. Addresses are lowercase hex,
    /// resources JSON, certificates hex, and a missing broker is empty.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut attrs = vec![(ATTR_MODULE, MODULE_NAME.to_string())];
        match self {
            RegistryEvent::DomainRegistered {
                domain,
                domain_type,
                owner,
                broker: b,
            } => attrs.extend([
                (ATTR_DOMAIN_NAME, domain.clone()),
                (ATTR_DOMAIN_TYPE, domain_type.to_string()),
                (ATTR_OWNER, address(owner)),
                (ATTR_BROKER, broker(b)),
            ]),
            RegistryEvent::DomainRenewed { domain, owner }
            | RegistryEvent::DomainDeleted { domain, owner } => attrs.extend([
                (ATTR_DOMAIN_NAME, domain.clone()),
                (ATTR_OWNER, address(owner)),
            ]),
            RegistryEvent::DomainTransferred {
                domain,
                owner,
                new_owner,
                flag,
            } => attrs.extend([
                (ATTR_DOMAIN_NAME, domain.clone()),
                (ATTR_NEW_DOMAIN_OWNER, address(new_owner)),
                (ATTR_TRANSFER_DOMAIN_FLAG, flag.to_string()),
                (ATTR_OWNER, address(owner)),
            ]),
            RegistryEvent::AccountRegistered {
                domain,
                name,
                owner,
                registerer,
                broker: b,
                resources: r,
            } => attrs.extend([
                (ATTR_DOMAIN_NAME, domain.clone()),
                (ATTR_ACCOUNT_NAME, name.clone()),
                (ATTR_OWNER, address(owner)),
                (ATTR_REGISTERER, address(registerer)),
                (ATTR_RESOURCES, resources(r)),
                (ATTR_BROKER, broker(b)),
            ]),
            RegistryEvent::AccountRenewed {
                domain,
                name,
                owner,
            }
            | RegistryEvent::AccountDeleted {
                domain,
                name,
                owner,
            } => attrs.extend([
                (ATTR_DOMAIN_NAME, domain.clone()),
                (ATTR_ACCOUNT_NAME, name.clone()),
                (ATTR_OWNER, address(owner)),
            ]),
            RegistryEvent::AccountTransferred {
                domain,
                name,
                owner,
                new_owner,
                reset,
            } => attrs.extend([
                (ATTR_DOMAIN_NAME, domain.clone()),
                (ATTR_ACCOUNT_NAME, name.clone()),
                (ATTR_NEW_ACCOUNT_OWNER, address(new_owner)),
                (ATTR_TRANSFER_ACCOUNT_RESET, reset.to_string()),
                (ATTR_OWNER, address(owner)),
            ]),
            RegistryEvent::AccountResourcesReplaced {
                domain,
                name,
                owner,
                resources: r,
            } => attrs.extend([
                (ATTR_DOMAIN_NAME, domain.clone()),
                (ATTR_ACCOUNT_NAME, name.clone()),
                (ATTR_NEW_RESOURCES, resources(r)),
                (ATTR_OWNER, address(owner)),
            ]),
            RegistryEvent::AccountCertificateAdded {
                domain,
                name,
                owner,
                certificate,
            } => attrs.extend([
                (ATTR_DOMAIN_NAME, domain.clone()),
                (ATTR_ACCOUNT_NAME, name.clone()),
                (ATTR_NEW_CERTIFICATE, hex::encode(certificate)),
                (ATTR_OWNER, address(owner)),
            ]),
            RegistryEvent::AccountCertificateDeleted {
                domain,
                name,
                owner,
                certificate,
            } => attrs.extend([
                (ATTR_DOMAIN_NAME, domain.clone()),
                (ATTR_ACCOUNT_NAME, name.clone()),
                (ATTR_DELETED_CERTIFICATE, hex::encode(certificate)),
                (ATTR_OWNER, address(owner)),
            ]),
            RegistryEvent::AccountMetadataReplaced {
                domain,
                name,
                owner,
                metadata_uri,
            } => attrs.extend([
                (ATTR_DOMAIN_NAME, domain.clone()),
                (ATTR_ACCOUNT_NAME, name.clone()),
                (ATTR_NEW_METADATA, metadata_uri.clone()),
                (ATTR_OWNER, address(owner)),
            ]),
        }
        attrs
    }
}

/// Result of a successfully processed message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgOutcome {
    /// Fee collected from the payer.
    pub fee: Coin,
    pub event: RegistryEvent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_transfer_attributes() {
        let event = RegistryEvent::DomainTransferred {
            domain: "iov".into(),
            owner: [0xaa; 20],
            new_owner: [0xbb; 20],
            flag: TransferFlag::Owned,
        };
        let attrs = event.attributes();
        assert_eq!(attrs[0], ("module", "starname".to_string()));
        assert_eq!(attrs[1], ("domain_name", "iov".to_string()));
        assert_eq!(attrs[2], ("new_domain_owner", "bb".repeat(20)));
        assert_eq!(attrs[3], ("transfer_domain_flag", "1".to_string()));
        assert_eq!(event.kind(), MsgKind::TransferDomain);
    }

    #[test]
    fn test_account_registration_attributes() {
        let event = RegistryEvent::AccountRegistered {
            domain: "iov".into(),
            name: "alice".into(),
            owner: [1; 20],
            registerer: [2; 20],
            broker: None,
            resources: vec![Resource::new("blockchain:eth", "0x1")],
        };
        let attrs = event.attributes();
        let get = |key: &str| {
            attrs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.clone())
                .unwrap()
        };
        assert_eq!(get(ATTR_BROKER), "");
        assert_eq!(
            get(ATTR_RESOURCES),
            r#"[{"uri":"blockchain:eth","resource":"0x1"}]"#
        );
        assert_eq!(get(ATTR_REGISTERER), "02".repeat(20));
    }

    #[test]
    fn test_certificate_is_hex() {
        let event = RegistryEvent::AccountCertificateDeleted {
            domain: "iov".into(),
            name: "alice".into(),
            owner: [1; 20],
            certificate: vec![0xde, 0xad],
        };
        assert!(event
            .attributes()
            .contains(&(ATTR_DELETED_CERTIFICATE, "dead".to_string())));
    }
}
