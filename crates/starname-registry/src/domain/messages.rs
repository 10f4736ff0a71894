//! Registry messages.
//!
//! One struct per operation, wrapped by [`RegistryMsg`] for dispatch. Every
//! message may name a `payer` different from its signer; the fee is charged
//! to the payer when present.

use super::entities::{Address, Certificate, DomainType, Resource, TransferFlag};
use super::errors::RegistryError;
use serde::{Deserialize, Serialize};
use std::fmt;

const ZERO_ADDRESS: Address = [0u8; 20];

fn require_domain(domain: &str) -> Result<(), RegistryError> {
    if domain.is_empty() {
        return Err(RegistryError::InvalidMessage("domain name is empty".into()));
    }
    Ok(())
}

fn require_address(address: &Address, what: &str) -> Result<(), RegistryError> {
    if *address == ZERO_ADDRESS {
        return Err(RegistryError::InvalidMessage(format!("{what} is empty")));
    }
    Ok(())
}

fn require_account_name(name: &str) -> Result<(), RegistryError> {
    if name.is_empty() {
        return Err(RegistryError::InvalidMessage(
            "operation not allowed on the empty account".into(),
        ));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgRegisterDomain {
    pub name: String,
    pub admin: Address,
    pub broker: Option<Address>,
    pub domain_type: DomainType,
    pub payer: Option<Address>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgRenewDomain {
    pub domain: String,
    pub signer: Address,
    pub payer: Option<Address>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgDeleteDomain {
    pub domain: String,
    pub owner: Address,
    pub payer: Option<Address>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgTransferDomain {
    pub domain: String,
    pub owner: Address,
    pub new_admin: Address,
    pub transfer_flag: TransferFlag,
    pub payer: Option<Address>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgRegisterAccount {
    pub domain: String,
    pub name: String,
    pub owner: Address,
    pub registerer: Address,
    pub broker: Option<Address>,
    pub resources: Vec<Resource>,
    pub payer: Option<Address>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgRenewAccount {
    pub domain: String,
    pub name: String,
    pub signer: Address,
    pub payer: Option<Address>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgDeleteAccount {
    pub domain: String,
    pub name: String,
    pub owner: Address,
    pub payer: Option<Address>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgTransferAccount {
    pub domain: String,
    pub name: String,
    pub owner: Address,
    pub new_owner: Address,
    /// Clear resources, certificates and metadata on transfer
    pub reset: bool,
    pub payer: Option<Address>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgReplaceAccountResources {
    pub domain: String,
    pub name: String,
    pub owner: Address,
    pub new_resources: Vec<Resource>,
    pub payer: Option<Address>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgAddAccountCertificate {
    pub domain: String,
    pub name: String,
    pub owner: Address,
    pub new_certificate: Certificate,
    pub payer: Option<Address>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgDeleteAccountCertificate {
    pub domain: String,
    pub name: String,
    pub owner: Address,
    pub delete_certificate: Certificate,
    pub payer: Option<Address>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgReplaceAccountMetadata {
    pub domain: String,
    pub name: String,
    pub owner: Address,
    pub new_metadata_uri: String,
    pub payer: Option<Address>,
}

/// Operation tag, used for fee selection and logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MsgKind {
    RegisterDomain,
    RenewDomain,
    DeleteDomain,
    TransferDomain,
    RegisterAccount,
    RenewAccount,
    DeleteAccount,
    TransferAccount,
    ReplaceAccountResources,
    AddAccountCertificate,
    DeleteAccountCertificate,
    ReplaceAccountMetadata,
}

impl fmt::Display for MsgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MsgKind::RegisterDomain => "register_domain",
            MsgKind::RenewDomain => "renew_domain",
            MsgKind::DeleteDomain => "delete_domain",
            MsgKind::TransferDomain => "transfer_domain",
            MsgKind::RegisterAccount => "register_account",
            MsgKind::RenewAccount => "renew_account",
            MsgKind::DeleteAccount => "delete_account",
            MsgKind::TransferAccount => "transfer_account",
            MsgKind::ReplaceAccountResources => "replace_account_resources",
            MsgKind::AddAccountCertificate => "add_account_certificate",
            MsgKind::DeleteAccountCertificate => "delete_account_certificate",
            MsgKind::ReplaceAccountMetadata => "replace_account_metadata",
        };
        f.write_str(name)
    }
}

/// Any registry message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum RegistryMsg {
    RegisterDomain(MsgRegisterDomain),
    RenewDomain(MsgRenewDomain),
    DeleteDomain(MsgDeleteDomain),
    TransferDomain(MsgTransferDomain),
    RegisterAccount(MsgRegisterAccount),
    RenewAccount(MsgRenewAccount),
    DeleteAccount(MsgDeleteAccount),
    TransferAccount(MsgTransferAccount),
    ReplaceAccountResources(MsgReplaceAccountResources),
    AddAccountCertificate(MsgAddAccountCertificate),
    DeleteAccountCertificate(MsgDeleteAccountCertificate),
    ReplaceAccountMetadata(MsgReplaceAccountMetadata),
}

impl RegistryMsg {
    pub fn kind(&self) -> MsgKind {
        match self {
            RegistryMsg::RegisterDomain(_) => MsgKind::RegisterDomain,
            RegistryMsg::RenewDomain(_) => MsgKind::RenewDomain,
            RegistryMsg::DeleteDomain(_) => MsgKind::DeleteDomain,
            RegistryMsg::TransferDomain(_) => MsgKind::TransferDomain,
            RegistryMsg::RegisterAccount(_) => MsgKind::RegisterAccount,
            RegistryMsg::RenewAccount(_) => MsgKind::RenewAccount,
            RegistryMsg::DeleteAccount(_) => MsgKind::DeleteAccount,
            RegistryMsg::TransferAccount(_) => MsgKind::TransferAccount,
            RegistryMsg::ReplaceAccountResources(_) => MsgKind::ReplaceAccountResources,
            RegistryMsg::AddAccountCertificate(_) => MsgKind::AddAccountCertificate,
            RegistryMsg::DeleteAccountCertificate(_) => MsgKind::DeleteAccountCertificate,
            RegistryMsg::ReplaceAccountMetadata(_) => MsgKind::ReplaceAccountMetadata,
        }
    }

    /// Domain the message operates on.
    pub fn domain(&self) -> &str {
        match self {
            RegistryMsg::RegisterDomain(m) => &m.name,
            RegistryMsg::RenewDomain(m) => &m.domain,
            RegistryMsg::DeleteDomain(m) => &m.domain,
            RegistryMsg::TransferDomain(m) => &m.domain,
            RegistryMsg::RegisterAccount(m) => &m.domain,
            RegistryMsg::RenewAccount(m) => &m.domain,
            RegistryMsg::DeleteAccount(m) => &m.domain,
            RegistryMsg::TransferAccount(m) => &m.domain,
            RegistryMsg::ReplaceAccountResources(m) => &m.domain,
            RegistryMsg::AddAccountCertificate(m) => &m.domain,
            RegistryMsg::DeleteAccountCertificate(m) => &m.domain,
            RegistryMsg::ReplaceAccountMetadata(m) => &m.domain,
        }
    }

    /// Account the message operates on; `None` for domain messages.
    pub fn account_name(&self) -> Option<&str> {
        match self {
            RegistryMsg::RegisterDomain(_)
            | RegistryMsg::RenewDomain(_)
            | RegistryMsg::DeleteDomain(_)
            | RegistryMsg::TransferDomain(_) => None,
            RegistryMsg::RegisterAccount(m) => Some(&m.name),
            RegistryMsg::RenewAccount(m) => Some(&m.name),
            RegistryMsg::DeleteAccount(m) => Some(&m.name),
            RegistryMsg::TransferAccount(m) => Some(&m.name),
            RegistryMsg::ReplaceAccountResources(m) => Some(&m.name),
            RegistryMsg::AddAccountCertificate(m) => Some(&m.name),
            RegistryMsg::DeleteAccountCertificate(m) => Some(&m.name),
            RegistryMsg::ReplaceAccountMetadata(m) => Some(&m.name),
        }
    }

    /// Address that authorised the message.
    pub fn signer(&self) -> Address {
        match self {
            RegistryMsg::RegisterDomain(m) => m.admin,
            RegistryMsg::RenewDomain(m) => m.signer,
            RegistryMsg::DeleteDomain(m) => m.owner,
            RegistryMsg::TransferDomain(m) => m.owner,
            RegistryMsg::RegisterAccount(m) => m.registerer,
            RegistryMsg::RenewAccount(m) => m.signer,
            RegistryMsg::DeleteAccount(m) => m.owner,
            RegistryMsg::TransferAccount(m) => m.owner,
            RegistryMsg::ReplaceAccountResources(m) => m.owner,
            RegistryMsg::AddAccountCertificate(m) => m.owner,
            RegistryMsg::DeleteAccountCertificate(m) => m.owner,
            RegistryMsg::ReplaceAccountMetadata(m) => m.owner,
        }
    }

    fn payer(&self) -> Option<Address> {
        match self {
            RegistryMsg::RegisterDomain(m) => m.payer,
            RegistryMsg::RenewDomain(m) => m.payer,
            RegistryMsg::DeleteDomain(m) => m.payer,
            RegistryMsg::TransferDomain(m) => m.payer,
            RegistryMsg::RegisterAccount(m) => m.payer,
            RegistryMsg::RenewAccount(m) => m.payer,
            RegistryMsg::DeleteAccount(m) => m.payer,
            RegistryMsg::TransferAccount(m) => m.payer,
            RegistryMsg::ReplaceAccountResources(m) => m.payer,
            RegistryMsg::AddAccountCertificate(m) => m.payer,
            RegistryMsg::DeleteAccountCertificate(m) => m.payer,
            RegistryMsg::ReplaceAccountMetadata(m) => m.payer,
        }
    }

    /// Address charged for the message: the payer if set, else the signer.
    pub fn fee_payer(&self) -> Address {
        self.payer().unwrap_or_else(|| self.signer())
    }

    /// Stateless checks, run before any state is read.
    pub fn validate_basic(&self) -> Result<(), RegistryError> {
        match self {
            RegistryMsg::RegisterDomain(m) => {
                require_domain(&m.name)?;
                require_address(&m.admin, "admin")
            }
            RegistryMsg::RenewDomain(m) => require_domain(&m.domain),
            RegistryMsg::DeleteDomain(m) => {
                require_domain(&m.domain)?;
                require_address(&m.owner, "owner")
            }
            RegistryMsg::TransferDomain(m) => {
                require_domain(&m.domain)?;
                require_address(&m.owner, "owner")?;
                require_address(&m.new_admin, "new admin")
            }
            RegistryMsg::RegisterAccount(m) => {
                require_domain(&m.domain)?;
                require_address(&m.owner, "owner")?;
                require_address(&m.registerer, "registerer")
            }
            RegistryMsg::RenewAccount(m) => require_domain(&m.domain),
            RegistryMsg::DeleteAccount(m) => {
                require_domain(&m.domain)?;
                require_account_name(&m.name)?;
                require_address(&m.owner, "owner")
            }
            RegistryMsg::TransferAccount(m) => {
                require_domain(&m.domain)?;
                require_account_name(&m.name)?;
                require_address(&m.owner, "owner")?;
                require_address(&m.new_owner, "new owner")
            }
            RegistryMsg::ReplaceAccountResources(m) => {
                require_domain(&m.domain)?;
                require_address(&m.owner, "owner")
            }
            RegistryMsg::AddAccountCertificate(m) => {
                require_domain(&m.domain)?;
                require_address(&m.owner, "owner")?;
                if m.new_certificate.is_empty() {
                    return Err(RegistryError::InvalidMessage("certificate is empty".into()));
                }
                Ok(())
            }
            RegistryMsg::DeleteAccountCertificate(m) => {
                require_domain(&m.domain)?;
                require_address(&m.owner, "owner")?;
                if m.delete_certificate.is_empty() {
                    return Err(RegistryError::InvalidMessage("certificate is empty".into()));
                }
                Ok(())
            }
            RegistryMsg::ReplaceAccountMetadata(m) => {
                require_domain(&m.domain)?;
                require_address(&m.owner, "owner")
            }
        }
    }
}

macro_rules! impl_from_msg {
    ($($variant:ident => $msg:ty),* $(,)?) => {
        $(
            impl From<$msg> for RegistryMsg {
                fn from(msg: $msg) -> Self {
                    RegistryMsg::$variant(msg)
                }
            }
        )*
    };
}

impl_from_msg! {
    RegisterDomain => MsgRegisterDomain,
    RenewDomain => MsgRenewDomain,
    DeleteDomain => MsgDeleteDomain,
    TransferDomain => MsgTransferDomain,
    RegisterAccount => MsgRegisterAccount,
    RenewAccount => MsgRenewAccount,
    DeleteAccount => MsgDeleteAccount,
    TransferAccount => MsgTransferAccount,
    ReplaceAccountResources => MsgReplaceAccountResources,
    AddAccountCertificate => MsgAddAccountCertificate,
    DeleteAccountCertificate => MsgDeleteAccountCertificate,
    ReplaceAccountMetadata => MsgReplaceAccountMetadata,
}
