//! Registry error types.
//!
//! `RegistryError` is the single business error returned by validation
//! chains, the fee controller, executors and the dispatch layer. Every
//! variant maps onto a coarse [`ErrorKind`] so callers can react without
//! matching on individual variants.

use super::entities::{DomainType, Timestamp};
use thiserror::Error;

/// Coarse classification of registry errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    Expired,
    Unauthorized,
    InvalidInput,
    LimitExceeded,
    DeadlineExceeded,
    GracePeriodNotFinished,
    Internal,
}

/// Errors raised by a store adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Errors raised by a fee sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeeError {
    #[error("Insufficient funds: required {required}{denom}, available {available}{denom}")]
    InsufficientFunds {
        denom: String,
        required: u128,
        available: u128,
    },

    #[error("Fee collector overflow for denom {0}")]
    Overflow(String),
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Malformed configuration document: {0}")]
    Malformed(String),
}

/// Business errors of the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    // Domain
    #[error("Domain '{0}' does not exist")]
    DomainDoesNotExist(String),

    #[error("Domain '{0}' already exists")]
    DomainAlreadyExists(String),

    #[error("Invalid domain name '{0}'")]
    InvalidDomainName(String),

    #[error("Domain '{0}' has expired")]
    DomainExpired(String),

    #[error("Domain '{name}' is {actual}, expected {expected}")]
    InvalidDomainType {
        name: String,
        expected: DomainType,
        actual: DomainType,
    },

    #[error("Grace period of domain '{0}' has not finished")]
    DomainGracePeriodNotFinished(String),

    #[error("Renewal deadline of '{name}' was {deadline}, current time is {now}")]
    RenewalDeadlineExceeded {
        name: String,
        deadline: Timestamp,
        now: Timestamp,
    },

    // Account
    #[error("Account '{0}' does not exist")]
    AccountDoesNotExist(String),

    #[error("Account '{0}' already exists")]
    AccountAlreadyExists(String),

    #[error("Invalid account name '{0}'")]
    InvalidAccountName(String),

    #[error("Account '{0}' has expired")]
    AccountExpired(String),

    #[error("Grace period of account '{0}' has not finished")]
    AccountGracePeriodNotFinished(String),

    #[error("Invalid resource: {0}")]
    InvalidResource(String),

    #[error("Resource limit exceeded: {count} > {max}")]
    ResourceLimitExceeded { count: usize, max: u32 },

    #[error("Certificate already present")]
    CertificateExists,

    #[error("Certificate {0} does not exist")]
    CertificateDoesNotExist(String),

    #[error("Certificate size exceeded: {size} > {max}")]
    CertificateSizeExceeded { size: usize, max: u64 },

    #[error("Certificate limit of {max} reached")]
    CertificateLimitReached { max: u32 },

    #[error("Metadata size exceeded: {size} > {max}")]
    MetadataSizeExceeded { size: usize, max: u64 },

    // Authorization
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    // Messages
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    #[error("Invalid starname '{0}'")]
    InvalidStarname(String),

    // Fees
    #[error("Fee computation failed: {0}")]
    FeeComputation(String),

    #[error("Unable to collect fees: {0}")]
    FeeCollection(#[from] FeeError),

    // Infrastructure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl RegistryError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        use RegistryError::*;
        match self {
            DomainDoesNotExist(_) | AccountDoesNotExist(_) | CertificateDoesNotExist(_) => {
                ErrorKind::NotFound
            }
            DomainAlreadyExists(_) | AccountAlreadyExists(_) | CertificateExists => {
                ErrorKind::AlreadyExists
            }
            DomainExpired(_) | AccountExpired(_) => ErrorKind::Expired,
            Unauthorized(_) => ErrorKind::Unauthorized,
            InvalidDomainName(_)
            | InvalidDomainType { .. }
            | InvalidAccountName(_)
            | InvalidResource(_)
            | InvalidMessage(_)
            | InvalidStarname(_) => ErrorKind::InvalidInput,
            ResourceLimitExceeded { .. }
            | CertificateSizeExceeded { .. }
            | CertificateLimitReached { .. }
            | MetadataSizeExceeded { .. } => ErrorKind::LimitExceeded,
            RenewalDeadlineExceeded { .. } => ErrorKind::DeadlineExceeded,
            DomainGracePeriodNotFinished(_) | AccountGracePeriodNotFinished(_) => {
                ErrorKind::GracePeriodNotFinished
            }
            FeeComputation(_) | FeeCollection(_) | Store(_) | Config(_) => ErrorKind::Internal,
        }
    }
}
