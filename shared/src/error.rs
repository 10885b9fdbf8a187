use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::capabilities::{LedgerError, WalletError};
use crate::model::ValidationError;

/// The three causes a user can tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureCause {
    UserRejected,
    NoData,
    Generic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    UserRejected,
    NoData,
    Timeout,
    Network,
    Reverted,
    Deserialization,
    Validation,
    WalletUnavailable,
    Busy,
    Unknown,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::UserRejected => "ACTION_REJECTED",
            Self::NoData => "BAD_DATA",
            Self::Timeout => "TIMEOUT",
            Self::Network => "NETWORK_ERROR",
            Self::Reverted => "CALL_EXCEPTION",
            Self::Deserialization => "DESERIALIZATION_ERROR",
            Self::Validation => "VALIDATION_ERROR",
            Self::WalletUnavailable => "WALLET_UNAVAILABLE",
            Self::Busy => "BUSY",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    #[must_use]
    pub const fn cause(self) -> FailureCause {
        match self {
            Self::UserRejected => FailureCause::UserRejected,
            Self::NoData => FailureCause::NoData,
            Self::Timeout
            | Self::Network
            | Self::Reverted
            | Self::Deserialization
            | Self::Validation
            | Self::WalletUnavailable
            | Self::Busy
            | Self::Unknown => FailureCause::Generic,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    pub internal_message: Option<String>,
    pub context: HashMap<String, String>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            internal_message: None,
            context: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_internal(mut self, internal: impl Into<String>) -> Self {
        self.internal_message = Some(internal.into());
        self
    }

    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub const fn cause(&self) -> FailureCause {
        self.kind.cause()
    }

    /// Text shown to the user when `action` fails with this error.
    #[must_use]
    pub fn user_facing_message(&self, action: Action) -> String {
        match self.kind {
            ErrorKind::Validation | ErrorKind::Busy => self.message.clone(),
            _ => action.failure_message(self.cause()).to_string(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)?;
        if let Some(internal) = &self.internal_message {
            write!(f, " (internal: {internal})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

impl From<LedgerError> for AppError {
    fn from(e: LedgerError) -> Self {
        let kind = match &e {
            LedgerError::UserRejected => ErrorKind::UserRejected,
            LedgerError::NoData => ErrorKind::NoData,
            LedgerError::Timeout { .. } => ErrorKind::Timeout,
            LedgerError::Network { .. } => ErrorKind::Network,
            LedgerError::Reverted { .. } => ErrorKind::Reverted,
            LedgerError::Other { .. } => ErrorKind::Unknown,
        };
        Self::new(kind, "Ledger request failed").with_internal(e.to_string())
    }
}

impl From<WalletError> for AppError {
    fn from(e: WalletError) -> Self {
        let kind = match &e {
            WalletError::UserRejected => ErrorKind::UserRejected,
            WalletError::ProviderUnavailable => ErrorKind::WalletUnavailable,
            WalletError::Other { .. } => ErrorKind::Unknown,
        };
        Self::new(kind, "Wallet request failed").with_internal(e.to_string())
    }
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        Self::new(ErrorKind::Validation, e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(ErrorKind::Deserialization, "Malformed ledger payload")
            .with_internal(e.to_string())
    }
}

/// User-visible operations, each with its own wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    ConnectWallet,
    LoadFirs,
    FileFir,
    UpdateFir,
    ResolveFir,
}

impl Action {
    #[must_use]
    pub const fn failure_message(self, cause: FailureCause) -> &'static str {
        match (self, cause) {
            (Self::ConnectWallet, FailureCause::UserRejected) => {
                "Connection request was rejected. Please try again."
            }
            (Self::ConnectWallet, _) => "Failed to connect wallet",
            (Self::LoadFirs, FailureCause::UserRejected) => {
                "Request was rejected. Please try again."
            }
            (Self::LoadFirs, FailureCause::NoData) => "No FIRs found for your account",
            (Self::LoadFirs, FailureCause::Generic) => "Failed to load FIRs",
            // Filing never distinguishes causes.
            (Self::FileFir, _) => "Failed to file FIR",
            (Self::UpdateFir | Self::ResolveFir, FailureCause::UserRejected) => {
                "Transaction was rejected. Please try again."
            }
            (Self::UpdateFir, _) => "Failed to update FIR",
            (Self::ResolveFir, _) => "Failed to resolve FIR",
        }
    }

    #[must_use]
    pub const fn success_message(self) -> Option<&'static str> {
        match self {
            Self::FileFir => Some("FIR filed successfully with Hyderabad Police"),
            Self::UpdateFir => Some("FIR updated successfully"),
            Self::ResolveFir => Some("FIR resolved successfully"),
            Self::ConnectWallet | Self::LoadFirs => None,
        }
    }
}
