use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::model::{FirId, NewFir};

/// Contract client capability. The shell owns the wallet signer and the
/// contract binding; the core only describes the call it wants made.
pub struct Ledger<Ev> {
    context: CapabilityContext<LedgerRequest, Ev>,
}

impl<Ev> Capability<Ev> for Ledger<Ev> {
    type Operation = LedgerRequest;
    type MappedSelf<MappedEv> = Ledger<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Ledger::new(self.context.map_event(f))
    }
}

impl<Ev> Ledger<Ev>
where
    Ev: Send + 'static,
{
    pub fn new(context: CapabilityContext<LedgerRequest, Ev>) -> Self {
        Self { context }
    }

    /// `getMyFIRs()`: every record visible to the connected account.
    pub fn get_my_firs<F>(&self, timeout_ms: u64, callback: F)
    where
        F: FnOnce(LedgerResult) -> Ev + Send + 'static,
    {
        self.send(LedgerCall::GetMyFirs, timeout_ms, callback);
    }

    /// `fileFIR(title, description, location)`, answered after confirmation.
    pub fn file_fir<F>(&self, fir: &NewFir, timeout_ms: u64, callback: F)
    where
        F: FnOnce(LedgerResult) -> Ev + Send + 'static,
    {
        let call = LedgerCall::FileFir {
            title: fir.title.clone(),
            description: fir.description.clone(),
            location: fir.location.as_str().to_string(),
        };
        self.send(call, timeout_ms, callback);
    }

    /// `updateFIR(id, description, status)`, answered after confirmation.
    pub fn update_fir<F>(
        &self,
        id: FirId,
        description: String,
        status: String,
        timeout_ms: u64,
        callback: F,
    ) where
        F: FnOnce(LedgerResult) -> Ev + Send + 'static,
    {
        let call = LedgerCall::UpdateFir {
            id,
            description,
            status,
        };
        self.send(call, timeout_ms, callback);
    }

    /// `resolveFIR(id)`, answered after confirmation.
    pub fn resolve_fir<F>(&self, id: FirId, timeout_ms: u64, callback: F)
    where
        F: FnOnce(LedgerResult) -> Ev + Send + 'static,
    {
        self.send(LedgerCall::ResolveFir { id }, timeout_ms, callback);
    }

    fn send<F>(&self, call: LedgerCall, timeout_ms: u64, callback: F)
    where
        F: FnOnce(LedgerResult) -> Ev + Send + 'static,
    {
        let request = LedgerRequest::new(call, timeout_ms);
        debug!(
            request_id = %request.request_id,
            method = request.call.method_name(),
            transaction = request.call.is_transaction(),
            timeout_ms,
            "ledger request"
        );

        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context.request_from_shell(request).await;
            context.update_app(callback(result));
        });
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerRequest {
    pub request_id: String,
    pub timeout_ms: u64,
    pub call: LedgerCall,
}

impl LedgerRequest {
    #[must_use]
    pub fn new(call: LedgerCall, timeout_ms: u64) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            timeout_ms,
            call,
        }
    }
}

impl Operation for LedgerRequest {
    type Output = LedgerResult;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum LedgerCall {
    GetMyFirs,
    FileFir {
        title: String,
        description: String,
        location: String,
    },
    UpdateFir {
        id: FirId,
        description: String,
        status: String,
    },
    ResolveFir {
        id: FirId,
    },
}

impl LedgerCall {
    /// Contract method name, as the shell's ABI binding knows it.
    #[must_use]
    pub const fn method_name(&self) -> &'static str {
        match self {
            Self::GetMyFirs => "getMyFIRs",
            Self::FileFir { .. } => "fileFIR",
            Self::UpdateFir { .. } => "updateFIR",
            Self::ResolveFir { .. } => "resolveFIR",
        }
    }

    /// Transactions must be awaited to confirmation before the shell answers.
    #[must_use]
    pub const fn is_transaction(&self) -> bool {
        !matches!(self, Self::GetMyFirs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum LedgerOutput {
    /// Raw `getMyFIRs` return value encoded as JSON text; shape is not trusted.
    Records { payload: String },
    /// The transaction was mined and confirmed.
    Confirmed { tx_hash: String },
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum LedgerError {
    /// The signer declined (`ACTION_REJECTED`).
    #[error("user rejected the request")]
    UserRejected,

    /// The call succeeded but decoded to nothing usable (`BAD_DATA`).
    #[error("no data returned")]
    NoData,

    #[error("timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("network error: {message}")]
    Network { message: String },

    #[error("transaction reverted: {reason}")]
    Reverted { reason: String },

    #[error("{code}: {message}")]
    Other { code: String, message: String },
}

impl LedgerError {
    /// Maps an ethers-style error code to a variant. Shell-side helper for
    /// bindings that surface raw provider codes; the core never calls it.
    #[must_use]
    pub fn from_code(code: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            "ACTION_REJECTED" => Self::UserRejected,
            "BAD_DATA" => Self::NoData,
            "TIMEOUT" => Self::Timeout { timeout_ms: 0 },
            "NETWORK_ERROR" | "SERVER_ERROR" => Self::Network { message },
            "CALL_EXCEPTION" => Self::Reverted { reason: message },
            _ => Self::Other {
                code: code.to_string(),
                message,
            },
        }
    }
}

pub type LedgerResult = Result<LedgerOutput, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Station;

    #[test]
    fn method_names_match_contract_abi() {
        assert_eq!(LedgerCall::GetMyFirs.method_name(), "getMyFIRs");
        assert_eq!(LedgerCall::ResolveFir { id: FirId(1) }.method_name(), "resolveFIR");
    }

    #[test]
    fn only_queries_are_not_transactions() {
        assert!(!LedgerCall::GetMyFirs.is_transaction());
        assert!(LedgerCall::ResolveFir { id: FirId(4) }.is_transaction());
        assert!(LedgerCall::FileFir {
            title: "t".into(),
            description: "d".into(),
            location: Station::Abids.as_str().into(),
        }
        .is_transaction());
    }

    #[test]
    fn request_ids_are_unique() {
        let a = LedgerRequest::new(LedgerCall::GetMyFirs, 1000);
        let b = LedgerRequest::new(LedgerCall::GetMyFirs, 1000);
        assert_ne!(a.request_id, b.request_id);
        assert_eq!(a.timeout_ms, 1000);
    }

    #[test]
    fn error_codes_map_to_variants() {
        assert_eq!(LedgerError::from_code("ACTION_REJECTED", ""), LedgerError::UserRejected);
        assert_eq!(LedgerError::from_code("BAD_DATA", "x"), LedgerError::NoData);
        assert!(matches!(
            LedgerError::from_code("CALL_EXCEPTION", "not owner"),
            LedgerError::Reverted { reason } if reason == "not owner"
        ));
        assert!(matches!(
            LedgerError::from_code("WEIRD", "?"),
            LedgerError::Other { code, .. } if code == "WEIRD"
        ));
    }
}
