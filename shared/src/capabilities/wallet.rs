use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wallet connection provider. Opaque to the core: the shell decides which
/// injected provider to talk to and how accounts are requested.
pub struct Wallet<Ev> {
    context: CapabilityContext<WalletOperation, Ev>,
}

impl<Ev> Capability<Ev> for Wallet<Ev> {
    type Operation = WalletOperation;
    type MappedSelf<MappedEv> = Wallet<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Wallet::new(self.context.map_event(f))
    }
}

impl<Ev> Wallet<Ev>
where
    Ev: Send + 'static,
{
    pub fn new(context: CapabilityContext<WalletOperation, Ev>) -> Self {
        Self { context }
    }

    /// Prompts the user to connect an account.
    pub fn connect<F>(&self, callback: F)
    where
        F: FnOnce(WalletResult) -> Ev + Send + 'static,
    {
        self.request(WalletOperation::Connect, callback);
    }

    /// Checks for an already-authorized account without prompting.
    pub fn current_account<F>(&self, callback: F)
    where
        F: FnOnce(WalletResult) -> Ev + Send + 'static,
    {
        self.request(WalletOperation::CurrentAccount, callback);
    }

    fn request<F>(&self, operation: WalletOperation, callback: F)
    where
        F: FnOnce(WalletResult) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context.request_from_shell(operation).await;
            context.update_app(callback(result));
        });
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum WalletOperation {
    Connect,
    CurrentAccount,
}

impl Operation for WalletOperation {
    type Output = WalletResult;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum WalletOutput {
    Connected { account: String },
    NotConnected,
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum WalletError {
    #[error("user rejected the connection request")]
    UserRejected,

    #[error("no wallet provider available")]
    ProviderUnavailable,

    #[error("wallet error: {message}")]
    Other { message: String },
}

pub type WalletResult = Result<WalletOutput, WalletError>;
