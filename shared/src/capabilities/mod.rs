//! Capabilities the core asks the shell to perform.
//!
//! `Render` is crux_core's own; `Ledger` and `Wallet` are answered by the
//! shell's contract binding and injected wallet provider.

mod ledger;
mod wallet;

pub use self::ledger::{Ledger, LedgerCall, LedgerError, LedgerOutput, LedgerRequest, LedgerResult};
pub use self::wallet::{Wallet, WalletError, WalletOperation, WalletOutput, WalletResult};
pub use crux_core::render::Render;

use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
#[effect(app = "App")]
pub struct Capabilities {
    pub render: Render<Event>,
    pub ledger: Ledger<Event>,
    pub wallet: Wallet<Event>,
}
