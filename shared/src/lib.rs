// lib.rs - FIR dashboard core

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod app;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod event;
pub mod model;
pub mod normalize;
pub mod presenter;
pub mod stats;
pub mod view;

use std::time::Duration;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use config::Config;
pub use crux_core::{render::Render, App as CruxApp};
pub use error::{Action, AppError, AppResult, ErrorKind, FailureCause};
pub use event::Event;
pub use model::{
    AccountAddress, DashboardTab, Fir, FirForm, FirId, Model, MutationKind, NewFir,
    Notification, RequestState, Station, ToastKind, UnixTimeSecs, UpdateDraft,
    ValidationError,
};
pub use normalize::{normalize_record, normalize_records};
pub use presenter::ListState;
pub use stats::{aggregate, aggregate_at, Stats};
pub use view::{FirCard, ListView, ViewModel, ViewState};

pub const LEDGER_QUERY_TIMEOUT: Duration = Duration::from_secs(30);
pub const LEDGER_TX_TIMEOUT: Duration = Duration::from_secs(120);
pub const MAX_LEDGER_TIMEOUT: Duration = Duration::from_secs(600);
pub const MAX_NOTIFICATIONS: usize = 5;
pub const MAX_TITLE_LENGTH: usize = 200;
pub const MAX_DESCRIPTION_LENGTH: usize = 4096;
pub const MAX_STATUS_LENGTH: usize = 100;
pub const DEFAULT_STATUS: &str = "Pending";

#[must_use]
pub fn get_current_time_ms() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}
