use serde::{Deserialize, Serialize};

use crate::capabilities::{LedgerResult, WalletResult};
use crate::config::Config;
use crate::model::{DashboardTab, FirId, MutationKind};

// --- Event enum: shell-facing intents first, capability responses last ---

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    // Lifecycle & connection gate
    AppStarted,
    Configure(Config),
    ConnectRequested,
    DisconnectRequested,
    LogoClicked,

    // Dashboard
    TabSelected(DashboardTab),
    RefreshRequested,

    // Create form
    FormTitleChanged(String),
    FormDescriptionChanged(String),
    FormStationSelected(String),
    FormSubmitted,

    // Update dialog
    UpdateDialogOpened { id: FirId },
    UpdateDialogClosed,
    UpdateDescriptionChanged(String),
    UpdateStatusChanged(String),
    UpdateSubmitted,

    ResolveRequested { id: FirId },

    // Notifications
    NotificationDismissed { id: u64 },
    NotificationsExpired { now_ms: u64 },

    // Capability responses (boxed to keep enum size small)
    #[serde(skip)]
    WalletChecked(Box<WalletResult>),
    #[serde(skip)]
    WalletConnected(Box<WalletResult>),
    #[serde(skip)]
    StatsFetched {
        session: u64,
        generation: u64,
        result: Box<LedgerResult>,
    },
    #[serde(skip)]
    ListFetched {
        session: u64,
        generation: u64,
        /// Mutation whose confirmation triggered this refetch.
        after: Option<MutationKind>,
        result: Box<LedgerResult>,
    },
    #[serde(skip)]
    FirFiled {
        session: u64,
        result: Box<LedgerResult>,
    },
    #[serde(skip)]
    FirUpdated {
        session: u64,
        id: FirId,
        result: Box<LedgerResult>,
    },
    #[serde(skip)]
    FirResolved {
        session: u64,
        id: FirId,
        result: Box<LedgerResult>,
    },
}

impl Event {
    /// Short name for log fields; never includes user content.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AppStarted => "app_started",
            Self::Configure(_) => "configure",
            Self::ConnectRequested => "connect_requested",
            Self::DisconnectRequested => "disconnect_requested",
            Self::LogoClicked => "logo_clicked",
            Self::TabSelected(_) => "tab_selected",
            Self::RefreshRequested => "refresh_requested",
            Self::FormTitleChanged(_) => "form_title_changed",
            Self::FormDescriptionChanged(_) => "form_description_changed",
            Self::FormStationSelected(_) => "form_station_selected",
            Self::FormSubmitted => "form_submitted",
            Self::UpdateDialogOpened { .. } => "update_dialog_opened",
            Self::UpdateDialogClosed => "update_dialog_closed",
            Self::UpdateDescriptionChanged(_) => "update_description_changed",
            Self::UpdateStatusChanged(_) => "update_status_changed",
            Self::UpdateSubmitted => "update_submitted",
            Self::ResolveRequested { .. } => "resolve_requested",
            Self::NotificationDismissed { .. } => "notification_dismissed",
            Self::NotificationsExpired { .. } => "notifications_expired",
            Self::WalletChecked(_) => "wallet_checked",
            Self::WalletConnected(_) => "wallet_connected",
            Self::StatsFetched { .. } => "stats_fetched",
            Self::ListFetched { .. } => "list_fetched",
            Self::FirFiled { .. } => "fir_filed",
            Self::FirUpdated { .. } => "fir_updated",
            Self::FirResolved { .. } => "fir_resolved",
        }
    }
}
