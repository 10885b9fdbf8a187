use chrono::{NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use thiserror::Error;

use crate::config::Config;
use crate::presenter::ListState;
use crate::stats::Stats;
use crate::{
    get_current_time_ms, DEFAULT_STATUS, MAX_DESCRIPTION_LENGTH, MAX_NOTIFICATIONS,
    MAX_STATUS_LENGTH, MAX_TITLE_LENGTH,
};

/// Backend-assigned record identifier.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FirId(pub u64);

impl fmt::Display for FirId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountAddress(pub String);

impl AccountAddress {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Explicit timestamp unit. Zero means "unknown".
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnixTimeSecs(pub u64);

impl UnixTimeSecs {
    #[must_use]
    pub const fn is_unset(self) -> bool {
        self.0 == 0
    }

    /// Calendar day of this instant in `zone`.
    pub fn local_date<Tz: TimeZone>(self, zone: &Tz) -> Option<NaiveDate> {
        if self.is_unset() {
            return None;
        }
        let secs = i64::try_from(self.0).ok()?;
        zone.timestamp_opt(secs, 0).single().map(|dt| dt.date_naive())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Station {
    Abids,
    BanjaraHills,
    Charminar,
    JubileeHills,
    Madhapur,
    Panjagutta,
    Secunderabad,
}

impl Station {
    pub const ALL: [Station; 7] = [
        Station::Abids,
        Station::BanjaraHills,
        Station::Charminar,
        Station::JubileeHills,
        Station::Madhapur,
        Station::Panjagutta,
        Station::Secunderabad,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Abids => "Abids Police Station",
            Self::BanjaraHills => "Banjara Hills Police Station",
            Self::Charminar => "Charminar Police Station",
            Self::JubileeHills => "Jubilee Hills Police Station",
            Self::Madhapur => "Madhapur Police Station",
            Self::Panjagutta => "Panjagutta Police Station",
            Self::Secunderabad => "Secunderabad Police Station",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == name)
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized read model of one on-chain record.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Fir {
    pub id: FirId,
    pub complainant: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub timestamp: UnixTimeSecs,
    pub is_resolved: bool,
    pub status: String,
}

impl Default for Fir {
    fn default() -> Self {
        Self {
            id: FirId::default(),
            complainant: String::new(),
            title: String::new(),
            description: String::new(),
            location: String::new(),
            timestamp: UnixTimeSecs::default(),
            is_resolved: false,
            status: DEFAULT_STATUS.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} is too long ({len} > {max})")]
    TooLong { field: String, len: usize, max: usize },

    #[error("Please select a police station")]
    UnknownStation { name: String },
}

fn require(field: &str, value: &str, max: usize) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    if trimmed.len() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            len: trimmed.len(),
            max,
        });
    }
    Ok(trimmed.to_string())
}

/// Write model for `fileFIR`. Only constructible through validation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NewFir {
    pub title: String,
    pub description: String,
    pub location: Station,
}

impl NewFir {
    pub fn new(title: &str, description: &str, location: &str) -> Result<Self, ValidationError> {
        let title = require("Title", title, MAX_TITLE_LENGTH)?;
        let description = require("Description", description, MAX_DESCRIPTION_LENGTH)?;
        let location = Station::from_name(location).ok_or_else(|| ValidationError::UnknownStation {
            name: location.to_string(),
        })?;
        Ok(Self {
            title,
            description,
            location,
        })
    }
}

/// Create-form contents as typed by the user.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct FirForm {
    pub title: String,
    pub description: String,
    pub location: String,
}

impl FirForm {
    pub fn validate(&self) -> Result<NewFir, ValidationError> {
        NewFir::new(&self.title, &self.description, &self.location)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Edit-dialog contents for `updateFIR`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateDraft {
    pub id: FirId,
    pub description: String,
    pub status: String,
}

impl UpdateDraft {
    pub fn from_fir(fir: &Fir) -> Self {
        Self {
            id: fir.id,
            description: fir.description.clone(),
            status: fir.status.clone(),
        }
    }

    pub fn validate(&self) -> Result<(String, String), ValidationError> {
        let description = require("Description", &self.description, MAX_DESCRIPTION_LENGTH)?;
        let status = require("Status", &self.status, MAX_STATUS_LENGTH)?;
        Ok((description, status))
    }
}

/// Per-operation request lifecycle.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RequestState {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed,
}

impl RequestState {
    #[must_use]
    pub const fn is_in_flight(self) -> bool {
        matches!(self, Self::InFlight)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Create,
    Update,
    Resolve,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DashboardTab {
    #[default]
    File,
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl ToastKind {
    #[must_use]
    pub const fn default_duration_ms(self) -> u64 {
        match self {
            Self::Info => 3000,
            Self::Success => 2000,
            Self::Warning => 4000,
            Self::Error => 5000,
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Success => "Success",
            Self::Warning => "Warning",
            Self::Error => "Error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub kind: ToastKind,
    pub created_at_ms: u64,
    pub duration_ms: u64,
}

impl Notification {
    #[must_use]
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.created_at_ms) > self.duration_ms
    }
}

/// Everything the dashboard knows. Owned by the update loop.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Model {
    pub config: Config,

    // Connection gate
    pub connected: bool,
    pub connecting: bool,
    pub account: Option<AccountAddress>,
    /// Bumped on every connect and disconnect; responses tagged with an
    /// older value are dropped.
    pub session: u64,
    /// Bumped per list/stats fetch; only the newest answer is applied.
    pub list_generation: u64,
    pub stats_generation: u64,

    // Dashboard
    pub tab: DashboardTab,
    pub stats: Stats,
    pub list: ListState,

    // Mutations
    pub form: FirForm,
    pub create_state: RequestState,
    pub update_draft: Option<UpdateDraft>,
    pub update_state: RequestState,
    pub updating: Option<FirId>,
    pub resolve_state: RequestState,
    pub resolving: Option<FirId>,

    pub notifications: VecDeque<Notification>,
    pub next_notification_id: u64,
}

impl Model {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters the dashboard for `account`, starting a fresh session.
    pub fn open_session(&mut self, account: AccountAddress) {
        self.reset_session();
        self.connected = true;
        self.account = Some(account);
    }

    /// Drops every piece of derived state and invalidates in-flight responses.
    /// Config and pending notifications survive.
    pub fn reset_session(&mut self) {
        self.connected = false;
        self.connecting = false;
        self.account = None;
        self.session = self.session.wrapping_add(1);
        self.tab = DashboardTab::default();
        self.stats = Stats::default();
        self.list = ListState::default();
        self.form.reset();
        self.create_state = RequestState::Idle;
        self.update_draft = None;
        self.update_state = RequestState::Idle;
        self.updating = None;
        self.resolve_state = RequestState::Idle;
        self.resolving = None;
    }

    #[must_use]
    pub fn request_state(&self, kind: MutationKind) -> RequestState {
        match kind {
            MutationKind::Create => self.create_state,
            MutationKind::Update => self.update_state,
            MutationKind::Resolve => self.resolve_state,
        }
    }

    pub fn set_request_state(&mut self, kind: MutationKind, state: RequestState) {
        match kind {
            MutationKind::Create => self.create_state = state,
            MutationKind::Update => self.update_state = state,
            MutationKind::Resolve => self.resolve_state = state,
        }
    }

    /// First mutation kind currently in flight, if any.
    #[must_use]
    pub fn mutation_in_flight(&self) -> Option<MutationKind> {
        [MutationKind::Create, MutationKind::Update, MutationKind::Resolve]
            .into_iter()
            .find(|kind| self.request_state(*kind).is_in_flight())
    }

    /// Queues a notification, evicting the oldest past `MAX_NOTIFICATIONS`.
    pub fn notify(&mut self, message: impl Into<String>, kind: ToastKind) -> u64 {
        let id = self.next_notification_id;
        self.next_notification_id = self.next_notification_id.wrapping_add(1);

        self.notifications.push_back(Notification {
            id,
            message: message.into(),
            kind,
            created_at_ms: get_current_time_ms(),
            duration_ms: kind.default_duration_ms(),
        });
        while self.notifications.len() > MAX_NOTIFICATIONS {
            self.notifications.pop_front();
        }
        id
    }

    /// Starts a list fetch, superseding any still pending.
    pub fn next_list_generation(&mut self) -> u64 {
        self.list_generation = self.list_generation.wrapping_add(1);
        self.list_generation
    }

    pub fn next_stats_generation(&mut self) -> u64 {
        self.stats_generation = self.stats_generation.wrapping_add(1);
        self.stats_generation
    }

    pub fn dismiss_notification(&mut self, id: u64) -> bool {
        let before = self.notifications.len();
        self.notifications.retain(|n| n.id != id);
        self.notifications.len() != before
    }

    pub fn expire_notifications(&mut self, now_ms: u64) -> usize {
        let before = self.notifications.len();
        self.notifications.retain(|n| !n.is_expired(now_ms));
        before - self.notifications.len()
    }
}
