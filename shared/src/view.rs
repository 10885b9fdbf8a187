use chrono::TimeZone;
use serde::{Deserialize, Serialize};

use crate::model::{DashboardTab, Fir, Model, Notification, Station, ToastKind};
use crate::presenter::ListState;
use crate::stats::Stats;

pub const EMPTY_LIST_MESSAGE: &str = "No FIRs found. File a new FIR to get started.";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FirCard {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub location: String,
    pub status: String,
    pub is_resolved: bool,
    /// Local calendar date, `YYYY-MM-DD`; empty when unknown.
    pub filed_on: String,
    pub can_update: bool,
    pub can_resolve: bool,
    pub resolving: bool,
}

impl FirCard {
    pub fn new<Tz: TimeZone>(fir: &Fir, zone: &Tz, resolving: bool) -> Self {
        Self {
            id: fir.id.0,
            title: fir.title.clone(),
            description: fir.description.clone(),
            location: fir.location.clone(),
            status: fir.status.clone(),
            is_resolved: fir.is_resolved,
            filed_on: fir
                .timestamp
                .local_date(zone)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            can_update: !fir.is_resolved,
            can_resolve: !fir.is_resolved && !resolving,
            resolving,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ListView {
    Loading,
    Empty { message: String },
    Populated { cards: Vec<FirCard> },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormView {
    pub title: String,
    pub description: String,
    pub location: String,
    pub stations: Vec<String>,
    pub submitting: bool,
    pub submit_label: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateDialogView {
    pub id: u64,
    pub description: String,
    pub status: String,
    pub submitting: bool,
    pub submit_label: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardView {
    pub tab: DashboardTab,
    pub stats: Stats,
    pub form: FormView,
    pub list: ListView,
    pub update_dialog: Option<UpdateDialogView>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewState {
    Landing { connecting: bool },
    Dashboard(Box<DashboardView>),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationView {
    pub id: u64,
    pub title: String,
    pub message: String,
    pub kind: ToastKind,
    pub duration_ms: u64,
}

impl From<&Notification> for NotificationView {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id,
            title: n.kind.title().to_string(),
            message: n.message.clone(),
            kind: n.kind,
            duration_ms: n.duration_ms,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewModel {
    pub state: ViewState,
    pub account: Option<String>,
    pub notifications: Vec<NotificationView>,
}

/// Projects the model; `zone` decides how card dates are rendered.
pub fn build<Tz: TimeZone>(model: &Model, zone: &Tz) -> ViewModel {
    let state = if model.connected {
        ViewState::Dashboard(Box::new(build_dashboard(model, zone)))
    } else {
        ViewState::Landing {
            connecting: model.connecting,
        }
    };

    ViewModel {
        state,
        account: model.account.as_ref().map(|a| a.as_str().to_string()),
        notifications: model.notifications.iter().map(NotificationView::from).collect(),
    }
}

fn build_dashboard<Tz: TimeZone>(model: &Model, zone: &Tz) -> DashboardView {
    let submitting = model.create_state.is_in_flight();
    let form = FormView {
        title: model.form.title.clone(),
        description: model.form.description.clone(),
        location: model.form.location.clone(),
        stations: Station::ALL.iter().map(|s| s.as_str().to_string()).collect(),
        submitting,
        submit_label: if submitting { "Filing FIR..." } else { "Submit FIR" }.into(),
    };

    let list = match &model.list {
        ListState::Loading => ListView::Loading,
        ListState::Empty => ListView::Empty {
            message: EMPTY_LIST_MESSAGE.into(),
        },
        ListState::Populated(records) => ListView::Populated {
            cards: records
                .iter()
                .map(|fir| FirCard::new(fir, zone, model.resolving == Some(fir.id)))
                .collect(),
        },
    };

    let update_dialog = model.update_draft.as_ref().map(|draft| {
        let updating = model.updating == Some(draft.id);
        UpdateDialogView {
            id: draft.id.0,
            description: draft.description.clone(),
            status: draft.status.clone(),
            submitting: updating,
            submit_label: if updating { "Updating..." } else { "Update FIR" }.into(),
        }
    });

    DashboardView {
        tab: model.tab,
        stats: model.stats,
        form,
        list,
        update_dialog,
    }
}
