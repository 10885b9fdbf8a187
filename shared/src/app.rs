use chrono::Local;
use tracing::{debug, info, warn};

use crate::capabilities::{Capabilities, LedgerOutput, LedgerResult, WalletOutput, WalletResult};
use crate::error::{Action, AppError, AppResult, ErrorKind};
use crate::event::Event;
use crate::model::{
    AccountAddress, DashboardTab, Fir, FirId, Model, MutationKind, RequestState, ToastKind,
    UpdateDraft,
};
use crate::normalize::normalize_records;
use crate::presenter::ListState;
use crate::stats::aggregate;
use crate::view::{self, ViewModel};

pub const BUSY_MESSAGE: &str = "Another request is still in progress";

#[derive(Default)]
pub struct App;

impl App {
    const fn action_for(kind: MutationKind) -> Action {
        match kind {
            MutationKind::Create => Action::FileFir,
            MutationKind::Update => Action::UpdateFir,
            MutationKind::Resolve => Action::ResolveFir,
        }
    }

    fn records_from(result: LedgerResult) -> AppResult<Vec<Fir>> {
        match result? {
            LedgerOutput::Records { payload } => {
                let raw: serde_json::Value = serde_json::from_str(&payload)?;
                Ok(normalize_records(&raw))
            }
            LedgerOutput::Confirmed { tx_hash } => Err(AppError::new(
                ErrorKind::Unknown,
                "Unexpected ledger output",
            )
            .with_context("tx_hash", tx_hash)),
        }
    }

    fn confirmation_from(result: LedgerResult) -> AppResult<String> {
        match result? {
            LedgerOutput::Confirmed { tx_hash } => Ok(tx_hash),
            LedgerOutput::Records { .. } => Err(AppError::new(
                ErrorKind::Unknown,
                "Unexpected ledger output",
            )),
        }
    }

    fn enter_dashboard(model: &mut Model, caps: &Capabilities, account: String) {
        info!(%account, "wallet connected");
        model.open_session(AccountAddress::new(account));
        Self::fetch_stats(model, caps);
    }

    fn disconnect(model: &mut Model) {
        model.reset_session();
        info!(session = model.session, "disconnected");
    }

    fn fetch_stats(model: &mut Model, caps: &Capabilities) {
        let session = model.session;
        let generation = model.next_stats_generation();
        caps.ledger
            .get_my_firs(model.config.query_timeout_ms, move |result| Event::StatsFetched {
                session,
                generation,
                result: Box::new(result),
            });
    }

    /// Restarts the list at `Loading`; `after` marks a post-mutation refetch.
    fn fetch_list(model: &mut Model, caps: &Capabilities, after: Option<MutationKind>) {
        model.list = ListState::Loading;
        let session = model.session;
        let generation = model.next_list_generation();
        caps.ledger
            .get_my_firs(model.config.query_timeout_ms, move |result| Event::ListFetched {
                session,
                generation,
                after,
                result: Box::new(result),
            });
    }

    /// Same-kind requests are dropped silently; other kinds are refused only
    /// when `serialize_mutations` is on.
    fn admit_mutation(model: &mut Model, kind: MutationKind) -> bool {
        if model.request_state(kind).is_in_flight() {
            debug!(?kind, "mutation already in flight, ignoring");
            return false;
        }

        let blocking = model
            .config
            .serialize_mutations
            .then(|| model.mutation_in_flight())
            .flatten();
        if let Some(busy) = blocking {
            let err = AppError::new(ErrorKind::Busy, BUSY_MESSAGE)
                .with_context("in_flight", format!("{busy:?}"))
                .with_context("requested", format!("{kind:?}"));
            warn!(error = %err, "mutation refused");
            model.notify(err.user_facing_message(Self::action_for(kind)), ToastKind::Warning);
            return false;
        }
        true
    }

    fn mutation_failed(model: &mut Model, kind: MutationKind, err: &AppError) {
        warn!(?kind, code = err.code(), error = %err, "mutation failed");
        model.set_request_state(kind, RequestState::Failed);
        match kind {
            MutationKind::Update => model.updating = None,
            MutationKind::Resolve => model.resolving = None,
            MutationKind::Create => {}
        }
        model.notify(err.user_facing_message(Self::action_for(kind)), ToastKind::Error);
    }

    fn is_stale(model: &Model, session: u64, event: &'static str) -> bool {
        if session == model.session {
            return false;
        }
        debug!(
            event,
            session,
            current = model.session,
            "dropping response from previous session"
        );
        true
    }

    fn handle_wallet_checked(model: &mut Model, caps: &Capabilities, result: WalletResult) {
        match result {
            Ok(WalletOutput::Connected { account }) if !model.connected => {
                Self::enter_dashboard(model, caps, account);
            }
            Ok(WalletOutput::Connected { .. }) => {}
            Ok(WalletOutput::NotConnected) => debug!("no authorized account"),
            Err(e) => warn!(error = %e, "wallet check failed"),
        }
    }

    fn handle_wallet_connected(model: &mut Model, caps: &Capabilities, result: WalletResult) {
        model.connecting = false;
        let err = match result {
            Ok(WalletOutput::Connected { account }) => {
                Self::enter_dashboard(model, caps, account);
                return;
            }
            Ok(WalletOutput::NotConnected) => {
                AppError::new(ErrorKind::WalletUnavailable, "Wallet returned no account")
            }
            Err(e) => AppError::from(e),
        };
        warn!(code = err.code(), error = %err, "wallet connect failed");
        model.notify(err.user_facing_message(Action::ConnectWallet), ToastKind::Error);
    }

    fn submit_create(model: &mut Model, caps: &Capabilities) {
        if !Self::admit_mutation(model, MutationKind::Create) {
            return;
        }
        let fir = match model.form.validate() {
            Ok(fir) => fir,
            Err(e) => {
                let err = AppError::from(e);
                debug!(error = %err, "create form rejected");
                model.notify(err.user_facing_message(Action::FileFir), ToastKind::Error);
                return;
            }
        };

        model.create_state = RequestState::InFlight;
        let session = model.session;
        caps.ledger
            .file_fir(&fir, model.config.tx_timeout_ms, move |result| Event::FirFiled {
                session,
                result: Box::new(result),
            });
    }

    fn submit_update(model: &mut Model, caps: &Capabilities) {
        let Some(draft) = model.update_draft.clone() else {
            debug!("update submitted without an open dialog");
            return;
        };
        if !Self::admit_mutation(model, MutationKind::Update) {
            return;
        }
        let (description, status) = match draft.validate() {
            Ok(fields) => fields,
            Err(e) => {
                let err = AppError::from(e).with_context("id", draft.id.to_string());
                debug!(error = %err, "update draft rejected");
                model.notify(err.user_facing_message(Action::UpdateFir), ToastKind::Error);
                return;
            }
        };

        model.update_state = RequestState::InFlight;
        model.updating = Some(draft.id);
        let session = model.session;
        let id = draft.id;
        caps.ledger.update_fir(
            id,
            description,
            status,
            model.config.tx_timeout_ms,
            move |result| Event::FirUpdated {
                session,
                id,
                result: Box::new(result),
            },
        );
    }

    fn submit_resolve(model: &mut Model, caps: &Capabilities, id: FirId) {
        if model.list.find(id).is_some_and(|fir| fir.is_resolved) {
            debug!(%id, "already resolved, ignoring");
            return;
        }
        if !Self::admit_mutation(model, MutationKind::Resolve) {
            return;
        }

        model.resolve_state = RequestState::InFlight;
        model.resolving = Some(id);
        let session = model.session;
        caps.ledger
            .resolve_fir(id, model.config.tx_timeout_ms, move |result| Event::FirResolved {
                session,
                id,
                result: Box::new(result),
            });
    }

    fn handle_list_fetched(
        model: &mut Model,
        caps: &Capabilities,
        generation: u64,
        after: Option<MutationKind>,
        result: LedgerResult,
    ) {
        // A newer fetch is pending; its answer decides what the list shows.
        if generation == model.list_generation {
            let (list, message) = ListState::settle(Self::records_from(result));
            if let Some(message) = message {
                warn!(?after, %message, "list fetch failed");
                model.notify(message, ToastKind::Error);
            } else {
                debug!(records = list.records().len(), "list fetched");
            }
            model.list = list;
        } else {
            debug!(generation, current = model.list_generation, "dropping superseded list");
        }

        // A confirmed mutation reports success only once the refetch settled.
        if let Some(kind) = after {
            model.set_request_state(kind, RequestState::Succeeded);
            match kind {
                MutationKind::Update => {
                    // The dialog may have moved on to another record meanwhile.
                    if let Some(id) = model.updating.take() {
                        if model.update_draft.as_ref().is_some_and(|d| d.id == id) {
                            model.update_draft = None;
                        }
                    }
                }
                MutationKind::Resolve => model.resolving = None,
                MutationKind::Create => {}
            }
            Self::fetch_stats(model, caps);
            if let Some(message) = Self::action_for(kind).success_message() {
                model.notify(message, ToastKind::Success);
            }
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        debug!(event = event.name(), "update");

        match event {
            Event::AppStarted => {
                caps.wallet
                    .current_account(|result| Event::WalletChecked(Box::new(result)));
            }

            Event::Configure(config) => {
                model.config = config.sanitized();
                info!(
                    query_timeout_ms = model.config.query_timeout_ms,
                    tx_timeout_ms = model.config.tx_timeout_ms,
                    serialize_mutations = model.config.serialize_mutations,
                    "configured"
                );
                return;
            }

            Event::ConnectRequested => {
                if model.connected || model.connecting {
                    debug!("connect already pending or done");
                    return;
                }
                model.connecting = true;
                caps.wallet
                    .connect(|result| Event::WalletConnected(Box::new(result)));
            }

            Event::DisconnectRequested | Event::LogoClicked => {
                if !model.connected {
                    return;
                }
                Self::disconnect(model);
            }

            Event::WalletChecked(result) => Self::handle_wallet_checked(model, caps, *result),

            Event::WalletConnected(result) => Self::handle_wallet_connected(model, caps, *result),

            Event::TabSelected(tab) => {
                if !model.connected {
                    return;
                }
                model.tab = tab;
                if tab == DashboardTab::List {
                    Self::fetch_list(model, caps, None);
                }
            }

            Event::RefreshRequested => {
                if !model.connected {
                    return;
                }
                Self::fetch_list(model, caps, None);
            }

            Event::FormTitleChanged(title) => model.form.title = title,
            Event::FormDescriptionChanged(description) => model.form.description = description,
            Event::FormStationSelected(location) => model.form.location = location,

            Event::FormSubmitted => {
                if !model.connected {
                    return;
                }
                Self::submit_create(model, caps);
            }

            Event::FirFiled { session, result } => {
                if Self::is_stale(model, session, "fir_filed") {
                    return;
                }
                match Self::confirmation_from(*result) {
                    Ok(tx_hash) => {
                        info!(%tx_hash, "fir filed");
                        model.form.reset();
                        model.create_state = RequestState::Succeeded;
                        if let Some(message) = Action::FileFir.success_message() {
                            model.notify(message, ToastKind::Success);
                        }
                        Self::fetch_stats(model, caps);
                    }
                    Err(err) => Self::mutation_failed(model, MutationKind::Create, &err),
                }
            }

            Event::UpdateDialogOpened { id } => match model.list.find(id) {
                Some(fir) if !fir.is_resolved => {
                    model.update_draft = Some(UpdateDraft::from_fir(fir));
                }
                Some(_) => {
                    debug!(%id, "resolved records cannot be updated");
                    return;
                }
                None => {
                    warn!(%id, "update requested for unknown record");
                    return;
                }
            },

            Event::UpdateDialogClosed => model.update_draft = None,

            Event::UpdateDescriptionChanged(description) => {
                if let Some(draft) = model.update_draft.as_mut() {
                    draft.description = description;
                }
            }

            Event::UpdateStatusChanged(status) => {
                if let Some(draft) = model.update_draft.as_mut() {
                    draft.status = status;
                }
            }

            Event::UpdateSubmitted => {
                if !model.connected {
                    return;
                }
                Self::submit_update(model, caps);
            }

            Event::FirUpdated { session, id, result } => {
                if Self::is_stale(model, session, "fir_updated") {
                    return;
                }
                match Self::confirmation_from(*result) {
                    Ok(tx_hash) => {
                        info!(%id, %tx_hash, "fir updated, refetching");
                        Self::fetch_list(model, caps, Some(MutationKind::Update));
                    }
                    Err(err) => {
                        let err = err.with_context("id", id.to_string());
                        Self::mutation_failed(model, MutationKind::Update, &err);
                    }
                }
            }

            Event::ResolveRequested { id } => {
                if !model.connected {
                    return;
                }
                Self::submit_resolve(model, caps, id);
            }

            Event::FirResolved { session, id, result } => {
                if Self::is_stale(model, session, "fir_resolved") {
                    return;
                }
                match Self::confirmation_from(*result) {
                    Ok(tx_hash) => {
                        info!(%id, %tx_hash, "fir resolved, refetching");
                        Self::fetch_list(model, caps, Some(MutationKind::Resolve));
                    }
                    Err(err) => {
                        let err = err.with_context("id", id.to_string());
                        Self::mutation_failed(model, MutationKind::Resolve, &err);
                    }
                }
            }

            Event::ListFetched {
                session,
                generation,
                after,
                result,
            } => {
                if Self::is_stale(model, session, "list_fetched") {
                    return;
                }
                if after.is_none() && generation != model.list_generation {
                    debug!(generation, current = model.list_generation, "dropping superseded list");
                    return;
                }
                Self::handle_list_fetched(model, caps, generation, after, *result);
            }

            Event::StatsFetched {
                session,
                generation,
                result,
            } => {
                if Self::is_stale(model, session, "stats_fetched") {
                    return;
                }
                if generation != model.stats_generation {
                    debug!(
                        generation,
                        current = model.stats_generation,
                        "dropping superseded stats"
                    );
                    return;
                }
                match Self::records_from(*result) {
                    Ok(records) => {
                        model.stats = aggregate(&records);
                        debug!(total = model.stats.total, "stats refreshed");
                    }
                    // Known gap: counters stay at their previous values.
                    Err(err) => warn!(code = err.code(), error = %err, "stats refresh failed"),
                }
            }

            Event::NotificationDismissed { id } => {
                if !model.dismiss_notification(id) {
                    return;
                }
            }

            Event::NotificationsExpired { now_ms } => {
                if model.expire_notifications(now_ms) == 0 {
                    return;
                }
            }
        }

        caps.render.render();
    }

    fn view(&self, model: &Model) -> ViewModel {
        view::build(model, &Local)
    }
}
