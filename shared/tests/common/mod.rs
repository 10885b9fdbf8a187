#![allow(dead_code)]

use crux_core::testing::AppTester;
use crux_core::Request;
use fir_shared::capabilities::{
    LedgerCall, LedgerOutput, LedgerRequest, LedgerResult, WalletOperation, WalletOutput,
    WalletResult,
};
use fir_shared::{App, Effect, Event, Model, Station};

pub const ACCOUNT: &str = "0x9f2c4e0b7a1d3e5f6a8b9c0d1e2f3a4b5c6d7e8f";

/// Drives the app the way a shell would: effects out, resolved outputs back in.
pub struct Harness {
    pub app: AppTester<App, Effect>,
    pub model: Model,
}

impl Default for Harness {
    fn default() -> Self {
        Self {
            app: AppTester::default(),
            model: Model::default(),
        }
    }
}

impl Harness {
    pub fn send(&mut self, event: Event) -> Vec<Effect> {
        self.app.update(event, &mut self.model).effects
    }

    pub fn resolve_ledger(
        &mut self,
        request: &mut Request<LedgerRequest>,
        result: LedgerResult,
    ) -> Vec<Effect> {
        let update = self
            .app
            .resolve(request, result)
            .expect("ledger request should resolve");
        self.feed(update.events)
    }

    pub fn resolve_wallet(
        &mut self,
        request: &mut Request<WalletOperation>,
        result: WalletResult,
    ) -> Vec<Effect> {
        let update = self
            .app
            .resolve(request, result)
            .expect("wallet request should resolve");
        self.feed(update.events)
    }

    fn feed(&mut self, events: Vec<Event>) -> Vec<Effect> {
        events
            .into_iter()
            .flat_map(|event| self.send(event))
            .collect()
    }

    /// Connects `ACCOUNT` and answers the initial stats query with `payload`.
    pub fn connect_with(&mut self, payload: &str) {
        let effects = self.send(Event::ConnectRequested);
        let mut connect = wallet_requests(effects).remove(0);
        let effects = self.resolve_wallet(
            &mut connect,
            Ok(WalletOutput::Connected {
                account: ACCOUNT.into(),
            }),
        );
        let mut stats = ledger_requests(effects).remove(0);
        assert_eq!(stats.operation.call, LedgerCall::GetMyFirs);
        self.resolve_ledger(&mut stats, records(payload));
    }

    pub fn connect(&mut self) {
        self.connect_with("[]");
    }

    pub fn fill_form(&mut self, title: &str, description: &str, station: Station) {
        self.send(Event::FormTitleChanged(title.into()));
        self.send(Event::FormDescriptionChanged(description.into()));
        self.send(Event::FormStationSelected(station.as_str().into()));
    }

    /// Opens the list tab and answers the fetch with `payload`.
    pub fn load_list(&mut self, payload: &str) {
        let effects = self.send(Event::TabSelected(fir_shared::DashboardTab::List));
        let mut fetch = ledger_requests(effects).remove(0);
        self.resolve_ledger(&mut fetch, records(payload));
    }

    pub fn messages(&self) -> Vec<&str> {
        self.model
            .notifications
            .iter()
            .map(|n| n.message.as_str())
            .collect()
    }
}

pub fn ledger_requests(effects: Vec<Effect>) -> Vec<Request<LedgerRequest>> {
    effects
        .into_iter()
        .filter_map(|effect| match effect {
            Effect::Ledger(request) => Some(request),
            _ => None,
        })
        .collect()
}

pub fn wallet_requests(effects: Vec<Effect>) -> Vec<Request<WalletOperation>> {
    effects
        .into_iter()
        .filter_map(|effect| match effect {
            Effect::Wallet(request) => Some(request),
            _ => None,
        })
        .collect()
}

pub fn renders(effects: &[Effect]) -> bool {
    effects.iter().any(|e| matches!(e, Effect::Render(_)))
}

pub fn records(payload: &str) -> LedgerResult {
    Ok(LedgerOutput::Records {
        payload: payload.into(),
    })
}

pub fn confirmed() -> LedgerResult {
    Ok(LedgerOutput::Confirmed {
        tx_hash: "0xfeed".into(),
    })
}

/// `getMyFIRs` payload text for `(id, timestamp, is_resolved)` entries.
pub fn payload(entries: &[(u64, i64, bool)]) -> String {
    let entries: Vec<serde_json::Value> = entries
        .iter()
        .map(|(id, timestamp, resolved)| {
            serde_json::json!({
                "id": id.to_string(),
                "complainant": ACCOUNT,
                "title": format!("Complaint {id}"),
                "description": "Phone snatched near the bus stop",
                "location": Station::Abids.as_str(),
                "timestamp": timestamp,
                "isResolved": resolved,
                "status": if *resolved { "Resolved" } else { "Pending" },
            })
        })
        .collect();
    serde_json::Value::Array(entries).to_string()
}
