use serde::{Deserialize, Serialize};

use crate::error::{Action, AppError};
use crate::model::{Fir, FirId};

/// Render state of the "My FIRs" list for one fetch cycle.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub enum ListState {
    #[default]
    Loading,
    Empty,
    /// Newest first. Also used, with no records, after a failed fetch.
    Populated(Vec<Fir>),
}

impl ListState {
    /// Terminal state for a successful fetch.
    #[must_use]
    pub fn from_records(mut records: Vec<Fir>) -> Self {
        if records.is_empty() {
            return Self::Empty;
        }
        sort_by_recency(&mut records);
        Self::Populated(records)
    }

    /// Terminal state for a failed fetch: cleared, never stale.
    #[must_use]
    pub fn failed() -> Self {
        Self::Populated(Vec::new())
    }

    /// Settles a fetch, returning the message to surface on failure.
    #[must_use]
    pub fn settle(result: Result<Vec<Fir>, AppError>) -> (Self, Option<String>) {
        match result {
            Ok(records) => (Self::from_records(records), None),
            Err(e) => (Self::failed(), Some(e.user_facing_message(Action::LoadFirs))),
        }
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub fn records(&self) -> &[Fir] {
        match self {
            Self::Populated(records) => records,
            Self::Loading | Self::Empty => &[],
        }
    }

    #[must_use]
    pub fn find(&self, id: FirId) -> Option<&Fir> {
        self.records().iter().find(|fir| fir.id == id)
    }
}

/// Stable sort, newest timestamp first.
pub fn sort_by_recency(records: &mut [Fir]) {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}
