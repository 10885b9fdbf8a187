use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{LEDGER_QUERY_TIMEOUT, LEDGER_TX_TIMEOUT, MAX_LEDGER_TIMEOUT};

/// Runtime settings the shell may override with `Event::Configure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Upper bound for `getMyFIRs`, enforced by the shell.
    pub query_timeout_ms: u64,
    /// Upper bound for a transaction, submission through confirmation.
    pub tx_timeout_ms: u64,
    /// Refuse any mutation while a mutation of another kind is in flight.
    pub serialize_mutations: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            query_timeout_ms: duration_ms(LEDGER_QUERY_TIMEOUT),
            tx_timeout_ms: duration_ms(LEDGER_TX_TIMEOUT),
            serialize_mutations: false,
        }
    }
}

impl Config {
    /// Clamps timeouts into `1..=MAX_LEDGER_TIMEOUT`; zero falls back to the default.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let max = duration_ms(MAX_LEDGER_TIMEOUT);
        let clamp = |value: u64, fallback: u64| if value == 0 { fallback } else { value.min(max) };

        Self {
            query_timeout_ms: clamp(self.query_timeout_ms, defaults.query_timeout_ms),
            tx_timeout_ms: clamp(self.tx_timeout_ms, defaults.tx_timeout_ms),
            serialize_mutations: self.serialize_mutations,
        }
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_constants() {
        let config = Config::default();
        assert_eq!(config.query_timeout_ms, 30_000);
        assert_eq!(config.tx_timeout_ms, 120_000);
        assert!(!config.serialize_mutations);
    }

    #[test]
    fn sanitized_replaces_zero_and_caps_large_values() {
        let config = Config {
            query_timeout_ms: 0,
            tx_timeout_ms: u64::MAX,
            serialize_mutations: true,
        }
        .sanitized();

        assert_eq!(config.query_timeout_ms, 30_000);
        assert_eq!(config.tx_timeout_ms, 600_000);
        assert!(config.serialize_mutations);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"serialize_mutations":true}"#).unwrap();
        assert_eq!(config.query_timeout_ms, 30_000);
        assert!(config.serialize_mutations);
    }
}
