use serde::{Deserialize, Serialize};

/// One entry of the ticker directory snapshot. Immutable for the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedKeyTicker {
    pub key_ticker: String,
    pub index: String,
    pub name: String,
}

impl IndexedKeyTicker {
    /// Only entries from the stats index family are navigable.
    pub fn in_stats_namespace(&self, prefix: &str) -> bool {
        self.index.starts_with(prefix)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsClose {
    pub key_ticker: String,
    pub most_recent_close: f64,
    pub most_recent_date: String,
    pub most_recent_low: f64,
    pub most_recent_high: f64,
    pub most_recent_volume: f64,
    pub most_recent_open: f64,
    pub percent_variance: f64,
}

impl StatsClose {
    /// Safe default shown before data arrives or after a failed fetch.
    /// Consumers never see a partially filled record; values are replaced
    /// wholesale.
    pub fn zero() -> Self {
        Self {
            key_ticker: String::new(),
            most_recent_close: 0.0,
            most_recent_date: String::new(),
            most_recent_low: 0.0,
            most_recent_high: 0.0,
            most_recent_volume: 0.0,
            most_recent_open: 0.0,
            percent_variance: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_stats_close_endpoint_shape() {
        let v = json!({
            "key_ticker": "NVDA",
            "most_recent_close": 181.77,
            "most_recent_date": "2026-08-07",
            "most_recent_low": 178.01,
            "most_recent_high": 183.25,
            "most_recent_volume": 152_533_100.0,
            "most_recent_open": 179.9,
            "percent_variance": 1.24
        });

        let parsed: StatsClose = serde_json::from_value(v).unwrap();
        assert_eq!(parsed.key_ticker, "NVDA");
        assert_eq!(parsed.most_recent_date, "2026-08-07");
        assert_eq!(parsed.percent_variance, 1.24);
    }

    #[test]
    fn parses_directory_entries() {
        let v = json!([
            { "key_ticker": "NVDA", "index": "stats_stocks_eod", "name": "NVIDIA Corporation" },
            { "key_ticker": "GOOG", "index": "stats_stocks_eod", "name": "Alphabet Inc. (Google)" }
        ]);

        let parsed: Vec<IndexedKeyTicker> = serde_json::from_value(v).unwrap();
        assert_eq!(parsed.len(), 2);
        assert!(parsed[0].in_stats_namespace("stats_stocks_eod"));
        assert!(!parsed[0].in_stats_namespace("stats_crypto"));
    }
}
