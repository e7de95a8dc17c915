use crate::domain::markets::IndexedKeyTicker;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

const BLUR_CLOSE_DELAY_MS: u64 = 200;

/// Incremental ticker search over the session's directory snapshot. Holds
/// the query and the open/closed state of the suggestion panel; the caller
/// owns selection consequences (navigability check, navigation).
pub struct StockAutocomplete {
    directory: Vec<IndexedKeyTicker>,
    stats_index_prefix: String,
    query: String,
    open: Arc<AtomicBool>,
    // Bumped by every interaction; a pending blur-close only fires if its
    // epoch is still current.
    epoch: Arc<AtomicU64>,
}

impl StockAutocomplete {
    pub fn new(directory: Vec<IndexedKeyTicker>, stats_index_prefix: impl Into<String>) -> Self {
        Self {
            directory,
            stats_index_prefix: stats_index_prefix.into(),
            query: String::new(),
            open: Arc::new(AtomicBool::new(false)),
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Case-insensitive substring match on ticker or name, restricted to the
    /// stats index namespace. An empty or whitespace-only query never shows
    /// the full directory.
    pub fn suggestions(&self) -> Vec<IndexedKeyTicker> {
        let query = self.query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        self.directory
            .iter()
            .filter(|stock| stock.in_stats_namespace(&self.stats_index_prefix))
            .filter(|stock| {
                stock.key_ticker.to_lowercase().contains(&query)
                    || stock.name.to_lowercase().contains(&query)
            })
            .cloned()
            .collect()
    }

    pub fn on_search(&mut self, query: &str) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.query = query.to_string();
        self.open.store(!self.query.is_empty(), Ordering::SeqCst);
    }

    pub fn on_focus(&mut self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        if !self.query.is_empty() {
            self.open.store(true, Ordering::SeqCst);
        }
    }

    /// Closing is delayed so a pointer selection inside the panel wins over
    /// the blur that fires just before it.
    pub fn on_blur(&self) -> tokio::task::JoinHandle<()> {
        let epoch = self.epoch.load(Ordering::SeqCst);
        let open = Arc::clone(&self.open);
        let latest = Arc::clone(&self.epoch);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(BLUR_CLOSE_DELAY_MS)).await;
            if latest.load(Ordering::SeqCst) == epoch {
                open.store(false, Ordering::SeqCst);
            }
        })
    }

    /// Emits the chosen entry outward; whether its index is navigable and
    /// where to navigate stays the caller's decision.
    pub fn select(&mut self, stock: IndexedKeyTicker) -> IndexedKeyTicker {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.query = stock.key_ticker.clone();
        self.open.store(false, Ordering::SeqCst);
        stock
    }

    pub fn clear(&mut self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.query.clear();
        self.open.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markets::DEFAULT_STATS_INDEX_PREFIX;

    fn stock(key_ticker: &str, index: &str, name: &str) -> IndexedKeyTicker {
        IndexedKeyTicker {
            key_ticker: key_ticker.to_string(),
            index: index.to_string(),
            name: name.to_string(),
        }
    }

    fn directory() -> Vec<IndexedKeyTicker> {
        vec![
            stock("NVDA", "stats_stocks_eod", "NVIDIA Corporation"),
            stock("GOOG", "stats_stocks_eod", "Alphabet Inc. (Google)"),
            stock("AAPL", "stats_stocks_eod", "Apple Inc."),
            stock("META", "stats_stocks_eod", "Meta Platforms Inc. (Facebook)"),
            stock("BTC", "stats_crypto_eod", "Bitcoin"),
        ]
    }

    fn autocomplete() -> StockAutocomplete {
        StockAutocomplete::new(directory(), DEFAULT_STATS_INDEX_PREFIX)
    }

    #[test]
    fn empty_and_whitespace_queries_yield_nothing() {
        let mut ac = autocomplete();

        ac.on_search("");
        assert!(ac.suggestions().is_empty());
        assert!(!ac.is_open());

        ac.on_search("   ");
        assert!(ac.suggestions().is_empty());
    }

    #[test]
    fn matches_ticker_and_name_case_insensitively() {
        let mut ac = autocomplete();

        ac.on_search("nvidia");
        let hits = ac.suggestions();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].key_ticker, "NVDA");

        ac.on_search("aapl");
        assert_eq!(ac.suggestions()[0].key_ticker, "AAPL");

        ac.on_search("inc.");
        assert_eq!(ac.suggestions().len(), 3);
    }

    #[test]
    fn entries_outside_the_stats_namespace_are_hidden() {
        let mut ac = autocomplete();
        ac.on_search("btc");
        assert!(ac.suggestions().is_empty());
    }

    #[test]
    fn repeated_identical_queries_return_identical_results() {
        let mut ac = autocomplete();
        ac.on_search("goog");
        let first = ac.suggestions();
        let second = ac.suggestions();
        assert_eq!(first, second);
    }

    #[test]
    fn select_takes_over_the_query_and_closes_the_panel() {
        let mut ac = autocomplete();
        ac.on_search("nvi");
        assert!(ac.is_open());

        let picked = ac.select(stock("NVDA", "stats_stocks_eod", "NVIDIA Corporation"));
        assert_eq!(picked.key_ticker, "NVDA");
        assert_eq!(ac.query(), "NVDA");
        assert!(!ac.is_open());
    }

    #[test]
    fn clear_resets_query_and_panel() {
        let mut ac = autocomplete();
        ac.on_search("nvi");
        ac.clear();
        assert_eq!(ac.query(), "");
        assert!(!ac.is_open());
    }

    #[tokio::test]
    async fn blur_closes_the_panel_after_the_delay() {
        let mut ac = autocomplete();
        ac.on_search("nvi");
        assert!(ac.is_open());

        let close = ac.on_blur();
        assert!(ac.is_open());
        close.await.unwrap();
        assert!(!ac.is_open());
    }

    #[tokio::test]
    async fn refocus_preempts_a_pending_blur_close() {
        let mut ac = autocomplete();
        ac.on_search("nvi");

        let close = ac.on_blur();
        ac.on_focus();
        close.await.unwrap();

        assert!(ac.is_open());
    }
}
