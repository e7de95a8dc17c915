use crate::config::Settings;
use crate::dashboard::interval;
use crate::domain::markets::StatsClose;
use crate::state::store::{lock, SharedState};
use crate::urlenc;
use anyhow::{Context, Result};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

#[async_trait::async_trait]
pub trait StatsCloseSource: Send + Sync {
    async fn fetch_stats_close(
        &self,
        index_name: &str,
        key_ticker: &str,
        interval_in_dates: &str,
    ) -> Result<StatsClose>;
}

#[derive(Debug, Clone)]
pub struct HttpStatsCloseClient {
    http: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
}

impl HttpStatsCloseClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings.require_api_base_url()?.to_string();
        let http = reqwest::Client::builder()
            .build()
            .context("failed to build stats http client")?;

        Ok(Self {
            http,
            base_url,
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        })
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    fn url(&self, index_name: &str, key_ticker: &str) -> String {
        format!(
            "{}/markets/stats_close/{}/{}",
            self.base_url.trim_end_matches('/'),
            urlenc::encode_component(index_name),
            urlenc::encode_component(key_ticker)
        )
    }
}

#[async_trait::async_trait]
impl StatsCloseSource for HttpStatsCloseClient {
    async fn fetch_stats_close(
        &self,
        index_name: &str,
        key_ticker: &str,
        interval_in_dates: &str,
    ) -> Result<StatsClose> {
        let mut req = self.http.get(self.url(index_name, key_ticker));
        // The backend scopes its aggregation to the window's end date when an
        // absolute window is active; the parameter is omitted otherwise.
        if let Some(date) = interval::absolute_end_date(interval_in_dates) {
            req = req.query(&[("date", date)]);
        }

        // Single wall-clock-bounded attempt; a new input triple is the only
        // trigger for another one.
        let res = tokio::time::timeout(self.request_timeout, req.send())
            .await
            .context("stats_close request timed out")?
            .context("stats_close request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read stats_close response")?;
        if !status.is_success() {
            anyhow::bail!("stats_close HTTP {status}: {text}");
        }

        serde_json::from_str::<StatsClose>(&text).context("failed to parse stats_close response")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StatsKey {
    index_name: String,
    key_ticker: String,
    interval_in_dates: String,
}

/// Debounced per-triple fetch state. Every input change issues exactly one
/// request; a result is applied only while its triple is still the latest
/// requested one, so a late response can never overwrite a fresher value.
/// Failures degrade to the zero stats and are logged, never raised.
pub struct StatsClosePipeline {
    source: Arc<dyn StatsCloseSource>,
    state: SharedState<StatsClose>,
    latest: Arc<Mutex<Option<StatsKey>>>,
}

impl StatsClosePipeline {
    pub fn new(source: Arc<dyn StatsCloseSource>) -> Self {
        Self {
            source,
            state: SharedState::new(StatsClose::zero()),
            latest: Arc::new(Mutex::new(None)),
        }
    }

    pub fn state(&self) -> &SharedState<StatsClose> {
        &self.state
    }

    pub fn set_inputs(
        &self,
        index_name: &str,
        key_ticker: &str,
        interval_in_dates: &str,
    ) -> tokio::task::JoinHandle<()> {
        let key = StatsKey {
            index_name: index_name.to_string(),
            key_ticker: key_ticker.to_string(),
            interval_in_dates: interval_in_dates.to_string(),
        };
        *lock(&self.latest) = Some(key.clone());

        let source = Arc::clone(&self.source);
        let state = self.state.clone();
        let latest = Arc::clone(&self.latest);
        tokio::spawn(async move {
            let value = match source
                .fetch_stats_close(&key.index_name, &key.key_ticker, &key.interval_in_dates)
                .await
            {
                Ok(stats) => stats,
                Err(err) => {
                    tracing::error!(
                        index = %key.index_name,
                        ticker = %key.key_ticker,
                        error = %err,
                        "stats_close fetch failed; showing zero stats"
                    );
                    StatsClose::zero()
                }
            };

            // Checked and applied under the same guard; subscribers of the
            // stats store must not call back into set_inputs.
            let guard = lock(&latest);
            if guard.as_ref() == Some(&key) {
                state.update(value);
            }
        })
    }
}
