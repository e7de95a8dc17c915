use crate::config::Settings;
use crate::domain::markets::IndexedKeyTicker;
use anyhow::{Context, Result};
use std::time::Duration;
use tokio::sync::OnceCell;

const DIRECTORY_PATH: &str = "/json/indexed_key_ticker_list.json";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Session-scoped ticker directory. The snapshot is fetched at most once;
/// a failed fetch degrades to the empty directory and is not retried.
pub struct TickerDirectoryClient {
    http: reqwest::Client,
    base_url: String,
    cache: OnceCell<Vec<IndexedKeyTicker>>,
}

impl TickerDirectoryClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings.require_site_base_url()?.to_string();
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build directory http client")?;

        Ok(Self {
            http,
            base_url,
            cache: OnceCell::new(),
        })
    }

    pub async fn list(&self) -> &[IndexedKeyTicker] {
        self.cache
            .get_or_init(|| async {
                match self.fetch().await {
                    Ok(entries) => entries,
                    Err(err) => {
                        tracing::error!(
                            error = %err,
                            "ticker directory fetch failed; using empty directory"
                        );
                        Vec::new()
                    }
                }
            })
            .await
            .as_slice()
    }

    async fn fetch(&self) -> Result<Vec<IndexedKeyTicker>> {
        let url = format!("{}{DIRECTORY_PATH}", self.base_url.trim_end_matches('/'));
        let res = self
            .http
            .get(url)
            .send()
            .await
            .context("ticker directory request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read ticker directory response")?;
        if !status.is_success() {
            anyhow::bail!("ticker directory HTTP {status}");
        }

        serde_json::from_str(&text).context("failed to parse ticker directory")
    }
}
