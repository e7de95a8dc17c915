pub mod autocomplete;
pub mod consent;
pub mod dashboard;
pub mod domain;
pub mod markets;
pub mod share;
pub mod state;

mod urlenc;

pub mod config {
    use anyhow::Context;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub api_base_url: Option<String>,
        pub site_base_url: Option<String>,
        pub dashboards_base_url: Option<String>,
        pub stats_index_prefix: Option<String>,
        pub consent_path: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                api_base_url: std::env::var("QUAKS_API_BASE_URL").ok(),
                site_base_url: std::env::var("QUAKS_SITE_BASE_URL").ok(),
                dashboards_base_url: std::env::var("QUAKS_DASHBOARDS_BASE_URL").ok(),
                stats_index_prefix: std::env::var("QUAKS_STATS_INDEX_PREFIX").ok(),
                consent_path: std::env::var("QUAKS_CONSENT_PATH").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn require_api_base_url(&self) -> anyhow::Result<&str> {
            self.api_base_url
                .as_deref()
                .context("QUAKS_API_BASE_URL is required")
        }

        pub fn require_site_base_url(&self) -> anyhow::Result<&str> {
            self.site_base_url
                .as_deref()
                .context("QUAKS_SITE_BASE_URL is required")
        }

        pub fn dashboards_base_url(&self) -> &str {
            self.dashboards_base_url
                .as_deref()
                .unwrap_or(crate::dashboard::embed::DEFAULT_DASHBOARDS_BASE_URL)
        }

        pub fn stats_index_prefix(&self) -> &str {
            self.stats_index_prefix
                .as_deref()
                .unwrap_or(crate::markets::DEFAULT_STATS_INDEX_PREFIX)
        }
    }
}
