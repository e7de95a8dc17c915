use crate::dashboard::embed::{self, EmbedUrl};
use crate::dashboard::interval;
use crate::domain::navigation::ShareTarget;
use crate::state::store::SharedState;
use crate::urlenc;

/// Inputs handed over by the routing collaborator: the `keyTicker` path
/// segment and the optional `interval` query parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    pub key_ticker: String,
    pub interval: Option<String>,
}

/// Path the routing collaborator navigates to for a selected ticker.
pub fn stock_dashboard_path(key_ticker: &str) -> String {
    format!(
        "/markets/stocks-eod-dashboard/{}",
        urlenc::encode_component(key_ticker)
    )
}

/// Per-ticker dashboard page state. Holds the writer role of the share
/// target store for as long as the page is active: every routing-relevant
/// input change re-derives the canonical share URL, and `deactivate` resets
/// the store so stale targets never leak to unrelated pages.
pub struct StockDashboardPage {
    dashboards_base_url: String,
    share_target: SharedState<ShareTarget>,
    route: RouteParams,
    interval_in_days: u32,
}

impl StockDashboardPage {
    pub fn new(
        dashboards_base_url: impl Into<String>,
        share_target: SharedState<ShareTarget>,
    ) -> Self {
        Self {
            dashboards_base_url: dashboards_base_url.into(),
            share_target,
            route: RouteParams::default(),
            interval_in_days: interval::DEFAULT_INTERVAL_IN_DAYS,
        }
    }

    pub fn key_ticker(&self) -> &str {
        &self.route.key_ticker
    }

    pub fn interval_in_days(&self) -> u32 {
        self.interval_in_days
    }

    pub fn interval_in_dates(&self) -> &str {
        self.route.interval.as_deref().unwrap_or("")
    }

    pub fn on_route_change(&mut self, route: RouteParams, current_href: &str) {
        self.route = route;
        self.publish_share_target(current_href);
    }

    pub fn set_interval_in_days(&mut self, days: u32, current_href: &str) {
        self.interval_in_days = days;
        self.publish_share_target(current_href);
    }

    pub fn embed_url(&self) -> EmbedUrl {
        embed::embed_url(
            &self.dashboards_base_url,
            self.key_ticker(),
            self.interval_in_days,
            self.interval_in_dates(),
        )
    }

    pub fn deactivate(&self) {
        self.share_target.update(ShareTarget::empty());
    }

    fn publish_share_target(&self, current_href: &str) {
        let title = format!("Stock Analysis {}", self.route.key_ticker);

        // With an absolute window the page address already pins the exact
        // range; otherwise synthesize one so the link stays stable over time.
        let url = if interval::parse_absolute(self.interval_in_dates()).is_some() {
            current_href.to_string()
        } else {
            let base = current_href.split('?').next().unwrap_or(current_href);
            format!(
                "{base}?interval={}_{}",
                interval::past_date(self.interval_in_days),
                interval::past_date(1)
            )
        };

        self.share_target.update(ShareTarget { url, title });
    }
}
