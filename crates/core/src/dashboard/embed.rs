use crate::dashboard::interval;
use crate::urlenc;
use std::fmt;
use url::form_urlencoded;

pub const DEFAULT_DASHBOARDS_BASE_URL: &str = "https://kibana.bsantanna.me/app/dashboards";

const LONG_RANGE_DASHBOARD_ID: &str = "16c3228b-0831-442d-ae18-3a2cf4700792";
const SHORT_RANGE_DASHBOARD_ID: &str = "f24f0eea-d8e5-4721-9057-9395daf7c931";

// Relative windows at or below this many days render on the short-range
// dashboard; anything longer, or any absolute window, uses the long-range one.
const SHORT_RANGE_MAX_DAYS: u32 = 30;

const REFRESH_INTERVAL_MS: u64 = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardVariant {
    ShortRange,
    LongRange,
}

impl DashboardVariant {
    pub fn dashboard_id(self) -> &'static str {
        match self {
            DashboardVariant::LongRange => LONG_RANGE_DASHBOARD_ID,
            DashboardVariant::ShortRange => SHORT_RANGE_DASHBOARD_ID,
        }
    }
}

/// Both call sites rely on this exact tie-break: a well-formed absolute
/// window forces the long-range dashboard even when the day count is small.
pub fn select_variant(interval_in_days: u32, interval_in_dates: &str) -> DashboardVariant {
    if interval::parse_absolute(interval_in_dates).is_some()
        || interval_in_days > SHORT_RANGE_MAX_DAYS
    {
        DashboardVariant::LongRange
    } else {
        DashboardVariant::ShortRange
    }
}

/// Embeddable dashboard address. Untrusted markup: render it only as an
/// iframe `src`, never in a script context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedUrl(String);

impl EmbedUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmbedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn embed_url(
    base_url: &str,
    key_ticker: &str,
    interval_in_days: u32,
    interval_in_dates: &str,
) -> EmbedUrl {
    let symbol = urlenc::encode_component(key_ticker);
    let dashboard_id = select_variant(interval_in_days, interval_in_dates).dashboard_id();

    let time_range = match interval::parse_absolute(interval_in_dates) {
        Some((from, to)) => format!("time:(from:'{from}',to:'{to}')"),
        None => format!("time:(from:now-{interval_in_days}d,to:now)"),
    };

    let global_state =
        format!("(refreshInterval:(pause:!t,value:{REFRESH_INTERVAL_MS}),{time_range})");
    let app_state = format!("(query:(language:kuery,query:'key_ticker:{symbol}'))");

    let mut params = form_urlencoded::Serializer::new(String::new());
    params
        .append_pair("embed", "true")
        .append_pair("show-time-filter", "false")
        .append_pair("hide-filter-bar", "true")
        .append_pair("_g", &global_state)
        .append_pair("_a", &app_state);
    let params = params.finish();

    EmbedUrl(format!(
        "{}?auth_provider_hint=anonymous1#/view/{dashboard_id}?{params}",
        base_url.trim_end_matches('/')
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn embed_params(url: &EmbedUrl) -> HashMap<String, String> {
        let query = url.as_str().split('?').nth(2).expect("embed params present");
        form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    }

    #[test]
    fn relative_windows_over_thirty_days_use_long_range() {
        assert_eq!(select_variant(31, ""), DashboardVariant::LongRange);
        assert_eq!(select_variant(90, ""), DashboardVariant::LongRange);
        assert_eq!(select_variant(365, ""), DashboardVariant::LongRange);
    }

    #[test]
    fn short_relative_windows_use_short_range() {
        assert_eq!(select_variant(1, ""), DashboardVariant::ShortRange);
        assert_eq!(select_variant(30, ""), DashboardVariant::ShortRange);
    }

    #[test]
    fn absolute_window_forces_long_range_regardless_of_days() {
        assert_eq!(
            select_variant(7, "2024-01-01_2024-02-01"),
            DashboardVariant::LongRange
        );
    }

    #[test]
    fn malformed_absolute_window_falls_back_to_day_rule() {
        assert_eq!(select_variant(7, "garbage"), DashboardVariant::ShortRange);
        assert_eq!(select_variant(40, "garbage"), DashboardVariant::LongRange);
    }

    #[test]
    fn relative_ninety_day_url_for_nvda() {
        let url = embed_url(DEFAULT_DASHBOARDS_BASE_URL, "NVDA", 90, "");

        let prefix = format!(
            "{DEFAULT_DASHBOARDS_BASE_URL}?auth_provider_hint=anonymous1#/view/{LONG_RANGE_DASHBOARD_ID}?"
        );
        assert!(url.as_str().starts_with(&prefix), "got {url}");

        let params = embed_params(&url);
        assert_eq!(params["embed"], "true");
        assert_eq!(params["show-time-filter"], "false");
        assert_eq!(params["hide-filter-bar"], "true");
        assert_eq!(
            params["_g"],
            "(refreshInterval:(pause:!t,value:60000),time:(from:now-90d,to:now))"
        );
        assert_eq!(params["_a"], "(query:(language:kuery,query:'key_ticker:NVDA'))");
    }

    #[test]
    fn absolute_window_url_uses_literal_dates() {
        let url = embed_url(
            DEFAULT_DASHBOARDS_BASE_URL,
            "NVDA",
            7,
            "2024-01-01_2024-02-01",
        );

        assert!(url.as_str().contains(LONG_RANGE_DASHBOARD_ID));
        let params = embed_params(&url);
        assert_eq!(
            params["_g"],
            "(refreshInterval:(pause:!t,value:60000),time:(from:'2024-01-01',to:'2024-02-01'))"
        );
    }

    #[test]
    fn short_window_url_uses_short_range_dashboard() {
        let url = embed_url(DEFAULT_DASHBOARDS_BASE_URL, "GOOG", 7, "");
        assert!(url.as_str().contains(SHORT_RANGE_DASHBOARD_ID));
    }

    #[test]
    fn ticker_is_escaped_inside_the_filter_clause() {
        let url = embed_url(DEFAULT_DASHBOARDS_BASE_URL, "BRK/B", 90, "");
        let params = embed_params(&url);
        assert_eq!(
            params["_a"],
            "(query:(language:kuery,query:'key_ticker:BRK%2FB'))"
        );
    }
}
