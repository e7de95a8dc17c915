use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quaks_core::autocomplete::StockAutocomplete;
use quaks_core::config::Settings;
use quaks_core::consent::{ConsentStore, FileConsentJar};
use quaks_core::dashboard::page::{stock_dashboard_path, RouteParams, StockDashboardPage};
use quaks_core::domain::markets::IndexedKeyTicker;
use quaks_core::domain::navigation::{ConsentKind, ConsentState, ShareTarget};
use quaks_core::markets::directory::TickerDirectoryClient;
use quaks_core::markets::stats::{HttpStatsCloseClient, StatsClosePipeline};
use quaks_core::share::{ShareMenu, SharePlatform};
use quaks_core::state::feedback::FeedbackMessages;
use quaks_core::state::store::SharedState;

const DEFAULT_CONSENT_PATH: &str = ".quaks/consent.cookie";

#[derive(Debug, Parser)]
#[command(name = "quaks_app")]
struct Args {
    /// Ticker route parameter (path segment).
    #[arg(long)]
    key_ticker: String,

    /// Absolute interval query parameter (YYYY-MM-DD_YYYY-MM-DD).
    #[arg(long)]
    interval: Option<String>,

    /// Relative interval in days.
    #[arg(long, default_value_t = quaks_core::dashboard::interval::DEFAULT_INTERVAL_IN_DAYS)]
    days: u32,

    /// Print autocomplete suggestions for this query.
    #[arg(long)]
    search: Option<String>,

    /// Resolve a share action for this platform
    /// (facebook, x, whatsapp, threads, linkedin, reddit, email, copy).
    #[arg(long)]
    share: Option<String>,

    /// Record cookie consent before rendering (all, essential_only).
    #[arg(long)]
    consent: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    // One store per cross-cutting fact, constructed here and handed to
    // whoever needs it. Each has a single writer: the page owns the share
    // target, the share menu owns the feedback toast.
    let share_target = SharedState::new(ShareTarget::empty());
    let feedback = FeedbackMessages::new();
    let consent = ConsentStore::new(Arc::new(FileConsentJar::new(consent_path(&settings))));

    tracing::info!(consent = ?consent.state().read(), "cookie consent loaded");
    if let Some(kind) = args.consent.as_deref() {
        record_consent(&consent, kind);
    }

    let _share_log = share_target.subscribe(|target: &ShareTarget| {
        tracing::info!(url = %target.url, title = %target.title, "share target changed");
    });
    let _feedback_log = feedback.state().subscribe(|flash| {
        if !flash.message.is_empty() {
            tracing::info!(message = %flash.message, "feedback");
        }
    });

    let stocks = load_directory(&settings).await;

    if let Some(query) = args.search.as_deref() {
        let mut autocomplete = StockAutocomplete::new(stocks.clone(), settings.stats_index_prefix());
        autocomplete.on_search(query);
        let hits = autocomplete.suggestions();
        for hit in &hits {
            tracing::info!(ticker = %hit.key_ticker, name = %hit.name, "suggestion");
        }
        if let Some(first) = hits.into_iter().next() {
            let picked = autocomplete.select(first);
            // The filter only emits the pick; navigability is decided here.
            if picked.in_stats_namespace(settings.stats_index_prefix()) {
                tracing::info!(
                    path = %stock_dashboard_path(&picked.key_ticker),
                    "navigation intent"
                );
            }
        }
    }

    let mut page = StockDashboardPage::new(settings.dashboards_base_url(), share_target.clone());
    let current_href = page_href(&settings, &args);
    page.on_route_change(
        RouteParams {
            key_ticker: args.key_ticker.clone(),
            interval: args.interval.clone(),
        },
        &current_href,
    );
    if args.days != quaks_core::dashboard::interval::DEFAULT_INTERVAL_IN_DAYS {
        page.set_interval_in_days(args.days, &current_href);
    }

    tracing::info!(embed_url = %page.embed_url(), "dashboard embed target");

    let index_name = resolve_index_name(&stocks, &settings, page.key_ticker());
    run_stats_header(&settings, &index_name, &page).await?;

    if let Some(platform) = args.share.as_deref() {
        let menu = ShareMenu::new(share_target.clone(), feedback.clone());
        match parse_platform(platform) {
            Some(platform) => match menu.share(platform) {
                Some(action) => tracing::info!(?action, "share action resolved"),
                None => tracing::warn!("no active share target; share skipped"),
            },
            None => tracing::warn!(platform, "unknown share platform; skipped"),
        }
    }

    page.deactivate();
    Ok(())
}

async fn load_directory(settings: &Settings) -> Vec<IndexedKeyTicker> {
    match TickerDirectoryClient::from_settings(settings) {
        Ok(directory) => directory.list().await.to_vec(),
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(error = %err, "directory client unavailable; using empty directory");
            Vec::new()
        }
    }
}

/// Stats queries go against the concrete index the directory reports for the
/// ticker; an unknown ticker falls back to the namespace prefix itself.
fn resolve_index_name(
    stocks: &[IndexedKeyTicker],
    settings: &Settings,
    key_ticker: &str,
) -> String {
    stocks
        .iter()
        .find(|stock| {
            stock.key_ticker == key_ticker
                && stock.in_stats_namespace(settings.stats_index_prefix())
        })
        .map(|stock| stock.index.clone())
        .unwrap_or_else(|| settings.stats_index_prefix().to_string())
}

async fn run_stats_header(
    settings: &Settings,
    index_name: &str,
    page: &StockDashboardPage,
) -> anyhow::Result<()> {
    let client = match HttpStatsCloseClient::from_settings(settings) {
        Ok(client) => client,
        Err(err) => {
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(error = %err, "stats client unavailable; showing zero stats");
            return Ok(());
        }
    };

    let pipeline = StatsClosePipeline::new(Arc::new(client));
    pipeline
        .set_inputs(index_name, page.key_ticker(), page.interval_in_dates())
        .await
        .context("stats fetch task failed")?;

    let stats = pipeline.state().read();
    tracing::info!(
        ticker = %stats.key_ticker,
        close = stats.most_recent_close,
        open = stats.most_recent_open,
        low = stats.most_recent_low,
        high = stats.most_recent_high,
        volume = stats.most_recent_volume,
        variance = stats.percent_variance,
        date = %stats.most_recent_date,
        "stats close header"
    );
    Ok(())
}

fn record_consent(consent: &ConsentStore, kind: &str) {
    match kind {
        "all" => consent.update(ConsentState {
            consent_given: true,
            kind: ConsentKind::All,
        }),
        "essential_only" => consent.update(ConsentState {
            consent_given: true,
            kind: ConsentKind::EssentialOnly,
        }),
        other => tracing::warn!(consent = other, "unknown consent kind; ignored"),
    }
}

fn page_href(settings: &Settings, args: &Args) -> String {
    let base = settings
        .site_base_url
        .as_deref()
        .unwrap_or("")
        .trim_end_matches('/');
    let path = stock_dashboard_path(&args.key_ticker);
    match args.interval.as_deref() {
        Some(interval) if !interval.is_empty() => format!("{base}{path}?interval={interval}"),
        _ => format!("{base}{path}"),
    }
}

fn parse_platform(raw: &str) -> Option<SharePlatform> {
    match raw.to_ascii_lowercase().as_str() {
        "facebook" => Some(SharePlatform::Facebook),
        "x" => Some(SharePlatform::X),
        "whatsapp" => Some(SharePlatform::Whatsapp),
        "threads" => Some(SharePlatform::Threads),
        "linkedin" => Some(SharePlatform::Linkedin),
        "reddit" => Some(SharePlatform::Reddit),
        "email" => Some(SharePlatform::Email),
        "copy" => Some(SharePlatform::Copy),
        _ => None,
    }
}

fn consent_path(settings: &Settings) -> String {
    settings
        .consent_path
        .clone()
        .unwrap_or_else(|| DEFAULT_CONSENT_PATH.to_string())
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
