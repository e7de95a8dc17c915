pub mod cookie;

use crate::domain::navigation::ConsentState;
use crate::state::store::SharedState;
use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use self::cookie::CookieRecord;
use std::path::PathBuf;
use std::sync::Arc;

pub const CONSENT_COOKIE_NAME: &str = "CookieConsent";
pub const CONSENT_TTL_DAYS: i64 = 365;

/// Durable single-key storage behind the consent state.
pub trait ConsentJar: Send + Sync {
    fn load(&self, name: &str) -> Option<String>;
    fn store(&self, record: CookieRecord) -> Result<()>;
}

/// Keeps the one consent cookie as a browser-style cookie line in a file.
pub struct FileConsentJar {
    path: PathBuf,
}

impl FileConsentJar {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ConsentJar for FileConsentJar {
    fn load(&self, name: &str) -> Option<String> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        let record = cookie::parse_set_cookie(raw.trim())?;
        if record.name != name || record.expires <= Utc::now() {
            return None;
        }
        Some(record.value)
    }

    fn store(&self, record: CookieRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(&self.path, cookie::format_set_cookie(&record))
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}

/// Consent state with durable initialization. A granted consent is persisted
/// for about a year; a decline only replaces the in-memory value, so a later
/// session starts from the default again.
pub struct ConsentStore {
    state: SharedState<ConsentState>,
    jar: Arc<dyn ConsentJar>,
}

impl ConsentStore {
    pub fn new(jar: Arc<dyn ConsentJar>) -> Self {
        let initial = jar
            .load(CONSENT_COOKIE_NAME)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_else(ConsentState::initial);

        Self {
            state: SharedState::new(initial),
            jar,
        }
    }

    pub fn state(&self) -> &SharedState<ConsentState> {
        &self.state
    }

    pub fn update(&self, consent: ConsentState) {
        self.state.update(consent);

        if !consent.consent_given {
            return;
        }

        // Persistence is best-effort; the in-memory state already changed.
        match serde_json::to_string(&consent) {
            Ok(value) => {
                let record = CookieRecord {
                    name: CONSENT_COOKIE_NAME.to_string(),
                    value,
                    expires: Utc::now() + Duration::days(CONSENT_TTL_DAYS),
                };
                if let Err(err) = self.jar.store(record) {
                    tracing::warn!(error = %err, "failed to persist cookie consent");
                }
            }
            Err(err) => tracing::warn!(error = %err, "failed to serialize cookie consent"),
        }
    }
}
