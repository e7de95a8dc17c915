use serde::{Deserialize, Serialize};

/// Canonical (url, title) pair for "what the current page is, for sharing".
/// The owning page publishes it on activation and resets it on leave;
/// consumers must render nothing actionable for the empty value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareTarget {
    pub url: String,
    pub title: String,
}

impl ShareTarget {
    pub fn empty() -> Self {
        Self {
            url: String::new(),
            title: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.url.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackLevel {
    Success,
    Info,
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackMessage {
    pub message: String,
    #[serde(rename = "type")]
    pub level: FeedbackLevel,
    #[serde(rename = "timeout")]
    pub timeout_ms: u64,
}

impl FeedbackMessage {
    pub fn empty() -> Self {
        Self {
            message: String::new(),
            level: FeedbackLevel::Info,
            timeout_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsentKind {
    All,
    EssentialOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentState {
    #[serde(rename = "consentGiven")]
    pub consent_given: bool,
    #[serde(rename = "type")]
    pub kind: ConsentKind,
}

impl ConsentState {
    /// State before any persisted value exists.
    pub fn initial() -> Self {
        Self {
            consent_given: false,
            kind: ConsentKind::EssentialOnly,
        }
    }
}
