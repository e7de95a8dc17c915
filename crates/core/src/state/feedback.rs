use crate::domain::navigation::FeedbackMessage;
use crate::state::store::SharedState;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Transient feedback toast state. A pushed message reverts to the empty
/// message once its own timeout elapses; pushing again preempts the pending
/// revert of the previous message.
#[derive(Clone)]
pub struct FeedbackMessages {
    state: SharedState<FeedbackMessage>,
    epoch: Arc<AtomicU64>,
}

impl FeedbackMessages {
    pub fn new() -> Self {
        Self {
            state: SharedState::new(FeedbackMessage::empty()),
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn state(&self) -> &SharedState<FeedbackMessage> {
        &self.state
    }

    pub fn push(&self, message: FeedbackMessage) -> tokio::task::JoinHandle<()> {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let timeout = Duration::from_millis(message.timeout_ms);
        self.state.update(message);

        let state = self.state.clone();
        let latest = Arc::clone(&self.epoch);
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            // A newer message owns the revert now.
            if latest.load(Ordering::SeqCst) == epoch {
                state.update(FeedbackMessage::empty());
            }
        })
    }
}
