use crate::domain::navigation::{FeedbackLevel, FeedbackMessage, ShareTarget};
use crate::state::feedback::FeedbackMessages;
use crate::state::store::SharedState;
use crate::urlenc;
use std::sync::atomic::{AtomicBool, Ordering};

const COPY_FEEDBACK_TIMEOUT_MS: u64 = 3_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharePlatform {
    Facebook,
    X,
    Whatsapp,
    Threads,
    Linkedin,
    Reddit,
    Email,
    Copy,
}

/// What the embedder should do with a resolved share intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareAction {
    /// Open in a new browsing context.
    OpenUrl(String),
    /// Hand over to the mail client.
    MailTo(String),
    /// Write to the system clipboard.
    CopyToClipboard(String),
}

/// Share widget state: reads the current share target, builds platform
/// intents and reports the clipboard copy through the feedback toast.
pub struct ShareMenu {
    share_target: SharedState<ShareTarget>,
    feedback: FeedbackMessages,
    menu_open: AtomicBool,
}

impl ShareMenu {
    pub fn new(share_target: SharedState<ShareTarget>, feedback: FeedbackMessages) -> Self {
        Self {
            share_target,
            feedback,
            menu_open: AtomicBool::new(false),
        }
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open.load(Ordering::SeqCst)
    }

    pub fn toggle_menu(&self) {
        self.menu_open.fetch_xor(true, Ordering::SeqCst);
    }

    pub fn close_menu(&self) {
        self.menu_open.store(false, Ordering::SeqCst);
    }

    /// `None` while no share target is active: the action degrades to a
    /// no-op instead of producing a broken link.
    pub fn share(&self, platform: SharePlatform) -> Option<ShareAction> {
        self.close_menu();

        let target = self.share_target.read();
        if target.is_empty() {
            return None;
        }

        let url = urlenc::encode_component(&target.url);
        let text = urlenc::encode_component(&target.title);

        let action = match platform {
            SharePlatform::Facebook => {
                ShareAction::OpenUrl(format!("https://www.facebook.com/sharer.php?u={url}"))
            }
            SharePlatform::X => ShareAction::OpenUrl(format!(
                "https://twitter.com/intent/tweet?url={url}&text={text}"
            )),
            SharePlatform::Whatsapp => ShareAction::OpenUrl(format!(
                "https://api.whatsapp.com/send?text={text}%20{url}"
            )),
            SharePlatform::Threads => ShareAction::OpenUrl(format!(
                "https://www.threads.net/intent/post?text={text}&url={url}"
            )),
            SharePlatform::Linkedin => ShareAction::OpenUrl(format!(
                "https://www.linkedin.com/shareArticle?url={url}&title={text}"
            )),
            SharePlatform::Reddit => ShareAction::OpenUrl(format!(
                "https://reddit.com/submit?url={url}&title={text}"
            )),
            SharePlatform::Email => {
                ShareAction::MailTo(format!("mailto:?subject=Quaks&body={text}%20{url}"))
            }
            SharePlatform::Copy => {
                self.feedback.push(FeedbackMessage {
                    message: "Link copied".to_string(),
                    level: FeedbackLevel::Info,
                    timeout_ms: COPY_FEEDBACK_TIMEOUT_MS,
                });
                ShareAction::CopyToClipboard(target.url)
            }
        };

        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu_with_target() -> ShareMenu {
        let share_target = SharedState::new(ShareTarget {
            url: "https://quaks.example/markets/stocks-eod-dashboard/NVDA?interval=2024-01-01_2024-02-01"
                .to_string(),
            title: "Stock Analysis NVDA".to_string(),
        });
        ShareMenu::new(share_target, FeedbackMessages::new())
    }

    #[test]
    fn empty_target_yields_no_action_for_any_platform() {
        let menu = ShareMenu::new(
            SharedState::new(ShareTarget::empty()),
            FeedbackMessages::new(),
        );

        for platform in [
            SharePlatform::Facebook,
            SharePlatform::X,
            SharePlatform::Whatsapp,
            SharePlatform::Threads,
            SharePlatform::Linkedin,
            SharePlatform::Reddit,
            SharePlatform::Email,
            SharePlatform::Copy,
        ] {
            assert_eq!(menu.share(platform), None);
        }
    }

    #[test]
    fn builds_platform_intents_with_escaped_url_and_title() {
        let menu = menu_with_target();

        let encoded_url = "https%3A%2F%2Fquaks.example%2Fmarkets%2Fstocks-eod-dashboard%2FNVDA%3Finterval%3D2024-01-01_2024-02-01";

        assert_eq!(
            menu.share(SharePlatform::Facebook),
            Some(ShareAction::OpenUrl(format!(
                "https://www.facebook.com/sharer.php?u={encoded_url}"
            )))
        );
        assert_eq!(
            menu.share(SharePlatform::X),
            Some(ShareAction::OpenUrl(format!(
                "https://twitter.com/intent/tweet?url={encoded_url}&text=Stock%20Analysis%20NVDA"
            )))
        );
        assert_eq!(
            menu.share(SharePlatform::Email),
            Some(ShareAction::MailTo(format!(
                "mailto:?subject=Quaks&body=Stock%20Analysis%20NVDA%20{encoded_url}"
            )))
        );
    }

    #[tokio::test]
    async fn copy_returns_the_raw_url_and_flashes_feedback() {
        let menu = menu_with_target();

        let action = menu.share(SharePlatform::Copy);
        assert_eq!(
            action,
            Some(ShareAction::CopyToClipboard(
                "https://quaks.example/markets/stocks-eod-dashboard/NVDA?interval=2024-01-01_2024-02-01"
                    .to_string()
            ))
        );

        let flash = menu.feedback.state().read();
        assert_eq!(flash.message, "Link copied");
        assert_eq!(flash.level, FeedbackLevel::Info);
        assert_eq!(flash.timeout_ms, 3_000);
    }

    #[test]
    fn sharing_closes_the_menu() {
        let menu = menu_with_target();
        menu.toggle_menu();
        assert!(menu.is_menu_open());

        menu.share(SharePlatform::Reddit);
        assert!(!menu.is_menu_open());
    }
}
