//! Host page visibility tracking.
//!
//! The embedding shell reports when the client window is shown or hidden;
//! coming back into view after being hidden is a refresh trigger.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

impl Visibility {
    /// True for the hidden -> visible edge only.
    pub fn became_visible(previous: Visibility, current: Visibility) -> bool {
        previous == Visibility::Hidden && current == Visibility::Visible
    }
}

/// What observers of a [`PageVisibility`] see.
///
/// `shown` counts hidden -> visible transitions, so an observer that wakes
/// after a quick hide/show still sees the edge even though the level is
/// unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageState {
    pub visibility: Visibility,
    pub shown: u64,
}

/// Shared visibility state, written by the host and observed by workers.
#[derive(Debug, Clone)]
pub struct PageVisibility {
    sender: watch::Sender<PageState>,
}

impl Default for PageVisibility {
    fn default() -> Self {
        Self::new()
    }
}

impl PageVisibility {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(PageState::default());
        Self { sender }
    }

    pub fn state(&self) -> Visibility {
        self.sender.borrow().visibility
    }

    pub fn is_hidden(&self) -> bool {
        self.state() == Visibility::Hidden
    }

    pub fn set(&self, visibility: Visibility) {
        self.sender.send_if_modified(|current| {
            if current.visibility == visibility {
                return false;
            }
            tracing::debug!(?visibility, "page visibility changed");
            if Visibility::became_visible(current.visibility, visibility) {
                current.shown = current.shown.wrapping_add(1);
            }
            current.visibility = visibility;
            true
        });
    }

    pub fn set_hidden(&self) {
        self.set(Visibility::Hidden);
    }

    pub fn set_visible(&self) {
        self.set(Visibility::Visible);
    }

    pub fn subscribe(&self) -> watch::Receiver<PageState> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_hidden_to_visible_counts() {
        assert!(Visibility::became_visible(Visibility::Hidden, Visibility::Visible));
        assert!(!Visibility::became_visible(Visibility::Visible, Visibility::Visible));
        assert!(!Visibility::became_visible(Visibility::Visible, Visibility::Hidden));
    }

    #[test]
    fn repeated_state_is_not_a_change() {
        let page = PageVisibility::new();
        let rx = page.subscribe();

        page.set_visible();
        assert!(!rx.has_changed().unwrap());

        page.set_hidden();
        assert!(rx.has_changed().unwrap());
        assert!(page.is_hidden());
    }

    #[test]
    fn quick_hide_and_show_still_records_the_edge() {
        let page = PageVisibility::new();
        let mut rx = page.subscribe();
        let before = rx.borrow_and_update().shown;

        page.set_hidden();
        page.set_visible();

        let seen = *rx.borrow_and_update();
        assert_eq!(seen.visibility, Visibility::Visible);
        assert_eq!(seen.shown, before + 1);

        // Hiding alone is not an edge.
        page.set_hidden();
        assert_eq!(rx.borrow_and_update().shown, before + 1);
    }
}
