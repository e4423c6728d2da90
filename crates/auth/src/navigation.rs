use std::sync::Mutex;

use crate::View;

/// Moves the client to another view.
pub trait Navigator: Send + Sync {
    fn navigate(&self, to: View);
}

/// Navigator that keeps the visited views in memory.
#[derive(Debug, Default)]
pub struct HistoryNavigator {
    history: Mutex<Vec<View>>,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(view: View) -> Self {
        Self {
            history: Mutex::new(vec![view]),
        }
    }

    pub fn current(&self) -> Option<View> {
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .copied()
    }

    pub fn history(&self) -> Vec<View> {
        self.history.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, to: View) {
        let mut history = self.history.lock().unwrap_or_else(|e| e.into_inner());
        if history.last() != Some(&to) {
            tracing::debug!(path = to.path(), "navigating");
            history.push(to);
        }
    }
}
