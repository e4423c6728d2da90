use itdesk_core::{Notification, NotificationId};

/// Snapshot of the notification mirror handed to consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationState {
    pub notifications: Vec<Notification>,
    /// Badge value. Matches the unread items in `notifications` except
    /// between a local mutation and the next authoritative refresh.
    pub unread_count: u64,
    /// Set while a refresh that asked for a loading indicator is running.
    pub loading: bool,
}

impl NotificationState {
    pub fn new(notifications: Vec<Notification>, unread_count: u64) -> Self {
        Self {
            notifications,
            unread_count,
            loading: false,
        }
    }

    pub fn get(&self, id: &NotificationId) -> Option<&Notification> {
        self.notifications.iter().find(|n| &n.id == id)
    }

    pub fn is_unread(&self, id: &NotificationId) -> bool {
        self.get(id).is_some_and(|n| !n.is_read)
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    /// Mark one item read. Returns whether it was unread before.
    pub(crate) fn mark_read(&mut self, id: &NotificationId) -> bool {
        let Some(item) = self.notifications.iter_mut().find(|n| &n.id == id) else {
            return false;
        };
        if item.is_read {
            return false;
        }
        item.is_read = true;
        self.unread_count = self.unread_count.saturating_sub(1);
        true
    }

    pub(crate) fn mark_all_read(&mut self) {
        for item in &mut self.notifications {
            item.is_read = true;
        }
        self.unread_count = 0;
    }

    /// Drop one item; the badge moves only if the caller saw it unread.
    pub(crate) fn remove(&mut self, id: &NotificationId, was_unread: bool) {
        self.notifications.retain(|n| &n.id != id);
        if was_unread {
            self.unread_count = self.unread_count.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::testing::item;
    use proptest::prelude::*;

    #[test]
    fn mark_read_only_moves_badge_for_unread_items() {
        let mut state = NotificationState::new(vec![item("n1", false), item("n2", true)], 1);

        assert!(!state.mark_read(&"n2".into()));
        assert_eq!(state.unread_count, 1);

        assert!(state.mark_read(&"n1".into()));
        assert_eq!(state.unread_count, 0);
        assert!(!state.is_unread(&"n1".into()));

        assert!(!state.mark_read(&"missing".into()));
        assert_eq!(state.unread_count, 0);
    }

    #[test]
    fn remove_drops_the_item() {
        let mut state = NotificationState::new(vec![item("n1", false), item("n2", true)], 1);
        state.remove(&"n1".into(), true);
        assert!(state.get(&"n1".into()).is_none());
        assert_eq!(state.unread_count, 0);
        assert_eq!(state.notifications.len(), 1);
    }

    #[test]
    fn mark_all_read_zeroes_badge() {
        let mut state = NotificationState::new(vec![item("n1", false), item("n2", false)], 5);
        state.mark_all_read();
        assert_eq!(state.unread_count, 0);
        assert!(state.notifications.iter().all(|n| n.is_read));
    }

    proptest! {
        // The server count can drift from the local list; the badge never underflows.
        #[test]
        fn badge_never_underflows(
            flags in prop::collection::vec(any::<bool>(), 0..12),
            count in 0u64..4,
            ops in prop::collection::vec((0usize..12, any::<bool>()), 0..24),
        ) {
            let items = flags
                .iter()
                .enumerate()
                .map(|(i, read)| item(&format!("n{i}"), *read))
                .collect();
            let mut state = NotificationState::new(items, count);

            for (idx, delete) in ops {
                let id = NotificationId::from(format!("n{idx}"));
                let before = state.unread_count;
                if delete {
                    let was_unread = state.is_unread(&id);
                    state.remove(&id, was_unread);
                    prop_assert!(state.get(&id).is_none());
                } else {
                    let was_unread = state.mark_read(&id);
                    let expected = if was_unread { before.saturating_sub(1) } else { before };
                    prop_assert_eq!(state.unread_count, expected);
                }
                prop_assert!(state.unread_count <= before);
            }
        }
    }
}
