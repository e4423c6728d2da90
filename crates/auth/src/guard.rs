//! View-level authorization guard.
//!
//! `Loading -> Authorized | Redirecting`:
//! - no session: redirect to [`View::Login`]
//! - session whose role is outside the view's allowed set: redirect to
//!   [`View::LANDING`] (never to login, the user *is* signed in)
//! - otherwise: authorized
//!
//! The decision is taken once per mount. A credential revoked mid-visit is
//! caught by the request layer on the next 401.

use crate::{Navigator, Role, Session, SessionStore, View};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    Loading,
    Authorized(Session),
    Redirecting(View),
}

impl GuardState {
    pub fn is_authorized(&self) -> bool {
        matches!(self, GuardState::Authorized(_))
    }

    pub fn redirect_target(&self) -> Option<View> {
        match self {
            GuardState::Redirecting(view) => Some(*view),
            _ => None,
        }
    }
}

/// Pure access decision (no IO, no navigation).
pub fn check_access(session: Option<Session>, allowed: Option<&[Role]>) -> GuardState {
    let Some(session) = session else {
        return GuardState::Redirecting(View::Login);
    };

    match allowed {
        Some(allowed) if !session.role().is_in(allowed) => GuardState::Redirecting(View::LANDING),
        _ => GuardState::Authorized(session),
    }
}

/// Guard for one mounted view.
#[derive(Debug, Clone)]
pub struct ViewGuard {
    allowed: Option<Vec<Role>>,
    state: GuardState,
}

impl ViewGuard {
    /// Guard with an explicit allowed-role set (`None`: any session).
    pub fn new(allowed: Option<&[Role]>) -> Self {
        Self {
            allowed: allowed.map(<[Role]>::to_vec),
            state: GuardState::Loading,
        }
    }

    pub fn for_view(view: View) -> Self {
        Self::new(view.allowed_roles())
    }

    pub fn state(&self) -> &GuardState {
        &self.state
    }

    /// Session the guarded content may render with.
    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            GuardState::Authorized(session) => Some(session),
            _ => None,
        }
    }

    /// Run the check and perform the redirect, if any.
    ///
    /// Only the first call does work; later calls return the settled state.
    pub fn mount(&mut self, sessions: &SessionStore, navigator: &dyn Navigator) -> &GuardState {
        if self.state != GuardState::Loading {
            return &self.state;
        }

        self.state = check_access(sessions.get(), self.allowed.as_deref());

        match &self.state {
            GuardState::Redirecting(to) => {
                tracing::info!(to = to.path(), "guard redirecting");
                navigator.navigate(*to);
            }
            GuardState::Authorized(session) => {
                tracing::debug!(role = %session.role(), "guard authorized");
            }
            GuardState::Loading => {}
        }

        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HistoryNavigator, SessionUser};
    use itdesk_core::UserId;
    use proptest::prelude::*;

    fn session(role: Role) -> Session {
        Session::new(
            "t1",
            SessionUser {
                id: UserId::new(7),
                email: "u@example.com".to_string(),
                name: "U".to_string(),
                role,
            },
        )
    }

    fn any_role() -> impl Strategy<Value = Role> {
        prop::sample::select(Role::ALL.to_vec())
    }

    fn any_role_set() -> impl Strategy<Value = Vec<Role>> {
        prop::sample::subsequence(Role::ALL.to_vec(), 0..=Role::ALL.len())
    }

    proptest! {
        #[test]
        fn outsiders_land_on_dashboard_not_login(role in any_role(), allowed in any_role_set()) {
            let state = check_access(Some(session(role)), Some(&allowed));
            if allowed.contains(&role) {
                prop_assert!(state.is_authorized());
            } else {
                prop_assert_eq!(state, GuardState::Redirecting(View::Dashboard));
            }
        }

        #[test]
        fn unrestricted_views_accept_every_session(role in any_role()) {
            prop_assert!(check_access(Some(session(role)), None).is_authorized());
        }

        #[test]
        fn no_session_always_goes_to_login(allowed in proptest::option::of(any_role_set())) {
            prop_assert_eq!(
                check_access(None, allowed.as_deref()),
                GuardState::Redirecting(View::Login)
            );
        }
    }

    #[test]
    fn plain_user_on_staff_view_is_sent_to_dashboard() {
        let sessions = SessionStore::in_memory();
        let s = session(Role::User);
        sessions.set(&s.token, &s.user).unwrap();
        let nav = HistoryNavigator::new();

        let mut guard = ViewGuard::new(Some(&[Role::ItSupport, Role::Admin]));
        assert_eq!(guard.state(), &GuardState::Loading);

        let state = guard.mount(&sessions, &nav).clone();
        assert_eq!(state, GuardState::Redirecting(View::Dashboard));
        assert_eq!(nav.current(), Some(View::Dashboard));
        assert!(guard.session().is_none());
    }

    #[test]
    fn missing_session_redirects_to_login() {
        let sessions = SessionStore::in_memory();
        let nav = HistoryNavigator::new();

        let mut guard = ViewGuard::for_view(View::Tickets);
        assert_eq!(guard.mount(&sessions, &nav).redirect_target(), Some(View::Login));
        assert_eq!(nav.history(), vec![View::Login]);
    }

    #[test]
    fn check_runs_once_per_mount() {
        let sessions = SessionStore::in_memory();
        let s = session(Role::Admin);
        sessions.set(&s.token, &s.user).unwrap();
        let nav = HistoryNavigator::new();

        let mut guard = ViewGuard::for_view(View::AdminDashboard);
        assert!(guard.mount(&sessions, &nav).is_authorized());

        // Session goes away mid-visit; the mounted guard does not re-check.
        sessions.clear().unwrap();
        assert!(guard.mount(&sessions, &nav).is_authorized());
        assert_eq!(guard.session().map(|s| s.role()), Some(Role::Admin));
        assert!(nav.history().is_empty());

        // A fresh mount does.
        let mut remount = ViewGuard::for_view(View::AdminDashboard);
        assert_eq!(remount.mount(&sessions, &nav).redirect_target(), Some(View::Login));
    }
}
