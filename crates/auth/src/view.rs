use serde::{Deserialize, Serialize};

use crate::Role;

/// Navigable views of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Login,
    Dashboard,
    Tickets,
    NewTicket,
    Notifications,
    Incidents,
    Security,
    StaffDashboard,
    AdminDashboard,
}

impl View {
    /// Where an authenticated user lands, and where a role mismatch sends them.
    pub const LANDING: View = View::Dashboard;

    pub const ALL: [View; 9] = [
        View::Login,
        View::Dashboard,
        View::Tickets,
        View::NewTicket,
        View::Notifications,
        View::Incidents,
        View::Security,
        View::StaffDashboard,
        View::AdminDashboard,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            View::Login => "/login",
            View::Dashboard => "/dashboard",
            View::Tickets => "/tickets",
            View::NewTicket => "/tickets/new",
            View::Notifications => "/notifications",
            View::Incidents => "/incidents",
            View::Security => "/security",
            View::StaffDashboard => "/staff",
            View::AdminDashboard => "/admin",
        }
    }

    pub fn from_path(path: &str) -> Option<View> {
        let path = path.trim_end_matches('/');
        View::ALL.into_iter().find(|v| v.path() == path)
    }

    /// Whether the view needs a session at all.
    pub fn is_public(&self) -> bool {
        matches!(self, View::Login)
    }

    /// Roles allowed to open the view; `None` means any signed-in user.
    pub fn allowed_roles(&self) -> Option<&'static [Role]> {
        match self {
            View::Login
            | View::Dashboard
            | View::Tickets
            | View::NewTicket
            | View::Notifications => None,
            View::Incidents => Some(&[Role::ItSupport, Role::SecurityOfficer, Role::Admin]),
            View::Security => Some(&[Role::SecurityOfficer, Role::Admin]),
            View::StaffDashboard => Some(&[Role::ItSupport, Role::Admin]),
            View::AdminDashboard => Some(&[Role::Admin]),
        }
    }

    /// Views a role should see in its navigation menu.
    pub fn menu_for(role: Role) -> Vec<View> {
        View::ALL
            .into_iter()
            .filter(|v| !v.is_public())
            .filter(|v| v.allowed_roles().is_none_or(|allowed| role.is_in(allowed)))
            .collect()
    }
}

impl core::fmt::Display for View {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.path())
    }
}
