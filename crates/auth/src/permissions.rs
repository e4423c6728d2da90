use serde::{Deserialize, Serialize};

use crate::Role;

/// An action gated in the UI.
///
/// Each action names the full set of roles allowed to perform it. Adding a
/// role or an action is a compile error at every match below until handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Raise a new ticket.
    CreateTicket,
    /// See tickets raised by anyone, not just one's own.
    ViewAllTickets,
    /// Assign or reassign a ticket to support staff.
    AssignTicket,
    /// Escalate a ticket into an incident.
    EscalateIncident,
    /// Work the incident queue.
    ManageIncidents,
    /// See security incidents.
    ViewSecurityIncidents,
    /// Create, edit and deactivate accounts.
    ManageUsers,
    ViewStaffStats,
    ViewAdminStats,
}

impl Action {
    pub const ALL: [Action; 9] = [
        Action::CreateTicket,
        Action::ViewAllTickets,
        Action::AssignTicket,
        Action::EscalateIncident,
        Action::ManageIncidents,
        Action::ViewSecurityIncidents,
        Action::ManageUsers,
        Action::ViewStaffStats,
        Action::ViewAdminStats,
    ];

    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Action::CreateTicket => &Role::ALL,
            Action::ViewAllTickets => &[Role::ItSupport, Role::SecurityOfficer, Role::Admin],
            Action::AssignTicket => &[Role::ItSupport, Role::Admin],
            Action::EscalateIncident => &[Role::ItSupport, Role::SecurityOfficer, Role::Admin],
            Action::ManageIncidents => &[Role::ItSupport, Role::SecurityOfficer, Role::Admin],
            Action::ViewSecurityIncidents => &[Role::SecurityOfficer, Role::Admin],
            Action::ManageUsers => &[Role::Admin],
            Action::ViewStaffStats => &[Role::ItSupport, Role::SecurityOfficer, Role::Admin],
            Action::ViewAdminStats => &[Role::Admin],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::CreateTicket => "ticket.create",
            Action::ViewAllTickets => "ticket.read_all",
            Action::AssignTicket => "ticket.assign",
            Action::EscalateIncident => "incident.escalate",
            Action::ManageIncidents => "incident.manage",
            Action::ViewSecurityIncidents => "security.read",
            Action::ManageUsers => "admin.users.write",
            Action::ViewStaffStats => "stats.staff.read",
            Action::ViewAdminStats => "stats.admin.read",
        }
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Role {
    pub fn can(&self, action: Action) -> bool {
        self.is_in(action.allowed_roles())
    }

    /// Every action this role may perform.
    pub fn actions(&self) -> Vec<Action> {
        Action::ALL.into_iter().filter(|a| self.can(*a)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_is_listed_explicitly_wherever_elevated_access_is_needed() {
        for action in Action::ALL {
            if action != Action::CreateTicket {
                assert!(
                    action.allowed_roles().contains(&Role::Admin),
                    "{action} should list admin"
                );
            }
        }
    }

    #[test]
    fn plain_users_only_raise_tickets() {
        assert_eq!(Role::User.actions(), vec![Action::CreateTicket]);
    }

    #[test]
    fn security_officers_cannot_assign_tickets() {
        assert!(!Role::SecurityOfficer.can(Action::AssignTicket));
        assert!(Role::SecurityOfficer.can(Action::ViewSecurityIncidents));
        assert!(!Role::ItSupport.can(Action::ViewSecurityIncidents));
    }
}
