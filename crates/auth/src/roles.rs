use core::str::FromStr;

use serde::{Deserialize, Serialize};

use itdesk_core::DomainError;

/// Permission tier of a signed-in user.
///
/// Closed set. There is no hierarchy: `Admin` does not implicitly inherit what
/// the other roles can do, every check lists each role it grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    ItSupport,
    SecurityOfficer,
    Admin,
}

/// Which role-specific counter set the dashboard shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsKind {
    Dashboard,
    Staff,
    Admin,
}

impl StatsKind {
    /// Backend path (relative to the API base) serving these counters.
    pub fn path(&self) -> &'static str {
        match self {
            StatsKind::Dashboard => "/dashboard/stats",
            StatsKind::Staff => "/staff/stats",
            StatsKind::Admin => "/admin/stats",
        }
    }
}

impl Role {
    pub const ALL: [Role; 4] = [Role::User, Role::ItSupport, Role::SecurityOfficer, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::ItSupport => "it_support",
            Role::SecurityOfficer => "security_officer",
            Role::Admin => "admin",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::ItSupport => "IT Support",
            Role::SecurityOfficer => "Security Officer",
            Role::Admin => "Administrator",
        }
    }

    pub fn stats_kind(&self) -> StatsKind {
        match self {
            Role::User => StatsKind::Dashboard,
            Role::ItSupport | Role::SecurityOfficer => StatsKind::Staff,
            Role::Admin => StatsKind::Admin,
        }
    }

    /// Set membership check: is this role one of `allowed`?
    pub fn is_in(&self, allowed: &[Role]) -> bool {
        allowed.contains(self)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "it_support" => Ok(Role::ItSupport),
            "security_officer" => Ok(Role::SecurityOfficer),
            "admin" => Ok(Role::Admin),
            other => Err(DomainError::UnknownRole(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip_through_from_str() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
    }

    #[test]
    fn labels_are_distinct_and_human_readable() {
        assert_eq!(Role::ItSupport.label(), "IT Support");
        let mut labels: Vec<&str> = Role::ALL.iter().map(|r| r.label()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), Role::ALL.len());
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!("superuser".parse::<Role>().is_err());
        assert!(serde_json::from_str::<Role>("\"Admin\"").is_err());
    }

    #[test]
    fn stats_endpoint_per_role() {
        assert_eq!(Role::User.stats_kind().path(), "/dashboard/stats");
        assert_eq!(Role::ItSupport.stats_kind().path(), "/staff/stats");
        assert_eq!(Role::SecurityOfficer.stats_kind().path(), "/staff/stats");
        assert_eq!(Role::Admin.stats_kind().path(), "/admin/stats");
    }
}
