//! Closed role enumeration.
//!
//! Roles arrive from the identity provider as strings. They are parsed into
//! [`Role`] once, at the boundary, and everything downstream works with the
//! enum.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A role held by a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SystemAdmin,
    InstitutionalAdmin,
    ProgramOfficer,
    AreaChair,
    Reviewer,
    Investigator,
}

/// Roles that grant the administrative permission tier.
pub const ADMIN_ROLES: [Role; 4] = [
    Role::SystemAdmin,
    Role::InstitutionalAdmin,
    Role::ProgramOfficer,
    Role::AreaChair,
];

impl Role {
    /// Returns the wire name of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SystemAdmin => "SYSTEM_ADMIN",
            Role::InstitutionalAdmin => "INSTITUTIONAL_ADMIN",
            Role::ProgramOfficer => "PROGRAM_OFFICER",
            Role::AreaChair => "AREA_CHAIR",
            Role::Reviewer => "REVIEWER",
            Role::Investigator => "INVESTIGATOR",
        }
    }

    /// Returns true if this role grants the administrative tier.
    pub fn is_admin(&self) -> bool {
        ADMIN_ROLES.contains(self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a role string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0}")]
pub struct RoleError(pub String);

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SYSTEM_ADMIN" => Ok(Role::SystemAdmin),
            "INSTITUTIONAL_ADMIN" => Ok(Role::InstitutionalAdmin),
            "PROGRAM_OFFICER" => Ok(Role::ProgramOfficer),
            "AREA_CHAIR" => Ok(Role::AreaChair),
            "REVIEWER" => Ok(Role::Reviewer),
            "INVESTIGATOR" => Ok(Role::Investigator),
            _ => Err(RoleError(s.to_string())),
        }
    }
}

/// The set of roles held by one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(BTreeSet<Role>);

impl RoleSet {
    /// Creates an empty role set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses role strings, failing on the first unrecognised one.
    pub fn parse<I, S>(roles: I) -> Result<Self, RoleError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        roles
            .into_iter()
            .map(|r| r.as_ref().parse::<Role>())
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Self)
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    /// Returns true if any held role grants the administrative tier.
    pub fn is_admin(&self) -> bool {
        self.0.iter().any(Role::is_admin)
    }

    /// Returns true if the holder may submit reviews.
    pub fn can_review(&self) -> bool {
        self.contains(Role::Reviewer) || self.contains(Role::AreaChair)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.0.iter()
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<T: IntoIterator<Item = Role>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_roles() {
        let roles = RoleSet::parse(["REVIEWER", "program_officer"]).unwrap();
        assert!(roles.contains(Role::Reviewer));
        assert!(roles.contains(Role::ProgramOfficer));
        assert!(roles.is_admin());
    }

    #[test]
    fn test_parse_rejects_unknown_role() {
        let err = RoleSet::parse(["REVIEWER", "SUPERUSER"]).unwrap_err();
        assert_eq!(err, RoleError("SUPERUSER".to_string()));
    }

    #[test]
    fn test_area_chair_is_admin_and_reviewer() {
        let roles: RoleSet = [Role::AreaChair].into_iter().collect();
        assert!(roles.is_admin());
        assert!(roles.can_review());
    }

    #[test]
    fn test_investigator_has_no_privileges() {
        let roles: RoleSet = [Role::Investigator].into_iter().collect();
        assert!(!roles.is_admin());
        assert!(!roles.can_review());
    }

    #[test]
    fn test_role_set_serializes_as_list() {
        let roles: RoleSet = [Role::Reviewer, Role::SystemAdmin].into_iter().collect();
        let json = serde_json::to_string(&roles).unwrap();
        assert_eq!(json, r#"["SYSTEM_ADMIN","REVIEWER"]"#);
    }
}
