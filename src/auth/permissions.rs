use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Authentication role stored on the user row and inside the session claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
    Viewer,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Editor => "editor",
            Self::Viewer => "viewer",
        }
    }

    /// Parses a stored role string. Unknown strings yield `None` so that
    /// permission checks on them fail closed instead of panicking.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "editor" => Some(Self::Editor),
            "viewer" => Some(Self::Viewer),
            _ => None,
        }
    }

    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Admin, Self::Editor, Self::Viewer]
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named permission checked independently of role identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Capability {
    ViewDashboard,
    ViewContent,
    ManageContent,
    ViewUsers,
    ManageUsers,
    ManageSettings,
    UploadFiles,
}

impl Capability {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ViewDashboard => "VIEW_DASHBOARD",
            Self::ViewContent => "VIEW_CONTENT",
            Self::ManageContent => "MANAGE_CONTENT",
            Self::ViewUsers => "VIEW_USERS",
            Self::ManageUsers => "MANAGE_USERS",
            Self::ManageSettings => "MANAGE_SETTINGS",
            Self::UploadFiles => "UPLOAD_FILES",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable role→capability grant table.
///
/// Built once at startup and handed to handlers through `AppState`; checks
/// never touch the database. Any role or capability pair not explicitly
/// granted is denied.
#[derive(Debug, Clone)]
pub struct PermissionTable {
    grants: HashMap<Role, HashSet<Capability>>,
}

impl PermissionTable {
    /// The default grants: admins hold everything, editors manage content,
    /// viewers only read.
    #[must_use]
    pub fn with_default_grants() -> Self {
        use Capability::{
            ManageContent, ManageSettings, ManageUsers, UploadFiles, ViewContent, ViewDashboard,
            ViewUsers,
        };

        let mut grants: HashMap<Role, HashSet<Capability>> = HashMap::new();
        grants.insert(
            Role::Admin,
            HashSet::from([
                ViewDashboard,
                ViewContent,
                ManageContent,
                ViewUsers,
                ManageUsers,
                ManageSettings,
                UploadFiles,
            ]),
        );
        grants.insert(
            Role::Editor,
            HashSet::from([ViewDashboard, ViewContent, ManageContent, UploadFiles]),
        );
        grants.insert(Role::Viewer, HashSet::from([ViewDashboard, ViewContent]));

        let table = Self { grants };
        debug_assert!(table.is_total(), "every role must have a grant entry");
        table
    }

    /// Pure capability check, fail-closed for roles without an entry.
    #[must_use]
    pub fn grants(&self, role: Role, capability: Capability) -> bool {
        self.grants
            .get(&role)
            .is_some_and(|caps| caps.contains(&capability))
    }

    /// Checks a role as stored on disk. Strings that do not parse to a
    /// known role are denied everything.
    #[must_use]
    pub fn grants_str(&self, role: &str, capability: Capability) -> bool {
        Role::parse(role).is_some_and(|r| self.grants(r, capability))
    }

    /// Whether every known role has an entry (possibly empty) in the table.
    #[must_use]
    pub fn is_total(&self) -> bool {
        Role::all().iter().all(|r| self.grants.contains_key(r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grants() {
        let table = PermissionTable::with_default_grants();

        assert!(table.grants(Role::Admin, Capability::ManageUsers));
        assert!(table.grants(Role::Admin, Capability::ManageSettings));
        assert!(table.grants(Role::Editor, Capability::ManageContent));
        assert!(table.grants(Role::Editor, Capability::UploadFiles));
        assert!(table.grants(Role::Viewer, Capability::ViewContent));

        assert!(!table.grants(Role::Editor, Capability::ManageUsers));
        assert!(!table.grants(Role::Editor, Capability::ManageSettings));
        assert!(!table.grants(Role::Viewer, Capability::ManageContent));
        assert!(!table.grants(Role::Viewer, Capability::ViewUsers));
    }

    #[test]
    fn test_unknown_role_fails_closed() {
        let table = PermissionTable::with_default_grants();

        for cap in [
            Capability::ViewDashboard,
            Capability::ViewContent,
            Capability::ManageContent,
            Capability::ViewUsers,
            Capability::ManageUsers,
            Capability::ManageSettings,
            Capability::UploadFiles,
        ] {
            assert!(!table.grants_str("superuser", cap));
            assert!(!table.grants_str("", cap));
            assert!(!table.grants_str("ADMIN", cap));
        }
    }

    #[test]
    fn test_table_is_total() {
        assert!(PermissionTable::with_default_grants().is_total());
    }

    #[test]
    fn test_role_parse_round_trip() {
        for role in Role::all() {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("owner"), None);
    }
}
