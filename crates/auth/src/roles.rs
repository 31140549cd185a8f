use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role identifier used for RBAC.
///
/// Roles arrive from the profile system as plain strings. Names outside the
/// fixed vocabulary are kept as-is and simply grant nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const MEMBER: Role = Role(Cow::Borrowed("member"));
    pub const GROUP_LEADER: Role = Role(Cow::Borrowed("group_leader"));
    pub const CHURCH_ADMIN: Role = Role(Cow::Borrowed("church_admin"));
    pub const SUPER_ADMIN: Role = Role(Cow::Borrowed("super_admin"));

    /// The fixed role vocabulary shared with the profile system.
    pub const KNOWN: [Role; 4] = [
        Role::MEMBER,
        Role::GROUP_LEADER,
        Role::CHURCH_ADMIN,
        Role::SUPER_ADMIN,
    ];

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_known(&self) -> bool {
        Self::KNOWN.iter().any(|r| r == self)
    }

    pub fn is_super_admin(&self) -> bool {
        *self == Self::SUPER_ADMIN
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Role {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}
