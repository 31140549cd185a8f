use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are keys in the role table, not stored entities. A name that
/// is not in [`Permission::KNOWN`] is never granted (except to `super_admin`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const VIEW_GROUPS: Permission = Permission(Cow::Borrowed("view_groups"));
    pub const JOIN_GROUP: Permission = Permission(Cow::Borrowed("join_group"));
    pub const CREATE_GROUP: Permission = Permission(Cow::Borrowed("create_group"));
    pub const MANAGE_FRIENDSHIPS: Permission = Permission(Cow::Borrowed("manage_friendships"));
    pub const SEND_REFERRALS: Permission = Permission(Cow::Borrowed("send_referrals"));

    pub const READ_CHURCH_DATA: Permission = Permission(Cow::Borrowed("read_church_data"));
    pub const MANAGE_CHURCH_GROUPS: Permission = Permission(Cow::Borrowed("manage_church_groups"));
    pub const MANAGE_CHURCH_USERS: Permission = Permission(Cow::Borrowed("manage_church_users"));
    pub const APPROVE_GROUPS: Permission = Permission(Cow::Borrowed("approve_groups"));

    pub const MANAGE_GROUP: Permission = Permission(Cow::Borrowed("manage_group"));
    pub const MANAGE_GROUP_MEMBERS: Permission = Permission(Cow::Borrowed("manage_group_members"));

    pub const MANAGE_ALL_CHURCHES: Permission = Permission(Cow::Borrowed("manage_all_churches"));

    pub const KNOWN: [Permission; 12] = [
        Permission::VIEW_GROUPS,
        Permission::JOIN_GROUP,
        Permission::CREATE_GROUP,
        Permission::MANAGE_FRIENDSHIPS,
        Permission::SEND_REFERRALS,
        Permission::READ_CHURCH_DATA,
        Permission::MANAGE_CHURCH_GROUPS,
        Permission::MANAGE_CHURCH_USERS,
        Permission::APPROVE_GROUPS,
        Permission::MANAGE_GROUP,
        Permission::MANAGE_GROUP_MEMBERS,
        Permission::MANAGE_ALL_CHURCHES,
    ];

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_known(&self) -> bool {
        Self::KNOWN.iter().any(|p| p == self)
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Permission {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

/// What kind of resource a permission is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Role membership alone decides.
    Global,
    /// The resource id is a church id; the actor must belong to that church.
    Church,
    /// The resource id is a group id; the actor must lead the group or
    /// administer its owning church.
    Group,
    /// Not part of the vocabulary; always denied.
    Unknown,
}
