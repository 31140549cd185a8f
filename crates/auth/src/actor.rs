use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use fellowship_core::{ChurchId, GroupId, ServiceId, UserId};

use crate::Role;

/// A user's role inside one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipRole {
    Member,
    Leader,
    Admin,
}

impl MembershipRole {
    /// Leaders and group admins may edit the group and its membership.
    pub fn can_manage(self) -> bool {
        matches!(self, MembershipRole::Leader | MembershipRole::Admin)
    }
}

impl core::fmt::Display for MembershipRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MembershipRole::Member => write!(f, "member"),
            MembershipRole::Leader => write!(f, "leader"),
            MembershipRole::Admin => write!(f, "admin"),
        }
    }
}

/// Point-in-time snapshot of the signed-in user.
///
/// Roles and memberships are assigned by the profile system; this layer only
/// reads them. `revision` changes whenever the session store replaces or
/// edits the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: UserId,
    pub church_id: Option<ChurchId>,
    pub service_id: Option<ServiceId>,
    pub roles: Vec<Role>,
    #[serde(default)]
    pub memberships: HashMap<GroupId, MembershipRole>,
    #[serde(default)]
    pub revision: u64,
}

impl Actor {
    pub fn new(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            church_id: None,
            service_id: None,
            roles: Vec::new(),
            memberships: HashMap::new(),
            revision: 0,
        }
    }

    pub fn with_church(mut self, church_id: impl Into<ChurchId>) -> Self {
        self.church_id = Some(church_id.into());
        self
    }

    pub fn with_service(mut self, service_id: impl Into<ServiceId>) -> Self {
        self.service_id = Some(service_id.into());
        self
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles = roles.into_iter().collect();
        self
    }

    pub fn with_membership(mut self, group_id: impl Into<GroupId>, role: MembershipRole) -> Self {
        self.memberships.insert(group_id.into(), role);
        self
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_super_admin(&self) -> bool {
        self.roles.iter().any(Role::is_super_admin)
    }

    pub fn membership_in(&self, group_id: &GroupId) -> Option<MembershipRole> {
        self.memberships.get(group_id).copied()
    }

    pub fn belongs_to_church(&self, church_id: &ChurchId) -> bool {
        self.church_id.as_ref() == Some(church_id)
    }
}
