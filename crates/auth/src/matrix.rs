//! Role → permission table.
//!
//! The table is plain data: each known role maps to the set of permissions it
//! grants unconditionally, and each known permission maps to the [`Scope`] it
//! is evaluated in. Lookups for unknown keys yield the empty set /
//! [`Scope::Unknown`], so callers fail closed without special cases.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::{Permission, Role, Scope};

const MEMBER_PERMISSIONS: [Permission; 5] = [
    Permission::VIEW_GROUPS,
    Permission::JOIN_GROUP,
    Permission::CREATE_GROUP,
    Permission::MANAGE_FRIENDSHIPS,
    Permission::SEND_REFERRALS,
];

const LEADER_PERMISSIONS: [Permission; 2] = [Permission::MANAGE_GROUP, Permission::MANAGE_GROUP_MEMBERS];

const CHURCH_ADMIN_PERMISSIONS: [Permission; 6] = [
    Permission::READ_CHURCH_DATA,
    Permission::MANAGE_CHURCH_GROUPS,
    Permission::MANAGE_CHURCH_USERS,
    Permission::APPROVE_GROUPS,
    Permission::MANAGE_GROUP,
    Permission::MANAGE_GROUP_MEMBERS,
];

#[derive(Debug, Clone)]
pub struct PermissionMatrix {
    grants: HashMap<Role, BTreeSet<Permission>>,
    scopes: HashMap<Permission, Scope>,
}

impl Default for PermissionMatrix {
    fn default() -> Self {
        let mut grants: HashMap<Role, BTreeSet<Permission>> = HashMap::new();

        let member: BTreeSet<Permission> = MEMBER_PERMISSIONS.into_iter().collect();

        let mut leader = member.clone();
        leader.extend(LEADER_PERMISSIONS);

        let mut church_admin = member.clone();
        church_admin.extend(CHURCH_ADMIN_PERMISSIONS);

        grants.insert(Role::MEMBER, member);
        grants.insert(Role::GROUP_LEADER, leader);
        grants.insert(Role::CHURCH_ADMIN, church_admin);
        grants.insert(Role::SUPER_ADMIN, Permission::KNOWN.into_iter().collect());

        let mut scopes = HashMap::new();
        for p in MEMBER_PERMISSIONS {
            scopes.insert(p, Scope::Global);
        }
        scopes.insert(Permission::MANAGE_ALL_CHURCHES, Scope::Global);
        for p in [
            Permission::READ_CHURCH_DATA,
            Permission::MANAGE_CHURCH_GROUPS,
            Permission::MANAGE_CHURCH_USERS,
            Permission::APPROVE_GROUPS,
        ] {
            scopes.insert(p, Scope::Church);
        }
        for p in LEADER_PERMISSIONS {
            scopes.insert(p, Scope::Group);
        }

        Self { grants, scopes }
    }
}

impl PermissionMatrix {
    /// Permissions granted unconditionally by `role` (empty for unknown roles).
    pub fn permissions_for(&self, role: &Role) -> BTreeSet<Permission> {
        self.grants.get(role).cloned().unwrap_or_default()
    }

    pub fn scope_of(&self, permission: &Permission) -> Scope {
        self.scopes.get(permission).copied().unwrap_or(Scope::Unknown)
    }

    /// Union of the grants of every role. Roles are never intersected.
    pub fn union_for<'a>(&self, roles: impl IntoIterator<Item = &'a Role>) -> BTreeSet<Permission> {
        let mut out = BTreeSet::new();
        for role in roles {
            if let Some(perms) = self.grants.get(role) {
                out.extend(perms.iter().cloned());
            }
        }
        out
    }

    /// Role-level grant: does any of `roles` carry `permission`?
    pub fn grants<'a>(&self, roles: impl IntoIterator<Item = &'a Role>, permission: &Permission) -> bool {
        roles
            .into_iter()
            .any(|role| self.grants.get(role).is_some_and(|perms| perms.contains(permission)))
    }

    /// Known roles whose grant set contains `permission`.
    pub fn roles_granting(&self, permission: &Permission) -> Vec<Role> {
        let mut roles: Vec<Role> = self
            .grants
            .iter()
            .filter(|(_, perms)| perms.contains(permission))
            .map(|(role, _)| role.clone())
            .collect();
        roles.sort();
        roles
    }
}

/// Role definition with its granted permissions (for audit/display).
#[derive(Debug, Clone, Serialize)]
pub struct RoleDefinition {
    pub name: String,
    pub permissions: Vec<String>,
    pub description: Option<String>,
}

/// Permission definition (for audit/display).
#[derive(Debug, Clone, Serialize)]
pub struct PermissionDefinition {
    pub name: String,
    pub scope: Scope,
    pub description: Option<String>,
}

/// Registry of all available roles and permissions.
#[derive(Debug, Clone, Serialize)]
pub struct RbacRegistry {
    pub roles: Vec<RoleDefinition>,
    pub permissions: Vec<PermissionDefinition>,
}

impl RbacRegistry {
    pub fn from_matrix(matrix: &PermissionMatrix) -> Self {
        let roles = Role::KNOWN
            .iter()
            .map(|role| RoleDefinition {
                name: role.to_string(),
                permissions: matrix
                    .permissions_for(role)
                    .iter()
                    .map(|p| p.to_string())
                    .collect(),
                description: role_description(role.as_str()),
            })
            .collect();

        let permissions = Permission::KNOWN
            .iter()
            .map(|p| PermissionDefinition {
                name: p.to_string(),
                scope: matrix.scope_of(p),
                description: permission_description(p.as_str()),
            })
            .collect();

        Self { roles, permissions }
    }
}

fn role_description(role: &str) -> Option<String> {
    match role {
        "member" => Some("Church member who can browse and join groups".to_string()),
        "group_leader" => Some("Leads one or more Bible-study groups".to_string()),
        "church_admin" => Some("Administers groups and users of a single church".to_string()),
        "super_admin" => Some("Platform administrator with every permission".to_string()),
        _ => None,
    }
}

fn permission_description(perm: &str) -> Option<String> {
    let text = match perm {
        "view_groups" => "Browse groups",
        "join_group" => "Request to join a group",
        "create_group" => "Submit a new group for approval",
        "manage_friendships" => "Send and answer friend requests",
        "send_referrals" => "Refer friends to a group",
        "read_church_data" => "View a church's members and groups",
        "manage_church_groups" => "Edit, archive and approve a church's groups",
        "manage_church_users" => "Manage a church's user roles",
        "approve_groups" => "Approve or reject pending groups",
        "manage_group" => "Edit a group's details",
        "manage_group_members" => "Promote, demote and remove group members",
        "manage_all_churches" => "Administer every church on the platform",
        _ => return None,
    };
    Some(text.to_string())
}
