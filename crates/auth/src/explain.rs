//! Authorization explanation (audit trail).
//!
//! Answers "why was this check allowed or denied?" for a given actor
//! snapshot, without consulting the group directory. Group-scoped checks are
//! explained from the actor's own memberships.

use chrono::{DateTime, Utc};
use serde::Serialize;

use fellowship_core::{ChurchId, GroupId};

use crate::{Actor, Permission, PermissionMatrix, Scope};

#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    pub permission: String,
    pub resource: Option<String>,
    pub granted: bool,
    /// Human-readable reason for the decision.
    pub reason: String,
    pub actor: Option<ActorState>,
    pub denial: Option<DenialReason>,
    pub evaluated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActorState {
    pub actor_id: String,
    pub church_id: Option<String>,
    pub service_id: Option<String>,
    pub roles: Vec<String>,
    pub effective_permissions: Vec<String>,
    pub revision: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DenialReason {
    pub kind: DenialKind,
    pub message: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    SignedOut,
    UnknownPermission,
    MissingPermission,
    ScopeMismatch,
}

pub fn explain(
    actor: Option<&Actor>,
    permission: &Permission,
    resource: Option<&str>,
    matrix: &PermissionMatrix,
) -> AuthorizationExplanation {
    let base = |granted: bool, reason: String, denial: Option<DenialReason>| AuthorizationExplanation {
        permission: permission.to_string(),
        resource: resource.map(str::to_string),
        granted,
        reason,
        actor: actor.map(|a| actor_state(a, matrix)),
        denial,
        evaluated_at: Utc::now(),
    };

    let Some(actor) = actor else {
        return base(
            false,
            "No actor is signed in".to_string(),
            Some(DenialReason {
                kind: DenialKind::SignedOut,
                message: "Permission checks require a signed-in user".to_string(),
                suggestions: vec!["Sign in and retry".to_string()],
            }),
        );
    };

    if actor.is_super_admin() {
        return base(true, "Actor has the 'super_admin' role".to_string(), None);
    }

    let scope = matrix.scope_of(permission);
    if scope == Scope::Unknown {
        return base(
            false,
            format!("'{permission}' is not a known permission"),
            Some(DenialReason {
                kind: DenialKind::UnknownPermission,
                message: format!("Unknown permission: '{permission}'"),
                suggestions: vec!["Check the permission name against the role table".to_string()],
            }),
        );
    }

    if !matrix.grants(&actor.roles, permission) {
        let granting: Vec<String> = matrix
            .roles_granting(permission)
            .iter()
            .map(|r| r.to_string())
            .collect();
        return base(
            false,
            format!(
                "None of the actor's roles {:?} grants '{permission}'",
                actor.roles.iter().map(|r| r.as_str()).collect::<Vec<_>>()
            ),
            Some(DenialReason {
                kind: DenialKind::MissingPermission,
                message: format!("Missing required permission: '{permission}'"),
                suggestions: vec![format!("Assign one of the roles {granting:?}")],
            }),
        );
    }

    let mismatch = match (scope, resource) {
        (Scope::Church, Some(id)) if !actor.belongs_to_church(&ChurchId::new(id)) => Some(format!(
            "Actor belongs to church {:?}, not '{id}'",
            actor.church_id.as_ref().map(ChurchId::as_str)
        )),
        (Scope::Group, Some(id))
            if !actor
                .membership_in(&GroupId::new(id))
                .is_some_and(|role| role.can_manage()) =>
        {
            Some(format!("Actor does not lead group '{id}'"))
        }
        _ => None,
    };

    match mismatch {
        Some(message) => base(
            false,
            message.clone(),
            Some(DenialReason {
                kind: DenialKind::ScopeMismatch,
                message,
                suggestions: vec![
                    "Verify the resource id belongs to the actor's church".to_string(),
                    "Church admins of the owning church are checked against the group directory".to_string(),
                ],
            }),
        ),
        None => base(true, format!("A role of the actor grants '{permission}'"), None),
    }
}

fn actor_state(actor: &Actor, matrix: &PermissionMatrix) -> ActorState {
    ActorState {
        actor_id: actor.id.to_string(),
        church_id: actor.church_id.as_ref().map(|c| c.to_string()),
        service_id: actor.service_id.as_ref().map(|s| s.to_string()),
        roles: actor.roles.iter().map(|r| r.to_string()).collect(),
        effective_permissions: matrix.union_for(&actor.roles).iter().map(|p| p.to_string()).collect(),
        revision: actor.revision,
    }
}
