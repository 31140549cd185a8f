//! Privileged actions with an authorization re-check right before the
//! mutation.
//!
//! A render-time check is not enough: permissions may be revoked between
//! rendering a button and pressing it. Every action here re-evaluates its
//! check and only then calls the mutating service.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use fellowship_core::{DomainError, GroupId, UserId};

use crate::check::reasons;
use crate::{ActionError, GroupDirectory, LookupError, Permission, PermissionCheck, PermissionService};

/// Either form of a check result. Lookup failures count as denials.
pub trait IntoCheck {
    fn into_check(self) -> PermissionCheck;
}

impl IntoCheck for PermissionCheck {
    fn into_check(self) -> PermissionCheck {
        self
    }
}

impl IntoCheck for Result<PermissionCheck, LookupError> {
    fn into_check(self) -> PermissionCheck {
        PermissionCheck::from_lookup(self)
    }
}

/// Run `check`, then `mutation` only if it granted.
pub async fn guarded<C, M, MFut, T>(check: C, mutation: M) -> Result<T, ActionError>
where
    C: Future,
    C::Output: IntoCheck,
    M: FnOnce() -> MFut,
    MFut: Future<Output = anyhow::Result<T>>,
{
    let check = check.await.into_check();
    if !check.granted {
        let reason = check.reason_or_default().to_string();
        tracing::info!(%reason, "privileged action blocked");
        return Err(ActionError::Denied { reason });
    }
    mutation().await.map_err(ActionError::Mutation)
}

/// Downstream service performing group mutations (backend RPCs).
#[async_trait]
pub trait MembershipMutations: Send + Sync {
    async fn promote(&self, group_id: &GroupId, user_id: &UserId) -> anyhow::Result<()>;
    async fn demote(&self, group_id: &GroupId, user_id: &UserId) -> anyhow::Result<()>;
    async fn remove(&self, group_id: &GroupId, user_id: &UserId) -> anyhow::Result<()>;
    async fn approve_group(&self, group_id: &GroupId) -> anyhow::Result<()>;
}

pub const LAST_LEADER: &str = "A group must keep at least one leader.";

/// Group-leader and admin actions on groups.
#[derive(Clone)]
pub struct MembershipActions {
    service: PermissionService,
    directory: Arc<dyn GroupDirectory>,
    mutations: Arc<dyn MembershipMutations>,
}

impl MembershipActions {
    pub fn new(
        service: PermissionService,
        directory: impl GroupDirectory + 'static,
        mutations: impl MembershipMutations + 'static,
    ) -> Self {
        Self {
            service,
            directory: Arc::new(directory),
            mutations: Arc::new(mutations),
        }
    }

    pub async fn promote(&self, group_id: &GroupId, user_id: &UserId) -> Result<(), ActionError> {
        self.ensure_can_manage_membership(group_id).await?;
        self.mutations.promote(group_id, user_id).await.map_err(ActionError::Mutation)
    }

    pub async fn demote(&self, group_id: &GroupId, user_id: &UserId) -> Result<(), ActionError> {
        self.ensure_can_manage_membership(group_id).await?;
        self.ensure_not_last_leader(group_id, user_id).await?;
        self.mutations.demote(group_id, user_id).await.map_err(ActionError::Mutation)
    }

    pub async fn remove(&self, group_id: &GroupId, user_id: &UserId) -> Result<(), ActionError> {
        self.ensure_can_manage_membership(group_id).await?;
        self.ensure_not_last_leader(group_id, user_id).await?;
        self.mutations.remove(group_id, user_id).await.map_err(ActionError::Mutation)
    }

    /// Approve a pending group; requires `approve_groups` in the group's church.
    pub async fn approve_group(&self, group_id: &GroupId) -> Result<(), ActionError> {
        let group = self
            .directory
            .group(group_id)
            .await?
            .ok_or_else(|| DomainError::not_found(reasons::GROUP_NOT_FOUND))?;
        let Some(church_id) = group.church_id else {
            return Err(ActionError::Denied {
                reason: reasons::other_church(),
            });
        };

        let service = &self.service;
        guarded(
            service.has_permission(&Permission::APPROVE_GROUPS, Some(church_id.as_str())),
            || self.mutations.approve_group(group_id),
        )
        .await
    }

    async fn ensure_can_manage_membership(&self, group_id: &GroupId) -> Result<(), ActionError> {
        let check = match self.service.current_actor().await {
            Ok(Some(actor)) => {
                self.service
                    .can_manage_group_membership(group_id, &actor.id)
                    .await
            }
            Ok(None) => PermissionCheck::denied(reasons::NOT_SIGNED_IN),
            Err(err) => Err::<PermissionCheck, _>(err).into_check(),
        };
        guarded(async { check }, || async { Ok(()) }).await
    }

    /// Business rule independent of authorization: never strip a group of
    /// its last leader.
    async fn ensure_not_last_leader(&self, group_id: &GroupId, user_id: &UserId) -> Result<(), ActionError> {
        let target_manages = self
            .directory
            .membership_role(group_id, user_id)
            .await?
            .is_some_and(|role| role.can_manage());
        if target_manages && self.directory.leader_count(group_id).await? <= 1 {
            return Err(DomainError::invariant(LAST_LEADER).into());
        }
        Ok(())
    }
}
