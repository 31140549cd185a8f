//! Permission evaluation.
//!
//! Every check reads a fresh actor snapshot from the [`ActorProvider`], so a
//! role change is visible to the very next call. Each check comes in two
//! forms: `try_*` propagates lookup failures, the plain form folds them into
//! a denial carrying the failure message.

use std::sync::Arc;

use fellowship_core::{ChurchId, GroupId, UserId};

use crate::check::reasons;
use crate::{
    Actor, ActorProvider, AuthConfig, CheckCache, GroupDirectory, LookupError, Permission,
    PermissionCheck, PermissionMatrix, Role, Scope,
};

#[derive(Clone)]
pub struct PermissionService {
    actors: Arc<dyn ActorProvider>,
    groups: Arc<dyn GroupDirectory>,
    matrix: Arc<PermissionMatrix>,
    cache: Option<CheckCache>,
}

impl core::fmt::Debug for PermissionService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PermissionService")
            .field("cache", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}

impl PermissionService {
    pub fn new(actors: impl ActorProvider + 'static, groups: impl GroupDirectory + 'static) -> Self {
        Self {
            actors: Arc::new(actors),
            groups: Arc::new(groups),
            matrix: Arc::new(PermissionMatrix::default()),
            cache: None,
        }
    }

    pub fn with_config(mut self, config: &AuthConfig) -> Self {
        self.cache = config
            .cache_enabled
            .then(|| CheckCache::new(config.cache_capacity));
        self
    }

    pub fn with_matrix(mut self, matrix: PermissionMatrix) -> Self {
        self.matrix = Arc::new(matrix);
        self
    }

    pub fn matrix(&self) -> &PermissionMatrix {
        &self.matrix
    }

    /// The check cache, if enabled. The auth layer calls
    /// [`CheckCache::invalidate`] on sign-out.
    pub fn cache(&self) -> Option<&CheckCache> {
        self.cache.as_ref()
    }

    pub async fn current_actor(&self) -> Result<Option<Actor>, LookupError> {
        self.actors.current_actor().await
    }

    // ─────────────────────────────────────────────────────────────────────
    // Role membership
    // ─────────────────────────────────────────────────────────────────────

    pub async fn try_has_role(&self, role: &Role) -> Result<bool, LookupError> {
        Ok(self
            .current_actor()
            .await?
            .is_some_and(|actor| actor.has_role(role)))
    }

    pub async fn has_role(&self, role: &Role) -> bool {
        self.try_has_role(role).await.unwrap_or_else(|err| {
            tracing::warn!(%role, error = %err, "role lookup failed; treating as absent");
            false
        })
    }

    /// True if the actor holds at least one of `roles`. An empty list is false.
    pub async fn try_has_any_role(&self, roles: &[Role]) -> Result<bool, LookupError> {
        Ok(self
            .current_actor()
            .await?
            .is_some_and(|actor| roles.iter().any(|r| actor.has_role(r))))
    }

    pub async fn has_any_role(&self, roles: &[Role]) -> bool {
        self.try_has_any_role(roles).await.unwrap_or_else(|err| {
            tracing::warn!(?roles, error = %err, "role lookup failed; treating as absent");
            false
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Permission checks
    // ─────────────────────────────────────────────────────────────────────

    /// Role-level check, narrowed to `resource_id` when the permission is
    /// church- or group-scoped. Without a resource id a scoped permission is
    /// checked by role only.
    pub async fn try_has_permission(
        &self,
        permission: &Permission,
        resource_id: Option<&str>,
    ) -> Result<PermissionCheck, LookupError> {
        let Some(actor) = self.current_actor().await? else {
            return Ok(signed_out(permission.as_str()));
        };

        let scope = self.matrix.scope_of(permission);
        // Group-scoped results depend on directory state outside the actor
        // revision, so they bypass the cache.
        let cacheable = !(scope == Scope::Group && resource_id.is_some());
        // `{:?}` keeps `None` and `Some("")` apart.
        let key = format!("perm:{permission}:{resource_id:?}");
        if cacheable {
            if let Some(hit) = self.cached(&actor, &key) {
                return Ok(hit);
            }
        }

        let check = self.evaluate_permission(&actor, permission, scope, resource_id).await?;
        log_decision(&actor, permission.as_str(), resource_id, &check);
        if cacheable {
            self.remember(&actor, &key, &check);
        }
        Ok(check)
    }

    pub async fn has_permission(&self, permission: &Permission, resource_id: Option<&str>) -> PermissionCheck {
        let result = self.try_has_permission(permission, resource_id).await;
        fold(permission.as_str(), result)
    }

    /// Tenant isolation primitive: same church, or `super_admin`.
    pub async fn try_can_access_church_data(&self, church_id: &ChurchId) -> Result<PermissionCheck, LookupError> {
        let Some(actor) = self.current_actor().await? else {
            return Ok(signed_out("church_data"));
        };
        let key = format!("church:{church_id}");
        if let Some(hit) = self.cached(&actor, &key) {
            return Ok(hit);
        }

        let check = church_access(&actor, church_id);
        log_decision(&actor, "church_data", Some(church_id.as_str()), &check);
        self.remember(&actor, &key, &check);
        Ok(check)
    }

    pub async fn can_access_church_data(&self, church_id: &ChurchId) -> PermissionCheck {
        let result = self.try_can_access_church_data(church_id).await;
        fold("church_data", result)
    }

    /// Whether the group may be edited: `user_id` is the actor and leads or
    /// administers it, or the actor is a `church_admin` of the group's
    /// church or service, or the actor is `super_admin`.
    pub async fn try_can_manage_group(
        &self,
        group_id: &GroupId,
        user_id: &UserId,
    ) -> Result<PermissionCheck, LookupError> {
        self.evaluate_group_management("manage_group", group_id, user_id).await
    }

    pub async fn can_manage_group(&self, group_id: &GroupId, user_id: &UserId) -> PermissionCheck {
        let result = self.try_can_manage_group(group_id, user_id).await;
        fold("manage_group", result)
    }

    /// Same policy as [`Self::try_can_manage_group`], checked for promote,
    /// demote and remove.
    pub async fn try_can_manage_group_membership(
        &self,
        group_id: &GroupId,
        user_id: &UserId,
    ) -> Result<PermissionCheck, LookupError> {
        self.evaluate_group_management("manage_group_membership", group_id, user_id)
            .await
    }

    pub async fn can_manage_group_membership(&self, group_id: &GroupId, user_id: &UserId) -> PermissionCheck {
        let result = self.try_can_manage_group_membership(group_id, user_id).await;
        fold("manage_group_membership", result)
    }

    /// Whether the actor leads (or administers) `group_id` per their session
    /// memberships.
    pub async fn try_is_group_leader(&self, group_id: &GroupId) -> Result<PermissionCheck, LookupError> {
        let Some(actor) = self.current_actor().await? else {
            return Ok(signed_out("group_leader"));
        };
        let key = format!("leader:{group_id}");
        if let Some(hit) = self.cached(&actor, &key) {
            return Ok(hit);
        }

        let check = if actor.is_super_admin() || leads(&actor, group_id) {
            PermissionCheck::granted()
        } else {
            PermissionCheck::denied(reasons::not_group_leader())
        };
        log_decision(&actor, "group_leader", Some(group_id.as_str()), &check);
        self.remember(&actor, &key, &check);
        Ok(check)
    }

    pub async fn is_group_leader(&self, group_id: &GroupId) -> PermissionCheck {
        let result = self.try_is_group_leader(group_id).await;
        fold("group_leader", result)
    }

    pub async fn try_is_church_admin(&self) -> Result<PermissionCheck, LookupError> {
        let Some(actor) = self.current_actor().await? else {
            return Ok(signed_out("church_admin"));
        };

        let check = if actor.is_super_admin() || actor.has_role(&Role::CHURCH_ADMIN) {
            PermissionCheck::granted()
        } else {
            PermissionCheck::denied(reasons::NOT_CHURCH_ADMIN)
        };
        log_decision(&actor, "church_admin", None, &check);
        Ok(check)
    }

    pub async fn is_church_admin(&self) -> PermissionCheck {
        let result = self.try_is_church_admin().await;
        fold("church_admin", result)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Evaluation
    // ─────────────────────────────────────────────────────────────────────

    async fn evaluate_permission(
        &self,
        actor: &Actor,
        permission: &Permission,
        scope: Scope,
        resource_id: Option<&str>,
    ) -> Result<PermissionCheck, LookupError> {
        let role_level = self.role_check(actor, permission);
        if !role_level.granted || actor.is_super_admin() {
            return Ok(role_level);
        }

        match (scope, resource_id) {
            (Scope::Church, Some(id)) => Ok(church_access(actor, &ChurchId::new(id))),
            (Scope::Group, Some(id)) => self.group_scope(actor, &GroupId::new(id)).await,
            _ => Ok(PermissionCheck::granted()),
        }
    }

    /// Role-only decision against one actor snapshot: `super_admin`, then
    /// the vocabulary, then the union of the actor's role grants.
    pub(crate) fn role_check(&self, actor: &Actor, permission: &Permission) -> PermissionCheck {
        if actor.is_super_admin() {
            return PermissionCheck::granted();
        }
        if self.matrix.scope_of(permission) == Scope::Unknown {
            return PermissionCheck::denied(reasons::unknown_permission(permission));
        }
        if !self.matrix.grants(&actor.roles, permission) {
            return PermissionCheck::denied(reasons::missing_permission(permission));
        }
        PermissionCheck::granted()
    }

    /// Narrow a role-level grant to one group: the actor must lead it, or be
    /// a `church_admin` of its owning church/service.
    async fn group_scope(&self, actor: &Actor, group_id: &GroupId) -> Result<PermissionCheck, LookupError> {
        if leads(actor, group_id) {
            return Ok(PermissionCheck::granted());
        }
        if !actor.has_role(&Role::CHURCH_ADMIN) {
            return Ok(PermissionCheck::denied(reasons::not_group_leader()));
        }

        match self.groups.group(group_id).await? {
            None => Ok(PermissionCheck::denied(reasons::GROUP_NOT_FOUND)),
            Some(group) if group.owned_by_tenant_of(actor) => Ok(PermissionCheck::granted()),
            Some(_) => Ok(PermissionCheck::denied(reasons::other_church())),
        }
    }

    async fn evaluate_group_management(
        &self,
        check_name: &'static str,
        group_id: &GroupId,
        user_id: &UserId,
    ) -> Result<PermissionCheck, LookupError> {
        let Some(actor) = self.current_actor().await? else {
            return Ok(signed_out(check_name));
        };

        // Only the actor's own leadership counts; asking about another user's
        // membership never widens what the actor may do.
        let check = if actor.is_super_admin() {
            PermissionCheck::granted()
        } else if *user_id == actor.id
            && self
                .groups
                .membership_role(group_id, user_id)
                .await?
                .is_some_and(|role| role.can_manage())
        {
            PermissionCheck::granted()
        } else if actor.has_role(&Role::CHURCH_ADMIN) {
            match self.groups.group(group_id).await? {
                Some(group) if group.owned_by_tenant_of(&actor) => PermissionCheck::granted(),
                Some(_) => PermissionCheck::denied(reasons::not_group_manager()),
                None => PermissionCheck::denied(reasons::GROUP_NOT_FOUND),
            }
        } else {
            PermissionCheck::denied(reasons::not_group_leader())
        };

        log_decision(&actor, check_name, Some(group_id.as_str()), &check);
        Ok(check)
    }

    fn cached(&self, actor: &Actor, key: &str) -> Option<PermissionCheck> {
        self.cache.as_ref()?.get(actor, key)
    }

    fn remember(&self, actor: &Actor, key: &str, check: &PermissionCheck) {
        if let Some(cache) = &self.cache {
            cache.insert(actor, key, check.clone());
        }
    }
}

fn leads(actor: &Actor, group_id: &GroupId) -> bool {
    actor.membership_in(group_id).is_some_and(|role| role.can_manage())
}

fn church_access(actor: &Actor, church_id: &ChurchId) -> PermissionCheck {
    if actor.is_super_admin() || actor.belongs_to_church(church_id) {
        PermissionCheck::granted()
    } else {
        PermissionCheck::denied(reasons::other_church())
    }
}

fn signed_out(check: &str) -> PermissionCheck {
    tracing::info!(check, "permission denied: not signed in");
    PermissionCheck::denied(reasons::NOT_SIGNED_IN)
}

fn fold(check: &str, result: Result<PermissionCheck, LookupError>) -> PermissionCheck {
    if let Err(err) = &result {
        tracing::warn!(check, error = %err, "permission lookup failed; denying");
    }
    PermissionCheck::from_lookup(result)
}

fn log_decision(actor: &Actor, check: &str, resource: Option<&str>, result: &PermissionCheck) {
    if result.granted {
        tracing::debug!(actor_id = %actor.id, check, resource, "permission granted");
    } else {
        tracing::info!(
            actor_id = %actor.id,
            check,
            resource,
            reason = result.reason_or_default(),
            "permission denied"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GroupRecord, InMemoryGroupDirectory, MembershipRole, SessionStore};

    fn service(actor: Actor) -> (PermissionService, SessionStore, InMemoryGroupDirectory) {
        let session = SessionStore::signed_in(actor);
        let groups = InMemoryGroupDirectory::new();
        groups.insert_group(GroupRecord::new("group-1").in_church("church-1").in_service("svc-1"));
        groups.insert_group(GroupRecord::new("group-2").in_church("church-2"));
        groups.set_membership("group-1", "leader-1", Some(MembershipRole::Leader));
        groups.set_membership("group-1", "member-1", Some(MembershipRole::Member));
        (
            PermissionService::new(session.clone(), groups.clone()),
            session,
            groups,
        )
    }

    #[tokio::test]
    async fn member_cannot_manage_church_groups() {
        let (svc, _, _) = service(Actor::new("u1").with_church("church-1").with_roles([Role::MEMBER]));
        let check = svc.has_permission(&Permission::MANAGE_CHURCH_GROUPS, None).await;
        assert!(!check.granted);
        assert!(check.reason_or_default().contains("manage_church_groups"));
    }

    #[tokio::test]
    async fn church_admin_is_scoped_to_own_church() {
        let (svc, _, _) = service(Actor::new("a1").with_church("church-1").with_roles([Role::CHURCH_ADMIN]));

        assert!(svc.has_permission(&Permission::MANAGE_CHURCH_GROUPS, Some("church-1")).await.granted);
        let other = svc.has_permission(&Permission::MANAGE_CHURCH_GROUPS, Some("church-2")).await;
        assert!(!other.granted);
        assert!(other.reason.is_some());

        assert!(svc.can_access_church_data(&ChurchId::new("church-1")).await.granted);
        assert!(!svc.can_access_church_data(&ChurchId::new("church-2")).await.granted);
    }

    #[tokio::test]
    async fn scoped_permission_without_resource_is_role_only() {
        let (svc, _, _) = service(Actor::new("a1").with_church("church-1").with_roles([Role::CHURCH_ADMIN]));
        assert!(svc.has_permission(&Permission::READ_CHURCH_DATA, None).await.granted);
    }

    #[tokio::test]
    async fn super_admin_passes_everything() {
        let (svc, _, _) = service(Actor::new("root").with_roles([Role::SUPER_ADMIN]));

        assert!(svc.has_permission(&Permission::MANAGE_CHURCH_GROUPS, Some("church-2")).await.granted);
        assert!(svc.has_permission(&Permission::new("not_a_permission"), None).await.granted);
        assert!(svc.can_access_church_data(&ChurchId::new("church-9")).await.granted);
        assert!(svc.can_manage_group(&GroupId::new("group-2"), &UserId::new("x")).await.granted);
        assert!(svc.is_group_leader(&GroupId::new("group-2")).await.granted);
        assert!(svc.is_church_admin().await.granted);
    }

    #[tokio::test]
    async fn unknown_permission_and_roles_fail_closed() {
        let (svc, _, _) = service(Actor::new("u1").with_church("church-1").with_roles([Role::new("pastor")]));
        assert!(!svc.has_permission(&Permission::VIEW_GROUPS, None).await.granted);

        let (svc, _, _) = service(Actor::new("u1").with_roles([Role::CHURCH_ADMIN]));
        let check = svc.has_permission(&Permission::new("delete_church"), None).await;
        assert!(!check.granted);
        assert!(check.reason_or_default().contains("Unknown permission"));
    }

    #[tokio::test]
    async fn group_scope_requires_leadership_or_church_admin() {
        let leader = Actor::new("leader-1")
            .with_roles([Role::GROUP_LEADER])
            .with_membership("group-1", MembershipRole::Leader);
        let (svc, _, _) = service(leader);
        assert!(svc.has_permission(&Permission::MANAGE_GROUP, Some("group-1")).await.granted);
        let other = svc.has_permission(&Permission::MANAGE_GROUP, Some("group-2")).await;
        assert_eq!(other.reason.as_deref(), Some("You are not a leader of this group."));

        let admin = Actor::new("a1").with_service("svc-1").with_roles([Role::CHURCH_ADMIN]);
        let (svc, _, _) = service(admin);
        assert!(svc.has_permission(&Permission::MANAGE_GROUP_MEMBERS, Some("group-1")).await.granted);
        assert!(!svc.has_permission(&Permission::MANAGE_GROUP_MEMBERS, Some("group-2")).await.granted);
        let missing = svc.has_permission(&Permission::MANAGE_GROUP, Some("group-404")).await;
        assert_eq!(missing.reason.as_deref(), Some(reasons::GROUP_NOT_FOUND));
    }

    #[tokio::test]
    async fn can_manage_group_matches_exact_membership() {
        let (svc, _, _) = service(Actor::new("leader-1").with_roles([Role::GROUP_LEADER]));

        assert!(svc.can_manage_group(&GroupId::new("group-1"), &UserId::new("leader-1")).await.granted);

        let other_group = svc.can_manage_group(&GroupId::new("group-2"), &UserId::new("leader-1")).await;
        assert!(!other_group.granted);
        assert!(other_group.reason_or_default().contains("not a leader of this group"));

        let plain_member = svc
            .can_manage_group_membership(&GroupId::new("group-1"), &UserId::new("member-1"))
            .await;
        assert!(!plain_member.granted);
    }

    #[tokio::test]
    async fn church_admin_manages_groups_of_own_church_only() {
        let (svc, _, _) = service(Actor::new("a1").with_church("church-1").with_roles([Role::CHURCH_ADMIN]));
        assert!(svc.can_manage_group(&GroupId::new("group-1"), &UserId::new("a1")).await.granted);
        assert!(!svc.can_manage_group(&GroupId::new("group-2"), &UserId::new("a1")).await.granted);
    }

    #[tokio::test]
    async fn role_queries() {
        let (svc, _, _) = service(Actor::new("u1").with_roles([Role::MEMBER, Role::GROUP_LEADER]));
        assert!(svc.has_role(&Role::GROUP_LEADER).await);
        assert!(!svc.has_role(&Role::CHURCH_ADMIN).await);
        assert!(svc.has_any_role(&[Role::CHURCH_ADMIN, Role::MEMBER]).await);
        assert!(!svc.has_any_role(&[]).await);
    }

    #[tokio::test]
    async fn signed_out_is_denied() {
        let (svc, session, _) = service(Actor::new("u1").with_roles([Role::SUPER_ADMIN]));
        session.sign_out();
        let check = svc.has_permission(&Permission::VIEW_GROUPS, None).await;
        assert_eq!(check.reason.as_deref(), Some(reasons::NOT_SIGNED_IN));
        assert!(!svc.has_role(&Role::SUPER_ADMIN).await);
    }

    #[tokio::test]
    async fn lookup_failure_denies_or_propagates() {
        let (svc, session, _) = service(Actor::new("u1").with_roles([Role::CHURCH_ADMIN]));
        session.fail_with(LookupError::Session("network down".into()));

        let check = svc.is_church_admin().await;
        assert!(!check.granted);
        assert!(check.reason_or_default().contains("network down"));

        let err = svc.try_is_church_admin().await.unwrap_err();
        assert_eq!(err, LookupError::Session("network down".into()));
        assert!(!svc.has_role(&Role::CHURCH_ADMIN).await);
    }

    #[tokio::test]
    async fn directory_failure_denies_group_checks() {
        let (svc, _, groups) = service(Actor::new("a1").with_church("church-1").with_roles([Role::CHURCH_ADMIN]));
        groups.fail_with(LookupError::Directory("timeout".into()));
        let check = svc.can_manage_group(&GroupId::new("group-1"), &UserId::new("a1")).await;
        assert!(!check.granted);
        assert!(check.reason_or_default().contains("timeout"));
    }

    #[tokio::test]
    async fn revocation_is_visible_immediately_even_with_cache() {
        let actor = Actor::new("a1").with_church("church-1").with_roles([Role::CHURCH_ADMIN]);
        let (svc, session, _) = service(actor);
        let svc = svc.with_config(&AuthConfig {
            cache_enabled: true,
            cache_capacity: 16,
        });

        assert!(svc.has_permission(&Permission::MANAGE_CHURCH_GROUPS, Some("church-1")).await.granted);
        assert!(svc.has_permission(&Permission::MANAGE_CHURCH_GROUPS, Some("church-1")).await.granted);

        session.set_roles([Role::MEMBER]);
        assert!(!svc.has_permission(&Permission::MANAGE_CHURCH_GROUPS, Some("church-1")).await.granted);
    }

    #[tokio::test]
    async fn cache_keeps_role_only_and_scoped_checks_apart() {
        let actor = Actor::new("a1").with_church("church-1").with_roles([Role::CHURCH_ADMIN]);
        let (plain, _, _) = service(actor.clone());
        let (cached, _, _) = service(actor);
        let cached = cached.with_config(&AuthConfig {
            cache_enabled: true,
            cache_capacity: 16,
        });

        for svc in [&plain, &cached] {
            assert!(svc.has_permission(&Permission::READ_CHURCH_DATA, None).await.granted);
            let blank = svc.has_permission(&Permission::READ_CHURCH_DATA, Some("")).await;
            assert!(!blank.granted);
            assert_eq!(blank.reason, Some(reasons::other_church()));
        }
    }

    #[tokio::test]
    async fn lookup_failures_are_not_cached() {
        let actor = Actor::new("a1").with_church("church-1").with_roles([Role::CHURCH_ADMIN]);
        let (svc, session, _) = service(actor);
        let svc = svc.with_config(&AuthConfig {
            cache_enabled: true,
            cache_capacity: 16,
        });

        session.fail_with(LookupError::Unavailable);
        assert!(!svc.has_permission(&Permission::READ_CHURCH_DATA, Some("church-1")).await.granted);
        assert!(!svc.can_access_church_data(&ChurchId::new("church-1")).await.granted);

        session.recover();
        assert!(svc.has_permission(&Permission::READ_CHURCH_DATA, Some("church-1")).await.granted);
        assert!(svc.can_access_church_data(&ChurchId::new("church-1")).await.granted);
    }

    #[tokio::test]
    async fn group_admin_membership_counts_as_manager() {
        let (svc, _, groups) = service(Actor::new("admin-1").with_roles([Role::MEMBER]));
        groups.set_membership("group-1", "admin-1", Some(MembershipRole::Admin));

        assert!(svc.can_manage_group(&GroupId::new("group-1"), &UserId::new("admin-1")).await.granted);
        assert!(svc
            .can_manage_group_membership(&GroupId::new("group-1"), &UserId::new("admin-1"))
            .await
            .granted);
    }

    #[tokio::test]
    async fn another_users_leadership_does_not_grant() {
        let (svc, _, groups) = service(Actor::new("a1").with_church("church-1").with_roles([Role::CHURCH_ADMIN]));
        groups.set_membership("group-2", "leader-2", Some(MembershipRole::Leader));

        let check = svc.can_manage_group(&GroupId::new("group-2"), &UserId::new("leader-2")).await;
        assert!(!check.granted);
        assert!(!svc
            .can_manage_group_membership(&GroupId::new("group-2"), &UserId::new("leader-2"))
            .await
            .granted);

        let (svc, _, _) = service(Actor::new("member-1").with_roles([Role::MEMBER]));
        let check = svc.can_manage_group(&GroupId::new("group-1"), &UserId::new("leader-1")).await;
        assert_eq!(check.reason, Some(reasons::not_group_leader()));
    }

    #[tokio::test]
    async fn repeated_checks_are_identical() {
        let (svc, _, _) = service(Actor::new("u1").with_church("church-1").with_roles([Role::MEMBER]));
        let first = svc.has_permission(&Permission::APPROVE_GROUPS, Some("church-1")).await;
        let second = svc.has_permission(&Permission::APPROVE_GROUPS, Some("church-1")).await;
        assert_eq!(first, second);
    }
}
