//! End-to-end permission scenarios against the in-memory session and group
//! directory.

use fellowship_auth::{
    Actor, AdminGroupsScreen, AdminView, AuthConfig, Gate, GateState, GroupRecord, GroupSource,
    InMemoryGroupDirectory, LookupError, MembershipRole, Permission, PermissionService, Role,
    SessionStore,
};
use fellowship_core::{ChurchId, GroupId, UserId};

struct World {
    session: SessionStore,
    groups: InMemoryGroupDirectory,
    service: PermissionService,
}

fn world(actor: Actor) -> World {
    fellowship_observability::init();

    let session = SessionStore::signed_in(actor);
    let groups = InMemoryGroupDirectory::new();
    groups.insert_group(GroupRecord::new("group-1").in_church("church-1"));
    groups.insert_group(GroupRecord::new("group-2").in_church("church-2"));
    groups.set_membership("group-1", "leader-1", Some(MembershipRole::Leader));
    groups.set_membership("group-2", "leader-2", Some(MembershipRole::Leader));

    let service = PermissionService::new(session.clone(), groups.clone());
    World {
        session,
        groups,
        service,
    }
}

struct PanickingSource;

#[async_trait::async_trait]
impl GroupSource for PanickingSource {
    async fn groups_for_church(&self, _church_id: &ChurchId) -> anyhow::Result<Vec<GroupRecord>> {
        panic!("group source must not be called");
    }
}

#[tokio::test]
async fn member_is_kept_out_of_admin_screen() {
    let w = world(Actor::new("u1").with_church("church-1").with_roles([Role::MEMBER]));

    let check = w.service.has_permission(&Permission::MANAGE_CHURCH_GROUPS, None).await;
    assert!(!check.granted);
    assert!(check.reason.is_some());

    let screen = AdminGroupsScreen::new(w.service.clone(), PanickingSource);
    let view = screen.load(&ChurchId::new("church-1")).await;
    assert!(matches!(view, AdminView::Redirect { .. }));
}

#[tokio::test]
async fn church_admin_cannot_read_other_church() {
    let w = world(Actor::new("a1").with_church("church-1").with_roles([Role::CHURCH_ADMIN]));

    let check = w.service.can_access_church_data(&ChurchId::new("church-2")).await;
    assert!(!check.granted);

    let screen = AdminGroupsScreen::new(w.service.clone(), PanickingSource);
    let view = screen.load(&ChurchId::new("church-2")).await;
    match view {
        AdminView::Denied { reason } => assert_eq!(Some(reason), check.reason),
        other => panic!("expected denial, got {other:?}"),
    }
}

#[tokio::test]
async fn group_management_requires_exact_group() {
    let w = world(Actor::new("leader-1").with_church("church-1").with_roles([Role::GROUP_LEADER]));

    let own = w
        .service
        .can_manage_group(&GroupId::new("group-1"), &UserId::new("leader-1"))
        .await;
    assert!(own.granted);

    let other = w
        .service
        .can_manage_group(&GroupId::new("group-2"), &UserId::new("leader-1"))
        .await;
    assert!(!other.granted);
    assert!(other.reason.unwrap().contains("not a leader of this group"));
}

#[tokio::test]
async fn tenant_isolation_holds_for_church_admin_but_not_super_admin() {
    let w = world(Actor::new("a1").with_church("church-1").with_roles([Role::CHURCH_ADMIN]));
    for permission in [
        Permission::READ_CHURCH_DATA,
        Permission::MANAGE_CHURCH_GROUPS,
        Permission::MANAGE_CHURCH_USERS,
        Permission::APPROVE_GROUPS,
    ] {
        assert!(!w.service.has_permission(&permission, Some("church-2")).await.granted);
    }
    assert!(!w.service.has_permission(&Permission::MANAGE_GROUP, Some("group-2")).await.granted);

    w.session.set_roles([Role::CHURCH_ADMIN, Role::SUPER_ADMIN]);
    assert!(w.service.has_permission(&Permission::MANAGE_GROUP, Some("group-2")).await.granted);
    assert!(w.service.can_access_church_data(&ChurchId::new("church-2")).await.granted);
}

#[tokio::test]
async fn leader_of_another_church_group_is_not_manageable_by_admin() {
    let w = world(Actor::new("a1").with_church("church-1").with_roles([Role::CHURCH_ADMIN]));

    let check = w
        .service
        .can_manage_group(&GroupId::new("group-2"), &UserId::new("leader-2"))
        .await;
    assert!(!check.granted);
    assert!(check.reason.is_some());
}

#[tokio::test]
async fn multi_role_actor_uses_union() {
    let w = world(
        Actor::new("leader-1")
            .with_church("church-1")
            .with_roles([Role::CHURCH_ADMIN, Role::GROUP_LEADER])
            .with_membership("group-1", MembershipRole::Leader),
    );
    assert!(w.service.has_permission(&Permission::APPROVE_GROUPS, Some("church-1")).await.granted);
    assert!(w.service.has_permission(&Permission::MANAGE_GROUP_MEMBERS, Some("group-1")).await.granted);
    assert!(w.service.is_group_leader(&GroupId::new("group-1")).await.granted);
    assert!(w.service.is_church_admin().await.granted);
}

#[tokio::test]
async fn revocation_mid_session_with_and_without_cache() {
    for cache_enabled in [false, true] {
        let w = world(Actor::new("a1").with_church("church-1").with_roles([Role::CHURCH_ADMIN]));
        let service = w.service.clone().with_config(&AuthConfig {
            cache_enabled,
            ..AuthConfig::default()
        });

        let mut gate = Gate::church_admin_only();
        gate.evaluate(&service).await;
        assert_eq!(gate.state(), &GateState::Granted);
        assert!(service.is_church_admin().await.granted);

        w.session.set_roles([Role::MEMBER]);
        assert!(!service.is_church_admin().await.granted);

        gate.invalidate();
        gate.evaluate(&service).await;
        assert!(matches!(gate.state(), GateState::Denied { .. }));
    }
}

#[tokio::test]
async fn membership_revocation_in_directory_is_seen_next_call() {
    let w = world(Actor::new("leader-1").with_roles([Role::GROUP_LEADER]));
    let (group, user) = (GroupId::new("group-1"), UserId::new("leader-1"));

    assert!(w.service.can_manage_group_membership(&group, &user).await.granted);
    w.groups.set_membership("group-1", "leader-1", Some(MembershipRole::Member));
    assert!(!w.service.can_manage_group_membership(&group, &user).await.granted);
}

#[tokio::test]
async fn outage_fails_closed_in_both_forms() {
    let w = world(Actor::new("a1").with_church("church-1").with_roles([Role::CHURCH_ADMIN]));
    w.session.fail_with(LookupError::Session("503 from auth".into()));

    let denied = w.service.has_permission(&Permission::READ_CHURCH_DATA, Some("church-1")).await;
    assert!(!denied.granted);
    assert!(denied.reason.unwrap().contains("503 from auth"));

    assert!(w
        .service
        .try_has_permission(&Permission::READ_CHURCH_DATA, Some("church-1"))
        .await
        .is_err());

    let mut gate = Gate::permission(Permission::READ_CHURCH_DATA, Some("church-1".into()));
    gate.evaluate(&w.service).await;
    assert!(gate.render("data", None).is_none());
    assert!(gate.denial_reason().unwrap().contains("503 from auth"));
}

#[tokio::test]
async fn checks_are_idempotent() {
    let w = world(Actor::new("leader-1").with_church("church-1").with_roles([Role::GROUP_LEADER]));
    let group = GroupId::new("group-2");
    let user = UserId::new("leader-1");

    assert_eq!(
        w.service.can_manage_group(&group, &user).await,
        w.service.can_manage_group(&group, &user).await
    );
    assert_eq!(
        w.service.has_permission(&Permission::CREATE_GROUP, None).await,
        w.service.has_permission(&Permission::CREATE_GROUP, None).await
    );
}
