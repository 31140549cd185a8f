//! Render gates.
//!
//! A [`Gate`] decides whether gated content is shown for the current actor.
//! It starts in [`GateState::Loading`] (render nothing), then settles on
//! `Granted` (render children) or `Denied` (render the fallback). Changing
//! the check or observing a session change puts it back into `Loading` and
//! bumps a generation counter; results computed for an older generation are
//! discarded.

use tokio::sync::watch;

use fellowship_core::GroupId;

use crate::check::reasons;
use crate::{LookupError, Permission, PermissionCheck, PermissionService, Role};

/// Which capability a gate evaluates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateCheck {
    /// Role and/or permission lists. `require_all` governs each list
    /// internally (ALL vs ANY); the two lists are always combined with AND.
    /// An empty list does not constrain.
    Roles {
        roles: Vec<Role>,
        permissions: Vec<Permission>,
        require_all: bool,
    },
    /// A single permission, optionally scoped to a church or group id.
    Permission {
        permission: Permission,
        resource: Option<String>,
    },
    GroupLeader { group: GroupId },
    ChurchAdmin,
}

impl GateCheck {
    pub async fn evaluate(&self, service: &PermissionService) -> Result<PermissionCheck, LookupError> {
        match self {
            GateCheck::Roles {
                roles,
                permissions,
                require_all,
            } => evaluate_lists(service, roles, permissions, *require_all).await,
            GateCheck::Permission { permission, resource } => {
                service.try_has_permission(permission, resource.as_deref()).await
            }
            GateCheck::GroupLeader { group } => service.try_is_group_leader(group).await,
            GateCheck::ChurchAdmin => service.try_is_church_admin().await,
        }
    }
}

async fn evaluate_lists(
    service: &PermissionService,
    roles: &[Role],
    permissions: &[Permission],
    require_all: bool,
) -> Result<PermissionCheck, LookupError> {
    let Some(actor) = service.current_actor().await? else {
        return Ok(PermissionCheck::denied(reasons::NOT_SIGNED_IN));
    };

    if !roles.is_empty() {
        let passes = if require_all {
            roles.iter().all(|r| actor.has_role(r))
        } else {
            roles.iter().any(|r| actor.has_role(r))
        };
        if !passes {
            let names: Vec<&str> = roles.iter().map(Role::as_str).collect();
            let reason = if require_all {
                format!("Requires the roles: {}.", names.join(", "))
            } else {
                format!("Requires one of the roles: {}.", names.join(", "))
            };
            return Ok(PermissionCheck::denied(reason));
        }
    }

    if permissions.is_empty() {
        return Ok(PermissionCheck::granted());
    }

    // Same snapshot as the role list, so a mid-check role change cannot
    // mix old and new state.
    let mut first_denial = None;
    for permission in permissions {
        let check = service.role_check(&actor, permission);
        match (check.granted, require_all) {
            (true, false) => return Ok(check),
            (false, true) => return Ok(check),
            (false, false) => {
                first_denial.get_or_insert(check);
            }
            (true, true) => {}
        }
    }

    Ok(match first_denial {
        Some(denial) if !require_all => denial,
        _ => PermissionCheck::granted(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    Loading,
    Granted,
    Denied { reason: String },
}

#[derive(Debug, Clone)]
pub struct Gate {
    check: GateCheck,
    state: GateState,
    generation: u64,
}

impl Gate {
    pub fn new(check: GateCheck) -> Self {
        Self {
            check,
            state: GateState::Loading,
            generation: 0,
        }
    }

    /// Role/permission list gate (`RoleBasedRender`).
    pub fn role_based(roles: Vec<Role>, permissions: Vec<Permission>, require_all: bool) -> Self {
        Self::new(GateCheck::Roles {
            roles,
            permissions,
            require_all,
        })
    }

    /// Single permission gate (`PermissionGate`).
    pub fn permission(permission: Permission, resource: Option<String>) -> Self {
        Self::new(GateCheck::Permission { permission, resource })
    }

    pub fn group_leader_only(group: impl Into<GroupId>) -> Self {
        Self::new(GateCheck::GroupLeader { group: group.into() })
    }

    pub fn church_admin_only() -> Self {
        Self::new(GateCheck::ChurchAdmin)
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn check(&self) -> &GateCheck {
        &self.check
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.state == GateState::Loading
    }

    /// Replace the check (new roles, permissions or resource id). Returns
    /// `true` if it differed, in which case the gate is loading again.
    pub fn set_check(&mut self, check: GateCheck) -> bool {
        if self.check == check {
            return false;
        }
        self.check = check;
        self.invalidate();
        true
    }

    /// Forget the current result (session or role change).
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.state = GateState::Loading;
    }

    /// Snapshot for callers that run the check themselves; hand the
    /// generation back to [`Gate::apply`].
    pub fn pending(&self) -> (u64, GateCheck) {
        (self.generation, self.check.clone())
    }

    /// Record a result computed for `generation`. Results for an older
    /// generation are dropped and `false` is returned.
    pub fn apply(&mut self, generation: u64, result: Result<PermissionCheck, LookupError>) -> bool {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "discarding stale gate result");
            return false;
        }
        let check = PermissionCheck::from_lookup(result);
        self.state = if check.granted {
            GateState::Granted
        } else {
            GateState::Denied {
                reason: check.reason_or_default().to_string(),
            }
        };
        true
    }

    pub async fn evaluate(&mut self, service: &PermissionService) -> &GateState {
        let (generation, check) = self.pending();
        let result = check.evaluate(service).await;
        self.apply(generation, result);
        &self.state
    }

    /// Re-evaluate if the session revision moved since last observed.
    pub async fn sync_with_session(
        &mut self,
        revisions: &mut watch::Receiver<u64>,
        service: &PermissionService,
    ) -> &GateState {
        if revisions.has_changed().unwrap_or(true) {
            let _ = revisions.borrow_and_update();
            self.invalidate();
        }
        if self.is_loading() {
            self.evaluate(service).await;
        }
        &self.state
    }

    /// `children` when granted, `fallback` when denied, nothing while loading.
    pub fn render<T>(&self, children: T, fallback: Option<T>) -> Option<T> {
        match self.state {
            GateState::Loading => None,
            GateState::Granted => Some(children),
            GateState::Denied { .. } => fallback,
        }
    }

    pub fn denial_reason(&self) -> Option<&str> {
        match &self.state {
            GateState::Denied { reason } => Some(reason),
            _ => None,
        }
    }
}
