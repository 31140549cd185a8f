//! Actor/session provider.
//!
//! The permission layer never holds an actor across calls; it asks the
//! provider for a fresh snapshot on every check.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tokio::sync::watch;

use fellowship_core::GroupId;

use crate::{Actor, LookupError, MembershipRole, Role};

/// Source of the currently signed-in actor.
#[async_trait]
pub trait ActorProvider: Send + Sync {
    /// `Ok(None)` means nobody is signed in.
    async fn current_actor(&self) -> Result<Option<Actor>, LookupError>;
}

#[async_trait]
impl<T: ActorProvider + ?Sized> ActorProvider for Arc<T> {
    async fn current_actor(&self) -> Result<Option<Actor>, LookupError> {
        (**self).current_actor().await
    }
}

#[derive(Debug, Default)]
struct SessionState {
    actor: Option<Actor>,
    failure: Option<LookupError>,
    revision: u64,
}

/// In-process session store shared by the auth layer and the permission layer.
///
/// Every mutation bumps the revision, stamps it onto the stored actor and
/// publishes it to subscribers.
#[derive(Debug, Clone)]
pub struct SessionStore {
    state: Arc<RwLock<SessionState>>,
    revisions: Arc<watch::Sender<u64>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self {
            state: Arc::new(RwLock::new(SessionState::default())),
            revisions: Arc::new(tx),
        }
    }

    pub fn signed_in(actor: Actor) -> Self {
        let store = Self::new();
        store.sign_in(actor);
        store
    }

    /// Revision notifications; the value is the latest session revision.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revisions.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.revisions.borrow()
    }

    pub fn sign_in(&self, actor: Actor) {
        self.mutate(|state| {
            state.actor = Some(actor);
            state.failure = None;
        });
        tracing::info!(revision = self.revision(), "session signed in");
    }

    pub fn sign_out(&self) {
        self.mutate(|state| {
            state.actor = None;
            state.failure = None;
        });
        tracing::info!(revision = self.revision(), "session signed out");
    }

    /// Replace the actor snapshot after a profile reload.
    pub fn refresh(&self, actor: Actor) {
        self.mutate(|state| state.actor = Some(actor));
    }

    /// Replace the signed-in actor's roles (e.g. after a role change pushed
    /// by the backend). No-op when signed out.
    pub fn set_roles(&self, roles: impl IntoIterator<Item = Role>) {
        let roles: Vec<Role> = roles.into_iter().collect();
        self.mutate(|state| {
            if let Some(actor) = state.actor.as_mut() {
                actor.roles = roles;
            }
        });
    }

    /// Set or clear (`None`) the signed-in actor's membership in a group.
    pub fn set_membership(&self, group_id: impl Into<GroupId>, role: Option<MembershipRole>) {
        let group_id = group_id.into();
        self.mutate(|state| {
            if let Some(actor) = state.actor.as_mut() {
                match role {
                    Some(role) => {
                        actor.memberships.insert(group_id, role);
                    }
                    None => {
                        actor.memberships.remove(&group_id);
                    }
                }
            }
        });
    }

    /// Make subsequent lookups fail (backend outage / offline).
    pub fn fail_with(&self, err: LookupError) {
        self.mutate(|state| state.failure = Some(err));
    }

    pub fn recover(&self) {
        self.mutate(|state| state.failure = None);
    }

    fn mutate(&self, f: impl FnOnce(&mut SessionState)) {
        let revision = match self.state.write() {
            Ok(mut state) => {
                f(&mut *state);
                state.revision += 1;
                let revision = state.revision;
                if let Some(actor) = state.actor.as_mut() {
                    actor.revision = revision;
                }
                revision
            }
            Err(_) => {
                tracing::error!("session state lock poisoned; mutation dropped");
                return;
            }
        };
        self.revisions.send_replace(revision);
    }
}

#[async_trait]
impl ActorProvider for SessionStore {
    async fn current_actor(&self) -> Result<Option<Actor>, LookupError> {
        let state = self
            .state
            .read()
            .map_err(|_| LookupError::Session("session state poisoned".to_string()))?;
        if let Some(err) = &state.failure {
            return Err(err.clone());
        }
        Ok(state.actor.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_mutation_bumps_revision() {
        let store = SessionStore::signed_in(Actor::new("user-1").with_roles([Role::MEMBER]));
        let first = store.current_actor().await.unwrap().unwrap();

        store.set_roles([Role::MEMBER, Role::GROUP_LEADER]);
        let second = store.current_actor().await.unwrap().unwrap();

        assert!(second.revision > first.revision);
        assert!(second.has_role(&Role::GROUP_LEADER));
        assert_eq!(store.revision(), second.revision);
    }

    #[tokio::test]
    async fn sign_out_clears_actor() {
        let store = SessionStore::signed_in(Actor::new("user-1"));
        store.sign_out();
        assert!(store.current_actor().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failure_is_reported_until_recovered() {
        let store = SessionStore::signed_in(Actor::new("user-1"));
        store.fail_with(LookupError::Unavailable);
        assert_eq!(store.current_actor().await.unwrap_err(), LookupError::Unavailable);

        store.recover();
        assert!(store.current_actor().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn subscribers_see_revision_changes() {
        let store = SessionStore::new();
        let mut rx = store.subscribe();
        store.sign_in(Actor::new("user-1"));
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), store.revision());
    }
}
