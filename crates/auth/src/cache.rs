//! Optional memoization of check results.
//!
//! Entries are keyed by actor id *and* actor revision, so a role or session
//! change can never be answered from an entry recorded before it. Lookup
//! failures are not cached.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use fellowship_core::UserId;

use crate::{Actor, PermissionCheck};

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<(UserId, u64, String), PermissionCheck>,
    /// Latest revision seen per actor.
    revisions: HashMap<UserId, u64>,
}

#[derive(Debug, Clone)]
pub struct CheckCache {
    state: Arc<Mutex<CacheState>>,
    capacity: usize,
}

impl CheckCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState::default())),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, actor: &Actor, key: &str) -> Option<PermissionCheck> {
        let mut state = self.state.lock().ok()?;
        Self::observe_revision(&mut state, actor);
        state
            .entries
            .get(&(actor.id.clone(), actor.revision, key.to_string()))
            .cloned()
    }

    pub fn insert(&self, actor: &Actor, key: &str, check: PermissionCheck) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        Self::observe_revision(&mut state, actor);
        // A concurrent check may have started before a revision bump; never
        // record results for a superseded snapshot.
        if state.revisions.get(&actor.id).is_some_and(|latest| *latest > actor.revision) {
            return;
        }
        if state.entries.len() >= self.capacity {
            state.entries.clear();
        }
        state
            .entries
            .insert((actor.id.clone(), actor.revision, key.to_string()), check);
    }

    /// Drop everything (sign-out, explicit invalidation by the auth layer).
    pub fn invalidate(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.entries.clear();
            state.revisions.clear();
        }
    }

    pub fn invalidate_actor(&self, actor_id: &UserId) {
        if let Ok(mut state) = self.state.lock() {
            state.entries.retain(|(id, _, _), _| id != actor_id);
            state.revisions.remove(actor_id);
        }
    }

    pub fn len(&self) -> usize {
        self.state.lock().map(|s| s.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn observe_revision(state: &mut CacheState, actor: &Actor) {
        let latest = state.revisions.entry(actor.id.clone()).or_insert(actor.revision);
        if actor.revision > *latest {
            *latest = actor.revision;
            let id = actor.id.clone();
            let revision = actor.revision;
            state
                .entries
                .retain(|(entry_id, entry_rev, _), _| *entry_id != id || *entry_rev == revision);
        }
    }
}
