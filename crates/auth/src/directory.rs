//! Group ownership and membership lookups.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use fellowship_core::{ChurchId, GroupId, ServiceId, UserId};

use crate::{Actor, LookupError, MembershipRole};

/// Ownership data of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub id: GroupId,
    pub church_id: Option<ChurchId>,
    pub service_id: Option<ServiceId>,
}

impl GroupRecord {
    pub fn new(id: impl Into<GroupId>) -> Self {
        Self {
            id: id.into(),
            church_id: None,
            service_id: None,
        }
    }

    pub fn in_church(mut self, church_id: impl Into<ChurchId>) -> Self {
        self.church_id = Some(church_id.into());
        self
    }

    pub fn in_service(mut self, service_id: impl Into<ServiceId>) -> Self {
        self.service_id = Some(service_id.into());
        self
    }

    /// Whether the group belongs to the actor's service or church.
    ///
    /// A missing id on either side never matches.
    pub fn owned_by_tenant_of(&self, actor: &Actor) -> bool {
        let same_service = matches!(
            (&self.service_id, &actor.service_id),
            (Some(group), Some(own)) if group == own
        );
        let same_church = matches!(
            (&self.church_id, &actor.church_id),
            (Some(group), Some(own)) if group == own
        );
        same_service || same_church
    }
}

#[async_trait]
pub trait GroupDirectory: Send + Sync {
    async fn group(&self, group_id: &GroupId) -> Result<Option<GroupRecord>, LookupError>;

    async fn membership_role(
        &self,
        group_id: &GroupId,
        user_id: &UserId,
    ) -> Result<Option<MembershipRole>, LookupError>;

    /// Number of leader/admin memberships in the group.
    async fn leader_count(&self, group_id: &GroupId) -> Result<usize, LookupError>;
}

#[async_trait]
impl<T: GroupDirectory + ?Sized> GroupDirectory for Arc<T> {
    async fn group(&self, group_id: &GroupId) -> Result<Option<GroupRecord>, LookupError> {
        (**self).group(group_id).await
    }

    async fn membership_role(
        &self,
        group_id: &GroupId,
        user_id: &UserId,
    ) -> Result<Option<MembershipRole>, LookupError> {
        (**self).membership_role(group_id, user_id).await
    }

    async fn leader_count(&self, group_id: &GroupId) -> Result<usize, LookupError> {
        (**self).leader_count(group_id).await
    }
}

#[derive(Debug, Default)]
struct DirectoryState {
    groups: HashMap<GroupId, GroupRecord>,
    members: HashMap<(GroupId, UserId), MembershipRole>,
    failure: Option<LookupError>,
}

/// `RwLock`-backed directory for tests and local wiring.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGroupDirectory {
    inner: Arc<RwLock<DirectoryState>>,
}

impl InMemoryGroupDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_group(&self, group: GroupRecord) {
        if let Ok(mut state) = self.inner.write() {
            state.groups.insert(group.id.clone(), group);
        }
    }

    pub fn set_membership(
        &self,
        group_id: impl Into<GroupId>,
        user_id: impl Into<UserId>,
        role: Option<MembershipRole>,
    ) {
        if let Ok(mut state) = self.inner.write() {
            let key = (group_id.into(), user_id.into());
            match role {
                Some(role) => {
                    state.members.insert(key, role);
                }
                None => {
                    state.members.remove(&key);
                }
            }
        }
    }

    pub fn fail_with(&self, err: LookupError) {
        if let Ok(mut state) = self.inner.write() {
            state.failure = Some(err);
        }
    }

    pub fn recover(&self) {
        if let Ok(mut state) = self.inner.write() {
            state.failure = None;
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, DirectoryState>, LookupError> {
        let state = self
            .inner
            .read()
            .map_err(|_| LookupError::Directory("directory state poisoned".to_string()))?;
        match &state.failure {
            Some(err) => Err(err.clone()),
            None => Ok(state),
        }
    }
}

#[async_trait]
impl GroupDirectory for InMemoryGroupDirectory {
    async fn group(&self, group_id: &GroupId) -> Result<Option<GroupRecord>, LookupError> {
        Ok(self.read()?.groups.get(group_id).cloned())
    }

    async fn membership_role(
        &self,
        group_id: &GroupId,
        user_id: &UserId,
    ) -> Result<Option<MembershipRole>, LookupError> {
        Ok(self
            .read()?
            .members
            .get(&(group_id.clone(), user_id.clone()))
            .copied())
    }

    async fn leader_count(&self, group_id: &GroupId) -> Result<usize, LookupError> {
        Ok(self
            .read()?
            .members
            .iter()
            .filter(|((group, _), role)| group == group_id && role.can_manage())
            .count())
    }
}
