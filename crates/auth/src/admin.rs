//! Church-admin group list flow.
//!
//! Decides what the admin groups screen shows before any group data is
//! fetched: members are redirected away, admins of another church see the
//! denial reason, and only an admin of the requested church reaches the
//! group source.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use fellowship_core::ChurchId;

use crate::{GroupRecord, Permission, PermissionService};

/// Backend query listing a church's groups.
#[async_trait]
pub trait GroupSource: Send + Sync {
    async fn groups_for_church(&self, church_id: &ChurchId) -> anyhow::Result<Vec<GroupRecord>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum AdminView {
    /// The actor is not an admin at all; navigate away.
    Redirect { reason: String },
    /// Admin of a different church; show the reason instead of the list.
    Denied { reason: String },
    Groups { groups: Vec<GroupRecord> },
    /// The group fetch itself failed.
    Error { message: String },
}

#[derive(Clone)]
pub struct AdminGroupsScreen {
    service: PermissionService,
    source: Arc<dyn GroupSource>,
}

impl AdminGroupsScreen {
    pub fn new(service: PermissionService, source: impl GroupSource + 'static) -> Self {
        Self {
            service,
            source: Arc::new(source),
        }
    }

    pub async fn load(&self, church_id: &ChurchId) -> AdminView {
        let role_check = self
            .service
            .has_permission(&Permission::MANAGE_CHURCH_GROUPS, None)
            .await;
        if !role_check.granted {
            return AdminView::Redirect {
                reason: role_check.reason_or_default().to_string(),
            };
        }

        let tenant_check = self.service.can_access_church_data(church_id).await;
        if !tenant_check.granted {
            return AdminView::Denied {
                reason: tenant_check.reason_or_default().to_string(),
            };
        }

        match self.source.groups_for_church(church_id).await {
            Ok(groups) => AdminView::Groups { groups },
            Err(err) => {
                tracing::error!(%church_id, error = %err, "failed to load church groups");
                AdminView::Error {
                    message: format!("Could not load groups: {err}"),
                }
            }
        }
    }
}
