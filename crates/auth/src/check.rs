use serde::{Deserialize, Serialize};

use crate::LookupError;

/// Outcome of every scoped/unscoped permission check.
///
/// Serialises as `{ "hasPermission": bool, "reason"?: string }`. `reason`
/// is set only on denial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionCheck {
    #[serde(rename = "hasPermission")]
    pub granted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl PermissionCheck {
    pub fn granted() -> Self {
        Self {
            granted: true,
            reason: None,
        }
    }

    pub fn denied(reason: impl Into<String>) -> Self {
        Self {
            granted: false,
            reason: Some(reason.into()),
        }
    }

    pub fn is_granted(&self) -> bool {
        self.granted
    }

    /// Denial reason, or a generic fallback if a denial carries none.
    pub fn reason_or_default(&self) -> &str {
        self.reason.as_deref().unwrap_or("You do not have permission to do this.")
    }

    /// Collapse the propagating form into a denial (fail closed).
    pub fn from_lookup(result: Result<PermissionCheck, LookupError>) -> Self {
        match result {
            Ok(check) => check,
            Err(err) => Self::denied(format!("Unable to verify permissions: {err}")),
        }
    }
}

impl From<bool> for PermissionCheck {
    fn from(value: bool) -> Self {
        if value {
            Self::granted()
        } else {
            Self::denied("You do not have permission to do this.")
        }
    }
}

/// Canonical denial messages.
pub(crate) mod reasons {
    use crate::Permission;

    pub const NOT_SIGNED_IN: &str = "You must be signed in to do this.";
    pub const NOT_CHURCH_ADMIN: &str = "Only church administrators can do this.";
    pub const GROUP_NOT_FOUND: &str = "This group could not be found.";

    pub fn missing_permission(permission: &Permission) -> String {
        format!("Your role does not allow '{permission}'.")
    }

    pub fn unknown_permission(permission: &Permission) -> String {
        format!("Unknown permission '{permission}'.")
    }

    pub fn other_church() -> String {
        "You can only access data for your own church.".to_string()
    }

    pub fn not_group_leader() -> String {
        "You are not a leader of this group.".to_string()
    }

    pub fn not_group_manager() -> String {
        "You are not a leader of this group or an administrator of its church.".to_string()
    }
}
