//! `fellowship-auth` — role/permission evaluation for the church community
//! platform.
//!
//! This crate only reads actor state; roles are assigned elsewhere. Every
//! check fails closed: unknown roles, unknown permissions, missing actors and
//! lookup failures all resolve to a denial with a user-facing reason.

pub mod actor;
pub mod admin;
pub mod cache;
pub mod check;
pub mod config;
pub mod directory;
pub mod error;
pub mod explain;
pub mod gate;
pub mod guard;
pub mod matrix;
pub mod permissions;
pub mod roles;
pub mod service;
pub mod session;

pub use actor::{Actor, MembershipRole};
pub use admin::{AdminGroupsScreen, AdminView, GroupSource};
pub use cache::CheckCache;
pub use check::PermissionCheck;
pub use config::AuthConfig;
pub use directory::{GroupDirectory, GroupRecord, InMemoryGroupDirectory};
pub use error::{ActionError, LookupError};
pub use explain::{AuthorizationExplanation, DenialKind, explain};
pub use gate::{Gate, GateCheck, GateState};
pub use guard::{IntoCheck, MembershipActions, MembershipMutations, guarded};
pub use matrix::{PermissionMatrix, RbacRegistry};
pub use permissions::{Permission, Scope};
pub use roles::Role;
pub use service::PermissionService;
pub use session::{ActorProvider, SessionStore};
