//! Role capability table.
//!
//! Every gated handler asks this module, never the role directly. Ownership of
//! events is a second check on top of the table.

use db::models::{event, notification::TargetRole, user::Role};
use std::collections::BTreeSet;

use crate::auth::RequestContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateEvent,
    /// Edit or delete. Faculty are further limited to their own events.
    ModifyEvent,
    EnterMarks,
    CreateNotification,
    ManageUsers,
    ViewOwnRecords,
    RequestRevaluation,
}

pub fn allows(role: Role, action: Action) -> bool {
    match action {
        Action::CreateEvent
        | Action::ModifyEvent
        | Action::EnterMarks
        | Action::CreateNotification => matches!(role, Role::Admin | Role::Faculty),
        Action::ManageUsers => role == Role::Admin,
        Action::ViewOwnRecords | Action::RequestRevaluation => role == Role::Student,
    }
}

pub fn can_modify_event(actor: &RequestContext, event: &event::Model) -> bool {
    allows(actor.role, Action::ModifyEvent)
        && (actor.role == Role::Admin || event.created_by == actor.user_id)
}

/// Audiences a role may address. Empty for roles that cannot notify at all.
pub fn allowed_target_roles(role: Role) -> BTreeSet<TargetRole> {
    match role {
        Role::Admin => [
            TargetRole::All,
            TargetRole::Student,
            TargetRole::Faculty,
            TargetRole::Admin,
        ]
        .into_iter()
        .collect(),
        Role::Faculty => [TargetRole::All, TargetRole::Student].into_iter().collect(),
        Role::Student => BTreeSet::new(),
    }
}

pub fn denial_message(action: Action) -> &'static str {
    match action {
        Action::CreateEvent => "You do not have permission to create events",
        Action::ModifyEvent => "You do not have permission to modify this event",
        Action::EnterMarks => "You do not have permission to enter marks",
        Action::CreateNotification => "Only admins and faculty can create notifications",
        Action::ManageUsers | Action::ViewOwnRecords => "Unauthorized",
        Action::RequestRevaluation => "Invalid request",
    }
}
