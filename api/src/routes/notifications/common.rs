use common::FieldErrors;
use db::models::notification::TargetRole;
use db::models::user::Role;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::str::FromStr;
use validator::Validate;

use crate::auth::policy::allowed_target_roles;
use crate::routes::common::{Choice, REQUIRED, checkbox, form_context};

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct NotificationForm {
    #[validate(length(min = 1, max = 200, message = "Ensure this value has between 1 and 200 characters."))]
    pub title: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub message: String,
    pub target_role: String,
    /// Absent when the checkbox is unticked.
    #[serde(default)]
    pub is_active: Option<String>,
}

impl Default for NotificationForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            message: String::new(),
            target_role: TargetRole::default().to_string(),
            is_active: Some("on".into()),
        }
    }
}

#[derive(Debug)]
pub struct CleanNotification {
    pub title: String,
    pub message: String,
    pub target_role: TargetRole,
    pub is_active: bool,
}

impl NotificationForm {
    pub fn clean(&self) -> Result<CleanNotification, FieldErrors> {
        let mut errors = FieldErrors::new();
        if let Err(e) = self.validate() {
            errors.extend_from(&e);
        }
        for (field, value) in [("title", &self.title), ("message", &self.message)] {
            if value.trim().is_empty() && errors.get(field).is_none() {
                errors.add(field, REQUIRED);
            }
        }

        let raw = self.target_role.trim();
        let target_role = if raw.is_empty() {
            Some(TargetRole::default())
        } else {
            TargetRole::from_str(raw)
                .map_err(|_| errors.add("target_role", "Select a valid choice."))
                .ok()
        };

        match target_role {
            Some(target_role) if errors.is_empty() => Ok(CleanNotification {
                title: self.title.clone(),
                message: self.message.clone(),
                target_role,
                is_active: checkbox(self.is_active.as_deref()),
            }),
            _ => Err(errors),
        }
    }
}

pub fn target_role_choices(role: Role) -> Vec<Choice> {
    allowed_target_roles(role)
        .into_iter()
        .map(|t| Choice::new(t, t.label()))
        .collect()
}

pub fn notification_form_context(role: Role, form: &NotificationForm, errors: &FieldErrors) -> Value {
    form_context(
        form,
        errors,
        json!({ "target_roles": target_role_choices(role) }),
    )
}
