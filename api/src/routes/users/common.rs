use common::FieldErrors;
use db::models::user::{self, Role};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::str::FromStr;
use validator::Validate;

use crate::routes::auth::common::{USERNAME_REGEX, role_choices};
use crate::routes::common::{REQUIRED, form_context};

pub const ALL_ROLES: [Role; 3] = [Role::Admin, Role::Faculty, Role::Student];

/// Admin edit of an existing account. Passwords are not touched here.
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct EditUserForm {
    #[validate(
        length(min = 1, max = 150, message = "Required. 150 characters or fewer."),
        regex(
            path = *USERNAME_REGEX,
            message = "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
        )
    )]
    pub username: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    pub role: String,
    #[validate(length(max = 100, message = "Ensure this value has at most 100 characters."))]
    pub department: String,
    #[validate(length(max = 15, message = "Ensure this value has at most 15 characters."))]
    pub phone: String,
    #[validate(length(max = 20, message = "Ensure this value has at most 20 characters."))]
    pub enrollment_no: String,
}

impl EditUserForm {
    pub fn from_model(user: &user::Model) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role.to_string(),
            department: user.department.clone().unwrap_or_default(),
            phone: user.phone.clone().unwrap_or_default(),
            enrollment_no: user.enrollment_no.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct PasswordForm {
    pub old_password: String,
    #[validate(length(min = 8, message = "This password is too short. It must contain at least 8 characters."))]
    pub new_password1: String,
    #[validate(must_match(other = "new_password1", message = "The two password fields didn't match."))]
    pub new_password2: String,
}

/// Any known role, case-insensitive. Used where an admin picks the role.
pub fn parse_role(raw: &str, errors: &mut FieldErrors) -> Option<Role> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.add("role", REQUIRED);
        return None;
    }
    Role::from_str(raw)
        .map_err(|_| {
            errors.add(
                "role",
                format!("Select a valid choice. {raw} is not one of the available choices."),
            )
        })
        .ok()
}

/// Form context with the full role list. `extra` must be a JSON object.
pub fn user_form_context<F: Serialize>(form: &F, errors: &FieldErrors, mut extra: Value) -> Value {
    if let Value::Object(map) = &mut extra {
        map.insert("roles".into(), json!(role_choices(&ALL_ROLES)));
    }
    form_context(form, errors, extra)
}
