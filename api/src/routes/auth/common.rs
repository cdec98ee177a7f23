use common::FieldErrors;
use db::models::user::Role;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::str::FromStr;
use validator::Validate;

use crate::routes::common::{Choice, form_context};

lazy_static::lazy_static! {
    pub static ref USERNAME_REGEX: regex::Regex =
        regex::Regex::new(r"^[A-Za-z0-9@.+_-]+$").expect("username pattern compiles");
}

#[derive(Debug, Default, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct RegisterForm {
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

    #[serde(skip_serializing)]
    #[validate(length(min = 8, message = "This password is too short. It must contain at least 8 characters."))]
    pub password1: String,

    #[serde(skip_serializing)]
    #[validate(must_match(other = "password1", message = "The two password fields didn't match."))]
    pub password2: String,

    pub role: String,

    #[validate(length(max = 15, message = "Ensure this value has at most 15 characters."))]
    pub phone: String,

    #[validate(length(max = 20, message = "Ensure this value has at most 20 characters."))]
    pub enrollment_no: String,

    #[validate(length(max = 100, message = "Ensure this value has at most 100 characters."))]
    pub department: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

/// Roles an anonymous visitor may pick for themselves. Admins are only created by admins.
pub const SELF_SERVICE_ROLES: [Role; 2] = [Role::Student, Role::Faculty];

/// Blank selects the default role.
pub fn parse_self_service_role(raw: &str) -> Result<Role, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Role::default());
    }
    match Role::from_str(raw) {
        Ok(role) if SELF_SERVICE_ROLES.contains(&role) => Ok(role),
        _ => Err(format!(
            "Select a valid choice. {raw} is not one of the available choices."
        )),
    }
}

pub fn role_choices(roles: &[Role]) -> Vec<Choice> {
    roles.iter().map(|r| Choice::new(r, r.label())).collect()
}

pub fn register_context(form: &RegisterForm, errors: &FieldErrors) -> Value {
    form_context(
        form,
        errors,
        json!({ "roles": role_choices(&SELF_SERVICE_ROLES) }),
    )
}
