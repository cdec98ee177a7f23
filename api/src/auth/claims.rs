use db::models::user::{self, Role};
use serde::{Deserialize, Serialize};

use crate::auth::policy::{self, Action};
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: i64,
    pub exp: usize,
    pub role: Role,
}

/// The authenticated actor of the current request.
///
/// Inserted into request extensions by [`crate::auth::guards::allow_authenticated`]
/// after the user row has been reloaded, so `role` always reflects the store.
#[derive(Debug, Clone, Serialize)]
pub struct RequestContext {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
}

impl RequestContext {
    /// Fails with a flash-and-redirect error when the role may not perform `action`.
    pub fn require(&self, action: Action) -> Result<(), AppError> {
        if policy::allows(self.role, action) {
            Ok(())
        } else {
            tracing::info!(
                user_id = self.user_id,
                role = %self.role,
                action = ?action,
                "Denied by policy"
            );
            Err(AppError::Forbidden(policy::denial_message(action).to_string()))
        }
    }
}

impl From<&user::Model> for RequestContext {
    fn from(user: &user::Model) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            role: user.role,
        }
    }
}
