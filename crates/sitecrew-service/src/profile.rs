//! Self-service profile edits for the signed-in user.

use std::sync::Arc;

use tracing::info;

use sitecrew_core::result::AppResult;
use sitecrew_core::traits::Repository;
use sitecrew_entity::User;
use sitecrew_store::repositories::UserRepository;

use crate::context::RequestContext;

/// Fields a user may change on their own account. Role is not one of them.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub username: String,
    pub name: String,
    /// Blank or absent keeps the current password.
    pub password: Option<String>,
    pub phone: String,
}

pub struct ProfileService {
    users: Arc<UserRepository>,
}

impl ProfileService {
    pub fn new(users: Arc<UserRepository>) -> Self {
        Self { users }
    }

    pub async fn get_profile(&self, ctx: &RequestContext) -> AppResult<User> {
        self.users.find_by_id(&ctx.user_id).await
    }

    pub async fn update_profile(&self, ctx: &RequestContext, input: ProfileUpdate) -> AppResult<User> {
        let mut user = self.users.find_by_id(&ctx.user_id).await?;
        user.username = input.username;
        user.name = input.name;
        user.phone = input.phone;
        user.password_hash = input
            .password
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_default();

        let updated = self.users.update(user).await?;
        info!(user_id = %updated.id, username = %updated.username, "Profile updated");
        Ok(updated)
    }
}
