//! Admin user management: accounts, their worker profiles, and sessions.

use std::sync::Arc;

use tracing::{info, warn};

use sitecrew_auth::SessionManager;
use sitecrew_core::config::auth::BootstrapAdminConfig;
use sitecrew_core::error::AppError;
use sitecrew_core::result::AppResult;
use sitecrew_core::traits::Repository;
use sitecrew_core::types::id::{UserId, WorkerId};
use sitecrew_entity::{User, UserRole, Worker};
use sitecrew_store::repositories::{UserRepository, WorkerRepository};

use crate::context::RequestContext;

/// Position given to the worker profile created alongside a regular user.
pub const DEFAULT_WORKER_POSITION: &str = "Employee";

/// Handles administrative user management operations.
pub struct AdminUserService {
    users: Arc<UserRepository>,
    workers: Arc<WorkerRepository>,
    sessions: Arc<SessionManager>,
}

/// Input for creating a user.
#[derive(Debug, Clone, Default)]
pub struct CreateUserInput {
    pub username: String,
    pub password: String,
    pub name: String,
    pub phone: String,
    pub role: UserRole,
    /// Existing worker to link instead of creating a new profile.
    pub worker_id: Option<WorkerId>,
}

/// Input for updating a user. A blank password keeps the current one.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserInput {
    pub username: String,
    pub password: Option<String>,
    pub name: String,
    pub phone: String,
    pub role: UserRole,
}

impl AdminUserService {
    /// Creates a new admin user service.
    pub fn new(
        users: Arc<UserRepository>,
        workers: Arc<WorkerRepository>,
        sessions: Arc<SessionManager>,
    ) -> Self {
        Self {
            users,
            workers,
            sessions,
        }
    }

    /// Lists all users, ordered by display name.
    pub async fn list_users(&self, ctx: &RequestContext) -> AppResult<Vec<User>> {
        ctx.require_admin()?;
        Ok(self.users.find_all().await)
    }

    pub async fn get_user(&self, ctx: &RequestContext, id: &UserId) -> AppResult<User> {
        ctx.require_admin()?;
        self.users.find_by_id(id).await
    }

    /// Creates a user. A regular user always ends up with a worker profile:
    /// the one named by `worker_id`, or a fresh one.
    pub async fn create_user(&self, ctx: &RequestContext, input: CreateUserInput) -> AppResult<User> {
        ctx.require_admin()?;

        if input.role == UserRole::User {
            if let Some(worker_id) = &input.worker_id {
                let worker = self.workers.find_by_id(worker_id).await?;
                if !worker.is_active() {
                    return Err(AppError::validation("a fired worker cannot be linked to a user"));
                }
            }
        }

        let mut user = User::new(input.username, input.password, input.name, input.role);
        user.phone = input.phone;
        let user = self.users.create(user).await?;

        if user.role == UserRole::User {
            if let Err(e) = self.attach_worker(ctx, &user, input.worker_id.as_ref()).await {
                warn!(user_id = %user.id, error = %e, "Worker link failed, removing new user");
                if let Err(cleanup) = self.users.delete(&user.id).await {
                    warn!(user_id = %user.id, error = %cleanup, "Failed to remove user after link failure");
                }
                return Err(e);
            }
        }

        info!(
            admin_id = %ctx.user_id,
            user_id = %user.id,
            username = %user.username,
            role = %user.role,
            "User created"
        );
        Ok(user)
    }

    async fn attach_worker(
        &self,
        ctx: &RequestContext,
        user: &User,
        worker_id: Option<&WorkerId>,
    ) -> AppResult<Worker> {
        if let Some(worker_id) = worker_id {
            return self.workers.link_user(worker_id, &user.id).await;
        }
        let mut worker = Worker::new(user.name.clone(), DEFAULT_WORKER_POSITION);
        worker.phone = user.phone.clone();
        worker.user_id = Some(user.id.clone());
        worker.created_by = Some(ctx.user_id.clone());
        worker.created_by_name = ctx.name.clone();
        self.workers.create(worker).await
    }

    /// Updates a user's profile, role and optionally password.
    pub async fn update_user(
        &self,
        ctx: &RequestContext,
        id: &UserId,
        input: UpdateUserInput,
    ) -> AppResult<User> {
        ctx.require_admin()?;
        let stored = self.users.find_by_id(id).await?;

        if &ctx.user_id == id && stored.is_admin() && input.role != UserRole::Admin {
            return Err(AppError::validation("You cannot remove your own admin role"));
        }

        let mut user = stored;
        user.username = input.username;
        user.name = input.name;
        user.phone = input.phone;
        user.role = input.role;
        user.password_hash = input
            .password
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_default();

        let updated = self.users.update(user).await?;
        info!(admin_id = %ctx.user_id, user_id = %updated.id, "User updated");
        Ok(updated)
    }

    /// Deletes a user, unlinking its worker profiles and ending its sessions.
    pub async fn delete_user(&self, ctx: &RequestContext, id: &UserId) -> AppResult<()> {
        ctx.require_admin()?;
        if &ctx.user_id == id {
            return Err(AppError::validation("You cannot delete your own account"));
        }
        self.users.find_by_id(id).await?;

        let unlinked = self.workers.clear_user_link(id).await?;
        let revoked = self.sessions.revoke_user(id).await;
        self.users.delete(id).await?;

        info!(
            admin_id = %ctx.user_id,
            user_id = %id,
            unlinked,
            revoked,
            "User deleted"
        );
        Ok(())
    }

    /// Creates the configured admin account when the user store is empty.
    /// Returns the created user, if any.
    pub async fn bootstrap_admin(&self, config: Option<&BootstrapAdminConfig>) -> AppResult<Option<User>> {
        if self.users.count().await > 0 {
            return Ok(None);
        }
        let Some(config) = config else {
            warn!("User store is empty and no bootstrap admin is configured");
            return Ok(None);
        };
        if config.username.trim().is_empty() || config.password.is_empty() {
            return Err(AppError::configuration(
                "bootstrap admin requires a username and password",
            ));
        }

        let admin = self
            .users
            .create(User::new(
                config.username.clone(),
                config.password.clone(),
                config.name.clone(),
                UserRole::Admin,
            ))
            .await?;
        info!(user_id = %admin.id, username = %admin.username, "Bootstrap admin created");
        Ok(Some(admin))
    }
}
