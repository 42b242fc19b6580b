//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sitecrew_auth::{CredentialVerifier, CsrfGuard, LoginService, LoginThrottle, SessionManager};
use sitecrew_core::config::AppConfig;
use sitecrew_core::result::AppResult;
use sitecrew_core::traits::PasswordHashing;
use sitecrew_service::{AdminUserService, DashboardService, ProfileService};
use sitecrew_store::Stores;

/// Path of the login endpoint, the only state-changing route without a CSRF check.
pub const LOGIN_ROUTE: &str = "/api/auth/login";

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    pub config: Arc<AppConfig>,

    // ── Storage ──────────────────────────────────────────────
    /// Entity repositories and the security log
    pub stores: Stores,

    // ── Auth ─────────────────────────────────────────────────
    pub sessions: Arc<SessionManager>,
    pub throttle: Arc<LoginThrottle>,
    pub login_service: Arc<LoginService>,
    pub csrf_guard: Arc<CsrfGuard>,

    // ── Services ─────────────────────────────────────────────
    pub user_admin: Arc<AdminUserService>,
    pub profiles: Arc<ProfileService>,
    pub dashboard: Arc<DashboardService>,
}

impl AppState {
    /// Wires the auth components and services on top of loaded stores.
    pub fn new(config: AppConfig, stores: Stores, hasher: Arc<dyn PasswordHashing>) -> AppResult<Self> {
        let sessions = Arc::new(SessionManager::new(&config.session));
        let throttle = Arc::new(LoginThrottle::new(&config.auth));
        let verifier = Arc::new(CredentialVerifier::new(Arc::clone(&stores.users), hasher)?);

        let login_service = Arc::new(LoginService::new(
            Arc::clone(&throttle),
            verifier,
            Arc::clone(&sessions),
            Arc::clone(&stores.users),
            Arc::clone(&stores.security_log),
        ));
        let user_admin = Arc::new(AdminUserService::new(
            Arc::clone(&stores.users),
            Arc::clone(&stores.workers),
            Arc::clone(&sessions),
        ));
        let profiles = Arc::new(ProfileService::new(Arc::clone(&stores.users)));
        let dashboard = Arc::new(DashboardService::new(
            Arc::clone(&stores.workers),
            Arc::clone(&stores.objects),
            Arc::clone(&stores.schedule),
        ));

        Ok(Self {
            config: Arc::new(config),
            stores,
            sessions,
            throttle,
            login_service,
            csrf_guard: Arc::new(CsrfGuard::new([LOGIN_ROUTE])),
            user_admin,
            profiles,
            dashboard,
        })
    }
}
