//! Session resolution: turns the session cookie into a `RequestContext`.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use tracing::{debug, warn};

use sitecrew_auth::SessionLookup;
use sitecrew_core::error::ErrorKind;
use sitecrew_core::traits::Repository;
use sitecrew_service::context::RequestContext;

use crate::cookies::session_token;
use crate::extractors::ClientOrigin;
use crate::state::AppState;

/// Attaches a `RequestContext` extension when the request carries a live
/// session. Never rejects; handlers decide through `AuthUser`.
pub async fn resolve_session(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let Some(token) = session_token(request.headers(), &state.config.auth.cookie_name) else {
        return next.run(request).await;
    };

    match state.sessions.lookup_at(&token, Utc::now()).await {
        SessionLookup::Active(session) => match state.stores.users.find_by_id(&session.user_id).await {
            Ok(user) => {
                let origin = ClientOrigin::resolve(request.headers(), request.extensions());
                let ctx = RequestContext::new(&session, &user, origin.0);
                request.extensions_mut().insert(ctx);
            }
            Err(e) if e.kind == ErrorKind::NotFound => {
                warn!(user_id = %session.user_id, "Session owner no longer exists, revoking");
                state.sessions.revoke(&token).await;
            }
            Err(e) => warn!(error = %e, "Failed to load session owner"),
        },
        SessionLookup::Expired => debug!("Session expired"),
        SessionLookup::Missing => debug!("Unknown session token"),
    }

    next.run(request).await
}
