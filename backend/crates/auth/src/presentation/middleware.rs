//! Auth Middleware
//!
//! Runs before every request outside the public prefix:
//! 1. resolve the session from the signed cookie (401 when missing,
//!    unverifiable, unknown or expired)
//! 2. rotate sessions past the refresh threshold
//! 3. reject POST/PUT/DELETE from non-ADMIN callers (403)
//! 4. attach `AuthContext` to the request extensions
//!
//! A rotated session's cookie is written on the response, including a 403,
//! since the old session no longer exists at that point.

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::CheckSessionUseCase;
use crate::domain::repository::AuthSessionRepository;
use crate::presentation::handlers::session_cookie;

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState<R>
where
    R: AuthSessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

/// Middleware that requires a valid auth session.
///
/// Install with `axum::middleware::from_fn_with_state`.
pub async fn require_auth_session<R>(
    State(state): State<AuthMiddlewareState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Response
where
    R: AuthSessionRepository + Clone + Send + Sync + 'static,
{
    if state.config.is_public_path(req.uri().path()) {
        return next.run(req).await;
    }

    let token = platform::cookie::extract_cookie(req.headers(), &state.config.session_cookie_name);

    let use_case = CheckSessionUseCase::new(state.repo.clone(), state.config.clone());

    let context = match use_case.execute(token.as_deref()).await {
        Ok(context) => context,
        Err(e) => return e.into_response(),
    };

    let refreshed_cookie = context.new_session.as_ref().map(|session| {
        session_cookie(&state.config, &use_case.token_for(session), session)
    });

    let mut response = match context.authorize(req.method()) {
        Ok(()) => {
            req.extensions_mut().insert(context);
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!(
                user_id = %context.user.user_id,
                method = %req.method(),
                path = %req.uri().path(),
                "Request rejected by role policy"
            );
            e.into_response()
        }
    };

    if let Some(cookie) = refreshed_cookie.as_deref().and_then(platform::cookie::to_header_value) {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }

    response
}
