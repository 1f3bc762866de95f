// HTTP middleware
// Author: kelexine (https://github.com/kelexine)

use super::routes::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

/// Create request ID layers for the application
pub fn request_id_layers() -> (SetRequestIdLayer<MakeRequestUuid>, PropagateRequestIdLayer) {
    (
        SetRequestIdLayer::x_request_id(MakeRequestUuid),
        PropagateRequestIdLayer::x_request_id(),
    )
}

/// Attach the caller's session to the request, starting a new one when the
/// cookie is absent or no longer known. Handlers read it as
/// `Extension<Arc<SessionState>>`.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(req.headers());
    let cookie_name = state.config.session.cookie_name.clone();
    let (session, origin) = state
        .sessions
        .resolve(jar.get(&cookie_name).map(|cookie| cookie.value()));

    req.extensions_mut().insert(session.clone());
    let response = next.run(req).await;

    if !origin.is_new() {
        return response;
    }

    let cookie = Cookie::build((cookie_name, session.id().to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    (jar.add(cookie), response).into_response()
}
