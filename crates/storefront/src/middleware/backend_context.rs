//! Extractor for the caller identity forwarded to the backend.

use axum::{
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts},
};
use tower_sessions::cookie::Cookie;

use clinica_backend::RequestContext;

use crate::state::AppState;

/// The caller's backend credentials, read from the `auth_token` and
/// `client_id` cookies.
///
/// Missing tenant falls back to the configured default client id.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Caller(ctx): Caller, State(state): State<AppState>) -> Result<...> {
///     state.backend().list_orders(&ctx, &OrderQuery::default()).await
/// }
/// ```
pub struct Caller(pub RequestContext);

impl FromRequestParts<AppState> for Caller {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = context_from_parts(parts)
            .with_default_client(state.config().backend.default_client_id.as_ref());
        Ok(Self(ctx))
    }
}

/// Parse every `Cookie` header into a request context.
fn context_from_parts(parts: &Parts) -> RequestContext {
    let cookies: Vec<Cookie<'_>> = parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| Cookie::split_parse(header).filter_map(Result::ok))
        .collect();

    RequestContext::from_cookies(cookies.iter().map(|c| (c.name(), c.value())))
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    #[test]
    fn test_context_from_cookie_header() {
        let request = Request::builder()
            .header(COOKIE, "clinica_session=abc; auth_token=tok; client_id=tenant-9")
            .body(())
            .unwrap_or_default();
        let (parts, ()) = request.into_parts();
        let ctx = context_from_parts(&parts);
        assert!(ctx.is_authenticated());
        assert_eq!(ctx.client_id().map(|id| id.as_str()), Some("tenant-9"));
    }

    #[test]
    fn test_context_without_cookies() {
        let request = Request::builder().body(()).unwrap_or_default();
        let (parts, ()) = request.into_parts();
        let ctx = context_from_parts(&parts);
        assert!(!ctx.is_authenticated());
        assert!(ctx.client_id().is_none());
    }
}
