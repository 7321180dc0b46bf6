//! Authentication extractor for admin routes.
//!
//! The admin service does not log users in itself. The `auth_token` cookie
//! issued by the backend is the caller's identity, and it is forwarded on
//! every proxied request. When `ENABLE_AUTH` is off the dev bypass lets
//! anonymous callers through.

use axum::{
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts},
};
use tower_sessions::cookie::Cookie;

use clinica_backend::RequestContext;

use crate::error::AppError;
use crate::state::AppState;

/// Extractor that requires backend credentials when auth is enabled.
///
/// Rejects with a 401 envelope if `ENABLE_AUTH` is on and the request has
/// no `auth_token` cookie. The tenant falls back to the configured default
/// client id.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireBackendAuth(ctx): RequireBackendAuth,
///     State(state): State<AppState>,
/// ) -> Result<Json<ApiResponse<Paginated<Order>>>> {
///     Ok(Json(state.backend().list_orders(&ctx, &OrderQuery::default()).await?))
/// }
/// ```
pub struct RequireBackendAuth(pub RequestContext);

impl FromRequestParts<AppState> for RequireBackendAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = context_from_parts(parts)
            .with_default_client(state.config().backend.default_client_id.as_ref());
        authorize(ctx, state.config().auth_required()).map(Self)
    }
}

/// Apply the auth toggle to a caller.
fn authorize(ctx: RequestContext, auth_required: bool) -> Result<RequestContext, AppError> {
    if auth_required && !ctx.is_authenticated() {
        tracing::debug!("Rejecting admin request without auth_token");
        return Err(AppError::Unauthorized);
    }
    Ok(ctx)
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
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts(cookie: Option<&str>) -> Parts {
        let mut builder = Request::builder();
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_token_required_when_enabled() {
        let ctx = context_from_parts(&parts(None));
        assert!(matches!(authorize(ctx, true), Err(AppError::Unauthorized)));

        let ctx = context_from_parts(&parts(Some("auth_token=tok")));
        assert!(authorize(ctx, true).unwrap().is_authenticated());
    }

    #[test]
    fn test_dev_bypass_when_disabled() {
        let ctx = context_from_parts(&parts(None));
        let ctx = authorize(ctx, false).unwrap();
        assert!(!ctx.is_authenticated());
    }

    #[test]
    fn test_blank_token_is_not_a_credential() {
        let ctx = context_from_parts(&parts(Some("auth_token=; client_id=t1")));
        assert!(matches!(authorize(ctx, true), Err(AppError::Unauthorized)));
    }
}
