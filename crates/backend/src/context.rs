//! Per-request caller identity forwarded to the backend.

use clinica_core::TenantId;
use secrecy::{ExposeSecret, SecretString};

/// Cookie holding the caller's bearer token.
pub const AUTH_TOKEN_COOKIE: &str = "auth_token";

/// Cookie holding the caller's tenant id.
pub const CLIENT_ID_COOKIE: &str = "client_id";

/// Header the backend reads the tenant id from.
pub const CLIENT_ID_HEADER: &str = "x-client-id";

/// Credentials and tenant for one inbound request.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone, Default)]
pub struct RequestContext {
    auth_token: Option<SecretString>,
    client_id: Option<TenantId>,
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("client_id", &self.client_id)
            .finish()
    }
}

impl RequestContext {
    #[must_use]
    pub const fn new(auth_token: Option<SecretString>, client_id: Option<TenantId>) -> Self {
        Self {
            auth_token,
            client_id,
        }
    }

    /// Context with no token and no tenant.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Build a context from parsed cookie name/value pairs.
    ///
    /// Blank values count as absent. The last occurrence of a cookie wins.
    #[must_use]
    pub fn from_cookies<'a, I>(cookies: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut ctx = Self::default();
        for (name, value) in cookies {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match name {
                AUTH_TOKEN_COOKIE => {
                    ctx.auth_token = Some(SecretString::from(value.to_string()));
                }
                CLIENT_ID_COOKIE => ctx.client_id = Some(TenantId::new(value)),
                _ => {}
            }
        }
        ctx
    }

    /// Fill in the tenant when the request did not carry one.
    #[must_use]
    pub fn with_default_client(mut self, default: Option<&TenantId>) -> Self {
        if self.client_id.is_none() {
            self.client_id = default.cloned();
        }
        self
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.auth_token.is_some()
    }

    #[must_use]
    pub const fn client_id(&self) -> Option<&TenantId> {
        self.client_id.as_ref()
    }

    /// Token value for the `Authorization` header.
    pub(crate) fn bearer_token(&self) -> Option<&str> {
        self.auth_token.as_ref().map(|token| token.expose_secret())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cookies() {
        let ctx = RequestContext::from_cookies([
            ("theme", "dark"),
            (AUTH_TOKEN_COOKIE, "tok-123"),
            (CLIENT_ID_COOKIE, "clinic-7"),
        ]);
        assert!(ctx.is_authenticated());
        assert_eq!(ctx.bearer_token(), Some("tok-123"));
        assert_eq!(ctx.client_id().map(TenantId::as_str), Some("clinic-7"));
    }

    #[test]
    fn test_blank_cookie_is_absent() {
        let ctx = RequestContext::from_cookies([(AUTH_TOKEN_COOKIE, "  ")]);
        assert!(!ctx.is_authenticated());
    }

    #[test]
    fn test_default_client_only_fills_gap() {
        let fallback = TenantId::new("default");

        let ctx = RequestContext::anonymous().with_default_client(Some(&fallback));
        assert_eq!(ctx.client_id(), Some(&fallback));

        let ctx = RequestContext::from_cookies([(CLIENT_ID_COOKIE, "mine")])
            .with_default_client(Some(&fallback));
        assert_eq!(ctx.client_id().map(TenantId::as_str), Some("mine"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let ctx = RequestContext::from_cookies([(AUTH_TOKEN_COOKIE, "very-secret")]);
        let debug = format!("{ctx:?}");
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("REDACTED"));
    }
}
