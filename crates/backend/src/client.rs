//! HTTP plumbing shared by every backend resource.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use clinica_core::ApiResponse;

use crate::config::BackendConfig;
use crate::context::{CLIENT_ID_HEADER, RequestContext};
use crate::error::BackendError;

/// Longest slice of a response body written to the logs.
const LOGGED_BODY_CHARS: usize = 500;

// =============================================================================
// BackendClient
// =============================================================================

/// Client for the Clinica REST backend.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Http` if the HTTP client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client,
                base_url: config.base_url.clone(),
            }),
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Build an endpoint URL from path segments, percent-encoding each one.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::CannotBeABase` if the base URL has no path.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| BackendError::CannotBeABase(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // =========================================================================
    // Verbs
    // =========================================================================

    /// `GET` a resource.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure, non-2xx status or bad JSON.
    pub async fn get<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        segments: &[&str],
    ) -> Result<ApiResponse<T>, BackendError> {
        let builder = self.request(Method::GET, ctx, segments)?;
        Self::execute(builder).await
    }

    /// `GET` a resource with query parameters.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure, non-2xx status or bad JSON.
    pub async fn get_with_query<T, Q>(
        &self,
        ctx: &RequestContext,
        segments: &[&str],
        query: &Q,
    ) -> Result<ApiResponse<T>, BackendError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let builder = self.request(Method::GET, ctx, segments)?.query(query);
        Self::execute(builder).await
    }

    /// `POST` a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure, non-2xx status or bad JSON.
    pub async fn post<T, B>(
        &self,
        ctx: &RequestContext,
        segments: &[&str],
        body: &B,
    ) -> Result<ApiResponse<T>, BackendError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::POST, ctx, segments)?.json(body);
        Self::execute(builder).await
    }

    /// `PATCH` a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure, non-2xx status or bad JSON.
    pub async fn patch<T, B>(
        &self,
        ctx: &RequestContext,
        segments: &[&str],
        body: &B,
    ) -> Result<ApiResponse<T>, BackendError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::PATCH, ctx, segments)?.json(body);
        Self::execute(builder).await
    }

    /// `PUT` a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure, non-2xx status or bad JSON.
    pub async fn put<T, B>(
        &self,
        ctx: &RequestContext,
        segments: &[&str],
        body: &B,
    ) -> Result<ApiResponse<T>, BackendError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::PUT, ctx, segments)?.json(body);
        Self::execute(builder).await
    }

    /// `DELETE` a resource.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` on transport failure, non-2xx status or bad JSON.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        segments: &[&str],
    ) -> Result<ApiResponse<T>, BackendError> {
        let builder = self.request(Method::DELETE, ctx, segments)?;
        Self::execute(builder).await
    }

    /// Check that the backend answers its health endpoint.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the backend is unreachable or unhealthy.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<(), BackendError> {
        let _: ApiResponse<serde_json::Value> =
            self.get(&RequestContext::anonymous(), &["health"]).await?;
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Start a request with the caller's token and tenant attached.
    fn request(
        &self,
        method: Method,
        ctx: &RequestContext,
        segments: &[&str],
    ) -> Result<RequestBuilder, BackendError> {
        let url = self.endpoint(segments)?;
        let mut builder = self.inner.client.request(method, url);

        if let Some(token) = ctx.bearer_token() {
            builder = builder.bearer_auth(token);
        }
        if let Some(client_id) = ctx.client_id() {
            builder = builder.header(CLIENT_ID_HEADER, client_id.as_str());
        }
        Ok(builder)
    }

    /// Send a request and wrap its JSON body in an envelope.
    #[instrument(
        skip(builder),
        fields(method = tracing::field::Empty, url = tracing::field::Empty)
    )]
    async fn execute<T: DeserializeOwned>(
        builder: RequestBuilder,
    ) -> Result<ApiResponse<T>, BackendError> {
        let (client, request) = builder.build_split();
        let request = request?;

        let span = tracing::Span::current();
        span.record("method", request.method().as_str());
        span.record("url", request.url().path());

        let response = client.execute(request).await?;
        let status = response.status();

        // Read the body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %truncate(&body),
                "Backend returned non-success status"
            );
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        if body.trim().is_empty() {
            debug!(status = %status, "Backend returned empty body");
            return Ok(ApiResponse::empty());
        }

        match serde_json::from_str::<T>(&body) {
            Ok(data) => Ok(ApiResponse::ok(data)),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %truncate(&body),
                    "Failed to parse backend response"
                );
                Err(BackendError::Parse(e))
            }
        }
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(LOGGED_BODY_CHARS).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn client(base: &str) -> BackendClient {
        let config = BackendConfig {
            base_url: Url::parse(base).unwrap(),
            default_client_id: None,
            enable_auth: true,
            timeout: Duration::from_secs(5),
        };
        BackendClient::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_joins_under_base_path() {
        let client = client("http://api.local/v1/");
        let url = client.endpoint(&["products", "p-1"]).unwrap();
        assert_eq!(url.as_str(), "http://api.local/v1/products/p-1");
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = client("http://api.local/");
        let url = client.endpoint(&["products", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "http://api.local/products/a%2Fb%20c");
    }

    #[test]
    fn test_request_attaches_identity_headers() {
        let client = client("http://api.local/");
        let ctx = RequestContext::from_cookies([("auth_token", "tok"), ("client_id", "t-1")]);
        let request = client
            .request(Method::GET, &ctx, &["orders"])
            .unwrap()
            .build()
            .unwrap();
        let headers = request.headers();
        assert_eq!(headers[header::AUTHORIZATION], "Bearer tok");
        assert_eq!(headers[CLIENT_ID_HEADER], "t-1");
    }

    #[test]
    fn test_anonymous_request_has_no_identity_headers() {
        let client = client("http://api.local/");
        let request = client
            .request(Method::GET, &RequestContext::anonymous(), &["products"])
            .unwrap()
            .build()
            .unwrap();
        assert!(request.headers().get(header::AUTHORIZATION).is_none());
        assert!(request.headers().get(CLIENT_ID_HEADER).is_none());
    }
}
