//! Signed request dispatch with retries
//!
//! One logical call is one [`RequestSpec`]. The dispatcher turns it into a
//! URL once, then loops: sign with a fresh timestamp, send, classify, and
//! either return, wait and retry, or fail. The whole loop runs under the
//! configured deadline and stops as soon as the cancellation token fires.

use qtrade_auth::{BodySigning, Credentials, RequestSigner, AUTHORIZATION_HEADER, TIMESTAMP_HEADER};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::classify::{classify, Classification};
use crate::error::{RestError, RestResult};
use crate::retry::RetryConfig;

/// Path prefix of endpoints that require credentials
pub const PRIVATE_PREFIX: &str = "/v1/user/";

/// Everything needed to issue one logical API call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl RequestSpec {
    /// Create a request for `path` (e.g. "/v1/user/balances")
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// POST request
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Append one query parameter
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append query parameters in iteration order
    pub fn with_query_pairs<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Serialize `body` as the JSON request body
    pub fn with_json_body<T: Serialize>(mut self, body: &T) -> RestResult<Self> {
        let bytes = serde_json::to_vec(body)
            .map_err(|e| RestError::InvalidParameter(format!("could not encode body: {e}")))?;
        self.body = Some(bytes);
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Check if the endpoint requires credentials
    pub fn is_private(&self) -> bool {
        self.path.starts_with(PRIVATE_PREFIX)
    }
}

/// Path plus `?query` when the query is non-empty; what gets signed
pub fn request_uri(url: &Url) -> String {
    match url.query() {
        Some(query) if !query.is_empty() => format!("{}?{}", url.path(), query),
        _ => url.path().to_string(),
    }
}

struct DispatcherInner {
    http: Client,
    endpoint: String,
    credentials: Option<Credentials>,
    body_signing: BodySigning,
    retry: RetryConfig,
    deadline: Duration,
    cancel: CancellationToken,
}

/// Sends [`RequestSpec`]s with signing, classification and retries
///
/// Cheap to clone; clones share the HTTP connection pool and the
/// cancellation token.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

impl Dispatcher {
    pub fn new(
        http: Client,
        endpoint: impl Into<String>,
        credentials: Option<Credentials>,
        body_signing: BodySigning,
        retry: RetryConfig,
        deadline: Duration,
    ) -> RestResult<Self> {
        if deadline.is_zero() {
            return Err(RestError::Config("deadline must be non-zero".to_string()));
        }

        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Url::parse(&endpoint)
            .map_err(|e| RestError::Config(format!("invalid endpoint {endpoint:?}: {e}")))?;

        Ok(Self {
            inner: Arc::new(DispatcherInner {
                http,
                endpoint,
                credentials,
                body_signing,
                retry,
                deadline,
                cancel: CancellationToken::new(),
            }),
        })
    }

    /// Check if requests will be signed
    pub fn has_credentials(&self) -> bool {
        self.inner.credentials.is_some()
    }

    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.inner.retry
    }

    /// Token that aborts every in-flight and future call of this dispatcher
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.inner.cancel
    }

    /// Send and decode the JSON response body
    pub async fn send<T: DeserializeOwned>(&self, spec: RequestSpec) -> RestResult<T> {
        let body = self.execute(spec).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Send and decode, aborting when `cancel` fires
    pub async fn send_with_cancel<T: DeserializeOwned>(
        &self,
        spec: RequestSpec,
        cancel: &CancellationToken,
    ) -> RestResult<T> {
        let body = self.execute_with_cancel(spec, cancel).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Send and return the raw success body
    pub async fn execute(&self, spec: RequestSpec) -> RestResult<Vec<u8>> {
        let cancel = self.inner.cancel.clone();
        self.execute_with_cancel(spec, &cancel).await
    }

    /// Send and return the raw success body, aborting when `cancel` or the
    /// dispatcher's own token fires
    pub async fn execute_with_cancel(
        &self,
        spec: RequestSpec,
        cancel: &CancellationToken,
    ) -> RestResult<Vec<u8>> {
        if spec.is_private() && !self.has_credentials() {
            return Err(RestError::AuthRequired);
        }

        let url = self.build_url(&spec)?;
        let budget = self.inner.deadline;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(RestError::Cancelled),
            _ = self.inner.cancel.cancelled() => Err(RestError::Cancelled),
            result = tokio::time::timeout(budget, self.run(&spec, url)) => {
                result.unwrap_or(Err(RestError::Timeout { budget }))
            }
        }
    }

    fn build_url(&self, spec: &RequestSpec) -> RestResult<Url> {
        let raw = format!("{}{}", self.inner.endpoint, spec.path);
        let mut url = Url::parse(&raw)
            .map_err(|e| RestError::InvalidParameter(format!("invalid URL {raw:?}: {e}")))?;

        if !spec.query.is_empty() {
            url.query_pairs_mut().extend_pairs(spec.query.iter());
        }
        Ok(url)
    }

    async fn run(&self, spec: &RequestSpec, url: Url) -> RestResult<Vec<u8>> {
        let retry = &self.inner.retry;
        let uri = request_uri(&url);
        let mut retries = 0u32;

        loop {
            debug!(method = %spec.method, uri = %uri, attempt = retries + 1, "Sending request");

            let delay = match self.attempt(spec, &url, &uri).await {
                Ok((Classification::Success, body)) => return Ok(body),
                Ok((Classification::Fatal(err), _)) => return Err(err),
                Ok((Classification::RateLimited { reset_after }, _)) => {
                    if !retry.should_retry(retries) {
                        return Err(RestError::RateLimited { reset_after });
                    }
                    warn!(
                        uri = %uri,
                        attempt = retries + 1,
                        delay_secs = reset_after.as_secs(),
                        "Rate limited, waiting for reset"
                    );
                    reset_after
                }
                Ok((Classification::RetryableServer { status }, _)) => {
                    if !retry.should_retry(retries) {
                        return Err(RestError::Server { status });
                    }
                    warn!(
                        uri = %uri,
                        attempt = retries + 1,
                        status = %status,
                        delay_ms = retry.backoff.as_millis() as u64,
                        "Server error, backing off"
                    );
                    retry.backoff
                }
                Err(err) => {
                    if !(retry.retry_transport_errors && retry.should_retry(retries)) {
                        return Err(err.into());
                    }
                    warn!(
                        uri = %uri,
                        attempt = retries + 1,
                        error = %err,
                        delay_ms = retry.backoff.as_millis() as u64,
                        "Transport failure, backing off"
                    );
                    retry.backoff
                }
            };

            retries += 1;
            tokio::time::sleep(delay).await;
        }
    }

    /// One physical attempt: sign, send, read the body, classify
    async fn attempt(
        &self,
        spec: &RequestSpec,
        url: &Url,
        uri: &str,
    ) -> Result<(Classification, Vec<u8>), reqwest::Error> {
        let mut request = self.inner.http.request(spec.method.clone(), url.clone());

        if let Some(credentials) = &self.inner.credentials {
            let envelope = RequestSigner::new(credentials, self.inner.body_signing).sign(
                spec.method.as_str(),
                uri,
                spec.body(),
            );
            request = request
                .header(AUTHORIZATION_HEADER, envelope.authorization)
                .header(TIMESTAMP_HEADER, envelope.timestamp);
        }

        if let Some(body) = &spec.body {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(body.clone());
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        debug!(uri = %uri, status = status.as_u16(), bytes = body.len(), "Received response");

        Ok((classify(status, &headers, &body), body.to_vec()))
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("endpoint", &self.inner.endpoint)
            .field("has_credentials", &self.has_credentials())
            .field("body_signing", &self.inner.body_signing)
            .field("retry", &self.inner.retry)
            .field("deadline", &self.inner.deadline)
            .finish()
    }
}
