use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, instrument, warn};

use crate::config::ClientConfig;
use crate::errors::{StorageError, TweeterError, TweeterResult};
use crate::result::CallFailure;
use crate::session::SessionStoreRef;

/// Successful response as seen by the gateway
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    /// Parsed JSON body, `None` when the body was empty
    pub body: Option<Value>,
}

/// Single egress point for calls to the remote API.
///
/// Every request built through the gateway carries the stored access token as
/// a bearer credential when one exists. Failures come back as [`CallFailure`]
/// for [`crate::result::handle_error`] to normalize.
#[derive(Debug, Clone)]
pub struct ApiGateway {
    client: Client,
    base_url: String,
    sessions: SessionStoreRef,
}

impl ApiGateway {
    /// Create a gateway from the client configuration and the session store it reads tokens from
    pub fn new(config: &ClientConfig, sessions: SessionStoreRef) -> TweeterResult<Self> {
        let base_url = config.api_url().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(TweeterError::ConfigError(
                "API base address must not be empty".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .cookie_store(config.with_credentials())
            .build()?;

        debug!(base_url = %base_url, timeout = ?config.timeout(), "Initialized API gateway");

        Ok(Self {
            client,
            base_url,
            sessions,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn sessions(&self) -> &SessionStoreRef {
        &self.sessions
    }

    /// Absolute URL for an API path such as `/login/`
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Build a request with the current access token attached.
    ///
    /// The token is read when the request is built, so it is always attached
    /// before dispatch. Without a stored token no Authorization header is set.
    /// A storage failure stops the request from being built.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, StorageError> {
        let builder = self.client.request(method, self.url(path));

        Ok(match self.sessions.access_token()? {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    /// Send a request with an optional JSON body.
    ///
    /// Any non-2xx status is returned as [`CallFailure::Status`]. When `cancel`
    /// fires before the response resolves the call is dropped and reported as
    /// [`CallFailure::Canceled`].
    #[instrument(skip(self, method, body, cancel), fields(method = %method))]
    pub async fn call<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&T>,
        cancel: Option<&CancellationToken>,
    ) -> Result<ApiResponse, CallFailure> {
        let mut builder = self.request(method, path).map_err(|e| {
            error!(error = %e, "Failed to read session while authorizing request");
            CallFailure::Storage(e.to_string())
        })?;
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let result = match cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(CallFailure::Canceled),
                    result = Self::execute(builder) => result,
                }
            }
            None => Self::execute(builder).await,
        };

        match &result {
            Ok(response) => debug!(status = %response.status, "Request succeeded"),
            Err(CallFailure::Status { code, .. }) => warn!(code, "Request failed with status"),
            Err(failure) => warn!(?failure, "Request failed"),
        }
        result
    }

    pub async fn get(
        &self,
        path: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<ApiResponse, CallFailure> {
        self.call::<Value>(Method::GET, path, None, cancel).await
    }

    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
        cancel: Option<&CancellationToken>,
    ) -> Result<ApiResponse, CallFailure> {
        self.call(Method::POST, path, Some(body), cancel).await
    }

    pub async fn patch<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
        cancel: Option<&CancellationToken>,
    ) -> Result<ApiResponse, CallFailure> {
        self.call(Method::PATCH, path, Some(body), cancel).await
    }

    async fn execute(builder: RequestBuilder) -> Result<ApiResponse, CallFailure> {
        let response = builder.send().await.map_err(classify)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(classify)?;
        let body = parse_body(&bytes);

        if status.is_success() {
            Ok(ApiResponse { status, body })
        } else {
            Err(CallFailure::Status {
                code: status.as_u16(),
                body,
            })
        }
    }
}

fn classify(e: reqwest::Error) -> CallFailure {
    if e.is_timeout() {
        CallFailure::TimedOut
    } else {
        CallFailure::Transport(e.to_string())
    }
}

/// Parse a response body as JSON. Non-JSON text is kept as a string value.
fn parse_body(bytes: &[u8]) -> Option<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(String::from_utf8_lossy(bytes).into_owned())),
    }
}
