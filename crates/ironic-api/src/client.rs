use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use url::Url;

/// Header carrying the requested Ironic API microversion.
pub const MICROVERSION_HEADER: &str = "X-OpenStack-Ironic-API-Version";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Unsupported URL scheme {scheme:?}, expected http or https")]
    UnsupportedScheme { scheme: String },
    #[error("API returned {status}: {body}")]
    ApiResponse { status: u16, body: String },
    #[error("API microversion contains invalid characters (non-visible ASCII)")]
    InvalidMicroversion,
    #[error("Pagination failed: {0}")]
    Pagination(String),
}

/// Base URL of one Ironic-family service plus the API microversion to
/// request from it.
///
/// The URL is normalized on construction so that `http://host/v1` and
/// `http://host/v1/` behave identically: [`Endpoint::root_url`] never has a
/// trailing slash (some deployments answer 404 for `/v1/` but 200 for
/// `/v1`), and [`Endpoint::join`] always resolves below the configured path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base_url: Url,
    root_url: Url,
    microversion: Option<String>,
}

impl Endpoint {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let root_url = Url::parse(trimmed)?;
        match root_url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ApiError::UnsupportedScheme {
                    scheme: other.to_string(),
                });
            }
        }
        let base_url = Url::parse(&format!("{trimmed}/"))?;
        Ok(Self {
            base_url,
            root_url,
            microversion: None,
        })
    }

    /// Request the given API microversion on every call to this endpoint.
    pub fn with_microversion(mut self, microversion: impl Into<String>) -> Self {
        self.microversion = Some(microversion.into());
        self
    }

    /// The base URL with a trailing slash, suitable for [`Url::join`].
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The base URL with any trailing slash stripped. Status probes hit this.
    pub fn root_url(&self) -> &Url {
        &self.root_url
    }

    pub fn microversion(&self) -> Option<&str> {
        self.microversion.as_deref()
    }

    /// Resolve `path` (relative, or an absolute link returned by the API)
    /// against the base URL.
    pub fn join(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.root_url.as_str())
    }
}

/// Shared HTTP client for the Ironic and Inspector APIs.
///
/// Wraps [`reqwest::Client`] with an [`Endpoint`]. When the endpoint carries a
/// microversion it is sent as [`MICROVERSION_HEADER`] on every request.
/// Redirects are never followed.
#[derive(Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    endpoint: Endpoint,
}

impl HttpClient {
    pub fn new(endpoint: Endpoint) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        if let Some(version) = endpoint.microversion() {
            headers.insert(
                MICROVERSION_HEADER,
                HeaderValue::from_str(version).map_err(|_| ApiError::InvalidMicroversion)?,
            );
        }

        // A 3xx on the root must surface as-is, not as its target's status.
        let inner = reqwest::Client::builder()
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self { inner, endpoint })
    }

    /// GET the endpoint root (trailing slash stripped) and return the status.
    ///
    /// The body is not read.
    pub async fn root_status(&self) -> Result<StatusCode, ApiError> {
        let resp = self
            .inner
            .get(self.endpoint.root_url().clone())
            .send()
            .await?;
        Ok(resp.status())
    }

    /// GET an already resolved URL (e.g. a pagination link) and deserialize
    /// the JSON response.
    pub async fn get_url<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let resp = self.inner.get(url).send().await?;
        Self::handle_response(resp).await
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::ApiResponse { status, body });
        }
        Ok(resp.json().await?)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.endpoint.base_url().as_str())
            .field("microversion", &self.endpoint.microversion())
            .finish()
    }
}
