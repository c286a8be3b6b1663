// Query API client
//
// Thin wrapper over the honeypot analytics backend. Every call is a GET with
// a JSON body in the response; there is no caching and no retry. A non-2xx
// status becomes `ApiError::Http` carrying the status code and reason phrase.

pub mod models;
pub mod query;

use futures::future::BoxFuture;
use models::{
    AlertListResponse, DashboardResponse, DatesResponse, SessionDetail, SessionListResponse,
    StatisticsResponse, ThreatIntelligenceResponse,
};
use query::{AlertQuery, DateQuery, SessionQuery, StatisticsQuery};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Errors surfaced by the API client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Server answered with a non-success status
    Http { status: u16, status_text: String },
    /// Connection refused, DNS failure, timeout, ...
    Transport(String),
    /// Body was not the JSON we expected
    Decode(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http {
                status,
                status_text,
            } if status_text.is_empty() => write!(f, "HTTP {}", status),
            Self::Http {
                status,
                status_text,
            } => write!(f, "HTTP {}: {}", status, status_text),
            Self::Transport(msg) => write!(f, "Network error: {}", msg),
            Self::Decode(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = Result<T, ApiError>;

/// The backend contract the controller depends on
///
/// Object-safe so the controller can hold `Arc<dyn DashboardApi>` and tests can
/// substitute a scripted implementation. Returned futures are `'static` so the
/// controller can move them onto spawned tasks.
pub trait DashboardApi: Send + Sync {
    fn get_dashboard(&self, date: Option<String>) -> BoxFuture<'static, ApiResult<DashboardResponse>>;

    fn get_sessions(&self, query: SessionQuery) -> BoxFuture<'static, ApiResult<SessionListResponse>>;

    fn get_session(&self, uuid: String) -> BoxFuture<'static, ApiResult<SessionDetail>>;

    fn get_alerts(&self, query: AlertQuery) -> BoxFuture<'static, ApiResult<AlertListResponse>>;

    fn get_statistics(
        &self,
        query: StatisticsQuery,
    ) -> BoxFuture<'static, ApiResult<StatisticsResponse>>;

    fn get_threat_intelligence(
        &self,
        date: Option<String>,
    ) -> BoxFuture<'static, ApiResult<ThreatIntelligenceResponse>>;

    fn get_dates(&self) -> BoxFuture<'static, ApiResult<DatesResponse>>;
}

/// reqwest-backed implementation of [`DashboardApi`]
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client for the given API origin (e.g. `http://localhost:8083/api`)
    ///
    /// Without a timeout the transport's default applies.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> ApiResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        let raw = base_url.into();
        let base_url = Url::parse(raw.trim_end_matches('/'))
            .map_err(|e| ApiError::Transport(format!("Invalid API URL {}: {}", raw, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Transport(format!("Invalid API URL {}", raw)));
        }
        tracing::debug!("API client targeting {}", base_url);

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Append path segments to the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base URL always has a path
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Issue a GET and decode the JSON body
    async fn request<T, Q>(&self, segments: &[&str], query: Option<&Q>) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.endpoint(segments);
        let endpoint = url.path().to_string();
        let mut req = self.client.get(url);
        if let Some(query) = query {
            req = req.query(query);
        }

        let result = async {
            let response = req
                .send()
                .await
                .map_err(|e| ApiError::Transport(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(ApiError::Http {
                    status: status.as_u16(),
                    status_text: status.canonical_reason().unwrap_or("").to_string(),
                });
            }

            response
                .json::<T>()
                .await
                .map_err(|e| ApiError::Decode(e.to_string()))
        }
        .await;

        if let Err(ref e) = result {
            tracing::warn!("API error [{}]: {}", endpoint, e);
        }
        result
    }
}

impl DashboardApi for ApiClient {
    fn get_dashboard(&self, date: Option<String>) -> BoxFuture<'static, ApiResult<DashboardResponse>> {
        let this = self.clone();
        Box::pin(async move { this.request(&["dashboard"], Some(&DateQuery { date })).await })
    }

    fn get_sessions(&self, query: SessionQuery) -> BoxFuture<'static, ApiResult<SessionListResponse>> {
        let this = self.clone();
        Box::pin(async move { this.request(&["sessions"], Some(&query)).await })
    }

    fn get_session(&self, uuid: String) -> BoxFuture<'static, ApiResult<SessionDetail>> {
        let this = self.clone();
        Box::pin(async move {
            this.request::<_, ()>(&["sessions", &uuid], None)
                .await
        })
    }

    fn get_alerts(&self, query: AlertQuery) -> BoxFuture<'static, ApiResult<AlertListResponse>> {
        let this = self.clone();
        Box::pin(async move { this.request(&["alerts"], Some(&query)).await })
    }

    fn get_statistics(
        &self,
        query: StatisticsQuery,
    ) -> BoxFuture<'static, ApiResult<StatisticsResponse>> {
        let this = self.clone();
        Box::pin(async move { this.request(&["statistics"], Some(&query)).await })
    }

    fn get_threat_intelligence(
        &self,
        date: Option<String>,
    ) -> BoxFuture<'static, ApiResult<ThreatIntelligenceResponse>> {
        let this = self.clone();
        Box::pin(async move {
            this.request(&["threat-intelligence"], Some(&DateQuery { date }))
                .await
        })
    }

    fn get_dates(&self) -> BoxFuture<'static, ApiResult<DatesResponse>> {
        let this = self.clone();
        Box::pin(async move { this.request::<_, ()>(&["dates"], None).await })
    }
}
