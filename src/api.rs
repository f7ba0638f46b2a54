use crate::country::Country;
use async_trait::async_trait;
use reqwest::Url;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_BASE_URL: &str = "https://restcountries.com/v3.1";

/// The remote lookup templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    All,
    Name,
    Currency,
    Lang,
}

impl QueryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Name => "name",
            Self::Currency => "currency",
            Self::Lang => "lang",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryKind {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "name" => Ok(Self::Name),
            "currency" => Ok(Self::Currency),
            "lang" => Ok(Self::Lang),
            other => Err(ApiError::InvalidQuery(other.to_string())),
        }
    }
}

/// A query kind paired with its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub kind: QueryKind,
    pub value: String,
}

impl Query {
    pub fn all() -> Self {
        Self { kind: QueryKind::All, value: String::new() }
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self { kind: QueryKind::Name, value: name.into() }
    }

    pub fn new(kind: QueryKind, value: Option<&str>) -> Self {
        Self { kind, value: value.unwrap_or_default().to_string() }
    }

    /// Build the request URL for this query against `base`.
    pub fn url(&self, base: &str) -> Result<Url, ApiError> {
        let mut url = Url::parse(base.trim_end_matches('/'))
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {}", base, e)))?;

        if self.kind != QueryKind::All && self.value.is_empty() {
            return Err(ApiError::MissingValue(self.kind));
        }

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidBaseUrl(base.to_string()))?;
            segments.pop_if_empty();
            segments.push(self.kind.as_str());
            if self.kind != QueryKind::All {
                segments.push(&self.value);
            }
        }

        if self.kind == QueryKind::Name {
            url.query_pairs_mut().append_pair("fullText", "true");
        }
        Ok(url)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}:{}", self.kind, self.value)
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid query kind: {0}")]
    InvalidQuery(String),

    #[error("Query kind '{0}' requires a value")]
    MissingValue(QueryKind),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote API error: HTTP {status}")]
    Status { status: u16 },

    #[error("Unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Request cancelled")]
    Cancelled,
}

impl ApiError {
    /// True for errors raised before any request was sent.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ApiError::InvalidQuery(_) | ApiError::MissingValue(_) | ApiError::InvalidBaseUrl(_)
        )
    }

    pub fn user_message(&self) -> String {
        match self {
            ApiError::InvalidQuery(kind) => {
                format!("Unknown query kind '{}' (expected all, name, currency or lang)", kind)
            }
            ApiError::MissingValue(kind) => format!("The '{}' query needs a value", kind),
            ApiError::InvalidBaseUrl(url) => format!("Invalid API address: {}", url),
            ApiError::Http(e) => format!("Network error: {}", e),
            ApiError::Status { status } => format!("The country service answered with HTTP {}", status),
            ApiError::Decode(e) => format!("Data format error: {}", e),
            ApiError::Cancelled => "Request cancelled".to_string(),
        }
    }
}

/// Anything that can answer country queries.
#[async_trait]
pub trait CountrySource: Send + Sync {
    async fn fetch(&self, query: &Query, cancel: &CancellationToken) -> Result<Vec<Country>, ApiError>;
}

/// HTTP client for the REST Countries API.
#[derive(Debug, Clone)]
pub struct CountryClient {
    base_url: String,
    http: reqwest::Client,
}

impl CountryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, url: Url) -> Result<Vec<Country>, ApiError> {
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status { status: status.as_u16() });
        }
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl CountrySource for CountryClient {
    async fn fetch(&self, query: &Query, cancel: &CancellationToken) -> Result<Vec<Country>, ApiError> {
        let url = query.url(&self.base_url)?;
        tracing::debug!(%url, "GET");

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ApiError::Cancelled),
            res = self.get(url) => res,
        };

        match &result {
            Ok(countries) => tracing::info!(%query, count = countries.len(), "query finished"),
            Err(ApiError::Cancelled) => tracing::debug!(%query, "query cancelled"),
            Err(e) => tracing::warn!(%query, error = %e, "query failed"),
        }
        result
    }
}
