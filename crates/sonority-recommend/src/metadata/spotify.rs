//! Spotify Web API client.
//!
//! Authenticates with the client-credentials flow, resolves tracks via
//! the search endpoint, and reads audio features from the
//! `audio-features` endpoint. Access tokens are cached until shortly
//! before they expire. Failures are reported, never retried.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tokio::sync::Mutex;

use sonority_core::model::Attributes;

use crate::error::{RecommendError, RecommendResult};
use crate::metadata::{MetadataSource, TrackId};
use crate::resilience::RateLimiter;

const SPOTIFY_ACCOUNTS_BASE: &str = "https://accounts.spotify.com";
const SPOTIFY_API_BASE: &str = "https://api.spotify.com";
const SOURCE_NAME: &str = "Spotify";

/// Tokens are refreshed this long before Spotify says they expire.
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

/// Requests per second; Spotify's rolling limit is undocumented.
const REQUESTS_PER_SECOND: u32 = 10;

// ---------------------------------------------------------------------------
// API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: TrackPage,
}

#[derive(Debug, Deserialize)]
struct TrackPage {
    #[serde(default)]
    items: Vec<TrackItem>,
}

#[derive(Debug, Deserialize)]
struct TrackItem {
    id: String,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Spotify application credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct SpotifyCredentials {
    client_id: String,
    client_secret: String,
}

impl SpotifyCredentials {
    #[must_use]
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            client_id,
            client_secret,
        }
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

impl fmt::Debug for SpotifyCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotifyCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Spotify Web API client.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    credentials: SpotifyCredentials,
    accounts_base: String,
    api_base: String,
    token: Arc<Mutex<Option<AccessToken>>>,
    rate_limiter: RateLimiter,
}

impl SpotifyClient {
    /// Create a new Spotify client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(credentials: SpotifyCredentials) -> RecommendResult<Self> {
        let http = Client::builder()
            .user_agent("sonority/0.1.0 (https://github.com/oxur/sonority)")
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(RecommendError::from)?;

        Ok(Self {
            http,
            credentials,
            accounts_base: SPOTIFY_ACCOUNTS_BASE.to_string(),
            api_base: SPOTIFY_API_BASE.to_string(),
            token: Arc::new(Mutex::new(None)),
            rate_limiter: RateLimiter::new(REQUESTS_PER_SECOND),
        })
    }

    /// Point the client at different hosts (used against mock servers).
    #[must_use]
    pub fn with_base_urls(mut self, accounts_base: &str, api_base: &str) -> Self {
        self.accounts_base = accounts_base.trim_end_matches('/').to_string();
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    /// Replace the rate limiter.
    #[must_use]
    pub fn with_rate_limiter(mut self, rate_limiter: RateLimiter) -> Self {
        self.rate_limiter = rate_limiter;
        self
    }

    /// A valid bearer token, fetching a new one when the cached token is
    /// missing or about to expire.
    async fn access_token(&self) -> RecommendResult<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Utc::now() {
                return Ok(token.value.clone());
            }
        }

        log::debug!("Requesting Spotify access token");
        self.rate_limiter.acquire().await;

        let response = self
            .http
            .post(format!("{}/api/token", self.accounts_base))
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;
        let response = check_status(response)?;

        let token: TokenResponse = response.json().await.map_err(parse_error)?;
        let lifetime = (token.expires_in - TOKEN_EXPIRY_MARGIN_SECS).max(0);
        let value = token.access_token;
        *cached = Some(AccessToken {
            value: value.clone(),
            expires_at: Utc::now() + chrono::Duration::seconds(lifetime),
        });

        Ok(value)
    }
}

#[async_trait]
impl MetadataSource for SpotifyClient {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn search_track(&self, title: &str, artist: &str) -> RecommendResult<Option<TrackId>> {
        let token = self.access_token().await?;
        self.rate_limiter.acquire().await;

        let query = format!("track:{} artist:{}", title, artist);
        let response = self
            .http
            .get(format!("{}/v1/search", self.api_base))
            .bearer_auth(token)
            .query(&[("q", query.as_str()), ("type", "track"), ("limit", "1")])
            .send()
            .await?;
        let response = check_status(response)?;

        let result: SearchResponse = response.json().await.map_err(parse_error)?;
        Ok(result
            .tracks
            .items
            .into_iter()
            .next()
            .map(|item| TrackId::new(item.id)))
    }

    async fn audio_features(&self, track_id: &TrackId) -> RecommendResult<Option<Attributes>> {
        let token = self.access_token().await?;
        self.rate_limiter.acquire().await;

        let response = self
            .http
            .get(format!("{}/v1/audio-features/{}", self.api_base, track_id))
            .bearer_auth(token)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(response)?;

        let body: serde_json::Value = response.json().await.map_err(parse_error)?;
        numeric_attributes(body)
    }
}

/// Keep the numeric fields of an audio-features object.
fn numeric_attributes(body: serde_json::Value) -> RecommendResult<Option<Attributes>> {
    match body {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Object(fields) => Ok(Some(
            fields
                .into_iter()
                .filter_map(|(name, value)| value.as_f64().map(|v| (name, v)))
                .collect(),
        )),
        other => Err(RecommendError::Parse {
            source_name: SOURCE_NAME.to_string(),
            message: format!("expected an audio-features object, got {}", other),
        }),
    }
}

fn check_status(response: Response) -> RecommendResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RecommendError::Auth {
            source_name: SOURCE_NAME.to_string(),
            message: status.to_string(),
        },
        StatusCode::TOO_MANY_REQUESTS => RecommendError::RateLimited {
            source_name: SOURCE_NAME.to_string(),
        },
        _ => RecommendError::Http {
            source_name: SOURCE_NAME.to_string(),
            message: status.to_string(),
        },
    })
}

fn parse_error(e: reqwest::Error) -> RecommendError {
    RecommendError::Parse {
        source_name: SOURCE_NAME.to_string(),
        message: e.to_string(),
    }
}
