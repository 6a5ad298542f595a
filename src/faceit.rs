use crate::models::{ChampionshipMatchesPage, MatchId, MatchRoot, RawMatchRecord};
use reqwest::{header, Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::{Duration, SystemTime};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_API_BASE: &str = "https://open.faceit.com/data/v4";

const MAX_ATTEMPTS: u32 = 4;

#[derive(Debug, Error)]
pub enum FaceitError {
    #[error("API key is not set. Configure it with `faceit-h2h config set-key <KEY>` or FACEIT_API_KEY")]
    MissingApiKey,

    #[error("HTTP {status}: {message}")]
    Http { status: StatusCode, message: String },

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("the requested match is not part of a FACEIT championship (competition type `{0}`)")]
    NotChampionship(String),

    #[error("invalid API base URL: {0}")]
    InvalidBase(#[from] url::ParseError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FaceitError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FaceitError::Http { status, .. } => Some(*status),
            FaceitError::RateLimited(_) => Some(StatusCode::TOO_MANY_REQUESTS),
            _ => None,
        }
    }
}

/// Read-only client for the FACEIT Data API.
#[derive(Clone)]
pub struct FaceitClient {
    base: String,
    api_key: Option<String>,
    http: Client,
    backoff: Duration,
}

impl FaceitClient {
    pub fn new(base: impl AsRef<str>, api_key: Option<String>, http: Client) -> Result<Self, FaceitError> {
        let base = Url::parse(base.as_ref())?;
        Ok(Self {
            base: base.as_str().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            http,
            backoff: Duration::from_millis(400),
        })
    }

    /// First delay between retries, doubled after every attempt.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn get_match(&self, match_id: &MatchId) -> Result<MatchRoot, FaceitError> {
        let url = self.endpoint(&["matches", match_id.as_str()])?;
        self.get_json(url, Vec::new()).await
    }

    pub async fn get_championship_matches(
        &self,
        competition_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<ChampionshipMatchesPage, FaceitError> {
        let url = self.endpoint(&["championships", competition_id, "matches"])?;
        let q = vec![
            ("type", "past".to_string()),
            ("offset", offset.to_string()),
            ("limit", limit.to_string()),
        ];
        self.get_json(url, q).await
    }

    pub async fn get_match_stats(&self, match_id: &MatchId) -> Result<RawMatchRecord, FaceitError> {
        let url = self.endpoint(&["matches", match_id.as_str(), "stats"])?;
        let mut record: RawMatchRecord = self.get_json(url, Vec::new()).await?;
        record.match_id = match_id.clone();
        Ok(record)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, FaceitError> {
        let mut url = Url::parse(&self.base)?;
        url.path_segments_mut()
            .map_err(|_| FaceitError::Other(anyhow::anyhow!("API base cannot carry a path: {}", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, query: Vec<(&str, String)>) -> Result<T, FaceitError> {
        let key = self.api_key.as_deref().ok_or(FaceitError::MissingApiKey)?;
        let mut last_err: Option<FaceitError> = None;
        let mut delay = self.backoff;
        for attempt in 0..MAX_ATTEMPTS {
            debug!(%url, attempt, "GET");
            let resp = self
                .http
                .get(url.clone())
                .query(&query)
                .bearer_auth(key)
                .header(header::CONTENT_TYPE, "application/json")
                .send()
                .await;
            match resp {
                Ok(rsp) => {
                    let status = rsp.status();
                    let headers = rsp.headers().clone();

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        let msg = rsp.text().await.unwrap_or_default();
                        last_err = Some(FaceitError::RateLimited(msg));
                        if attempt + 1 == MAX_ATTEMPTS {
                            break;
                        }
                        let wait = headers
                            .get(header::RETRY_AFTER)
                            .and_then(|v| v.to_str().ok())
                            .and_then(parse_retry_after)
                            .unwrap_or(delay);
                        tokio::time::sleep(wait).await;
                        delay = delay.saturating_mul(2);
                        continue;
                    }

                    if !status.is_success() {
                        let msg = rsp.text().await.unwrap_or_default();
                        return Err(FaceitError::Http { status, message: msg });
                    }

                    return rsp
                        .json::<T>()
                        .await
                        .map_err(|e| FaceitError::Other(e.into()));
                }
                Err(e) => {
                    last_err = Some(FaceitError::Other(e.into()));
                    if attempt + 1 < MAX_ATTEMPTS {
                        tokio::time::sleep(delay).await;
                        delay = delay.saturating_mul(2);
                    }
                }
            }
        }
        Err(last_err.unwrap_or_else(|| FaceitError::Other(anyhow::anyhow!("HTTP failed"))))
    }
}

fn parse_retry_after(s: &str) -> Option<Duration> {
    if let Ok(n) = s.trim().parse::<u64>() {
        return Some(Duration::from_secs(n));
    }

    if let Ok(when) = httpdate::parse_http_date(s) {
        let now = SystemTime::now();
        if let Ok(wait) = when.duration_since(now) {
            return Some(wait);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_after_seconds() {
        assert_eq!(parse_retry_after("3"), Some(Duration::from_secs(3)));
        assert_eq!(parse_retry_after("soon"), None);
    }

    #[test]
    fn retry_after_past_date_is_ignored() {
        assert_eq!(parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT"), None);
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let c = FaceitClient::new("https://open.faceit.com/data/v4/", Some("k".into()), Client::new()).unwrap();
        let url = c.endpoint(&["matches", "1-abc", "stats"]).unwrap();
        assert_eq!(url.as_str(), "https://open.faceit.com/data/v4/matches/1-abc/stats");
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let c = FaceitClient::new(DEFAULT_API_BASE, Some("  ".into()), Client::new()).unwrap();
        assert!(!c.has_api_key());
    }
}
