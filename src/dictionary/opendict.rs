//! Gateway to the Korean open dictionary search API.

use super::gateway::{Candidate, DictionaryGateway, LookupError, LookupErrorKind};
use derive_getters::Getters;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

/// Connection settings for [`OpenDictGateway`].
#[derive(Debug, Clone, Getters)]
pub struct OpenDictConfig {
    endpoint: String,
    api_key: String,
    candidate_limit: u32,
    timeout: Duration,
}

impl OpenDictConfig {
    /// Creates a gateway configuration.
    #[instrument(skip(api_key))]
    pub fn new(endpoint: String, api_key: String, candidate_limit: u32, timeout: Duration) -> Self {
        Self {
            endpoint,
            api_key,
            candidate_limit,
            timeout,
        }
    }
}

/// HTTP gateway issuing exact-match and prefix searches.
#[derive(Debug, Clone)]
pub struct OpenDictGateway {
    config: OpenDictConfig,
    client: reqwest::Client,
}

impl OpenDictGateway {
    /// Creates the gateway and its HTTP client.
    #[instrument(skip(config), fields(endpoint = %config.endpoint))]
    pub fn new(config: OpenDictConfig) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                LookupError::new(
                    LookupErrorKind::Transport,
                    format!("Failed to build HTTP client: {}", e),
                )
            })?;
        info!("Created open dictionary gateway");
        Ok(Self { config, client })
    }

    /// Query shared by both lookup kinds.
    fn base_params(&self, query: &str) -> Vec<(&'static str, String)> {
        vec![
            ("key", self.config.api_key.clone()),
            ("req_type", "json".to_string()),
            ("q", query.to_string()),
            ("advanced", "y".to_string()),
        ]
    }

    /// Sends a search and returns the matched items.
    #[instrument(skip(self, params))]
    async fn search(&self, params: Vec<(&'static str, String)>) -> Result<Vec<SearchItem>, LookupError> {
        let url = reqwest::Url::parse_with_params(&self.config.endpoint, &params).map_err(|e| {
            LookupError::new(
                LookupErrorKind::Transport,
                format!("Invalid endpoint {}: {}", self.config.endpoint, e),
            )
        })?;

        debug!("Sending dictionary search");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!(status = %status, "Dictionary API error");
            return Err(LookupError::new(
                LookupErrorKind::Status,
                format!("Dictionary API error {}: {}", status, body),
            ));
        }

        parse_search(&body)
    }
}

#[async_trait::async_trait]
impl DictionaryGateway for OpenDictGateway {
    #[instrument(skip(self))]
    async fn check_exists(&self, word: &str) -> Result<bool, LookupError> {
        let mut params = self.base_params(word);
        params.push(("method", "exact".to_string()));

        let items = self.search(params).await?;
        debug!(matches = items.len(), "Existence lookup answered");
        Ok(!items.is_empty())
    }

    #[instrument(skip(self))]
    async fn list_candidates(&self, start: char) -> Result<Vec<Candidate>, LookupError> {
        let query = start.to_string();
        let mut params = self.base_params(&query);
        params.extend([
            ("sort", "popular".to_string()),
            ("type1", "word".to_string()),
            ("method", "start".to_string()),
            ("num", self.config.candidate_limit.to_string()),
            ("pos", "1".to_string()),
            ("type2", "native,chinese".to_string()),
            ("type3", "general".to_string()),
            ("type4", "general".to_string()),
        ]);

        let items = self.search(params).await?;
        let candidates: Vec<Candidate> = items.into_iter().map(SearchItem::into_candidate).collect();
        debug!(count = candidates.len(), "Candidate lookup answered");
        Ok(candidates)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    channel: SearchChannel,
}

#[derive(Debug, Deserialize)]
struct SearchChannel {
    #[serde(default)]
    item: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    word: String,
    #[serde(default)]
    sense: Vec<SearchSense>,
}

#[derive(Debug, Deserialize)]
struct SearchSense {
    #[serde(default)]
    definition: Option<String>,
}

impl SearchItem {
    fn into_candidate(self) -> Candidate {
        let definition = self.sense.into_iter().next().and_then(|s| s.definition);
        Candidate::new(normalize_headword(&self.word), definition)
    }
}

/// Parses a search payload into its item list.
fn parse_search(body: &str) -> Result<Vec<SearchItem>, LookupError> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response.channel.item)
}

/// Strips the syllable-boundary markers the dictionary embeds in headwords.
pub fn normalize_headword(word: &str) -> String {
    word.chars().filter(|c| !matches!(c, '-' | '^')).collect()
}
