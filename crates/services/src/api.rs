use std::env;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize};
use skills_core::model::{RawProgressMap, Roadmap, SkillName, TopicKey, TopicProgress};
use url::Url;

use crate::error::ApiError;

/// Remote store of learner progress.
#[async_trait]
pub trait ProgressRemote: Send + Sync {
    /// Fetch the learner's progress for a skill as the server stores it.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the request fails or the server rejects it.
    async fn fetch_progress(&self, skill: &SkillName) -> Result<RawProgressMap, ApiError>;

    /// Overwrite the server copy of one topic.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the request fails or the server rejects it.
    async fn push_topic(
        &self,
        skill: &SkillName,
        key: &TopicKey,
        progress: &TopicProgress,
    ) -> Result<(), ApiError>;
}

/// Remote roadmap generation.
#[async_trait]
pub trait RoadmapGenerator: Send + Sync {
    /// Ask the server to generate a learning roadmap for a skill.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` when the request fails or the server rejects it.
    async fn generate_roadmap(&self, skill: &SkillName) -> Result<Roadmap, ApiError>;
}

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: Url,
    pub api_token: Option<String>,
}

impl ApiConfig {
    /// Build a config from a base URL string.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidBaseUrl` if the URL does not parse or cannot carry a path.
    pub fn new(base_url: &str, api_token: Option<String>) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|_| ApiError::InvalidBaseUrl(base_url.to_owned()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }
        let api_token = api_token
            .map(|token| token.trim().to_owned())
            .filter(|token| !token.is_empty());
        Ok(Self {
            base_url,
            api_token,
        })
    }

    /// Read `SKILLS_API_BASE_URL` and `SKILLS_API_TOKEN`.
    ///
    /// Returns `None` (offline mode) when no base URL is set or it is invalid.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("SKILLS_API_BASE_URL").ok()?;
        if base_url.trim().is_empty() {
            return None;
        }
        let api_token = env::var("SKILLS_API_TOKEN").ok();
        match Self::new(&base_url, api_token) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!(error = %err, "ignoring SKILLS_API_BASE_URL");
                None
            }
        }
    }

    /// Append path segments to the base URL, percent-encoding each one.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidBaseUrl` if the base URL cannot carry a path.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// JSON client for the learning API.
#[derive(Clone)]
pub struct HttpApiClient {
    client: Client,
    config: ApiConfig,
}

impl HttpApiClient {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.config.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

#[async_trait]
impl ProgressRemote for HttpApiClient {
    async fn fetch_progress(&self, skill: &SkillName) -> Result<RawProgressMap, ApiError> {
        let url = self.config.endpoint(&["progress", skill.as_str()])?;
        let response = self.request(Method::GET, url).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status()));
        }
        let body: ProgressResponse = response.json().await?;
        Ok(body.progress)
    }

    async fn push_topic(
        &self,
        skill: &SkillName,
        key: &TopicKey,
        progress: &TopicProgress,
    ) -> Result<(), ApiError> {
        let url = self
            .config
            .endpoint(&["progress", skill.as_str(), key.as_str()])?;
        let response = self.request(Method::PUT, url).json(progress).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status()));
        }
        Ok(())
    }
}

#[async_trait]
impl RoadmapGenerator for HttpApiClient {
    async fn generate_roadmap(&self, skill: &SkillName) -> Result<Roadmap, ApiError> {
        let url = self.config.endpoint(&["roadmap"])?;
        let payload = RoadmapRequest {
            skill: skill.as_str(),
        };
        let response = self
            .request(Method::POST, url)
            .json(&payload)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::HttpStatus(response.status()));
        }
        let body: RoadmapResponse = response.json().await?;
        Ok(body.roadmap)
    }
}

#[derive(Debug, Deserialize)]
struct ProgressResponse {
    #[serde(default)]
    progress: RawProgressMap,
}

#[derive(Debug, Serialize)]
struct RoadmapRequest<'a> {
    skill: &'a str,
}

#[derive(Debug, Deserialize)]
struct RoadmapResponse {
    roadmap: Roadmap,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_encodes_segments_and_keeps_base_path() {
        let config = ApiConfig::new("https://api.example.com/v1/", None).unwrap();
        let url = config
            .endpoint(&["progress", "C++", "Pointers & refs"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/v1/progress/C++/Pointers%20&%20refs"
        );
    }

    #[test]
    fn blank_token_is_dropped_and_bad_urls_rejected() {
        let config = ApiConfig::new("http://localhost:8080", Some("  ".into())).unwrap();
        assert!(config.api_token.is_none());
        assert!(matches!(
            ApiConfig::new("not a url", None),
            Err(ApiError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            ApiConfig::new("mailto:someone@example.com", None),
            Err(ApiError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn progress_response_tolerates_legacy_and_missing_body() {
        let body: ProgressResponse = serde_json::from_str(
            r#"{ "progress": { "A": "completed", "B": { "Viewed": true } } }"#,
        )
        .unwrap();
        assert_eq!(body.progress.len(), 2);

        let empty: ProgressResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.progress.is_empty());
    }
}
