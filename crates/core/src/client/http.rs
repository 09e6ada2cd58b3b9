use crate::client::RecommendationApi;
use crate::config::Settings;
use crate::domain::{FeedbackRequest, RecommendationEnvelope, RecommendationResponse, UserId};
use crate::error::RequestError;
use anyhow::Context;
use reqwest::Url;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const RECOMMENDATIONS_PATH: [&str; 2] = ["mf", "recommendations"];
const FEEDBACK_PATH: [&str; 2] = ["mf", "feedback"];

#[derive(Debug, Clone)]
pub struct HttpRecommendationApi {
    http: reqwest::Client,
    base_url: Url,
    endpoint: String,
}

impl HttpRecommendationApi {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let base_url = settings.resolve_api_base_url()?;
        let timeout_secs = settings.api_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        anyhow::ensure!(timeout_secs > 0, "FUNDVIEW_API_TIMEOUT_SECS must be at least 1");
        Self::new(&base_url, Duration::from_secs(timeout_secs))
    }

    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let parsed = Url::parse(base_url)
            .with_context(|| format!("invalid API base url: {base_url}"))?;
        anyhow::ensure!(
            matches!(parsed.scheme(), "http" | "https"),
            "API base url must be http(s): {base_url}"
        );

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build recommendation API http client")?;

        Ok(Self {
            http,
            endpoint: parsed.as_str().trim_end_matches('/').to_string(),
            base_url: parsed,
        })
    }

    /// Appends `segments` to the base path. Each segment is percent-encoded, so a user
    /// id can never escape its path position.
    fn url(&self, segments: &[&str]) -> Result<Url, RequestError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RequestError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn read_body(url: &Url, res: reqwest::Response) -> Result<String, RequestError> {
        let status = res.status();
        let text = res.text().await.map_err(|source| RequestError::Transport {
            url: url.to_string(),
            source,
        })?;

        if !status.is_success() {
            return Err(RequestError::Status {
                url: url.to_string(),
                status,
                body: text,
            });
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl RecommendationApi for HttpRecommendationApi {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch_recommendations(
        &self,
        user_id: &UserId,
    ) -> Result<RecommendationResponse, RequestError> {
        let [a, b] = RECOMMENDATIONS_PATH;
        let url = self.url(&[a, b, user_id.as_str()])?;

        let res = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| RequestError::Transport {
                url: url.to_string(),
                source,
            })?;

        let text = Self::read_body(&url, res).await?;
        let envelope = serde_json::from_str::<RecommendationEnvelope>(&text).map_err(|source| {
            RequestError::Decode {
                url: url.to_string(),
                source,
            }
        })?;

        tracing::debug!(
            %user_id,
            holdings = envelope.recommendation.user_fund_details.len(),
            recommendations = envelope.recommendation.recommendations.len(),
            "recommendations fetched"
        );
        Ok(envelope.recommendation)
    }

    async fn submit_feedback(&self, request: &FeedbackRequest) -> Result<(), RequestError> {
        let url = self.url(&FEEDBACK_PATH)?;

        let res = self
            .http
            .post(url.clone())
            .json(request)
            .send()
            .await
            .map_err(|source| RequestError::Transport {
                url: url.to_string(),
                source,
            })?;

        Self::read_body(&url, res).await?;
        Ok(())
    }
}
