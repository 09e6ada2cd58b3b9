use crate::domain::{FeedbackRequest, RecommendationResponse, UserId};
use crate::error::RequestError;

pub mod http;

pub use http::HttpRecommendationApi;

/// The upstream recommendation backend.
#[async_trait::async_trait]
pub trait RecommendationApi: Send + Sync {
    /// Where requests go; used for logging.
    fn endpoint(&self) -> &str;

    async fn fetch_recommendations(
        &self,
        user_id: &UserId,
    ) -> Result<RecommendationResponse, RequestError>;

    async fn submit_feedback(&self, request: &FeedbackRequest) -> Result<(), RequestError>;
}
