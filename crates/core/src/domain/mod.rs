pub mod fund;
pub mod user;

pub use fund::{
    FieldValue, FundDetail, Notes, Recommendation, RecommendationEnvelope,
    RecommendationResponse, RETURN_PERIODS,
};
pub use user::{FeedbackRequest, UserId};
