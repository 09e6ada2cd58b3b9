use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Return periods rendered on every fund card, in display order.
pub const RETURN_PERIODS: [&str; 3] = ["1Y", "3Y", "5Y"];

/// A figure the backend may send either as a JSON number or as preformatted text
/// (`"45.12"`, `"₹ 12,000 Cr"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s.trim()),
        }
    }
}

/// Free-text pros/cons: a single paragraph or a list of points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Notes {
    Text(String),
    Lines(Vec<String>),
}

impl Notes {
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Lines(lines) => lines.iter().all(|l| l.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundDetail {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub nav: Option<FieldValue>,
    #[serde(default)]
    pub aum: Option<FieldValue>,
    #[serde(default)]
    pub returns: Option<BTreeMap<String, Option<FieldValue>>>,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub resource_url: Option<String>,
}

impl FundDetail {
    pub fn return_for(&self, period: &str) -> Option<&FieldValue> {
        self.returns.as_ref()?.get(period)?.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(flatten)]
    pub fund: FundDetail,
    #[serde(default)]
    pub pros: Option<Notes>,
    #[serde(default)]
    pub cons: Option<Notes>,
}

impl Recommendation {
    pub fn name(&self) -> &str {
        &self.fund.name
    }
}

/// Body of `GET /mf/recommendations/{user_id}`. Extra fields (`user_id`, `budget`) are
/// ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationEnvelope {
    pub recommendation: RecommendationResponse,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub user_fund_details: Vec<FundDetail>,
    #[serde(default, alias = "recommended_funds", deserialize_with = "null_as_empty")]
    pub recommendations: Vec<Recommendation>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ranking: Vec<String>,
}

impl RecommendationResponse {
    /// First recommendation whose name equals `name` exactly.
    pub fn find_recommendation(&self, name: &str) -> Option<&Recommendation> {
        self.recommendations.iter().find(|r| r.name() == name)
    }

    /// Recommendations in ranking order, each with its 0-based position in `ranking`.
    /// Ranked names without a matching record are skipped but keep their position.
    pub fn ranked(&self) -> Vec<(usize, &Recommendation)> {
        self.ranking
            .iter()
            .enumerate()
            .filter_map(|(rank, name)| self.find_recommendation(name).map(|rec| (rank, rec)))
            .collect()
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
