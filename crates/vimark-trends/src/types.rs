use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TrendError;

/// A trending TikTok topic candidate with engagement metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trend {
    /// Identifier, e.g. `"#BeautyHacks"`.
    pub hashtag: String,
    pub views: u64,
    pub posts: u64,
    /// Engagement rate as a percentage, e.g. `9.2`.
    pub engagement_rate: f64,
    /// Percentage growth over the last 24h, e.g. `320.0`.
    pub growth_rate: f64,
    /// Free-text category label, e.g. `"beauty"` or `"product_reviews"`.
    pub category: String,
    /// Keywords in source order. Order is irrelevant for scoring but
    /// preserved for display.
    pub keywords: Vec<String>,
    pub trending_since: DateTime<Utc>,
}

impl Trend {
    /// Check the well-formedness invariants: a non-empty hashtag and
    /// non-negative, finite rates.
    ///
    /// The scorer itself is total and accepts any input; the scan workflow
    /// rejects malformed trends up front via this check.
    ///
    /// # Errors
    ///
    /// Returns [`TrendError::Validation`] naming the offending field.
    pub fn validate(&self) -> Result<(), TrendError> {
        if self.hashtag.trim().is_empty() {
            return Err(TrendError::Validation("hashtag is empty".to_string()));
        }
        if !self.engagement_rate.is_finite() || self.engagement_rate < 0.0 {
            return Err(TrendError::Validation(format!(
                "trend '{}' has invalid engagement_rate {}",
                self.hashtag, self.engagement_rate
            )));
        }
        if !self.growth_rate.is_finite() || self.growth_rate < 0.0 {
            return Err(TrendError::Validation(format!(
                "trend '{}' has invalid growth_rate {}",
                self.hashtag, self.growth_rate
            )));
        }
        Ok(())
    }
}

/// Action recommended for a scored trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    CreateContent,
    Monitor,
}

impl std::fmt::Display for RecommendedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecommendedAction::CreateContent => write!(f, "create_content"),
            RecommendedAction::Monitor => write!(f, "monitor"),
        }
    }
}

/// Result of scoring one trend against the product categories.
///
/// Ephemeral: computed per `(trend, categories)` pair and discarded after use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevanceAnalysis {
    /// Copy of the trend's hashtag.
    pub trend_id: String,
    /// Heuristic score clamped to `[0.0, 1.0]`.
    pub relevance_score: f64,
    /// One human-readable line per scoring rule that fired, in rule order.
    pub reasons: Vec<String>,
    pub recommended_action: RecommendedAction,
}

/// A trend that survived filtering, paired with its analysis and the
/// discovery timestamp the caller needs for the index upsert.
#[derive(Debug, Clone, Serialize)]
pub struct RankedTrend {
    pub trend: Trend,
    pub analysis: RelevanceAnalysis,
    pub discovered_at: DateTime<Utc>,
}

impl RankedTrend {
    /// Composite ranking key: `relevance_score * growth_rate`, descending.
    #[must_use]
    pub fn rank_key(&self) -> f64 {
        self.analysis.relevance_score * self.trend.growth_rate
    }
}
