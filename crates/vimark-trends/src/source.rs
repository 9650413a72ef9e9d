//! Trend source collaborators.
//!
//! [`StaticTrendSource`] serves the built-in reference table for local
//! development; [`TickerTrendsClient`] talks to the TickerTrends HTTP API.

use chrono::TimeZone;
use chrono::Utc;
use serde::Deserialize;

use crate::error::TrendError;
use crate::types::Trend;

/// Time window for a trend fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    Hours24,
    Days7,
    Days30,
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeRange::Hours24 => write!(f, "24h"),
            TimeRange::Days7 => write!(f, "7d"),
            TimeRange::Days30 => write!(f, "30d"),
        }
    }
}

impl std::str::FromStr for TimeRange {
    type Err = TrendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "24h" => Ok(TimeRange::Hours24),
            "7d" => Ok(TimeRange::Days7),
            "30d" => Ok(TimeRange::Days30),
            other => Err(TrendError::Validation(format!(
                "unknown time range '{other}'; expected 24h, 7d, or 30d"
            ))),
        }
    }
}

/// Supplier of trending-topic candidates.
#[allow(async_fn_in_trait)]
pub trait TrendSource {
    /// Fetch candidate trends for a region, result limit, and time window.
    ///
    /// # Errors
    ///
    /// Returns [`TrendError`] if the underlying source fails. The static
    /// source never fails.
    async fn fetch(
        &self,
        region: &str,
        limit: usize,
        time_range: TimeRange,
    ) -> Result<Vec<Trend>, TrendError>;
}

/// Fixed reference table of trending topics.
///
/// Region, limit, and time range are logged but do not filter the table.
/// Always succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticTrendSource;

impl TrendSource for StaticTrendSource {
    async fn fetch(
        &self,
        region: &str,
        limit: usize,
        time_range: TimeRange,
    ) -> Result<Vec<Trend>, TrendError> {
        tracing::info!(region, limit, %time_range, "serving static trend table");
        Ok(reference_trends())
    }
}

/// The five reference trends with their original engagement metrics.
#[must_use]
pub fn reference_trends() -> Vec<Trend> {
    let ts = |y, mo, d, h| {
        Utc.with_ymd_and_hms(y, mo, d, h, 0, 0)
            .single()
            .unwrap_or_default()
    };

    vec![
        Trend {
            hashtag: "#ReviewSảnPhẩm".to_string(),
            views: 125_000_000,
            posts: 45_200,
            engagement_rate: 8.5,
            growth_rate: 245.0,
            category: "product_reviews".to_string(),
            keywords: ["đánh giá", "review", "mua sắm", "shopping"]
                .map(String::from)
                .to_vec(),
            trending_since: ts(2025, 11, 23, 10),
        },
        Trend {
            hashtag: "#TikTokShop".to_string(),
            views: 890_000_000,
            posts: 125_000,
            engagement_rate: 12.3,
            growth_rate: 180.0,
            category: "ecommerce".to_string(),
            keywords: ["tiktok shop", "mua hàng", "giảm giá", "khuyến mãi"]
                .map(String::from)
                .to_vec(),
            trending_since: ts(2025, 11, 22, 8),
        },
        Trend {
            hashtag: "#BeautyHacks".to_string(),
            views: 67_000_000,
            posts: 23_400,
            engagement_rate: 9.2,
            growth_rate: 320.0,
            category: "beauty".to_string(),
            keywords: ["làm đẹp", "beauty", "skincare", "makeup"]
                .map(String::from)
                .to_vec(),
            trending_since: ts(2025, 11, 24, 6),
        },
        Trend {
            hashtag: "#TechViệtNam".to_string(),
            views: 45_000_000,
            posts: 12_800,
            engagement_rate: 7.8,
            growth_rate: 156.0,
            category: "technology".to_string(),
            keywords: ["công nghệ", "tech", "điện thoại", "gadget"]
                .map(String::from)
                .to_vec(),
            trending_since: ts(2025, 11, 23, 14),
        },
        Trend {
            hashtag: "#ĂnVặt".to_string(),
            views: 234_000_000,
            posts: 67_800,
            engagement_rate: 15.6,
            growth_rate: 410.0,
            category: "food".to_string(),
            keywords: ["đồ ăn vặt", "snack", "food", "ẩm thực"]
                .map(String::from)
                .to_vec(),
            trending_since: ts(2025, 11, 24, 9),
        },
    ]
}

/// TickerTrends HTTP API client.
pub struct TickerTrendsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct TrendsEnvelope {
    data: Vec<Trend>,
}

impl TickerTrendsClient {
    /// Create a new client for the given API base URL and bearer key.
    #[must_use]
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

impl TrendSource for TickerTrendsClient {
    async fn fetch(
        &self,
        region: &str,
        limit: usize,
        time_range: TimeRange,
    ) -> Result<Vec<Trend>, TrendError> {
        let url = format!("{}/v1/trends", self.base_url);

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(&[
                ("region", region),
                ("limit", &limit.to_string()),
                ("time_range", &time_range.to_string()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(TrendError::Api(format!(
                "trends request returned status {}",
                resp.status()
            )));
        }

        let envelope: TrendsEnvelope = resp.json().await?;

        tracing::debug!(
            region,
            count = envelope.data.len(),
            "fetched trends from TickerTrends"
        );

        Ok(envelope.data)
    }
}
