//! Content brief templating.
//!
//! Briefs are built from deterministic Vietnamese templates keyed on the
//! trend and the best-matched product. A language model can replace the
//! templates later without touching the brief shape.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vimark_core::Product;
use vimark_trends::Trend;

use crate::error::ContentError;
use crate::hashtags::generate_hashtags;

/// Target content format for a brief.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentFormat {
    TiktokVideo,
    FacebookReel,
    InstagramStory,
}

impl ContentFormat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TiktokVideo => "tiktok_video",
            Self::FacebookReel => "facebook_reel",
            Self::InstagramStory => "instagram_story",
        }
    }
}

impl fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentFormat {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tiktok_video" => Ok(Self::TiktokVideo),
            "facebook_reel" => Ok(Self::FacebookReel),
            "instagram_story" => Ok(Self::InstagramStory),
            other => Err(ContentError::UnknownFormat(other.to_string())),
        }
    }
}

/// Three-beat script for short-form video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptOutline {
    pub opening: String,
    pub main_content: String,
    pub cta: String,
}

/// Engagement KPIs attached to a brief.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessMetrics {
    pub target_views: u64,
    pub target_engagement_rate: f64,
    pub target_conversions: u32,
    pub expected_revenue_vnd: i64,
}

const TARGET_VIEWS: u64 = 50_000;
const TARGET_ENGAGEMENT_RATE: f64 = 8.0;
const TARGET_CONVERSIONS: u32 = 100;

/// Vietnamese evening prime time, per audience research in the original
/// campaign playbook.
pub const OPTIMAL_POSTING_TIME: &str = "19:00-21:00 GMT+7 (Vietnamese evening prime time)";

/// A complete brief ready for copywriting and video production.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBrief {
    pub trend_id: String,
    pub product_ids: Vec<String>,
    pub content_format: ContentFormat,
    pub hook: String,
    pub content_angle: String,
    pub script_outline: ScriptOutline,
    pub visual_suggestions: Vec<String>,
    pub voiceover: String,
    pub hashtags: Vec<String>,
    pub optimal_posting_time: String,
    pub success_metrics: SuccessMetrics,
    pub cultural_notes: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Build a brief from a trend and its matched products.
///
/// Templates are keyed on the first product; `products` must be the
/// best-match-first list from the catalog search. Revenue projection is
/// `target_conversions * first product price`, zero when no products match.
#[must_use]
pub fn build_brief(
    trend: &Trend,
    products: &[Product],
    content_format: ContentFormat,
    created_at: DateTime<Utc>,
) -> ContentBrief {
    let lead = products.first();
    let lead_name = lead.map_or("sản phẩm hot", |p| p.name.as_str());
    let lead_price_k = lead.map_or(0, |p| p.price_vnd / 1000);
    let expected_revenue_vnd =
        lead.map_or(0, |p| i64::from(TARGET_CONVERSIONS) * p.price_vnd);

    tracing::info!(
        trend = %trend.hashtag,
        products = products.len(),
        format = %content_format,
        "building content brief"
    );

    let hook = format!(
        "Chị em ơi! Trend {} đang gây bão TikTok, mình phải thử ngay {} nè! ✨",
        trend.hashtag, lead_name
    );

    let content_angle = format!(
        "Review + tutorial: bắt trend {} với {}, quay cận cảnh trước/sau khi dùng",
        trend.hashtag, lead_name
    );

    let script_outline = ScriptOutline {
        opening: format!(
            "Hook với âm thanh trending + text overlay: 'Thử ngay trend {} đang viral!' (3-5s)",
            trend.hashtag
        ),
        main_content: format!(
            "Unboxing {lead_name}, hướng dẫn dùng nhanh, so sánh trước/sau, \
             chia sẻ cảm nhận thật bằng tiếng Việt (15-20s)"
        ),
        cta: format!(
            "Text overlay kèm link shop + voiceover: 'Chỉ {lead_price_k}k thôi, \
             link mua ở shop ngay nào!' (3-5s)"
        ),
    };

    let visual_suggestions = vec![
        "Mở đầu bằng hiệu ứng chuyển cảnh TikTok đang trending".to_string(),
        format!("Quay cận cảnh {lead_name} và cách sử dụng"),
        "So sánh trước/sau bằng màn hình chia đôi".to_string(),
        "Ánh sáng tự nhiên, nền trắng hoặc hồng sạch sẽ".to_string(),
        "Cho thấy bao bì sản phẩm với giá rõ ràng".to_string(),
    ];

    let voiceover = format!(
        "Chào các bạn! Hôm nay mình sẽ review cho các bạn {lead_name} đang được \
         nhiều bạn hỏi theo trend {hashtag}. Bao bì rất xinh, giá chỉ \
         {lead_price_k}k thôi nha! Mình dùng thử thấy rất ổn, các bạn thích thì \
         vào shop của mình mua nhé, link ở dưới nha! ❤️",
        hashtag = trend.hashtag
    );

    let cultural_notes = vec![
        "Xưng hô 'chị em' thân thiện với khán giả nữ".to_string(),
        "Công khai giá rõ ràng, người tiêu dùng Việt coi trọng minh bạch".to_string(),
        "Review trung thực, xây dựng niềm tin thay vì bán hàng cứng".to_string(),
        "Dùng âm thanh trending nhưng giữ voiceover tiếng Việt".to_string(),
    ];

    ContentBrief {
        trend_id: trend.hashtag.clone(),
        product_ids: products.iter().map(|p| p.id.clone()).collect(),
        content_format,
        hook,
        content_angle,
        script_outline,
        visual_suggestions,
        voiceover,
        hashtags: generate_hashtags(&trend.hashtag, &trend.category),
        optimal_posting_time: OPTIMAL_POSTING_TIME.to_string(),
        success_metrics: SuccessMetrics {
            target_views: TARGET_VIEWS,
            target_engagement_rate: TARGET_ENGAGEMENT_RATE,
            target_conversions: TARGET_CONVERSIONS,
            expected_revenue_vnd,
        },
        cultural_notes,
        created_at,
    }
}
