//! Platform-specific Vietnamese copy generation.
//!
//! Copy comes from deterministic templates keyed on platform and variant,
//! then gets validated against platform character limits, hashtag rules, and
//! emoji usage guidelines.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::brief::ContentBrief;
use crate::error::ContentError;

/// Publishing platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Facebook,
    Tiktok,
    Shopee,
    Instagram,
}

impl Platform {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Facebook => "facebook",
            Self::Tiktok => "tiktok",
            Self::Shopee => "shopee",
            Self::Instagram => "instagram",
        }
    }

    /// Hard caption limit enforced by the platform.
    #[must_use]
    pub fn hard_limit(self) -> usize {
        match self {
            Self::Facebook => 63_206,
            Self::Tiktok | Self::Instagram => 2_200,
            Self::Shopee => 3_000,
        }
    }

    /// Optimal length for engagement, the limit copy is validated against.
    #[must_use]
    pub fn optimal_limit(self) -> usize {
        match self {
            Self::Facebook => 80,
            Self::Tiktok => 300,
            Self::Shopee | Self::Instagram => 500,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "facebook" => Ok(Self::Facebook),
            "tiktok" => Ok(Self::Tiktok),
            "shopee" => Ok(Self::Shopee),
            "instagram" => Ok(Self::Instagram),
            other => Err(ContentError::UnknownPlatform(other.to_string())),
        }
    }
}

/// Copy angle for A/B testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyVariant {
    Default,
    Promotional,
    Storytelling,
    Educational,
    Humorous,
}

impl CopyVariant {
    pub const ALL: [Self; 5] = [
        Self::Default,
        Self::Promotional,
        Self::Storytelling,
        Self::Educational,
        Self::Humorous,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Promotional => "promotional",
            Self::Storytelling => "storytelling",
            Self::Educational => "educational",
            Self::Humorous => "humorous",
        }
    }
}

impl fmt::Display for CopyVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CopyVariant {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| ContentError::UnknownVariant(s.to_string()))
    }
}

/// Tone of voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Casual,
    Enthusiastic,
    Professional,
}

impl Tone {
    pub const ALL: [Self; 3] = [Self::Casual, Self::Enthusiastic, Self::Professional];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Casual => "casual",
            Self::Enthusiastic => "enthusiastic",
            Self::Professional => "professional",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ContentError::UnknownTone(s.to_string()))
    }
}

/// The copy itself: body text, trailing hashtags, and a call to action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformCopy {
    pub body: String,
    pub hashtags: Vec<String>,
    pub call_to_action: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashtagValidation {
    pub valid: bool,
    pub count: usize,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiAnalysis {
    pub emoji_count: usize,
    pub optimal: bool,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopyMetadata {
    pub character_count: usize,
    pub character_limit: usize,
    pub within_limit: bool,
    pub hashtag_validation: HashtagValidation,
    pub emoji_analysis: EmojiAnalysis,
    pub generated_at: DateTime<Utc>,
}

/// Generated copy with its validation metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedCopy {
    pub platform: Platform,
    pub variant: CopyVariant,
    pub tone: Tone,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<String>,
    pub copy: PlatformCopy,
    pub metadata: CopyMetadata,
}

/// Copy for a brief across all requested platforms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyBundle {
    pub brief_id: String,
    pub platforms: Vec<Platform>,
    pub generated_at: DateTime<Utc>,
    pub copies: Vec<GeneratedCopy>,
}

const MIN_HASHTAGS: usize = 3;
const MAX_HASHTAGS: usize = 30;

fn hashtag_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#\S+$").expect("hashtag pattern"))
}

/// Validate hashtag count and format.
#[must_use]
pub fn validate_hashtags(hashtags: &[String]) -> HashtagValidation {
    let mut issues = Vec::new();

    if hashtags.len() > MAX_HASHTAGS {
        issues.push(format!("Too many hashtags (max {MAX_HASHTAGS} recommended)"));
    }
    if hashtags.len() < MIN_HASHTAGS {
        issues.push(format!("Too few hashtags (min {MIN_HASHTAGS} recommended)"));
    }
    for tag in hashtags {
        if !tag.starts_with('#') {
            issues.push(format!("Hashtag missing #: {tag}"));
        } else if !hashtag_pattern().is_match(tag) {
            issues.push(format!("Hashtag contains space: {tag}"));
        }
    }

    HashtagValidation {
        valid: issues.is_empty(),
        count: hashtags.len(),
        issues,
    }
}

const EMOJI_CHARS: [&str; 20] = [
    "😍", "💄", "✨", "🔥", "💖", "👗", "🎉", "💯", "😊", "🌟", "💕", "❤️", "🥰", "😘", "🤩",
    "💋", "👄", "🎀", "💅", "🌸",
];

const MAX_EMOJIS: usize = 5;
const MIN_EMOJIS: usize = 2;

/// Count emojis from the campaign emoji set and rate the usage. Two to five
/// is the sweet spot for Vietnamese social copy.
#[must_use]
pub fn analyze_emojis(text: &str) -> EmojiAnalysis {
    let emoji_count: usize = EMOJI_CHARS
        .iter()
        .map(|emoji| text.matches(emoji).count())
        .sum();

    let recommendation = if emoji_count < MIN_EMOJIS {
        "Add more emojis"
    } else if emoji_count <= MAX_EMOJIS {
        "Good emoji usage"
    } else {
        "Too many emojis"
    };

    EmojiAnalysis {
        emoji_count,
        optimal: (MIN_EMOJIS..=MAX_EMOJIS).contains(&emoji_count),
        recommendation: recommendation.to_string(),
    }
}

fn render_copy(brief: &ContentBrief, platform: Platform, variant: CopyVariant) -> PlatformCopy {
    let trend = &brief.trend_id;
    let tags: Vec<String> = brief.hashtags.iter().take(5).cloned().collect();

    match platform {
        Platform::Facebook => match variant {
            CopyVariant::Promotional => PlatformCopy {
                body: format!(
                    "Chị em ơi! Deal hot theo trend {trend} đây! 🔥\n\n{hook}\n\n\
                     Shop ship toàn quốc, đặt ngay kẻo hết! 💖",
                    hook = brief.hook
                ),
                hashtags: tags,
                call_to_action: "Inbox shop để đặt hàng ngay nha các bạn!".to_string(),
            },
            _ => PlatformCopy {
                body: format!(
                    "Hôm nay mình review cho các bạn theo trend {trend} nha! 💄\n\n\
                     {angle}\n\nDùng rồi mình phải công nhận là rất ổn luôn nè! 😍",
                    angle = brief.content_angle
                ),
                hashtags: tags,
                call_to_action: "Comment 'Đẹp' để mình gửi link shop nha!".to_string(),
            },
        },
        Platform::Tiktok => PlatformCopy {
            body: format!(
                "Trend {trend} hot nhất tuần này! 🔥\n\n{hook}\n\n\
                 Link shop ở dưới, các bạn múa tay lên nào! 💖",
                hook = brief.hook
            ),
            hashtags: tags,
            call_to_action: "Lướt qua shop ngay! 👇".to_string(),
        },
        Platform::Shopee => PlatformCopy {
            body: format!(
                "BẮT TREND {trend} - HÀNG CHÍNH HÃNG 💄\n\n\
                 🌟 ĐẶC ĐIỂM NỔI BẬT:\n{angle}\n\n\
                 ✨ CAM KẾT:\n✓ Hàng chính hãng 100%\n✓ Đổi trả trong 7 ngày\n\
                 ✓ Freeship đơn từ 50K\n\n📦 Giao hàng toàn quốc\n\nĐẶT NGAY HÔM NAY! 💯",
                angle = brief.content_angle
            ),
            hashtags: tags,
            call_to_action: "Thêm vào giỏ hàng ngay!".to_string(),
        },
        Platform::Instagram => PlatformCopy {
            body: format!(
                "Moment of the day theo trend {trend} 💄✨\n\n{hook}\n\n\
                 Swipe để xem before/after nè! 😍",
                hook = brief.hook
            ),
            hashtags: tags,
            call_to_action: "Save post này để khỏi quên nha!".to_string(),
        },
    }
}

/// Generate copy for one platform and wrap it with validation metadata.
#[must_use]
pub fn generate_platform_copy(
    brief: &ContentBrief,
    platform: Platform,
    variant: CopyVariant,
    tone: Tone,
) -> GeneratedCopy {
    tracing::info!(%platform, %variant, %tone, "generating platform copy");

    let copy = render_copy(brief, platform, variant);
    let character_count = copy.body.chars().count();
    let character_limit = platform.optimal_limit();

    GeneratedCopy {
        platform,
        variant,
        tone,
        variant_id: None,
        metadata: CopyMetadata {
            character_count,
            character_limit,
            within_limit: character_count <= character_limit,
            hashtag_validation: validate_hashtags(&copy.hashtags),
            emoji_analysis: analyze_emojis(&copy.body),
            generated_at: Utc::now(),
        },
        copy,
    }
}

/// Generate `num_variants` A/B variants for a platform, cycling through the
/// variant and tone tables independently.
#[must_use]
pub fn generate_ab_variants(
    brief: &ContentBrief,
    platform: Platform,
    num_variants: usize,
) -> Vec<GeneratedCopy> {
    tracing::info!(%platform, num_variants, "generating A/B variants");

    (0..num_variants)
        .map(|i| {
            let variant = CopyVariant::ALL[i % CopyVariant::ALL.len()];
            let tone = Tone::ALL[i % Tone::ALL.len()];
            let mut copy = generate_platform_copy(brief, platform, variant, tone);
            copy.variant_id = Some(format!("{platform}_v{}_{variant}", i + 1));
            copy
        })
        .collect()
}

const AB_VARIANT_COUNT: usize = 3;

/// Generate copy for every requested platform. With `generate_variants` set
/// each platform gets three A/B variants instead of a single default.
#[must_use]
pub fn run_copy_generation(
    brief: &ContentBrief,
    platforms: &[Platform],
    generate_variants: bool,
) -> CopyBundle {
    tracing::info!(
        brief = %brief.trend_id,
        platforms = platforms.len(),
        generate_variants,
        "starting copy generation"
    );

    let mut copies = Vec::new();
    for &platform in platforms {
        if generate_variants {
            copies.extend(generate_ab_variants(brief, platform, AB_VARIANT_COUNT));
        } else {
            copies.push(generate_platform_copy(
                brief,
                platform,
                CopyVariant::Default,
                Tone::Casual,
            ));
        }
    }

    CopyBundle {
        brief_id: brief.trend_id.clone(),
        platforms: platforms.to_vec(),
        generated_at: Utc::now(),
        copies,
    }
}
