//! Additive relevance heuristic ranking trends against product categories.

use crate::types::{RecommendedAction, RelevanceAnalysis, Trend};

/// Added once per supplied category that substring-matches the trend category.
/// Uncapped per rule: two matching categories add 0.6.
pub(crate) const CATEGORY_MATCH_BOOST: f64 = 0.3;
pub(crate) const ECOMMERCE_KEYWORD_BOOST: f64 = 0.2;
pub(crate) const HIGH_ENGAGEMENT_BOOST: f64 = 0.2;
pub(crate) const VIRAL_GROWTH_BOOST: f64 = 0.3;

/// Engagement-rate percentage above which the engagement boost fires (strict).
pub(crate) const HIGH_ENGAGEMENT_THRESHOLD: f64 = 10.0;
/// 24h growth percentage above which the viral boost fires (strict).
pub(crate) const VIRAL_GROWTH_THRESHOLD: f64 = 200.0;

/// Scores strictly above this recommend `create_content`. Distinct from the
/// ranking filter threshold, which is caller-supplied and inclusive.
pub(crate) const CREATE_CONTENT_CUTOFF: f64 = 0.5;

/// Keywords that mark a trend as shopping-adjacent. Compared lowercase,
/// whole-keyword.
pub(crate) const ECOMMERCE_KEYWORDS: &[&str] =
    &["mua sắm", "shopping", "giảm giá", "khuyến mãi"];

/// Score a trend against the shop's product categories.
///
/// Rules fire in fixed order, each appending one reason line:
///
/// 1. Category match — `+0.3` for every supplied category that is a
///    case-insensitive substring of the trend category.
/// 2. E-commerce keywords — `+0.2` once if any trend keyword is in
///    [`ECOMMERCE_KEYWORDS`].
/// 3. High engagement — `+0.2` if `engagement_rate > 10`.
/// 4. Viral growth — `+0.3` if `growth_rate > 200`.
///
/// The final score is capped at `1.0`. Pure and deterministic; identical
/// inputs always yield identical output.
#[must_use]
pub fn score(trend: &Trend, product_categories: &[String]) -> RelevanceAnalysis {
    let mut total = 0.0_f64;
    let mut reasons = Vec::new();

    let trend_category = trend.category.to_lowercase();
    for category in product_categories {
        if trend_category.contains(&category.to_lowercase()) {
            total += CATEGORY_MATCH_BOOST;
            reasons.push(format!("Category match: {category}"));
        }
    }

    let keywords: Vec<String> = trend.keywords.iter().map(|k| k.to_lowercase()).collect();
    if ECOMMERCE_KEYWORDS
        .iter()
        .any(|kw| keywords.iter().any(|k| k == kw))
    {
        total += ECOMMERCE_KEYWORD_BOOST;
        reasons.push("E-commerce keywords detected".to_string());
    }

    if trend.engagement_rate > HIGH_ENGAGEMENT_THRESHOLD {
        total += HIGH_ENGAGEMENT_BOOST;
        reasons.push(format!("High engagement rate: {}%", trend.engagement_rate));
    }

    if trend.growth_rate > VIRAL_GROWTH_THRESHOLD {
        total += VIRAL_GROWTH_BOOST;
        reasons.push(format!("Viral growth: {}% in 24h", trend.growth_rate));
    }

    let relevance_score = total.min(1.0);

    let recommended_action = if relevance_score > CREATE_CONTENT_CUTOFF {
        RecommendedAction::CreateContent
    } else {
        RecommendedAction::Monitor
    };

    RelevanceAnalysis {
        trend_id: trend.hashtag.clone(),
        relevance_score,
        reasons,
        recommended_action,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn make_trend(category: &str, keywords: &[&str], engagement: f64, growth: f64) -> Trend {
        Trend {
            hashtag: "#TestTrend".to_string(),
            views: 1_000_000,
            posts: 500,
            engagement_rate: engagement,
            growth_rate: growth,
            category: category.to_string(),
            keywords: keywords.iter().map(ToString::to_string).collect(),
            trending_since: Utc::now(),
        }
    }

    fn categories(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn no_rules_fire_yields_zero_and_monitor() {
        let trend = make_trend("lifestyle", &["vlog"], 9.9, 150.0);
        let analysis = score(&trend, &categories(&["beauty", "fashion"]));
        assert_eq!(analysis.relevance_score, 0.0);
        assert!(analysis.reasons.is_empty());
        assert_eq!(analysis.recommended_action, RecommendedAction::Monitor);
    }

    #[test]
    fn beauty_trend_scores_category_plus_growth() {
        // 0.3 (category) + 0.3 (growth > 200) = 0.6.
        let trend = make_trend(
            "beauty",
            &["làm đẹp", "beauty", "skincare", "makeup"],
            9.2,
            320.0,
        );
        let analysis = score(&trend, &categories(&["beauty"]));
        assert!((analysis.relevance_score - 0.6).abs() < 1e-12);
        assert_eq!(
            analysis.reasons,
            vec![
                "Category match: beauty".to_string(),
                "Viral growth: 320% in 24h".to_string(),
            ]
        );
        assert_eq!(
            analysis.recommended_action,
            RecommendedAction::CreateContent
        );
    }

    #[test]
    fn ecommerce_trend_scores_keyword_plus_engagement() {
        // 0.2 (keyword) + 0.2 (engagement > 10) = 0.4.
        let trend = make_trend(
            "ecommerce",
            &["tiktok shop", "mua hàng", "giảm giá", "khuyến mãi"],
            12.3,
            180.0,
        );
        let analysis = score(&trend, &categories(&["beauty"]));
        assert!((analysis.relevance_score - 0.4).abs() < 1e-12);
        assert_eq!(analysis.recommended_action, RecommendedAction::Monitor);
    }

    #[test]
    fn category_match_is_substring_and_case_insensitive() {
        let trend = make_trend("product_reviews", &[], 0.0, 0.0);
        let analysis = score(&trend, &categories(&["Reviews"]));
        assert!((analysis.relevance_score - 0.3).abs() < 1e-12);
        assert_eq!(analysis.reasons, vec!["Category match: Reviews".to_string()]);
    }

    #[test]
    fn category_match_can_double_count() {
        // Two supplied categories both substring-match "beauty_and_fashion";
        // each adds 0.3, no per-rule cap.
        let trend = make_trend("beauty_and_fashion", &[], 0.0, 0.0);
        let analysis = score(&trend, &categories(&["beauty", "fashion"]));
        assert!((analysis.relevance_score - 0.6).abs() < 1e-12);
        assert_eq!(analysis.reasons.len(), 2);
    }

    #[test]
    fn ecommerce_keyword_boost_fires_once() {
        // Three matching keywords still add only 0.2.
        let trend = make_trend("misc", &["mua sắm", "giảm giá", "khuyến mãi"], 0.0, 0.0);
        let analysis = score(&trend, &[]);
        assert!((analysis.relevance_score - 0.2).abs() < 1e-12);
        assert_eq!(
            analysis.reasons,
            vec!["E-commerce keywords detected".to_string()]
        );
    }

    #[test]
    fn ecommerce_keyword_match_is_case_insensitive() {
        let trend = make_trend("misc", &["Shopping"], 0.0, 0.0);
        let analysis = score(&trend, &[]);
        assert!((analysis.relevance_score - 0.2).abs() < 1e-12);
    }

    #[test]
    fn engagement_threshold_is_strict() {
        let at_threshold = make_trend("misc", &[], 10.0, 0.0);
        assert_eq!(score(&at_threshold, &[]).relevance_score, 0.0);

        let above = make_trend("misc", &[], 10.1, 0.0);
        let analysis = score(&above, &[]);
        assert!((analysis.relevance_score - 0.2).abs() < 1e-12);
        assert_eq!(analysis.reasons, vec!["High engagement rate: 10.1%"]);
    }

    #[test]
    fn growth_threshold_is_strict() {
        let at_threshold = make_trend("misc", &[], 0.0, 200.0);
        assert_eq!(score(&at_threshold, &[]).relevance_score, 0.0);

        let above = make_trend("misc", &[], 0.0, 200.5);
        let analysis = score(&above, &[]);
        assert!((analysis.relevance_score - 0.3).abs() < 1e-12);
        assert_eq!(analysis.reasons, vec!["Viral growth: 200.5% in 24h"]);
    }

    #[test]
    fn score_is_capped_at_one() {
        // Four category matches + keyword + engagement + growth = 1.9 raw.
        let trend = make_trend(
            "beauty_fashion_food_tech",
            &["mua sắm"],
            15.0,
            400.0,
        );
        let analysis = score(
            &trend,
            &categories(&["beauty", "fashion", "food", "tech"]),
        );
        assert_eq!(analysis.relevance_score, 1.0);
        assert_eq!(analysis.reasons.len(), 7);
        assert_eq!(
            analysis.recommended_action,
            RecommendedAction::CreateContent
        );
    }

    #[test]
    fn create_content_cutoff_is_strictly_greater_than_half() {
        // Category (0.3) + keyword (0.2) = exactly 0.5; still monitor.
        let trend = make_trend("beauty", &["mua sắm"], 0.0, 0.0);
        let analysis = score(&trend, &categories(&["beauty"]));
        assert!((analysis.relevance_score - 0.5).abs() < 1e-12);
        assert_eq!(analysis.recommended_action, RecommendedAction::Monitor);
    }

    #[test]
    fn reasons_follow_rule_evaluation_order() {
        let trend = make_trend("beauty", &["shopping"], 12.0, 300.0);
        let analysis = score(&trend, &categories(&["beauty"]));
        assert_eq!(
            analysis.reasons,
            vec![
                "Category match: beauty".to_string(),
                "E-commerce keywords detected".to_string(),
                "High engagement rate: 12%".to_string(),
                "Viral growth: 300% in 24h".to_string(),
            ]
        );
        assert_eq!(analysis.relevance_score, 1.0);
    }

    #[test]
    fn scoring_is_deterministic() {
        let trend = make_trend("beauty", &["shopping"], 12.0, 300.0);
        let cats = categories(&["beauty"]);
        let first = score(&trend, &cats);
        let second = score(&trend, &cats);
        assert_eq!(first, second);
    }

    #[test]
    fn trend_id_copies_hashtag() {
        let trend = make_trend("misc", &[], 0.0, 0.0);
        let analysis = score(&trend, &[]);
        assert_eq!(analysis.trend_id, "#TestTrend");
    }

    #[test]
    fn negative_rates_are_accepted_silently() {
        // Reference behavior: the scorer is total and does not validate.
        // Malformed input is rejected earlier by `Trend::validate` in the
        // scan workflow.
        let trend = make_trend("misc", &[], -5.0, -10.0);
        let analysis = score(&trend, &[]);
        assert_eq!(analysis.relevance_score, 0.0);
        assert_eq!(analysis.recommended_action, RecommendedAction::Monitor);
    }
}
