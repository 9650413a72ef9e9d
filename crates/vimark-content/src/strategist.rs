//! Strategy session orchestration: trend in, briefs out.

use chrono::Utc;

use vimark_trends::Trend;

use crate::brief::{build_brief, ContentBrief, ContentFormat};
use crate::matcher::ProductCatalog;

/// Match a trend against the catalog and build one brief per requested
/// format. Returns an empty list when no products match.
pub fn run_strategy_session<C: ProductCatalog>(
    trend: &Trend,
    catalog: &C,
    max_products: usize,
    content_formats: &[ContentFormat],
) -> Vec<ContentBrief> {
    tracing::info!(trend = %trend.hashtag, "starting strategy session");

    let query = format!("{} {}", trend.hashtag, trend.keywords.join(" "));
    let products = catalog.search(&query, Some(&trend.category), max_products);

    if products.is_empty() {
        tracing::warn!(trend = %trend.hashtag, "no products matched, skipping briefs");
        return Vec::new();
    }

    tracing::info!(trend = %trend.hashtag, matched = products.len(), "matched products");

    let created_at = Utc::now();
    let briefs: Vec<ContentBrief> = content_formats
        .iter()
        .map(|&format| build_brief(trend, &products, format, created_at))
        .collect();

    tracing::info!(trend = %trend.hashtag, briefs = briefs.len(), "created content briefs");
    briefs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::CatalogIndex;
    use chrono::TimeZone;
    use vimark_core::Product;

    fn beauty_trend() -> Trend {
        Trend {
            hashtag: "#BeautyHacks".to_string(),
            views: 67_000_000,
            posts: 198_000,
            engagement_rate: 9.2,
            growth_rate: 320.0,
            category: "beauty".to_string(),
            keywords: vec!["làm đẹp".to_string(), "beauty".to_string()],
            trending_since: Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap(),
        }
    }

    fn catalog() -> CatalogIndex {
        CatalogIndex::new(vec![
            Product {
                id: "PROD001".to_string(),
                name: "Son Lì Bền Màu 24H".to_string(),
                name_en: "Long-lasting Matte Lipstick 24H".to_string(),
                category: "beauty".to_string(),
                price_vnd: 259_000,
                description: String::new(),
                tags: vec!["beauty".to_string(), "makeup".to_string()],
                inventory: 450,
                rating: 4.8,
                image_url: None,
            },
            Product {
                id: "PROD004".to_string(),
                name: "Snack Hạnh Nhân Mật Ong".to_string(),
                name_en: "Honey Roasted Almonds Snack".to_string(),
                category: "food".to_string(),
                price_vnd: 89_000,
                description: String::new(),
                tags: vec!["food".to_string(), "snack".to_string()],
                inventory: 680,
                rating: 4.9,
                image_url: None,
            },
        ])
    }

    #[test]
    fn one_brief_per_requested_format() {
        let briefs = run_strategy_session(
            &beauty_trend(),
            &catalog(),
            3,
            &[ContentFormat::TiktokVideo, ContentFormat::FacebookReel],
        );
        assert_eq!(briefs.len(), 2);
        assert_eq!(briefs[0].content_format, ContentFormat::TiktokVideo);
        assert_eq!(briefs[1].content_format, ContentFormat::FacebookReel);
        // Same session, same timestamp.
        assert_eq!(briefs[0].created_at, briefs[1].created_at);
    }

    #[test]
    fn briefs_only_reference_category_products() {
        let briefs =
            run_strategy_session(&beauty_trend(), &catalog(), 3, &[ContentFormat::TiktokVideo]);
        assert_eq!(briefs[0].product_ids, vec!["PROD001"]);
    }

    #[test]
    fn no_matching_products_means_no_briefs() {
        let mut trend = beauty_trend();
        trend.category = "automotive".to_string();
        let briefs =
            run_strategy_session(&trend, &catalog(), 3, &[ContentFormat::TiktokVideo]);
        assert!(briefs.is_empty());
    }

    #[test]
    fn no_formats_means_no_briefs_even_with_matches() {
        let briefs = run_strategy_session(&beauty_trend(), &catalog(), 3, &[]);
        assert!(briefs.is_empty());
    }
}
