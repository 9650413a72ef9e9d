//! Vietnamese hashtag generation for content briefs.

/// Per-category Vietnamese hashtag sets.
const CATEGORY_HASHTAGS: &[(&str, &[&str])] = &[
    (
        "beauty",
        &["#LàmĐẹp", "#BeautyVietNam", "#MakeupTips", "#Skincare"],
    ),
    (
        "fashion",
        &["#ThờiTrang", "#FashionVN", "#OOTD", "#StyleViệtNam"],
    ),
    (
        "food",
        &["#ĂnVặt", "#FoodVietNam", "#SnackTime", "#ĂnNgon"],
    ),
    (
        "electronics",
        &["#CôngNghệ", "#TechVN", "#Gadget", "#ĐiệnTử"],
    ),
];

/// Appended to every hashtag set.
const ECOMMERCE_HASHTAGS: &[&str] = &["#TikTokShop", "#MuaSắm", "#GiảmGiá", "#Review"];

const MAX_HASHTAGS: usize = 10;

/// Generate hashtags for a piece of content: the trending hashtag first,
/// category-specific Vietnamese tags, then the e-commerce staples, capped at
/// ten.
#[must_use]
pub fn generate_hashtags(trend_hashtag: &str, category: &str) -> Vec<String> {
    let mut hashtags = vec![trend_hashtag.to_string()];

    if let Some((_, tags)) = CATEGORY_HASHTAGS
        .iter()
        .find(|(name, _)| category.eq_ignore_ascii_case(name))
    {
        hashtags.extend(tags.iter().map(ToString::to_string));
    }

    hashtags.extend(ECOMMERCE_HASHTAGS.iter().map(ToString::to_string));

    hashtags.truncate(MAX_HASHTAGS);
    hashtags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trending_hashtag_comes_first() {
        let tags = generate_hashtags("#BeautyHacks", "beauty");
        assert_eq!(tags[0], "#BeautyHacks");
    }

    #[test]
    fn known_category_adds_its_set() {
        let tags = generate_hashtags("#BeautyHacks", "beauty");
        assert!(tags.contains(&"#LàmĐẹp".to_string()));
        assert!(tags.contains(&"#TikTokShop".to_string()));
    }

    #[test]
    fn unknown_category_still_gets_ecommerce_tags() {
        let tags = generate_hashtags("#SomeTrend", "automotive");
        assert_eq!(
            tags,
            vec!["#SomeTrend", "#TikTokShop", "#MuaSắm", "#GiảmGiá", "#Review"]
        );
    }

    #[test]
    fn never_more_than_ten_hashtags() {
        for category in ["beauty", "fashion", "food", "electronics", "misc"] {
            assert!(generate_hashtags("#T", category).len() <= 10);
        }
    }

    #[test]
    fn category_lookup_is_case_insensitive() {
        let tags = generate_hashtags("#T", "Beauty");
        assert!(tags.contains(&"#LàmĐẹp".to_string()));
    }
}
