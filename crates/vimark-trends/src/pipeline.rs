//! Trend scan orchestration.

use chrono::{DateTime, Utc};

use crate::error::TrendError;
use crate::index::TrendIndex;
use crate::scorer::score;
use crate::source::{TimeRange, TrendSource};
use crate::types::{RankedTrend, Trend};

/// Parameters for one trend scan.
#[derive(Debug, Clone)]
pub struct ScanParams {
    pub region: String,
    pub limit: usize,
    pub time_range: TimeRange,
    /// Product categories the shop sells, matched against trend categories.
    pub product_categories: Vec<String>,
    /// Inclusive relevance threshold for keeping a trend.
    pub min_relevance_score: f64,
}

/// Score every trend, keep those at or above the threshold, and rank.
///
/// Trends are scored in input order. A trend whose score equals
/// `min_relevance_score` exactly is retained (inclusive bound — distinct from
/// the scorer's strict `create_content` cutoff). Survivors sort descending by
/// `relevance_score * growth_rate`; the sort is stable, so ties keep their
/// original fetch order.
///
/// `discovered_at` stamps every survivor with the same discovery timestamp,
/// which also keys the index upsert. Pure: no I/O, deterministic for
/// identical inputs.
#[must_use]
pub fn filter_and_rank(
    trends: Vec<Trend>,
    product_categories: &[String],
    min_relevance_score: f64,
    discovered_at: DateTime<Utc>,
) -> Vec<RankedTrend> {
    let mut ranked: Vec<RankedTrend> = trends
        .into_iter()
        .filter_map(|trend| {
            let analysis = score(&trend, product_categories);
            if analysis.relevance_score >= min_relevance_score {
                Some(RankedTrend {
                    trend,
                    analysis,
                    discovered_at,
                })
            } else {
                None
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.rank_key()
            .partial_cmp(&a.rank_key())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    ranked
}

/// Result of one trend scan.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// How many trends the source returned before filtering.
    pub fetched: usize,
    /// Survivors in rank order.
    pub ranked: Vec<RankedTrend>,
}

/// Run a full trend scan: fetch, validate, filter/rank, and index survivors.
///
/// Each surviving trend is upserted into the index as a document keyed by
/// `trend_{hashtag}_{discovered_at}`. Collaborator failures (source or
/// index) propagate to the caller; there are no retries.
///
/// # Errors
///
/// Returns [`TrendError::Validation`] if the source produced a malformed
/// trend, or the source/index error otherwise.
pub async fn run_trend_scan<S, I>(
    source: &S,
    index: &I,
    params: &ScanParams,
) -> Result<ScanOutcome, TrendError>
where
    S: TrendSource,
    I: TrendIndex,
{
    tracing::info!(
        region = %params.region,
        categories = ?params.product_categories,
        min_score = params.min_relevance_score,
        "starting trend scan"
    );

    let trends = source
        .fetch(&params.region, params.limit, params.time_range)
        .await?;

    for trend in &trends {
        trend.validate()?;
    }

    let fetched = trends.len();
    let ranked = filter_and_rank(
        trends,
        &params.product_categories,
        params.min_relevance_score,
        Utc::now(),
    );

    for entry in &ranked {
        index.upsert(&entry.to_document()).await?;
    }

    tracing::info!(
        fetched,
        relevant = ranked.len(),
        min_score = params.min_relevance_score,
        "trend scan complete"
    );

    Ok(ScanOutcome { fetched, ranked })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::TimeZone;

    use crate::index::{NullIndex, TrendDocument};
    use crate::source::StaticTrendSource;
    use crate::types::RecommendedAction;

    use super::*;

    fn make_trend(hashtag: &str, category: &str, engagement: f64, growth: f64) -> Trend {
        Trend {
            hashtag: hashtag.to_string(),
            views: 1_000_000,
            posts: 500,
            engagement_rate: engagement,
            growth_rate: growth,
            category: category.to_string(),
            keywords: Vec::new(),
            trending_since: Utc::now(),
        }
    }

    fn categories(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 24, 8, 0, 0).unwrap()
    }

    #[test]
    fn keeps_trend_exactly_at_threshold() {
        // Category match alone scores 0.3; the bound is inclusive.
        let trends = vec![make_trend("#A", "beauty", 0.0, 0.0)];
        let ranked = filter_and_rank(trends, &categories(&["beauty"]), 0.3, now());
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].trend.hashtag, "#A");
    }

    #[test]
    fn drops_trend_below_threshold() {
        let trends = vec![make_trend("#A", "beauty", 0.0, 0.0)];
        let ranked = filter_and_rank(trends, &categories(&["beauty"]), 0.31, now());
        assert!(ranked.is_empty());
    }

    #[test]
    fn ranks_by_relevance_times_growth_descending() {
        // #Low: 0.3 * 100 = 30. #High: 0.3 * 400 ... but growth > 200 adds
        // 0.3, so #High scores 0.6 * 400 = 240.
        let trends = vec![
            make_trend("#Low", "beauty", 0.0, 100.0),
            make_trend("#High", "beauty", 0.0, 400.0),
        ];
        let ranked = filter_and_rank(trends, &categories(&["beauty"]), 0.0, now());
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].trend.hashtag, "#High");
        assert_eq!(ranked[1].trend.hashtag, "#Low");
    }

    #[test]
    fn equal_rank_keys_preserve_fetch_order() {
        // Identical metrics give identical composite keys; the stable sort
        // must keep the original order.
        let trends = vec![
            make_trend("#First", "beauty", 0.0, 150.0),
            make_trend("#Second", "beauty", 0.0, 150.0),
            make_trend("#Third", "beauty", 0.0, 150.0),
        ];
        let ranked = filter_and_rank(trends, &categories(&["beauty"]), 0.0, now());
        let order: Vec<&str> = ranked.iter().map(|r| r.trend.hashtag.as_str()).collect();
        assert_eq!(order, vec!["#First", "#Second", "#Third"]);
    }

    #[test]
    fn zero_threshold_keeps_zero_score_trends() {
        let trends = vec![make_trend("#A", "lifestyle", 0.0, 0.0)];
        let ranked = filter_and_rank(trends, &categories(&["beauty"]), 0.0, now());
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].analysis.relevance_score, 0.0);
        assert_eq!(
            ranked[0].analysis.recommended_action,
            RecommendedAction::Monitor
        );
    }

    #[test]
    fn all_survivors_share_the_discovery_timestamp() {
        let stamp = now();
        let trends = vec![
            make_trend("#A", "beauty", 0.0, 100.0),
            make_trend("#B", "beauty", 0.0, 200.0),
        ];
        let ranked = filter_and_rank(trends, &categories(&["beauty"]), 0.0, stamp);
        assert!(ranked.iter().all(|r| r.discovered_at == stamp));
    }

    /// Index that records upserted document ids.
    #[derive(Default)]
    struct RecordingIndex {
        ids: Mutex<Vec<String>>,
    }

    impl TrendIndex for RecordingIndex {
        async fn upsert(&self, doc: &TrendDocument) -> Result<(), TrendError> {
            self.ids.lock().expect("lock").push(doc.id.clone());
            Ok(())
        }
    }

    /// Index that always fails.
    struct FailingIndex;

    impl TrendIndex for FailingIndex {
        async fn upsert(&self, _doc: &TrendDocument) -> Result<(), TrendError> {
            Err(TrendError::Index("index unavailable".to_string()))
        }
    }

    fn scan_params(min_score: f64) -> ScanParams {
        ScanParams {
            region: "VN".to_string(),
            limit: 50,
            time_range: TimeRange::Hours24,
            product_categories: categories(&["beauty", "fashion", "electronics", "food"]),
            min_relevance_score: min_score,
        }
    }

    #[tokio::test]
    async fn scan_against_reference_table_ranks_expected_trends() {
        // With categories [beauty, fashion, electronics, food] and threshold
        // 0.5 the static table yields: #ĂnVặt (food + engagement + growth =
        // 0.8, key 328), #BeautyHacks (beauty + growth = 0.6, key 192), and
        // #ReviewSảnPhẩm (keywords + growth = 0.5 exactly, kept by the
        // inclusive bound, key 122.5). #TikTokShop scores 0.4 and is dropped.
        let outcome = run_trend_scan(&StaticTrendSource, &NullIndex, &scan_params(0.5))
            .await
            .expect("scan");

        assert_eq!(outcome.fetched, 5);
        let ranked = &outcome.ranked;
        let order: Vec<&str> = ranked.iter().map(|r| r.trend.hashtag.as_str()).collect();
        assert_eq!(order, vec!["#ĂnVặt", "#BeautyHacks", "#ReviewSảnPhẩm"]);
        assert!((ranked[0].analysis.relevance_score - 0.8).abs() < 1e-12);
        assert!((ranked[1].analysis.relevance_score - 0.6).abs() < 1e-12);
        assert!((ranked[2].analysis.relevance_score - 0.5).abs() < 1e-12);
    }

    #[tokio::test]
    async fn scan_upserts_one_document_per_survivor() {
        let index = RecordingIndex::default();
        let outcome = run_trend_scan(&StaticTrendSource, &index, &scan_params(0.5))
            .await
            .expect("scan");

        let ids = index.ids.lock().expect("lock");
        assert_eq!(ids.len(), outcome.ranked.len());
        assert!(ids[0].starts_with("trend_#ĂnVặt_"));
        assert!(ids[1].starts_with("trend_#BeautyHacks_"));
    }

    #[tokio::test]
    async fn index_failure_propagates() {
        let result = run_trend_scan(&StaticTrendSource, &FailingIndex, &scan_params(0.0)).await;
        assert!(matches!(result, Err(TrendError::Index(_))));
    }

    #[tokio::test]
    async fn malformed_source_trend_fails_validation() {
        struct BadSource;

        impl TrendSource for BadSource {
            async fn fetch(
                &self,
                _region: &str,
                _limit: usize,
                _time_range: TimeRange,
            ) -> Result<Vec<Trend>, TrendError> {
                Ok(vec![make_trend("#Bad", "misc", -3.0, 0.0)])
            }
        }

        let result = run_trend_scan(&BadSource, &NullIndex, &scan_params(0.0)).await;
        assert!(matches!(result, Err(TrendError::Validation(_))));
    }

    #[tokio::test]
    async fn scan_is_deterministic_for_identical_inputs() {
        let params = scan_params(0.5);
        let first = run_trend_scan(&StaticTrendSource, &NullIndex, &params)
            .await
            .expect("scan");
        let second = run_trend_scan(&StaticTrendSource, &NullIndex, &params)
            .await
            .expect("scan");

        assert_eq!(first.ranked.len(), second.ranked.len());
        for (a, b) in first.ranked.iter().zip(&second.ranked) {
            assert_eq!(a.analysis, b.analysis);
        }
    }
}
