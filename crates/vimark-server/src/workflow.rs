//! Daily trend-to-content workflow.
//!
//! Discovers trends, scores them against the shop's categories, records
//! snapshots, and queues content briefs for human approval. Triggered by the
//! scheduler, the scan endpoint, and the webhook.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use vimark_content::{run_strategy_session, CatalogIndex, ContentFormat};
use vimark_core::AppConfig;
use vimark_db::{insert_brief, insert_trend_snapshot, NewBrief, NewTrendSnapshot};
use vimark_trends::{
    run_trend_scan, IndexClient, NullIndex, ScanOutcome, ScanParams, StaticTrendSource,
    TickerTrendsClient, TimeRange, TrendError, TrendSource,
};

const MAX_PRODUCTS_PER_BRIEF: usize = 2;
const BRIEF_FORMATS: [ContentFormat; 1] = [ContentFormat::TiktokVideo];

/// Per-run overrides accepted by the scan endpoint and the webhook. `None`
/// falls back to the server configuration (and the catalog's categories).
#[derive(Debug, Clone, Default)]
pub struct WorkflowRequest {
    pub product_categories: Option<Vec<String>>,
    pub min_relevance_score: Option<f64>,
    pub max_briefs: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowReport {
    pub workflow_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub product_categories: Vec<String>,
    pub trends_discovered: usize,
    pub trends_relevant: usize,
    pub briefs_created: usize,
    /// Public IDs of the briefs queued for approval.
    pub brief_ids: Vec<Uuid>,
    pub status: WorkflowStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Completed,
    NoTrendsFound,
}

/// Run the full daily pipeline: scan, snapshot, and queue briefs.
///
/// Trends are processed in rank order; at most `max_briefs` trends get a
/// strategy session, mirroring the daily brief budget.
///
/// # Errors
///
/// Propagates source, index, and database failures. A failed run records
/// nothing past the point of failure; there are no retries.
pub async fn run_daily_content_generation(
    pool: &PgPool,
    config: &AppConfig,
    catalog: &CatalogIndex,
    request: &WorkflowRequest,
) -> anyhow::Result<WorkflowReport> {
    let workflow_id = Uuid::new_v4();
    let started_at = Utc::now();

    let product_categories = request
        .product_categories
        .clone()
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| catalog.categories());
    let min_relevance_score = request
        .min_relevance_score
        .unwrap_or(config.min_relevance_score);
    let max_briefs = request.max_briefs.unwrap_or(config.max_briefs_per_scan);

    tracing::info!(
        %workflow_id,
        categories = ?product_categories,
        min_relevance_score,
        max_briefs,
        "starting daily content generation workflow"
    );

    let params = ScanParams {
        region: config.trends_region.clone(),
        limit: config.trends_limit,
        time_range: TimeRange::from_str(&config.trends_time_range)?,
        product_categories: product_categories.clone(),
        min_relevance_score,
    };

    let outcome = scan_with_configured_source(config, &params).await?;

    for entry in &outcome.ranked {
        insert_trend_snapshot(
            pool,
            &NewTrendSnapshot {
                hashtag: &entry.trend.hashtag,
                views: i64::try_from(entry.trend.views).unwrap_or(i64::MAX),
                posts: i64::try_from(entry.trend.posts).unwrap_or(i64::MAX),
                engagement_rate: entry.trend.engagement_rate,
                growth_rate: entry.trend.growth_rate,
                category: &entry.trend.category,
                keywords: &entry.trend.keywords,
                relevance_score: entry.analysis.relevance_score,
                reasons: &entry.analysis.reasons,
                recommended_action: &entry.analysis.recommended_action.to_string(),
                discovered_at: entry.discovered_at,
            },
        )
        .await?;
    }

    if outcome.ranked.is_empty() {
        tracing::warn!(%workflow_id, "no relevant trends found, ending workflow");
        return Ok(WorkflowReport {
            workflow_id,
            started_at,
            completed_at: Utc::now(),
            product_categories,
            trends_discovered: outcome.fetched,
            trends_relevant: 0,
            briefs_created: 0,
            brief_ids: Vec::new(),
            status: WorkflowStatus::NoTrendsFound,
        });
    }

    let mut brief_ids = Vec::new();
    for entry in outcome.ranked.iter().take(max_briefs) {
        let briefs = run_strategy_session(
            &entry.trend,
            catalog,
            MAX_PRODUCTS_PER_BRIEF,
            &BRIEF_FORMATS,
        );

        for brief in &briefs {
            let row = insert_brief(
                pool,
                &NewBrief {
                    trend_id: &brief.trend_id,
                    content_format: brief.content_format.as_str(),
                    product_ids: &brief.product_ids,
                    brief: &serde_json::to_value(brief)?,
                },
            )
            .await?;
            brief_ids.push(row.public_id);
        }
    }

    let report = WorkflowReport {
        workflow_id,
        started_at,
        completed_at: Utc::now(),
        product_categories,
        trends_discovered: outcome.fetched,
        trends_relevant: outcome.ranked.len(),
        briefs_created: brief_ids.len(),
        brief_ids,
        status: WorkflowStatus::Completed,
    };

    tracing::info!(
        %workflow_id,
        trends_discovered = report.trends_discovered,
        trends_relevant = report.trends_relevant,
        briefs_created = report.briefs_created,
        "workflow completed"
    );

    Ok(report)
}

/// Pick the trend source from configuration: the TickerTrends API when both
/// key and base URL are set, the built-in static table otherwise.
async fn scan_with_configured_source(
    config: &AppConfig,
    params: &ScanParams,
) -> Result<ScanOutcome, TrendError> {
    match (&config.tickertrends_api_key, &config.tickertrends_base_url) {
        (Some(api_key), Some(base_url)) => {
            let source = TickerTrendsClient::new(base_url, api_key);
            scan_with_configured_index(&source, config, params).await
        }
        _ => {
            tracing::info!("TickerTrends credentials not set, using static trend table");
            scan_with_configured_index(&StaticTrendSource, config, params).await
        }
    }
}

/// Pick the trend index from configuration: the document index when a URL is
/// set, a no-op sink otherwise.
async fn scan_with_configured_index<S: TrendSource>(
    source: &S,
    config: &AppConfig,
    params: &ScanParams,
) -> Result<ScanOutcome, TrendError> {
    if let Some(index_url) = &config.index_url {
        let index = IndexClient::new(index_url, &config.index_collection);
        index.ensure_collection().await?;
        run_trend_scan(source, &index, params).await
    } else {
        run_trend_scan(source, &NullIndex, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workflow_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(WorkflowStatus::NoTrendsFound).expect("serialize"),
            serde_json::json!("no_trends_found")
        );
    }

    #[test]
    fn request_defaults_leave_overrides_unset() {
        let request = WorkflowRequest::default();
        assert!(request.product_categories.is_none());
        assert!(request.min_relevance_score.is_none());
        assert!(request.max_briefs.is_none());
    }
}
