//! `scan` command: discover trends, rank them, and queue briefs.
//!
//! Mirrors the server's daily workflow but prints its results instead of
//! returning a report. With `--dry-run` nothing is written anywhere; the
//! ranked table is the only output.

use std::str::FromStr;

use vimark_content::{run_strategy_session, CatalogIndex, ContentFormat};
use vimark_core::AppConfig;
use vimark_db::{insert_brief, insert_trend_snapshot, NewBrief, NewTrendSnapshot};
use vimark_trends::{
    run_trend_scan, IndexClient, NullIndex, ScanOutcome, ScanParams, StaticTrendSource,
    TickerTrendsClient, TimeRange, TrendError, TrendSource,
};

const MAX_PRODUCTS_PER_BRIEF: usize = 2;
const BRIEF_FORMATS: [ContentFormat; 1] = [ContentFormat::TiktokVideo];

/// Run a trend scan and, unless `pool` is `None`, persist the results.
///
/// # Errors
///
/// Returns an error if the catalog fails to load, the trend source or index
/// is unreachable, or a database write fails.
pub(crate) async fn run_scan(
    pool: Option<&sqlx::PgPool>,
    config: &AppConfig,
    categories: &[String],
    min_score: Option<f64>,
    max_briefs: Option<usize>,
) -> anyhow::Result<()> {
    let catalog_file = vimark_core::load_catalog(&config.catalog_path)?;
    let catalog = CatalogIndex::new(catalog_file.products);

    let product_categories = if categories.is_empty() {
        catalog.categories()
    } else {
        categories.to_vec()
    };
    let min_relevance_score = min_score.unwrap_or(config.min_relevance_score);
    let max_briefs = max_briefs.unwrap_or(config.max_briefs_per_scan);

    let params = ScanParams {
        region: config.trends_region.clone(),
        limit: config.trends_limit,
        time_range: TimeRange::from_str(&config.trends_time_range)?,
        product_categories: product_categories.clone(),
        min_relevance_score,
    };

    let offline = pool.is_none();
    let outcome = scan_with_configured_source(config, &params, offline).await?;

    println!(
        "scanned {} trends for categories [{}]; {} at or above {min_relevance_score}",
        outcome.fetched,
        product_categories.join(", "),
        outcome.ranked.len()
    );

    if outcome.ranked.is_empty() {
        println!("no relevant trends found");
        return Ok(());
    }

    println!();
    let header = format!(
        "{:<22}{:<8}{:<10}{:<16}CATEGORY",
        "HASHTAG", "SCORE", "GROWTH", "ACTION"
    );
    println!("{header}");
    for entry in &outcome.ranked {
        println!(
            "{:<22}{:<8.2}{:<10.1}{:<16}{}",
            entry.trend.hashtag,
            entry.analysis.relevance_score,
            entry.trend.growth_rate,
            entry.analysis.recommended_action.to_string(),
            entry.trend.category
        );
    }

    let Some(pool) = pool else {
        println!();
        println!("dry run: nothing recorded");
        return Ok(());
    };

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

    let mut queued = 0usize;
    println!();
    for entry in outcome.ranked.iter().take(max_briefs) {
        let briefs = run_strategy_session(
            &entry.trend,
            &catalog,
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
            println!(
                "queued brief {} for {} ({})",
                row.public_id, brief.trend_id, row.content_format
            );
            queued += 1;
        }
    }

    println!();
    println!("{queued} briefs pending approval; review with `briefs pending`");
    Ok(())
}

async fn scan_with_configured_source(
    config: &AppConfig,
    params: &ScanParams,
    offline: bool,
) -> Result<ScanOutcome, TrendError> {
    match (&config.tickertrends_base_url, &config.tickertrends_api_key) {
        (Some(base_url), Some(api_key)) => {
            let source = TickerTrendsClient::new(base_url, api_key);
            scan_with_configured_index(&source, config, params, offline).await
        }
        _ => {
            tracing::info!("tickertrends credentials not set, using reference trends");
            scan_with_configured_index(&StaticTrendSource, config, params, offline).await
        }
    }
}

async fn scan_with_configured_index<S: TrendSource>(
    source: &S,
    config: &AppConfig,
    params: &ScanParams,
    offline: bool,
) -> Result<ScanOutcome, TrendError> {
    if offline {
        return run_trend_scan(source, &NullIndex, params).await;
    }
    match &config.index_url {
        Some(index_url) => {
            let index = IndexClient::new(index_url, &config.index_collection);
            index.ensure_collection().await?;
            run_trend_scan(source, &index, params).await
        }
        None => run_trend_scan(source, &NullIndex, params).await,
    }
}
