//! `trends` command: read-only view of recorded trend snapshots.

/// Show the most recently discovered trends.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_trends_status(pool: &sqlx::PgPool, limit: i64) -> anyhow::Result<()> {
    let snapshots = vimark_db::list_recent_snapshots(pool, limit).await?;

    if snapshots.is_empty() {
        println!("no trend snapshots recorded; run `scan` first");
        return Ok(());
    }

    let header = format!(
        "{:<12}{:<22}{:<8}{:<10}{:<16}{:<12}KEYWORDS",
        "DISCOVERED", "HASHTAG", "SCORE", "GROWTH", "ACTION", "CATEGORY"
    );
    println!("{header}");
    for snapshot in &snapshots {
        let keywords = snapshot
            .keywords
            .as_array()
            .map(|words| {
                words
                    .iter()
                    .filter_map(|w| w.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        println!(
            "{:<12}{:<22}{:<8}{:<10}{:<16}{:<12}{}",
            snapshot.discovered_at.format("%Y-%m-%d").to_string(),
            snapshot.hashtag,
            snapshot.relevance_score.to_string(),
            snapshot.growth_rate.to_string(),
            snapshot.recommended_action,
            snapshot.category,
            keywords
        );
    }

    Ok(())
}
