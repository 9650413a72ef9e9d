// crates/vimark-db/src/trends.rs
use crate::DbError;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use sqlx::PgPool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TrendSnapshotRow {
    pub id: i64,
    pub hashtag: String,
    pub views: i64,
    pub posts: i64,
    pub engagement_rate: Decimal,
    pub growth_rate: Decimal,
    pub category: String,
    pub keywords: serde_json::Value,
    pub relevance_score: Decimal,
    pub reasons: serde_json::Value,
    pub recommended_action: String,
    pub discovered_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

pub struct NewTrendSnapshot<'a> {
    pub hashtag: &'a str,
    pub views: i64,
    pub posts: i64,
    pub engagement_rate: f64,
    pub growth_rate: f64,
    pub category: &'a str,
    pub keywords: &'a [String],
    pub relevance_score: f64,
    pub reasons: &'a [String],
    pub recommended_action: &'a str,
    pub discovered_at: DateTime<Utc>,
}

// Scores are f64 in memory; NUMERIC columns take Decimal at the boundary.
fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// Insert one scan survivor. Dedup key: (`hashtag`, `discovered_at`), so a
/// replayed scan does not double-record. Returns the internal ID.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn insert_trend_snapshot(
    pool: &PgPool,
    snapshot: &NewTrendSnapshot<'_>,
) -> Result<i64, DbError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO trend_snapshots \
           (hashtag, views, posts, engagement_rate, growth_rate, category, \
            keywords, relevance_score, reasons, recommended_action, discovered_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         ON CONFLICT (hashtag, discovered_at) DO UPDATE SET \
           relevance_score = EXCLUDED.relevance_score, \
           reasons = EXCLUDED.reasons, \
           recommended_action = EXCLUDED.recommended_action \
         RETURNING id",
    )
    .bind(snapshot.hashtag)
    .bind(snapshot.views)
    .bind(snapshot.posts)
    .bind(to_decimal(snapshot.engagement_rate))
    .bind(to_decimal(snapshot.growth_rate))
    .bind(snapshot.category)
    .bind(serde_json::json!(snapshot.keywords))
    .bind(to_decimal(snapshot.relevance_score))
    .bind(serde_json::json!(snapshot.reasons))
    .bind(snapshot.recommended_action)
    .bind(snapshot.discovered_at)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Most recent snapshots first, highest score first within a scan.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn list_recent_snapshots(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<TrendSnapshotRow>, DbError> {
    let rows = sqlx::query_as::<_, TrendSnapshotRow>(
        "SELECT id, hashtag, views, posts, engagement_rate, growth_rate, category, \
                keywords, relevance_score, reasons, recommended_action, discovered_at, \
                created_at \
         FROM trend_snapshots \
         ORDER BY discovered_at DESC, relevance_score DESC, id ASC \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_conversion_is_exact_for_rule_sums() {
        assert_eq!(to_decimal(0.5), Decimal::new(5, 1));
        assert_eq!(to_decimal(0.8), Decimal::new(8, 1));
        assert_eq!(to_decimal(1.0), Decimal::ONE);
    }

    #[test]
    fn non_finite_scores_collapse_to_zero() {
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
        assert_eq!(to_decimal(f64::INFINITY), Decimal::ZERO);
    }
}
