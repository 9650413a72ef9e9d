// crates/vimark-db/src/copy.rs
use crate::DbError;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GeneratedCopyRow {
    pub id: i64,
    pub brief_id: i64,
    pub platform: String,
    pub variant: String,
    pub tone: String,
    pub variant_id: Option<String>,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

pub struct NewGeneratedCopy<'a> {
    pub brief_id: i64,
    pub platform: &'a str,
    pub variant: &'a str,
    pub tone: &'a str,
    pub variant_id: Option<&'a str>,
    /// Body, hashtags, call to action, and validation metadata as JSON.
    pub payload: &'a serde_json::Value,
}

/// Record one generated copy. Returns the internal ID.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn insert_generated_copy(
    pool: &PgPool,
    new: &NewGeneratedCopy<'_>,
) -> Result<i64, DbError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO generated_copy (brief_id, platform, variant, tone, variant_id, payload) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING id",
    )
    .bind(new.brief_id)
    .bind(new.platform)
    .bind(new.variant)
    .bind(new.tone)
    .bind(new.variant_id)
    .bind(new.payload)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// All copy generated for a brief, in generation order.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn list_copy_for_brief(
    pool: &PgPool,
    brief_id: i64,
) -> Result<Vec<GeneratedCopyRow>, DbError> {
    let rows = sqlx::query_as::<_, GeneratedCopyRow>(
        "SELECT id, brief_id, platform, variant, tone, variant_id, payload, created_at \
         FROM generated_copy \
         WHERE brief_id = $1 \
         ORDER BY id ASC",
    )
    .bind(brief_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
