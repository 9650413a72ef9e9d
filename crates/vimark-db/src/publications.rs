// crates/vimark-db/src/publications.rs
use crate::DbError;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PublicationRow {
    pub id: i64,
    pub brief_id: i64,
    pub platform: String,
    pub status: String,
    pub external_ref: Option<String>,
    pub published_at: DateTime<Utc>,
}

pub struct NewPublication<'a> {
    pub brief_id: i64,
    pub platform: &'a str,
    /// "published" or "failed".
    pub status: &'a str,
    pub external_ref: Option<&'a str>,
}

/// Record a publish attempt. Returns the internal ID.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn insert_publication(
    pool: &PgPool,
    new: &NewPublication<'_>,
) -> Result<i64, DbError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO publications (brief_id, platform, status, external_ref) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id",
    )
    .bind(new.brief_id)
    .bind(new.platform)
    .bind(new.status)
    .bind(new.external_ref)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Publish history for a brief, most recent first.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn list_publications_for_brief(
    pool: &PgPool,
    brief_id: i64,
) -> Result<Vec<PublicationRow>, DbError> {
    let rows = sqlx::query_as::<_, PublicationRow>(
        "SELECT id, brief_id, platform, status, external_ref, published_at \
         FROM publications \
         WHERE brief_id = $1 \
         ORDER BY published_at DESC, id DESC",
    )
    .bind(brief_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
