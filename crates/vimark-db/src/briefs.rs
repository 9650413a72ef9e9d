// crates/vimark-db/src/briefs.rs
//
// Approval queue for content briefs. The queue is durable: pending briefs
// survive restarts and approvals carry reviewer feedback.
use crate::DbError;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Brief lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BriefStatus {
    Pending,
    Approved,
    Rejected,
}

impl BriefStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BriefRow {
    pub id: i64,
    pub public_id: Uuid,
    pub trend_id: String,
    pub content_format: String,
    pub product_ids: serde_json::Value,
    pub brief: serde_json::Value,
    pub status: String,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
}

pub struct NewBrief<'a> {
    pub trend_id: &'a str,
    pub content_format: &'a str,
    pub product_ids: &'a [String],
    /// Full brief document (hook, script, hashtags, metrics) as JSON.
    pub brief: &'a serde_json::Value,
}

/// Insert a brief in `pending` state.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn insert_brief(pool: &PgPool, new: &NewBrief<'_>) -> Result<BriefRow, DbError> {
    let row = sqlx::query_as::<_, BriefRow>(
        "INSERT INTO content_briefs (trend_id, content_format, product_ids, brief) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, public_id, trend_id, content_format, product_ids, brief, \
                   status, feedback, created_at, approved_at",
    )
    .bind(new.trend_id)
    .bind(new.content_format)
    .bind(serde_json::json!(new.product_ids))
    .bind(new.brief)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Briefs in a given state, oldest first so reviewers see the backlog in
/// arrival order.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn list_briefs_by_status(
    pool: &PgPool,
    status: BriefStatus,
    limit: i64,
) -> Result<Vec<BriefRow>, DbError> {
    let rows = sqlx::query_as::<_, BriefRow>(
        "SELECT id, public_id, trend_id, content_format, product_ids, brief, \
                status, feedback, created_at, approved_at \
         FROM content_briefs \
         WHERE status = $1 \
         ORDER BY created_at ASC, id ASC \
         LIMIT $2",
    )
    .bind(status.as_str())
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Look up a brief by its public ID.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no brief has that ID.
pub async fn get_brief(pool: &PgPool, public_id: Uuid) -> Result<BriefRow, DbError> {
    sqlx::query_as::<_, BriefRow>(
        "SELECT id, public_id, trend_id, content_format, product_ids, brief, \
                status, feedback, created_at, approved_at \
         FROM content_briefs WHERE public_id = $1",
    )
    .bind(public_id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

/// Approve a pending brief, stamping `approved_at`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no pending brief has that ID.
pub async fn approve_brief(
    pool: &PgPool,
    public_id: Uuid,
    feedback: Option<&str>,
) -> Result<BriefRow, DbError> {
    sqlx::query_as::<_, BriefRow>(
        "UPDATE content_briefs \
         SET status = 'approved', feedback = $2, approved_at = NOW() \
         WHERE public_id = $1 AND status = 'pending' \
         RETURNING id, public_id, trend_id, content_format, product_ids, brief, \
                   status, feedback, created_at, approved_at",
    )
    .bind(public_id)
    .bind(feedback)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

/// Reject a pending brief with optional reviewer feedback.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no pending brief has that ID.
pub async fn reject_brief(
    pool: &PgPool,
    public_id: Uuid,
    feedback: Option<&str>,
) -> Result<BriefRow, DbError> {
    sqlx::query_as::<_, BriefRow>(
        "UPDATE content_briefs \
         SET status = 'rejected', feedback = $2 \
         WHERE public_id = $1 AND status = 'pending' \
         RETURNING id, public_id, trend_id, content_format, product_ids, brief, \
                   status, feedback, created_at, approved_at",
    )
    .bind(public_id)
    .bind(feedback)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips() {
        for status in [BriefStatus::Pending, BriefStatus::Approved, BriefStatus::Rejected] {
            assert_eq!(BriefStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BriefStatus::parse("archived"), None);
    }
}
