use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct PendingQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct PendingBriefItem {
    pub brief_id: Uuid,
    pub trend_id: String,
    pub content_format: String,
    pub product_ids: serde_json::Value,
    pub brief: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub(super) struct PendingApprovals {
    pub count: usize,
    pub briefs: Vec<PendingBriefItem>,
}

/// The approval backlog, oldest first.
pub(super) async fn list_pending_approvals(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<PendingQuery>,
) -> Result<Json<ApiResponse<PendingApprovals>>, ApiError> {
    let rows = vimark_db::list_briefs_by_status(
        &state.pool,
        vimark_db::BriefStatus::Pending,
        normalize_limit(query.limit),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let briefs: Vec<PendingBriefItem> = rows
        .into_iter()
        .map(|row| PendingBriefItem {
            brief_id: row.public_id,
            trend_id: row.trend_id,
            content_format: row.content_format,
            product_ids: row.product_ids,
            brief: row.brief,
            created_at: row.created_at,
        })
        .collect();

    Ok(Json(ApiResponse {
        data: PendingApprovals {
            count: briefs.len(),
            briefs,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, Deserialize)]
pub(super) struct ApprovalRequest {
    pub brief_id: Uuid,
    pub approved: bool,
    #[serde(default)]
    pub feedback: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ApprovalDecision {
    pub brief_id: Uuid,
    pub approved: bool,
    pub status: String,
    pub feedback: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
}

/// Record a human approval decision for a pending brief.
pub(super) async fn submit_approval(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<ApprovalRequest>,
) -> Result<Json<ApiResponse<ApprovalDecision>>, ApiError> {
    let feedback = request.feedback.as_deref();

    let row = if request.approved {
        vimark_db::approve_brief(&state.pool, request.brief_id, feedback).await
    } else {
        vimark_db::reject_brief(&state.pool, request.brief_id, feedback).await
    }
    .map_err(|e| {
        if matches!(e, vimark_db::DbError::NotFound) {
            ApiError::new(req_id.0.clone(), "not_found", "pending brief not found")
        } else {
            map_db_error(req_id.0.clone(), &e)
        }
    })?;

    tracing::info!(
        brief_id = %row.public_id,
        approved = request.approved,
        "approval decision recorded"
    );

    Ok(Json(ApiResponse {
        data: ApprovalDecision {
            brief_id: row.public_id,
            approved: request.approved,
            status: row.status,
            feedback: row.feedback,
            approved_at: row.approved_at,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approval_request_defaults_feedback_to_none() {
        let request: ApprovalRequest = serde_json::from_str(
            r#"{"brief_id": "4b2f7b2a-5a70-4d2e-9c3c-8cf6f2b1a111", "approved": true}"#,
        )
        .expect("parse");
        assert!(request.approved);
        assert!(request.feedback.is_none());
    }

    #[test]
    fn approval_decision_is_serializable() {
        let decision = ApprovalDecision {
            brief_id: Uuid::new_v4(),
            approved: false,
            status: "rejected".to_string(),
            feedback: Some("tone too pushy".to_string()),
            approved_at: None,
        };
        let json = serde_json::to_string(&decision).expect("serialize");
        assert!(json.contains("\"status\":\"rejected\""));
        assert!(json.contains("\"approved_at\":null"));
    }
}
