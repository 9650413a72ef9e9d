use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;
use crate::workflow::{run_daily_content_generation, WorkflowReport, WorkflowRequest};

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct TrendScanRequest {
    pub product_categories: Option<Vec<String>>,
    pub min_relevance_score: Option<f64>,
    pub max_briefs: Option<usize>,
}

/// Trigger a trend scan and queue content briefs for approval.
pub(super) async fn scan_trends(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<TrendScanRequest>,
) -> Result<Json<ApiResponse<WorkflowReport>>, ApiError> {
    if let Some(score) = request.min_relevance_score {
        if !(0.0..=1.0).contains(&score) {
            return Err(ApiError::new(
                req_id.0,
                "validation_error",
                "min_relevance_score must be between 0 and 1",
            ));
        }
    }

    let workflow_request = WorkflowRequest {
        product_categories: request.product_categories,
        min_relevance_score: request.min_relevance_score,
        max_briefs: request.max_briefs,
    };

    let report = run_daily_content_generation(
        &state.pool,
        &state.config,
        &state.catalog,
        &workflow_request,
    )
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "trend scan workflow failed");
        ApiError::new(req_id.0.clone(), "internal_error", "trend scan failed")
    })?;

    Ok(Json(ApiResponse {
        data: report,
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, Deserialize)]
pub(super) struct TrendsQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct TrendSnapshotItem {
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
}

/// Most recently discovered trends, highest score first within a scan.
pub(super) async fn list_trends(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<TrendsQuery>,
) -> Result<Json<ApiResponse<Vec<TrendSnapshotItem>>>, ApiError> {
    let rows = vimark_db::list_recent_snapshots(&state.pool, normalize_limit(query.limit))
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|row| TrendSnapshotItem {
            hashtag: row.hashtag,
            views: row.views,
            posts: row.posts,
            engagement_rate: row.engagement_rate,
            growth_rate: row.growth_rate,
            category: row.category,
            keywords: row.keywords,
            relevance_score: row.relevance_score,
            reasons: row.reasons,
            recommended_action: row.recommended_action,
            discovered_at: row.discovered_at,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
