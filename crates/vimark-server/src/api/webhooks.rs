use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::RequestId;
use crate::workflow::{run_daily_content_generation, WorkflowRequest};

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

/// Payload sent by an external automation scheduler (n8n-style).
#[derive(Debug, Deserialize)]
pub(super) struct WebhookPayload {
    pub trigger: String,
    #[serde(default)]
    pub config: WebhookConfig,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct WebhookConfig {
    pub product_categories: Option<Vec<String>>,
    pub min_relevance_score: Option<f64>,
    pub max_briefs: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(super) enum WebhookResult {
    Triggered {
        status: &'static str,
        workflow_id: Uuid,
        briefs_created: usize,
    },
    UnknownTrigger {
        status: &'static str,
        trigger: String,
    },
}

/// Dispatch a webhook trigger. Only `daily_trend_scan` is recognised;
/// unknown triggers are acknowledged without side effects.
pub(super) async fn trigger(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(payload): Json<WebhookPayload>,
) -> Result<Json<ApiResponse<WebhookResult>>, ApiError> {
    tracing::info!(trigger = %payload.trigger, "webhook received");

    if payload.trigger != "daily_trend_scan" {
        return Ok(Json(ApiResponse {
            data: WebhookResult::UnknownTrigger {
                status: "unknown_trigger",
                trigger: payload.trigger,
            },
            meta: ResponseMeta::new(req_id.0),
        }));
    }

    let workflow_request = WorkflowRequest {
        product_categories: payload.config.product_categories,
        min_relevance_score: payload.config.min_relevance_score,
        max_briefs: payload.config.max_briefs,
    };

    let report = run_daily_content_generation(
        &state.pool,
        &state.config,
        &state.catalog,
        &workflow_request,
    )
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "webhook-triggered scan failed");
        ApiError::new(req_id.0.clone(), "internal_error", "trend scan failed")
    })?;

    Ok(Json(ApiResponse {
        data: WebhookResult::Triggered {
            status: "success",
            workflow_id: report.workflow_id,
            briefs_created: report.briefs_created,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_parses_without_config() {
        let payload: WebhookPayload =
            serde_json::from_str(r#"{"trigger": "daily_trend_scan"}"#).expect("parse");
        assert_eq!(payload.trigger, "daily_trend_scan");
        assert!(payload.config.product_categories.is_none());
    }

    #[test]
    fn payload_parses_scheduler_config() {
        let payload: WebhookPayload = serde_json::from_str(
            r#"{
                "trigger": "daily_trend_scan",
                "timestamp": "2025-11-24T08:00:00Z",
                "config": {
                    "product_categories": ["beauty", "fashion"],
                    "min_relevance_score": 0.6
                }
            }"#,
        )
        .expect("parse");
        assert_eq!(
            payload.config.product_categories,
            Some(vec!["beauty".to_string(), "fashion".to_string()])
        );
        assert_eq!(payload.config.min_relevance_score, Some(0.6));
    }

    #[test]
    fn unknown_trigger_result_serializes_flat() {
        let result = WebhookResult::UnknownTrigger {
            status: "unknown_trigger",
            trigger: "weekly_report".to_string(),
        };
        let json = serde_json::to_value(&result).expect("serialize");
        assert_eq!(json["status"], "unknown_trigger");
        assert_eq!(json["trigger"], "weekly_report");
    }
}
