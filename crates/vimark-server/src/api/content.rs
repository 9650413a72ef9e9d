use std::str::FromStr;

use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vimark_content::{run_copy_generation, ContentBrief, CopyBundle, Platform};
use vimark_db::{BriefRow, BriefStatus};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct GenerateCopyRequest {
    pub brief_id: Uuid,
    pub platforms: Vec<String>,
    #[serde(default)]
    pub generate_variants: bool,
}

/// Look up a brief and require it to be approved.
async fn load_approved_brief(
    state: &AppState,
    req_id: &str,
    brief_id: Uuid,
) -> Result<BriefRow, ApiError> {
    let row = vimark_db::get_brief(&state.pool, brief_id)
        .await
        .map_err(|e| {
            if matches!(e, vimark_db::DbError::NotFound) {
                ApiError::new(req_id.to_string(), "not_found", "brief not found")
            } else {
                map_db_error(req_id.to_string(), &e)
            }
        })?;

    if BriefStatus::parse(&row.status) != Some(BriefStatus::Approved) {
        return Err(ApiError::new(
            req_id.to_string(),
            "conflict",
            format!("brief is {}, not approved", row.status),
        ));
    }

    Ok(row)
}

fn parse_platforms(req_id: &str, names: &[String]) -> Result<Vec<Platform>, ApiError> {
    if names.is_empty() {
        return Err(ApiError::new(
            req_id.to_string(),
            "validation_error",
            "platforms must not be empty",
        ));
    }

    names
        .iter()
        .map(|name| {
            Platform::from_str(name).map_err(|e| {
                ApiError::new(req_id.to_string(), "validation_error", e.to_string())
            })
        })
        .collect()
}

/// Generate platform copy for an approved brief and record it.
pub(super) async fn generate_copy(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<GenerateCopyRequest>,
) -> Result<Json<ApiResponse<CopyBundle>>, ApiError> {
    let platforms = parse_platforms(&req_id.0, &request.platforms)?;
    let row = load_approved_brief(&state, &req_id.0, request.brief_id).await?;

    let brief: ContentBrief = serde_json::from_value(row.brief.clone()).map_err(|e| {
        tracing::error!(brief_id = %row.public_id, error = %e, "stored brief failed to decode");
        ApiError::new(req_id.0.clone(), "internal_error", "stored brief is invalid")
    })?;

    let bundle = run_copy_generation(&brief, &platforms, request.generate_variants);

    for copy in &bundle.copies {
        let payload = serde_json::to_value(copy).map_err(|e| {
            tracing::error!(error = %e, "generated copy failed to encode");
            ApiError::new(req_id.0.clone(), "internal_error", "copy encoding failed")
        })?;
        vimark_db::insert_generated_copy(
            &state.pool,
            &vimark_db::NewGeneratedCopy {
                brief_id: row.id,
                platform: copy.platform.as_str(),
                variant: copy.variant.as_str(),
                tone: copy.tone.as_str(),
                variant_id: copy.variant_id.as_deref(),
                payload: &payload,
            },
        )
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    }

    Ok(Json(ApiResponse {
        data: bundle,
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, Deserialize)]
pub(super) struct PublishRequest {
    pub brief_id: Uuid,
    pub platforms: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct PublishOutcome {
    pub platform: String,
    pub status: String,
    pub post_id: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub(super) struct PublishReport {
    pub brief_id: Uuid,
    pub platforms: Vec<String>,
    pub results: Vec<PublishOutcome>,
    pub published_at: DateTime<Utc>,
}

/// Simulated platform publish. Real platform API integrations slot in here;
/// each result is still recorded in the publication history.
fn publish_to_platform(platform: Platform) -> PublishOutcome {
    let post_id = format!("{platform}_{}", Uuid::new_v4().simple());
    PublishOutcome {
        platform: platform.to_string(),
        status: "published".to_string(),
        url: format!("https://{platform}.com/post/{post_id}"),
        post_id,
    }
}

/// Publish an approved brief's content to the requested platforms.
pub(super) async fn publish_content(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<PublishRequest>,
) -> Result<Json<ApiResponse<PublishReport>>, ApiError> {
    let platforms = parse_platforms(&req_id.0, &request.platforms)?;
    let row = load_approved_brief(&state, &req_id.0, request.brief_id).await?;

    let mut results = Vec::with_capacity(platforms.len());
    for &platform in &platforms {
        let outcome = publish_to_platform(platform);
        tracing::info!(
            brief_id = %row.public_id,
            platform = %platform,
            post_id = %outcome.post_id,
            "content published"
        );

        vimark_db::insert_publication(
            &state.pool,
            &vimark_db::NewPublication {
                brief_id: row.id,
                platform: &outcome.platform,
                status: &outcome.status,
                external_ref: Some(&outcome.post_id),
            },
        )
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

        results.push(outcome);
    }

    Ok(Json(ApiResponse {
        data: PublishReport {
            brief_id: row.public_id,
            platforms: request.platforms,
            results,
            published_at: Utc::now(),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_platforms_rejects_empty_list() {
        let err = parse_platforms("req-1", &[]).expect_err("empty list");
        assert_eq!(err.error.code, "validation_error");
    }

    #[test]
    fn parse_platforms_rejects_unknown_platform() {
        let names = vec!["facebook".to_string(), "myspace".to_string()];
        let err = parse_platforms("req-2", &names).expect_err("unknown platform");
        assert_eq!(err.error.code, "validation_error");
        assert!(err.error.message.contains("myspace"));
    }

    #[test]
    fn parse_platforms_accepts_known_set() {
        let names = vec!["facebook".to_string(), "tiktok".to_string()];
        let platforms = parse_platforms("req-3", &names).expect("parse");
        assert_eq!(platforms, vec![Platform::Facebook, Platform::Tiktok]);
    }

    #[test]
    fn publish_outcome_carries_platform_prefixed_post_id() {
        let outcome = publish_to_platform(Platform::Shopee);
        assert_eq!(outcome.platform, "shopee");
        assert_eq!(outcome.status, "published");
        assert!(outcome.post_id.starts_with("shopee_"));
        assert!(outcome.url.contains(&outcome.post_id));
    }
}
