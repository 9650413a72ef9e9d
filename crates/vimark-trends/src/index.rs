//! Trend index client for persisting relevant trends.
//!
//! The index is an external document store queried later by the content
//! strategist. Documents are addressed by a stable u64 key derived from the
//! document id, so re-upserting the same discovery is idempotent.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::TrendError;
use crate::types::RankedTrend;

/// Document shape the ranker hands to the index upsert.
#[derive(Debug, Clone, Serialize)]
pub struct TrendDocument {
    /// `trend_{hashtag}_{discovery timestamp}`.
    pub id: String,
    /// Indexable text: hashtag followed by the comma-joined keywords.
    pub content: String,
    pub metadata: TrendMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendMetadata {
    pub hashtag: String,
    pub views: u64,
    pub engagement_rate: f64,
    pub growth_rate: f64,
    pub category: String,
    pub relevance_score: f64,
    pub discovered_at: DateTime<Utc>,
}

impl RankedTrend {
    /// Build the index document for this surviving trend.
    #[must_use]
    pub fn to_document(&self) -> TrendDocument {
        TrendDocument {
            id: format!(
                "trend_{}_{}",
                self.trend.hashtag,
                self.discovered_at.to_rfc3339()
            ),
            content: format!("{}: {}", self.trend.hashtag, self.trend.keywords.join(", ")),
            metadata: TrendMetadata {
                hashtag: self.trend.hashtag.clone(),
                views: self.trend.views,
                engagement_rate: self.trend.engagement_rate,
                growth_rate: self.trend.growth_rate,
                category: self.trend.category.clone(),
                relevance_score: self.analysis.relevance_score,
                discovered_at: self.discovered_at,
            },
        }
    }
}

/// Destination for surviving trend documents.
#[allow(async_fn_in_trait)]
pub trait TrendIndex {
    /// Upsert one trend document.
    ///
    /// # Errors
    ///
    /// Returns [`TrendError::Index`] on network or API failure. Failures
    /// propagate to the scan caller; the pipeline performs no retries.
    async fn upsert(&self, doc: &TrendDocument) -> Result<(), TrendError>;
}

/// Index that discards writes. Used for dry runs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullIndex;

impl TrendIndex for NullIndex {
    async fn upsert(&self, doc: &TrendDocument) -> Result<(), TrendError> {
        tracing::debug!(id = %doc.id, "null index: dropping trend document");
        Ok(())
    }
}

/// HTTP client for the trend document index.
pub struct IndexClient {
    client: reqwest::Client,
    base_url: String,
    collection: String,
}

#[derive(Serialize)]
struct UpsertDocumentsRequest {
    documents: Vec<DocumentBody>,
}

#[derive(Serialize)]
struct DocumentBody {
    key: u64,
    id: String,
    content: String,
    payload: HashMap<String, serde_json::Value>,
}

impl IndexClient {
    /// Create a new `IndexClient`.
    #[must_use]
    pub fn new(index_url: &str, collection: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: index_url.trim_end_matches('/').to_string(),
            collection: collection.to_string(),
        }
    }

    /// Ensure the trend collection exists, creating it if absent.
    ///
    /// # Errors
    ///
    /// Returns [`TrendError::Index`] on network or API failure.
    pub async fn ensure_collection(&self) -> Result<(), TrendError> {
        let url = format!("{}/collections/{}", self.base_url, self.collection);
        let check = self.client.get(&url).send().await;

        // If the collection already exists, return early.
        if let Ok(resp) = check {
            if resp.status().is_success() {
                return Ok(());
            }
        }

        let resp = self
            .client
            .put(&url)
            .send()
            .await
            .map_err(|e| TrendError::Index(format!("collection create request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(TrendError::Index(format!(
                "collection create returned status {}",
                resp.status()
            )));
        }

        Ok(())
    }

    /// Check whether a document with this id is already indexed.
    ///
    /// # Errors
    ///
    /// Returns [`TrendError::Index`] on network failure.
    pub async fn document_exists(&self, doc_id: &str) -> Result<bool, TrendError> {
        let key = document_key(doc_id);
        let url = format!(
            "{}/collections/{}/documents/{key}",
            self.base_url, self.collection
        );

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| TrendError::Index(format!("document check request failed: {e}")))?;

        Ok(resp.status().is_success())
    }
}

impl TrendIndex for IndexClient {
    async fn upsert(&self, doc: &TrendDocument) -> Result<(), TrendError> {
        let metadata = serde_json::to_value(&doc.metadata)
            .map_err(|e| TrendError::Index(format!("metadata serialization failed: {e}")))?;

        let mut payload = HashMap::new();
        payload.insert("metadata".to_string(), metadata);

        let body = UpsertDocumentsRequest {
            documents: vec![DocumentBody {
                key: document_key(&doc.id),
                id: doc.id.clone(),
                content: doc.content.clone(),
                payload,
            }],
        };

        let url = format!("{}/collections/{}/documents", self.base_url, self.collection);

        let resp = self
            .client
            .put(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| TrendError::Index(format!("upsert request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(TrendError::Index(format!(
                "upsert returned status {}",
                resp.status()
            )));
        }

        Ok(())
    }
}

/// Derive a stable document key (u64) from a document id.
///
/// Takes the first 8 bytes of SHA-256(id) interpreted as a big-endian u64;
/// the same id always produces the same key.
pub(crate) fn document_key(doc_id: &str) -> u64 {
    let hash = Sha256::digest(doc_id.as_bytes());
    let bytes: [u8; 8] = hash[..8].try_into().expect("SHA256 is at least 8 bytes");
    u64::from_be_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::types::{RecommendedAction, RelevanceAnalysis, Trend};

    use super::*;

    #[test]
    fn document_key_is_stable() {
        let id = "trend_#BeautyHacks_2025-11-24T06:00:00+00:00";
        assert_eq!(document_key(id), document_key(id));
    }

    #[test]
    fn different_ids_produce_different_keys() {
        assert_ne!(document_key("trend_a"), document_key("trend_b"));
    }

    fn make_ranked() -> RankedTrend {
        let discovered_at = Utc.with_ymd_and_hms(2025, 11, 24, 8, 30, 0).unwrap();
        RankedTrend {
            trend: Trend {
                hashtag: "#BeautyHacks".to_string(),
                views: 67_000_000,
                posts: 23_400,
                engagement_rate: 9.2,
                growth_rate: 320.0,
                category: "beauty".to_string(),
                keywords: vec!["làm đẹp".to_string(), "beauty".to_string()],
                trending_since: Utc.with_ymd_and_hms(2025, 11, 24, 6, 0, 0).unwrap(),
            },
            analysis: RelevanceAnalysis {
                trend_id: "#BeautyHacks".to_string(),
                relevance_score: 0.6,
                reasons: vec!["Category match: beauty".to_string()],
                recommended_action: RecommendedAction::CreateContent,
            },
            discovered_at,
        }
    }

    #[test]
    fn to_document_builds_key_content_and_metadata() {
        let doc = make_ranked().to_document();
        assert_eq!(doc.id, "trend_#BeautyHacks_2025-11-24T08:30:00+00:00");
        assert_eq!(doc.content, "#BeautyHacks: làm đẹp, beauty");
        assert_eq!(doc.metadata.views, 67_000_000);
        assert!((doc.metadata.relevance_score - 0.6).abs() < 1e-12);
        assert_eq!(doc.metadata.category, "beauty");
    }

    #[tokio::test]
    async fn upsert_sends_document_body() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/collections/tiktok_trends/documents"))
            .and(body_partial_json(serde_json::json!({
                "documents": [{
                    "id": "trend_#BeautyHacks_2025-11-24T08:30:00+00:00",
                    "content": "#BeautyHacks: làm đẹp, beauty"
                }]
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = IndexClient::new(&server.uri(), "tiktok_trends");
        client
            .upsert(&make_ranked().to_document())
            .await
            .expect("upsert");
    }

    #[tokio::test]
    async fn upsert_failure_is_an_index_error() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/collections/tiktok_trends/documents"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = IndexClient::new(&server.uri(), "tiktok_trends");
        let result = client.upsert(&make_ranked().to_document()).await;

        assert!(matches!(result, Err(TrendError::Index(_))));
    }

    #[tokio::test]
    async fn ensure_collection_skips_create_when_present() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/collections/tiktok_trends"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = IndexClient::new(&server.uri(), "tiktok_trends");
        client.ensure_collection().await.expect("ensure collection");
    }
}
