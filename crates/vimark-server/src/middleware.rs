//! Request-id propagation, bearer auth, and rate limiting.

use std::{
    collections::HashSet,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tokio::sync::Mutex;
use uuid::Uuid;
use vimark_core::Environment;

/// Request ID carried through request extensions and echoed in responses.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Accepted bearer tokens. An empty set means auth is disabled.
#[derive(Debug, Clone)]
pub struct AuthState {
    keys: Arc<HashSet<String>>,
}

impl AuthState {
    fn from_keys(keys: HashSet<String>) -> Self {
        Self {
            keys: Arc::new(keys),
        }
    }

    /// Read accepted tokens from `VIMARK_API_KEYS` (comma-separated).
    ///
    /// Development tolerates a missing variable and runs unauthenticated;
    /// every other environment refuses to start without keys.
    ///
    /// # Errors
    ///
    /// Returns an error when no keys are configured outside development.
    pub fn from_env(env: &Environment) -> anyhow::Result<Self> {
        let keys: HashSet<String> = std::env::var("VIMARK_API_KEYS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(ToOwned::to_owned)
            .collect();

        if keys.is_empty() && *env != Environment::Development {
            anyhow::bail!(
                "VIMARK_API_KEYS must list at least one bearer token in the {env} environment"
            );
        }
        if keys.is_empty() {
            tracing::warn!("VIMARK_API_KEYS not set; bearer auth disabled for local development");
        }

        Ok(Self::from_keys(keys))
    }

    fn accepts(&self, token: &str) -> bool {
        self.keys.contains(token)
    }

    fn is_enforced(&self) -> bool {
        !self.keys.is_empty()
    }
}

/// Fixed-window counter shared by all protected routes.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    counter: Arc<Mutex<WindowCounter>>,
}

#[derive(Debug)]
struct WindowCounter {
    opened_at: Instant,
    seen: usize,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            counter: Arc::new(Mutex::new(WindowCounter {
                opened_at: Instant::now(),
                seen: 0,
            })),
        }
    }

    /// Count one request against the current window. Returns `false` once
    /// the window's budget is spent; a fresh window resets the count.
    async fn try_acquire(&self) -> bool {
        let mut counter = self.counter.lock().await;
        if counter.opened_at.elapsed() >= self.window {
            counter.opened_at = Instant::now();
            counter.seen = 0;
        }
        if counter.seen >= self.max_requests {
            return false;
        }
        counter.seen += 1;
        true
    }
}

fn reject(status: StatusCode, code: &str, message: &str) -> Response {
    let body = serde_json::json!({
        "error": { "code": code, "message": message }
    });
    (status, Json(body)).into_response()
}

/// Attach a request ID to the request extensions and the response headers.
///
/// An incoming `x-request-id` header wins so callers can correlate retries;
/// otherwise a fresh UUIDv4 is generated.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = match req.headers().get("x-request-id").map(HeaderValue::to_str) {
        Some(Ok(value)) => value.to_string(),
        _ => Uuid::new_v4().to_string(),
    };
    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", value);
    }
    res
}

/// Reject requests whose `Authorization` header carries no accepted token.
pub async fn require_bearer_auth(
    State(auth): State<AuthState>,
    req: Request,
    next: Next,
) -> Response {
    if !auth.is_enforced() {
        return next.run(req).await;
    }

    match extract_bearer_token(req.headers().get(AUTHORIZATION)) {
        Some(token) if auth.accepts(token) => next.run(req).await,
        _ => reject(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "missing or invalid bearer token",
        ),
    }
}

/// Reject requests once the shared window budget is spent.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    if rate_limit.try_acquire().await {
        next.run(req).await
    } else {
        reject(
            StatusCode::TOO_MANY_REQUESTS,
            "rate_limited",
            "rate limit exceeded",
        )
    }
}

fn extract_bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|token| !token.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_bearer_token_accepts_valid_header() {
        let header = HeaderValue::from_static("Bearer test-token");
        assert_eq!(extract_bearer_token(Some(&header)), Some("test-token"));
    }

    #[test]
    fn extract_bearer_token_rejects_non_bearer_scheme() {
        let header = HeaderValue::from_static("Basic abc123");
        assert_eq!(extract_bearer_token(Some(&header)), None);
    }

    #[test]
    fn extract_bearer_token_rejects_blank_token() {
        let header = HeaderValue::from_static("Bearer   ");
        assert_eq!(extract_bearer_token(Some(&header)), None);
    }

    #[test]
    fn auth_without_keys_is_not_enforced() {
        let auth = AuthState::from_keys(HashSet::new());
        assert!(!auth.is_enforced());
    }

    #[test]
    fn auth_accepts_only_configured_keys() {
        let auth = AuthState::from_keys(HashSet::from(["secret-1".to_string()]));
        assert!(auth.is_enforced());
        assert!(auth.accepts("secret-1"));
        assert!(!auth.accepts("secret-2"));
    }

    #[tokio::test]
    async fn rate_limit_exhausts_window_budget() {
        let limiter = RateLimitState::new(2, Duration::from_secs(60));
        assert!(limiter.try_acquire().await);
        assert!(limiter.try_acquire().await);
        assert!(!limiter.try_acquire().await);
    }

    #[tokio::test]
    async fn rate_limit_resets_after_window() {
        let limiter = RateLimitState::new(1, Duration::from_millis(10));
        assert!(limiter.try_acquire().await);
        assert!(!limiter.try_acquire().await);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(limiter.try_acquire().await);
    }
}
