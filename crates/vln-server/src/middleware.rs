use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Caller identity for rate limiting: `x-forwarded-for`, then `x-real-ip`,
/// then the shared `anonymous` bucket.
pub fn client_identifier(headers: &HeaderMap) -> String {
    ["x-forwarded-for", "x-real-ip"]
        .iter()
        .filter_map(|name| headers.get(*name))
        .filter_map(|v| v.to_str().ok())
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map_or_else(|| "anonymous".to_string(), String::from)
}

#[derive(Debug, Clone, Copy)]
struct ClientWindow {
    count: usize,
    reset_at: DateTime<Utc>,
}

/// Outcome of one rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: usize,
    pub reset_at: DateTime<Utc>,
}

/// Fixed-window request quota per client identifier.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    max_requests: usize,
    window: TimeDelta,
    windows: Arc<Mutex<HashMap<String, ClientWindow>>>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(max_requests: usize, window_secs: u64) -> Self {
        let window = i64::try_from(window_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX);
        Self {
            max_requests,
            window,
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    #[must_use]
    pub fn from_app_config(config: &vln_core::AppConfig) -> Self {
        Self::new(config.rate_limit_max_requests, config.rate_limit_window_secs)
    }

    pub async fn check(&self, client: &str) -> RateLimitDecision {
        self.check_at(client, Utc::now()).await
    }

    /// Count one request from `client` at `now`.
    ///
    /// The first request opens a window ending at `now + window`. A window
    /// whose reset time has passed is discarded and the next request opens a
    /// fresh one.
    pub async fn check_at(&self, client: &str, now: DateTime<Utc>) -> RateLimitDecision {
        let mut windows = self.windows.lock().await;
        windows.retain(|_, w| w.reset_at >= now);

        if let Some(current) = windows.get_mut(client) {
            if current.count >= self.max_requests {
                return RateLimitDecision {
                    allowed: false,
                    remaining: 0,
                    reset_at: current.reset_at,
                };
            }
            current.count += 1;
            return RateLimitDecision {
                allowed: true,
                remaining: self.max_requests - current.count,
                reset_at: current.reset_at,
            };
        }

        let reset_at = now
            .checked_add_signed(self.window)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        windows.insert(client.to_string(), ClientWindow { count: 1, reset_at });

        RateLimitDecision {
            allowed: true,
            remaining: self.max_requests.saturating_sub(1),
            reset_at,
        }
    }

    #[cfg(test)]
    async fn tracked_clients(&self) -> usize {
        self.windows.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).expect("valid timestamp")
    }

    #[tokio::test]
    async fn allows_up_to_quota_then_denies() {
        let limiter = RateLimiter::new(3, 60);

        let first = limiter.check_at("1.2.3.4", at(0)).await;
        assert!(first.allowed);
        assert_eq!(first.remaining, 2);
        assert_eq!(first.reset_at, at(60));

        assert!(limiter.check_at("1.2.3.4", at(1)).await.allowed);
        let third = limiter.check_at("1.2.3.4", at(2)).await;
        assert!(third.allowed);
        assert_eq!(third.remaining, 0);

        let denied = limiter.check_at("1.2.3.4", at(3)).await;
        assert!(!denied.allowed);
        assert_eq!(denied.remaining, 0);
        assert_eq!(denied.reset_at, at(60));
    }

    #[tokio::test]
    async fn clients_have_independent_windows() {
        let limiter = RateLimiter::new(1, 60);
        assert!(limiter.check_at("a", at(0)).await.allowed);
        assert!(!limiter.check_at("a", at(1)).await.allowed);
        assert!(limiter.check_at("b", at(1)).await.allowed);
    }

    #[tokio::test]
    async fn expired_window_restarts_and_is_evicted() {
        let limiter = RateLimiter::new(1, 60);
        assert!(limiter.check_at("a", at(0)).await.allowed);
        assert!(limiter.check_at("b", at(10)).await.allowed);
        assert!(!limiter.check_at("a", at(60)).await.allowed);

        let fresh = limiter.check_at("a", at(61)).await;
        assert!(fresh.allowed);
        assert_eq!(fresh.reset_at, at(121));
        // "b" expired at 70 and was dropped on access.
        assert_eq!(limiter.tracked_clients().await, 1);
    }

    #[test]
    fn client_identifier_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.1"));
        assert_eq!(client_identifier(&headers), "10.0.0.1");
    }

    #[test]
    fn client_identifier_falls_back_to_real_ip_then_anonymous() {
        let mut headers = HeaderMap::new();
        assert_eq!(client_identifier(&headers), "anonymous");
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(client_identifier(&headers), "10.0.0.2");
    }
}
