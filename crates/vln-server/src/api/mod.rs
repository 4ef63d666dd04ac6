mod analyze;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use vln_analysis::{AnalysisSettings, ProviderDescriptor, TextGenerator};

use crate::middleware::{request_id, RateLimiter, RequestId};

#[derive(Clone)]
pub struct AppState {
    /// Enabled adapters in dispatch order. Empty means demo mode.
    pub providers: Arc<Vec<Box<dyn TextGenerator>>>,
    /// All known providers, enabled or not.
    pub descriptors: Arc<Vec<ProviderDescriptor>>,
    pub settings: AnalysisSettings,
    pub rate_limiter: RateLimiter,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    providers_enabled: usize,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
            HeaderName::from_static("x-forwarded-for"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/providers", get(list_providers))
        .route("/api/vln/analyze", post(analyze::analyze_brand))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<HealthData>> {
    Json(ApiResponse {
        data: HealthData {
            status: "ok",
            providers_enabled: state.providers.len(),
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

async fn list_providers(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<ProviderDescriptor>>> {
    Json(ApiResponse {
        data: state.descriptors.as_ref().clone(),
        meta: ResponseMeta::new(req_id.0),
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use vln_analysis::providers::GenerateFuture;
    use vln_analysis::{
        AnalysisSettings, ProviderConfig, ProviderError, ProviderKind, TextGenerator,
    };

    use super::AppState;
    use crate::middleware::RateLimiter;

    /// In-process backend that replays canned outcomes in call order.
    pub struct ScriptedGenerator {
        descriptor: vln_analysis::ProviderDescriptor,
        replies: Mutex<VecDeque<Result<String, ProviderError>>>,
    }

    impl ScriptedGenerator {
        pub fn new(kind: ProviderKind, replies: Vec<Result<String, ProviderError>>) -> Self {
            Self {
                descriptor: kind.descriptor(true),
                replies: Mutex::new(replies.into()),
            }
        }
    }

    impl TextGenerator for ScriptedGenerator {
        fn descriptor(&self) -> &vln_analysis::ProviderDescriptor {
            &self.descriptor
        }

        fn generate<'a>(&'a self, _prompt: &'a str, _max_tokens: u32) -> GenerateFuture<'a> {
            let next = self
                .replies
                .lock()
                .expect("replies lock")
                .pop_front()
                .unwrap_or_else(|| {
                    Err(ProviderError::UnexpectedStatus {
                        provider: self.descriptor.display_name.clone(),
                        status: 500,
                        body: "script exhausted".to_string(),
                    })
                });
            Box::pin(async move { next })
        }
    }

    pub fn state_with(providers: Vec<Box<dyn TextGenerator>>, max_requests: usize) -> AppState {
        let mut config = ProviderConfig::default();
        for provider in &providers {
            match provider.descriptor().id.as_str() {
                "openai" => config.openai_api_key = Some("test".to_string()),
                "anthropic" => config.anthropic_api_key = Some("test".to_string()),
                "google" => config.google_api_key = Some("test".to_string()),
                _ => config.perplexity_api_key = Some("test".to_string()),
            }
        }

        AppState {
            providers: Arc::new(providers),
            descriptors: Arc::new(config.descriptors()),
            settings: AnalysisSettings::default(),
            rate_limiter: RateLimiter::new(max_requests, 3600),
        }
    }
}
