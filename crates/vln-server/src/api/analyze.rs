use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use vln_analysis::{run_brand_analysis, BrandAnalysisResult};
use vln_core::{validate_analysis_request, AnalysisRequest, ValidationError};

use crate::middleware::{client_identifier, RequestId};

use super::AppState;

/// Failure modes of the analyze endpoint. Bodies are flat `{error, ...}`
/// objects, which is what the dashboard client parses.
#[derive(Debug)]
pub(super) enum AnalyzeError {
    Validation(ValidationError),
    RateLimited { reset_at: DateTime<Utc> },
    Internal,
}

#[derive(Serialize)]
struct ValidationBody<'a> {
    error: &'static str,
    details: &'a [String],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RateLimitBody {
    error: &'static str,
    reset_time: String,
}

#[derive(Serialize)]
struct InternalBody {
    error: &'static str,
}

impl IntoResponse for AnalyzeError {
    fn into_response(self) -> Response {
        match self {
            AnalyzeError::Validation(err) => (
                StatusCode::BAD_REQUEST,
                Json(ValidationBody {
                    error: "Validation failed",
                    details: &err.details,
                }),
            )
                .into_response(),
            AnalyzeError::RateLimited { reset_at } => (
                StatusCode::TOO_MANY_REQUESTS,
                Json(RateLimitBody {
                    error: "Rate limit exceeded",
                    reset_time: reset_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                }),
            )
                .into_response(),
            AnalyzeError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(InternalBody {
                    error: "Failed to perform brand analysis",
                }),
            )
                .into_response(),
        }
    }
}

/// `POST /api/vln/analyze`: validate, rate limit, then run the pipeline.
///
/// Validation happens before the quota is charged, so rejected payloads do
/// not consume a caller's requests.
pub(super) async fn analyze_brand(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<BrandAnalysisResult>, AnalyzeError> {
    let request: AnalysisRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::error!(request_id = %req_id.0, error = %e, "brand analysis request body unreadable");
        AnalyzeError::Internal
    })?;

    let validated = validate_analysis_request(&request.brand, &request.competitors)
        .map_err(|e| {
            tracing::debug!(request_id = %req_id.0, error = %e, "analysis request rejected");
            AnalyzeError::Validation(e)
        })?;

    let client = client_identifier(&headers);
    let decision = state.rate_limiter.check(&client).await;
    if !decision.allowed {
        tracing::warn!(
            request_id = %req_id.0,
            client = %client,
            reset_at = %decision.reset_at,
            "rate limit exceeded"
        );
        return Err(AnalyzeError::RateLimited {
            reset_at: decision.reset_at,
        });
    }

    tracing::info!(
        request_id = %req_id.0,
        brand = %validated.brand,
        competitors = validated.competitors.len(),
        remaining = decision.remaining,
        "starting brand analysis"
    );

    let result = run_brand_analysis(&state.providers, &validated, &state.settings).await;
    Ok(Json(result))
}

#[cfg(test)]
#[path = "analyze_test.rs"]
mod tests;
