//! Request handlers implementing the JSON-over-HTTP wire contract.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{error, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::server::AppState;

/// Default page-load timeout applied when `maxTimeout` is absent or invalid.
pub const DEFAULT_TIMEOUT_MS: u64 = 35_000;

/// Only supported command discriminator.
pub const GET_COMMAND: &str = "request.get";

/// Inbound `/v1` payload. Fields are optional so malformed requests reach the
/// validation path instead of being rejected by the deserializer.
#[derive(Debug, Deserialize)]
pub struct SolveRequest {
    pub cmd: Option<String>,
    pub url: Option<String>,
    /// Number or numeric string; anything else falls back to the default.
    #[serde(rename = "maxTimeout")]
    pub max_timeout: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct Solution {
    pub response: String,
    pub status: &'static str,
    pub url: String,
    pub processing_time: f64,
    pub instance: String,
}

#[derive(Debug, Serialize)]
pub struct SolveResponse {
    pub solution: Solution,
}

/// 400 body: validation failures carry the error message only.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// 500 body: solver failures also carry timing and the instance label.
#[derive(Debug, Serialize)]
pub struct FaultBody {
    pub error: String,
    pub processing_time: f64,
    pub instance: String,
}

#[derive(Debug, Serialize)]
pub struct HealthBody {
    pub status: &'static str,
    pub timestamp: i64,
    pub instance: String,
}

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub status: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<&'static str>,
}

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthBody> {
    Json(HealthBody {
        status: "healthy",
        timestamp: chrono::Utc::now().timestamp(),
        instance: state.instance.clone(),
    })
}

/// Service metadata endpoint.
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: env!("CARGO_PKG_NAME"),
        status: "running",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: vec!["/", "/health", "/v1"],
    })
}

/// Main bypass endpoint.
pub async fn solve(
    State(state): State<AppState>,
    payload: Result<Json<SolveRequest>, JsonRejection>,
) -> Response {
    let started = Instant::now();

    let Ok(Json(request)) = payload else {
        return invalid_request();
    };

    if request.cmd.as_deref() != Some(GET_COMMAND) {
        return invalid_request();
    }

    let Some(url) = request.url.filter(|url| !url.is_empty()) else {
        return invalid_request();
    };

    let timeout_ms = coerce_timeout(request.max_timeout.as_ref());
    info!("processing {url} (timeout: {timeout_ms}ms)");

    match state.solver.fetch(&url, timeout_ms).await {
        Ok(result) => {
            let processing_time = started.elapsed().as_secs_f64();
            info!(
                "resolved {url} in {processing_time:.2}s ({:?}, {} attempt(s))",
                result.outcome, result.attempts
            );
            (
                StatusCode::OK,
                Json(SolveResponse {
                    solution: Solution {
                        response: result.content,
                        status: "success",
                        url,
                        processing_time,
                        instance: state.instance.clone(),
                    },
                }),
            )
                .into_response()
        }
        Err(err) => {
            error!("failed to resolve {url}: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(FaultBody {
                    error: err.to_string(),
                    processing_time: started.elapsed().as_secs_f64(),
                    instance: state.instance.clone(),
                }),
            )
                .into_response()
        }
    }
}

fn invalid_request() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: "Invalid request".to_string(),
        }),
    )
        .into_response()
}

/// Coerce `maxTimeout` from numeric or numeric-string input. Invalid values
/// fall back to the default rather than failing the request.
pub(crate) fn coerce_timeout(value: Option<&Value>) -> u64 {
    match value {
        None => DEFAULT_TIMEOUT_MS,
        Some(Value::Number(number)) => number
            .as_u64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|float| float.is_finite() && *float >= 0.0)
                    .map(|float| float as u64)
            })
            .unwrap_or(DEFAULT_TIMEOUT_MS),
        Some(Value::String(text)) => text.trim().parse().unwrap_or(DEFAULT_TIMEOUT_MS),
        Some(_) => DEFAULT_TIMEOUT_MS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_timeout_uses_default() {
        assert_eq!(coerce_timeout(None), DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn numeric_timeout_is_taken_verbatim() {
        assert_eq!(coerce_timeout(Some(&json!(20000))), 20_000);
    }

    #[test]
    fn numeric_string_behaves_like_the_number() {
        assert_eq!(coerce_timeout(Some(&json!("20000"))), 20_000);
        assert_eq!(coerce_timeout(Some(&json!(" 20000 "))), 20_000);
    }

    #[test]
    fn garbage_falls_back_to_default() {
        assert_eq!(coerce_timeout(Some(&json!("abc"))), DEFAULT_TIMEOUT_MS);
        assert_eq!(coerce_timeout(Some(&json!(true))), DEFAULT_TIMEOUT_MS);
        assert_eq!(coerce_timeout(Some(&json!(null))), DEFAULT_TIMEOUT_MS);
        assert_eq!(coerce_timeout(Some(&json!(-5))), DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn float_timeout_truncates() {
        assert_eq!(coerce_timeout(Some(&json!(1500.9))), 1_500);
    }
}
