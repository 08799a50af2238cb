//! AWS Lambda handler for portfolio analysis
//!
//! Accepts an `AnalysisRequest` as JSON (every field optional) and returns the
//! projections, portfolio summary, growth curve and allocation report.
//! A custom catalog is read from YIELD_CATALOG_PATH; `catalog_path` in the
//! request body is ignored.
//!
//! Supports Lambda Function URLs for direct HTTP access.

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use log::{info, warn};
use serde::Serialize;
use yield_projection::allocation::renormalize_targets;
use yield_projection::protocol::load_catalog;
use yield_projection::{AnalysisRequest, EngineError, PortfolioAnalysis, ProtocolCatalog, ScenarioRunner};

#[derive(Debug, Serialize)]
struct AnalysisResponse {
    #[serde(flatten)]
    analysis: PortfolioAnalysis,
    protocols_requested: usize,
    execution_time_ms: u64,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn with_cors(builder: lambda_http::http::response::Builder) -> lambda_http::http::response::Builder {
    builder
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
}

fn json_response<T: Serialize>(status: u16, body: &T) -> Result<Response<Body>, Error> {
    let response = with_cors(Response::builder())
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::Text(serde_json::to_string(body)?))?;
    Ok(response)
}

fn error_response(status: u16, message: String) -> Result<Response<Body>, Error> {
    json_response(status, &ErrorBody { error: message })
}

/// Client mistakes map to 400, catalog I/O failures to 500
fn status_for(err: &EngineError) -> u16 {
    match err {
        EngineError::Csv(_) | EngineError::Io(_) => 500,
        _ => 400,
    }
}

async fn handler(event: Request) -> Result<Response<Body>, Error> {
    let start = std::time::Instant::now();

    if event.method().as_str() == "OPTIONS" {
        return Ok(with_cors(Response::builder()).status(200).body(Body::Empty)?);
    }

    let body_str = match event.body() {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => "{}".to_string(),
    };

    let request: AnalysisRequest = match serde_json::from_str(&body_str) {
        Ok(r) => r,
        Err(e) => return error_response(400, format!("Invalid JSON: {}", e)),
    };

    // Catalog files come from the deployment environment, never from the caller
    let catalog = match &AnalysisRequest::from_env().catalog_path {
        Some(path) => match load_catalog(path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Catalog load failed for {}: {}", path.display(), e);
                return error_response(status_for(&e), format!("Failed to load catalog: {}", e));
            }
        },
        None => ProtocolCatalog::default_defi(),
    };

    let analysis = request
        .plan()
        .and_then(|plan| ScenarioRunner::new(catalog).analyze(request.protocols.as_slice(), &plan, request.risk_profile));
    let mut analysis = match analysis {
        Ok(a) => a,
        Err(e) => return error_response(status_for(&e), e.to_string()),
    };

    if request.renormalize {
        analysis.optimization.targets = renormalize_targets(&analysis.optimization.targets);
    }

    let execution_time_ms = start.elapsed().as_millis() as u64;
    info!(
        "Analysed {} of {} protocols ({}) in {} ms",
        analysis.results.len(),
        request.protocols.len(),
        request.risk_profile,
        execution_time_ms
    );

    json_response(
        200,
        &AnalysisResponse {
            analysis,
            protocols_requested: request.protocols.len(),
            execution_time_ms,
        },
    )
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
