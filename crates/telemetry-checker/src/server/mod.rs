use crate::{
    ingestor::TelemetryRecord,
    processor::{regions::batch_metrics, util::PercentileMethod},
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{convert::Infallible, net::SocketAddr, sync::Arc};
use tracing::{error, info};
use warp::{Filter, Rejection, Reply, http::StatusCode};

/// Read-only snapshot of the telemetry dataset shared across requests.
pub type Dataset = Arc<Vec<TelemetryRecord>>;

/// Request body for the aggregation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryQuery {
    pub regions: Vec<String>,
    pub threshold_ms: f64,
}

/// Error payload shape shared by all non-200 responses.
#[derive(Debug, Serialize)]
struct ErrorDetail {
    detail: String,
}

fn with_dataset(
    dataset: Dataset,
) -> impl Filter<Extract = (Dataset,), Error = Infallible> + Clone {
    warp::any().map(move || dataset.clone())
}

/// Build the full route tree: `POST /` aggregation, `GET /healthz`, CORS for
/// POST from any origin, and JSON error bodies for rejections.
pub fn routes(
    dataset: Dataset,
    method: PercentileMethod,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["POST", "OPTIONS"])
        .allow_header("content-type");

    let check = warp::post()
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with_dataset(dataset.clone()))
        .and(warp::any().map(move || method))
        .and_then(handle_check);

    let health = warp::get()
        .and(warp::path("healthz"))
        .and(warp::path::end())
        .and(with_dataset(dataset))
        .map(|dataset: Dataset| {
            warp::reply::json(&serde_json::json!({
                "status": "ok",
                "records": dataset.len(),
            }))
        });

    // Inner recover keeps CORS headers on error replies; the outer one
    // catches rejections from the CORS wrapper itself.
    check
        .or(health)
        .recover(handle_rejection)
        .with(cors)
        .recover(handle_rejection)
}

async fn handle_check(
    query: TelemetryQuery,
    dataset: Dataset,
    method: PercentileMethod,
) -> Result<impl Reply, Rejection> {
    if dataset.is_empty() {
        error!("Telemetry query received but no dataset is loaded");
        let detail = ErrorDetail {
            detail: "Telemetry dataset not found on server. Put it at data/telemetry.json"
                .to_string(),
        };
        return Ok(warp::reply::with_status(
            warp::reply::json(&detail),
            StatusCode::INTERNAL_SERVER_ERROR,
        ));
    }

    let out = batch_metrics(&dataset, &query.regions, query.threshold_ms, method);
    Ok(warp::reply::with_status(
        warp::reply::json(&out),
        StatusCode::OK,
    ))
}

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, detail) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_string())
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, format!("Invalid request body: {e}"))
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "Method not allowed".to_string(),
        )
    } else if err.find::<warp::filters::cors::CorsForbidden>().is_some() {
        (StatusCode::FORBIDDEN, "CORS request forbidden".to_string())
    } else {
        error!("Unhandled rejection: {err:?}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&ErrorDetail { detail }),
        status,
    ))
}

/// Run the HTTP service until ctrl-c.
pub async fn serve(addr: SocketAddr, dataset: Dataset, method: PercentileMethod) -> Result<()> {
    let routes = routes(dataset, method);

    let (bound, server) = warp::serve(routes)
        .try_bind_with_graceful_shutdown(addr, async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received, stopping server");
        })
        .with_context(|| format!("Failed to bind server address {addr}"))?;

    info!("Telemetry checker listening on {bound}");
    server.await;

    Ok(())
}
