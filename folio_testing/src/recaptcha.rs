use std::{net::IpAddr, sync::Arc, time::Duration};

use anyhow::Context;
use axum::{
    extract::{Query, State},
    routing, Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::info;

pub const SITEVERIFY_ROUTE: &str = "/recaptcha/api/siteverify";

/// Responses with this token are delayed by [`SLOW_RESPONSE_DELAY`] to
/// simulate an unresponsive verification service.
pub const SLOW_RESPONSE: &str = "slow";
pub const SLOW_RESPONSE_DELAY: Duration = Duration::from_secs(5);

pub async fn start_server(host: IpAddr, port: u16, secret: String) -> anyhow::Result<()> {
    info!("Starting recaptcha testing server on {host}:{port}");
    info!("Recaptcha siteverify endpoint: http://{host}:{port}{SITEVERIFY_ROUTE}");
    info!("Secret: {secret:?}");
    info!(
        "Valid recaptcha responses are \"success\" and \"success-SCORE\", where SCORE is a \
         floating point number between 0 and 1"
    );

    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;
    axum::serve(listener, router(secret))
        .await
        .context("Failed to start HTTP server")
}

pub fn router(secret: String) -> Router<()> {
    Router::new()
        .route(SITEVERIFY_ROUTE, routing::get(siteverify))
        .with_state(secret.into())
}

#[derive(Deserialize)]
struct SiteverifyRequest {
    secret: String,
    response: String,
}

#[derive(Serialize)]
struct SiteverifyResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<f64>,
    #[serde(rename = "error-codes", skip_serializing_if = "Vec::is_empty")]
    error_codes: Vec<&'static str>,
}

async fn siteverify(
    state: State<Arc<str>>,
    Query(SiteverifyRequest { secret, response }): Query<SiteverifyRequest>,
) -> Json<SiteverifyResponse> {
    if response == SLOW_RESPONSE {
        tokio::time::sleep(SLOW_RESPONSE_DELAY).await;
    }

    if *secret != **state {
        return Json(SiteverifyResponse {
            success: false,
            score: None,
            error_codes: vec!["invalid-input-secret"],
        });
    }

    let mut parts = response.splitn(2, '-');
    let success = parts.next() == Some("success");
    let score = success
        .then(|| parts.next())
        .flatten()
        .and_then(|score| score.parse::<f64>().ok())
        .filter(|score| (0.0..=1.0).contains(score));

    Json(SiteverifyResponse {
        success,
        score,
        error_codes: if success {
            Vec::new()
        } else {
            vec!["invalid-input-response"]
        },
    })
}
