use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use folio_core_health_contracts::{HealthFeatureService, HealthStatus};
use serde::Serialize;

pub fn router(service: Arc<impl HealthFeatureService>) -> Router<()> {
    Router::new()
        .route("/health", routing::get(health))
        .route("/healthz", routing::get(ok))
        .route("/startupz", routing::get(ok))
        .with_state(service)
}

#[derive(Serialize)]
struct HealthResponse {
    http: bool,
    email: bool,
}

async fn health(service: State<Arc<impl HealthFeatureService>>) -> Response {
    let status = service.get_status().await;
    let HealthStatus { email } = status;

    let code = if status.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    (code, Json(HealthResponse { http: true, email })).into_response()
}

async fn ok() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::Request,
    };
    use folio_core_health_contracts::MockHealthFeatureService;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;

    async fn get(service: MockHealthFeatureService, path: &str) -> (StatusCode, String) {
        let response = router(Arc::new(service))
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn healthy() {
        // Arrange
        let service = MockHealthFeatureService::new().with_get_status(HealthStatus { email: true });

        // Act
        let (status, body) = get(service, "/health").await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&body).unwrap(),
            json!({"http": true, "email": true})
        );
    }

    #[tokio::test]
    async fn unhealthy() {
        // Arrange
        let service =
            MockHealthFeatureService::new().with_get_status(HealthStatus { email: false });

        // Act
        let (status, body) = get(service, "/health").await;

        // Assert
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&body).unwrap(),
            json!({"http": true, "email": false})
        );
    }

    #[tokio::test]
    async fn probes() {
        for path in ["/healthz", "/startupz"] {
            let (status, body) = get(MockHealthFeatureService::new(), path).await;
            assert_eq!(status, StatusCode::OK, "{path}");
            assert_eq!(body, "OK", "{path}");
        }
    }
}
