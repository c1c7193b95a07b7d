use std::{net::IpAddr, path::PathBuf, sync::Arc};

use anyhow::Context;
use axum::Router;
use folio_core_contact_contracts::ContactFeatureService;
use folio_core_health_contracts::HealthFeatureService;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::info;

mod middlewares;
mod models;
mod routes;

#[derive(Debug, Clone)]
pub struct RestServer<Health, Contact> {
    health: Health,
    contact: Contact,
    config: RestServerConfig,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    /// Page the contact form redirects back to, e.g. `index.html`.
    pub redirect_base: Arc<str>,
    /// Directory served for every request no other route matches.
    pub static_dir: Option<PathBuf>,
}

impl<Health, Contact> RestServer<Health, Contact>
where
    Health: HealthFeatureService,
    Contact: ContactFeatureService,
{
    pub fn new(health: Health, contact: Contact, config: RestServerConfig) -> Self {
        Self {
            health,
            contact,
            config,
        }
    }

    pub async fn serve(self, host: IpAddr, port: u16) -> anyhow::Result<()> {
        let router = self.router();
        let listener = TcpListener::bind((host, port))
            .await
            .with_context(|| format!("Failed to bind to {host}:{port}"))?;
        info!("listening on {}", listener.local_addr()?);
        axum::serve(listener, router).await.map_err(Into::into)
    }

    fn router(self) -> Router<()> {
        let router = Router::new()
            .merge(routes::health::router(self.health.into()))
            .merge(routes::contact::router(
                self.contact.into(),
                self.config.redirect_base,
            ))
            .merge(routes::assets::router());

        let router = match self.config.static_dir {
            Some(static_dir) => router.fallback_service(ServeDir::new(static_dir)),
            None => router,
        };

        let router = middlewares::panic_handler::add(router);
        let router = middlewares::trace::add(router);
        middlewares::request_id::add(router)
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use folio_core_contact_contracts::MockContactFeatureService;
    use folio_core_health_contracts::{HealthStatus, MockHealthFeatureService};
    use tower::ServiceExt;

    use super::*;

    fn make_router(
        health: MockHealthFeatureService,
        static_dir: Option<PathBuf>,
    ) -> Router<()> {
        RestServer::new(
            health,
            MockContactFeatureService::new(),
            RestServerConfig {
                redirect_base: "index.html".into(),
                static_dir,
            },
        )
        .router()
    }

    #[tokio::test]
    async fn request_id_header() {
        // Arrange
        let health = MockHealthFeatureService::new().with_get_status(HealthStatus { email: true });
        let router = make_router(health, None);

        // Act
        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        let request_id = response.headers().get("X-Request-Id").unwrap();
        assert_eq!(request_id.len(), 22);
    }

    #[tokio::test]
    async fn static_fallback() {
        // Arrange
        let router = make_router(
            MockHealthFeatureService::new(),
            Some(env!("CARGO_MANIFEST_DIR").into()),
        );

        // Act
        let response = router
            .oneshot(Request::get("/Cargo.toml").body(Body::empty()).unwrap())
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains("folio_api_rest"));
    }

    #[tokio::test]
    async fn not_found_without_static_dir() {
        // Arrange
        let router = make_router(MockHealthFeatureService::new(), None);

        // Act
        let response = router
            .oneshot(Request::get("/index.html").body(Body::empty()).unwrap())
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
