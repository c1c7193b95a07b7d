use axum::{
    http::header,
    response::{IntoResponse, Response},
    routing, Router,
};

pub fn router() -> Router<()> {
    Router::new().route("/js/main.js", routing::get(main_js))
}

async fn main_js() -> Response {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        folio_assets::main_js(),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn serves_main_js() {
        // Act
        let response = router()
            .oneshot(Request::get("/js/main.js").body(Body::empty()).unwrap())
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/javascript; charset=utf-8"
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("#emailSent"));
        assert!(body.contains("#emailFailed"));
    }
}
