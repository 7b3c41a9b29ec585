//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, panics, timeout, compression, CORS)
//! - Bind server to listener
//! - Stop accepting on shutdown and drain in-flight requests

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Method, Request},
    routing::get,
    Router,
};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
    CompressionLevel,
};

use crate::config::AvatarConfig;
use crate::http::avatar::avatar_handler;
use crate::http::request::{UuidRequestId, X_REQUEST_ID};
use crate::http::response::{handle_panic, not_found};
use crate::lifecycle::signals::shutdown_signal;
use crate::pipeline::AvatarPipeline;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: AvatarPipeline,
    pub cache_control: HeaderValue,
}

/// HTTP server for avatar models.
pub struct HttpServer {
    router: Router,
    config: AvatarConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AvatarConfig, pipeline: AvatarPipeline) -> Self {
        let cache_control = HeaderValue::from_str(&config.http.cache_control).unwrap_or_else(|_| {
            tracing::warn!("Invalid cache_control header value, sending no-cache");
            HeaderValue::from_static("no-cache")
        });

        let state = AppState {
            pipeline,
            cache_control,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AvatarConfig, state: AppState) -> Router {
        let x_request_id = HeaderName::from_static(X_REQUEST_ID);

        let mut router = Router::new()
            .route("/{file}", get(avatar_handler))
            .fallback(not_found)
            .with_state(state)
            .layer(CompressionLayer::new().quality(CompressionLevel::Precise(config.http.compression_level as i32)))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(X_REQUEST_ID)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                    )
                }),
            )
            .layer(SetRequestIdLayer::new(x_request_id, UuidRequestId));

        if config.http.cors_enabled {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
                    .allow_headers([
                        header::ORIGIN,
                        HeaderName::from_static("x-requested-with"),
                        header::CONTENT_TYPE,
                        header::ACCEPT,
                    ]),
            );
        }

        router
    }

    /// Run the server, accepting connections on the given listener until
    /// Ctrl+C, SIGTERM or a shutdown broadcast.
    pub async fn run(self, listener: TcpListener, shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AvatarConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelTemplate;
    use crate::palette::Palette;
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn server() -> HttpServer {
        let pipeline = AvatarPipeline::builder(
            Arc::new(Palette::default()),
            Arc::new(ModelTemplate::bundled().unwrap()),
        )
        .build();
        HttpServer::new(AvatarConfig::default(), pipeline)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_glb_response_headers() {
        let response = server().router().oneshot(get("/avatar.glb?body=%23F7F6F5")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers["content-type"], "model/gltf-binary");
        assert!(headers["cache-control"].to_str().unwrap().contains("stale-while-revalidate=604800"));
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["x-avatar-cache"], "miss");
        assert!(headers.contains_key(X_REQUEST_ID));

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[0..4], b"glTF");
    }

    #[tokio::test]
    async fn test_repeat_is_cache_hit() {
        let router = server().router();
        let first = router.clone().oneshot(get("/avatar.glb?Body=f7f6f5")).await.unwrap();
        let first_body = to_bytes(first.into_body(), usize::MAX).await.unwrap();

        let second = router.oneshot(get("/avatar.glb?body=%23F7F6F5")).await.unwrap();
        assert_eq!(second.headers()["x-avatar-cache"], "hit");
        let second_body = to_bytes(second.into_body(), usize::MAX).await.unwrap();
        assert_eq!(first_body, second_body);
    }

    #[tokio::test]
    async fn test_gltf_content_type() {
        let response = server().router().oneshot(get("/avatar.gltf?hair=545454")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "model/gltf+json");
    }

    #[tokio::test]
    async fn test_unknown_paths_404() {
        for uri in ["/", "/avatar.obj", "/other.glb", "/a/b/c"] {
            let response = server().router().oneshot(get(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
            let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert_eq!(&body[..], b"Not found");
        }
    }

    #[tokio::test]
    async fn test_client_request_id_propagated() {
        let request = Request::builder()
            .uri("/avatar.glb")
            .header(X_REQUEST_ID, "req-123")
            .body(Body::empty())
            .unwrap();
        let response = server().router().oneshot(request).await.unwrap();
        assert_eq!(response.headers()[X_REQUEST_ID], "req-123");
    }

    #[tokio::test]
    async fn test_cors_disabled() {
        let pipeline = AvatarPipeline::builder(
            Arc::new(Palette::default()),
            Arc::new(ModelTemplate::bundled().unwrap()),
        )
        .build();
        let mut config = AvatarConfig::default();
        config.http.cors_enabled = false;

        let response = HttpServer::new(config, pipeline)
            .router()
            .oneshot(get("/avatar.glb"))
            .await
            .unwrap();
        assert!(!response.headers().contains_key("access-control-allow-origin"));
    }
}
