//! Reverse proxy over the local ComfyUI service
//!
//! Requests under the proxy prefix are forwarded verbatim (method,
//! headers, query string, body) to the local service. On the return
//! path only the raw downstream body is passed back; downstream status
//! and headers are dropped, matching the behavior this replaces.

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, RawQuery, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{Json, Redirect},
    routing::{get, on, MethodFilter},
    Router,
};
use comfylet_core::Endpoint;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

/// Application state shared across handlers
pub struct AppState {
    /// Local service endpoint requests are forwarded to
    pub upstream: Endpoint,
    /// Path prefix forwarded traffic is routed under
    pub prefix: String,
}

/// Methods forwarded to the local service
fn forwarded_methods() -> MethodFilter {
    MethodFilter::GET
        .or(MethodFilter::POST)
        .or(MethodFilter::PUT)
        .or(MethodFilter::DELETE)
        .or(MethodFilter::PATCH)
}

/// Create the proxy-variant router
pub fn create_router(upstream: Endpoint, prefix: &str) -> Router {
    let prefix = prefix.trim_end_matches('/').to_string();
    let state = Arc::new(AppState {
        upstream,
        prefix: prefix.clone(),
    });

    Router::new()
        .route("/", get(root_redirect))
        .route("/health", get(health))
        .route(
            &format!("{}/", prefix),
            on(forwarded_methods(), proxy_prefix_root),
        )
        .route(
            &format!("{}/*path", prefix),
            on(forwarded_methods(), proxy_prefix),
        )
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Create the direct-exposure router: no redirect, no health route,
/// every path and method forwarded unmodified
pub fn create_direct_router(upstream: Endpoint) -> Router {
    let state = Arc::new(AppState {
        upstream,
        prefix: String::new(),
    });

    Router::new()
        .fallback(direct_forward)
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Root path redirects into the proxied UI
async fn root_redirect(State(state): State<Arc<AppState>>) -> Redirect {
    Redirect::temporary(&format!("{}/", state.prefix))
}

/// Static health status; does not verify the subprocess
async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "running",
        "port": state.upstream.port,
    }))
}

async fn proxy_prefix_root(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<Bytes, (StatusCode, String)> {
    forward(&state, method, "", query, headers, body).await
}

async fn proxy_prefix(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    method: Method,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<Bytes, (StatusCode, String)> {
    forward(&state, method, &path, query, headers, body).await
}

async fn direct_forward(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Bytes, (StatusCode, String)> {
    let path = uri.path().trim_start_matches('/').to_string();
    let query = uri.query().map(str::to_string);
    forward(&state, method, &path, query, headers, body).await
}

/// Forward one request to the local service and return its raw body
async fn forward(
    state: &AppState,
    method: Method,
    path: &str,
    query: Option<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Bytes, (StatusCode, String)> {
    let mut url = format!("{}/{}", state.upstream.url(), path);
    if let Some(q) = query {
        url.push('?');
        url.push_str(&q);
    }

    debug!(method = %method, url = %url, "Forwarding request");

    // One short-lived client per request; no pooling across requests
    let client = reqwest::Client::new();

    let method = reqwest::Method::from_bytes(method.as_str().as_bytes())
        .map_err(|e| (StatusCode::BAD_GATEWAY, e.to_string()))?;

    let mut request = client.request(method, &url).body(body);
    for (name, value) in headers.iter() {
        request = request.header(name.as_str(), value.as_bytes());
    }

    match request.send().await {
        Ok(response) => response
            .bytes()
            .await
            .map_err(|e| (StatusCode::BAD_GATEWAY, format!("Upstream read failed: {}", e))),
        Err(e) => {
            warn!(url = %url, error = %e, "Upstream request failed");
            Err((
                StatusCode::BAD_GATEWAY,
                format!("Upstream request failed: {}", e),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request},
        routing::post,
    };
    use tower::ServiceExt;

    fn test_endpoint(port: u16) -> Endpoint {
        Endpoint::new("127.0.0.1".to_string(), port)
    }

    /// Serve a stub upstream on an ephemeral loopback port
    async fn spawn_upstream(router: Router) -> u16 {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        port
    }

    /// A loopback port with nothing listening on it
    async fn unused_port() -> u16 {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    }

    #[tokio::test]
    async fn test_create_router() {
        let _router = create_router(test_endpoint(8188), "/comfyui");
        let _direct = create_direct_router(test_endpoint(8188));
    }

    #[tokio::test]
    async fn test_root_redirects() {
        let router = create_router(test_endpoint(8188), "/comfyui");

        let response = router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response.status().is_redirection());
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/comfyui/"
        );
    }

    #[tokio::test]
    async fn test_health_is_static() {
        // Health must answer even with nothing listening upstream
        let router = create_router(test_endpoint(unused_port().await), "/comfyui");

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "running");
    }

    #[tokio::test]
    async fn test_get_passthrough() {
        let upstream = Router::new().route("/prompt", get(|| async { "queue empty" }));
        let port = spawn_upstream(upstream).await;

        let router = create_router(test_endpoint(port), "/comfyui");
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/comfyui/prompt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"queue empty");
    }

    #[tokio::test]
    async fn test_post_body_passthrough() {
        let upstream = Router::new().route("/prompt", post(|body: Bytes| async move { body }));
        let port = spawn_upstream(upstream).await;

        let router = create_router(test_endpoint(port), "/comfyui");
        let payload = br#"{"prompt": {"1": {"class_type": "KSampler"}}}"#;
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/comfyui/prompt")
                    .body(Body::from(&payload[..]))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], payload);
    }

    #[tokio::test]
    async fn test_query_passthrough() {
        let upstream = Router::new().route(
            "/history",
            get(|RawQuery(q): RawQuery| async move { q.unwrap_or_default() }),
        );
        let port = spawn_upstream(upstream).await;

        let router = create_router(test_endpoint(port), "/comfyui");
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/comfyui/history?max_items=5")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"max_items=5");
    }

    #[tokio::test]
    async fn test_upstream_down_returns_bad_gateway() {
        let router = create_router(test_endpoint(unused_port().await), "/comfyui");

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/comfyui/prompt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_direct_router_forwards_all_paths() {
        let upstream = Router::new().route("/queue/status", get(|| async { "ok" }));
        let port = spawn_upstream(upstream).await;

        let router = create_direct_router(test_endpoint(port));
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/queue/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_direct_router_has_no_redirect() {
        let upstream = Router::new().route("/", get(|| async { "comfy root" }));
        let port = spawn_upstream(upstream).await;

        let router = create_direct_router(test_endpoint(port));
        let response = router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"comfy root");
    }
}
