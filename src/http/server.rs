//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with a single dispatch handler
//! - Wire up middleware (tracing, request ID, timeout, limits, headers)
//! - Dispatch requests through the page router to the page service
//! - Record request metrics
//! - Serve until the shutdown listener fires

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{FromRequest, State},
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Form, Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;

use crate::config::ServiceConfig;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, trace_layer};
use crate::lifecycle::ShutdownListener;
use crate::observability::metrics;
use crate::routing::{Operation, PageRouter, RouteMatch};
use crate::security;
use crate::service::{PageService, SaveForm};
use crate::store::PageStore;

/// Application state injected into the dispatch handler.
pub struct AppState<S: PageStore> {
    pub service: Arc<PageService<S>>,
    pub router: Arc<PageRouter<S::Key>>,
}

impl<S: PageStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            router: Arc::clone(&self.router),
        }
    }
}

/// HTTP front end for a page service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server for the given service.
    pub fn new<S: PageStore>(service: PageService<S>, config: &ServiceConfig) -> Self {
        let state = AppState {
            service: Arc::new(service),
            router: Arc::new(PageRouter::new()),
        };

        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router<S: PageStore>(config: &ServiceConfig, state: AppState<S>) -> Router {
        let router = Router::new()
            .route("/", any(dispatch::<S>))
            .route("/{*path}", any(dispatch::<S>))
            .with_state(state);

        let router = security::limits::apply(router, &config.security);
        let router = security::headers::apply(router, &config.security);

        // Outermost first; the request id must exist before the trace span opens
        router.layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(trace_layer())
                .layer(propagate_request_id_layer())
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.timeouts.request_secs,
                ))),
        )
    }

    /// The fully layered router, e.g. for driving requests in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownListener,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main handler.
/// Matches the route, extracts the form for saves, and runs the operation.
async fn dispatch<S: PageStore>(
    State(state): State<AppState<S>>,
    request: Request<Body>,
) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let route = match state.router.match_request(&method, &path) {
        RouteMatch::Matched(route) => route,
        RouteMatch::MethodNotAllowed(operation) => {
            tracing::debug!(method = %method, path = %path, "Method not allowed");
            metrics::record_request(method.as_str(), 405, operation.as_str(), start_time);
            return (
                StatusCode::METHOD_NOT_ALLOWED,
                [(header::ALLOW, PageRouter::<S::Key>::allow_header(operation))],
                "Method not allowed",
            )
                .into_response();
        }
        RouteMatch::NoMatch => {
            tracing::debug!(method = %method, path = %path, "No route matched");
            metrics::record_request(method.as_str(), 404, "none", start_time);
            return (StatusCode::NOT_FOUND, "Not found").into_response();
        }
    };

    let operation = route.operation();
    let form = if operation == Operation::Save {
        match Form::<SaveForm>::from_request(request, &state).await {
            Ok(Form(form)) => Some(form),
            Err(rejection) => {
                tracing::debug!(path = %path, error = %rejection, "Rejected save form");
                let response = rejection.into_response();
                metrics::record_request(
                    method.as_str(),
                    response.status().as_u16(),
                    operation.as_str(),
                    start_time,
                );
                return response;
            }
        }
    } else {
        None
    };

    let response = match state.service.handle(route, form).await {
        Ok(outcome) => outcome.into_response(),
        Err(err) => err.into_response(),
    };

    tracing::debug!(
        operation = %operation,
        status = response.status().as_u16(),
        "Request handled"
    );
    metrics::record_request(
        method.as_str(),
        response.status().as_u16(),
        operation.as_str(),
        start_time,
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Renderer, TemplateRenderer};
    use crate::store::{CollisionPolicy, FileStore, RelationalStore};
    use axum::http::Method;
    use tower::ServiceExt;

    fn renderer() -> Arc<dyn Renderer> {
        Arc::new(TemplateRenderer::builtin().unwrap())
    }

    async fn sql_router() -> Router {
        let store = RelationalStore::connect("sqlite::memory:", 1).await.unwrap();
        let service = PageService::new(store, renderer(), "Test pages");
        HttpServer::new(service, &ServiceConfig::default()).router()
    }

    fn get(path: &str) -> Request<Body> {
        Request::builder().uri(path).body(Body::empty()).unwrap()
    }

    fn post_form(path: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_save_redirects_then_view() {
        let app = sql_router().await;

        let response = app
            .clone()
            .oneshot(post_form("/save", "title=Hello&content=World"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/view/1");

        let response = app.oneshot(get("/view/1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(response.headers()["x-content-type-options"], "nosniff");
        let html = body_text(response).await;
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("World"));
    }

    #[tokio::test]
    async fn test_unmatched_paths_are_not_found() {
        let app = sql_router().await;

        for path in ["/view/abc", "/view/1/", "/bogus", "/new/"] {
            let response = app.clone().oneshot(get(path)).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "path {path}");
        }
    }

    #[tokio::test]
    async fn test_missing_page_statuses() {
        let app = sql_router().await;

        let response = app.clone().oneshot(get("/view/5")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Page not found: 5"));

        let response = app.oneshot(get("/edit/5")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("not found"));
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        let app = sql_router().await;

        let response = app.clone().oneshot(get("/save")).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "POST");

        let response = app.oneshot(post_form("/new", "")).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET, HEAD");
    }

    #[tokio::test]
    async fn test_save_without_title_is_bad_request() {
        let app = sql_router().await;

        let response = app
            .clone()
            .oneshot(post_form("/save", "content=orphan"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app.oneshot(get("/")).await.unwrap();
        assert!(!body_text(response).await.contains("orphan"));
    }

    #[tokio::test]
    async fn test_file_mode_collision_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path(), CollisionPolicy::Reject)
            .await
            .unwrap();
        let service = PageService::new(store, renderer(), "Test pages");
        let app = HttpServer::new(service, &ServiceConfig::default()).router();

        let response = app
            .clone()
            .oneshot(post_form("/save", "title=Taken&content=a"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/view/Taken");

        let response = app
            .clone()
            .oneshot(post_form("/save", "title=Taken&content=b"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        // Saving onto the existing identifier is an update, not a create
        let response = app
            .clone()
            .oneshot(post_form("/save/Taken", "title=Taken&content=b"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);

        // Retitling another page onto a taken title is also a conflict
        let response = app
            .clone()
            .oneshot(post_form("/save/Other", "title=Taken&content=clobber"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = app.clone().oneshot(get("/view/Taken")).await.unwrap();
        assert!(!body_text(response).await.contains("clobber"));

        // Identifiers too long for a file name never reach the store
        let overlong = format!("/edit/{}", "x".repeat(300));
        let response = app.oneshot(get(&overlong)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_body_limit() {
        let store = RelationalStore::connect("sqlite::memory:", 1).await.unwrap();
        let service = PageService::new(store, renderer(), "Test pages");
        let mut config = ServiceConfig::default();
        config.security.max_body_size = 16;
        let app = HttpServer::new(service, &config).router();

        let response = app
            .oneshot(post_form("/save", "title=Big&content=0123456789abcdef"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
