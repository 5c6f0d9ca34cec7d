//! HTTP endpoint server using Axum

use axum::{
    extract::{rejection::JsonRejection, ws::WebSocketUpgrade, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, Level};

use crate::alerts::{AlertEvaluator, CreateAlertRequest};
use crate::core::subscriber::serve_subscriber;
use crate::db::AlertStore;
use crate::engine::shutdown::ShutdownListener;
use crate::engine::snapshot::SnapshotHandle;
use crate::metrics::Metrics;
use crate::models::IndicatorSnapshot;

pub const SERVICE_NAME: &str = "alertix-indicator-alerts";

#[derive(Clone)]
pub struct AppState {
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub store: Arc<dyn AlertStore>,
    pub snapshot: SnapshotHandle,
    pub evaluator: Arc<AlertEvaluator>,
    pub evaluation_interval: Duration,
    pub shutdown: ShutdownListener,
}

impl AppState {
    /// Wire the state; the evaluator shares the given store and snapshot
    pub fn new(
        metrics: Arc<Metrics>,
        store: Arc<dyn AlertStore>,
        snapshot: SnapshotHandle,
        evaluation_interval: Duration,
        shutdown: ShutdownListener,
    ) -> Self {
        let evaluator = Arc::new(
            AlertEvaluator::new(store.clone(), snapshot.clone()).with_metrics(metrics.clone()),
        );
        Self {
            metrics,
            start_time: Arc::new(Instant::now()),
            store,
            snapshot,
            evaluator,
            evaluation_interval,
            shutdown,
        }
    }
}

/// Liveness plus feed and indicator readiness
///
/// `status` is `healthy` while the kline stream is connected and `degraded`
/// otherwise; the HTTP surface keeps serving the last snapshot either way.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let uptime_seconds = state.start_time.elapsed().as_secs();
    let snapshot = state.snapshot.read().await;
    let feed_connected = state.metrics.feed_connected.get() >= 1.0;
    Ok(Json(json!({
        "status": if feed_connected { "healthy" } else { "degraded" },
        "feed_connected": feed_connected,
        "uptime_seconds": uptime_seconds,
        "service": SERVICE_NAME,
        "store": state.store.backend(),
        "indicators_ready": snapshot.is_computed(),
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();

    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();

    state.metrics.http_requests_in_flight.dec();
    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

/// Register a new pending alert
async fn create_alert(
    State(state): State<AppState>,
    payload: Result<Json<CreateAlertRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, rejection.body_text()),
    };

    let alert = match request.validate() {
        Ok(alert) => alert,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    match state.store.create(alert.clone()).await {
        Ok(id) => {
            info!(
                alert_id = id,
                indicator = %alert.indicator,
                direction = %alert.direction,
                threshold = alert.value,
                "Alert created"
            );
            (
                StatusCode::OK,
                Json(json!({ "message": "Alert created", "id": id })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create alert");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "failed to create alert")
        }
    }
}

/// List every alert with its current status
async fn list_alerts(State(state): State<AppState>) -> Response {
    match state.store.list_all().await {
        Ok(alerts) => Json(alerts).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to load alerts");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "failed to load alerts")
        }
    }
}

/// Current indicator snapshot
async fn get_indicators(State(state): State<AppState>) -> Json<IndicatorSnapshot> {
    Json(state.snapshot.read().await)
}

/// Upgrade to a WebSocket that receives the alert list every evaluation interval
async fn alerts_ws(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| serve_subscriber(socket, state))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/alert", post(create_alert))
        .route("/alerts", get(list_alerts))
        .route("/indicators", get(get_indicators))
        .route("/ws", get(alerts_ws))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Serve the router on `port` until the state's shutdown signal fires
pub async fn start_server(port: u16, state: AppState) -> Result<(), std::io::Error> {
    let mut shutdown = state.shutdown.clone();
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!("Alert subscriptions available at ws://0.0.0.0:{}/ws", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.recv().await })
        .await
}
