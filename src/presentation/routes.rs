// Router and server lifecycle
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    classify, get_dashboard, get_history, health_check, simulate, stream_dashboard, write_vital,
};
use axum::{
    Router,
    routing::{get, post, put},
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/stream", get(stream_dashboard))
        .route("/classify", get(classify))
        .route("/vitals/:kind", put(write_vital))
        .route("/vitals/:kind/history", get(get_history))
        .route("/simulate", post(simulate))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until `signal` resolves, then end the monitoring session before
/// connections drain. Open event streams finish once the session stops.
pub async fn serve_until<F>(listener: TcpListener, state: Arc<AppState>, signal: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let monitor = state.monitor_service.clone();
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            signal.await;
            monitor.stop();
        })
        .await
}
