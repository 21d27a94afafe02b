// HTTP request handlers
use crate::infrastructure::event_stream::{json_event, sse_from_receiver};
use crate::presentation::app_state::AppState;
use crate::presentation::dto::{
    ClassificationDto, ClassifyQuery, DashboardDto, SeriesDto, WriteRequest, WrittenValueDto,
    classification_to_dto, dashboard_to_dto, samples_to_dto, update_to_dto,
};
use crate::presentation::error::{ApiError, ApiResult};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, sse::Event},
};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Full dashboard snapshot
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardDto> {
    Json(dashboard_to_dto(state.monitor_service.snapshot()))
}

/// Snapshot first, then one `vital` event per update
pub async fn stream_dashboard(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    // Subscribe before taking the snapshot so no update falls in between.
    let rx = state.monitor_service.subscribe_updates();
    let shutdown = state.monitor_service.subscribe_shutdown();
    let snapshot = dashboard_to_dto(state.monitor_service.snapshot());
    let initial = json_event("snapshot", &snapshot).unwrap_or_else(|| Event::default().event("snapshot"));

    sse_from_receiver(initial, rx, shutdown, |update| json_event("vital", &update_to_dto(update)))
}

/// History window for one signal kind
pub async fn get_history(
    Path(kind): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<SeriesDto>> {
    let signal = state
        .monitor_service
        .resolve_kind(&kind)
        .ok_or(ApiError::UnknownKind(kind))?;

    let samples = state.monitor_service.history(signal);
    Ok(Json(samples_to_dto(signal, samples)))
}

/// Classify an arbitrary (kind, value) pair; a missing value counts as 0
pub async fn classify(
    Query(query): Query<ClassifyQuery>,
    State(state): State<Arc<AppState>>,
) -> Json<ClassificationDto> {
    let value = query.value.unwrap_or(0.0);
    let status = state.monitor_service.classify(&query.kind, value);
    Json(classification_to_dto(query.kind, value, status))
}

/// Write a value through the vitals source (test utility)
pub async fn write_vital(
    Path(kind): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<WriteRequest>,
) -> ApiResult<StatusCode> {
    let signal = state
        .monitor_service
        .resolve_kind(&kind)
        .ok_or(ApiError::UnknownKind(kind))?;

    state.monitor_service.write(signal, request.value).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Write one random plausible value per signal kind (test utility)
pub async fn simulate(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<WrittenValueDto>>> {
    let written = state.simulator_service.write_random().await?;
    Ok(Json(
        written
            .into_iter()
            .map(|(kind, value)| WrittenValueDto {
                kind: kind.slug(),
                value,
            })
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::monitor_service::MonitorService;
    use crate::application::monitoring_session::MonitoringSession;
    use crate::application::simulator_service::SimulatorService;
    use crate::application::vitals_source::{Subscription, UpdateCallback, VitalsSource};
    use crate::domain::classifier::Classifier;
    use crate::infrastructure::config::SignalPaths;
    use crate::infrastructure::memory_source::InMemoryVitalsSource;
    use async_trait::async_trait;

    fn state_with(source: Arc<dyn VitalsSource>) -> Arc<AppState> {
        let session = MonitoringSession::new(Classifier::default(), 20, 200);
        let monitor_service = MonitorService::new(source, session, SignalPaths::default());
        monitor_service.start().unwrap();
        let simulator_service = SimulatorService::new(monitor_service.clone());
        Arc::new(AppState {
            monitor_service,
            simulator_service,
        })
    }

    fn state() -> (Arc<AppState>, Arc<InMemoryVitalsSource>) {
        let source = Arc::new(InMemoryVitalsSource::new());
        (state_with(source.clone()), source)
    }

    /// Accepts listeners but rejects every write.
    struct ReadOnlySource(InMemoryVitalsSource);

    #[async_trait]
    impl VitalsSource for ReadOnlySource {
        fn subscribe(&self, path: &str, on_update: UpdateCallback) -> anyhow::Result<Subscription> {
            self.0.subscribe(path, on_update)
        }

        async fn write(&self, path: &str, _value: f64) -> anyhow::Result<()> {
            anyhow::bail!("permission denied writing {}", path)
        }
    }

    #[tokio::test]
    async fn test_write_then_read_history() {
        let (state, source) = state();

        let status = write_vital(
            Path("ekg".to_string()),
            State(state.clone()),
            Json(WriteRequest { value: 88.0 }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(source.value("ekg"), Some(88.0));

        let Json(series) = get_history(Path("heart_rate".to_string()), State(state))
            .await
            .unwrap();
        assert_eq!(series.kind, "heart_rate");
        assert_eq!(series.points.len(), 20);
        assert_eq!(series.points[19].value, 88.0);
    }

    #[tokio::test]
    async fn test_unknown_kind_is_not_found() {
        let (state, _) = state();
        let err = get_history(Path("bp".to_string()), State(state)).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_classify_endpoint() {
        let (state, _) = state();

        let Json(result) = classify(
            Query(ClassifyQuery {
                kind: "sp02".to_string(),
                value: Some(94.0),
            }),
            State(state.clone()),
        )
        .await;
        assert_eq!(result.status, "Low");

        let Json(result) = classify(
            Query(ClassifyQuery {
                kind: "glucose".to_string(),
                value: None,
            }),
            State(state),
        )
        .await;
        assert_eq!(result.status, "Unknown");
        assert_eq!(result.value, 0.0);
    }

    #[tokio::test]
    async fn test_dashboard_after_simulation() {
        let (state, _) = state();
        let Json(written) = simulate(State(state.clone())).await.unwrap();
        assert_eq!(written.len(), 3);

        let Json(dashboard) = get_dashboard(State(state)).await;
        assert_eq!(dashboard.connection, "Connected");
        assert_eq!(dashboard.cards.len(), 3);
        for (card, value) in dashboard.cards.iter().zip(&written) {
            assert_eq!(card.kind, value.kind);
            assert_eq!(card.value, value.value);
        }
        assert_eq!(dashboard.waveform.len(), 200);
    }

    #[tokio::test]
    async fn test_source_write_failure_is_bad_gateway() {
        let state = state_with(Arc::new(ReadOnlySource(InMemoryVitalsSource::new())));

        let err = simulate(State(state.clone())).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);

        let err = write_vital(
            Path("temperature".to_string()),
            State(state),
            Json(WriteRequest { value: 37.0 }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
