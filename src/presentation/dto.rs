// JSON views of the domain models
use crate::application::monitoring_session::VitalUpdate;
use crate::domain::classifier::StatusLabel;
use crate::domain::dashboard::{Dashboard, HistorySeries, VitalCard};
use crate::domain::vitals::{Sample, SignalKind};
use crate::domain::waveform::WaveformPoint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct DashboardDto {
    pub title: String,
    pub connection: &'static str,
    pub last_update: Option<DateTime<Utc>>,
    pub has_alerts: bool,
    pub cards: Vec<CardDto>,
    pub history: Vec<SeriesDto>,
    pub waveform: Vec<PointDto>,
}

#[derive(Debug, Serialize)]
pub struct CardDto {
    pub kind: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub unit: &'static str,
    pub value: f64,
    pub status: &'static str,
    pub alert: bool,
    pub normal_range: String,
}

#[derive(Debug, Serialize)]
pub struct SeriesDto {
    pub kind: &'static str,
    pub title: &'static str,
    pub unit: &'static str,
    pub points: Vec<HistoryPointDto>,
}

#[derive(Debug, Serialize)]
pub struct HistoryPointDto {
    pub value: f64,
    pub observed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct PointDto {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VitalUpdateDto {
    pub kind: &'static str,
    pub value: f64,
    pub status: &'static str,
    pub alert: bool,
    pub observed_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ClassificationDto {
    pub kind: String,
    pub value: f64,
    pub status: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ClassifyQuery {
    pub kind: String,
    pub value: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct WriteRequest {
    pub value: f64,
}

#[derive(Debug, Serialize)]
pub struct WrittenValueDto {
    pub kind: &'static str,
    pub value: f64,
}

pub fn dashboard_to_dto(dashboard: Dashboard) -> DashboardDto {
    let has_alerts = dashboard.has_alerts();
    DashboardDto {
        title: dashboard.title,
        connection: dashboard.connection.as_str(),
        last_update: dashboard.last_update,
        has_alerts,
        cards: dashboard.cards.into_iter().map(card_to_dto).collect(),
        history: dashboard.history.into_iter().map(series_to_dto).collect(),
        waveform: dashboard.waveform.into_iter().map(point_to_dto).collect(),
    }
}

fn card_to_dto(card: VitalCard) -> CardDto {
    CardDto {
        kind: card.kind.slug(),
        title: card.kind.title(),
        subtitle: card.kind.subtitle(),
        unit: card.kind.unit(),
        value: card.value,
        status: card.status.as_str(),
        alert: card.status.is_alert(),
        normal_range: card.normal_range,
    }
}

pub fn series_to_dto(series: HistorySeries) -> SeriesDto {
    samples_to_dto(series.kind, series.samples)
}

pub fn samples_to_dto(kind: SignalKind, samples: Vec<Sample>) -> SeriesDto {
    SeriesDto {
        kind: kind.slug(),
        title: kind.title(),
        unit: kind.unit(),
        points: samples
            .into_iter()
            .map(|s| HistoryPointDto {
                value: s.value,
                observed_at: s.observed_at,
            })
            .collect(),
    }
}

fn point_to_dto(point: WaveformPoint) -> PointDto {
    PointDto {
        x: point.x,
        y: point.y,
    }
}

pub fn update_to_dto(update: VitalUpdate) -> VitalUpdateDto {
    VitalUpdateDto {
        kind: update.kind.slug(),
        value: update.value,
        status: update.status.as_str(),
        alert: update.status.is_alert(),
        observed_at: update.observed_at,
    }
}

pub fn classification_to_dto(kind: String, value: f64, status: StatusLabel) -> ClassificationDto {
    ClassificationDto {
        kind,
        value,
        status: status.as_str(),
    }
}
