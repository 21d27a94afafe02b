// Dashboard view model
use super::classifier::StatusLabel;
use super::vitals::{Sample, SignalKind};
use super::waveform::WaveformPoint;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Closed,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Connecting => "Connecting...",
            ConnectionStatus::Connected => "Connected",
            ConnectionStatus::Closed => "Closed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct VitalCard {
    pub kind: SignalKind,
    pub value: f64,
    pub status: StatusLabel,
    pub normal_range: String,
}

#[derive(Debug, Clone)]
pub struct HistorySeries {
    pub kind: SignalKind,
    pub samples: Vec<Sample>,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub title: String,
    pub connection: ConnectionStatus,
    pub last_update: Option<DateTime<Utc>>,
    pub cards: Vec<VitalCard>,
    pub history: Vec<HistorySeries>,
    pub waveform: Vec<WaveformPoint>,
}

impl Dashboard {
    #[cfg(test)]
    pub fn card(&self, kind: SignalKind) -> Option<&VitalCard> {
        self.cards.iter().find(|c| c.kind == kind)
    }

    pub fn has_alerts(&self) -> bool {
        self.cards.iter().any(|c| c.status.is_alert())
    }
}
