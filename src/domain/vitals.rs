// Vital sign domain models
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    HeartRate,
    OxygenSaturation,
    Temperature,
}

impl SignalKind {
    pub const ALL: [SignalKind; 3] = [
        SignalKind::HeartRate,
        SignalKind::OxygenSaturation,
        SignalKind::Temperature,
    ];

    /// Path of this signal in the reference database deployment.
    pub fn default_path(&self) -> &'static str {
        match self {
            SignalKind::HeartRate => "ekg",
            SignalKind::OxygenSaturation => "sp02",
            SignalKind::Temperature => "suhu",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            SignalKind::HeartRate => "heart_rate",
            SignalKind::OxygenSaturation => "oxygen_saturation",
            SignalKind::Temperature => "temperature",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SignalKind::HeartRate => "Heart Rate",
            SignalKind::OxygenSaturation => "Oxygen Level",
            SignalKind::Temperature => "Temperature",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            SignalKind::HeartRate => "EKG Monitoring",
            SignalKind::OxygenSaturation => "SpO2 Saturation",
            SignalKind::Temperature => "Body Heat",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            SignalKind::HeartRate => "BPM",
            SignalKind::OxygenSaturation => "%",
            SignalKind::Temperature => "°C",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.slug() == slug)
    }
}

/// A single observation of one signal kind.
///
/// Placeholder samples (used to pre-fill history windows) carry a zero value
/// and no timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub kind: SignalKind,
    pub value: f64,
    pub observed_at: Option<DateTime<Utc>>,
}

impl Sample {
    pub fn new(kind: SignalKind, value: f64, observed_at: DateTime<Utc>) -> Self {
        Self {
            kind,
            value,
            observed_at: Some(observed_at),
        }
    }

    pub fn placeholder(kind: SignalKind) -> Self {
        Self {
            kind,
            value: 0.0,
            observed_at: None,
        }
    }

    #[cfg(test)]
    pub fn is_placeholder(&self) -> bool {
        self.observed_at.is_none()
    }
}
