// Threshold-based status classification for vital signs
use super::vitals::SignalKind;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLabel {
    Normal,
    Abnormal,
    Low,
    Unknown,
}

impl StatusLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusLabel::Normal => "Normal",
            StatusLabel::Abnormal => "Abnormal",
            StatusLabel::Low => "Low",
            StatusLabel::Unknown => "Unknown",
        }
    }

    /// Abnormal and Low need attention; Unknown carries no clinical meaning.
    pub fn is_alert(&self) -> bool {
        matches!(self, StatusLabel::Abnormal | StatusLabel::Low)
    }
}

/// Normal ranges per signal kind. All bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub heart_rate_min: f64,
    pub heart_rate_max: f64,
    pub oxygen_saturation_min: f64,
    pub temperature_min: f64,
    pub temperature_max: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            heart_rate_min: 60.0,
            heart_rate_max: 100.0,
            oxygen_saturation_min: 95.0,
            temperature_min: 36.0,
            temperature_max: 37.5,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Classifier {
    thresholds: Thresholds,
}

impl Classifier {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn classify(&self, kind: SignalKind, value: f64) -> StatusLabel {
        let t = &self.thresholds;
        match kind {
            SignalKind::HeartRate => {
                if (t.heart_rate_min..=t.heart_rate_max).contains(&value) {
                    StatusLabel::Normal
                } else {
                    StatusLabel::Abnormal
                }
            }
            SignalKind::OxygenSaturation => {
                if value >= t.oxygen_saturation_min {
                    StatusLabel::Normal
                } else {
                    StatusLabel::Low
                }
            }
            SignalKind::Temperature => {
                if (t.temperature_min..=t.temperature_max).contains(&value) {
                    StatusLabel::Normal
                } else {
                    StatusLabel::Abnormal
                }
            }
        }
    }

    /// Classify an untyped kind. Anything that does not resolve to a known
    /// signal kind is `Unknown`.
    pub fn classify_raw(&self, kind: Option<SignalKind>, value: f64) -> StatusLabel {
        match kind {
            Some(kind) => self.classify(kind, value),
            None => StatusLabel::Unknown,
        }
    }

    /// Human readable normal range, e.g. "60-100 BPM".
    pub fn normal_range(&self, kind: SignalKind) -> String {
        let t = &self.thresholds;
        match kind {
            SignalKind::HeartRate => {
                format!("{}-{} {}", t.heart_rate_min, t.heart_rate_max, kind.unit())
            }
            SignalKind::OxygenSaturation => {
                format!("≥{}{}", t.oxygen_saturation_min, kind.unit())
            }
            SignalKind::Temperature => {
                format!("{}-{}{}", t.temperature_min, t.temperature_max, kind.unit())
            }
        }
    }
}
