// Monitoring session - per-session state fed by the vitals source
use crate::domain::classifier::{Classifier, StatusLabel};
use crate::domain::dashboard::{ConnectionStatus, Dashboard, HistorySeries, VitalCard};
use crate::domain::history::RollingHistory;
use crate::domain::vitals::{Sample, SignalKind};
use crate::domain::waveform::generate_waveform;
use chrono::{DateTime, Utc};

/// Result of absorbing one sample, pushed to dashboard clients.
#[derive(Debug, Clone)]
pub struct VitalUpdate {
    pub kind: SignalKind,
    pub value: f64,
    pub status: StatusLabel,
    pub observed_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct MonitoringSession {
    classifier: Classifier,
    history: RollingHistory,
    waveform_width: usize,
    connection: ConnectionStatus,
    last_update: Option<DateTime<Utc>>,
}

impl MonitoringSession {
    pub fn new(classifier: Classifier, history_capacity: usize, waveform_width: usize) -> Self {
        Self {
            classifier,
            history: RollingHistory::new(history_capacity),
            waveform_width,
            connection: ConnectionStatus::Connecting,
            last_update: None,
        }
    }

    /// Append then classify. A missing value is recorded as 0. Returns `None`
    /// once the session is closed; the history is left untouched.
    pub fn on_sample(
        &mut self,
        kind: SignalKind,
        value: Option<f64>,
        observed_at: DateTime<Utc>,
    ) -> Option<VitalUpdate> {
        if self.is_closed() {
            tracing::debug!("Dropping {} sample after session close", kind.slug());
            return None;
        }

        let value = value.unwrap_or(0.0);
        self.history.append(kind, value, observed_at);
        self.last_update = Some(observed_at);
        self.connection = ConnectionStatus::Connected;

        let status = self.classifier.classify(kind, value);
        tracing::debug!("{} = {} ({})", kind.slug(), value, status.as_str());

        Some(VitalUpdate {
            kind,
            value,
            status,
            observed_at,
        })
    }

    pub fn current(&self, kind: SignalKind) -> Vec<Sample> {
        self.history.current(kind)
    }

    pub fn latest_value(&self, kind: SignalKind) -> f64 {
        self.history.window(kind).latest().value
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn connection(&self) -> ConnectionStatus {
        self.connection
    }

    pub fn close(&mut self) {
        self.connection = ConnectionStatus::Closed;
    }

    pub fn is_closed(&self) -> bool {
        self.connection == ConnectionStatus::Closed
    }

    pub fn dashboard(&self) -> Dashboard {
        let cards = SignalKind::ALL
            .into_iter()
            .map(|kind| {
                let value = self.latest_value(kind);
                VitalCard {
                    kind,
                    value,
                    status: self.classifier.classify(kind, value),
                    normal_range: self.classifier.normal_range(kind),
                }
            })
            .collect();

        let history = SignalKind::ALL
            .into_iter()
            .map(|kind| HistorySeries {
                kind,
                samples: self.current(kind),
            })
            .collect();

        Dashboard {
            title: "Health Monitor".to_string(),
            connection: self.connection,
            last_update: self.last_update,
            cards,
            history,
            waveform: generate_waveform(self.latest_value(SignalKind::HeartRate), self.waveform_width),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> MonitoringSession {
        MonitoringSession::new(Classifier::default(), 20, 200)
    }

    #[test]
    fn test_heart_rate_scenario() {
        let mut session = session();
        let mut last = None;
        for v in [72.0, 85.0, 110.0] {
            last = session.on_sample(SignalKind::HeartRate, Some(v), Utc::now());
        }

        let values: Vec<f64> = session
            .current(SignalKind::HeartRate)
            .iter()
            .map(|s| s.value)
            .collect();
        assert_eq!(values.len(), 20);
        assert!(values[..17].iter().all(|v| *v == 0.0));
        assert_eq!(&values[17..], &[72.0, 85.0, 110.0]);

        let update = last.unwrap();
        assert_eq!(update.status, StatusLabel::Abnormal);
        assert_eq!(session.classifier().classify(SignalKind::HeartRate, 110.0), StatusLabel::Abnormal);
    }

    #[test]
    fn test_missing_value_is_zero() {
        let mut session = session();
        let update = session
            .on_sample(SignalKind::OxygenSaturation, None, Utc::now())
            .unwrap();
        assert_eq!(update.value, 0.0);
        assert_eq!(update.status, StatusLabel::Low);
        assert_eq!(session.latest_value(SignalKind::OxygenSaturation), 0.0);
        assert!(!session.current(SignalKind::OxygenSaturation)[19].is_placeholder());
    }

    #[test]
    fn test_connection_status_transitions() {
        let mut session = session();
        assert_eq!(session.connection(), ConnectionStatus::Connecting);
        assert!(session.dashboard().last_update.is_none());

        let now = Utc::now();
        session.on_sample(SignalKind::Temperature, Some(36.6), now);
        assert_eq!(session.connection(), ConnectionStatus::Connected);
        assert_eq!(session.dashboard().last_update, Some(now));

        session.close();
        assert_eq!(session.connection(), ConnectionStatus::Closed);
    }

    #[test]
    fn test_closed_session_ignores_samples() {
        let mut session = session();
        session.on_sample(SignalKind::HeartRate, Some(70.0), Utc::now());
        session.close();

        let before = session.current(SignalKind::HeartRate);
        assert!(session
            .on_sample(SignalKind::HeartRate, Some(150.0), Utc::now())
            .is_none());
        assert_eq!(session.current(SignalKind::HeartRate), before);
    }

    #[test]
    fn test_dashboard_snapshot() {
        let mut session = session();
        session.on_sample(SignalKind::HeartRate, Some(72.0), Utc::now());
        session.on_sample(SignalKind::OxygenSaturation, Some(93.0), Utc::now());
        session.on_sample(SignalKind::Temperature, Some(36.8), Utc::now());

        let dashboard = session.dashboard();
        assert_eq!(dashboard.cards.len(), 3);
        assert_eq!(dashboard.history.len(), 3);
        assert_eq!(dashboard.waveform.len(), 200);

        let spo2 = dashboard.card(SignalKind::OxygenSaturation).unwrap();
        assert_eq!(spo2.value, 93.0);
        assert_eq!(spo2.status, StatusLabel::Low);
        assert_eq!(spo2.normal_range, "≥95%");
        assert!(dashboard.has_alerts());

        let hr = dashboard.card(SignalKind::HeartRate).unwrap();
        assert_eq!(hr.status, StatusLabel::Normal);
    }
}
