// Simulator service - Writes plausible random vitals for manual testing
use crate::application::error::MonitorError;
use crate::application::monitor_service::MonitorService;
use crate::domain::vitals::SignalKind;
use rand::Rng;
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Clone)]
pub struct SimulatorService {
    monitor: MonitorService,
}

impl SimulatorService {
    pub fn new(monitor: MonitorService) -> Self {
        Self { monitor }
    }

    /// Write one random value per signal kind through the vitals source.
    pub async fn write_random(&self) -> Result<Vec<(SignalKind, f64)>, MonitorError> {
        let vitals = random_vitals(&mut rand::thread_rng());
        for (kind, value) in &vitals {
            self.monitor.write(*kind, *value).await?;
        }
        Ok(vitals)
    }

    pub fn spawn_periodic(self, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                if let Err(e) = self.write_random().await {
                    tracing::error!("Simulator write failed: {}", e);
                }
            }
        })
    }
}

/// Heart rate 60-99 BPM, SpO2 95-100 %, temperature 36.0-38.0 °C at one decimal.
pub fn random_vitals<R: Rng>(rng: &mut R) -> Vec<(SignalKind, f64)> {
    let heart_rate = rng.gen_range(60..100) as f64;
    let oxygen = rng.gen_range(95..=100) as f64;
    let temperature = (rng.gen_range(36.0..38.0_f64) * 10.0).round() / 10.0;

    vec![
        (SignalKind::HeartRate, heart_rate),
        (SignalKind::OxygenSaturation, oxygen),
        (SignalKind::Temperature, temperature),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::monitoring_session::MonitoringSession;
    use crate::domain::classifier::Classifier;
    use crate::infrastructure::config::SignalPaths;
    use crate::infrastructure::memory_source::InMemoryVitalsSource;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::Arc;

    #[test]
    fn test_random_vitals_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let vitals = random_vitals(&mut rng);
            let hr = vitals[0].1;
            let spo2 = vitals[1].1;
            let temp = vitals[2].1;

            assert!((60.0..100.0).contains(&hr) && hr.fract() == 0.0);
            assert!((95.0..=100.0).contains(&spo2) && spo2.fract() == 0.0);
            assert!((36.0..=38.0).contains(&temp));
            assert!(((temp * 10.0).round() - temp * 10.0).abs() < 1e-9);
        }
    }

    #[tokio::test]
    async fn test_write_random_reaches_session() {
        let source = Arc::new(InMemoryVitalsSource::new());
        let session = MonitoringSession::new(Classifier::default(), 20, 200);
        let monitor = MonitorService::new(source.clone(), session, SignalPaths::default());
        monitor.start().unwrap();

        let simulator = SimulatorService::new(monitor.clone());
        let written = simulator.write_random().await.unwrap();

        for (kind, value) in written {
            assert_eq!(source.value(kind.default_path()), Some(value));
            assert_eq!(monitor.history(kind).last().unwrap().value, value);
        }
    }
}
