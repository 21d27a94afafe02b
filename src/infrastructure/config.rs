use crate::domain::classifier::Thresholds;
use crate::domain::history::DEFAULT_HISTORY_CAPACITY;
use crate::domain::vitals::SignalKind;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct MonitorConfig {
    pub server: ServerSettings,
    pub source: SourceSettings,
    pub paths: SignalPaths,
    pub history: HistorySettings,
    pub thresholds: Thresholds,
    pub waveform: WaveformSettings,
    pub simulator: SimulatorSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Memory,
    Realtime,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SourceSettings {
    pub kind: SourceKind,
    pub database_url: Option<String>,
    pub auth_token: Option<String>,
}

/// Database path per signal kind.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SignalPaths {
    pub heart_rate: String,
    pub oxygen_saturation: String,
    pub temperature: String,
}

impl Default for SignalPaths {
    fn default() -> Self {
        Self {
            heart_rate: SignalKind::HeartRate.default_path().to_string(),
            oxygen_saturation: SignalKind::OxygenSaturation.default_path().to_string(),
            temperature: SignalKind::Temperature.default_path().to_string(),
        }
    }
}

impl SignalPaths {
    pub fn path(&self, kind: SignalKind) -> &str {
        match kind {
            SignalKind::HeartRate => &self.heart_rate,
            SignalKind::OxygenSaturation => &self.oxygen_saturation,
            SignalKind::Temperature => &self.temperature,
        }
    }

    /// Accepts either a configured database path or a kind slug
    /// ("heart_rate", "oxygen_saturation", "temperature").
    pub fn resolve(&self, name: &str) -> Option<SignalKind> {
        SignalKind::ALL
            .into_iter()
            .find(|kind| self.path(*kind) == name)
            .or_else(|| SignalKind::from_slug(name))
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HistorySettings {
    pub capacity: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WaveformSettings {
    pub sample_width: usize,
}

impl Default for WaveformSettings {
    fn default() -> Self {
        Self { sample_width: 200 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SimulatorSettings {
    pub enabled: bool,
    pub interval_ms: u64,
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_ms: 2000,
        }
    }
}

impl MonitorConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.history.capacity == 0 {
            anyhow::bail!("history.capacity must be at least 1");
        }

        let t = &self.thresholds;
        if t.heart_rate_min > t.heart_rate_max {
            anyhow::bail!(
                "thresholds.heart_rate_min ({}) exceeds heart_rate_max ({})",
                t.heart_rate_min,
                t.heart_rate_max
            );
        }
        if t.temperature_min > t.temperature_max {
            anyhow::bail!(
                "thresholds.temperature_min ({}) exceeds temperature_max ({})",
                t.temperature_min,
                t.temperature_max
            );
        }

        if self.source.kind == SourceKind::Realtime && self.source.database_url.is_none() {
            anyhow::bail!("source.database_url is required for the realtime source");
        }

        if self.simulator.enabled && self.simulator.interval_ms == 0 {
            anyhow::bail!("simulator.interval_ms must be greater than zero");
        }

        Ok(())
    }
}

/// Loads `config/monitor.*` (optional) overlaid with `VITALS__*` environment
/// variables, e.g. `VITALS__SERVER__BIND_ADDRESS=127.0.0.1:9000`.
pub fn load_monitor_config() -> anyhow::Result<MonitorConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/monitor").required(false))
        .add_source(
            config::Environment::with_prefix("VITALS")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    let config: MonitorConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}
