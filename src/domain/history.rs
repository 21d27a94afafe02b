// Fixed-capacity rolling history per signal kind
use super::vitals::{Sample, SignalKind};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// Oldest-first window that always holds exactly `capacity` samples.
#[derive(Debug, Clone)]
pub struct HistoryWindow {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl HistoryWindow {
    /// Capacity is clamped to at least one slot.
    pub fn new(kind: SignalKind, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let samples = std::iter::repeat_with(|| Sample::placeholder(kind))
            .take(capacity)
            .collect();
        Self { samples, capacity }
    }

    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn push(&mut self, sample: Sample) {
        self.samples.pop_front();
        self.samples.push_back(sample);
    }

    pub fn samples(&self) -> Vec<Sample> {
        self.samples.iter().cloned().collect()
    }

    pub fn latest(&self) -> &Sample {
        // Never empty: filled at construction, push keeps the length.
        &self.samples[self.capacity - 1]
    }

    #[cfg(test)]
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.value)
    }
}

/// One independent window per signal kind.
#[derive(Debug, Clone)]
pub struct RollingHistory {
    heart_rate: HistoryWindow,
    oxygen_saturation: HistoryWindow,
    temperature: HistoryWindow,
}

impl RollingHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            heart_rate: HistoryWindow::new(SignalKind::HeartRate, capacity),
            oxygen_saturation: HistoryWindow::new(SignalKind::OxygenSaturation, capacity),
            temperature: HistoryWindow::new(SignalKind::Temperature, capacity),
        }
    }

    pub fn append(&mut self, kind: SignalKind, value: f64, observed_at: DateTime<Utc>) {
        self.window_mut(kind)
            .push(Sample::new(kind, value, observed_at));
    }

    pub fn current(&self, kind: SignalKind) -> Vec<Sample> {
        self.window(kind).samples()
    }

    pub fn window(&self, kind: SignalKind) -> &HistoryWindow {
        match kind {
            SignalKind::HeartRate => &self.heart_rate,
            SignalKind::OxygenSaturation => &self.oxygen_saturation,
            SignalKind::Temperature => &self.temperature,
        }
    }

    fn window_mut(&mut self, kind: SignalKind) -> &mut HistoryWindow {
        match kind {
            SignalKind::HeartRate => &mut self.heart_rate,
            SignalKind::OxygenSaturation => &mut self.oxygen_saturation,
            SignalKind::Temperature => &mut self.temperature,
        }
    }
}

impl Default for RollingHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
