// Domain layer - Vital sign models and pure monitoring logic
pub mod classifier;
pub mod dashboard;
pub mod history;
pub mod vitals;
pub mod waveform;
