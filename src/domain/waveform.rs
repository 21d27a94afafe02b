// Synthetic ECG trace for the heart rate card. Decorative only.
use std::f64::consts::PI;

/// Vertical rest position, in the same coordinate space as the card's
/// 200x40 drawing area (y grows downwards).
pub const BASELINE: f64 = 20.0;
pub const AMPLITUDE: f64 = 10.0;

const PIXELS_PER_SECOND: f64 = 50.0;
const MAX_HEART_RATE: f64 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveformPoint {
    pub x: f64,
    pub y: f64,
}

/// One point per horizontal pixel. The beat period shrinks as heart rate
/// grows; a non-positive or non-finite rate draws a flat line.
pub fn generate_waveform(heart_rate: f64, sample_width: usize) -> Vec<WaveformPoint> {
    let period = beat_period(heart_rate);

    (0..sample_width)
        .map(|i| {
            let x = i as f64;
            let y = match period {
                Some(period) => BASELINE - AMPLITUDE * beat_shape((x / period).fract()),
                None => BASELINE,
            };
            WaveformPoint { x, y }
        })
        .collect()
}

fn beat_period(heart_rate: f64) -> Option<f64> {
    if !heart_rate.is_finite() || heart_rate <= 0.0 {
        return None;
    }
    let rate = heart_rate.min(MAX_HEART_RATE);
    Some(PIXELS_PER_SECOND * 60.0 / rate)
}

// P wave, QRS complex, T wave over a single beat phase in [0, 1).
fn beat_shape(phase: f64) -> f64 {
    match phase {
        p if (0.10..0.20).contains(&p) => 0.15 * (PI * (p - 0.10) / 0.10).sin(),
        p if (0.30..0.40).contains(&p) => (2.0 * PI * (p - 0.30) / 0.10).sin(),
        p if (0.55..0.75).contains(&p) => 0.3 * (PI * (p - 0.55) / 0.20).sin(),
        _ => 0.0,
    }
}
