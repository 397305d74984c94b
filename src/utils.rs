pub const APP_NAME: &str = "harmony-stream";

pub const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "flac", "wav", "ogg", "m4a"];

/// Speeds offered by the rate controls, slowest first.
pub const PLAYBACK_RATES: &[f32] = &[0.5, 0.75, 1.0, 1.25, 1.5, 2.0];

/// Step used by the volume up/down keys.
pub const VOLUME_STEP: f32 = 0.05;

/// Convert a volume setting (0.0-1.0) to the amplitude multiplier sent to the output
///
/// Human hearing is logarithmic, so we use x^4 to approximate an exponential curve.
/// This provides a 60dB dynamic range, making volume changes feel more linear to human perception.
pub fn perceptual_amplitude(volume: f32) -> f32 {
    volume.clamp(0.0, 1.0).powi(4)
}

/// User-facing percentage (0-100) to a volume setting (0.0-1.0)
pub fn percent_to_volume(percent: u8) -> f32 {
    f32::from(percent.min(100)) / 100.0
}

/// Volume setting (0.0-1.0) to a user-facing percentage (0-100)
pub fn volume_to_percent(volume: f32) -> u8 {
    (volume.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Next rate in [`PLAYBACK_RATES`] above (`faster`) or below `current`.
///
/// Stays put at either end of the list.
pub fn step_rate(current: f32, faster: bool) -> f32 {
    if faster {
        PLAYBACK_RATES
            .iter()
            .copied()
            .find(|r| *r > current + f32::EPSILON)
            .unwrap_or(current)
    } else {
        PLAYBACK_RATES
            .iter()
            .rev()
            .copied()
            .find(|r| *r < current - f32::EPSILON)
            .unwrap_or(current)
    }
}
