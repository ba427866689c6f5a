use crate::config;
use std::f32::consts::{PI, TAU};

/// Linear interpolation between two f32 values
pub fn lerp(start: f32, end: f32, alpha: f32) -> f32 {
    start + (end - start) * alpha
}

/// Progress of a timed cue, 0.0 when it starts and 1.0 when it is done
pub fn cue_progress(remaining: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        return 1.0;
    }
    (1.0 - remaining / duration).clamp(0.0, 1.0)
}

/// Font scale for the word pulse: swells once and settles back to 1.0
pub fn pulse_scale(progress: f32) -> f32 {
    lerp(1.0, 1.0 + config::PULSE_SCALE, (progress * PI).sin())
}

/// Horizontal offset for the word shake, decaying to zero
pub fn shake_offset(progress: f32) -> f32 {
    let decay = 1.0 - progress;
    config::SHAKE_AMPLITUDE * decay * (progress * config::SHAKE_FREQUENCY * TAU).sin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_lerp() {
        assert_approx_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_approx_eq!(lerp(0.0, 10.0, 0.0), 0.0);
        assert_approx_eq!(lerp(0.0, 10.0, 1.0), 10.0);
        assert_approx_eq!(lerp(5.0, 10.0, 0.5), 7.5);
    }

    #[test]
    fn test_cue_progress() {
        assert_approx_eq!(cue_progress(0.5, 0.5), 0.0);
        assert_approx_eq!(cue_progress(0.25, 0.5), 0.5);
        assert_approx_eq!(cue_progress(0.0, 0.5), 1.0);
        // Overshoot in either direction is clamped
        assert_approx_eq!(cue_progress(-0.1, 0.5), 1.0);
        assert_approx_eq!(cue_progress(0.9, 0.5), 0.0);
        assert_approx_eq!(cue_progress(0.3, 0.0), 1.0);
    }

    #[test]
    fn test_pulse_scale_peaks_midway() {
        assert_approx_eq!(pulse_scale(0.0), 1.0);
        assert_approx_eq!(pulse_scale(0.5), 1.0 + config::PULSE_SCALE);
        assert_approx_eq!(pulse_scale(1.0), 1.0, 1e-5);
    }

    #[test]
    fn test_shake_settles() {
        assert_approx_eq!(shake_offset(0.0), 0.0);
        assert_approx_eq!(shake_offset(1.0), 0.0);
        let peak = (0..100)
            .map(|i| shake_offset(i as f32 / 100.0).abs())
            .fold(0.0f32, f32::max);
        assert!(peak > 0.0 && peak <= config::SHAKE_AMPLITUDE);
    }
}
