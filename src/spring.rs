// Spring evaluation as a closed-form damped harmonic oscillator.
// Progress is a pure function of the local frame: 0 before the start, approaching 1 after.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimelineError};
use crate::types::Fps;

/// Default tolerance used to decide that a spring has come to rest.
pub const SETTLE_THRESHOLD: f64 = 0.005;

/// Upper bound for settle measurement, in seconds of animation.
const MAX_SETTLE_SECONDS: u32 = 600;

/// Physical parameters of a spring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    pub damping: f64,
    #[serde(default = "default_stiffness")]
    pub stiffness: f64,
    #[serde(default = "default_mass")]
    pub mass: f64,
    /// Never let progress pass 1.
    #[serde(default)]
    pub overshoot_clamping: bool,
}

fn default_stiffness() -> f64 {
    100.0
}

fn default_mass() -> f64 {
    1.0
}

impl SpringConfig {
    /// Spring with the given damping and default stiffness (100) and mass (1).
    pub fn new(damping: f64) -> Self {
        SpringConfig {
            damping,
            stiffness: default_stiffness(),
            mass: default_mass(),
            overshoot_clamping: false,
        }
    }

    pub fn with_stiffness(mut self, stiffness: f64) -> Self {
        self.stiffness = stiffness;
        self
    }

    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_overshoot_clamping(mut self, clamp: bool) -> Self {
        self.overshoot_clamping = clamp;
        self
    }

    /// Reject configs that would produce NaN or never move.
    pub fn validate(&self, name: &str) -> Result<()> {
        let check = |value: f64, field: &str| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TimelineError::InvalidSpring {
                    name: name.to_string(),
                    message: format!("{} must be a finite value > 0, got {}", field, value),
                })
            }
        };
        check(self.damping, "damping")?;
        check(self.stiffness, "stiffness")?;
        check(self.mass, "mass")
    }

    /// Natural angular frequency, radians per second.
    pub fn natural_frequency(&self) -> f64 {
        (self.stiffness / self.mass).sqrt()
    }

    pub fn critical_damping(&self) -> f64 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    pub fn damping_ratio(&self) -> f64 {
        self.damping / self.critical_damping()
    }

    /// Underdamped springs overshoot 1 before settling.
    pub fn is_underdamped(&self) -> bool {
        self.damping_ratio() < 1.0
    }

    /// Progress after `seconds` of motion, starting at rest at 0 with target 1.
    fn position_at(&self, seconds: f64) -> f64 {
        if seconds <= 0.0 {
            return 0.0;
        }

        let omega0 = self.natural_frequency();
        let zeta = self.damping_ratio();

        // Remaining displacement from the target, starting at 1 with zero velocity.
        let remaining = if zeta < 1.0 {
            let omega1 = omega0 * (1.0 - zeta * zeta).sqrt();
            let envelope = (-zeta * omega0 * seconds).exp();
            envelope
                * ((omega1 * seconds).cos() + (zeta * omega0 / omega1) * (omega1 * seconds).sin())
        } else {
            // Ratios >= 1 follow the critically damped curve.
            (-omega0 * seconds).exp() * (1.0 + omega0 * seconds)
        };

        let position = 1.0 - remaining;
        if self.overshoot_clamping {
            position.min(1.0)
        } else {
            position
        }
    }

    /// Upper bound on `|1 - position|` from `seconds` onwards.
    fn envelope_bound(&self, seconds: f64) -> f64 {
        let omega0 = self.natural_frequency();
        let zeta = self.damping_ratio();
        if zeta < 1.0 {
            (-zeta * omega0 * seconds).exp() / (1.0 - zeta * zeta).sqrt()
        } else {
            (-omega0 * seconds).exp() * (1.0 + omega0 * seconds)
        }
    }
}

/// Spring progress at a local frame. Returns exactly 0 for `frame <= 0`.
pub fn spring_progress(frame: i64, fps: Fps, config: &SpringConfig) -> f64 {
    if frame <= 0 {
        return 0.0;
    }
    config.position_at(fps.frames_to_seconds(frame))
}

/// Number of frames after which the spring stays within `threshold` of 1.
pub fn measure_spring(fps: Fps, config: &SpringConfig, threshold: f64) -> u32 {
    let max_frames = fps.as_u32().saturating_mul(MAX_SETTLE_SECONDS);
    let mut settled_from = 0u32;

    for frame in 0..=max_frames {
        let seconds = fps.frames_to_seconds(i64::from(frame));
        if (1.0 - config.position_at(seconds)).abs() > threshold {
            settled_from = frame + 1;
        }
        if frame >= settled_from && config.envelope_bound(seconds) <= threshold {
            return settled_from;
        }
    }

    tracing::warn!(
        damping = config.damping,
        stiffness = config.stiffness,
        "spring did not settle within {} seconds",
        MAX_SETTLE_SECONDS
    );
    settled_from
}

/// A spring animation between two values with its own start delay.
/// The natural settle window is measured once, at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    config: SpringConfig,
    fps: Fps,
    natural_frames: u32,
    from: f64,
    to: f64,
    delay: u32,
    duration_in_frames: Option<NonZeroU32>,
    reverse: bool,
}

impl Spring {
    pub fn new(config: SpringConfig, fps: Fps) -> Self {
        Spring {
            config,
            fps,
            natural_frames: measure_spring(fps, &config, SETTLE_THRESHOLD),
            from: 0.0,
            to: 1.0,
            delay: 0,
            duration_in_frames: None,
            reverse: false,
        }
    }

    pub fn from_to(mut self, from: f64, to: f64) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn with_delay(mut self, delay: u32) -> Self {
        self.delay = delay;
        self
    }

    /// Stretch the natural settle time to exactly `frames`. Zero keeps the natural duration.
    pub fn with_duration_in_frames(mut self, frames: u32) -> Self {
        self.duration_in_frames = NonZeroU32::new(frames);
        self
    }

    /// Play from `to` back to `from`.
    pub fn reversed(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn config(&self) -> &SpringConfig {
        &self.config
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    pub fn delay(&self) -> u32 {
        self.delay
    }

    /// Frames from the start until the spring is at rest.
    pub fn settle_frames(&self) -> u32 {
        self.duration_in_frames
            .map_or(self.natural_frames, NonZeroU32::get)
    }

    /// Normalized progress at a frame, delay applied.
    pub fn progress(&self, frame: i64) -> f64 {
        let mut local = (frame - i64::from(self.delay)) as f64;

        if self.reverse {
            local = f64::from(self.settle_frames()) - local;
        }

        if let Some(frames) = self.duration_in_frames {
            local *= f64::from(self.natural_frames) / f64::from(frames.get());
        }

        if local <= 0.0 {
            return 0.0;
        }
        self.config.position_at(local / self.fps.as_f64())
    }

    /// Value mapped into `[from, to]` at a frame.
    pub fn value(&self, frame: i64) -> f64 {
        self.from + (self.to - self.from) * self.progress(frame)
    }
}
