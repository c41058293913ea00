// Timing registry: the single source of truth for spring presets, stagger increments
// and named delays. Built once per composition, validated up front, read-only afterwards.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimelineError};
use crate::spring::{measure_spring, SpringConfig, SETTLE_THRESHOLD};
use crate::types::Fps;

/// Absorbs binary representation error so that e.g. 0.3 s at 30 fps is 9 frames, not 8.
const FRAME_EPSILON: f64 = 1e-9;

/// Convert seconds to whole frames, rounding down. Negative or non-finite input is 0.
pub fn seconds_to_frames(seconds: f64, fps: Fps) -> u32 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    let frames = (seconds * fps.as_f64() + FRAME_EPSILON).floor();
    if frames >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        frames as u32
    }
}

/// Named spring presets shared by every scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpringPreset {
    Snappy,
    Bouncy,
    Smooth,
    Perspective,
    Featured,
    Button,
    Row,
}

impl SpringPreset {
    pub const ALL: [SpringPreset; 7] = [
        SpringPreset::Snappy,
        SpringPreset::Bouncy,
        SpringPreset::Smooth,
        SpringPreset::Perspective,
        SpringPreset::Featured,
        SpringPreset::Button,
        SpringPreset::Row,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SpringPreset::Snappy => "snappy",
            SpringPreset::Bouncy => "bouncy",
            SpringPreset::Smooth => "smooth",
            SpringPreset::Perspective => "perspective",
            SpringPreset::Featured => "featured",
            SpringPreset::Button => "button",
            SpringPreset::Row => "row",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Per-item frame increments for staggered lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaggerKind {
    Card,
    ListItem,
    QuickStat,
}

/// Named entrance delays, configured in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedDelay {
    Header,
    ContentBase,
    CounterPre,
    SparklinePre,
    Featured,
}

impl NamedDelay {
    pub const ALL: [NamedDelay; 5] = [
        NamedDelay::Header,
        NamedDelay::ContentBase,
        NamedDelay::CounterPre,
        NamedDelay::SparklinePre,
        NamedDelay::Featured,
    ];

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Spring preset table. Missing entries fall back to the standard presets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringPresets {
    pub snappy: SpringConfig,
    pub bouncy: SpringConfig,
    pub smooth: SpringConfig,
    pub perspective: SpringConfig,
    pub featured: SpringConfig,
    pub button: SpringConfig,
    pub row: SpringConfig,
}

impl Default for SpringPresets {
    fn default() -> Self {
        SpringPresets {
            snappy: SpringConfig::new(15.0).with_stiffness(80.0),
            bouncy: SpringConfig::new(12.0),
            smooth: SpringConfig::new(200.0),
            perspective: SpringConfig::new(20.0).with_stiffness(60.0),
            featured: SpringConfig::new(14.0).with_stiffness(120.0),
            button: SpringConfig::new(10.0).with_stiffness(150.0),
            row: SpringConfig::new(18.0).with_stiffness(100.0),
        }
    }
}

impl SpringPresets {
    fn get(&self, preset: SpringPreset) -> &SpringConfig {
        match preset {
            SpringPreset::Snappy => &self.snappy,
            SpringPreset::Bouncy => &self.bouncy,
            SpringPreset::Smooth => &self.smooth,
            SpringPreset::Perspective => &self.perspective,
            SpringPreset::Featured => &self.featured,
            SpringPreset::Button => &self.button,
            SpringPreset::Row => &self.row,
        }
    }
}

/// Stagger increments in frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaggerIncrements {
    #[serde(default = "default_card_stagger")]
    pub card: u32,
    #[serde(default = "default_list_item_stagger")]
    pub list_item: u32,
    #[serde(default = "default_quick_stat_stagger")]
    pub quick_stat: u32,
}

fn default_card_stagger() -> u32 {
    5
}

fn default_list_item_stagger() -> u32 {
    20
}

fn default_quick_stat_stagger() -> u32 {
    4
}

impl Default for StaggerIncrements {
    fn default() -> Self {
        StaggerIncrements {
            card: default_card_stagger(),
            list_item: default_list_item_stagger(),
            quick_stat: default_quick_stat_stagger(),
        }
    }
}

/// Named delays in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelaySeconds {
    #[serde(default = "default_header_delay")]
    pub header: f64,
    #[serde(default = "default_content_base_delay")]
    pub content_base: f64,
    #[serde(default = "default_counter_pre_delay")]
    pub counter_pre: f64,
    #[serde(default = "default_sparkline_pre_delay")]
    pub sparkline_pre: f64,
    #[serde(default = "default_featured_delay")]
    pub featured: f64,
}

fn default_header_delay() -> f64 {
    0.3
}

fn default_content_base_delay() -> f64 {
    1.0
}

fn default_counter_pre_delay() -> f64 {
    0.5
}

fn default_sparkline_pre_delay() -> f64 {
    0.8
}

fn default_featured_delay() -> f64 {
    1.5
}

impl Default for DelaySeconds {
    fn default() -> Self {
        DelaySeconds {
            header: default_header_delay(),
            content_base: default_content_base_delay(),
            counter_pre: default_counter_pre_delay(),
            sparkline_pre: default_sparkline_pre_delay(),
            featured: default_featured_delay(),
        }
    }
}

impl DelaySeconds {
    fn get(&self, delay: NamedDelay) -> f64 {
        match delay {
            NamedDelay::Header => self.header,
            NamedDelay::ContentBase => self.content_base,
            NamedDelay::CounterPre => self.counter_pre,
            NamedDelay::SparklinePre => self.sparkline_pre,
            NamedDelay::Featured => self.featured,
        }
    }
}

/// Host-supplied timing overrides. Every field defaults to the standard table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TimingConfig {
    #[serde(default)]
    pub springs: SpringPresets,
    #[serde(default)]
    pub stagger: StaggerIncrements,
    #[serde(default)]
    pub delays: DelaySeconds,
}

/// Validated, read-only timing table for one frame rate.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingRegistry {
    fps: Fps,
    config: TimingConfig,
    delay_frames: [u32; 5],
    settle_frames: [u32; 7],
}

impl TimingRegistry {
    pub fn new(config: TimingConfig, fps: Fps) -> Result<Self> {
        for preset in SpringPreset::ALL {
            config.springs.get(preset).validate(preset.name())?;
        }

        let mut delay_frames = [0u32; 5];
        for delay in NamedDelay::ALL {
            let seconds = config.delays.get(delay);
            if !seconds.is_finite() || seconds < 0.0 {
                return Err(TimelineError::InvalidConfig(format!(
                    "delay {:?} must be a finite, non-negative number of seconds, got {}",
                    delay, seconds
                )));
            }
            delay_frames[delay.index()] = seconds_to_frames(seconds, fps);
        }

        let mut settle_frames = [0u32; 7];
        for preset in SpringPreset::ALL {
            settle_frames[preset.index()] =
                measure_spring(fps, config.springs.get(preset), SETTLE_THRESHOLD);
        }

        tracing::debug!(
            fps = fps.as_u32(),
            ?delay_frames,
            ?settle_frames,
            "timing registry initialized"
        );

        Ok(TimingRegistry {
            fps,
            config,
            delay_frames,
            settle_frames,
        })
    }

    /// Registry with the standard presets.
    pub fn standard(fps: Fps) -> Result<Self> {
        Self::new(TimingConfig::default(), fps)
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    pub fn config(&self) -> &TimingConfig {
        &self.config
    }

    pub fn spring(&self, preset: SpringPreset) -> &SpringConfig {
        self.config.springs.get(preset)
    }

    /// Frames until the preset stays within the settle threshold of 1.
    pub fn settle_frames(&self, preset: SpringPreset) -> u32 {
        self.settle_frames[preset.index()]
    }

    pub fn stagger(&self, kind: StaggerKind) -> u32 {
        match kind {
            StaggerKind::Card => self.config.stagger.card,
            StaggerKind::ListItem => self.config.stagger.list_item,
            StaggerKind::QuickStat => self.config.stagger.quick_stat,
        }
    }

    pub fn delay_seconds(&self, delay: NamedDelay) -> f64 {
        self.config.delays.get(delay)
    }

    pub fn delay_frames(&self, delay: NamedDelay) -> u32 {
        self.delay_frames[delay.index()]
    }

    pub fn seconds_to_frames(&self, seconds: f64) -> u32 {
        seconds_to_frames(seconds, self.fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fps30() -> Fps {
        Fps::new(30).unwrap()
    }

    #[test]
    fn seconds_to_frames_floors() {
        assert_eq!(seconds_to_frames(1.0, fps30()), 30);
        assert_eq!(seconds_to_frames(0.3, fps30()), 9);
        assert_eq!(seconds_to_frames(0.33, fps30()), 9);
        assert_eq!(seconds_to_frames(0.8, fps30()), 24);
        assert_eq!(seconds_to_frames(0.0, fps30()), 0);
    }

    #[test]
    fn seconds_to_frames_is_total() {
        assert_eq!(seconds_to_frames(-1.0, fps30()), 0);
        assert_eq!(seconds_to_frames(f64::NAN, fps30()), 0);
        assert_eq!(seconds_to_frames(f64::INFINITY, fps30()), 0);
        assert_eq!(seconds_to_frames(1e12, fps30()), u32::MAX);
    }

    #[test]
    fn standard_registry_values() {
        let registry = TimingRegistry::standard(fps30()).unwrap();
        let snappy = registry.spring(SpringPreset::Snappy);
        assert_eq!(snappy.damping, 15.0);
        assert_eq!(snappy.stiffness, 80.0);
        assert_eq!(registry.spring(SpringPreset::Bouncy).damping, 12.0);
        assert_eq!(registry.spring(SpringPreset::Smooth).damping, 200.0);
        assert_eq!(registry.delay_frames(NamedDelay::Header), 9);
        assert_eq!(registry.delay_frames(NamedDelay::ContentBase), 30);
        assert_eq!(registry.delay_frames(NamedDelay::Featured), 45);
        assert_eq!(registry.stagger(StaggerKind::ListItem), 20);
    }

    #[test]
    fn registry_keeps_the_config_it_was_built_from() {
        let mut config = TimingConfig::default();
        config.stagger.card = 7;
        let registry = TimingRegistry::new(config.clone(), fps30()).unwrap();
        assert_eq!(registry.config(), &config);
        assert_eq!(registry.stagger(StaggerKind::Card), 7);
    }

    #[test]
    fn delays_follow_frame_rate() {
        let registry = TimingRegistry::standard(Fps::new(60).unwrap()).unwrap();
        assert_eq!(registry.delay_frames(NamedDelay::Header), 18);
        assert_eq!(registry.delay_seconds(NamedDelay::Header), 0.3);
    }

    #[test]
    fn every_preset_has_a_settle_window() {
        let registry = TimingRegistry::standard(fps30()).unwrap();
        for preset in SpringPreset::ALL {
            assert!(registry.settle_frames(preset) > 0, "{:?}", preset);
        }
    }

    #[test]
    fn invalid_preset_fails_fast() {
        let mut config = TimingConfig::default();
        config.springs.bouncy = SpringConfig::new(0.0);
        let err = TimingRegistry::new(config, fps30()).unwrap_err();
        assert!(err.to_string().contains("bouncy"));
    }

    #[test]
    fn negative_delay_rejected() {
        let mut config = TimingConfig::default();
        config.delays.header = -0.5;
        assert!(matches!(
            TimingRegistry::new(config, fps30()),
            Err(TimelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn partial_json_config_keeps_defaults() {
        let json = r#"{"springs":{"snappy":{"damping":20}},"stagger":{"card":7}}"#;
        let config: TimingConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.springs.snappy.damping, 20.0);
        assert_eq!(config.springs.snappy.stiffness, 100.0);
        assert_eq!(config.springs.smooth.damping, 200.0);
        assert_eq!(config.stagger.card, 7);
        assert_eq!(config.stagger.list_item, 20);
        assert_eq!(config.delays.header, 0.3);
    }
}
