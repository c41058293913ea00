// Strong typing over strings. Newtypes for frames and frame rate, typed style records.
// CSS strings are produced only at the rendering boundary.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimelineError};
use crate::timing::TimingConfig;

/// Global frame index. Newtype for type safety; never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct FrameIndex(u32);

impl FrameIndex {
    pub fn new(index: u32) -> Self {
        FrameIndex(index)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    /// Frame relative to an element's start. Negative before the delay.
    pub fn local(&self, delay: u32) -> i64 {
        i64::from(self.0) - i64::from(delay)
    }
}

/// Frames per second. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Fps(u32);

impl Fps {
    pub fn new(fps: u32) -> Result<Self> {
        if fps == 0 {
            return Err(TimelineError::InvalidConfig(
                "fps must be positive".to_string(),
            ));
        }
        Ok(Fps(fps))
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        f64::from(self.0)
    }

    /// Seconds elapsed after `frames` frames.
    pub fn frames_to_seconds(&self, frames: i64) -> f64 {
        frames as f64 / self.as_f64()
    }
}

impl Default for Fps {
    fn default() -> Self {
        Fps(30)
    }
}

impl TryFrom<u32> for Fps {
    type Error = TimelineError;

    fn try_from(value: u32) -> Result<Self> {
        Fps::new(value)
    }
}

impl From<Fps> for u32 {
    fn from(fps: Fps) -> u32 {
        fps.0
    }
}

/// Engine configuration passed from JS.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub fps: Fps,
    #[serde(default)]
    pub timing: TimingConfig,
    /// Scene names in playback order.
    #[serde(default = "default_scenes")]
    pub scenes: Vec<String>,
}

fn default_scenes() -> Vec<String> {
    vec![
        "title_card".to_string(),
        "dashboard".to_string(),
        "call_to_action".to_string(),
    ]
}

/// Role of a visual element inside a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementRole {
    Background,
    Header,
    Title,
    Subtitle,
    Card,
    ListItem,
    QuickStat,
    Badge,
    Counter,
    Sparkline,
    Headline,
    Button,
    Glow,
}

/// Where an element is in its entrance, derived from the frame on every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// `frame < delay`: progress pinned at 0.
    Pending,
    /// Spring is moving, possibly overshooting.
    Animating,
    /// Spring has come to rest within tolerance of 1.
    Settled,
}

/// Computed visual state of one element for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementStyle {
    pub opacity: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
    /// Z rotation in degrees.
    pub rotate: f64,
    /// Perspective tilt around the X axis in degrees.
    pub rotate_x: f64,
}

impl Default for ElementStyle {
    fn default() -> Self {
        ElementStyle {
            opacity: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
            scale: 1.0,
            rotate: 0.0,
            rotate_x: 0.0,
        }
    }
}

impl ElementStyle {
    pub fn is_finite(&self) -> bool {
        [
            self.opacity,
            self.translate_x,
            self.translate_y,
            self.scale,
            self.rotate,
            self.rotate_x,
        ]
        .iter()
        .all(|v| v.is_finite())
    }

    /// CSS `transform` value for the rendering boundary. Identity parts are omitted.
    pub fn transform_css(&self) -> String {
        let mut out = String::new();
        if self.translate_x != 0.0 || self.translate_y != 0.0 {
            let _ = write!(
                out,
                "translate({}px, {}px) ",
                self.translate_x, self.translate_y
            );
        }
        if self.scale != 1.0 {
            let _ = write!(out, "scale({}) ", self.scale);
        }
        if self.rotate != 0.0 {
            let _ = write!(out, "rotate({}deg) ", self.rotate);
        }
        if self.rotate_x != 0.0 {
            let _ = write!(out, "rotateX({}deg) ", self.rotate_x);
        }

        let trimmed = out.trim_end();
        if trimmed.is_empty() {
            "none".to_string()
        } else {
            trimmed.to_string()
        }
    }
}

/// One element of a style tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyledElement {
    pub role: ElementRole,
    /// Position among siblings of the same role, for staggered lists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub phase: Phase,
    pub style: ElementStyle,
    /// Scalar payload, e.g. a counter's displayed number or a sparkline's reveal fraction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

/// When an external asset or audio collaborator should fire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    pub asset: String,
    pub start_frame: u32,
    pub duration_frames: u32,
    pub volume: f64,
}

impl Cue {
    pub fn is_active(&self, frame: FrameIndex) -> bool {
        let f = frame.as_u32();
        f >= self.start_frame && f < self.start_frame.saturating_add(self.duration_frames)
    }
}

/// Everything the renderer needs for one frame of one scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleTree {
    pub scene: String,
    pub frame: FrameIndex,
    pub elements: Vec<StyledElement>,
    pub cues: Vec<Cue>,
}

impl StyleTree {
    pub fn new(scene: impl Into<String>, frame: FrameIndex) -> Self {
        StyleTree {
            scene: scene.into(),
            frame,
            elements: Vec::new(),
            cues: Vec::new(),
        }
    }

    /// First element with the given role and index.
    pub fn find(&self, role: ElementRole, index: Option<usize>) -> Option<&StyledElement> {
        self.elements
            .iter()
            .find(|e| e.role == role && e.index == index)
    }

    /// All elements with the given role, in sibling order.
    pub fn with_role(&self, role: ElementRole) -> impl Iterator<Item = &StyledElement> {
        self.elements.iter().filter(move |e| e.role == role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_frame_goes_negative_before_delay() {
        let frame = FrameIndex::new(5);
        assert_eq!(frame.local(9), -4);
        assert_eq!(frame.local(5), 0);
        assert_eq!(frame.local(0), 5);
    }

    #[test]
    fn zero_fps_rejected() {
        assert!(Fps::new(0).is_err());
        assert_eq!(Fps::new(30).map(|f| f.as_u32()), Ok(30));
    }

    #[test]
    fn fps_deserialization_validates() {
        let ok: std::result::Result<Fps, _> = serde_json::from_str("60");
        assert_eq!(ok.map(|f| f.as_u32()).ok(), Some(60));
        let bad: std::result::Result<Fps, _> = serde_json::from_str("0");
        assert!(bad.is_err());
    }

    #[test]
    fn engine_config_defaults() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.fps.as_u32(), 30);
        assert_eq!(config.scenes.len(), 3);
        assert_eq!(config.timing, TimingConfig::default());
    }

    #[test]
    fn identity_transform_is_none() {
        assert_eq!(ElementStyle::default().transform_css(), "none");
    }

    #[test]
    fn transform_css_lists_non_identity_parts() {
        let style = ElementStyle {
            translate_y: 20.0,
            scale: 0.5,
            rotate_x: 10.0,
            ..Default::default()
        };
        assert_eq!(
            style.transform_css(),
            "translate(0px, 20px) scale(0.5) rotateX(10deg)"
        );
    }

    #[test]
    fn cue_activity_window() {
        let cue = Cue {
            asset: "sfx/typing.mp3".to_string(),
            start_frame: 10,
            duration_frames: 5,
            volume: 1.0,
        };
        assert!(!cue.is_active(FrameIndex::new(9)));
        assert!(cue.is_active(FrameIndex::new(10)));
        assert!(cue.is_active(FrameIndex::new(14)));
        assert!(!cue.is_active(FrameIndex::new(15)));
    }

    #[test]
    fn role_serializes_snake_case() {
        let json = serde_json::to_string(&ElementRole::ListItem).unwrap();
        assert_eq!(json, "\"list_item\"");
    }
}
