// motion_core: deterministic, frame-indexed animation timeline engine.
// Every style value is a pure function of (frame, fps); the JS host only draws.

mod composer;
mod easing;
mod error;
mod interpolate;
mod scenes;
mod spring;
mod stagger;
mod timeline;
mod timing;
mod types;

use wasm_bindgen::prelude::*;

pub use composer::{fade_in, phase_in_window, travel, Entrance, FrameContext, Scene};
pub use easing::Easing;
pub use error::TimelineError;
pub use interpolate::{interpolate, Extrapolate, InterpolateOptions, Interpolation};
pub use scenes::{build_scene, CallToAction, Dashboard, DashboardLayout, TitleCard, SCENE_NAMES};
pub use spring::{measure_spring, spring_progress, Spring, SpringConfig, SETTLE_THRESHOLD};
pub use stagger::{delay_for, Stagger};
pub use timeline::{FrameRange, Timeline};
pub use timing::{
    seconds_to_frames, DelaySeconds, NamedDelay, SpringPreset, SpringPresets, StaggerIncrements,
    StaggerKind, TimingConfig, TimingRegistry,
};
pub use types::*;

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Main engine interface exposed to JavaScript.
/// One call per frame; the host may fan frames out to as many workers as it likes.
#[wasm_bindgen]
pub struct Engine {
    timeline: Timeline,
}

#[wasm_bindgen]
impl Engine {
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<Engine, JsValue> {
        let config: EngineConfig = serde_json::from_str(config_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?;

        Engine::from_config(config).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Style tree for a global frame, as JSON.
    pub fn compose_frame(&self, frame: u32) -> Result<String, JsValue> {
        let tree = self.timeline.compose(FrameIndex::new(frame));

        serde_json::to_string(&tree)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Style trees for frames `start..end`, as a JSON array.
    /// Batch interface to minimize JS↔WASM crossings.
    pub fn compose_range(&self, start: u32, end: u32) -> Result<String, JsValue> {
        let range = FrameRange::new(FrameIndex::new(start), FrameIndex::new(end));
        let trees = self.timeline.compose_range(range);

        serde_json::to_string(&trees)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Every asset/audio cue on the global frame axis, as JSON.
    pub fn cues(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.timeline.cues())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    pub fn duration_in_frames(&self) -> u32 {
        self.timeline.duration_in_frames()
    }

    pub fn fps(&self) -> u32 {
        self.timeline.registry().fps().as_u32()
    }

    pub fn seconds_to_frames(&self, seconds: f64) -> u32 {
        self.timeline.registry().seconds_to_frames(seconds)
    }
}

impl Engine {
    /// Build the engine from an already-parsed config. Fails fast on any invalid preset,
    /// delay or scene name.
    pub fn from_config(config: EngineConfig) -> error::Result<Engine> {
        let registry = TimingRegistry::new(config.timing, config.fps)?;
        let timeline = Timeline::from_names(registry, &config.scenes)?;
        Ok(Engine { timeline })
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }
}
