// Scene composition: frame + fps in, style tree out.
// Entrances are resolved against the timing registry once, when a scene is built;
// composing a frame afterwards is pure arithmetic.

use std::fmt;

use crate::error::Result;
use crate::interpolate::{InterpolateOptions, Interpolation};
use crate::spring::{spring_progress, SpringConfig};
use crate::timing::{SpringPreset, TimingRegistry};
use crate::types::{ElementRole, ElementStyle, Fps, FrameIndex, Phase, StyleTree, StyledElement};

/// The clock reading a scene is composed for.
/// `fps` is the clock's rate; entrances count frames at the rate their scene was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameContext {
    pub frame: FrameIndex,
    pub fps: Fps,
}

impl FrameContext {
    pub fn new(frame: FrameIndex, fps: Fps) -> Self {
        FrameContext { frame, fps }
    }
}

/// One element's entrance: when it starts and which spring drives it.
/// Delay, settle window and spring time share the registry's frame rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entrance {
    delay: u32,
    preset: SpringPreset,
    spring: SpringConfig,
    settle_frames: u32,
    fps: Fps,
}

impl Entrance {
    pub fn new(registry: &TimingRegistry, delay: u32, preset: SpringPreset) -> Self {
        Entrance {
            delay,
            preset,
            spring: *registry.spring(preset),
            settle_frames: registry.settle_frames(preset),
            fps: registry.fps(),
        }
    }

    pub fn delay(&self) -> u32 {
        self.delay
    }

    pub fn preset(&self) -> SpringPreset {
        self.preset
    }

    /// First frame at which the entrance counts as settled.
    pub fn settled_at(&self) -> u32 {
        self.delay.saturating_add(self.settle_frames)
    }

    pub fn local_frame(&self, frame: FrameIndex) -> i64 {
        frame.local(self.delay)
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Spring progress; exactly 0 up to and including the delay frame.
    /// Evaluated at the entrance's own rate so it agrees with `phase`.
    pub fn progress(&self, ctx: &FrameContext) -> f64 {
        spring_progress(self.local_frame(ctx.frame), self.fps, &self.spring)
    }

    /// `frame == delay` is the first animating frame (local frame 0, progress 0).
    pub fn phase(&self, frame: FrameIndex) -> Phase {
        phase_in_window(frame, self.delay, self.settled_at())
    }

    /// Build the element for this frame from its progress.
    pub fn element<F>(
        &self,
        ctx: &FrameContext,
        role: ElementRole,
        index: Option<usize>,
        style: F,
    ) -> StyledElement
    where
        F: FnOnce(f64) -> ElementStyle,
    {
        let progress = self.progress(ctx);
        StyledElement {
            role,
            index,
            phase: self.phase(ctx.frame),
            style: style(progress),
            value: None,
        }
    }
}

/// Phase of anything animating over `[start, end)`.
pub fn phase_in_window(frame: FrameIndex, start: u32, end: u32) -> Phase {
    let f = frame.as_u32();
    if f < start {
        Phase::Pending
    } else if f < end {
        Phase::Animating
    } else {
        Phase::Settled
    }
}

/// Progress → opacity in [0, 1], clamped on both sides.
pub fn fade_in() -> Result<Interpolation> {
    Interpolation::new(&[0.0, 1.0], &[0.0, 1.0], InterpolateOptions::clamp())
}

/// Progress → a value moving from `from` to `to`. Unclamped so spring overshoot shows.
pub fn travel(from: f64, to: f64) -> Result<Interpolation> {
    Interpolation::new(&[0.0, 1.0], &[from, to], InterpolateOptions::default())
}

/// A self-contained, independently timed composition unit.
pub trait Scene: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Frame rate the scene's entrances were resolved at.
    fn fps(&self) -> Fps;

    fn duration_in_frames(&self) -> u32;

    /// Compose the style tree for a frame local to this scene.
    /// Must be a pure function of `ctx`.
    fn compose(&self, ctx: &FrameContext) -> StyleTree;
}
