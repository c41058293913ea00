// Timeline: scenes played back to back on one global frame axis.
// Maps a global frame to the owning scene and its local frame, and shifts each
// scene's cues onto the global axis.

use serde::{Deserialize, Serialize};

use crate::composer::{FrameContext, Scene};
use crate::error::{Result, TimelineError};
use crate::scenes::build_scene;
use crate::timing::TimingRegistry;
use crate::types::{Cue, FrameIndex, StyleTree};

/// A half-open range of frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRange {
    pub start: FrameIndex,
    pub end: FrameIndex,
}

impl FrameRange {
    pub fn new(start: FrameIndex, end: FrameIndex) -> Self {
        FrameRange { start, end }
    }

    /// Length of this range in frames.
    pub fn duration(&self) -> u32 {
        self.end.as_u32().saturating_sub(self.start.as_u32())
    }

    /// Inclusive start, exclusive end.
    pub fn contains(&self, frame: FrameIndex) -> bool {
        frame >= self.start && frame < self.end
    }

    pub fn frames(&self) -> impl Iterator<Item = FrameIndex> {
        (self.start.as_u32()..self.end.as_u32()).map(FrameIndex::new)
    }
}

/// Scenes in playback order, each owning a contiguous slice of the global frame axis.
#[derive(Debug)]
pub struct Timeline {
    registry: TimingRegistry,
    scenes: Vec<Box<dyn Scene>>,
    ranges: Vec<FrameRange>,
}

impl Timeline {
    pub fn new(registry: TimingRegistry, scenes: Vec<Box<dyn Scene>>) -> Result<Self> {
        if scenes.is_empty() {
            return Err(TimelineError::InvalidConfig(
                "timeline needs at least one scene".to_string(),
            ));
        }

        let fps = registry.fps();
        if let Some(scene) = scenes.iter().find(|scene| scene.fps() != fps) {
            return Err(TimelineError::InvalidConfig(format!(
                "scene {} was built at {} fps but the timeline runs at {} fps",
                scene.name(),
                scene.fps().as_u32(),
                fps.as_u32()
            )));
        }

        let mut ranges = Vec::with_capacity(scenes.len());
        let mut cursor = 0u32;
        for scene in &scenes {
            let end = cursor.checked_add(scene.duration_in_frames()).ok_or_else(|| {
                TimelineError::InvalidConfig("timeline is longer than u32::MAX frames".to_string())
            })?;
            ranges.push(FrameRange::new(FrameIndex::new(cursor), FrameIndex::new(end)));
            cursor = end;
        }

        tracing::debug!(
            scenes = scenes.len(),
            duration_in_frames = cursor,
            fps = fps.as_u32(),
            "timeline assembled"
        );

        Ok(Timeline {
            registry,
            scenes,
            ranges,
        })
    }

    /// Build each named scene against `registry`, in order.
    pub fn from_names<S: AsRef<str>>(registry: TimingRegistry, names: &[S]) -> Result<Self> {
        let scenes = names
            .iter()
            .map(|name| build_scene(name.as_ref(), &registry))
            .collect::<Result<Vec<_>>>()?;
        Self::new(registry, scenes)
    }

    pub fn registry(&self) -> &TimingRegistry {
        &self.registry
    }

    pub fn scenes(&self) -> &[Box<dyn Scene>] {
        &self.scenes
    }

    /// Frame range each scene occupies, in scene order.
    pub fn ranges(&self) -> &[FrameRange] {
        &self.ranges
    }

    pub fn duration_in_frames(&self) -> u32 {
        self.ranges.last().map_or(0, |r| r.end.as_u32())
    }

    /// Owning scene index and local frame for a global frame.
    pub fn locate(&self, frame: FrameIndex) -> Option<(usize, FrameIndex)> {
        self.ranges
            .iter()
            .position(|range| range.contains(frame))
            .map(|i| {
                let local = frame.as_u32() - self.ranges[i].start.as_u32();
                (i, FrameIndex::new(local))
            })
    }

    /// Compose a global frame. Frames past the end hold the last scene's final frame.
    pub fn compose(&self, frame: FrameIndex) -> StyleTree {
        let (index, local) = match self.locate(frame) {
            Some(found) => found,
            None => {
                let last = self.scenes.len() - 1;
                let hold = self.ranges[last].duration().saturating_sub(1);
                tracing::warn!(
                    frame = frame.as_u32(),
                    duration_in_frames = self.duration_in_frames(),
                    "frame past end of timeline, holding last frame"
                );
                (last, FrameIndex::new(hold))
            }
        };

        let ctx = FrameContext::new(local, self.registry.fps());
        let mut tree = self.scenes[index].compose(&ctx);
        tree.frame = frame;
        let offset = self.ranges[index].start.as_u32();
        for cue in &mut tree.cues {
            cue.start_frame = cue.start_frame.saturating_add(offset);
        }
        tree
    }

    /// Compose every frame of `range`, in order.
    pub fn compose_range(&self, range: FrameRange) -> Vec<StyleTree> {
        range.frames().map(|frame| self.compose(frame)).collect()
    }

    /// Every cue on the global frame axis, sorted by start frame.
    pub fn cues(&self) -> Vec<Cue> {
        let mut cues: Vec<Cue> = self
            .ranges
            .iter()
            .filter(|range| range.duration() > 0)
            .flat_map(|range| self.compose(range.start).cues)
            .collect();
        cues.sort_by_key(|c| c.start_frame);
        cues
    }
}
