// Title card: headline slides up with a perspective tilt, subtitle follows, background zooms.

use crate::composer::{fade_in, phase_in_window, travel, Entrance, FrameContext, Scene};
use crate::error::Result;
use crate::interpolate::{InterpolateOptions, Interpolation};
use crate::timing::{NamedDelay, SpringPreset, TimingRegistry};
use crate::types::{Cue, ElementRole, ElementStyle, Fps, StyleTree, StyledElement};

const DURATION_SECONDS: f64 = 3.0;
const TYPING_SECONDS: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct TitleCard {
    fps: Fps,
    duration: u32,
    title: Entrance,
    tilt: Entrance,
    subtitle: Entrance,
    fade: Interpolation,
    title_rise: Interpolation,
    tilt_angle: Interpolation,
    subtitle_rise: Interpolation,
    zoom: Interpolation,
    typing_cue: Cue,
}

impl TitleCard {
    pub fn new(registry: &TimingRegistry) -> Result<Self> {
        let duration = registry.seconds_to_frames(DURATION_SECONDS);
        let header = registry.delay_frames(NamedDelay::Header);
        let content = registry.delay_frames(NamedDelay::ContentBase);

        Ok(TitleCard {
            fps: registry.fps(),
            duration,
            title: Entrance::new(registry, header, SpringPreset::Snappy),
            tilt: Entrance::new(registry, header, SpringPreset::Perspective),
            subtitle: Entrance::new(registry, content, SpringPreset::Smooth),
            fade: fade_in()?,
            title_rise: travel(40.0, 0.0)?,
            tilt_angle: travel(20.0, 0.0)?,
            subtitle_rise: travel(20.0, 0.0)?,
            zoom: Interpolation::new(
                &[0.0, f64::from(duration.max(1))],
                &[1.0, 1.05],
                InterpolateOptions::default().clamp_right(),
            )?,
            typing_cue: Cue {
                asset: "sfx/typing.mp3".to_string(),
                start_frame: header,
                duration_frames: registry.seconds_to_frames(TYPING_SECONDS),
                volume: 0.6,
            },
        })
    }
}

impl Scene for TitleCard {
    fn name(&self) -> &'static str {
        "title_card"
    }

    fn fps(&self) -> Fps {
        self.fps
    }

    fn duration_in_frames(&self) -> u32 {
        self.duration
    }

    fn compose(&self, ctx: &FrameContext) -> StyleTree {
        let mut tree = StyleTree::new(self.name(), ctx.frame);

        tree.elements.push(StyledElement {
            role: ElementRole::Background,
            index: None,
            phase: phase_in_window(ctx.frame, 0, self.duration),
            style: ElementStyle {
                scale: self.zoom.map(f64::from(ctx.frame.as_u32())),
                ..Default::default()
            },
            value: None,
        });

        let tilt = self.tilt.progress(ctx);
        let mut title = self.title.element(ctx, ElementRole::Title, None, |p| ElementStyle {
            opacity: self.fade.map(p),
            translate_y: self.title_rise.map(p),
            rotate_x: self.tilt_angle.map(tilt),
            ..Default::default()
        });
        // The tilt runs on its own spring; the title rests once both have.
        title.phase = phase_in_window(
            ctx.frame,
            self.title.delay().min(self.tilt.delay()),
            self.title.settled_at().max(self.tilt.settled_at()),
        );
        tree.elements.push(title);

        tree.elements.push(
            self.subtitle
                .element(ctx, ElementRole::Subtitle, None, |p| ElementStyle {
                    opacity: self.fade.map(p),
                    translate_y: self.subtitle_rise.map(p),
                    ..Default::default()
                }),
        );

        tree.cues.push(self.typing_cue.clone());
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spring::SETTLE_THRESHOLD;
    use crate::types::{FrameIndex, Phase};

    fn scene() -> TitleCard {
        TitleCard::new(&TimingRegistry::standard(Fps::new(30).unwrap()).unwrap()).unwrap()
    }

    fn compose(frame: u32) -> StyleTree {
        scene().compose(&FrameContext::new(
            FrameIndex::new(frame),
            Fps::new(30).unwrap(),
        ))
    }

    #[test]
    fn title_hidden_until_header_delay() {
        let tree = compose(9);
        let title = tree.find(ElementRole::Title, None).unwrap();
        assert_eq!(title.style.opacity, 0.0);
        assert_eq!(title.style.translate_y, 40.0);
        assert_eq!(title.style.rotate_x, 20.0);
        assert_eq!(title.phase, Phase::Animating);

        let early = compose(3);
        assert_eq!(
            early.find(ElementRole::Title, None).unwrap().phase,
            Phase::Pending
        );
    }

    #[test]
    fn title_in_place_after_settling() {
        let tree = compose(80);
        let title = tree.find(ElementRole::Title, None).unwrap();
        assert!(title.style.opacity > 0.99);
        assert!(title.style.translate_y.abs() < 0.5);
        assert!(title.style.rotate_x.abs() < 0.5);
    }

    #[test]
    fn title_settles_only_after_its_tilt() {
        let scene = scene();
        let tilt_rest = scene.tilt.settled_at();
        assert!(tilt_rest > scene.title.settled_at());

        let before = compose(tilt_rest - 1);
        assert_eq!(
            before.find(ElementRole::Title, None).unwrap().phase,
            Phase::Animating
        );
        for frame in 0..scene.duration_in_frames() {
            let tree = compose(frame);
            let title = tree.find(ElementRole::Title, None).unwrap();
            if title.phase == Phase::Settled {
                assert!(title.style.rotate_x.abs() <= 20.0 * SETTLE_THRESHOLD + 1e-9);
                assert!(title.style.translate_y.abs() <= 40.0 * SETTLE_THRESHOLD + 1e-9);
            }
        }
    }

    #[test]
    fn subtitle_waits_for_content() {
        let tree = compose(29);
        let subtitle = tree.find(ElementRole::Subtitle, None).unwrap();
        assert_eq!(subtitle.style.opacity, 0.0);
        assert_eq!(subtitle.phase, Phase::Pending);
    }

    #[test]
    fn background_zoom_clamps_at_end() {
        let start = compose(0);
        let end = compose(500);
        assert_eq!(start.find(ElementRole::Background, None).unwrap().style.scale, 1.0);
        assert_eq!(end.find(ElementRole::Background, None).unwrap().style.scale, 1.05);
    }

    #[test]
    fn typing_cue_starts_with_title() {
        let tree = compose(0);
        assert_eq!(tree.cues.len(), 1);
        assert_eq!(tree.cues[0].start_frame, 9);
        assert_eq!(tree.cues[0].duration_frames, 30);
    }
}
