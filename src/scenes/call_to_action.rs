// Call to action: headline drops in, the button springs up, a glow pulses behind it.

use std::f64::consts::TAU;

use crate::composer::{fade_in, travel, Entrance, FrameContext, Scene};
use crate::error::Result;
use crate::interpolate::{InterpolateOptions, Interpolation};
use crate::timing::{NamedDelay, SpringPreset, TimingRegistry};
use crate::types::{Cue, ElementRole, ElementStyle, Fps, Phase, StyleTree, StyledElement};

const DURATION_SECONDS: f64 = 4.0;
const PULSE_PERIOD_SECONDS: f64 = 2.0;
const CLICK_SECONDS: f64 = 0.3;

#[derive(Debug, Clone)]
pub struct CallToAction {
    fps: Fps,
    duration: u32,
    pulse_period: u32,
    headline: Entrance,
    button: Entrance,
    fade: Interpolation,
    headline_rise: Interpolation,
    button_grow: Interpolation,
    glow_scale: Interpolation,
    glow_opacity: Interpolation,
    click_cue: Cue,
}

impl CallToAction {
    pub fn new(registry: &TimingRegistry) -> Result<Self> {
        let header = registry.delay_frames(NamedDelay::Header);
        let content = registry.delay_frames(NamedDelay::ContentBase);

        Ok(CallToAction {
            fps: registry.fps(),
            duration: registry.seconds_to_frames(DURATION_SECONDS),
            pulse_period: registry.seconds_to_frames(PULSE_PERIOD_SECONDS).max(1),
            headline: Entrance::new(registry, header, SpringPreset::Snappy),
            button: Entrance::new(registry, content, SpringPreset::Button),
            fade: fade_in()?,
            headline_rise: travel(30.0, 0.0)?,
            button_grow: travel(0.9, 1.0)?,
            // Driven by a sine in [-1, 1]; left unclamped.
            glow_scale: Interpolation::new(
                &[-1.0, 1.0],
                &[1.0, 1.15],
                InterpolateOptions::default(),
            )?,
            glow_opacity: Interpolation::new(
                &[-1.0, 1.0],
                &[0.3, 0.7],
                InterpolateOptions::default(),
            )?,
            click_cue: Cue {
                asset: "sfx/click.mp3".to_string(),
                start_frame: content,
                duration_frames: registry.seconds_to_frames(CLICK_SECONDS),
                volume: 0.7,
            },
        })
    }

    fn pulse(&self, ctx: &FrameContext) -> f64 {
        let cycle = f64::from(ctx.frame.as_u32() % self.pulse_period) / f64::from(self.pulse_period);
        (cycle * TAU).sin()
    }
}

impl Scene for CallToAction {
    fn name(&self) -> &'static str {
        "call_to_action"
    }

    fn fps(&self) -> Fps {
        self.fps
    }

    fn duration_in_frames(&self) -> u32 {
        self.duration
    }

    fn compose(&self, ctx: &FrameContext) -> StyleTree {
        let mut tree = StyleTree::new(self.name(), ctx.frame);

        tree.elements.push(
            self.headline
                .element(ctx, ElementRole::Headline, None, |p| ElementStyle {
                    opacity: self.fade.map(p),
                    translate_y: self.headline_rise.map(p),
                    ..Default::default()
                }),
        );

        let button = self
            .button
            .element(ctx, ElementRole::Button, None, |p| ElementStyle {
                opacity: self.fade.map(p),
                scale: self.button_grow.map(p),
                ..Default::default()
            });

        // The glow never settles: it cycles for as long as the button is on screen.
        let pulse = self.pulse(ctx);
        let glow = StyledElement {
            role: ElementRole::Glow,
            index: None,
            phase: match button.phase {
                Phase::Pending => Phase::Pending,
                _ => Phase::Animating,
            },
            style: ElementStyle {
                opacity: button.style.opacity * self.glow_opacity.map(pulse),
                scale: self.glow_scale.map(pulse),
                ..Default::default()
            },
            value: None,
        };

        tree.elements.push(glow);
        tree.elements.push(button);
        tree.cues.push(self.click_cue.clone());
        tree
    }
}
