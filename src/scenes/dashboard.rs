// Dashboard mockup: header, staggered cards, list rows and quick stats, a counting
// figure, a sparkline reveal and a featured badge.

use serde::{Deserialize, Serialize};

use crate::composer::{fade_in, phase_in_window, travel, Entrance, FrameContext, Scene};
use crate::error::{Result, TimelineError};
use crate::interpolate::{InterpolateOptions, Interpolation};
use crate::stagger::Stagger;
use crate::timing::{NamedDelay, SpringPreset, StaggerKind, TimingRegistry};
use crate::types::{Cue, ElementRole, ElementStyle, Fps, StyleTree, StyledElement};

const DURATION_SECONDS: f64 = 6.0;
const WHOOSH_SECONDS: f64 = 0.5;
const POP_SECONDS: f64 = 0.3;

/// How many of each element the dashboard shows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DashboardLayout {
    #[serde(default = "default_cards")]
    pub cards: usize,
    #[serde(default = "default_rows")]
    pub rows: usize,
    #[serde(default = "default_quick_stats")]
    pub quick_stats: usize,
    #[serde(default = "default_counter_target")]
    pub counter_target: f64,
}

fn default_cards() -> usize {
    3
}

fn default_rows() -> usize {
    4
}

fn default_quick_stats() -> usize {
    4
}

fn default_counter_target() -> f64 {
    12_480.0
}

impl Default for DashboardLayout {
    fn default() -> Self {
        DashboardLayout {
            cards: default_cards(),
            rows: default_rows(),
            quick_stats: default_quick_stats(),
            counter_target: default_counter_target(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    fps: Fps,
    duration: u32,
    header: Entrance,
    cards: Vec<Entrance>,
    rows: Vec<Entrance>,
    quick_stats: Vec<Entrance>,
    counter: Entrance,
    sparkline: Entrance,
    badge: Entrance,
    fade: Interpolation,
    header_drop: Interpolation,
    card_tilt: Interpolation,
    card_grow: Interpolation,
    row_slide: Interpolation,
    stat_pop: Interpolation,
    badge_pop: Interpolation,
    counter_value: Interpolation,
    zoom: Interpolation,
    cues: Vec<Cue>,
}

impl Dashboard {
    pub fn new(registry: &TimingRegistry) -> Result<Self> {
        Self::with_layout(registry, DashboardLayout::default())
    }

    pub fn with_layout(registry: &TimingRegistry, layout: DashboardLayout) -> Result<Self> {
        if !layout.counter_target.is_finite() {
            return Err(TimelineError::InvalidConfig(format!(
                "counter target must be finite, got {}",
                layout.counter_target
            )));
        }

        let duration = registry.seconds_to_frames(DURATION_SECONDS);
        let header = registry.delay_frames(NamedDelay::Header);
        let content = registry.delay_frames(NamedDelay::ContentBase);
        let featured = registry.delay_frames(NamedDelay::Featured);

        let staggered = |kind: StaggerKind, count: usize, preset: SpringPreset| -> Vec<Entrance> {
            Stagger::new(content, registry.stagger(kind))
                .delays(count)
                .map(|delay| Entrance::new(registry, delay, preset))
                .collect()
        };

        let cues = vec![
            Cue {
                asset: "sfx/whoosh.mp3".to_string(),
                start_frame: content,
                duration_frames: registry.seconds_to_frames(WHOOSH_SECONDS),
                volume: 0.5,
            },
            Cue {
                asset: "sfx/pop.mp3".to_string(),
                start_frame: featured,
                duration_frames: registry.seconds_to_frames(POP_SECONDS),
                volume: 0.8,
            },
        ];

        Ok(Dashboard {
            fps: registry.fps(),
            duration,
            header: Entrance::new(registry, header, SpringPreset::Snappy),
            cards: staggered(StaggerKind::Card, layout.cards, SpringPreset::Perspective),
            rows: staggered(StaggerKind::ListItem, layout.rows, SpringPreset::Row),
            quick_stats: staggered(StaggerKind::QuickStat, layout.quick_stats, SpringPreset::Snappy),
            counter: Entrance::new(
                registry,
                content.saturating_add(registry.delay_frames(NamedDelay::CounterPre)),
                SpringPreset::Smooth,
            ),
            sparkline: Entrance::new(
                registry,
                content.saturating_add(registry.delay_frames(NamedDelay::SparklinePre)),
                SpringPreset::Smooth,
            ),
            badge: Entrance::new(registry, featured, SpringPreset::Featured),
            fade: fade_in()?,
            header_drop: travel(-20.0, 0.0)?,
            card_tilt: travel(20.0, 0.0)?,
            card_grow: travel(0.95, 1.0)?,
            row_slide: travel(-30.0, 0.0)?,
            stat_pop: travel(0.8, 1.0)?,
            badge_pop: travel(0.8, 1.0)?,
            counter_value: Interpolation::new(
                &[0.0, 1.0],
                &[0.0, layout.counter_target],
                InterpolateOptions::clamp(),
            )?,
            zoom: Interpolation::new(
                &[0.0, f64::from(duration.max(1))],
                &[1.0, 1.05],
                InterpolateOptions::default().clamp_right(),
            )?,
            cues,
        })
    }

    /// Start frames of the list rows, in order.
    pub fn row_delays(&self) -> Vec<u32> {
        self.rows.iter().map(Entrance::delay).collect()
    }
}

impl Scene for Dashboard {
    fn name(&self) -> &'static str {
        "dashboard"
    }

    fn fps(&self) -> Fps {
        self.fps
    }

    fn duration_in_frames(&self) -> u32 {
        self.duration
    }

    fn compose(&self, ctx: &FrameContext) -> StyleTree {
        let mut tree = StyleTree::new(self.name(), ctx.frame);
        let elements = &mut tree.elements;

        elements.push(StyledElement {
            role: ElementRole::Background,
            index: None,
            phase: phase_in_window(ctx.frame, 0, self.duration),
            style: ElementStyle {
                scale: self.zoom.map(f64::from(ctx.frame.as_u32())),
                ..Default::default()
            },
            value: None,
        });

        elements.push(self.header.element(ctx, ElementRole::Header, None, |p| ElementStyle {
            opacity: self.fade.map(p),
            translate_y: self.header_drop.map(p),
            ..Default::default()
        }));

        for (i, card) in self.cards.iter().enumerate() {
            elements.push(card.element(ctx, ElementRole::Card, Some(i), |p| ElementStyle {
                opacity: self.fade.map(p),
                scale: self.card_grow.map(p),
                rotate_x: self.card_tilt.map(p),
                ..Default::default()
            }));
        }

        for (i, row) in self.rows.iter().enumerate() {
            elements.push(row.element(ctx, ElementRole::ListItem, Some(i), |p| ElementStyle {
                opacity: self.fade.map(p),
                translate_x: self.row_slide.map(p),
                ..Default::default()
            }));
        }

        for (i, stat) in self.quick_stats.iter().enumerate() {
            elements.push(stat.element(ctx, ElementRole::QuickStat, Some(i), |p| ElementStyle {
                opacity: self.fade.map(p),
                scale: self.stat_pop.map(p),
                ..Default::default()
            }));
        }

        let mut counter = self.counter.element(ctx, ElementRole::Counter, None, |p| ElementStyle {
            opacity: self.fade.map(p),
            ..Default::default()
        });
        counter.value = Some(self.counter_value.map(self.counter.progress(ctx)).round());
        elements.push(counter);

        let mut sparkline =
            self.sparkline
                .element(ctx, ElementRole::Sparkline, None, |p| ElementStyle {
                    opacity: self.fade.map(p),
                    ..Default::default()
                });
        sparkline.value = Some(self.fade.map(self.sparkline.progress(ctx)));
        elements.push(sparkline);

        elements.push(self.badge.element(ctx, ElementRole::Badge, None, |p| ElementStyle {
            opacity: self.fade.map(p),
            scale: self.badge_pop.map(p),
            ..Default::default()
        }));

        tree.cues.extend(self.cues.iter().cloned());
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FrameIndex, Phase};

    fn registry() -> TimingRegistry {
        TimingRegistry::standard(Fps::new(30).unwrap()).unwrap()
    }

    fn compose(scene: &Dashboard, frame: u32) -> StyleTree {
        scene.compose(&FrameContext::new(
            FrameIndex::new(frame),
            Fps::new(30).unwrap(),
        ))
    }

    #[test]
    fn rows_enter_in_a_wave() {
        let scene = Dashboard::new(&registry()).unwrap();
        assert_eq!(scene.row_delays(), vec![30, 50, 70, 90]);

        let tree = compose(&scene, 60);
        let phases: Vec<Phase> = tree
            .with_role(ElementRole::ListItem)
            .map(|e| e.phase)
            .collect();
        assert_ne!(phases[0], Phase::Pending);
        assert_eq!(phases[1], Phase::Animating);
        assert_eq!(&phases[2..], &[Phase::Pending, Phase::Pending]);
    }

    #[test]
    fn earlier_rows_are_further_along() {
        let scene = Dashboard::new(&registry()).unwrap();
        let tree = compose(&scene, 75);
        let opacities: Vec<f64> = tree
            .with_role(ElementRole::ListItem)
            .map(|e| e.style.opacity)
            .collect();
        assert!(opacities[0] > 0.99);
        assert!(opacities[1] > opacities[2]);
        assert!(opacities[2] > 0.0);
        assert_eq!(opacities[3], 0.0);
    }

    #[test]
    fn layout_controls_element_counts() {
        let layout = DashboardLayout {
            cards: 2,
            rows: 6,
            quick_stats: 0,
            ..Default::default()
        };
        let scene = Dashboard::with_layout(&registry(), layout).unwrap();
        let tree = compose(&scene, 100);
        assert_eq!(tree.with_role(ElementRole::Card).count(), 2);
        assert_eq!(tree.with_role(ElementRole::ListItem).count(), 6);
        assert_eq!(tree.with_role(ElementRole::QuickStat).count(), 0);
    }

    #[test]
    fn counter_reaches_target() {
        let scene = Dashboard::new(&registry()).unwrap();
        let before = compose(&scene, 10);
        let after = compose(&scene, 170);
        assert_eq!(before.find(ElementRole::Counter, None).unwrap().value, Some(0.0));
        assert_eq!(
            after.find(ElementRole::Counter, None).unwrap().value,
            Some(12_480.0)
        );
    }

    #[test]
    fn badge_pops_with_overshoot_allowed() {
        let scene = Dashboard::new(&registry()).unwrap();
        let pending = compose(&scene, 44);
        let badge = pending.find(ElementRole::Badge, None).unwrap();
        assert_eq!(badge.phase, Phase::Pending);
        assert_eq!(badge.style.scale, 0.8);

        let peak = (45..90)
            .map(|f| compose(&scene, f).find(ElementRole::Badge, None).unwrap().style.scale)
            .fold(f64::MIN, f64::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn non_finite_counter_target_rejected() {
        let layout = DashboardLayout {
            counter_target: f64::NAN,
            ..Default::default()
        };
        assert!(Dashboard::with_layout(&registry(), layout).is_err());
    }
}
