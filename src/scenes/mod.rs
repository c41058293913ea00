// Concrete scenes built on the composer.

mod call_to_action;
mod dashboard;
mod title_card;

pub use call_to_action::CallToAction;
pub use dashboard::{Dashboard, DashboardLayout};
pub use title_card::TitleCard;

use crate::composer::Scene;
use crate::error::{Result, TimelineError};
use crate::timing::TimingRegistry;

/// Names accepted by [`build_scene`].
pub const SCENE_NAMES: [&str; 3] = ["title_card", "dashboard", "call_to_action"];

/// Build a scene by name against a timing registry.
pub fn build_scene(name: &str, registry: &TimingRegistry) -> Result<Box<dyn Scene>> {
    let scene: Box<dyn Scene> = match name {
        "title_card" => Box::new(TitleCard::new(registry)?),
        "dashboard" => Box::new(Dashboard::new(registry)?),
        "call_to_action" => Box::new(CallToAction::new(registry)?),
        other => return Err(TimelineError::UnknownScene(other.to_string())),
    };
    Ok(scene)
}
