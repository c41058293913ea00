// Stagger sequencing: sibling start frames offset by a fixed increment.

use serde::{Deserialize, Serialize};

/// Start frame of the item at `index`. Saturates instead of overflowing.
pub fn delay_for(index: usize, base: u32, increment: u32) -> u32 {
    let index = u32::try_from(index).unwrap_or(u32::MAX);
    base.saturating_add(index.saturating_mul(increment))
}

/// A wave-like entrance: item `i` starts at `base + i * increment`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stagger {
    pub base: u32,
    pub increment: u32,
}

impl Stagger {
    pub fn new(base: u32, increment: u32) -> Self {
        Stagger { base, increment }
    }

    pub fn delay(&self, index: usize) -> u32 {
        delay_for(index, self.base, self.increment)
    }

    pub fn delays(&self, count: usize) -> impl Iterator<Item = u32> + '_ {
        (0..count).map(move |i| self.delay(i))
    }

    /// Start frame of the item after the last of `count` items.
    pub fn end(&self, count: usize) -> u32 {
        self.delay(count)
    }
}
