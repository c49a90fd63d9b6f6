//! Fruit tiers and the fruit entity
//!
//! The order of `FRUIT_TYPES` is the merge chain: two fruits of tier `n`
//! merge into one fruit of tier `n + 1`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::rgb;

/// Static description of one fruit tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FruitType {
    /// Emoji shown in the HUD
    pub glyph: &'static str,
    /// Collision radius in board pixels
    pub radius: f32,
    /// Points awarded when this tier is created by a merge
    pub points: u64,
    pub name: &'static str,
    pub color: [f32; 4],
}

/// All fruit tiers, smallest first
pub const FRUIT_TYPES: [FruitType; 10] = [
    FruitType { glyph: "🍒", radius: 18.0, points: 1, name: "Cherry", color: rgb(0xFF0000) },
    FruitType { glyph: "🍓", radius: 22.0, points: 3, name: "Strawberry", color: rgb(0xFF4040) },
    FruitType { glyph: "🍇", radius: 26.0, points: 6, name: "Grape", color: rgb(0x800080) },
    FruitType { glyph: "🍊", radius: 30.0, points: 10, name: "Orange", color: rgb(0xFFA500) },
    FruitType { glyph: "🍎", radius: 34.0, points: 15, name: "Apple", color: rgb(0xFF3030) },
    FruitType { glyph: "🍐", radius: 38.0, points: 21, name: "Pear", color: rgb(0xC5E17A) },
    FruitType { glyph: "🍑", radius: 42.0, points: 28, name: "Peach", color: rgb(0xFF9999) },
    FruitType { glyph: "🍍", radius: 46.0, points: 36, name: "Pineapple", color: rgb(0xFFC107) },
    FruitType { glyph: "🍈", radius: 50.0, points: 45, name: "Melon", color: rgb(0x90EE90) },
    FruitType { glyph: "🍉", radius: 54.0, points: 55, name: "Watermelon", color: rgb(0xFF5E62) },
];

/// Reaching this tier wins the round
pub const TERMINAL_TIER: usize = FRUIT_TYPES.len() - 1;

/// Look up a tier's static data
#[inline]
pub fn fruit_type(tier: usize) -> &'static FruitType {
    &FRUIT_TYPES[tier]
}

/// A fruit on the board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fruit {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Index into `FRUIT_TYPES`
    pub tier: usize,
    pub radius: f32,
    /// Visual rotation (radians)
    pub rotation: f32,
    pub angular_vel: f32,
    /// Frames since spawn
    pub age: u32,
    /// Consumed by a merge this frame; purged before the next one
    pub merged: bool,
}

impl Fruit {
    pub fn new(tier: usize, pos: Vec2) -> Self {
        debug_assert!(tier < FRUIT_TYPES.len(), "tier {tier} out of range");
        Self {
            pos,
            vel: Vec2::ZERO,
            tier,
            radius: fruit_type(tier).radius,
            rotation: 0.0,
            angular_vel: 0.0,
            age: 0,
            merged: false,
        }
    }

    pub fn kind(&self) -> &'static FruitType {
        fruit_type(self.tier)
    }

    /// Topmost y coordinate of the fruit
    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.radius
    }

    /// Both velocity components are below the settle threshold
    pub fn is_settled(&self) -> bool {
        self.vel.x.abs() < SETTLE_EPSILON && self.vel.y.abs() < SETTLE_EPSILON
    }

    /// Whether a merge from this tier can still happen
    #[inline]
    pub fn is_mergeable_tier(&self) -> bool {
        self.tier < TERMINAL_TIER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_grow() {
        for pair in FRUIT_TYPES.windows(2) {
            assert!(pair[1].radius > pair[0].radius);
            assert!(pair[1].points > pair[0].points);
        }
        assert_eq!(FRUIT_TYPES[TERMINAL_TIER].name, "Watermelon");
    }

    #[test]
    fn test_new_fruit_uses_tier_radius() {
        let fruit = Fruit::new(3, Vec2::new(100.0, 100.0));
        assert_eq!(fruit.radius, 30.0);
        assert_eq!(fruit.kind().name, "Orange");
        assert_eq!(fruit.top(), 70.0);
        assert!(fruit.is_settled());
        assert!(!fruit.merged);
    }

    #[test]
    fn test_settled_threshold() {
        let mut fruit = Fruit::new(0, Vec2::ZERO);
        fruit.vel = Vec2::new(0.09, -0.09);
        assert!(fruit.is_settled());
        fruit.vel.y = 0.1;
        assert!(!fruit.is_settled());
    }

    #[test]
    fn test_terminal_tier_not_mergeable() {
        assert!(Fruit::new(TERMINAL_TIER - 1, Vec2::ZERO).is_mergeable_tier());
        assert!(!Fruit::new(TERMINAL_TIER, Vec2::ZERO).is_mergeable_tier());
    }
}
