//! Frame-stepped simulation module
//!
//! All gameplay logic lives here:
//! - One `tick` per simulation frame, per-frame units throughout
//! - Seeded RNG only
//! - Stable iteration order (by index in the entity store)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod fruit;
pub mod merge;
pub mod physics;
pub mod state;
pub mod tick;

pub use clock::FrameClock;
pub use collision::{resolve_collisions, resolve_contact};
pub use fruit::{FRUIT_TYPES, Fruit, FruitType, TERMINAL_TIER, fruit_type};
pub use merge::{can_merge, check_merges, has_line_of_sight, has_possible_merges};
pub use physics::integrate;
pub use state::{GameEvent, GamePhase, GameState, Particle};
pub use tick::{TickInput, check_termination, stack_over_line, tick};
