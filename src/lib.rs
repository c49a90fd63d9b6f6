//! Watermelon Club - a fruit dropping merge game
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (physics, collisions, merges, game state)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser/native platform abstraction
//! - `audio`: Procedural sound cues
//! - `highscores`: Best score readout
//! - `settings`: Player preferences

pub mod audio;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscores::BestScores;
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
///
/// Motion constants are expressed per simulation frame, not per second.
pub mod consts {
    /// Fixed simulation timestep (one frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Longest wall-clock frame fed to the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Board dimensions (y grows downward)
    pub const BOARD_WIDTH: f32 = 400.0;
    pub const BOARD_HEIGHT: f32 = 500.0;

    /// Settled fruit touching this line ends the game
    pub const GAME_OVER_LINE: f32 = 100.0;
    /// Where dropped fruits appear
    pub const SPAWN_Y: f32 = 40.0;
    /// Where the next-fruit preview is drawn
    pub const PREVIEW_Y: f32 = 30.0;

    /// Downward acceleration (px/frame²)
    pub const GRAVITY: f32 = 0.5;
    /// Restitution for walls, floor and fruit contacts
    pub const BOUNCE: f32 = 0.7;
    /// Multiplicative velocity damping per frame
    pub const FRICTION: f32 = 0.99;
    /// Multiplicative angular velocity damping per frame
    pub const ANGULAR_DAMPING: f32 = 0.98;
    /// How strongly horizontal motion spins a fruit
    pub const ROLL_FACTOR: f32 = 0.1;
    /// Extra spin picked up on floor contact
    pub const FLOOR_ROLL_FACTOR: f32 = 0.5;
    /// Random spin range for a freshly dropped fruit (±)
    pub const DROP_SPIN: f32 = 0.05;

    /// Fruits younger than this (in frames) never merge
    pub const MERGE_MIN_AGE: u32 = 30;
    /// Gap allowed between "touching" fruits when merging (px)
    pub const MERGE_TOLERANCE: f32 = 1.0;
    /// Upward kick given to a freshly merged fruit
    pub const MERGE_POP_SPEED: f32 = 2.0;

    /// Velocity magnitude below which a fruit counts as settled
    pub const SETTLE_EPSILON: f32 = 0.1;
    /// Drops are sampled from tiers `0..STARTER_TIERS`
    pub const STARTER_TIERS: usize = 5;

    /// Debris particles in a merge splash
    pub const SPLASH_PARTICLES: usize = 20;
    /// Debris lifetime (frames)
    pub const SPLASH_LIFETIME: u32 = 60;
    /// Score label lifetime (frames)
    pub const LABEL_LIFETIME: u32 = 90;
    /// Score label rise speed (px/frame)
    pub const LABEL_RISE_SPEED: f32 = 1.0;
    /// Debris feel this fraction of fruit gravity
    pub const PARTICLE_GRAVITY_SCALE: f32 = 0.2;
    /// Debris velocity damping per frame
    pub const PARTICLE_DAMPING: f32 = 0.98;
}

/// Clamp a horizontal position so a circle of `radius` stays on the board
#[inline]
pub fn clamp_to_board(x: f32, radius: f32) -> f32 {
    x.clamp(radius, consts::BOARD_WIDTH - radius)
}

/// Midpoint between two positions
#[inline]
pub fn midpoint(a: Vec2, b: Vec2) -> Vec2 {
    (a + b) * 0.5
}

/// Convert a packed `0xRRGGBB` colour into linear-ish RGBA floats
pub const fn rgb(hex: u32) -> [f32; 4] {
    [
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
        1.0,
    ]
}
