//! Game state and core simulation types
//!
//! `GameState` owns every entity; each pipeline stage borrows it exclusively
//! for the duration of one frame.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::fruit::{Fruit, FruitType, fruit_type};
use crate::clamp_to_board;
use crate::consts::*;

/// Current phase of a session
///
/// The only transition is `Running -> Ended`; a restart builds a fresh
/// running board instead of reviving an ended one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Accepting drops
    Running,
    /// Stack crossed the line; simulation keeps settling but drops are rejected
    Ended,
}

impl GamePhase {
    pub fn accepts_drops(self) -> bool {
        match self {
            GamePhase::Running => true,
            GamePhase::Ended => false,
        }
    }
}

/// Things that happened during a frame, drained by the host for sound and HUD
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A fruit of this tier was dropped
    Dropped { tier: usize },
    /// Two fruits merged into one of `tier`
    Merged { tier: usize, points: u64, pos: Vec2 },
    /// Terminal tier reached; `score` is the round score before the reset
    Won { score: u64 },
    /// Settled stack crossed the line
    GameOver { score: u64 },
}

/// A visual particle: merge debris or a floating score label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub color: [f32; 4],
    /// Total lifetime in frames
    pub lifetime: u32,
    /// Frames left before the particle is gone
    pub remaining: u32,
    /// Score text; labels float up instead of falling
    pub label: Option<String>,
}

impl Particle {
    /// A splash droplet
    pub fn debris(pos: Vec2, vel: Vec2, size: f32, color: [f32; 4]) -> Self {
        Self {
            pos,
            vel,
            size,
            color,
            lifetime: SPLASH_LIFETIME,
            remaining: SPLASH_LIFETIME,
            label: None,
        }
    }

    /// A floating `+N` score label
    pub fn score_label(pos: Vec2, points: u64) -> Self {
        Self {
            pos,
            vel: Vec2::new(0.0, -LABEL_RISE_SPEED),
            size: 20.0,
            color: [0.0, 0.0, 0.0, 1.0],
            lifetime: LABEL_LIFETIME,
            remaining: LABEL_LIFETIME,
            label: Some(format!("+{points}")),
        }
    }

    /// Opacity in `[0, 1]`, reaching exactly zero on the last frame
    pub fn opacity(&self) -> f32 {
        if self.lifetime == 0 {
            return 0.0;
        }
        self.remaining as f32 / self.lifetime as f32
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.remaining > 0
    }

    #[inline]
    pub fn is_label(&self) -> bool {
        self.label.is_some()
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed
    pub seed: u64,
    pub rng: Pcg32,
    /// Active fruits; order only matters as merge scan order
    pub fruits: Vec<Fruit>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub score: u64,
    pub phase: GamePhase,
    /// Tier of the fruit the next drop will produce
    pub next_tier: usize,
    /// Horizontal drop cursor
    pub drop_x: f32,
    /// Frames simulated since the session started
    pub frame: u64,
    /// Events produced since the host last drained them
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new running game with the given seed
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let next_tier = rng.random_range(0..STARTER_TIERS);
        Self {
            seed,
            rng,
            fruits: Vec::new(),
            particles: Vec::new(),
            score: 0,
            phase: GamePhase::Running,
            next_tier,
            drop_x: BOARD_WIDTH / 2.0,
            frame: 0,
            events: Vec::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// The fruit type waiting to be dropped
    pub fn next_fruit(&self) -> &'static FruitType {
        fruit_type(self.next_tier)
    }

    /// Draw a new next-drop tier from the starter range
    pub fn sample_next_tier(&mut self) -> usize {
        self.next_tier = self.rng.random_range(0..STARTER_TIERS);
        self.next_tier
    }

    /// Empty the board and start a fresh round (used by restart and win)
    pub fn reset_board(&mut self) {
        self.fruits.clear();
        self.particles.clear();
        self.score = 0;
        self.sample_next_tier();
        self.drop_x = BOARD_WIDTH / 2.0;
    }

    /// Restart the session after a game over (or at any time)
    pub fn restart(&mut self) {
        self.reset_board();
        self.phase = GamePhase::Running;
        self.events.clear();
        log::info!("Game restarted (next fruit: {})", self.next_fruit().name);
    }

    /// Move the drop cursor, keeping the next fruit inside the board
    pub fn move_cursor(&mut self, x: f32) {
        if !self.phase.accepts_drops() {
            return;
        }
        self.drop_x = clamp_to_board(x, self.next_fruit().radius);
    }

    /// Drop the next fruit at the cursor
    ///
    /// Returns false when the game has ended.
    pub fn drop_fruit(&mut self) -> bool {
        if !self.phase.accepts_drops() {
            log::debug!("Drop rejected: game over");
            return false;
        }

        let tier = self.next_tier;
        let x = clamp_to_board(self.drop_x, fruit_type(tier).radius);
        let mut fruit = Fruit::new(tier, Vec2::new(x, SPAWN_Y));
        fruit.angular_vel = self.rng.random_range(-DROP_SPIN..DROP_SPIN);
        self.fruits.push(fruit);
        self.events.push(GameEvent::Dropped { tier });
        log::debug!("Dropped {} at x={:.1}", fruit_type(tier).name, x);

        self.sample_next_tier();
        self.drop_x = clamp_to_board(self.drop_x, self.next_fruit().radius);
        true
    }

    /// Add merge points to the running score
    pub fn add_score(&mut self, points: u64) {
        self.score += points;
    }

    /// Transition `Running -> Ended`; returns true only on the transition
    pub fn end_game(&mut self) -> bool {
        match self.phase {
            GamePhase::Running => {
                self.phase = GamePhase::Ended;
                self.events.push(GameEvent::GameOver { score: self.score });
                log::info!("Game over with score {}", self.score);
                true
            }
            GamePhase::Ended => false,
        }
    }

    /// Hand the queued events to the host
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
