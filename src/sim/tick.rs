//! One simulation frame
//!
//! Input is applied first, then physics, collisions, merges and the
//! termination check run in that order against the same `GameState`.

use super::collision::resolve_collisions;
use super::merge::check_merges;
use super::physics::integrate;
use super::state::GameState;
use crate::consts::GAME_OVER_LINE;

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer/touch position on the board, if it moved
    pub cursor_x: Option<f32>,
    /// Drop the next fruit at the cursor (click/tap/space)
    pub drop: bool,
    /// Clear the board and start over
    pub restart: bool,
}

/// A settled fruit pokes above the termination line
///
/// Level-triggered: true on every frame the condition holds.
pub fn stack_over_line(state: &GameState) -> bool {
    state
        .fruits
        .iter()
        .any(|fruit| !fruit.merged && fruit.is_settled() && fruit.top() <= GAME_OVER_LINE)
}

/// Termination stage; only a running game can end
pub fn check_termination(state: &mut GameState) -> bool {
    if !state.is_running() {
        return false;
    }
    stack_over_line(state) && state.end_game()
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.restart {
        state.restart();
    }
    if let Some(x) = input.cursor_x {
        state.move_cursor(x);
    }
    if input.drop {
        state.drop_fruit();
    }

    integrate(state);
    resolve_collisions(&mut state.fruits);
    check_merges(state);
    check_termination(state);

    state.frame += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::fruit::Fruit;
    use crate::sim::state::{GameEvent, GamePhase};
    use glam::Vec2;

    #[test]
    fn test_tick_drop_and_fall() {
        let mut state = GameState::new(12345);
        let input = TickInput {
            cursor_x: Some(150.0),
            drop: true,
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.fruits.len(), 1);
        assert_eq!(state.fruits[0].pos.x, 150.0);
        assert!(state.fruits[0].pos.y > crate::consts::SPAWN_Y);
        assert_eq!(state.frame, 1);
        assert!(state.is_running());
    }

    #[test]
    fn test_fresh_drop_does_not_end_game() {
        let mut state = GameState::new(1);
        let drop = TickInput {
            drop: true,
            ..Default::default()
        };
        tick(&mut state, &drop);
        assert!(state.is_running());
    }

    #[test]
    fn test_settled_fruit_over_line_ends_game_once() {
        let mut state = GameState::new(77);
        let mut fruit = Fruit::new(0, Vec2::new(200.0, 90.0));
        fruit.age = 100;
        state.fruits.push(fruit);
        state.score = 21;

        assert!(check_termination(&mut state));
        assert_eq!(state.phase, GamePhase::Ended);
        assert!(!check_termination(&mut state));
        assert!(stack_over_line(&state));
        assert_eq!(state.take_events(), vec![GameEvent::GameOver { score: 21 }]);
    }

    #[test]
    fn test_moving_fruit_over_line_is_not_game_over() {
        let mut state = GameState::new(77);
        let mut fruit = Fruit::new(0, Vec2::new(200.0, 90.0));
        fruit.vel = Vec2::new(0.0, 3.0);
        state.fruits.push(fruit);
        assert!(!check_termination(&mut state));
        assert!(state.is_running());
    }

    #[test]
    fn test_top_touching_line_counts_as_over() {
        let mut state = GameState::new(77);
        let r = Fruit::new(0, Vec2::ZERO).radius;
        state.fruits.push(Fruit::new(0, Vec2::new(200.0, GAME_OVER_LINE + r)));
        assert_eq!(state.fruits[0].top(), GAME_OVER_LINE);
        assert!(check_termination(&mut state));

        // One pixel lower is still in play
        let mut state = GameState::new(77);
        state.fruits.push(Fruit::new(0, Vec2::new(200.0, GAME_OVER_LINE + r + 1.0)));
        assert!(!check_termination(&mut state));
    }

    #[test]
    fn test_settled_fruit_below_line_is_fine() {
        let mut state = GameState::new(77);
        state.fruits.push(Fruit::new(0, Vec2::new(200.0, 482.0)));
        assert!(!check_termination(&mut state));
    }

    #[test]
    fn test_drops_rejected_after_game_over_until_restart() {
        let mut state = GameState::new(8);
        state.end_game();
        state.take_events();

        let drop = TickInput {
            drop: true,
            ..Default::default()
        };
        tick(&mut state, &drop);
        assert!(state.fruits.is_empty());

        let restart = TickInput {
            restart: true,
            drop: true,
            ..Default::default()
        };
        tick(&mut state, &restart);
        assert!(state.is_running());
        assert_eq!(state.fruits.len(), 1);
    }

    #[test]
    fn test_merged_fruits_purged_after_tick() {
        let mut state = GameState::new(3);
        for x in [100.0, 136.0] {
            let mut fruit = Fruit::new(0, Vec2::new(x, 482.0));
            fruit.age = 50;
            state.fruits.push(fruit);
        }
        tick(&mut state, &TickInput::default());
        assert!(state.fruits.iter().all(|f| !f.merged));
        assert_eq!(state.fruits.len(), 1);
        assert_eq!(state.fruits[0].tier, 1);
    }
}
