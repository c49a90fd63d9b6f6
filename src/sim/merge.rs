//! Merge engine
//!
//! Each frame scans every unordered pair of live fruits in index order. The
//! first eligible partner of a fruit wins; a fruit consumed by a merge is
//! skipped for the rest of the scan. Consumed fruits are compacted out and
//! the new fruits appended once the scan finishes.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::fruit::{FRUIT_TYPES, Fruit, TERMINAL_TIER, fruit_type};
use super::state::{GameEvent, GameState, Particle};
use crate::consts::*;
use crate::midpoint;

/// Same tier, below terminal, both old enough and (nearly) touching
pub fn can_merge(a: &Fruit, b: &Fruit) -> bool {
    if a.tier != b.tier || !a.is_mergeable_tier() {
        return false;
    }
    if a.merged || b.merged {
        return false;
    }
    if a.age <= MERGE_MIN_AGE || b.age <= MERGE_MIN_AGE {
        return false;
    }

    let distance = a.pos.distance(b.pos);
    distance <= a.radius + b.radius + MERGE_TOLERANCE
}

/// No third live fruit sits on the segment between fruits `i` and `j`
///
/// An obstacle blocks when its center is within its own radius of the line
/// and projects strictly inside the segment.
pub fn has_line_of_sight(fruits: &[Fruit], i: usize, j: usize) -> bool {
    let from = fruits[i].pos;
    let span = fruits[j].pos - from;
    let length_sq = span.length_squared();
    if length_sq <= 0.0 {
        return true;
    }
    let length = length_sq.sqrt();

    fruits
        .iter()
        .enumerate()
        .filter(|&(k, obstacle)| k != i && k != j && !obstacle.merged)
        .all(|(_, obstacle)| {
            let offset = obstacle.pos - from;
            let distance_to_line = span.perp_dot(offset).abs() / length;
            if distance_to_line >= obstacle.radius {
                return true;
            }
            let t = offset.dot(span) / length_sq;
            !(t > 0.0 && t < 1.0)
        })
}

/// Whether any two live fruits share a mergeable tier
///
/// Not wired to any transition; available for stalemate detection.
pub fn has_possible_merges(fruits: &[Fruit]) -> bool {
    let mut seen = [false; FRUIT_TYPES.len()];
    for fruit in fruits.iter().filter(|f| !f.merged && f.is_mergeable_tier()) {
        if seen[fruit.tier] {
            return true;
        }
        seen[fruit.tier] = true;
    }
    false
}

/// Burst of debris in the source tier's colour plus a floating score label
pub fn spawn_splash(
    particles: &mut Vec<Particle>,
    rng: &mut Pcg32,
    pos: Vec2,
    source_tier: usize,
    points: u64,
) {
    let color = fruit_type(source_tier).color;
    for _ in 0..SPLASH_PARTICLES {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let speed = rng.random_range(2.0..7.0);
        let vel = Vec2::new(angle.cos() * speed, angle.sin() * speed - 2.0);
        let size = rng.random_range(2.0..5.0);
        particles.push(Particle::debris(pos, vel, size, color));
    }
    particles.push(Particle::score_label(pos, points));
}

/// Merge stage of the frame pipeline
///
/// Returns the number of merges committed. Reaching the terminal tier
/// resets the board for a new round and ends the scan.
pub fn check_merges(state: &mut GameState) -> usize {
    let mut spawned: Vec<Fruit> = Vec::new();
    let mut merges = 0;

    for i in 0..state.fruits.len() {
        if state.fruits[i].merged {
            continue;
        }

        for j in (i + 1)..state.fruits.len() {
            if state.fruits[j].merged {
                continue;
            }
            if !can_merge(&state.fruits[i], &state.fruits[j])
                || !has_line_of_sight(&state.fruits, i, j)
            {
                continue;
            }

            let source_tier = state.fruits[i].tier;
            let new_tier = source_tier + 1;
            let points = fruit_type(new_tier).points;
            let pos = midpoint(state.fruits[i].pos, state.fruits[j].pos);

            state.fruits[i].merged = true;
            state.fruits[j].merged = true;
            spawn_splash(&mut state.particles, &mut state.rng, pos, source_tier, points);

            let mut fruit = Fruit::new(new_tier, pos);
            fruit.vel = Vec2::new(0.0, -MERGE_POP_SPEED);
            spawned.push(fruit);

            state.add_score(points);
            state.events.push(GameEvent::Merged {
                tier: new_tier,
                points,
                pos,
            });
            merges += 1;
            log::debug!("Merged into {} (+{})", fruit_type(new_tier).name, points);

            if new_tier == TERMINAL_TIER {
                let score = state.score;
                state.reset_board();
                state.events.push(GameEvent::Won { score });
                log::info!("{} grown! Round won with score {}", fruit_type(new_tier).name, score);
                return merges;
            }

            break;
        }
    }

    state.fruits.retain(|fruit| !fruit.merged);
    state.fruits.extend(spawned);
    merges
}
