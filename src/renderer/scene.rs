//! Scene assembly
//!
//! Turns a `GameState` into one triangle list, back to front. Reads state
//! only; nothing here feeds back into the simulation.

use glam::Vec2;
use std::f32::consts::PI;

use super::shapes::{
    circle, dashed_line, line, rect, ring, rotated_rect, segment_text, vertical_gradient,
};
use super::vertex::{Vertex, colors, with_alpha};
use crate::Settings;
use crate::consts::*;
use crate::sim::{Fruit, GameState, Particle};

/// Preview fruit opacity
const PREVIEW_ALPHA: f32 = 0.5;
/// Ground strip height at the bottom of the board
const GROUND_HEIGHT: f32 = 25.0;
/// Fraction of the board height where the sky turns to meadow
const MEADOW_STOP: f32 = 0.7;

/// Cloud puffs as (center, radius); each cloud is three overlapping discs
const CLOUDS: [(f32, f32, f32); 9] = [
    (60.0, 45.0, 18.0),
    (75.0, 45.0, 25.0),
    (90.0, 45.0, 18.0),
    (210.0, 30.0, 15.0),
    (220.0, 30.0, 22.0),
    (235.0, 30.0, 15.0),
    (260.0, 60.0, 12.0),
    (270.0, 60.0, 18.0),
    (280.0, 60.0, 12.0),
];

const SUN_CENTER: Vec2 = Vec2::new(260.0, 40.0);
const SUN_RADIUS: f32 = 15.0;
const SUN_RAYS: u32 = 8;

/// Build the full frame
pub fn build_scene(state: &GameState, settings: &Settings) -> Vec<Vertex> {
    let segments = settings.quality.circle_segments();
    let mut vertices = Vec::with_capacity(4096);

    background(&mut vertices, settings);

    vertices.extend(dashed_line(
        Vec2::new(0.0, GAME_OVER_LINE),
        Vec2::new(BOARD_WIDTH, GAME_OVER_LINE),
        10.0,
        5.0,
        2.0,
        colors::GAME_OVER_LINE,
    ));

    if state.is_running() {
        preview(&mut vertices, state, segments);
    }

    for fruit in state.fruits.iter().filter(|f| !f.merged) {
        fruit_sprite(&mut vertices, fruit, 1.0, segments);
    }

    // Newest particles win when over the cap
    let max = settings.max_particles();
    let skip = state.particles.len().saturating_sub(max);
    for particle in state.particles.iter().skip(skip) {
        particle_sprite(&mut vertices, particle, segments);
    }

    vertices
}

fn background(vertices: &mut Vec<Vertex>, settings: &Settings) {
    let meadow_y = BOARD_HEIGHT * MEADOW_STOP;
    vertices.extend(vertical_gradient(
        Vec2::ZERO,
        Vec2::new(BOARD_WIDTH, meadow_y),
        colors::SKY_TOP,
        colors::SKY_MEADOW,
    ));
    vertices.extend(vertical_gradient(
        Vec2::new(0.0, meadow_y),
        Vec2::new(BOARD_WIDTH, BOARD_HEIGHT - meadow_y),
        colors::SKY_MEADOW,
        colors::SKY_BOTTOM,
    ));

    let scenery = settings.quality.scenery_enabled();
    if scenery {
        for (x, y, r) in CLOUDS {
            vertices.extend(circle(Vec2::new(x, y), r, colors::CLOUD, 16));
        }
    }

    vertices.extend(rect(
        Vec2::new(0.0, BOARD_HEIGHT - GROUND_HEIGHT),
        Vec2::new(BOARD_WIDTH, GROUND_HEIGHT),
        colors::GROUND,
    ));

    if scenery {
        let mut x = 0.0;
        while x < BOARD_WIDTH {
            for (dx, dy, w, h) in [(0.0, 20.0, 2.0, 12.0), (4.0, 16.0, 1.0, 8.0), (8.0, 20.0, 2.0, 12.0)] {
                vertices.extend(rect(
                    Vec2::new(x + dx, BOARD_HEIGHT - dy),
                    Vec2::new(w, h),
                    colors::GRASS,
                ));
            }
            x += 12.0;
        }
    }

    vertices.extend(circle(SUN_CENTER, SUN_RADIUS, colors::SUN, 20));
    if scenery {
        for i in 0..SUN_RAYS {
            let dir = Vec2::from_angle(i as f32 * 2.0 * PI / SUN_RAYS as f32);
            vertices.extend(line(
                SUN_CENTER + dir * 18.0,
                SUN_CENTER + dir * 25.0,
                1.0,
                colors::SUN,
            ));
        }
    }
}

fn preview(vertices: &mut Vec<Vertex>, state: &GameState, segments: u32) {
    let ghost = Fruit::new(state.next_tier, Vec2::new(state.drop_x, PREVIEW_Y));
    fruit_sprite(vertices, &ghost, PREVIEW_ALPHA, segments);
}

/// Shadow, body, highlight and stem; the stem and shadow turn with the fruit
fn fruit_sprite(vertices: &mut Vec<Vertex>, fruit: &Fruit, alpha: f32, segments: u32) {
    let r = fruit.radius;
    let rot = Vec2::from_angle(fruit.rotation);
    let color = with_alpha(fruit.kind().color, alpha);

    let shadow_center = fruit.pos + rot.rotate(Vec2::new(2.0, r + 2.0));
    vertices.extend(circle(
        shadow_center,
        r,
        with_alpha(colors::SHADOW, alpha),
        segments,
    ));

    vertices.extend(circle(fruit.pos, r, color, segments));
    let rim = [color[0] * 0.7, color[1] * 0.7, color[2] * 0.7, color[3]];
    vertices.extend(ring(fruit.pos, r * 0.92, r, rim, segments));
    vertices.extend(circle(
        fruit.pos + Vec2::new(-0.35, -0.35) * r,
        r * 0.3,
        with_alpha(colors::HIGHLIGHT, alpha),
        (segments / 2).max(6),
    ));

    let stem_center = fruit.pos + rot.rotate(Vec2::new(0.0, -r));
    vertices.extend(rotated_rect(
        stem_center,
        Vec2::new(r * 0.08, r * 0.2),
        fruit.rotation,
        with_alpha(colors::STEM, alpha),
    ));
}

fn particle_sprite(vertices: &mut Vec<Vertex>, particle: &Particle, segments: u32) {
    let alpha = particle.opacity();
    if alpha <= 0.0 {
        return;
    }
    let color = with_alpha(particle.color, alpha);
    match &particle.label {
        Some(text) => vertices.extend(segment_text(text, particle.pos, particle.size, color)),
        None => vertices.extend(circle(
            particle.pos,
            particle.size,
            color,
            (segments / 3).max(6),
        )),
    }
}
