//! Per-frame integration of fruits and particles
//!
//! One explicit Euler step per frame, no substeps. The board is small and
//! speeds stay low, so tunnelling is not a concern.

use super::fruit::Fruit;
use super::state::{GameState, Particle};
use crate::consts::*;

/// Advance one fruit by a frame: gravity, damping, spin and wall bounces
pub fn step_fruit(fruit: &mut Fruit) {
    if fruit.merged {
        return;
    }

    fruit.age += 1;
    fruit.vel.y += GRAVITY;
    fruit.pos += fruit.vel;
    fruit.vel *= FRICTION;

    fruit.angular_vel += fruit.vel.x / fruit.radius * ROLL_FACTOR;
    fruit.rotation += fruit.angular_vel;
    fruit.angular_vel *= ANGULAR_DAMPING;

    let r = fruit.radius;
    if fruit.pos.x - r < 0.0 {
        fruit.pos.x = r;
        fruit.vel.x = -fruit.vel.x * BOUNCE;
        fruit.angular_vel = -fruit.angular_vel * BOUNCE;
    }
    if fruit.pos.x + r > BOARD_WIDTH {
        fruit.pos.x = BOARD_WIDTH - r;
        fruit.vel.x = -fruit.vel.x * BOUNCE;
        fruit.angular_vel = -fruit.angular_vel * BOUNCE;
    }
    if fruit.pos.y + r > BOARD_HEIGHT {
        fruit.pos.y = BOARD_HEIGHT - r;
        fruit.vel.y = -fruit.vel.y * BOUNCE;
        fruit.angular_vel += fruit.vel.x / r * FLOOR_ROLL_FACTOR;
    }
}

/// Advance one particle by a frame and burn one frame of its lifetime
pub fn step_particle(particle: &mut Particle) {
    particle.pos += particle.vel;
    if particle.is_label() {
        particle.vel.y = -LABEL_RISE_SPEED;
    } else {
        particle.vel.y += GRAVITY * PARTICLE_GRAVITY_SCALE;
        particle.vel *= PARTICLE_DAMPING;
    }
    particle.remaining = particle.remaining.saturating_sub(1);
}

/// Physics stage of the frame pipeline
pub fn integrate(state: &mut GameState) {
    for fruit in &mut state.fruits {
        step_fruit(fruit);
    }

    for particle in &mut state.particles {
        step_particle(particle);
    }
    state.particles.retain(Particle::is_alive);
}
