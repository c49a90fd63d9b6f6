//! Fruit-vs-fruit contact resolution
//!
//! Contacts are resolved with a "swap and damp" rule rather than a
//! momentum-conserving impulse: overlapping fruits are pushed apart
//! symmetrically and trade velocities scaled by the restitution constant.
//! Gameplay feel depends on this exact rule.

use super::fruit::Fruit;
use crate::consts::*;

/// Mutable access to two distinct elements of a slice
pub fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    assert!(i != j, "pair_mut needs distinct indices");
    if i < j {
        let (head, tail) = items.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = items.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}

/// Resolve a contact between two fruits
///
/// Returns true if the fruits overlapped and were pushed apart. Coincident
/// centers are skipped for this frame since there is no separation axis.
pub fn resolve_contact(a: &mut Fruit, b: &mut Fruit) -> bool {
    if a.merged || b.merged {
        return false;
    }

    let delta = a.pos - b.pos;
    let distance = delta.length();
    let min_distance = a.radius + b.radius;

    if distance >= min_distance || distance <= 0.0 {
        return false;
    }

    // Each fruit takes half of the overlap
    let overlap = min_distance - distance;
    let separation = delta / distance * overlap * 0.5;
    a.pos += separation;
    b.pos -= separation;

    let a_vel = a.vel;
    a.vel = b.vel * BOUNCE;
    b.vel = a_vel * BOUNCE;

    // Tumble from the post-exchange sliding velocity
    let relative_vx = b.vel.x - a.vel.x;
    a.angular_vel += relative_vx / a.radius * ROLL_FACTOR;
    b.angular_vel -= relative_vx / b.radius * ROLL_FACTOR;

    true
}

/// Collision stage: resolve every unordered pair once, in index order
///
/// Returns the number of contacts resolved.
pub fn resolve_collisions(fruits: &mut [Fruit]) -> usize {
    let mut contacts = 0;
    for i in 0..fruits.len() {
        for j in (i + 1)..fruits.len() {
            let (a, b) = pair_mut(fruits, i, j);
            if resolve_contact(a, b) {
                contacts += 1;
            }
        }
    }
    contacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_pair_mut_both_orders() {
        let mut items = [1, 2, 3, 4];
        {
            let (a, b) = pair_mut(&mut items, 0, 3);
            std::mem::swap(a, b);
        }
        assert_eq!(items, [4, 2, 3, 1]);
        {
            let (a, b) = pair_mut(&mut items, 2, 1);
            *a *= 10;
            *b *= 100;
        }
        assert_eq!(items, [4, 200, 30, 1]);
    }

    #[test]
    fn test_overlap_pushed_apart_symmetrically() {
        let mut a = Fruit::new(0, Vec2::new(100.0, 100.0));
        let mut b = Fruit::new(0, Vec2::new(130.0, 100.0));
        assert!(resolve_contact(&mut a, &mut b));

        // 6px overlap split evenly
        assert!((a.pos.x - 97.0).abs() < 1e-4);
        assert!((b.pos.x - 133.0).abs() < 1e-4);
        assert!(((b.pos - a.pos).length() - 36.0).abs() < 1e-4);
    }

    #[test]
    fn test_velocities_swapped_and_damped() {
        let mut a = Fruit::new(0, Vec2::new(100.0, 100.0));
        let mut b = Fruit::new(0, Vec2::new(100.0, 130.0));
        a.vel = Vec2::new(0.0, 4.0);
        b.vel = Vec2::new(1.0, -2.0);
        assert!(resolve_contact(&mut a, &mut b));

        assert!((a.vel - Vec2::new(0.7, -1.4)).length() < 1e-5);
        assert!((b.vel - Vec2::new(0.0, 2.8)).length() < 1e-5);
        // Relative horizontal velocity spins the pair in opposite directions
        assert!(a.angular_vel < 0.0);
        assert!(b.angular_vel > 0.0);
    }

    #[test]
    fn test_separated_fruits_untouched() {
        let mut a = Fruit::new(0, Vec2::new(100.0, 100.0));
        let mut b = Fruit::new(0, Vec2::new(136.0, 100.0));
        a.vel = Vec2::new(1.0, 0.0);
        assert!(!resolve_contact(&mut a, &mut b));
        assert_eq!(a.vel, Vec2::new(1.0, 0.0));
        assert_eq!(b.pos, Vec2::new(136.0, 100.0));
    }

    #[test]
    fn test_coincident_centers_skipped() {
        let mut a = Fruit::new(1, Vec2::new(200.0, 200.0));
        let mut b = Fruit::new(1, Vec2::new(200.0, 200.0));
        a.vel = Vec2::new(2.0, 0.0);
        assert!(!resolve_contact(&mut a, &mut b));
        assert!(a.pos.is_finite() && b.pos.is_finite());
        assert_eq!(a.vel, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_merged_fruits_ignored() {
        let mut fruits = vec![
            Fruit::new(0, Vec2::new(100.0, 100.0)),
            Fruit::new(0, Vec2::new(110.0, 100.0)),
        ];
        fruits[1].merged = true;
        assert_eq!(resolve_collisions(&mut fruits), 0);
        assert_eq!(fruits[0].pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_resolve_collisions_counts_pairs() {
        let mut fruits = vec![
            Fruit::new(0, Vec2::new(100.0, 100.0)),
            Fruit::new(0, Vec2::new(120.0, 100.0)),
            Fruit::new(0, Vec2::new(300.0, 300.0)),
        ];
        assert_eq!(resolve_collisions(&mut fruits), 1);
    }
}
