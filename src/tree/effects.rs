//! Per-group secondary effects layered on top of the plain interpolation.

use std::f32::consts::TAU;

use glam::{Quat, Vec3};

use crate::config::LIGHTS;

/// Y-axis swirl applied to needle positions while a morph is in flight.
pub fn swirl_angle(progress: f32) -> f32 {
    if progress > 0.01 && progress < 0.99 {
        (1.0 - progress) * TAU
    } else {
        0.0
    }
}

pub fn apply_swirl(position: Vec3, progress: f32) -> Vec3 {
    let angle = swirl_angle(progress);
    if angle == 0.0 {
        position
    } else {
        Quat::from_rotation_y(angle) * position
    }
}

/// Staggered interpolation factor, later indices lag behind earlier ones.
pub fn zipper_t(progress: f32, index: usize, count: usize) -> f32 {
    let lag = index as f32 / count.max(1) as f32;
    (progress * 1.5 - lag * 0.5).clamp(0.0, 1.0)
}

/// Scale multiplier for light `index`, each light twinkles with its own phase.
pub fn blink_factor(elapsed: f32, index: usize) -> f32 {
    let wave = (elapsed * LIGHTS.blink_frequency + index as f32 * LIGHTS.blink_phase_offset).sin();
    0.8 + 0.5 * (0.5 + 0.5 * wave)
}

pub fn float_offset(elapsed: f32, index: usize) -> f32 {
    (elapsed * LIGHTS.float_frequency + index as f32).sin() * LIGHTS.float_amplitude
}

/// Y rotation carried by a diamond, faded out as it leaves the tree.
pub fn idle_spin(spin: f32, t: f32) -> Quat {
    Quat::from_rotation_y(spin * t.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use glam::vec3;

    use super::*;

    #[test]
    fn swirl_is_zero_at_rest() {
        assert_eq!(swirl_angle(0.0), 0.0);
        assert_eq!(swirl_angle(1.0), 0.0);
        assert_eq!(apply_swirl(vec3(1.0, 2.0, 3.0), 1.0), vec3(1.0, 2.0, 3.0));
    }

    #[test]
    fn swirl_is_inside_a_turn_during_transition() {
        for i in 2..99 {
            let p = i as f32 / 100.0;
            let angle = swirl_angle(p);
            assert!(angle > 0.0 && angle < TAU, "progress {} angle {}", p, angle);
        }
    }

    #[test]
    fn swirl_keeps_height_and_radius() {
        let p = vec3(3.0, 1.5, -2.0);
        let swirled = apply_swirl(p, 0.4);
        assert!((swirled.y - p.y).abs() < 1e-5);
        assert!((swirled.length() - p.length()).abs() < 1e-4);
        assert!(!swirled.abs_diff_eq(p, 1e-3));
    }

    #[test]
    fn zipper_orders_indices() {
        let count = 64;
        for step in 0..=20 {
            let progress = step as f32 / 20.0;
            let ts: Vec<f32> = (0..count).map(|i| zipper_t(progress, i, count)).collect();
            for pair in ts.windows(2) {
                assert!(pair[0] >= pair[1]);
            }
        }
    }

    #[test]
    fn zipper_reaches_both_ends() {
        for i in 0..10 {
            assert_eq!(zipper_t(0.0, i, 10), 0.0);
            assert_eq!(zipper_t(1.0, i, 10), 1.0);
        }
        assert_eq!(zipper_t(0.5, 0, 0), 0.75);
    }

    #[test]
    fn blink_stays_in_range() {
        for i in 0..200 {
            let b = blink_factor(i as f32 * 0.37, i);
            assert!((0.8 - 1e-6..=1.3 + 1e-6).contains(&b));
        }
    }

    #[test]
    fn lights_are_out_of_phase() {
        assert_ne!(blink_factor(1.0, 0), blink_factor(1.0, 1));
    }

    #[test]
    fn idle_spin_fades_with_the_morph() {
        assert_eq!(idle_spin(2.0, 0.0), Quat::IDENTITY);
        assert!(idle_spin(2.0, 1.0).abs_diff_eq(Quat::from_rotation_y(2.0), 1e-6));
        let half = idle_spin(2.0, 0.5);
        assert!(half.abs_diff_eq(Quat::from_rotation_y(1.0), 1e-6));
    }
}
