use std::f32::consts::TAU;

use glam::{Mat4, Quat};

use super::{group::FrameTime, progress::smooth_toward};
use crate::config::PIVOT;

const EASE: f32 = 2.0;

/// Slow shared rotation under every group and the topper.
///
/// Scattered, the pivot turns slowly and wobbles around X. Formed, it turns a
/// little faster around Y only.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Pivot {
    angle: f32,
    speed: f32,
    tilt: f32,
}

impl Pivot {
    pub fn new(is_formed: bool) -> Self {
        Self {
            speed: Self::target_speed(is_formed),
            ..Default::default()
        }
    }

    pub fn target_speed(is_formed: bool) -> f32 {
        if is_formed {
            PIVOT.formed_speed
        } else {
            PIVOT.scattered_speed
        }
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn tilt(&self) -> f32 {
        self.tilt
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.angle) * Quat::from_rotation_x(self.tilt)
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_quat(self.rotation())
    }

    pub fn update(&mut self, frame: FrameTime, is_formed: bool) {
        if !frame.delta.is_finite() || frame.delta <= 0.0 {
            return;
        }

        self.speed = smooth_toward(self.speed, Self::target_speed(is_formed), EASE, frame.delta);
        self.angle = (self.angle + self.speed * frame.delta) % TAU;

        let tilt_target = if is_formed {
            0.0
        } else {
            (frame.elapsed * PIVOT.wobble_frequency).sin() * PIVOT.wobble_amplitude
        };
        self.tilt = smooth_toward(self.tilt, tilt_target, EASE, frame.delta);
    }
}
