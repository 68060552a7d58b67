use std::f32::consts::TAU;

use glam::{vec3, Quat, Vec3, Vec4};

use super::{group::FrameTime, progress::smooth_toward};
use crate::{
    component::{Instance, Transform},
    config::TOPPER,
};

/// The star on top. It is not instanced and ignores the group progress model.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Topper {
    height: f32,
    spin: f32,
    transform: Transform,
}

impl Topper {
    pub fn new(is_formed: bool) -> Self {
        let height = Self::target_height(is_formed);
        Self {
            height,
            spin: 0.0,
            transform: Transform {
                position: vec3(0.0, height, 0.0),
                rotation: Quat::IDENTITY,
                scale: Vec3::splat(TOPPER.scale),
            },
        }
    }

    pub fn target_height(is_formed: bool) -> f32 {
        if is_formed {
            TOPPER.rest_height
        } else {
            TOPPER.float_height
        }
    }

    /// Eased height, without the bob.
    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn instance(&self) -> Instance {
        Instance::new(&self.transform, Vec4::from(TOPPER.color))
    }

    pub fn update(&mut self, frame: FrameTime, is_formed: bool) {
        let target = Self::target_height(is_formed);
        self.height = smooth_toward(self.height, target, TOPPER.speed, frame.delta);
        if frame.delta.is_finite() && frame.delta > 0.0 {
            self.spin = (self.spin + TOPPER.spin_speed * frame.delta) % TAU;
        }

        let bob = (frame.elapsed * TOPPER.bob_frequency).sin() * TOPPER.bob_amplitude;
        let pulse = 1.0 + (frame.elapsed * TOPPER.pulse_frequency).sin() * TOPPER.pulse_amplitude;

        self.transform = Transform {
            position: vec3(0.0, self.height + bob, 0.0),
            rotation: Quat::from_rotation_y(self.spin),
            scale: Vec3::splat(TOPPER.scale * pulse),
        };
    }
}
