use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3, Vec4};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    pub fn from_matrix(matrix: &Mat4) -> Self {
        let (scale, rotation, position) = matrix.to_scale_rotation_translation();
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Position and scale are lerped, rotation is slerped.
    pub fn interpolate(from: &Self, to: &Self, t: f32) -> Self {
        Self {
            position: from.position.lerp(to.position, t),
            rotation: from.rotation.slerp(to.rotation, t),
            scale: from.scale.lerp(to.scale, t),
        }
    }
}

/// One entry of a renderable instance buffer.
#[derive(Debug, Copy, Clone, PartialEq, Default, Pod, Zeroable)]
#[repr(C)]
pub struct Instance {
    pub model: Mat4,
    /// `w` is the emissive factor, not alpha.
    pub color: Vec4,
}

impl Instance {
    pub fn new(transform: &Transform, color: Vec4) -> Self {
        Self {
            model: transform.to_matrix(),
            color,
        }
    }

    pub fn transform(&self) -> Transform {
        Transform::from_matrix(&self.model)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn view_projection(&self) -> Mat4 {
        let p_mat =
            Mat4::perspective_lh(self.fov.to_radians(), self.aspect_ratio, self.near, self.far);
        let v_mat = Mat4::look_at_lh(self.position, self.target, Vec3::Y);
        p_mat * v_mat
    }
}
