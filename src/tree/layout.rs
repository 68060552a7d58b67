use glam::{Quat, Vec3, Vec4};
use rand::Rng;

use crate::{
    component::Transform,
    config::{
        OrnamentConfig, LIGHTS, NEEDLES, ORNAMENT_DIAMONDS, ORNAMENT_SPHERES, SCATTER_RADIUS,
        TREE_BASE_RADIUS, TREE_BOTTOM, TREE_HEIGHT,
    },
    sampler::{
        layout_conical_volume, layout_spiral_surface, sample_rotation, sample_uniform_in_sphere,
        ConeLayout, SpiralLayout,
    },
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GroupKind {
    Needles,
    OrnamentSpheres,
    OrnamentDiamonds,
    Lights,
}

impl GroupKind {
    pub const ALL: [GroupKind; 4] = [
        GroupKind::Needles,
        GroupKind::OrnamentSpheres,
        GroupKind::OrnamentDiamonds,
        GroupKind::Lights,
    ];

    pub fn count(self) -> usize {
        match self {
            GroupKind::Needles => NEEDLES.count,
            GroupKind::OrnamentSpheres => ORNAMENT_SPHERES.count,
            GroupKind::OrnamentDiamonds => ORNAMENT_DIAMONDS.count,
            GroupKind::Lights => LIGHTS.count,
        }
    }

    pub fn speed(self) -> f32 {
        match self {
            GroupKind::Needles => NEEDLES.speed,
            GroupKind::OrnamentSpheres => ORNAMENT_SPHERES.speed,
            GroupKind::OrnamentDiamonds => ORNAMENT_DIAMONDS.speed,
            GroupKind::Lights => LIGHTS.speed,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GroupKind::Needles => "needles",
            GroupKind::OrnamentSpheres => "ornament spheres",
            GroupKind::OrnamentDiamonds => "ornament diamonds",
            GroupKind::Lights => "lights",
        }
    }
}

fn needle_cone() -> ConeLayout {
    ConeLayout {
        layer_count: NEEDLES.layer_count,
        height: TREE_HEIGHT,
        base_radius: TREE_BASE_RADIUS,
        bottom: TREE_BOTTOM,
        thickness: NEEDLES.thickness,
        min_scale: NEEDLES.min_scale,
        max_scale: NEEDLES.max_scale,
    }
}

fn spiral(turns: f32, surface_offset: f32) -> SpiralLayout {
    SpiralLayout {
        turns,
        height: TREE_HEIGHT,
        base_radius: TREE_BASE_RADIUS,
        bottom: TREE_BOTTOM,
        surface_offset,
    }
}

/// Formed and scattered transforms of every particle in a group.
///
/// Entry `i` of each vector describes the same particle.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformTable {
    pub formed: Vec<Transform>,
    pub scattered: Vec<Transform>,
    pub colors: Vec<Vec4>,
}

impl TransformTable {
    pub fn build(kind: GroupKind, rng: &mut impl Rng) -> Self {
        Self::build_with_count(kind, kind.count(), rng)
    }

    pub fn build_with_count(kind: GroupKind, count: usize, rng: &mut impl Rng) -> Self {
        let mut table = Self {
            formed: Vec::with_capacity(count),
            scattered: Vec::with_capacity(count),
            colors: Vec::with_capacity(count),
        };

        match kind {
            GroupKind::Needles => {
                let cone = needle_cone();
                let color = Vec4::from(NEEDLES.color);
                for i in 0..count {
                    let formed = layout_conical_volume(rng, i, count, &cone);
                    let scattered = Transform {
                        position: sample_uniform_in_sphere(rng, SCATTER_RADIUS),
                        rotation: sample_rotation(rng),
                        scale: formed.scale,
                    };
                    table.push(formed, scattered, color);
                }
            }
            GroupKind::OrnamentSpheres => table.fill_ornaments(&ORNAMENT_SPHERES, count, true, rng),
            GroupKind::OrnamentDiamonds => {
                table.fill_ornaments(&ORNAMENT_DIAMONDS, count, false, rng)
            }
            GroupKind::Lights => {
                let layout = spiral(LIGHTS.turns, LIGHTS.surface_offset);
                let color = Vec4::from(LIGHTS.color);
                let scale = Vec3::splat(LIGHTS.scale);
                for i in 0..count {
                    let formed = Transform {
                        scale,
                        ..layout_spiral_surface(i, count, &layout)
                    };
                    let scattered = Transform {
                        position: sample_uniform_in_sphere(rng, SCATTER_RADIUS),
                        rotation: Quat::IDENTITY,
                        scale,
                    };
                    table.push(formed, scattered, color);
                }
            }
        }

        table
    }

    fn fill_ornaments(
        &mut self,
        config: &OrnamentConfig,
        count: usize,
        tumble: bool,
        rng: &mut impl Rng,
    ) {
        let layout = spiral(config.turns, config.surface_offset);
        let scale = Vec3::splat(config.scale);
        for i in 0..count {
            let placed = layout_spiral_surface(i, count, &layout);
            let rotation = if tumble {
                sample_rotation(rng)
            } else {
                placed.rotation
            };
            let formed = Transform {
                rotation,
                scale,
                ..placed
            };
            // Ornaments keep their full size while scattered.
            let scattered = Transform {
                position: sample_uniform_in_sphere(rng, SCATTER_RADIUS),
                rotation: sample_rotation(rng),
                scale,
            };
            let color = config.palette[rng.gen_range(0..config.palette.len())];
            self.push(formed, scattered, Vec4::from(color));
        }
    }

    fn push(&mut self, formed: Transform, scattered: Transform, color: Vec4) {
        self.formed.push(formed);
        self.scattered.push(scattered);
        self.colors.push(color);
    }

    pub fn len(&self) -> usize {
        self.formed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formed.is_empty()
    }
}
