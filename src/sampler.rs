//! Point sampling and the two deterministic tree layouts.

use std::f32::consts::TAU;

use glam::{vec3, Quat, Vec3};
use rand::Rng;

use crate::component::Transform;

/// Returns a point distributed uniformly by volume inside a sphere centered on the origin.
pub fn sample_uniform_in_sphere(rng: &mut impl Rng, radius: f32) -> Vec3 {
    let theta = rng.gen::<f32>() * TAU;
    // acos keeps the polar angle area-uniform, cbrt keeps the radius volume-uniform
    let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
    let r = radius * rng.gen::<f32>().cbrt();

    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();
    vec3(
        r * sin_phi * cos_theta,
        r * sin_phi * sin_theta,
        r * cos_phi,
    )
}

/// A uniformly distributed random orientation (Shoemake's method).
pub fn sample_rotation(rng: &mut impl Rng) -> Quat {
    let u = rng.gen::<f32>();
    let (sin_a, cos_a) = (rng.gen::<f32>() * TAU).sin_cos();
    let (sin_b, cos_b) = (rng.gen::<f32>() * TAU).sin_cos();
    let (low, high) = ((1.0 - u).sqrt(), u.sqrt());
    Quat::from_xyzw(low * sin_a, low * cos_a, high * sin_b, high * cos_b)
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ConeLayout {
    pub layer_count: usize,
    pub height: f32,
    pub base_radius: f32,
    pub bottom: f32,
    /// Maximum downward jitter applied within a layer.
    pub thickness: f32,
    pub min_scale: f32,
    pub max_scale: f32,
}

impl ConeLayout {
    /// Radius of a horizontal slice, shrinking linearly to 10% at the top.
    pub fn radius_at(&self, height_fraction: f32) -> f32 {
        self.base_radius * (1.0 - 0.9 * height_fraction.clamp(0.0, 1.0))
    }
}

/// Places one particle inside the cone volume.
///
/// The band is picked at random rather than round-robin, and the radius inside
/// the band is square-root scaled so particles cover each disc uniformly by area.
pub fn layout_conical_volume(
    rng: &mut impl Rng,
    index: usize,
    total: usize,
    layout: &ConeLayout,
) -> Transform {
    debug_assert!(index < total);

    let layer_count = layout.layer_count.max(1);
    let layer = rng.gen_range(0..layer_count);
    let height_fraction = if layer_count > 1 {
        layer as f32 / (layer_count - 1) as f32
    } else {
        0.0
    };
    let layer_radius = layout.radius_at(height_fraction);

    let angle = rng.gen::<f32>() * TAU;
    let radius = layer_radius * rng.gen::<f32>().sqrt();
    let y = layout.bottom + height_fraction * layout.height - rng.gen::<f32>() * layout.thickness;
    let position = vec3(radius * angle.cos(), y, radius * angle.sin());

    // Face away from the trunk, tilted downwards.
    let outward = vec3(position.x, 0.0, position.z)
        .try_normalize()
        .unwrap_or(Vec3::X);
    let facing = (outward * 2.0 - Vec3::Y).normalize();
    let rotation = Quat::from_rotation_arc(Vec3::Z, facing);

    let scale = rng.gen_range(layout.min_scale..=layout.max_scale);

    Transform {
        position,
        rotation,
        scale: Vec3::splat(scale),
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpiralLayout {
    pub turns: f32,
    pub height: f32,
    pub base_radius: f32,
    pub bottom: f32,
    /// Constant radial offset keeping particles just outside the needle volume.
    pub surface_offset: f32,
}

/// Places particle `index` of `total` on a helix wound around the cone.
pub fn layout_spiral_surface(index: usize, total: usize, layout: &SpiralLayout) -> Transform {
    let t = if total > 0 {
        index as f32 / total as f32
    } else {
        0.0
    };
    let angle = t * layout.turns * TAU;
    let radius = layout.base_radius * (1.0 - t) + layout.surface_offset;

    Transform {
        position: vec3(
            radius * angle.cos(),
            layout.bottom + t * layout.height,
            radius * angle.sin(),
        ),
        rotation: Quat::from_rotation_y(-angle),
        scale: Vec3::ONE,
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    const CONE: ConeLayout = ConeLayout {
        layer_count: 20,
        height: 10.0,
        base_radius: 4.0,
        bottom: -5.0,
        thickness: 0.5,
        min_scale: 0.5,
        max_scale: 1.0,
    };

    #[test]
    fn sphere_samples_stay_inside_the_radius() {
        let mut rng = Pcg64Mcg::seed_from_u64(1);
        for _ in 0..10_000 {
            let p = sample_uniform_in_sphere(&mut rng, 3.0);
            assert!(p.length() <= 3.0 + 1e-4, "{:?} escaped", p);
        }
    }

    #[test]
    fn sphere_samples_are_uniform_by_volume() {
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        let radius = 2.0_f32;
        let samples = 40_000;
        let mut bins = [0usize; 10];
        let mut sum = 0.0;

        for _ in 0..samples {
            let p = sample_uniform_in_sphere(&mut rng, radius);
            let u = (p.length() / radius).powi(3).min(0.999_999);
            bins[(u * 10.0) as usize] += 1;
            sum += u;
        }

        let expected = samples as f32 / 10.0;
        for (i, count) in bins.iter().enumerate() {
            let deviation = (*count as f32 - expected).abs() / expected;
            assert!(deviation < 0.08, "bin {} has {} samples", i, count);
        }
        assert!((sum / samples as f32 - 0.5).abs() < 0.01);
    }

    #[test]
    fn sphere_samples_fill_every_octant() {
        let mut rng = Pcg64Mcg::seed_from_u64(3);
        let mut octants = [0usize; 8];
        for _ in 0..8_000 {
            let p = sample_uniform_in_sphere(&mut rng, 1.0);
            let i = (p.x > 0.0) as usize
                | ((p.y > 0.0) as usize) << 1
                | ((p.z > 0.0) as usize) << 2;
            octants[i] += 1;
        }
        assert!(octants.iter().all(|&n| n > 800), "{:?}", octants);
    }

    #[test]
    fn rotations_cover_every_direction_evenly() {
        let mut rng = Pcg64Mcg::seed_from_u64(8);
        let samples = 20_000;
        let mut mean = Vec3::ZERO;
        let mut up = 0;
        for _ in 0..samples {
            let rotation = sample_rotation(&mut rng);
            assert!((rotation.length() - 1.0).abs() < 1e-4);
            let axis = rotation * Vec3::Z;
            mean += axis;
            if axis.z > 0.5 {
                up += 1;
            }
        }
        assert!((mean / samples as f32).length() < 0.03);
        // A uniform direction lands in the cap z > 0.5 a quarter of the time.
        let share = up as f32 / samples as f32;
        assert!((share - 0.25).abs() < 0.02, "cap share {}", share);
    }

    #[test]
    fn cone_particles_stay_inside_their_band() {
        let mut rng = Pcg64Mcg::seed_from_u64(11);
        for i in 0..2_000 {
            let t = layout_conical_volume(&mut rng, i, 2_000, &CONE);
            let p = t.position;

            assert!(p.y <= CONE.bottom + CONE.height + 1e-4);
            assert!(p.y >= CONE.bottom - CONE.thickness - 1e-4);

            let radial = vec3(p.x, 0.0, p.z).length();
            assert!(radial <= CONE.base_radius + 1e-4);

            let scale = t.scale.x;
            assert!((CONE.min_scale..=CONE.max_scale).contains(&scale));
            assert_eq!(t.scale, Vec3::splat(scale));
        }
    }

    #[test]
    fn cone_particles_face_outward_and_down() {
        let mut rng = Pcg64Mcg::seed_from_u64(5);
        for i in 0..500 {
            let t = layout_conical_volume(&mut rng, i, 500, &CONE);
            let forward = t.rotation * Vec3::Z;
            let radial = vec3(t.position.x, 0.0, t.position.z);
            assert!(forward.y < 0.0);
            if radial.length() > 1e-3 {
                assert!(forward.dot(radial) > 0.0);
            }
        }
    }

    #[test]
    fn cone_radius_shrinks_to_a_tenth() {
        assert_eq!(CONE.radius_at(0.0), 4.0);
        assert!((CONE.radius_at(1.0) - 0.4).abs() < 1e-6);
        assert!(CONE.radius_at(0.5) < CONE.radius_at(0.25));
    }

    #[test]
    fn same_seed_same_cone() {
        let build = |seed| {
            let mut rng = Pcg64Mcg::seed_from_u64(seed);
            (0..100)
                .map(|i| layout_conical_volume(&mut rng, i, 100, &CONE))
                .collect::<Vec<_>>()
        };
        assert_eq!(build(99), build(99));
        assert_ne!(build(99), build(100));
    }

    #[test]
    fn spiral_climbs_and_narrows() {
        let layout = SpiralLayout {
            turns: 4.0,
            height: 10.0,
            base_radius: 4.0,
            bottom: -5.0,
            surface_offset: 0.3,
        };
        let total = 50;
        let points: Vec<_> = (0..total)
            .map(|i| layout_spiral_surface(i, total, &layout).position)
            .collect();

        assert!((points[0].y - layout.bottom).abs() < 1e-6);
        assert!((vec3(points[0].x, 0.0, points[0].z).length() - 4.3).abs() < 1e-5);

        for pair in points.windows(2) {
            assert!(pair[1].y > pair[0].y);
            let r0 = vec3(pair[0].x, 0.0, pair[0].z).length();
            let r1 = vec3(pair[1].x, 0.0, pair[1].z).length();
            assert!(r1 < r0);
            assert!(r1 > layout.surface_offset - 1e-5);
        }
    }
}
