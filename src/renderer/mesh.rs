use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::{vec3, Vec3};

#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

/// Flat-shaded triangle list, every triangle owns its three vertices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl Mesh {
    /// Builds a mesh from triangles around the origin, flipping any whose
    /// normal points back toward it.
    fn from_triangles(triangles: &[[Vec3; 3]]) -> Self {
        let mut mesh = Self::default();
        for &[a, b, c] in triangles {
            let centroid = (a + b + c) / 3.0;
            let normal = (b - a).cross(c - a).normalize_or_zero();
            let (b, c, normal) = if normal.dot(centroid) < 0.0 {
                (c, b, -normal)
            } else {
                (b, c, normal)
            };
            for position in [a, b, c] {
                mesh.indices.push(mesh.vertices.len() as u16);
                mesh.vertices.push(Vertex { position, normal });
            }
        }
        mesh
    }

    /// A thin spike pointing along +Z.
    pub fn needle() -> Self {
        let (width, length) = (0.06, 0.6);
        let tip = vec3(0.0, 0.0, length);
        let tail = vec3(0.0, 0.0, -length * 0.15);
        let ring = [
            vec3(width, 0.0, 0.0),
            vec3(0.0, width, 0.0),
            vec3(-width, 0.0, 0.0),
            vec3(0.0, -width, 0.0),
        ];
        let triangles: Vec<_> = (0..4)
            .flat_map(|i| {
                let (a, b) = (ring[i], ring[(i + 1) % 4]);
                [[a, b, tip], [b, a, tail]]
            })
            .collect();
        Self::from_triangles(&triangles)
    }

    pub fn octahedron() -> Self {
        let top = vec3(0.0, 1.2, 0.0);
        let bottom = vec3(0.0, -1.0, 0.0);
        let ring = [
            vec3(0.7, 0.0, 0.0),
            vec3(0.0, 0.0, 0.7),
            vec3(-0.7, 0.0, 0.0),
            vec3(0.0, 0.0, -0.7),
        ];
        let triangles: Vec<_> = (0..4)
            .flat_map(|i| {
                let (a, b) = (ring[i], ring[(i + 1) % 4]);
                [[a, b, top], [b, a, bottom]]
            })
            .collect();
        Self::from_triangles(&triangles)
    }

    pub fn uv_sphere(segments: usize, rings: usize) -> Self {
        let point = |segment: usize, ring: usize| {
            let theta = segment as f32 / segments as f32 * TAU;
            let phi = ring as f32 / rings as f32 * TAU * 0.5;
            vec3(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin())
        };

        let mut triangles = Vec::with_capacity(segments * rings * 2);
        for ring in 0..rings {
            for segment in 0..segments {
                let a = point(segment, ring);
                let b = point(segment + 1, ring);
                let c = point(segment, ring + 1);
                let d = point(segment + 1, ring + 1);
                if ring != 0 {
                    triangles.push([a, b, c]);
                }
                if ring != rings - 1 {
                    triangles.push([b, d, c]);
                }
            }
        }
        Self::from_triangles(&triangles)
    }

    /// A star in the XY plane, extruded along Z.
    pub fn star(points: usize, outer: f32, inner: f32, depth: f32) -> Self {
        let outline: Vec<Vec3> = (0..points * 2)
            .map(|i| {
                let angle = i as f32 / (points * 2) as f32 * TAU + TAU * 0.25;
                let radius = if i % 2 == 0 { outer } else { inner };
                vec3(angle.cos() * radius, angle.sin() * radius, 0.0)
            })
            .collect();
        let front = vec3(0.0, 0.0, depth * 0.5);
        let back = -front;

        let mut triangles = Vec::with_capacity(outline.len() * 4);
        for i in 0..outline.len() {
            let a = outline[i];
            let b = outline[(i + 1) % outline.len()];
            triangles.push([front, a + front * 0.3, b + front * 0.3]);
            triangles.push([back, b + back * 0.3, a + back * 0.3]);
            triangles.push([a + front * 0.3, a + back * 0.3, b + back * 0.3]);
            triangles.push([a + front * 0.3, b + back * 0.3, b + front * 0.3]);
        }
        Self::from_triangles(&triangles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(mesh: &Mesh) {
        assert!(!mesh.indices.is_empty());
        assert_eq!(mesh.indices.len() % 3, 0);
        assert!(mesh.vertices.len() < u16::MAX as usize);
        for vertex in &mesh.vertices {
            assert!((vertex.normal.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn meshes_are_well_formed() {
        check(&Mesh::needle());
        check(&Mesh::octahedron());
        check(&Mesh::uv_sphere(12, 8));
        check(&Mesh::star(5, 1.0, 0.45, 0.3));
    }

    #[test]
    fn sphere_normals_face_outward() {
        let sphere = Mesh::uv_sphere(10, 6);
        for vertex in &sphere.vertices {
            assert!(vertex.normal.dot(vertex.position) > 0.0);
        }
    }

    #[test]
    fn octahedron_has_eight_faces() {
        assert_eq!(Mesh::octahedron().indices.len(), 8 * 3);
    }
}
