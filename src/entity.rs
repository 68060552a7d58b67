use glam::vec3;
use tinsel::{component::Camera, tree::Tree};

pub struct Scene {
    pub camera: Camera,
    pub tree: Tree,
}

impl Scene {
    pub fn new(aspect_ratio: f32, seed: Option<u64>) -> Self {
        Self {
            camera: Camera {
                position: vec3(0.0, 3.0, -34.0),
                target: vec3(0.0, 1.0, 0.0),
                fov: 45.0,
                aspect_ratio,
                near: 0.1,
                far: 200.0,
            },
            tree: Tree::new(seed),
        }
    }
}
