//! The tree scene: four instanced particle groups and a topper under one pivot,
//! all driven by a single formed/scattered flag.

mod effects;
mod group;
mod layout;
mod pivot;
mod progress;
mod topper;

use std::time::SystemTime;

use glam::Mat4;
use log::{debug, info};
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

pub use effects::{apply_swirl, blink_factor, float_offset, idle_spin, swirl_angle, zipper_t};
pub use group::{FrameTime, GroupTick, InstanceBuffer, ParticleGroup};
pub use layout::{GroupKind, TransformTable};
pub use pivot::Pivot;
pub use progress::{smooth_toward, target_for, Progress};
pub use topper::Topper;

/// Instance buffers for everything the tree draws.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeBuffers {
    pub needles: InstanceBuffer,
    pub ornament_spheres: InstanceBuffer,
    pub ornament_diamonds: InstanceBuffer,
    pub lights: InstanceBuffer,
    pub topper: InstanceBuffer,
}

impl TreeBuffers {
    pub fn group(&self, kind: GroupKind) -> &InstanceBuffer {
        match kind {
            GroupKind::Needles => &self.needles,
            GroupKind::OrnamentSpheres => &self.ornament_spheres,
            GroupKind::OrnamentDiamonds => &self.ornament_diamonds,
            GroupKind::Lights => &self.lights,
        }
    }

    pub fn group_mut(&mut self, kind: GroupKind) -> &mut InstanceBuffer {
        match kind {
            GroupKind::Needles => &mut self.needles,
            GroupKind::OrnamentSpheres => &mut self.ornament_spheres,
            GroupKind::OrnamentDiamonds => &mut self.ornament_diamonds,
            GroupKind::Lights => &mut self.lights,
        }
    }
}

pub struct Tree {
    is_formed: bool,
    elapsed: f32,
    needles: ParticleGroup,
    ornament_spheres: ParticleGroup,
    ornament_diamonds: ParticleGroup,
    lights: ParticleGroup,
    topper: Topper,
    pivot: Pivot,
    buffers: Option<TreeBuffers>,
}

impl Tree {
    /// Builds every layout table. Without a seed the layouts differ between runs.
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default()
        });
        info!("Seeded RNG with {}", seed);

        let mut rng = Pcg64Mcg::seed_from_u64(seed);
        let needles = ParticleGroup::build(GroupKind::Needles, &mut rng);
        let ornament_spheres = ParticleGroup::build(GroupKind::OrnamentSpheres, &mut rng);
        let ornament_diamonds = ParticleGroup::build(GroupKind::OrnamentDiamonds, &mut rng);
        let lights = ParticleGroup::build(GroupKind::Lights, &mut rng);

        Self {
            is_formed: false,
            elapsed: 0.0,
            needles,
            ornament_spheres,
            ornament_diamonds,
            lights,
            topper: Topper::new(false),
            pivot: Pivot::new(false),
            buffers: None,
        }
    }

    pub fn is_formed(&self) -> bool {
        self.is_formed
    }

    /// Changes the target only. Groups in flight keep their progress and turn around.
    pub fn set_formed(&mut self, is_formed: bool) {
        if self.is_formed != is_formed {
            info!("Tree {}", if is_formed { "forming" } else { "scattering" });
        }
        self.is_formed = is_formed;
    }

    pub fn toggle(&mut self) -> bool {
        self.set_formed(!self.is_formed);
        self.is_formed
    }

    pub fn group(&self, kind: GroupKind) -> &ParticleGroup {
        match kind {
            GroupKind::Needles => &self.needles,
            GroupKind::OrnamentSpheres => &self.ornament_spheres,
            GroupKind::OrnamentDiamonds => &self.ornament_diamonds,
            GroupKind::Lights => &self.lights,
        }
    }

    pub fn topper(&self) -> &Topper {
        &self.topper
    }

    pub fn pivot_matrix(&self) -> Mat4 {
        self.pivot.matrix()
    }

    /// Allocates the instance buffers. Until then ticks leave the groups untouched.
    pub fn mount(&mut self) {
        if self.buffers.is_some() {
            return;
        }
        let elapsed = self.elapsed;
        self.buffers = Some(TreeBuffers {
            needles: self.needles.mount(elapsed),
            ornament_spheres: self.ornament_spheres.mount(elapsed),
            ornament_diamonds: self.ornament_diamonds.mount(elapsed),
            lights: self.lights.mount(elapsed),
            topper: InstanceBuffer::new(vec![self.topper.instance()]),
        });
        debug!("Tree mounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.buffers.is_some()
    }

    pub fn buffers(&self) -> Option<&TreeBuffers> {
        self.buffers.as_ref()
    }

    pub fn buffers_mut(&mut self) -> Option<&mut TreeBuffers> {
        self.buffers.as_mut()
    }

    /// Advances the whole scene by `delta` seconds, one group after another.
    pub fn tick(&mut self, delta: f32) {
        if delta.is_finite() && delta > 0.0 {
            self.elapsed += delta;
        }
        let frame = FrameTime {
            delta,
            elapsed: self.elapsed,
        };
        let is_formed = self.is_formed;

        self.pivot.update(frame, is_formed);
        self.topper.update(frame, is_formed);

        let mut buffers = self.buffers.as_mut();
        for (group, kind) in [
            (&mut self.needles, GroupKind::Needles),
            (&mut self.ornament_spheres, GroupKind::OrnamentSpheres),
            (&mut self.ornament_diamonds, GroupKind::OrnamentDiamonds),
            (&mut self.lights, GroupKind::Lights),
        ] {
            let buffer = buffers.as_deref_mut().map(|b| b.group_mut(kind));
            group.update(frame, is_formed, buffer);
        }

        if let Some(buffers) = buffers {
            if let Some(slot) = buffers.topper.instances_mut().first_mut() {
                *slot = self.topper.instance();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_scattered_and_unmounted() {
        let tree = Tree::new(Some(1));
        assert!(!tree.is_formed());
        assert!(!tree.is_mounted());
        for kind in GroupKind::ALL {
            assert_eq!(tree.group(kind).progress(), 0.0);
            assert_eq!(tree.group(kind).len(), kind.count());
        }
    }

    #[test]
    fn unmounted_groups_do_not_advance() {
        let mut tree = Tree::new(Some(1));
        tree.set_formed(true);
        for _ in 0..10 {
            tree.tick(1.0 / 60.0);
        }
        for kind in GroupKind::ALL {
            assert_eq!(tree.group(kind).progress(), 0.0);
        }
        assert!(tree.topper().height() < Topper::target_height(false));
    }

    #[test]
    fn groups_finish_at_different_times() {
        let mut tree = Tree::new(Some(3));
        tree.mount();
        tree.set_formed(true);
        for _ in 0..30 {
            tree.tick(1.0 / 60.0);
        }
        let needles = tree.group(GroupKind::Needles).progress();
        let diamonds = tree.group(GroupKind::OrnamentDiamonds).progress();
        let lights = tree.group(GroupKind::Lights).progress();
        assert!(lights > needles);
        assert!(needles > diamonds);
    }

    #[test]
    fn toggle_flips_the_flag() {
        let mut tree = Tree::new(Some(1));
        assert!(tree.toggle());
        assert!(!tree.toggle());
    }

    #[test]
    fn buffers_match_group_sizes() {
        let mut tree = Tree::new(Some(5));
        tree.mount();
        let buffers = tree.buffers().expect("mounted");
        for kind in GroupKind::ALL {
            assert_eq!(buffers.group(kind).len(), kind.count());
        }
        assert_eq!(buffers.topper.len(), 1);
    }

    #[test]
    fn topper_instance_is_rewritten_in_place() {
        let mut tree = Tree::new(Some(5));
        tree.mount();
        let storage = tree.buffers().expect("mounted").topper.as_slice().as_ptr();
        let first = tree.buffers().expect("mounted").topper.as_slice()[0];

        for _ in 0..5 {
            tree.buffers_mut().expect("mounted").topper.take_dirty();
            tree.tick(1.0 / 60.0);
            let topper = &tree.buffers().expect("mounted").topper;
            assert_eq!(topper.as_slice().as_ptr(), storage);
            assert!(topper.is_dirty());
        }

        let topper = &tree.buffers().expect("mounted").topper;
        assert_eq!(topper.len(), 1);
        assert_eq!(topper.as_slice()[0], tree.topper().instance());
        assert_ne!(topper.as_slice()[0], first);
    }
}
