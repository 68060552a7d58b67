use std::f32::consts::TAU;

use glam::Vec3;
use log::trace;
use rand::Rng;

use super::{
    effects::{apply_swirl, blink_factor, float_offset, idle_spin, zipper_t},
    layout::{GroupKind, TransformTable},
    progress::{target_for, Progress},
};
use crate::{
    component::{Instance, Transform},
    config::DIAMOND_SPIN_STEP,
};

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct FrameTime {
    /// Seconds since the previous tick.
    pub delta: f32,
    /// Seconds since the scene started.
    pub elapsed: f32,
}

/// CPU side of an instanced draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceBuffer {
    instances: Vec<Instance>,
    dirty: bool,
}

impl InstanceBuffer {
    pub fn new(instances: Vec<Instance>) -> Self {
        Self {
            instances,
            dirty: true,
        }
    }

    pub fn as_slice(&self) -> &[Instance] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clears the dirty flag, returning whether the contents need an upload.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    pub(super) fn instances_mut(&mut self) -> &mut [Instance] {
        self.dirty = true;
        &mut self.instances
    }
}

/// What a call to [`ParticleGroup::update`] did.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GroupTick {
    /// No usable buffer, nothing advanced.
    Skipped,
    /// The morph is in flight or just landed, every instance was recomposed.
    Recomputed,
    /// Settled, only idle effects ran (possibly none).
    Idle,
}

pub struct ParticleGroup {
    kind: GroupKind,
    table: TransformTable,
    progress: Progress,
    /// Accumulated idle rotation, only diamonds build it up.
    spin: f32,
}

impl ParticleGroup {
    pub fn new(kind: GroupKind, table: TransformTable) -> Self {
        Self {
            kind,
            table,
            progress: Progress::new(kind.speed(), 0.0),
            spin: 0.0,
        }
    }

    pub fn build(kind: GroupKind, rng: &mut impl Rng) -> Self {
        Self::new(kind, TransformTable::build(kind, rng))
    }

    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    pub fn progress(&self) -> f32 {
        self.progress.value()
    }

    pub fn table(&self) -> &TransformTable {
        &self.table
    }

    pub fn spin(&self) -> f32 {
        self.spin
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Allocates a buffer holding the group as it looks at its current progress.
    pub fn mount(&self, elapsed: f32) -> InstanceBuffer {
        let mut instances = vec![Instance::default(); self.len()];
        self.write_all(&mut instances, self.progress.value(), elapsed);
        InstanceBuffer::new(instances)
    }

    pub fn update(
        &mut self,
        frame: FrameTime,
        is_formed: bool,
        buffer: Option<&mut InstanceBuffer>,
    ) -> GroupTick {
        let buffer = match buffer {
            Some(buffer) if buffer.len() == self.len() => buffer,
            _ => return GroupTick::Skipped,
        };

        let target = target_for(is_formed);
        let was_settled = self.progress.is_settled_at(target);
        self.progress = self.progress.advance(target, frame.delta);
        let settled = self.progress.is_settled_at(target);

        let tick = if !settled || !was_settled {
            let progress = self.progress.value();
            self.write_all(buffer.instances_mut(), progress, frame.elapsed);
            GroupTick::Recomputed
        } else {
            GroupTick::Idle
        };

        if settled && is_formed {
            self.run_idle(buffer, frame.elapsed);
        }

        trace!(
            "{} progress {:.4} ({:?})",
            self.kind.label(),
            self.progress.value(),
            tick
        );
        tick
    }

    /// Transform of particle `index` at `progress`, secondary effects included.
    pub fn compose(&self, index: usize, progress: f32, elapsed: f32) -> Transform {
        let formed = &self.table.formed[index];
        let scattered = &self.table.scattered[index];

        match self.kind {
            GroupKind::Needles => {
                let mut transform = Transform::interpolate(scattered, formed, progress);
                transform.position = apply_swirl(transform.position, progress);
                transform
            }
            GroupKind::OrnamentSpheres => {
                let t = zipper_t(progress, index, self.len());
                Transform::interpolate(scattered, formed, t)
            }
            GroupKind::OrnamentDiamonds => {
                let t = zipper_t(progress, index, self.len());
                let mut transform = Transform::interpolate(scattered, formed, t);
                transform.rotation = idle_spin(self.spin, t) * transform.rotation;
                transform
            }
            GroupKind::Lights => {
                let mut transform = Transform::interpolate(scattered, formed, progress);
                transform.scale *= blink_factor(elapsed, index);
                transform
            }
        }
    }

    fn write_all(&self, instances: &mut [Instance], progress: f32, elapsed: f32) {
        for (index, (instance, color)) in instances.iter_mut().zip(&self.table.colors).enumerate() {
            *instance = Instance::new(&self.compose(index, progress, elapsed), *color);
        }
    }

    fn run_idle(&mut self, buffer: &mut InstanceBuffer, elapsed: f32) {
        match self.kind {
            GroupKind::OrnamentDiamonds => {
                // compose applies the accumulated angle.
                self.spin = (self.spin + DIAMOND_SPIN_STEP) % TAU;
                self.write_all(buffer.instances_mut(), 1.0, elapsed);
            }
            GroupKind::Lights => {
                // Rebuilt from the formed layout every frame so nothing accumulates.
                let instances = buffer.instances_mut();
                for (index, (formed, color)) in
                    self.table.formed.iter().zip(&self.table.colors).enumerate()
                {
                    let transform = Transform {
                        position: formed.position + Vec3::Y * float_offset(elapsed, index),
                        rotation: formed.rotation,
                        scale: formed.scale * blink_factor(elapsed, index),
                    };
                    instances[index] = Instance::new(&transform, *color);
                }
            }
            GroupKind::Needles | GroupKind::OrnamentSpheres => (),
        }
    }
}
