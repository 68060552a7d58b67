use crate::config::SETTLE_EPSILON;

/// Exponential smoothing of `current` toward `target`.
///
/// The blend factor `speed * dt` is clamped to `[0, 1]`, so the result always
/// lies between `current` and `target` and never overshoots.
pub fn smooth_toward(current: f32, target: f32, speed: f32, dt: f32) -> f32 {
    if !dt.is_finite() {
        return current;
    }
    current + (target - current) * (speed * dt).clamp(0.0, 1.0)
}

pub fn target_for(is_formed: bool) -> f32 {
    if is_formed {
        1.0
    } else {
        0.0
    }
}

/// Scalar morph state of one group: 0 is scattered, 1 is formed.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Progress {
    value: f32,
    speed: f32,
}

impl Progress {
    pub fn new(speed: f32, value: f32) -> Self {
        Self {
            value: value.clamp(0.0, 1.0),
            speed,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_settled_at(&self, target: f32) -> bool {
        self.value == target
    }

    /// One frame of smoothing. Values within `SETTLE_EPSILON` of the target snap onto it.
    pub fn advance(self, target: f32, dt: f32) -> Self {
        let value = smooth_toward(self.value, target, self.speed, dt);
        let value = if (value - target).abs() <= SETTLE_EPSILON {
            target
        } else {
            value
        };
        Self {
            value: value.clamp(0.0, 1.0),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn rises_monotonically_to_formed() {
        let mut progress = Progress::new(1.5, 0.0);
        let mut ticks = 0;
        while !progress.is_settled_at(1.0) {
            let next = progress.advance(1.0, DT);
            assert!(next.value() > progress.value());
            assert!(next.value() <= 1.0);
            progress = next;
            ticks += 1;
            assert!(ticks < 10_000, "never settled");
        }
        assert_eq!(progress.value(), 1.0);
    }

    #[test]
    fn falls_monotonically_to_scattered() {
        let mut progress = Progress::new(2.0, 1.0);
        while !progress.is_settled_at(0.0) {
            let next = progress.advance(0.0, DT);
            assert!(next.value() < progress.value());
            assert!(next.value() >= 0.0);
            progress = next;
        }
    }

    #[test]
    fn reversal_mid_transition_does_not_snap() {
        let progress = Progress::new(1.2, 0.6);
        let next = progress.advance(0.0, DT);
        assert!(next.value() < 0.6);
        assert!(0.6 - next.value() < 0.6 * 1.2 * DT + 1e-6);
    }

    #[test]
    fn huge_step_lands_exactly_on_target() {
        let progress = Progress::new(1.0, 0.3).advance(1.0, 10.0);
        assert_eq!(progress.value(), 1.0);
    }

    #[test]
    fn degenerate_deltas_do_not_move_progress() {
        let progress = Progress::new(1.0, 0.4);
        assert_eq!(progress.advance(1.0, -1.0).value(), 0.4);
        assert_eq!(progress.advance(1.0, f32::NAN).value(), 0.4);
        assert_eq!(progress.advance(1.0, 0.0).value(), 0.4);
    }

    #[test]
    fn smoothing_never_passes_target() {
        assert_eq!(smooth_toward(2.0, 10.0, 5.0, 1.0), 10.0);
        let v = smooth_toward(2.0, 10.0, 1.0, 0.25);
        assert!((v - 4.0).abs() < 1e-6);
    }
}
