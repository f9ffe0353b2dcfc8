//! Tuning parameters for the trail effect.
//!
//! Every value that shapes the effect lives here rather than in the update
//! code. The two presets mirror the desktop (mouse) and mobile (touch) tuning;
//! callers that want something else start from a preset and override fields,
//! then call [`TrailConfig::validate`].

use crate::constants::*;
use crate::error::ConfigError;
use std::time::Duration;

/// Input device class the effect is tuned for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Profile {
    #[default]
    Desktop,
    Mobile,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrailConfig {
    pub profile: Profile,

    pub history_capacity: usize,
    pub history_max_age: Duration,
    pub history_render_count: usize,

    pub particle_capacity: usize,
    pub particle_render_count: usize,

    pub speed_threshold: f32,
    pub speed_per_particle: f32,
    pub max_particles_per_sample: usize,
    pub position_jitter: f32,
    pub velocity_scale: f32,
    pub velocity_jitter: f32,

    pub drag: f32,
    pub gravity: f32,
    pub life_decay: f32,

    pub idle_after_move: Duration,
    pub idle_after_touch_end: Duration,

    pub marker_size: f32,
}

impl TrailConfig {
    pub fn desktop() -> Self {
        Self {
            profile: Profile::Desktop,
            history_capacity: HISTORY_CAPACITY,
            history_max_age: Duration::from_secs_f32(HISTORY_MAX_AGE_SEC),
            history_render_count: HISTORY_RENDER_COUNT,
            particle_capacity: PARTICLE_CAPACITY,
            particle_render_count: PARTICLE_RENDER_COUNT,
            speed_threshold: SPEED_THRESHOLD_DESKTOP,
            speed_per_particle: SPEED_PER_PARTICLE_DESKTOP,
            max_particles_per_sample: MAX_PARTICLES_PER_SAMPLE_DESKTOP,
            position_jitter: POSITION_JITTER_DESKTOP,
            velocity_scale: EMIT_VELOCITY_SCALE,
            velocity_jitter: EMIT_VELOCITY_JITTER,
            drag: PARTICLE_DRAG,
            gravity: PARTICLE_GRAVITY,
            life_decay: PARTICLE_LIFE_DECAY,
            idle_after_move: Duration::from_millis(IDLE_AFTER_MOVE_MS),
            idle_after_touch_end: Duration::from_millis(IDLE_AFTER_TOUCH_END_MS),
            marker_size: MARKER_SIZE_DESKTOP,
        }
    }

    pub fn mobile() -> Self {
        Self {
            profile: Profile::Mobile,
            speed_threshold: SPEED_THRESHOLD_MOBILE,
            speed_per_particle: SPEED_PER_PARTICLE_MOBILE,
            max_particles_per_sample: MAX_PARTICLES_PER_SAMPLE_MOBILE,
            position_jitter: POSITION_JITTER_MOBILE,
            marker_size: MARKER_SIZE_MOBILE,
            ..Self::desktop()
        }
    }

    pub fn for_profile(profile: Profile) -> Self {
        match profile {
            Profile::Desktop => Self::desktop(),
            Profile::Mobile => Self::mobile(),
        }
    }

    /// Check the invariants the tracker and emitter rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("history_capacity", self.history_capacity),
            ("particle_capacity", self.particle_capacity),
            ("max_particles_per_sample", self.max_particles_per_sample),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroCapacity { name });
            }
        }
        if self.history_max_age.is_zero() {
            return Err(ConfigError::ZeroCapacity {
                name: "history_max_age",
            });
        }
        for (name, value) in [
            ("speed_per_particle", self.speed_per_particle),
            ("marker_size", self.marker_size),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }
        for (name, value) in [
            ("speed_threshold", self.speed_threshold),
            ("position_jitter", self.position_jitter),
            ("velocity_scale", self.velocity_scale),
            ("velocity_jitter", self.velocity_jitter),
            ("gravity", self.gravity),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Negative { name, value });
            }
        }
        if !(self.drag > 0.0 && self.drag < 1.0) {
            return Err(ConfigError::Drag(self.drag));
        }
        if !(self.life_decay > 0.0 && self.life_decay <= 1.0) {
            return Err(ConfigError::LifeDecay(self.life_decay));
        }
        Ok(())
    }
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self::desktop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        assert_eq!(TrailConfig::desktop().validate(), Ok(()));
        assert_eq!(TrailConfig::mobile().validate(), Ok(()));
    }

    #[test]
    fn mobile_is_more_sensitive_but_emits_less() {
        let d = TrailConfig::desktop();
        let m = TrailConfig::mobile();
        assert!(m.speed_threshold < d.speed_threshold);
        assert!(m.max_particles_per_sample < d.max_particles_per_sample);
        assert_eq!(m.particle_capacity, d.particle_capacity);
        assert_eq!(m.profile, Profile::Mobile);
    }

    #[test]
    fn rejects_zero_capacity() {
        let cfg = TrailConfig {
            particle_capacity: 0,
            ..TrailConfig::desktop()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::ZeroCapacity {
                name: "particle_capacity"
            })
        );
    }

    #[test]
    fn rejects_drag_that_does_not_damp() {
        let cfg = TrailConfig {
            drag: 1.0,
            ..TrailConfig::desktop()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::Drag(1.0)));
    }

    #[test]
    fn rejects_non_decaying_life() {
        let cfg = TrailConfig {
            life_decay: 0.0,
            ..TrailConfig::desktop()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::LifeDecay(0.0)));
    }

    #[test]
    fn rejects_nan_threshold() {
        let cfg = TrailConfig {
            speed_threshold: f32::NAN,
            ..TrailConfig::desktop()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Negative {
                name: "speed_threshold",
                ..
            })
        ));
    }
}
