//! Pointer motion history.
//!
//! The tracker turns raw pointer coordinates into timestamped samples with a
//! per-sample velocity. The newest sample orients the marker; fast samples ask
//! the emitter for a burst of particles.

use crate::config::TrailConfig;
use crate::ring::RingBuffer;
use glam::Vec2;
use std::time::Duration;

/// One recorded pointer sample. Immutable once stored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailPoint {
    pub position: Vec2,
    /// Monotonic time since the effect's clock origin.
    pub timestamp: Duration,
    /// Delta from the previous sample's position.
    pub velocity: Vec2,
}

/// Particles requested by a fast pointer sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Emission {
    pub origin: Vec2,
    pub base_velocity: Vec2,
    pub count: usize,
}

pub struct PointerTracker {
    history: RingBuffer<TrailPoint>,
    last_position: Option<Vec2>,
    idle_at: Option<Duration>,

    max_age: Duration,
    speed_threshold: f32,
    speed_per_particle: f32,
    max_particles_per_sample: usize,
    velocity_scale: f32,
    idle_after_move: Duration,
    idle_after_touch_end: Duration,
}

impl PointerTracker {
    pub fn new(cfg: &TrailConfig) -> Self {
        let mut tracker = Self {
            history: RingBuffer::with_capacity(cfg.history_capacity),
            last_position: None,
            idle_at: None,
            max_age: cfg.history_max_age,
            speed_threshold: 0.0,
            speed_per_particle: 0.0,
            max_particles_per_sample: 1,
            velocity_scale: 0.0,
            idle_after_move: cfg.idle_after_move,
            idle_after_touch_end: cfg.idle_after_touch_end,
        };
        tracker.apply_tuning(cfg);
        tracker
    }

    /// Switch to `cfg`'s tuning, keeping the newest samples that still fit.
    pub fn reconfigure(&mut self, cfg: &TrailConfig) {
        self.history.set_capacity(cfg.history_capacity);
        self.apply_tuning(cfg);
    }

    fn apply_tuning(&mut self, cfg: &TrailConfig) {
        self.max_age = cfg.history_max_age;
        self.speed_threshold = cfg.speed_threshold;
        self.speed_per_particle = cfg.speed_per_particle;
        // A zero cap would make every burst empty; keep at least one.
        self.max_particles_per_sample = cfg.max_particles_per_sample.max(1);
        self.velocity_scale = cfg.velocity_scale;
        self.idle_after_move = cfg.idle_after_move;
        self.idle_after_touch_end = cfg.idle_after_touch_end;
    }

    /// Record a pointer sample at `now`.
    ///
    /// Returns the burst to emit when the sample's speed exceeds the threshold.
    /// A `now` earlier than the newest stored timestamp is clamped to it so the
    /// history stays ordered. Non-finite coordinates are ignored.
    pub fn record_sample(&mut self, x: f32, y: f32, now: Duration) -> Option<Emission> {
        let position = Vec2::new(x, y);
        if !position.is_finite() {
            return None;
        }
        let velocity = match self.last_position {
            Some(prev) => position - prev,
            None => Vec2::ZERO,
        };
        let timestamp = match self.history.latest() {
            Some(p) if p.timestamp > now => p.timestamp,
            _ => now,
        };
        self.history.push(TrailPoint {
            position,
            timestamp,
            velocity,
        });
        self.last_position = Some(position);
        self.idle_at = Some(timestamp + self.idle_after_move);

        let speed = velocity.length();
        if speed > self.speed_threshold {
            Some(Emission {
                origin: position,
                base_velocity: velocity * self.velocity_scale,
                count: self.burst_size(speed),
            })
        } else {
            None
        }
    }

    /// Particles for a sample moving at `speed`: proportional, at least one, capped.
    #[inline]
    pub fn burst_size(&self, speed: f32) -> usize {
        let n = (speed / self.speed_per_particle).floor() as usize;
        n.max(1).min(self.max_particles_per_sample)
    }

    /// Remove every sample older than the configured max age.
    pub fn prune(&mut self, now: Duration) -> usize {
        let max_age = self.max_age;
        self.history
            .drop_oldest_while(|p| now.saturating_sub(p.timestamp) > max_age)
    }

    /// Heading of the newest sample in degrees; 0 without at least two samples.
    pub fn rotation_degrees(&self) -> f32 {
        if self.history.len() < 2 {
            return 0.0;
        }
        match self.history.latest() {
            Some(p) if p.velocity != Vec2::ZERO && p.velocity.is_finite() => {
                p.velocity.y.atan2(p.velocity.x).to_degrees()
            }
            _ => 0.0,
        }
    }

    /// Extend the idle deadline after the finger lifts.
    pub fn touch_ended(&mut self, now: Duration) {
        self.idle_at = Some(now + self.idle_after_touch_end);
    }

    pub fn is_moving(&self, now: Duration) -> bool {
        self.idle_at.is_some_and(|t| now < t)
    }

    pub fn position(&self) -> Vec2 {
        self.last_position.unwrap_or(Vec2::ZERO)
    }

    pub fn points(&self) -> &RingBuffer<TrailPoint> {
        &self.history
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.last_position = None;
        self.idle_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn first_sample_has_no_velocity() {
        let mut t = PointerTracker::new(&TrailConfig::desktop());
        assert_eq!(t.record_sample(400.0, 300.0, ms(0)), None);
        let p = t.points().latest().copied().unwrap();
        assert_eq!(p.velocity, Vec2::ZERO);
        assert_eq!(t.position(), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn velocity_is_delta_from_previous() {
        let mut t = PointerTracker::new(&TrailConfig::desktop());
        t.record_sample(1.0, 1.0, ms(0));
        t.record_sample(4.0, 5.0, ms(16));
        assert_eq!(t.points().latest().unwrap().velocity, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn burst_size_is_capped_and_at_least_one() {
        let t = PointerTracker::new(&TrailConfig::desktop());
        assert_eq!(t.burst_size(5.5), 1);
        assert_eq!(t.burst_size(29.0), 2);
        assert_eq!(t.burst_size(10_000.0), 5);
    }

    #[test]
    fn emission_inherits_scaled_velocity() {
        let mut t = PointerTracker::new(&TrailConfig::desktop());
        t.record_sample(0.0, 0.0, ms(0));
        let e = t.record_sample(30.0, 40.0, ms(16)).unwrap();
        assert_eq!(e.origin, Vec2::new(30.0, 40.0));
        assert!((e.base_velocity - Vec2::new(3.0, 4.0)).length() < 1e-5);
        assert_eq!(e.count, 5);
    }

    #[test]
    fn out_of_order_timestamp_is_clamped() {
        let mut t = PointerTracker::new(&TrailConfig::desktop());
        t.record_sample(0.0, 0.0, ms(100));
        t.record_sample(1.0, 0.0, ms(50));
        let stamps: Vec<_> = t.points().iter().map(|p| p.timestamp).collect();
        assert_eq!(stamps, vec![ms(100), ms(100)]);
    }

    #[test]
    fn moving_until_idle_timeout() {
        let cfg = TrailConfig::desktop();
        let mut t = PointerTracker::new(&cfg);
        assert!(!t.is_moving(ms(0)));
        t.record_sample(0.0, 0.0, ms(1000));
        assert!(t.is_moving(ms(1100)));
        assert!(!t.is_moving(ms(1000) + cfg.idle_after_move));
        t.touch_ended(ms(1200));
        assert!(t.is_moving(ms(1450)));
        assert!(!t.is_moving(ms(1500)));
    }

    #[test]
    fn zero_burst_cap_still_records() {
        let cfg = TrailConfig {
            max_particles_per_sample: 0,
            ..TrailConfig::desktop()
        };
        let mut t = PointerTracker::new(&cfg);
        t.record_sample(0.0, 0.0, ms(0));
        let e = t.record_sample(100.0, 0.0, ms(16)).unwrap();
        assert_eq!(e.count, 1);
        assert_eq!(t.burst_size(f32::INFINITY), 1);
        assert_eq!(t.burst_size(f32::NAN), 1);
    }

    #[test]
    fn non_finite_samples_are_ignored() {
        let mut t = PointerTracker::new(&TrailConfig::desktop());
        t.record_sample(10.0, 10.0, ms(0));
        t.record_sample(13.0, 14.0, ms(16));
        assert_eq!(t.record_sample(f32::NAN, 14.0, ms(32)), None);
        assert_eq!(t.record_sample(0.0, f32::INFINITY, ms(48)), None);
        assert_eq!(t.points().len(), 2);
        assert_eq!(t.position(), Vec2::new(13.0, 14.0));
        assert!((t.rotation_degrees() - 53.130_1).abs() < 1e-3);
    }

    #[test]
    fn reconfigure_keeps_newest_history() {
        let mut t = PointerTracker::new(&TrailConfig::desktop());
        for i in 0..20 {
            t.record_sample(i as f32, 0.0, ms(i));
        }
        let cfg = TrailConfig {
            history_capacity: 5,
            ..TrailConfig::mobile()
        };
        t.reconfigure(&cfg);
        assert_eq!(t.points().len(), 5);
        assert_eq!(t.points().oldest().unwrap().position.x, 15.0);
        // mobile threshold is 3
        assert!(t.record_sample(23.5, 0.0, ms(30)).is_some());
    }

    #[test]
    fn clear_forgets_everything() {
        let mut t = PointerTracker::new(&TrailConfig::desktop());
        t.record_sample(0.0, 0.0, ms(0));
        t.record_sample(10.0, 0.0, ms(10));
        t.clear();
        assert!(t.points().is_empty());
        assert_eq!(t.rotation_degrees(), 0.0);
        assert_eq!(t.record_sample(50.0, 0.0, ms(20)), None);
    }
}
