//! The cursor trail as a whole: tracker, emitter, marker and frame driving.

use crate::config::{Profile, TrailConfig};
use crate::constants::*;
use crate::error::ConfigError;
use crate::particles::ParticleEmitter;
use crate::schedule::{FrameLoop, FrameScheduler};
use crate::tracker::PointerTracker;
use crate::variant::{CursorVariant, MarkerAnimator, MarkerStyle};
use glam::Vec2;
use smallvec::SmallVec;
use std::time::Duration;

/// Render geometry for one history sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HistoryDot {
    pub position: Vec2,
    pub timestamp: Duration,
    /// Position within the drawn window, oldest first.
    pub index: usize,
    pub size: f32,
    pub life: f32,
    pub opacity: f32,
    pub glow: f32,
    pub blur: f32,
    pub scale: f32,
}

/// Render geometry for one particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleDot {
    pub id: u64,
    pub position: Vec2,
    pub size: f32,
    pub life: f32,
    pub opacity: f32,
    pub glow: f32,
}

/// Everything the host needs to draw one frame.
#[derive(Clone, Debug)]
pub struct FrameSnapshot {
    pub position: Vec2,
    pub rotation_deg: f32,
    pub variant: CursorVariant,
    pub marker: MarkerStyle,
    pub marker_size: f32,
    pub moving: bool,
    pub touching: bool,
    pub history: SmallVec<[HistoryDot; HISTORY_RENDER_COUNT]>,
    pub particles: SmallVec<[ParticleDot; PARTICLE_RENDER_COUNT]>,
}

pub struct CursorEffect {
    cfg: TrailConfig,
    tracker: PointerTracker,
    emitter: ParticleEmitter,
    variant: CursorVariant,
    touching: bool,
    animator: MarkerAnimator,
    last_advance: Option<Duration>,
}

impl CursorEffect {
    pub fn new(cfg: TrailConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let emitter = ParticleEmitter::new(&cfg);
        Ok(Self::build(cfg, emitter))
    }

    /// Same as [`CursorEffect::new`] with reproducible particle jitter.
    pub fn with_seed(cfg: TrailConfig, seed: u64) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let emitter = ParticleEmitter::with_seed(&cfg, seed);
        Ok(Self::build(cfg, emitter))
    }

    fn build(cfg: TrailConfig, emitter: ParticleEmitter) -> Self {
        let marker = MarkerStyle::target(
            CursorVariant::Default,
            cfg.profile,
            cfg.marker_size,
            false,
            0.0,
        );
        Self {
            tracker: PointerTracker::new(&cfg),
            emitter,
            variant: CursorVariant::Default,
            touching: false,
            animator: MarkerAnimator::new(marker),
            last_advance: None,
            cfg,
        }
    }

    /// Record a pointer sample and emit the burst it triggers.
    ///
    /// Returns the number of particles spawned.
    pub fn pointer_moved(&mut self, x: f32, y: f32, now: Duration) -> usize {
        match self.tracker.record_sample(x, y, now) {
            Some(e) => {
                self.emitter.emit(e.origin, e.base_velocity, e.count);
                log::trace!("[trail] burst of {} at ({:.0},{:.0})", e.count, x, y);
                e.count
            }
            None => 0,
        }
    }

    pub fn touch_started(&mut self, x: f32, y: f32, now: Duration) -> usize {
        self.touching = true;
        self.pointer_moved(x, y, now)
    }

    pub fn touch_ended(&mut self, now: Duration) {
        self.touching = false;
        self.tracker.touch_ended(now);
    }

    /// One animation frame: integrate particles, prune stale history, spring the marker.
    pub fn advance(&mut self, now: Duration) {
        self.emitter.integrate_step();
        self.tracker.prune(now);

        let dt = match self.last_advance {
            Some(prev) => now.saturating_sub(prev).as_secs_f32(),
            None => 0.0,
        };
        self.last_advance = Some(now);
        let target = self.target_marker();
        self.animator.update(target, self.variant.spring(), dt);
    }

    fn target_marker(&self) -> MarkerStyle {
        MarkerStyle::target(
            self.variant,
            self.cfg.profile,
            self.cfg.marker_size,
            self.touching,
            self.tracker.rotation_degrees(),
        )
    }

    pub fn snapshot(&self, now: Duration) -> FrameSnapshot {
        let max_age = self.cfg.history_max_age.as_secs_f32();
        let history = self
            .tracker
            .points()
            .newest(self.cfg.history_render_count)
            .enumerate()
            .map(|(index, p)| {
                let age = now.saturating_sub(p.timestamp).as_secs_f32();
                let life = (1.0 - age / max_age).max(0.0);
                HistoryDot {
                    position: p.position,
                    timestamp: p.timestamp,
                    index,
                    size: HISTORY_DOT_BASE_SIZE + index as f32 * HISTORY_DOT_SIZE_STEP,
                    life,
                    opacity: life * HISTORY_DOT_OPACITY,
                    glow: life * HISTORY_DOT_GLOW,
                    blur: (1.0 - life) * HISTORY_DOT_BLUR,
                    scale: life * HISTORY_DOT_SCALE,
                }
            })
            .collect();
        let particles = self
            .emitter
            .particles()
            .newest(self.cfg.particle_render_count)
            .map(|p| {
                let life = p.life.max(0.0);
                ParticleDot {
                    id: p.id,
                    position: p.position,
                    size: PARTICLE_DOT_SIZE,
                    life,
                    opacity: life * PARTICLE_DOT_OPACITY,
                    glow: life * PARTICLE_DOT_GLOW,
                }
            })
            .collect();
        FrameSnapshot {
            position: self.tracker.position(),
            rotation_deg: self.tracker.rotation_degrees(),
            variant: self.variant,
            marker: self.animator.current(),
            marker_size: self.cfg.marker_size,
            moving: self.tracker.is_moving(now),
            touching: self.touching,
            history,
            particles,
        }
    }

    /// Swap in a new configuration without losing the trail on screen.
    ///
    /// `cfg` is validated first; on error nothing changes.
    pub fn reconfigure(&mut self, cfg: TrailConfig) -> Result<(), ConfigError> {
        cfg.validate()?;
        self.tracker.reconfigure(&cfg);
        self.emitter.reconfigure(&cfg);
        self.cfg = cfg;
        Ok(())
    }

    pub fn set_variant(&mut self, variant: CursorVariant) {
        self.variant = variant;
    }

    /// Pointer entered a text region.
    pub fn cursor_enter(&mut self) {
        self.variant = CursorVariant::Text;
    }

    pub fn cursor_leave(&mut self) {
        self.variant = CursorVariant::Default;
    }

    pub fn variant(&self) -> CursorVariant {
        self.variant
    }

    pub fn rotation_degrees(&self) -> f32 {
        self.tracker.rotation_degrees()
    }

    pub fn config(&self) -> &TrailConfig {
        &self.cfg
    }

    pub fn tracker(&self) -> &PointerTracker {
        &self.tracker
    }

    pub fn emitter(&self) -> &ParticleEmitter {
        &self.emitter
    }

    pub fn reset(&mut self) {
        self.tracker.clear();
        self.emitter.clear();
        self.touching = false;
    }
}

/// A [`CursorEffect`] bound to a frame loop with one-way teardown.
///
/// After [`EffectDriver::teardown`] no input is recorded and no frame runs or
/// gets requested.
pub struct EffectDriver<S: FrameScheduler> {
    effect: CursorEffect,
    frame_loop: FrameLoop<S>,
}

impl<S: FrameScheduler> EffectDriver<S> {
    /// Bind `effect` to `scheduler`. No frame is requested until [`EffectDriver::start`].
    pub fn new(effect: CursorEffect, scheduler: S) -> Self {
        Self {
            effect,
            frame_loop: FrameLoop::new(scheduler),
        }
    }

    /// Request the first frame. No-op while armed or after teardown.
    pub fn start(&mut self) {
        if self.is_live() && !self.frame_loop.is_armed() {
            log::debug!("[trail] driver started ({:?})", self.effect.config().profile);
        }
        self.frame_loop.start();
    }

    /// Returns the particles spawned, or `None` once torn down.
    pub fn pointer_moved(&mut self, x: f32, y: f32, now: Duration) -> Option<usize> {
        self.is_live()
            .then(|| self.effect.pointer_moved(x, y, now))
    }

    pub fn touch_started(&mut self, x: f32, y: f32, now: Duration) -> Option<usize> {
        self.is_live()
            .then(|| self.effect.touch_started(x, y, now))
    }

    pub fn touch_ended(&mut self, now: Duration) {
        if self.is_live() {
            self.effect.touch_ended(now);
        }
    }

    /// Frame callback: advance, snapshot and re-arm. `None` once torn down.
    pub fn frame(&mut self, now: Duration) -> Option<FrameSnapshot> {
        let mut snap = None;
        let effect = &mut self.effect;
        self.frame_loop.on_frame(|| {
            effect.advance(now);
            snap = Some(effect.snapshot(now));
        });
        snap
    }

    /// Re-tune for `profile` when it differs from the current one.
    ///
    /// Returns `Ok(true)` if the configuration was replaced; `Ok(false)` when
    /// the profile is unchanged or the driver has been torn down.
    pub fn switch_profile(&mut self, profile: Profile) -> Result<bool, ConfigError> {
        if !self.is_live() || self.effect.config().profile == profile {
            return Ok(false);
        }
        self.effect.reconfigure(TrailConfig::for_profile(profile))?;
        log::info!("[trail] profile switched to {:?}", profile);
        Ok(true)
    }

    pub fn teardown(&mut self) {
        if self.is_live() {
            log::debug!("[trail] teardown");
        }
        self.frame_loop.stop();
        self.effect.reset();
    }

    pub fn is_live(&self) -> bool {
        self.frame_loop.is_running()
    }

    pub fn effect(&self) -> &CursorEffect {
        &self.effect
    }

    pub fn effect_mut(&mut self) -> &mut CursorEffect {
        &mut self.effect
    }

    pub fn frame_loop(&self) -> &FrameLoop<S> {
        &self.frame_loop
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn history_dots_fade_with_age() {
        let mut fx = CursorEffect::with_seed(TrailConfig::desktop(), 3).unwrap();
        fx.pointer_moved(0.0, 0.0, ms(0));
        fx.pointer_moved(1.0, 0.0, ms(600));
        let snap = fx.snapshot(ms(600));
        assert_eq!(snap.history.len(), 2);
        let old = snap.history[0];
        let new = snap.history[1];
        assert!((old.life - 0.5).abs() < 1e-4);
        assert_eq!(new.life, 1.0);
        assert_eq!(old.size, 3.0);
        assert_eq!(new.size, 3.25);
        assert!((old.blur - 0.6).abs() < 1e-4);
        assert_eq!(new.opacity, 0.5);
    }

    #[test]
    fn only_newest_dots_are_drawn() {
        let mut fx = CursorEffect::with_seed(TrailConfig::desktop(), 3).unwrap();
        for i in 0..40 {
            fx.pointer_moved(i as f32 * 100.0, 0.0, ms(i));
        }
        let snap = fx.snapshot(ms(40));
        assert_eq!(snap.history.len(), HISTORY_RENDER_COUNT);
        assert_eq!(snap.particles.len(), PARTICLE_RENDER_COUNT);
        assert_eq!(fx.emitter().len(), PARTICLE_CAPACITY);
        let last_id = fx.emitter().particles().latest().unwrap().id;
        assert_eq!(snap.particles.last().unwrap().id, last_id);
    }

    #[test]
    fn enter_and_leave_switch_variant() {
        let mut fx = CursorEffect::with_seed(TrailConfig::desktop(), 3).unwrap();
        fx.cursor_enter();
        assert_eq!(fx.variant(), CursorVariant::Text);
        fx.cursor_leave();
        assert_eq!(fx.variant(), CursorVariant::Default);
    }

    #[test]
    fn non_finite_pointer_keeps_marker_finite() {
        let mut fx = CursorEffect::with_seed(TrailConfig::desktop(), 3).unwrap();
        fx.pointer_moved(10.0, 10.0, ms(0));
        fx.pointer_moved(40.0, 10.0, ms(16));
        assert_eq!(fx.pointer_moved(f32::NAN, f32::NAN, ms(32)), 0);
        fx.advance(ms(48));
        fx.advance(ms(64));
        let snap = fx.snapshot(ms(64));
        assert_eq!(snap.position, Vec2::new(40.0, 10.0));
        assert!(snap.rotation_deg.is_finite());
        assert!(snap.marker.rotation_deg.is_finite());
        assert!(snap.marker.scale.is_finite());
    }

    #[test]
    fn bad_reconfigure_leaves_config_alone() {
        let mut fx = CursorEffect::with_seed(TrailConfig::desktop(), 3).unwrap();
        let cfg = TrailConfig {
            drag: 2.0,
            ..TrailConfig::mobile()
        };
        assert!(fx.reconfigure(cfg).is_err());
        assert_eq!(fx.config().profile, Profile::Desktop);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = TrailConfig {
            history_capacity: 0,
            ..TrailConfig::desktop()
        };
        assert!(CursorEffect::new(cfg).is_err());
    }
}
