use crate::config::TrailConfig;
use crate::ring::RingBuffer;
use glam::Vec2;
use rand::prelude::*;

/// A short-lived decorative point thrown off by fast pointer movement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Remaining life in (0, 1]. Starts at 1.
    pub life: f32,
    /// Unique per emitter; stable render key.
    pub id: u64,
}

/// Bounded particle pool with fixed-step Euler integration.
pub struct ParticleEmitter {
    particles: RingBuffer<Particle>,
    next_id: u64,
    rng: StdRng,

    position_jitter: f32,
    velocity_jitter: f32,
    drag: f32,
    gravity: f32,
    life_decay: f32,
}

impl ParticleEmitter {
    pub fn new(cfg: &TrailConfig) -> Self {
        Self::with_rng(cfg, StdRng::from_entropy())
    }

    /// Deterministic emitter for reproducible jitter.
    pub fn with_seed(cfg: &TrailConfig, seed: u64) -> Self {
        Self::with_rng(cfg, StdRng::seed_from_u64(seed))
    }

    fn with_rng(cfg: &TrailConfig, rng: StdRng) -> Self {
        Self {
            particles: RingBuffer::with_capacity(cfg.particle_capacity),
            next_id: 0,
            rng,
            position_jitter: cfg.position_jitter,
            velocity_jitter: cfg.velocity_jitter,
            drag: cfg.drag,
            gravity: cfg.gravity,
            life_decay: cfg.life_decay,
        }
    }

    /// Adopt `cfg`'s pool size and physics. Live particles and ids carry over.
    pub fn reconfigure(&mut self, cfg: &TrailConfig) {
        self.particles.set_capacity(cfg.particle_capacity);
        self.position_jitter = cfg.position_jitter;
        self.velocity_jitter = cfg.velocity_jitter;
        self.drag = cfg.drag;
        self.gravity = cfg.gravity;
        self.life_decay = cfg.life_decay;
    }

    /// Spawn `count` particles around `origin`. Overflow drops the oldest.
    pub fn emit(&mut self, origin: Vec2, base_velocity: Vec2, count: usize) {
        for _ in 0..count {
            let offset = self.jitter(self.position_jitter);
            let spread = self.jitter(self.velocity_jitter);
            let id = self.next_id;
            self.next_id += 1;
            self.particles.push(Particle {
                position: origin + offset,
                velocity: base_velocity + spread,
                life: 1.0,
                id,
            });
        }
    }

    /// Uniform offset in `[-width/2, width/2)` on both axes.
    fn jitter(&mut self, width: f32) -> Vec2 {
        if width <= 0.0 {
            return Vec2::ZERO;
        }
        let x: f32 = self.rng.gen::<f32>() - 0.5;
        let y: f32 = self.rng.gen::<f32>() - 0.5;
        Vec2::new(x, y) * width
    }

    /// Advance every particle by one frame and drop the expired ones.
    pub fn integrate_step(&mut self) {
        let (drag, gravity, decay) = (self.drag, self.gravity, self.life_decay);
        for p in self.particles.iter_mut() {
            p.position += p.velocity;
            p.velocity *= drag;
            p.velocity.y += gravity;
            p.life -= decay;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    pub fn particles(&self) -> &RingBuffer<Particle> {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emitter() -> ParticleEmitter {
        ParticleEmitter::with_seed(&TrailConfig::desktop(), 7)
    }

    #[test]
    fn spawn_stays_within_jitter() {
        let mut e = emitter();
        let origin = Vec2::new(100.0, 50.0);
        let base = Vec2::new(2.0, -1.0);
        e.emit(origin, base, 5);
        assert_eq!(e.len(), 5);
        for p in e.particles().iter() {
            assert!((p.position - origin).abs().max_element() <= 5.0);
            assert!((p.velocity - base).abs().max_element() <= 1.0);
            assert_eq!(p.life, 1.0);
        }
    }

    #[test]
    fn ids_increase() {
        let mut e = emitter();
        e.emit(Vec2::ZERO, Vec2::ZERO, 3);
        e.emit(Vec2::ZERO, Vec2::ZERO, 2);
        let ids: Vec<u64> = e.particles().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn overflow_drops_oldest() {
        let mut e = emitter();
        for _ in 0..12 {
            e.emit(Vec2::ZERO, Vec2::ZERO, 5);
        }
        assert_eq!(e.len(), 50);
        assert_eq!(e.particles().oldest().unwrap().id, 10);
        assert_eq!(e.particles().latest().unwrap().id, 59);
    }

    #[test]
    fn one_step_applies_drag_and_gravity() {
        let cfg = TrailConfig {
            position_jitter: 0.0,
            velocity_jitter: 0.0,
            ..TrailConfig::desktop()
        };
        let mut e = ParticleEmitter::with_seed(&cfg, 1);
        e.emit(Vec2::new(10.0, 10.0), Vec2::new(1.0, 2.0), 1);
        e.integrate_step();
        let p = *e.particles().latest().unwrap();
        assert_eq!(p.position, Vec2::new(11.0, 12.0));
        assert!((p.velocity.x - 0.98).abs() < 1e-6);
        assert!((p.velocity.y - (2.0 * 0.98 + 0.1)).abs() < 1e-6);
        assert!((p.life - 0.98).abs() < 1e-6);
    }

    #[test]
    fn reconfigure_keeps_ids_and_newest() {
        let mut e = emitter();
        e.emit(Vec2::ZERO, Vec2::ZERO, 10);
        let cfg = TrailConfig {
            particle_capacity: 4,
            ..TrailConfig::mobile()
        };
        e.reconfigure(&cfg);
        assert_eq!(e.len(), 4);
        assert_eq!(e.particles().oldest().unwrap().id, 6);
        e.emit(Vec2::ZERO, Vec2::ZERO, 1);
        assert_eq!(e.particles().latest().unwrap().id, 10);
        assert_eq!(e.len(), 4);
    }

    #[test]
    fn everything_expires() {
        let mut e = emitter();
        e.emit(Vec2::ZERO, Vec2::ZERO, 5);
        for _ in 0..60 {
            e.integrate_step();
        }
        assert!(e.is_empty());
    }
}
