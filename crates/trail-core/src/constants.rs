// Trail tuning constants shared by both device profiles.
//
// Desktop and mobile values differ only where the effect is tuned for touch
// input; everything else is shared.

// Pointer history
pub const HISTORY_CAPACITY: usize = 20; // samples kept for orientation
pub const HISTORY_MAX_AGE_SEC: f32 = 1.2; // samples older than this are pruned
pub const HISTORY_RENDER_COUNT: usize = 10; // newest samples drawn as dots

// Particle pool
pub const PARTICLE_CAPACITY: usize = 50;
pub const PARTICLE_RENDER_COUNT: usize = 20;

// Emission (desktop / mobile)
pub const SPEED_THRESHOLD_DESKTOP: f32 = 5.0; // px per sample
pub const SPEED_THRESHOLD_MOBILE: f32 = 3.0;
pub const SPEED_PER_PARTICLE_DESKTOP: f32 = 10.0; // one particle per this much speed
pub const SPEED_PER_PARTICLE_MOBILE: f32 = 8.0;
pub const MAX_PARTICLES_PER_SAMPLE_DESKTOP: usize = 5;
pub const MAX_PARTICLES_PER_SAMPLE_MOBILE: usize = 3;
pub const POSITION_JITTER_DESKTOP: f32 = 10.0; // full width of the spawn square
pub const POSITION_JITTER_MOBILE: f32 = 8.0;

// Initial particle velocity
pub const EMIT_VELOCITY_SCALE: f32 = 0.1; // fraction of pointer velocity inherited
pub const EMIT_VELOCITY_JITTER: f32 = 2.0; // full width of the random spread

// Per-frame integration
pub const PARTICLE_DRAG: f32 = 0.98; // velocity multiplier (air resistance)
pub const PARTICLE_GRAVITY: f32 = 0.1; // added to vy every frame (screen y grows down)
pub const PARTICLE_LIFE_DECAY: f32 = 0.02; // life lost per frame

// Movement state
pub const IDLE_AFTER_MOVE_MS: u64 = 150;
pub const IDLE_AFTER_TOUCH_END_MS: u64 = 300;

// Render geometry
pub const HISTORY_DOT_BASE_SIZE: f32 = 3.0;
pub const HISTORY_DOT_SIZE_STEP: f32 = 0.25; // growth per newer sample
pub const HISTORY_DOT_OPACITY: f32 = 0.5;
pub const HISTORY_DOT_GLOW: f32 = 8.0;
pub const HISTORY_DOT_BLUR: f32 = 1.2;
pub const HISTORY_DOT_SCALE: f32 = 1.1;
pub const PARTICLE_DOT_SIZE: f32 = 6.0;
pub const PARTICLE_DOT_OPACITY: f32 = 0.8;
pub const PARTICLE_DOT_GLOW: f32 = 16.0;

// Marker size (px, before variant scale)
pub const MARKER_SIZE_DESKTOP: f32 = 12.0;
pub const MARKER_SIZE_MOBILE: f32 = 16.0;
