use thiserror::Error;

/// Rejected [`TrailConfig`](crate::TrailConfig) values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be greater than zero")]
    ZeroCapacity { name: &'static str },
    #[error("{name} must be finite and non-negative, got {value}")]
    Negative { name: &'static str, value: f32 },
    #[error("{name} must be finite and positive, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("drag must lie in (0, 1), got {0}")]
    Drag(f32),
    #[error("life decay must lie in (0, 1], got {0}")]
    LifeDecay(f32),
}

/// Unknown cursor variant name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown cursor variant `{0}` (expected default, text, hover or click)")]
pub struct ParseVariantError(pub String);
