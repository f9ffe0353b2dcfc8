pub mod clock;
pub mod config;
pub mod constants;
pub mod effect;
pub mod error;
pub mod particles;
pub mod ring;
pub mod schedule;
pub mod tracker;
pub mod variant;

pub use clock::Clock;
pub use config::*;
pub use effect::*;
pub use error::*;
pub use particles::*;
pub use ring::RingBuffer;
pub use schedule::*;
pub use tracker::*;
pub use variant::*;
