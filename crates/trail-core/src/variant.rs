//! Marker appearance per cursor variant.
//!
//! The page switches the variant when the pointer enters text, hovers a link
//! or presses. Each variant has a target [`MarkerStyle`]; [`MarkerAnimator`]
//! springs the displayed style toward it while position follows the pointer
//! without lag.

use crate::config::Profile;
use crate::error::ParseVariantError;
use glam::Vec2;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CursorVariant {
    #[default]
    Default,
    Text,
    Hover,
    Click,
}

impl CursorVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            CursorVariant::Default => "default",
            CursorVariant::Text => "text",
            CursorVariant::Hover => "hover",
            CursorVariant::Click => "click",
        }
    }

    /// Spring used when animating toward this variant.
    pub fn spring(self) -> Spring {
        match self {
            CursorVariant::Default => Spring::new(30.0, 400.0, 0.8),
            CursorVariant::Text => Spring::new(25.0, 300.0, 0.6),
            CursorVariant::Hover => Spring::new(20.0, 500.0, 0.5),
            CursorVariant::Click => Spring::new(40.0, 800.0, 0.3),
        }
    }
}

impl fmt::Display for CursorVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CursorVariant {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "default" => Ok(CursorVariant::Default),
            "text" => Ok(CursorVariant::Text),
            "hover" => Ok(CursorVariant::Hover),
            "click" => Ok(CursorVariant::Click),
            other => Err(ParseVariantError(other.to_string())),
        }
    }
}

/// Geometry of the cursor marker. The host draws a `size * scale` square at
/// `pointer - offset`, rounded by `corner_radius * size` and rotated about its centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerStyle {
    pub offset: Vec2,
    pub scale: f32,
    pub opacity: f32,
    pub rotation_deg: f32,
    /// Fraction of the marker size; 0.5 is a circle.
    pub corner_radius: f32,
}

impl MarkerStyle {
    /// Target style for `variant`. `rotation_deg` is the trail heading, used by `Text`.
    pub fn target(
        variant: CursorVariant,
        profile: Profile,
        marker_size: f32,
        touching: bool,
        rotation_deg: f32,
    ) -> Self {
        let mobile = profile == Profile::Mobile;
        let pick = |m: f32, d: f32| if mobile { m } else { d };
        let touch = |t: f32, idle: f32| if touching { t } else { idle };
        match variant {
            CursorVariant::Default => Self {
                offset: Vec2::splat(marker_size / 2.0),
                scale: 1.0,
                opacity: pick(touch(0.8, 0.4), 0.9),
                rotation_deg: 0.0,
                corner_radius: 0.5,
            },
            CursorVariant::Text => Self {
                offset: Vec2::splat(pick(24.0, 20.0)),
                scale: pick(1.4, 1.8),
                opacity: pick(touch(0.7, 0.3), 0.6),
                rotation_deg,
                corner_radius: 0.3,
            },
            CursorVariant::Hover => Self {
                offset: Vec2::splat(pick(20.0, 16.0)),
                scale: pick(1.2, 1.4),
                opacity: pick(touch(0.9, 0.5), 0.8),
                rotation_deg: 0.0,
                corner_radius: 0.2,
            },
            CursorVariant::Click => Self {
                offset: Vec2::splat(pick(12.0, 8.0)),
                scale: pick(0.8, 0.6),
                opacity: 1.0,
                rotation_deg: 45.0,
                corner_radius: 0.1,
            },
        }
    }
}

/// Damped spring parameters: force = -stiffness * x - damping * v, a = force / mass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spring {
    pub damping: f32,
    pub stiffness: f32,
    pub mass: f32,
}

impl Spring {
    pub const fn new(damping: f32, stiffness: f32, mass: f32) -> Self {
        Self {
            damping,
            stiffness,
            mass,
        }
    }

    // Semi-implicit Euler; callers keep dt small enough to stay stable.
    #[inline]
    fn step(&self, value: &mut f32, velocity: &mut f32, target: f32, dt: f32) {
        let force = -self.stiffness * (*value - target) - self.damping * *velocity;
        *velocity += force / self.mass * dt;
        *value += *velocity * dt;
    }
}

const MAX_SUBSTEP_SEC: f32 = 1.0 / 240.0;
const MAX_FRAME_SEC: f32 = 0.1;

/// Springs the displayed marker style toward the current variant's target.
#[derive(Clone, Debug)]
pub struct MarkerAnimator {
    current: MarkerStyle,
    // scale, opacity, rotation, corner radius
    velocity: [f32; 4],
}

impl MarkerAnimator {
    pub fn new(initial: MarkerStyle) -> Self {
        Self {
            current: initial,
            velocity: [0.0; 4],
        }
    }

    pub fn current(&self) -> MarkerStyle {
        self.current
    }

    /// Advance by `dt_sec` toward `target` with `spring`. The offset snaps.
    pub fn update(&mut self, target: MarkerStyle, spring: Spring, dt_sec: f32) -> MarkerStyle {
        self.current.offset = target.offset;
        let dt = dt_sec.clamp(0.0, MAX_FRAME_SEC);
        let steps = (dt / MAX_SUBSTEP_SEC).ceil().max(1.0) as u32;
        let h = dt / steps as f32;
        let targets = [
            target.scale,
            target.opacity,
            target.rotation_deg,
            target.corner_radius,
        ];
        for _ in 0..steps {
            let c = &mut self.current;
            let values = [
                &mut c.scale,
                &mut c.opacity,
                &mut c.rotation_deg,
                &mut c.corner_radius,
            ];
            for ((value, vel), tgt) in values
                .into_iter()
                .zip(self.velocity.iter_mut())
                .zip(targets)
            {
                spring.step(value, vel, tgt, h);
            }
        }
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_names() {
        for v in [
            CursorVariant::Default,
            CursorVariant::Text,
            CursorVariant::Hover,
            CursorVariant::Click,
        ] {
            assert_eq!(v.as_str().parse::<CursorVariant>(), Ok(v));
        }
        assert_eq!(
            "spin".parse::<CursorVariant>(),
            Err(ParseVariantError("spin".into()))
        );
    }

    #[test]
    fn text_follows_trail_heading() {
        let s = MarkerStyle::target(CursorVariant::Text, Profile::Desktop, 12.0, false, 53.0);
        assert_eq!(s.rotation_deg, 53.0);
        assert_eq!(s.scale, 1.8);
        let d = MarkerStyle::target(CursorVariant::Default, Profile::Desktop, 12.0, false, 53.0);
        assert_eq!(d.rotation_deg, 0.0);
        assert_eq!(d.offset, Vec2::splat(6.0));
    }

    #[test]
    fn mobile_opacity_depends_on_touch() {
        let idle = MarkerStyle::target(CursorVariant::Hover, Profile::Mobile, 16.0, false, 0.0);
        let held = MarkerStyle::target(CursorVariant::Hover, Profile::Mobile, 16.0, true, 0.0);
        assert_eq!(idle.opacity, 0.5);
        assert_eq!(held.opacity, 0.9);
    }

    #[test]
    fn animator_settles_on_target() {
        let start = MarkerStyle::target(CursorVariant::Default, Profile::Desktop, 12.0, false, 0.0);
        let target = MarkerStyle::target(CursorVariant::Click, Profile::Desktop, 12.0, false, 0.0);
        let mut anim = MarkerAnimator::new(start);
        for _ in 0..120 {
            anim.update(target, CursorVariant::Click.spring(), 1.0 / 60.0);
        }
        let s = anim.current();
        assert_eq!(s.offset, target.offset);
        assert!((s.scale - target.scale).abs() < 1e-3);
        assert!((s.rotation_deg - 45.0).abs() < 1e-2);
        assert!((s.corner_radius - 0.1).abs() < 1e-3);
    }

    #[test]
    fn huge_frame_gap_stays_bounded() {
        let start = MarkerStyle::target(CursorVariant::Default, Profile::Desktop, 12.0, false, 0.0);
        let target = MarkerStyle::target(CursorVariant::Hover, Profile::Desktop, 12.0, false, 0.0);
        let mut anim = MarkerAnimator::new(start);
        let s = anim.update(target, CursorVariant::Hover.spring(), 30.0);
        assert!(s.scale.is_finite() && s.scale.abs() < 10.0);
    }
}
