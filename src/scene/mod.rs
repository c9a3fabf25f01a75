//! The orbital scene model: a clock, a tree of celestial bodies, and the
//! composer that walks them once per frame.
//!
//! Everything in here is renderer-agnostic. The gui module adapts the
//! composer's draw submissions onto kiss3d; tests drive them into recording
//! stubs instead.

use thiserror::Error;

pub mod belt;
pub mod body;
pub mod clock;
pub mod composer;
pub mod params;

pub use body::{BodyKind, OrbitalBody, RingSpec, Surface};
pub use clock::SimClock;
pub use composer::{
    BeltDraw, BodyDraw, DrawTarget, LightUniforms, PathDraw, RingDraw, SceneComposer,
};
pub use params::OrbitalParameters;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("body {name:?} has a zero {which} period")]
    ZeroPeriod { name: String, which: &'static str },

    #[error("star {name:?} must sit at the scene origin (distance was {distance})")]
    StarNotAtOrigin { name: String, distance: f64 },

    #[error("duplicate body name {0:?}")]
    DuplicateName(String),

    #[error("no body named {0:?} in the scene")]
    UnknownBody(String),

    #[error("scene needs exactly one star, found {0}")]
    WrongStarCount(usize),
}
