//! Confetti burst effect library
//!
//! Fans a configurable number of glyphs out from an origin point with drag,
//! gravity, and rotation, then fades them out.  Per-piece parameters are
//! drawn once ([`generator`]) and each frame is a closed-form function of
//! progress ([`motion`]); [`confetti::ConfettiPlugin`] runs it inside Bevy.

pub mod config;
pub mod confetti;
pub mod constants;
pub mod error;
pub mod generator;
pub mod graphics;
pub mod motion;
