//! Closed-form confetti motion.
//!
//! A piece's transform at normalised progress `t ∈ [0, 4]` is computed
//! directly from its [`ParticleParameters`]; there is no per-frame integration
//! state.  All displacements are in the container's y-down frame.
//!
//! | Term          | Formula                                              |
//! |---------------|------------------------------------------------------|
//! | drag factor   | `f(t) = (1 - e^(-kX·t)) / kX`                        |
//! | gravity factor| `g(t) = (kG·t - 1 + e^(-kG·t)) / kG²`                |
//! | `dx`          | `cos·distance·f(t)`                                  |
//! | `dy`          | `sin·distance·f(t) + upwardBias·f(t) + gravity·g(t)·4` |
//! | rotation      | `t · rotationSpeed · 2`                              |
//! | opacity       | 1 until 3.2, linear to 0 at 4.0                      |
//!
//! `f` is the integral of an exponentially decaying velocity, so horizontal
//! spread saturates.  `g` is the double integral of a velocity saturating at a
//! terminal fall speed, so pieces arc and then fall steadily.

use crate::constants::*;
use crate::generator::ParticleParameters;

/// Instantaneous transform of one piece relative to the explosion origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleTransform {
    pub dx: f32,
    /// Positive is down.
    pub dy: f32,
    pub rotation_degrees: f32,
    pub opacity: f32,
}

impl ParticleTransform {
    /// The initial frame: at the origin, unrotated, fully opaque.
    pub const IDENTITY: Self = Self {
        dx: 0.0,
        dy: 0.0,
        rotation_degrees: 0.0,
        opacity: 1.0,
    };
}

/// Lifecycle phase of a piece, a function of its progress only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParticlePhase {
    /// Not started (`progress == 0`).
    Idle,
    /// Moving at full opacity.
    Active,
    /// Moving and fading (`progress ∈ [3.2, 4)`).
    Fading,
    /// Terminal; the transform is frozen.
    Done,
}

/// Phase for a progress value.
pub fn phase_at(progress: f32) -> ParticlePhase {
    if progress <= 0.0 {
        ParticlePhase::Idle
    } else if progress >= PROGRESS_END {
        ParticlePhase::Done
    } else if progress >= FADE_START {
        ParticlePhase::Fading
    } else {
        ParticlePhase::Active
    }
}

/// Drag-decayed displacement factor `(1 - e^(-k·t)) / k`.
///
/// Tends to `t` as `k → 0`; that limit is used directly for tiny `k`.
#[inline]
pub fn drag_factor(k: f32, t: f32) -> f32 {
    if k.abs() < DECAY_EPSILON {
        t
    } else {
        (1.0 - (-k * t).exp()) / k
    }
}

/// Terminal-velocity fall factor `(k·t - 1 + e^(-k·t)) / k²`.
#[inline]
pub fn gravity_factor(k: f32, t: f32) -> f32 {
    if k.abs() < DECAY_EPSILON {
        0.5 * t * t
    } else {
        (k * t - 1.0 + (-k * t).exp()) / (k * k)
    }
}

/// Opacity for a progress value: 1 before the fade window, 0 after it.
#[inline]
pub fn opacity_at(progress: f32) -> f32 {
    if progress < FADE_START {
        1.0
    } else {
        ((PROGRESS_END - progress) / (PROGRESS_END - FADE_START)).clamp(0.0, 1.0)
    }
}

/// Evaluate a piece's transform at `progress`.
pub fn evaluate(params: &ParticleParameters, progress: f32) -> ParticleTransform {
    let t = progress;
    let spread = drag_factor(params.kx, t);

    let dx = params.cos_angle * params.explosion_distance * spread;

    let base_y = params.sin_angle * params.explosion_distance * spread;
    let upward = params.upward_bias * spread;
    let fall = params.gravity * gravity_factor(params.k_gravity, t) * GRAVITY_SCALE;
    let dy = base_y + upward + fall;

    ParticleTransform {
        dx,
        dy,
        rotation_degrees: t * params.rotation_speed * ROTATION_SCALE,
        opacity: opacity_at(t),
    }
}

// ── Progress driver ───────────────────────────────────────────────────────────

/// Drives one piece's progress from 0 to 4 over `duration_ms`, after an
/// initial `delay_ms`.
///
/// Progress only ever moves forward.  A non-positive duration jumps straight
/// to the end once the delay has passed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieceClock {
    delay_ms: f32,
    duration_ms: f32,
    elapsed_ms: f32,
}

impl PieceClock {
    pub fn new(delay_ms: f32, duration_ms: f32) -> Self {
        Self {
            delay_ms: delay_ms.max(0.0),
            duration_ms,
            elapsed_ms: 0.0,
        }
    }

    /// Advance by `dt_ms` and return the new progress.
    pub fn advance(&mut self, dt_ms: f32) -> f32 {
        self.elapsed_ms += dt_ms.max(0.0);
        self.progress()
    }

    /// Current progress in `[0, 4]`.
    pub fn progress(&self) -> f32 {
        let running = self.elapsed_ms - self.delay_ms;
        if running <= 0.0 {
            return 0.0;
        }
        if self.duration_ms <= 0.0 {
            return PROGRESS_END;
        }
        (running / self.duration_ms * PROGRESS_END).min(PROGRESS_END)
    }

    pub fn phase(&self) -> ParticlePhase {
        phase_at(self.progress())
    }

    pub fn is_done(&self) -> bool {
        self.phase() == ParticlePhase::Done
    }
}
