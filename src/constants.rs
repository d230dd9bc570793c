//! Centralised confetti defaults and motion-model constants.
//!
//! Every user-facing option has its default here so [`crate::config`] and
//! [`crate::generator::ExplosionRequest::default`] agree.  The model constants
//! further down are empirically tuned; change them only together with the
//! tests in `motion.rs`.

// ── Explosion defaults ────────────────────────────────────────────────────────

/// Number of pieces spawned per explosion.
pub const DEFAULT_PIECE_COUNT: i32 = 100;

/// Total animation time (ms).  `<= 0` disables the completion timer.
pub const DEFAULT_DURATION_MS: f32 = 5000.0;

/// Built-in palette, sampled uniformly per piece.
pub const DEFAULT_COLORS: [&str; 6] = [
    "#FFC700", "#FF0000", "#2E3191", "#41BBC7", "#7FFF00", "#FF69B4",
];

/// Built-in glyph set, sampled uniformly per piece.
pub const DEFAULT_SHAPES: [&str; 3] = ["●", "■", "▲"];

/// Probability that a piece shows the configured emoji instead of a shape.
pub const DEFAULT_EMOJI_FREQUENCY: f32 = 0.3;

/// Base glyph size (logical px).  Each piece adds up to `PIECE_SIZE_SPREAD`.
pub const DEFAULT_PIECE_SIZE: f32 = 14.0;

/// Upper bound of the randomised travel distance.
pub const DEFAULT_EXPLOSION_RADIUS: f32 = 850.0;

/// Base air-resistance coefficient.
pub const DEFAULT_DRAG: f32 = 0.6;

/// Base downward acceleration magnitude.
pub const DEFAULT_GRAVITY: f32 = 400.0;

/// Base upward launch magnitude.
pub const DEFAULT_LAUNCH_FORCE: f32 = 4500.0;

/// Delay (ms) before each piece starts moving.
pub const DEFAULT_PIECE_DELAY_MS: f32 = 0.0;

// ── Per-piece random ranges ───────────────────────────────────────────────────

/// Launch fan width in degrees, starting at `FAN_START_DEG`.
pub const FAN_SPAN_DEG: f32 = 180.0;
/// First launch angle; 180..360 is the upward half-circle in y-down space.
pub const FAN_START_DEG: f32 = 180.0;

/// Drag is drawn from `[drag, drag + DRAG_SPREAD)`.
pub const DRAG_SPREAD: f32 = 0.7;

/// Gravity multiplier range `[min, min + spread)`.
pub const GRAVITY_MULT_MIN: f32 = 0.6;
pub const GRAVITY_MULT_SPREAD: f32 = 0.8;

/// Upward-bias multiplier range `[min, min + spread)`.
pub const UPWARD_MULT_MIN: f32 = 0.2;
pub const UPWARD_MULT_SPREAD: f32 = 0.8;

/// Size is drawn from `[piece_size, piece_size + PIECE_SIZE_SPREAD)`.
pub const PIECE_SIZE_SPREAD: f32 = 6.0;

/// Rotation speed range in degrees per progress unit.
pub const ROTATION_SPEED_MIN: f32 = 90.0;
pub const ROTATION_SPEED_SPREAD: f32 = 180.0;

// ── Motion model ──────────────────────────────────────────────────────────────

/// Horizontal decay constant per unit of drag (`kX = drag * 3`).
pub const KX_PER_DRAG: f32 = 3.0;

/// Gravity decay constant per unit of drag (`kGravity = drag * 2`).
pub const KGRAVITY_PER_DRAG: f32 = 2.0;

/// Lower bound on `kGravity`; the terminal-velocity term divides by its square.
pub const KGRAVITY_FLOOR: f32 = 0.5;

/// Scale applied to the gravity displacement term.
pub const GRAVITY_SCALE: f32 = 4.0;

/// Rotation multiplier: `rotation = progress * rotation_speed * 2`.
pub const ROTATION_SCALE: f32 = 2.0;

/// Progress value at which a piece is finished.
pub const PROGRESS_END: f32 = 4.0;

/// Progress value at which the fade-out begins.
pub const FADE_START: f32 = 3.2;

/// Below this a decay constant is treated as zero and the limit form is used.
pub const DECAY_EPSILON: f32 = 1e-6;
