//! Per-piece parameter generation for a confetti explosion.
//!
//! ## Design
//!
//! [`generate`] turns one [`ExplosionRequest`] into an ordered list of
//! [`ParticleParameters`], one per piece.  Every random value a piece needs is
//! drawn here, once; the motion model in [`crate::motion`] is a pure function
//! of these records plus a progress scalar, so nothing is re-rolled while the
//! explosion animates.
//!
//! Launch angles fan evenly across the upward half-circle: piece `i` of `n`
//! launches at `180 + i * 180 / (n - 1)` degrees.  In the container's y-down
//! frame that sweeps from straight left, through straight up, to straight
//! right.
//!
//! The random source is injected (`&mut impl Rng`) so tests can seed it.
//! [`PlanCache`] memoises the output against bitwise request equality.

use crate::constants::*;
use bevy::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

// ── Request ───────────────────────────────────────────────────────────────────

/// Immutable input for one explosion.
///
/// Numeric values are used as given; the caller owns sanity.  See
/// [`crate::config::ConfettiConfig::to_request`] for the validated path.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplosionRequest {
    pub piece_count: usize,
    /// Total animation time (ms).  `<= 0` disables the completion timer.
    pub duration_ms: f32,
    pub colors: Vec<Color>,
    pub shapes: Vec<String>,
    pub emoji: Option<String>,
    /// Probability in `[0, 1]` that a piece shows `emoji`.
    pub emoji_frequency: f32,
    /// Origin in container coordinates (y-down, top-left at zero).
    /// `None` resolves to the bottom-centre of the measured container.
    pub origin: Option<Vec2>,
    pub piece_size: f32,
    pub explosion_radius: f32,
    pub drag: f32,
    pub gravity: f32,
    pub launch_force: f32,
    /// Delay (ms) before each piece's progress starts advancing.
    pub piece_delay_ms: f32,
}

impl Default for ExplosionRequest {
    fn default() -> Self {
        Self {
            piece_count: DEFAULT_PIECE_COUNT as usize,
            duration_ms: DEFAULT_DURATION_MS,
            colors: default_palette(),
            shapes: DEFAULT_SHAPES.iter().map(|s| s.to_string()).collect(),
            emoji: None,
            emoji_frequency: DEFAULT_EMOJI_FREQUENCY,
            origin: None,
            piece_size: DEFAULT_PIECE_SIZE,
            explosion_radius: DEFAULT_EXPLOSION_RADIUS,
            drag: DEFAULT_DRAG,
            gravity: DEFAULT_GRAVITY,
            launch_force: DEFAULT_LAUNCH_FORCE,
            piece_delay_ms: DEFAULT_PIECE_DELAY_MS,
        }
    }
}

impl ExplosionRequest {
    /// Bitwise equality: float fields compare by their bit patterns, so a
    /// request holding NaN still equals an identical copy of itself.
    pub fn same_as(&self, other: &Self) -> bool {
        fn bits(a: f32, b: f32) -> bool {
            a.to_bits() == b.to_bits()
        }
        fn color_bits(a: &Color, b: &Color) -> bool {
            let (a, b) = (a.to_linear(), b.to_linear());
            bits(a.red, b.red) && bits(a.green, b.green) && bits(a.blue, b.blue) && bits(a.alpha, b.alpha)
        }

        self.piece_count == other.piece_count
            && bits(self.duration_ms, other.duration_ms)
            && self.colors.len() == other.colors.len()
            && self
                .colors
                .iter()
                .zip(other.colors.iter())
                .all(|(a, b)| color_bits(a, b))
            && self.shapes == other.shapes
            && self.emoji == other.emoji
            && bits(self.emoji_frequency, other.emoji_frequency)
            && match (self.origin, other.origin) {
                (Some(a), Some(b)) => bits(a.x, b.x) && bits(a.y, b.y),
                (None, None) => true,
                _ => false,
            }
            && bits(self.piece_size, other.piece_size)
            && bits(self.explosion_radius, other.explosion_radius)
            && bits(self.drag, other.drag)
            && bits(self.gravity, other.gravity)
            && bits(self.launch_force, other.launch_force)
            && bits(self.piece_delay_ms, other.piece_delay_ms)
    }
}

/// The built-in palette as Bevy colours.
pub fn default_palette() -> Vec<Color> {
    DEFAULT_COLORS
        .iter()
        .filter_map(|hex| Srgba::hex(hex).ok())
        .map(Color::from)
        .collect()
}

/// Colour used when the palette is empty.
fn fallback_color() -> Color {
    default_palette().first().copied().unwrap_or(Color::WHITE)
}

// ── Per-piece parameters ──────────────────────────────────────────────────────

/// Everything the motion model and renderer need for one piece.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleParameters {
    // Visual
    pub size: f32,
    pub glyph: String,
    pub color: Color,
    /// Degrees per progress unit (before the x2 rotation scale).
    pub rotation_speed: f32,

    // Kinematic
    /// Launch angle in degrees, 180..=360.
    pub angle_deg: f32,
    pub cos_angle: f32,
    pub sin_angle: f32,
    pub explosion_distance: f32,
    pub drag: f32,
    pub gravity_multiplier: f32,
    pub upward_multiplier: f32,

    // Derived
    /// Horizontal decay constant, `drag * 3`.
    pub kx: f32,
    /// Gravity decay constant, `max(0.5, drag * 2)`.
    pub k_gravity: f32,
    /// Negative: points up in y-down space.
    pub upward_bias: f32,
    /// Effective gravity magnitude.
    pub gravity: f32,
}

/// Angle step between consecutive pieces, in degrees.
///
/// Zero for a single piece (and for an empty explosion).
pub fn angle_step_deg(piece_count: usize) -> f32 {
    if piece_count > 1 {
        FAN_SPAN_DEG / (piece_count - 1) as f32
    } else {
        0.0
    }
}

/// `base + U[0, 1) * span`.  Never panics on an empty span, unlike `gen_range`.
#[inline]
fn sample<R: Rng + ?Sized>(rng: &mut R, base: f32, span: f32) -> f32 {
    base + rng.gen::<f32>() * span
}

/// Pick a glyph: uniform over `shapes`, replaced by `emoji` with probability
/// `emoji_frequency`.
///
/// An empty shape set falls back to the emoji when one is configured, else to
/// the first default glyph.
fn pick_glyph<R: Rng + ?Sized>(rng: &mut R, request: &ExplosionRequest) -> String {
    let shape = request.shapes.choose(rng);
    match (&request.emoji, shape) {
        (Some(emoji), None) => emoji.clone(),
        (Some(emoji), Some(shape)) => {
            if rng.gen::<f32>() < request.emoji_frequency {
                emoji.clone()
            } else {
                shape.clone()
            }
        }
        (None, Some(shape)) => shape.clone(),
        (None, None) => DEFAULT_SHAPES[0].to_string(),
    }
}

/// Derive the coefficients that depend only on the sampled values.
///
/// Returns `(kx, k_gravity, upward_bias, gravity)`.
pub fn derive_coefficients(
    drag: f32,
    upward_multiplier: f32,
    gravity_multiplier: f32,
    launch_force: f32,
    gravity_base: f32,
) -> (f32, f32, f32, f32) {
    let kx = drag * KX_PER_DRAG;
    let k_gravity = (drag * KGRAVITY_PER_DRAG).max(KGRAVITY_FLOOR);
    let upward_bias = -launch_force * upward_multiplier;
    let gravity = gravity_base * gravity_multiplier;
    (kx, k_gravity, upward_bias, gravity)
}

/// Generate one parameter record per piece.
///
/// Output length equals `request.piece_count`; zero pieces yields an empty
/// vector.  Consumes `rng` only.
pub fn generate<R: Rng + ?Sized>(request: &ExplosionRequest, rng: &mut R) -> Vec<ParticleParameters> {
    let count = request.piece_count;
    let step = angle_step_deg(count);
    let mut pieces = Vec::with_capacity(count);

    for i in 0..count {
        let angle_deg = FAN_START_DEG + i as f32 * step;
        let (sin_angle, cos_angle) = angle_deg.to_radians().sin_cos();

        let drag = sample(rng, request.drag, DRAG_SPREAD);
        let gravity_multiplier = sample(rng, GRAVITY_MULT_MIN, GRAVITY_MULT_SPREAD);
        let upward_multiplier = sample(rng, UPWARD_MULT_MIN, UPWARD_MULT_SPREAD);
        let explosion_distance = sample(rng, 0.0, request.explosion_radius);
        let size = sample(rng, request.piece_size, PIECE_SIZE_SPREAD);
        let rotation_speed = sample(rng, ROTATION_SPEED_MIN, ROTATION_SPEED_SPREAD);
        let glyph = pick_glyph(rng, request);
        let color = request
            .colors
            .choose(rng)
            .copied()
            .unwrap_or_else(fallback_color);

        let (kx, k_gravity, upward_bias, gravity) = derive_coefficients(
            drag,
            upward_multiplier,
            gravity_multiplier,
            request.launch_force,
            request.gravity,
        );

        pieces.push(ParticleParameters {
            size,
            glyph,
            color,
            rotation_speed,
            angle_deg,
            cos_angle,
            sin_angle,
            explosion_distance,
            drag,
            gravity_multiplier,
            upward_multiplier,
            kx,
            k_gravity,
            upward_bias,
            gravity,
        });
    }

    pieces
}

// ── Memoisation ───────────────────────────────────────────────────────────────

/// Holds the last generated plan and the request it was generated from.
///
/// [`PlanCache::refresh`] regenerates only when the request differs from the
/// cached one ([`ExplosionRequest::same_as`]), so re-running it every frame with an unchanged request keeps
/// the same pieces.
#[derive(Debug, Default, Clone)]
pub struct PlanCache {
    entry: Option<(ExplosionRequest, Vec<ParticleParameters>)>,
}

impl PlanCache {
    /// Ensure the cached plan matches `request`.  Returns `true` if it was
    /// (re)generated.
    pub fn refresh<R: Rng + ?Sized>(&mut self, request: &ExplosionRequest, rng: &mut R) -> bool {
        if let Some((cached, _)) = &self.entry {
            if cached.same_as(request) {
                return false;
            }
        }
        let pieces = generate(request, rng);
        self.entry = Some((request.clone(), pieces));
        true
    }

    /// Pieces of the cached plan; empty before the first refresh.
    pub fn pieces(&self) -> &[ParticleParameters] {
        self.entry
            .as_ref()
            .map(|(_, pieces)| pieces.as_slice())
            .unwrap_or(&[])
    }

    /// `true` once a plan has been generated.
    pub fn is_populated(&self) -> bool {
        self.entry.is_some()
    }
}
