//! Runtime confetti configuration loaded from `assets/confetti.toml`.
//!
//! [`ConfettiConfig`] is a Bevy [`Resource`] that mirrors every explosion
//! option.  At startup, [`load_confetti_config`] reads `assets/confetti.toml`
//! and overwrites the defaults with any values present in the file.  Missing
//! keys fall back to the compile-time defaults in [`crate::constants`], so a
//! minimal TOML can override just the options you care about:
//!
//! ```toml
//! piece_count = 60
//! colors = ["#ff0000", "#00ff00"]
//! emoji = "🎉"
//! emoji_frequency = 0.5
//! ```
//!
//! Use [`ConfettiConfig::to_request`] to turn the config into an
//! [`ExplosionRequest`] for a new explosion.

use crate::constants::*;
use crate::error::{
    validate_emoji_frequency, validate_finite, validate_non_negative, ConfettiError,
    ConfettiResult,
};
use crate::generator::ExplosionRequest;
use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;

/// Default location of the config file, relative to the working directory.
pub const CONFIG_PATH: &str = "assets/confetti.toml";

/// Runtime-tunable explosion options.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfettiConfig {
    // ── Pieces ───────────────────────────────────────────────────────────────
    pub piece_count: i32,
    pub duration_ms: f32,
    pub piece_delay_ms: f32,

    // ── Appearance ───────────────────────────────────────────────────────────
    /// Hex colours, `#RRGGBB` or `#RRGGBBAA`.
    pub colors: Vec<String>,
    pub shapes: Vec<String>,
    pub emoji: Option<String>,
    pub emoji_frequency: f32,
    pub piece_size: f32,

    // ── Motion ───────────────────────────────────────────────────────────────
    /// `[x, y]` in container coordinates; omitted means bottom-centre.
    pub origin: Option<[f32; 2]>,
    pub explosion_radius: f32,
    pub drag: f32,
    pub gravity: f32,
    pub launch_force: f32,

    // ── Randomness ───────────────────────────────────────────────────────────
    /// Seed for the piece generator; omitted means entropy.
    pub seed: Option<u64>,
}

impl Default for ConfettiConfig {
    fn default() -> Self {
        Self {
            piece_count: DEFAULT_PIECE_COUNT,
            duration_ms: DEFAULT_DURATION_MS,
            piece_delay_ms: DEFAULT_PIECE_DELAY_MS,
            colors: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
            shapes: DEFAULT_SHAPES.iter().map(|s| s.to_string()).collect(),
            emoji: None,
            emoji_frequency: DEFAULT_EMOJI_FREQUENCY,
            piece_size: DEFAULT_PIECE_SIZE,
            origin: None,
            explosion_radius: DEFAULT_EXPLOSION_RADIUS,
            drag: DEFAULT_DRAG,
            gravity: DEFAULT_GRAVITY,
            launch_force: DEFAULT_LAUNCH_FORCE,
            seed: None,
        }
    }
}

impl ConfettiConfig {
    /// Parse a config from TOML text.  `source` only labels errors.
    pub fn from_toml_str(contents: &str, source: &str) -> ConfettiResult<Self> {
        toml::from_str::<ConfettiConfig>(contents).map_err(|e| ConfettiError::ConfigParse {
            path: source.to_string(),
            message: e.to_string(),
        })
    }

    /// Build a validated [`ExplosionRequest`].
    ///
    /// A negative piece count is clamped to zero (an empty explosion).
    pub fn to_request(&self) -> ConfettiResult<ExplosionRequest> {
        validate_emoji_frequency(self.emoji_frequency)?;
        validate_non_negative("piece_delay_ms", self.piece_delay_ms)?;
        validate_non_negative("piece_size", self.piece_size)?;
        validate_non_negative("explosion_radius", self.explosion_radius)?;
        validate_finite("duration_ms", self.duration_ms)?;
        validate_finite("drag", self.drag)?;
        validate_finite("gravity", self.gravity)?;
        validate_finite("launch_force", self.launch_force)?;
        if let Some([x, y]) = self.origin {
            validate_finite("origin.x", x)?;
            validate_finite("origin.y", y)?;
        }

        let colors = self
            .colors
            .iter()
            .map(|value| parse_color(value))
            .collect::<ConfettiResult<Vec<_>>>()?;

        Ok(ExplosionRequest {
            piece_count: self.piece_count.max(0) as usize,
            duration_ms: self.duration_ms,
            colors,
            shapes: self.shapes.clone(),
            emoji: self.emoji.clone(),
            emoji_frequency: self.emoji_frequency,
            origin: self.origin.map(Vec2::from),
            piece_size: self.piece_size,
            explosion_radius: self.explosion_radius,
            drag: self.drag,
            gravity: self.gravity,
            launch_force: self.launch_force,
            piece_delay_ms: self.piece_delay_ms,
        })
    }
}

/// Parse one hex colour string.
pub fn parse_color(value: &str) -> ConfettiResult<Color> {
    Srgba::hex(value.trim())
        .map(Color::from)
        .map_err(|_| ConfettiError::InvalidColor {
            value: value.to_string(),
        })
}

/// Read and parse a config file.
///
/// `Ok(None)` when the file does not exist.
pub fn read_config(path: impl AsRef<Path>) -> ConfettiResult<Option<ConfettiConfig>> {
    let path = path.as_ref();
    let label = path.display().to_string();
    match std::fs::read_to_string(path) {
        Ok(contents) => ConfettiConfig::from_toml_str(&contents, &label).map(Some),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ConfettiError::ConfigRead {
            path: label,
            message: e.to_string(),
        }),
    }
}

/// Startup system: load `assets/confetti.toml` over the `ConfettiConfig`
/// resource.
///
/// Missing keys retain their compiled defaults.  A missing file keeps the
/// defaults already in place.  A file that fails to parse or validate is
/// logged and ignored; it never aborts the app.
pub fn load_confetti_config(mut config: ResMut<ConfettiConfig>) {
    match read_config(CONFIG_PATH) {
        Ok(Some(loaded)) => match loaded.to_request() {
            Ok(_) => {
                *config = loaded;
                info!("Loaded confetti config from {CONFIG_PATH}");
            }
            Err(e) => error!("Rejected {CONFIG_PATH}: {e}; using defaults"),
        },
        Ok(None) => info!("No {CONFIG_PATH} found; using compiled defaults"),
        Err(e) => error!("{e}; using defaults"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_default_request() {
        let request = ConfettiConfig::default().to_request().unwrap();
        assert_eq!(request, ExplosionRequest::default());
    }

    #[test]
    fn partial_toml_overrides_only_named_keys() {
        let text = r##"
            piece_count = 12
            emoji = "🎉"
            origin = [10.0, 20.0]
            colors = ["#102030"]
        "##;
        let config = ConfettiConfig::from_toml_str(text, "inline").unwrap();
        assert_eq!(config.piece_count, 12);
        assert_eq!(config.drag, DEFAULT_DRAG);

        let request = config.to_request().unwrap();
        assert_eq!(request.piece_count, 12);
        assert_eq!(request.emoji.as_deref(), Some("🎉"));
        assert_eq!(request.origin, Some(Vec2::new(10.0, 20.0)));
        assert_eq!(request.colors.len(), 1);
    }

    #[test]
    fn negative_piece_count_is_empty() {
        let config = ConfettiConfig {
            piece_count: -5,
            ..Default::default()
        };
        assert_eq!(config.to_request().unwrap().piece_count, 0);
    }

    #[test]
    fn bad_color_is_reported() {
        let config = ConfettiConfig {
            colors: vec!["#ffffff".into(), "not-a-colour".into()],
            ..Default::default()
        };
        assert_eq!(
            config.to_request(),
            Err(ConfettiError::InvalidColor {
                value: "not-a-colour".into()
            })
        );
    }

    #[test]
    fn out_of_range_frequency_is_rejected() {
        let config = ConfettiConfig {
            emoji_frequency: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.to_request(),
            Err(ConfettiError::OptionOutOfRange {
                name: "emoji_frequency",
                ..
            })
        ));
    }

    #[test]
    fn non_finite_motion_options_are_rejected() {
        for (text, name) in [
            ("drag = nan", "drag"),
            ("gravity = inf", "gravity"),
            ("launch_force = -inf", "launch_force"),
            ("duration_ms = nan", "duration_ms"),
            ("origin = [nan, 1.0]", "origin.x"),
        ] {
            let config = ConfettiConfig::from_toml_str(text, "inline").unwrap();
            match config.to_request() {
                Err(ConfettiError::OptionOutOfRange { name: got, .. }) => assert_eq!(got, name),
                other => panic!("{text}: expected {name} to be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = ConfettiConfig::from_toml_str("piece_count = \"lots\"", "inline").unwrap_err();
        assert!(matches!(err, ConfettiError::ConfigParse { .. }));
    }

    #[test]
    fn missing_file_is_not_an_error() {
        assert_eq!(read_config("does/not/exist/confetti.toml"), Ok(None));
    }
}
