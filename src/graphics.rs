use crate::generator::ParticleParameters;
use bevy::prelude::*;

/// Setup camera for 2D rendering
pub fn setup_camera(mut commands: Commands) {
    // Default Camera2d centres the world origin in the window, which is where
    // window-filling explosions are placed.
    commands.spawn(Camera2d);
    debug!("Camera spawned");
}

/// Glyph components for one confetti piece.
pub fn piece_visual(params: &ParticleParameters) -> impl Bundle {
    (
        Text2d::new(params.glyph.clone()),
        TextFont {
            font_size: params.size,
            ..default()
        },
        TextColor(params.color),
    )
}
