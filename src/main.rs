use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResolution};
use std::env;

use confetti_burst::config::{self, ConfettiConfig};
use confetti_burst::confetti::{
    ConfettiExplosion, ConfettiPlugin, ConfettiRng, ExplosionComplete, FillPrimaryWindow,
};
use confetti_burst::graphics;

/// Reseed the generator from the config, or from `CONFETTI_SEED` if set.
fn seed_rng(mut commands: Commands, config: Res<ConfettiConfig>) {
    let env_seed = env::var("CONFETTI_SEED")
        .ok()
        .and_then(|value| value.parse::<u64>().ok());
    if let Some(seed) = env_seed.or(config.seed) {
        commands.insert_resource(ConfettiRng::seeded(seed));
        info!("Confetti seed: {seed}");
    }
}

/// Space fires from the bottom-centre; left click fires from the cursor.
fn fire_on_input(
    mut commands: Commands,
    config: Res<ConfettiConfig>,
    keys: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let origin = if mouse.just_pressed(MouseButton::Left) {
        windows.single().ok().and_then(|w| w.cursor_position())
    } else {
        None
    };
    if origin.is_none() && !keys.just_pressed(KeyCode::Space) {
        return;
    }

    let mut request = match config.to_request() {
        Ok(request) => request,
        Err(e) => {
            error!("Cannot fire confetti: {e}");
            return;
        }
    };
    if origin.is_some() {
        request.origin = origin;
    }

    let entity = commands
        .spawn((ConfettiExplosion::new(request), FillPrimaryWindow))
        .id();
    info!("Fired confetti explosion {:?}", entity);
}

/// The demo's completion callback: remove finished explosions.
fn despawn_completed(mut commands: Commands, mut completed: MessageReader<ExplosionComplete>) {
    for done in completed.read() {
        commands.entity(done.explosion).try_despawn();
    }
}

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Confetti Burst".into(),
            resolution: WindowResolution::new(1200, 680),
            ..Default::default()
        }),
        ..Default::default()
    }))
    .insert_resource(ClearColor(Color::BLACK))
    // Compiled defaults; load_confetti_config overwrites them from
    // assets/confetti.toml (if present) in the Startup schedule.
    .insert_resource(ConfettiConfig::default())
    .add_plugins(ConfettiPlugin)
    .add_systems(
        Startup,
        (
            config::load_confetti_config,
            seed_rng.after(config::load_confetti_config),
            graphics::setup_camera,
        ),
    )
    .add_systems(Update, (fire_on_input, despawn_completed));

    app.run();
}
