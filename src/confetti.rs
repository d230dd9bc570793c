//! Confetti explosion plugin: deferred spawning, per-piece animation, and
//! the completion message.
//!
//! ## Design
//!
//! An explosion is an entity carrying [`ConfettiExplosion`].  Its pieces are
//! child entities with a [`ConfettiPiece`] component and a `Text2d` glyph.  A
//! chained pipeline drives them:
//!
//! | System                           | Schedule | Purpose                                         |
//! |----------------------------------|----------|-------------------------------------------------|
//! | `measure_container_system`       | Update   | Copy the primary window size into `ContainerSize` |
//! | `start_completion_timers_system` | Update   | (Re)arm `CompletionTimer` when the request changes |
//! | `spawn_pieces_system`            | Update   | Generate the plan once measured, spawn pieces    |
//! | `animate_pieces_system`          | Update   | Advance progress, apply the closed-form motion   |
//! | `completion_system`              | Update   | Write [`ExplosionComplete`] after `duration_ms`  |
//!
//! Nothing is spawned while the container measures zero.  The completion
//! timer lives on the explosion entity, so despawning the explosion before it
//! fires cancels the message.
//!
//! Container coordinates are y-down with the origin at the top-left corner.
//! [`container_to_local`] maps them into the explosion's y-up local frame,
//! whose origin is the container centre.

use crate::generator::{ExplosionRequest, ParticleParameters, PlanCache};
use crate::graphics::piece_visual;
use crate::motion::{evaluate, ParticleTransform, PieceClock};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Z offset of pieces above the explosion entity.
const PIECE_Z: f32 = 1.0;

/// Per-piece z increment so later pieces draw on top.
const PIECE_Z_STEP: f32 = 1e-4;

// ── Resources ────────────────────────────────────────────────────────────────

/// Random source used when generating explosion plans.
#[derive(Resource)]
pub struct ConfettiRng(pub StdRng);

impl Default for ConfettiRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl ConfettiRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

// ── Components ───────────────────────────────────────────────────────────────

/// One explosion instance.  Changing `request` regenerates its pieces.
#[derive(Component, Debug, Clone, Default)]
#[require(ContainerSize, ExplosionPlan, CompletionSchedule, Transform, Visibility)]
pub struct ConfettiExplosion {
    pub request: ExplosionRequest,
}

impl ConfettiExplosion {
    pub fn new(request: ExplosionRequest) -> Self {
        Self { request }
    }
}

/// Measured size of the container the explosion plays in (logical px).
///
/// Zero until measured; pieces are only spawned once both axes are nonzero.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct ContainerSize(pub Vec2);

impl ContainerSize {
    pub fn is_measured(&self) -> bool {
        self.0.x > 0.0 && self.0.y > 0.0
    }
}

/// Marker: keep `ContainerSize` in sync with the primary window.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct FillPrimaryWindow;

/// Memoised piece plan for an explosion.
#[derive(Component, Debug, Clone, Default)]
pub struct ExplosionPlan {
    pub cache: PlanCache,
}

/// One confetti piece.
#[derive(Component, Debug, Clone)]
pub struct ConfettiPiece {
    /// Owning explosion.
    pub explosion: Entity,
    pub params: ParticleParameters,
    pub clock: PieceClock,
    /// Origin in the explosion's local frame.
    pub base: Vec2,
}

/// Pending completion for an explosion with a positive duration.
#[derive(Component, Debug, Clone)]
pub struct CompletionTimer(pub Timer);

/// The request the completion timer was last armed for.
#[derive(Component, Debug, Clone, Default)]
pub struct CompletionSchedule {
    armed_for: Option<ExplosionRequest>,
}

// ── Messages ─────────────────────────────────────────────────────────────────

/// Written once per explosion, `duration_ms` after it was spawned.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplosionComplete {
    pub explosion: Entity,
}

// ── Plugin ───────────────────────────────────────────────────────────────────

pub struct ConfettiPlugin;

impl Plugin for ConfettiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ConfettiRng>()
            .add_message::<ExplosionComplete>()
            .add_systems(
                Update,
                (
                    measure_container_system,
                    start_completion_timers_system,
                    spawn_pieces_system,
                    animate_pieces_system,
                    completion_system,
                )
                    .chain(),
            );
    }
}

// ── Geometry ─────────────────────────────────────────────────────────────────

/// Explicit origin, or the bottom-centre of the container.
pub fn resolve_origin(origin: Option<Vec2>, size: Vec2) -> Vec2 {
    origin.unwrap_or(Vec2::new(size.x / 2.0, size.y))
}

/// Map a y-down container point into the y-up, centre-origin local frame.
pub fn container_to_local(point: Vec2, size: Vec2) -> Vec2 {
    Vec2::new(point.x - size.x / 2.0, size.y / 2.0 - point.y)
}

/// Local position and rotation of a piece for a motion sample.
///
/// `dy` is y-down, and positive rotation is clockwise on screen.
pub fn piece_pose(base: Vec2, motion: &ParticleTransform) -> (Vec2, Quat) {
    let position = Vec2::new(base.x + motion.dx, base.y - motion.dy);
    let rotation = Quat::from_rotation_z(-motion.rotation_degrees.to_radians());
    (position, rotation)
}

// ── Systems ──────────────────────────────────────────────────────────────────

/// Layout measurement: copy the primary window's logical size into every
/// [`FillPrimaryWindow`] container.
pub fn measure_container_system(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut containers: Query<&mut ContainerSize, With<FillPrimaryWindow>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let size = Vec2::new(window.width(), window.height());
    for mut container in containers.iter_mut() {
        container.set_if_neq(ContainerSize(size));
    }
}

/// Arm the completion timer on new explosions, and re-arm it whenever the
/// request changes (the pieces restart then too).
///
/// A non-positive duration schedules nothing and drops any pending timer.
pub fn start_completion_timers_system(
    mut commands: Commands,
    mut explosions: Query<
        (Entity, &ConfettiExplosion, &mut CompletionSchedule),
        Changed<ConfettiExplosion>,
    >,
) {
    for (entity, explosion, mut schedule) in explosions.iter_mut() {
        let request = &explosion.request;
        if schedule
            .armed_for
            .as_ref()
            .is_some_and(|armed| armed.same_as(request))
        {
            continue;
        }
        schedule.armed_for = Some(request.clone());

        let duration_ms = request.duration_ms;
        if duration_ms > 0.0 {
            commands.entity(entity).insert(CompletionTimer(Timer::from_seconds(
                duration_ms / 1000.0,
                TimerMode::Once,
            )));
        } else {
            commands.entity(entity).remove::<CompletionTimer>();
        }
    }
}

/// Spawn pieces for measured explosions whose plan is missing or stale.
pub fn spawn_pieces_system(
    mut commands: Commands,
    mut rng: ResMut<ConfettiRng>,
    mut explosions: Query<(Entity, &ConfettiExplosion, &ContainerSize, &mut ExplosionPlan)>,
    pieces: Query<(Entity, &ConfettiPiece)>,
) {
    for (entity, explosion, size, mut plan) in explosions.iter_mut() {
        if !size.is_measured() {
            continue;
        }
        let request = &explosion.request;
        if !plan.bypass_change_detection().cache.refresh(request, &mut rng.0) {
            continue;
        }
        plan.set_changed();

        for (piece_entity, piece) in pieces.iter() {
            if piece.explosion == entity {
                commands.entity(piece_entity).despawn();
            }
        }

        let origin = resolve_origin(request.origin, size.0);
        let base = container_to_local(origin, size.0);

        for (i, params) in plan.cache.pieces().iter().enumerate() {
            commands.spawn((
                ConfettiPiece {
                    explosion: entity,
                    params: params.clone(),
                    clock: PieceClock::new(request.piece_delay_ms, request.duration_ms),
                    base,
                },
                piece_visual(params),
                Transform::from_translation(base.extend(PIECE_Z + i as f32 * PIECE_Z_STEP)),
                ChildOf(entity),
            ));
        }

        debug!(
            "Spawned {} confetti pieces for {:?} at {:?}",
            plan.cache.pieces().len(),
            entity,
            origin
        );
    }
}

/// Advance each piece's progress and apply the motion model.
///
/// Finished pieces keep their last transform.
pub fn animate_pieces_system(
    time: Res<Time>,
    mut pieces: Query<(&mut ConfettiPiece, &mut Transform, &mut TextColor)>,
) {
    let dt_ms = time.delta_secs() * 1000.0;

    for (mut piece, mut transform, mut text_color) in pieces.iter_mut() {
        if piece.clock.is_done() {
            continue;
        }
        let progress = piece.clock.advance(dt_ms);
        let motion = evaluate(&piece.params, progress);
        let (position, rotation) = piece_pose(piece.base, &motion);

        transform.translation.x = position.x;
        transform.translation.y = position.y;
        transform.rotation = rotation;
        text_color.0 = piece.params.color.with_alpha(motion.opacity);
    }
}

/// Tick completion timers and write [`ExplosionComplete`] when they finish.
pub fn completion_system(
    mut commands: Commands,
    time: Res<Time>,
    mut timers: Query<(Entity, &mut CompletionTimer)>,
    mut completed: MessageWriter<ExplosionComplete>,
) {
    for (entity, mut timer) in timers.iter_mut() {
        timer.0.tick(time.delta());
        if timer.0.just_finished() {
            completed.write(ExplosionComplete { explosion: entity });
            commands.entity(entity).remove::<CompletionTimer>();
            info!("Confetti explosion {:?} complete", entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_origin_is_bottom_centre() {
        let size = Vec2::new(400.0, 800.0);
        assert_eq!(resolve_origin(None, size), Vec2::new(200.0, 800.0));
        assert_eq!(
            resolve_origin(Some(Vec2::new(5.0, 6.0)), size),
            Vec2::new(5.0, 6.0)
        );
    }

    #[test]
    fn container_corners_map_to_local_frame() {
        let size = Vec2::new(400.0, 800.0);
        assert_eq!(container_to_local(Vec2::ZERO, size), Vec2::new(-200.0, 400.0));
        assert_eq!(container_to_local(Vec2::new(200.0, 800.0), size), Vec2::new(0.0, -400.0));
        assert_eq!(container_to_local(size / 2.0, size), Vec2::ZERO);
    }

    #[test]
    fn pose_flips_vertical_and_rotation() {
        let motion = ParticleTransform {
            dx: 10.0,
            dy: -30.0,
            rotation_degrees: 90.0,
            opacity: 1.0,
        };
        let (position, rotation) = piece_pose(Vec2::new(1.0, 2.0), &motion);
        assert_eq!(position, Vec2::new(11.0, 32.0));

        let turned = rotation * Vec3::X;
        assert!((turned - Vec3::NEG_Y).length() < 1e-5);
    }

    #[test]
    fn unmeasured_container_is_zero() {
        assert!(!ContainerSize::default().is_measured());
        assert!(!ContainerSize(Vec2::new(100.0, 0.0)).is_measured());
        assert!(ContainerSize(Vec2::new(100.0, 50.0)).is_measured());
    }
}
