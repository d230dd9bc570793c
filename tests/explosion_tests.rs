//! Headless tests for the confetti explosion lifecycle.
//!
//! These tests use [`MinimalPlugins`] — no window, no rendering — and a
//! manual time step so they run fast and deterministically in CI.
//!
//! Covered scenarios:
//! 1. Nothing spawns until the container reports a nonzero size.
//! 2. Pieces spawn at the bottom-centre origin and fade out by the end.
//! 3. The completion message fires once, no earlier than the duration.
//! 4. A zero duration never arms the completion timer.
//! 5. Despawning the explosion cancels its pending completion.
//! 6. The plan is memoised until the request changes.
//! 7. `FillPrimaryWindow` containers track the primary window size.
//! 8. Changing the request re-arms or drops the completion timer.
//! 9. A request holding NaN is still memoised.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy::window::{PrimaryWindow, WindowResolution};
use confetti_burst::confetti::{
    completion_system, container_to_local, CompletionTimer, ConfettiExplosion, ConfettiPiece,
    ConfettiPlugin, ConfettiRng, ContainerSize, ExplosionComplete, FillPrimaryWindow,
};
use confetti_burst::generator::ExplosionRequest;
use std::time::Duration;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Every completion message seen so far.
#[derive(Resource, Default)]
struct CompletionLog(Vec<ExplosionComplete>);

fn record_completions(
    mut completed: MessageReader<ExplosionComplete>,
    mut log: ResMut<CompletionLog>,
) {
    log.0.extend(completed.read().copied());
}

/// Headless app advancing 100 ms per update with a fixed seed.
fn confetti_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, ConfettiPlugin));
    app.insert_resource(ConfettiRng::seeded(11));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(
        100,
    )));
    app.init_resource::<CompletionLog>();
    app.add_systems(Update, record_completions.after(completion_system));
    app
}

fn request(piece_count: usize, duration_ms: f32) -> ExplosionRequest {
    ExplosionRequest {
        piece_count,
        duration_ms,
        ..Default::default()
    }
}

fn spawn_explosion(app: &mut App, request: ExplosionRequest, size: Vec2) -> Entity {
    app.world_mut()
        .spawn((ConfettiExplosion::new(request), ContainerSize(size)))
        .id()
}

fn pieces_of(world: &mut World, explosion: Entity) -> Vec<Entity> {
    world
        .query::<(Entity, &ConfettiPiece)>()
        .iter(world)
        .filter(|(_, piece)| piece.explosion == explosion)
        .map(|(entity, _)| entity)
        .collect()
}

fn run(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn nothing_spawns_until_container_is_measured() {
    let mut app = confetti_app();
    let explosion = spawn_explosion(&mut app, request(20, 5000.0), Vec2::ZERO);

    run(&mut app, 3);
    assert!(pieces_of(app.world_mut(), explosion).is_empty());

    let size = Vec2::new(400.0, 800.0);
    app.world_mut()
        .entity_mut(explosion)
        .insert(ContainerSize(size));
    app.update();

    let pieces = pieces_of(app.world_mut(), explosion);
    assert_eq!(pieces.len(), 20);

    let expected_base = container_to_local(Vec2::new(200.0, 800.0), size);
    for entity in pieces {
        let entity_ref = app.world().entity(entity);
        assert_eq!(entity_ref.get::<ConfettiPiece>().unwrap().base, expected_base);
        assert_eq!(entity_ref.get::<ChildOf>().unwrap().parent(), explosion);
    }
}

#[test]
fn empty_request_spawns_nothing() {
    let mut app = confetti_app();
    let explosion = spawn_explosion(&mut app, request(0, 1000.0), Vec2::new(300.0, 300.0));
    run(&mut app, 3);
    assert!(pieces_of(app.world_mut(), explosion).is_empty());
}

#[test]
fn pieces_move_then_fade_out() {
    let mut app = confetti_app();
    let explosion = spawn_explosion(&mut app, request(5, 1000.0), Vec2::new(400.0, 800.0));

    run(&mut app, 4);
    let pieces = pieces_of(app.world_mut(), explosion);
    assert_eq!(pieces.len(), 5);
    let moved = pieces.iter().any(|&e| {
        let entity_ref = app.world().entity(e);
        let base = entity_ref.get::<ConfettiPiece>().unwrap().base;
        let translation = entity_ref.get::<Transform>().unwrap().translation;
        translation.truncate().distance(base) > 1.0
    });
    assert!(moved, "pieces should have left the origin after 300+ ms");

    run(&mut app, 20);
    for e in pieces {
        let entity_ref = app.world().entity(e);
        assert!(entity_ref.get::<ConfettiPiece>().unwrap().clock.is_done());
        assert_eq!(entity_ref.get::<TextColor>().unwrap().0.alpha(), 0.0);
    }
}

#[test]
fn completion_fires_once_after_duration() {
    let mut app = confetti_app();
    let explosion = spawn_explosion(&mut app, request(10, 1000.0), Vec2::new(400.0, 800.0));

    run(&mut app, 5);
    assert!(app.world().resource::<CompletionLog>().0.is_empty());
    assert!(app.world().entity(explosion).contains::<CompletionTimer>());

    run(&mut app, 15);
    assert_eq!(
        app.world().resource::<CompletionLog>().0,
        vec![ExplosionComplete { explosion }]
    );
    assert!(!app.world().entity(explosion).contains::<CompletionTimer>());

    run(&mut app, 10);
    assert_eq!(app.world().resource::<CompletionLog>().0.len(), 1);
}

#[test]
fn completion_fires_even_before_layout() {
    let mut app = confetti_app();
    let explosion = spawn_explosion(&mut app, request(10, 500.0), Vec2::ZERO);

    run(&mut app, 12);
    assert!(pieces_of(app.world_mut(), explosion).is_empty());
    assert_eq!(app.world().resource::<CompletionLog>().0.len(), 1);
}

#[test]
fn zero_duration_never_schedules_completion() {
    let mut app = confetti_app();
    let explosion = spawn_explosion(&mut app, request(4, 0.0), Vec2::new(400.0, 800.0));

    run(&mut app, 2);
    assert!(!app.world().entity(explosion).contains::<CompletionTimer>());

    run(&mut app, 10);
    assert!(app.world().resource::<CompletionLog>().0.is_empty());
    for e in pieces_of(app.world_mut(), explosion) {
        assert!(app.world().entity(e).get::<ConfettiPiece>().unwrap().clock.is_done());
    }
}

#[test]
fn despawn_cancels_pending_completion() {
    let mut app = confetti_app();
    let explosion = spawn_explosion(&mut app, request(10, 1000.0), Vec2::new(400.0, 800.0));

    run(&mut app, 3);
    app.world_mut().entity_mut(explosion).despawn();
    run(&mut app, 20);

    assert!(app.world().resource::<CompletionLog>().0.is_empty());
    assert!(pieces_of(app.world_mut(), explosion).is_empty());
}

#[test]
fn plan_is_reused_until_request_changes() {
    let mut app = confetti_app();
    let explosion = spawn_explosion(&mut app, request(8, 5000.0), Vec2::new(400.0, 800.0));

    app.update();
    let first = pieces_of(app.world_mut(), explosion);
    assert_eq!(first.len(), 8);

    run(&mut app, 3);
    assert_eq!(pieces_of(app.world_mut(), explosion), first);

    app.world_mut()
        .get_mut::<ConfettiExplosion>(explosion)
        .unwrap()
        .request
        .piece_count = 3;
    app.update();

    let second = pieces_of(app.world_mut(), explosion);
    assert_eq!(second.len(), 3);
    assert!(second.iter().all(|e| !first.contains(e)));
}

#[test]
fn window_size_fills_container() {
    let mut app = confetti_app();
    app.world_mut().spawn((
        Window {
            resolution: WindowResolution::new(300, 200),
            ..Default::default()
        },
        PrimaryWindow,
    ));
    let explosion = app
        .world_mut()
        .spawn((ConfettiExplosion::new(request(6, 5000.0)), FillPrimaryWindow))
        .id();

    app.update();

    assert_eq!(
        *app.world().entity(explosion).get::<ContainerSize>().unwrap(),
        ContainerSize(Vec2::new(300.0, 200.0))
    );
    assert_eq!(pieces_of(app.world_mut(), explosion).len(), 6);
}

#[test]
fn request_changed_to_zero_duration_drops_completion() {
    let mut app = confetti_app();
    let explosion = spawn_explosion(&mut app, request(4, 1000.0), Vec2::new(400.0, 800.0));

    run(&mut app, 2);
    assert!(app.world().entity(explosion).contains::<CompletionTimer>());

    app.world_mut()
        .get_mut::<ConfettiExplosion>(explosion)
        .unwrap()
        .request
        .duration_ms = 0.0;
    run(&mut app, 30);

    assert!(!app.world().entity(explosion).contains::<CompletionTimer>());
    assert!(app.world().resource::<CompletionLog>().0.is_empty());
}

#[test]
fn request_changed_after_completion_fires_again() {
    let mut app = confetti_app();
    let explosion = spawn_explosion(&mut app, request(4, 500.0), Vec2::new(400.0, 800.0));

    run(&mut app, 10);
    assert_eq!(app.world().resource::<CompletionLog>().0.len(), 1);

    app.world_mut()
        .get_mut::<ConfettiExplosion>(explosion)
        .unwrap()
        .request
        .piece_count = 6;
    app.update();
    assert_eq!(pieces_of(app.world_mut(), explosion).len(), 6);
    assert!(app.world().entity(explosion).contains::<CompletionTimer>());
    assert_eq!(app.world().resource::<CompletionLog>().0.len(), 1);

    run(&mut app, 10);
    assert_eq!(
        app.world().resource::<CompletionLog>().0,
        vec![ExplosionComplete { explosion }, ExplosionComplete { explosion }]
    );
}

#[test]
fn touching_request_without_changing_it_keeps_timer_running() {
    let mut app = confetti_app();
    let explosion = spawn_explosion(&mut app, request(4, 1000.0), Vec2::new(400.0, 800.0));

    run(&mut app, 6);
    // Mutable access marks the component changed even though the value is equal.
    app.world_mut()
        .get_mut::<ConfettiExplosion>(explosion)
        .unwrap()
        .request
        .duration_ms = 1000.0;
    run(&mut app, 6);

    assert_eq!(app.world().resource::<CompletionLog>().0.len(), 1);
}

#[test]
fn nan_request_does_not_respawn_every_frame() {
    let mut app = confetti_app();
    let nan_request = ExplosionRequest {
        drag: f32::NAN,
        ..request(3, 5000.0)
    };
    let explosion = spawn_explosion(&mut app, nan_request, Vec2::new(400.0, 800.0));

    app.update();
    let first = pieces_of(app.world_mut(), explosion);
    assert_eq!(first.len(), 3);

    run(&mut app, 3);
    assert_eq!(pieces_of(app.world_mut(), explosion), first);
}
