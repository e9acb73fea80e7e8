//! Headless build/rebuild tests.
//!
//! Drives the real spawn, teardown, and reveal systems in a minimal app
//! (no window, no renderer): a rebuild fully replaces the previous element
//! set, a completed sequence leaves everything visible at identity scale,
//! and the door cycle arms.
//!
//! Run: cargo test -p rendering --test rebuild

use bevy::asset::AssetPlugin;
use bevy::prelude::*;

use rendering::ambient::DoorCycle;
use rendering::camera::CameraRig;
use rendering::scene_plan::ScenePlan;
use rendering::sequencer::{
    apply_reveals, tick_timeline, ConstructionTimeline, Reveal, TimelineState,
};
use rendering::site::{handle_build_requests, DoorPanel, SiteElement};
use simulation::building::{BuildRequest, BuildingSpec};

fn test_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, AssetPlugin::default()));
    app.init_asset::<Mesh>();
    app.init_asset::<StandardMaterial>();
    app.init_asset::<Image>();
    app.init_resource::<CameraRig>();
    app.init_resource::<ConstructionTimeline>();
    app.add_event::<BuildRequest>();
    app.add_systems(
        Update,
        (handle_build_requests, tick_timeline, apply_reveals).chain(),
    );
    app
}

fn site_element_count(app: &mut App) -> usize {
    let mut query = app.world_mut().query_filtered::<Entity, With<SiteElement>>();
    query.iter(app.world()).count()
}

fn build(app: &mut App, height: f32, floors: u32) -> ScenePlan {
    let spec = BuildingSpec::new(height, floors).expect("valid spec");
    app.world_mut().send_event(BuildRequest { spec });
    app.update();
    ScenePlan::new(&spec)
}

// ---------------------------------------------------------------------------
// 1. A build spawns exactly the planned element set
// ---------------------------------------------------------------------------

#[test]
fn test_build_spawns_planned_element_count() {
    let mut app = test_app();
    let plan = build(&mut app, 9.0, 3);
    assert_eq!(site_element_count(&mut app), plan.total_element_count());
}

// ---------------------------------------------------------------------------
// 2. Rebuilding fully replaces the previous set
// ---------------------------------------------------------------------------

#[test]
fn test_rebuild_replaces_previous_site() {
    let mut app = test_app();
    let first = build(&mut app, 9.0, 3);
    assert_eq!(site_element_count(&mut app), first.total_element_count());

    let second = build(&mut app, 6.0, 1);
    // Only the second build's elements remain -- nothing orphaned.
    assert_eq!(site_element_count(&mut app), second.total_element_count());
    assert_ne!(first.total_element_count(), second.total_element_count());
}

#[test]
fn test_same_frame_requests_coalesce() {
    let mut app = test_app();
    let spec_a = BuildingSpec::new(9.0, 3).expect("valid spec");
    let spec_b = BuildingSpec::new(6.0, 1).expect("valid spec");
    app.world_mut().send_event(BuildRequest { spec: spec_a });
    app.world_mut().send_event(BuildRequest { spec: spec_b });
    app.update();

    let expect = ScenePlan::new(&spec_b).total_element_count();
    assert_eq!(site_element_count(&mut app), expect);
}

// ---------------------------------------------------------------------------
// 3. Completed sequence: everything visible at identity scale
// ---------------------------------------------------------------------------

#[test]
fn test_completed_sequence_reveals_everything() {
    let mut app = test_app();
    build(&mut app, 9.0, 3);

    // Jump the clock to the end of the timeline and let the systems run.
    let total = app.world().resource::<ConstructionTimeline>().total;
    assert!(total > 0.0);
    app.world_mut().resource_mut::<ConstructionTimeline>().elapsed = total;
    app.update();

    assert_eq!(
        app.world().resource::<ConstructionTimeline>().state,
        TimelineState::Finished
    );

    let mut revealed = 0;
    let mut query = app
        .world_mut()
        .query_filtered::<(&Transform, &Visibility), With<Reveal>>();
    for (transform, visibility) in query.iter(app.world()) {
        assert_eq!(*visibility, Visibility::Visible);
        assert_eq!(transform.scale, Vec3::ONE);
        revealed += 1;
    }
    let plan = ScenePlan::new(&BuildingSpec::new(9.0, 3).expect("valid spec"));
    assert_eq!(revealed, plan.revealed_element_count());
}

// ---------------------------------------------------------------------------
// 4. Door cycle arms when the door's entrance completes
// ---------------------------------------------------------------------------

#[test]
fn test_door_cycle_armed_after_completion() {
    let mut app = test_app();
    build(&mut app, 9.0, 3);

    let total = app.world().resource::<ConstructionTimeline>().total;
    app.world_mut().resource_mut::<ConstructionTimeline>().elapsed = total;
    app.update();
    // One more frame so the insert command is applied and observable.
    app.update();

    let mut doors = 0;
    let mut query = app
        .world_mut()
        .query_filtered::<Option<&DoorCycle>, With<DoorPanel>>();
    for cycle in query.iter(app.world()) {
        assert!(cycle.is_some(), "door should have an armed cycle");
        doors += 1;
    }
    assert_eq!(doors, 1);
}

// ---------------------------------------------------------------------------
// 5. Camera placement follows the build
// ---------------------------------------------------------------------------

#[test]
fn test_camera_placed_at_build() {
    let mut app = test_app();
    build(&mut app, 9.0, 3);

    let rig = app.world().resource::<CameraRig>();
    assert_eq!(rig.target, Vec3::new(0.0, 4.5, 0.0));
    assert!(rig.distance >= rig.min_distance);
    assert!(rig.distance <= rig.max_distance);
}

// ---------------------------------------------------------------------------
// 6. Elements stay hidden before their start time
// ---------------------------------------------------------------------------

#[test]
fn test_late_elements_hidden_at_sequence_start() {
    let mut app = test_app();
    build(&mut app, 9.0, 3);
    app.update();

    // Milliseconds in: the roof (last group) cannot have started yet.
    let mut query = app
        .world_mut()
        .query_filtered::<&Visibility, With<rendering::site::Roof>>();
    for visibility in query.iter(app.world()) {
        assert_eq!(*visibility, Visibility::Hidden);
    }
}
