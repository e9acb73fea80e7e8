//! Site teardown and spawn: turns a `ScenePlan` into entities.
//!
//! Every build first despawns the previous element set wholesale -- there
//! is no diffing -- then spawns the new one. Structural and opening
//! elements start hidden with a collapsed scale; the sequencer owns their
//! entrance. The ground and the machines are visible immediately.

use bevy::prelude::*;

use simulation::building::BuildRequest;
use simulation::config::{SLAB_THICKNESS, WALL_THICKNESS};

use crate::ambient::{ExcavatorArm, ExcavatorBucket, MixerDrum, MIXER_SPEED};
use crate::camera::CameraRig;
use crate::scene_plan::{beam_size, MachineRole, MachineShape, ScenePlan};
use crate::sequencer::{
    ConstructionTimeline, GroundSettle, Reveal, RevealGroup, RevealSchedule, RevealStyle,
    COLLAPSED_SCALE,
};
use crate::site_meshes::{build_roof_mesh, ensure_assets, SiteAssets};

/// How deep the ground dips during the opening settle.
const SETTLE_DEPTH: f32 = 0.5;

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

/// Marker on every entity a build spawns; teardown despawns by this tag.
#[derive(Component)]
pub struct SiteElement;

#[derive(Component)]
pub struct Ground;

#[derive(Component)]
pub struct FootingPad;

#[derive(Component)]
pub struct GradeBeam;

#[derive(Component)]
pub struct FloorSlab;

#[derive(Component)]
pub struct WallPanel;

#[derive(Component)]
pub struct WindowPane;

/// Ground-floor door with its two reference offsets; the ambient cycle
/// slides the panel between them once armed.
#[derive(Component)]
pub struct DoorPanel {
    pub closed_z: f32,
    pub open_z: f32,
}

#[derive(Component)]
pub struct Roof;

// ---------------------------------------------------------------------------
// Build handling
// ---------------------------------------------------------------------------

/// Consume build requests: tear down the old site, spawn the new plan,
/// restart the reveal timeline, and place the camera.
///
/// A request arriving while a sequence is still playing cancels it -- the
/// old entities are gone before any new ones exist, so no transition can
/// touch a stale element.
#[allow(clippy::too_many_arguments)]
pub fn handle_build_requests(
    mut commands: Commands,
    mut requests: EventReader<BuildRequest>,
    existing: Query<Entity, With<SiteElement>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
    assets: Option<Res<SiteAssets>>,
    mut timeline: ResMut<ConstructionTimeline>,
    mut rig: ResMut<CameraRig>,
) {
    // Coalesce: only the latest request this frame matters.
    let Some(request) = requests.read().last().copied() else {
        return;
    };

    if timeline.is_running() {
        info!("rebuild requested mid-sequence; cancelling and restarting");
    }
    for entity in &existing {
        commands.entity(entity).despawn();
    }

    let assets = ensure_assets(&mut commands, &mut meshes, &mut materials, &mut images, &assets);
    let plan = ScenePlan::new(&request.spec);
    let schedule = RevealSchedule::standard();

    spawn_ground(&mut commands, &assets, &schedule);
    spawn_foundation(&mut commands, &mut meshes, &assets, &plan, &schedule);
    spawn_structure(&mut commands, &mut meshes, &assets, &plan, &schedule);
    spawn_openings(&mut commands, &assets, &plan, &schedule);
    spawn_machines(&mut commands, &mut meshes, &mut materials, &plan);

    *timeline = ConstructionTimeline::started(schedule.total_duration(&plan));
    rig.place_for_build(plan.footprint, request.spec.height());

    info!(
        "building site: {} floors, {:.1} m, {} elements",
        request.spec.floors(),
        request.spec.height(),
        plan.total_element_count()
    );
}

fn collapsed_scale(style: RevealStyle) -> Vec3 {
    match style {
        RevealStyle::GrowY => Vec3::new(1.0, COLLAPSED_SCALE, 1.0),
        RevealStyle::GrowX => Vec3::new(COLLAPSED_SCALE, 1.0, 1.0),
        RevealStyle::GrowUniform => Vec3::splat(COLLAPSED_SCALE),
    }
}

fn reveal_for(
    schedule: &RevealSchedule,
    group: RevealGroup,
    index: usize,
    style: RevealStyle,
) -> Reveal {
    let timing = schedule.timing(group);
    Reveal {
        start: schedule.element_start(group, index),
        duration: timing.duration,
        ease: timing.ease,
        style,
    }
}

fn spawn_ground(commands: &mut Commands, assets: &SiteAssets, schedule: &RevealSchedule) {
    let settle = schedule.timing(RevealGroup::GroundSettle);
    commands.spawn((
        SiteElement,
        Ground,
        Mesh3d(assets.ground_mesh.clone()),
        MeshMaterial3d(assets.ground_material.clone()),
        Transform::IDENTITY,
        GroundSettle {
            start: settle.start,
            duration: settle.duration,
            depth: SETTLE_DEPTH,
        },
    ));
}

fn spawn_foundation(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    assets: &SiteAssets,
    plan: &ScenePlan,
    schedule: &RevealSchedule,
) {
    for (i, pad) in plan.pads.iter().enumerate() {
        let reveal = reveal_for(schedule, RevealGroup::Footings, i, RevealStyle::GrowY);
        commands.spawn((
            SiteElement,
            FootingPad,
            Mesh3d(assets.pad_mesh.clone()),
            MeshMaterial3d(assets.concrete_material.clone()),
            Transform::from_translation(pad.position).with_scale(collapsed_scale(reveal.style)),
            Visibility::Hidden,
            reveal,
        ));
    }

    for (i, beam) in plan.beams.iter().enumerate() {
        let reveal = reveal_for(schedule, RevealGroup::GradeBeams, i, RevealStyle::GrowX);
        commands.spawn((
            SiteElement,
            GradeBeam,
            Mesh3d(meshes.add(Cuboid::from_size(beam_size(beam.length)))),
            MeshMaterial3d(assets.concrete_material.clone()),
            Transform::from_translation(beam.position)
                .with_rotation(Quat::from_rotation_y(beam.yaw))
                .with_scale(collapsed_scale(reveal.style)),
            Visibility::Hidden,
            reveal,
        ));
    }
}

fn spawn_structure(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    assets: &SiteAssets,
    plan: &ScenePlan,
    schedule: &RevealSchedule,
) {
    let w = plan.footprint;
    let fh = plan.floor_height;
    let slab_mesh = meshes.add(Cuboid::new(w, SLAB_THICKNESS, w));
    let facade_mesh = meshes.add(Cuboid::new(w, fh, WALL_THICKNESS));
    let side_mesh = meshes.add(Cuboid::new(WALL_THICKNESS, fh, w));

    for (i, slab) in plan.slabs.iter().enumerate() {
        let reveal = reveal_for(schedule, RevealGroup::FloorSlabs, i, RevealStyle::GrowY);
        commands.spawn((
            SiteElement,
            FloorSlab,
            Mesh3d(slab_mesh.clone()),
            MeshMaterial3d(assets.slab_material.clone()),
            Transform::from_translation(slab.position).with_scale(collapsed_scale(reveal.style)),
            Visibility::Hidden,
            reveal,
        ));
    }

    for (i, wall) in plan.walls.iter().enumerate() {
        let mesh = if wall.size.x > wall.size.z {
            facade_mesh.clone()
        } else {
            side_mesh.clone()
        };
        let reveal = reveal_for(schedule, RevealGroup::Walls, i, RevealStyle::GrowY);
        commands.spawn((
            SiteElement,
            WallPanel,
            Mesh3d(mesh),
            MeshMaterial3d(assets.brick_material.clone()),
            Transform::from_translation(wall.position).with_scale(collapsed_scale(reveal.style)),
            Visibility::Hidden,
            reveal,
        ));
    }

    let roof_reveal = reveal_for(schedule, RevealGroup::Roof, 0, RevealStyle::GrowUniform);
    commands.spawn((
        SiteElement,
        Roof,
        Mesh3d(meshes.add(build_roof_mesh(plan.roof.radius, plan.roof.height))),
        MeshMaterial3d(assets.roof_material.clone()),
        Transform::from_translation(plan.roof.position)
            .with_rotation(Quat::from_rotation_y(plan.roof.yaw))
            .with_scale(collapsed_scale(roof_reveal.style)),
        Visibility::Hidden,
        roof_reveal,
    ));
}

fn spawn_openings(
    commands: &mut Commands,
    assets: &SiteAssets,
    plan: &ScenePlan,
    schedule: &RevealSchedule,
) {
    for (i, pane) in plan.windows.iter().enumerate() {
        let mesh = if pane.side_facing {
            assets.window_side_mesh.clone()
        } else {
            assets.window_front_mesh.clone()
        };
        let rotation = if pane.side_facing {
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2)
        } else {
            Quat::IDENTITY
        };
        let reveal = reveal_for(schedule, RevealGroup::Windows, i, RevealStyle::GrowY);
        commands.spawn((
            SiteElement,
            WindowPane,
            Mesh3d(mesh),
            MeshMaterial3d(assets.glass_material.clone()),
            Transform::from_translation(pane.position)
                .with_rotation(rotation)
                .with_scale(collapsed_scale(reveal.style)),
            Visibility::Hidden,
            reveal,
        ));
    }

    for (i, door) in plan.doors.iter().enumerate() {
        let reveal = reveal_for(schedule, RevealGroup::Doors, i, RevealStyle::GrowY);
        commands.spawn((
            SiteElement,
            DoorPanel {
                closed_z: door.closed_z,
                open_z: door.open_z,
            },
            Mesh3d(assets.door_mesh.clone()),
            MeshMaterial3d(assets.door_material.clone()),
            Transform::from_translation(door.position).with_scale(collapsed_scale(reveal.style)),
            Visibility::Hidden,
            reveal,
        ));
    }
}

/// Machines are ambient decor: visible from the first frame, never part
/// of the reveal, tagged for the looping animations where needed.
fn spawn_machines(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    plan: &ScenePlan,
) {
    for machine in &plan.machines {
        let mesh = match machine.shape {
            MachineShape::Block(size) => meshes.add(Cuboid::from_size(size)),
            MachineShape::Drum { radius, length } => meshes.add(Cylinder::new(radius, length)),
        };
        let entity = commands
            .spawn((
                SiteElement,
                Mesh3d(mesh),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: machine.role.color(),
                    perceptual_roughness: 0.6,
                    ..default()
                })),
                Transform::from_translation(machine.position)
                    .with_rotation(Quat::from_rotation_z(machine.tilt)),
            ))
            .id();

        match machine.role {
            MachineRole::MixerDrum => {
                commands.entity(entity).insert(MixerDrum {
                    angle: 0.0,
                    speed: MIXER_SPEED,
                    tilt: machine.tilt,
                });
            }
            MachineRole::ExcavatorArm => {
                commands.entity(entity).insert(ExcavatorArm {
                    angle: 0.0,
                    direction: 1.0,
                });
            }
            MachineRole::ExcavatorBucket => {
                commands.entity(entity).insert(ExcavatorBucket::default());
            }
            _ => {}
        }
    }
}
