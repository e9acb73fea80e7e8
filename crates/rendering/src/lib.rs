use bevy::prelude::*;

pub mod ambient;
pub mod camera;
pub mod ease;
pub mod scene_plan;
pub mod sequencer;
pub mod site;
pub mod site_meshes;

use camera::{CameraRig, PointerDrag, SKY_COLOR};
use sequencer::ConstructionTimeline;

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraRig>()
            .init_resource::<PointerDrag>()
            .init_resource::<ConstructionTimeline>()
            .insert_resource(ClearColor(SKY_COLOR))
            .add_systems(Startup, (camera::setup_camera, setup_lighting))
            .add_systems(
                Update,
                (
                    camera::camera_pan_mouse,
                    camera::camera_pan_touch,
                    camera::camera_zoom_wheel,
                    camera::camera_zoom_pinch,
                    camera::apply_camera_rig,
                ),
            )
            .add_systems(Update, site::handle_build_requests)
            .add_systems(
                Update,
                (
                    sequencer::tick_timeline,
                    sequencer::settle_ground,
                    sequencer::apply_reveals,
                )
                    .chain()
                    .after(site::handle_build_requests),
            )
            .add_systems(
                Update,
                (
                    ambient::spin_mixer_drum,
                    ambient::swing_excavator,
                    ambient::cycle_doors,
                ),
            );
    }
}

/// Warm key light, cool fill, soft ambient -- the site reads as an
/// outdoor scene under afternoon sun.
fn setup_lighting(mut commands: Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.96, 0.96, 0.86),
        brightness: 300.0,
    });

    // Sun
    commands.spawn((
        DirectionalLight {
            color: Color::srgb(1.0, 0.96, 0.9),
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(10.0, 20.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Fill light against the sun to soften shadows
    commands.spawn((
        DirectionalLight {
            color: Color::srgb(0.88, 0.97, 0.98),
            illuminance: 3000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(-10.0, 10.0, -10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}
