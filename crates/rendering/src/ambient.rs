//! Looping site-machinery and door animations.
//!
//! These run every frame, independent of the one-shot construction
//! timeline: the mixer drum spins, the excavator arm and bucket rock
//! between fixed bounds, and armed doors slide open and shut on a wall
//! clock interval. Each animated part carries a typed component assigned
//! at spawn; nothing is located by inspecting geometry.

use bevy::prelude::*;

use crate::ease::Ease;
use crate::site::DoorPanel;

/// Drum spin rate, radians per second.
pub const MIXER_SPEED: f32 = 0.6;
/// Arm sweep rate; the bucket turns at twice this.
pub const EXCAVATOR_ARM_RATE: f32 = 0.3;
/// Symmetric bound for the arm sweep, radians.
pub const EXCAVATOR_SWING_LIMIT: f32 = 0.5;
pub const DOOR_INTERVAL_SECS: f32 = 3.0;
pub const DOOR_SLIDE_SECS: f32 = 1.0;

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

/// Cement-mixer drum; spins forever about its tilted axis.
#[derive(Component, Debug)]
pub struct MixerDrum {
    pub angle: f32,
    pub speed: f32,
    /// Static lean applied before the spin.
    pub tilt: f32,
}

/// Excavator arm; oscillates and owns the shared sweep direction.
#[derive(Component, Debug)]
pub struct ExcavatorArm {
    pub angle: f32,
    pub direction: f32,
}

/// Excavator bucket; follows the arm's direction at double rate.
#[derive(Component, Debug, Default)]
pub struct ExcavatorBucket {
    pub angle: f32,
}

/// Armed by the sequencer once a door's entrance completes: toggles the
/// door between its closed and open Z offset on a fixed interval with an
/// eased slide.
#[derive(Component, Debug)]
pub struct DoorCycle {
    pub open: bool,
    hold: Timer,
    /// Slide progress; >= 1 means the door is at rest.
    slide: f32,
    from_z: f32,
    to_z: f32,
}

impl DoorCycle {
    pub fn new(closed_z: f32) -> Self {
        Self {
            open: false,
            hold: Timer::from_seconds(DOOR_INTERVAL_SECS, TimerMode::Repeating),
            slide: 1.0,
            from_z: closed_z,
            to_z: closed_z,
        }
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

pub fn spin_mixer_drum(time: Res<Time>, mut drums: Query<(&mut MixerDrum, &mut Transform)>) {
    let dt = time.delta_secs();
    for (mut drum, mut transform) in &mut drums {
        let speed = drum.speed;
        drum.angle += speed * dt;
        transform.rotation =
            Quat::from_rotation_z(drum.tilt) * Quat::from_rotation_x(drum.angle);
    }
}

/// One sweep step: returns the new angle and direction, reversing at the
/// bounds and never leaving them.
pub fn advance_swing(angle: f32, direction: f32, rate: f32, dt: f32) -> (f32, f32) {
    let next = angle + rate * direction * dt;
    if next > EXCAVATOR_SWING_LIMIT || next < -EXCAVATOR_SWING_LIMIT {
        (
            next.clamp(-EXCAVATOR_SWING_LIMIT, EXCAVATOR_SWING_LIMIT),
            -direction,
        )
    } else {
        (next, direction)
    }
}

pub fn swing_excavator(
    time: Res<Time>,
    mut arms: Query<(&mut ExcavatorArm, &mut Transform), Without<ExcavatorBucket>>,
    mut buckets: Query<(&mut ExcavatorBucket, &mut Transform), Without<ExcavatorArm>>,
) {
    let dt = time.delta_secs();

    let mut direction = 0.0;
    for (mut arm, mut transform) in &mut arms {
        let (angle, dir) = advance_swing(arm.angle, arm.direction, EXCAVATOR_ARM_RATE, dt);
        arm.angle = angle;
        arm.direction = dir;
        transform.rotation = Quat::from_rotation_x(arm.angle);
        direction = dir;
    }

    // Bucket follows the arm's direction at twice the angular rate.
    for (mut bucket, mut transform) in &mut buckets {
        bucket.angle += 2.0 * EXCAVATOR_ARM_RATE * direction * dt;
        transform.rotation = Quat::from_rotation_x(bucket.angle);
    }
}

pub fn cycle_doors(
    time: Res<Time>,
    mut doors: Query<(&DoorPanel, &mut DoorCycle, &mut Transform)>,
) {
    let dt = time.delta_secs();
    for (panel, mut cycle, mut transform) in &mut doors {
        cycle.hold.tick(time.delta());
        if cycle.hold.just_finished() {
            cycle.open = !cycle.open;
            cycle.from_z = transform.translation.z;
            cycle.to_z = if cycle.open {
                panel.open_z
            } else {
                panel.closed_z
            };
            cycle.slide = 0.0;
        }

        if cycle.slide < 1.0 {
            cycle.slide = (cycle.slide + dt / DOOR_SLIDE_SECS).min(1.0);
            let eased = Ease::CubicInOut.apply(cycle.slide);
            transform.translation.z = cycle.from_z + (cycle.to_z - cycle.from_z) * eased;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
