//! Pure geometric plan for one construction site.
//!
//! Everything the spawn layer needs -- positions, sizes, orientations --
//! derived from a `BuildingSpec` with no ECS or asset access, so the whole
//! layout is unit-testable. The spawn layer in `site` turns a plan into
//! entities; the sequencer only ever sees the spawned result.

use bevy::math::Vec3;
use bevy::prelude::Color;

use simulation::building::BuildingSpec;
use simulation::config::{
    BEAM_THICKNESS, DOOR_HEIGHT, DOOR_SWING, DOOR_THICKNESS, DOOR_WIDTH, PAD_HEIGHT,
    ROOF_CLEARANCE, ROOF_HEIGHT, ROOF_RADIUS_FACTOR, SLAB_THICKNESS, WALL_THICKNESS,
    WINDOW_HEIGHT, WINDOW_THICKNESS, WINDOW_WIDTH,
};
use simulation::footing::plan_layout;

/// Distance from the footprint edge to the crane and mixer.
const MACHINE_MARGIN: f32 = 3.0;
/// The excavator parks a little further out.
const EXCAVATOR_MARGIN: f32 = 5.0;

// ---------------------------------------------------------------------------
// Element plans
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct PadPlan {
    pub position: Vec3,
}

#[derive(Debug, Clone, Copy)]
pub struct BeamPlan {
    pub position: Vec3,
    pub yaw: f32,
    pub length: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct SlabPlan {
    pub position: Vec3,
    pub size: Vec3,
}

#[derive(Debug, Clone, Copy)]
pub struct WallPlan {
    pub position: Vec3,
    pub size: Vec3,
}

#[derive(Debug, Clone, Copy)]
pub struct WindowPlan {
    pub position: Vec3,
    /// Side-face panes are turned 90 degrees about Y.
    pub side_facing: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct DoorPlan {
    pub position: Vec3,
    pub closed_z: f32,
    pub open_z: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct RoofPlan {
    pub position: Vec3,
    pub radius: f32,
    pub height: f32,
    pub yaw: f32,
}

/// Which animatable (or static) part of a machine this is. Roles are the
/// typed handles the ambient systems look for -- no geometry sniffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineRole {
    CraneBase,
    CraneTower,
    CraneArm,
    MixerBase,
    MixerDrum,
    ExcavatorBase,
    ExcavatorArm,
    ExcavatorBucket,
}

impl MachineRole {
    pub fn color(self) -> Color {
        match self {
            MachineRole::CraneBase => Color::srgb_u8(0xff, 0x00, 0x00),
            MachineRole::CraneTower => Color::srgb_u8(0xcc, 0xcc, 0xcc),
            MachineRole::CraneArm => Color::srgb_u8(0x88, 0x88, 0x88),
            MachineRole::MixerBase => Color::srgb_u8(0x55, 0x55, 0x55),
            MachineRole::MixerDrum => Color::srgb_u8(0x99, 0x99, 0x99),
            MachineRole::ExcavatorBase => Color::srgb_u8(0x33, 0x66, 0xcc),
            MachineRole::ExcavatorArm => Color::srgb_u8(0x44, 0x44, 0x44),
            MachineRole::ExcavatorBucket => Color::srgb_u8(0x77, 0x77, 0x77),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum MachineShape {
    Block(Vec3),
    /// Cylinder lying on its side once tilted; radius and length.
    Drum { radius: f32, length: f32 },
}

#[derive(Debug, Clone, Copy)]
pub struct MachinePlan {
    pub role: MachineRole,
    pub shape: MachineShape,
    pub position: Vec3,
    /// Static roll about Z (the mixer drum leans at 45 degrees).
    pub tilt: f32,
}

// ---------------------------------------------------------------------------
// The plan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ScenePlan {
    pub spec: BuildingSpec,
    pub footprint: f32,
    pub floor_height: f32,
    pub pads: Vec<PadPlan>,
    pub beams: Vec<BeamPlan>,
    pub slabs: Vec<SlabPlan>,
    pub walls: Vec<WallPlan>,
    pub windows: Vec<WindowPlan>,
    pub doors: Vec<DoorPlan>,
    pub roof: RoofPlan,
    pub machines: Vec<MachinePlan>,
}

impl ScenePlan {
    pub fn new(spec: &BuildingSpec) -> Self {
        let w = spec.footprint();
        let h = spec.height();
        let fh = spec.floor_height();

        // Foundation from the layout planner; pads sink halfway into the
        // ground so only the top half shows.
        let layout = plan_layout(w);
        let pads = layout
            .pads
            .iter()
            .map(|p| PadPlan {
                position: Vec3::new(p.x, -PAD_HEIGHT / 2.0, p.y),
            })
            .collect();
        let beams = layout
            .beams
            .iter()
            .map(|b| {
                let mid = b.midpoint();
                BeamPlan {
                    position: Vec3::new(mid.x, 0.0, mid.y),
                    yaw: b.yaw(),
                    length: b.length(),
                }
            })
            .collect();

        // One slab and four wall panels per floor.
        let mut slabs = Vec::with_capacity(spec.floors() as usize);
        let mut walls = Vec::with_capacity(spec.floors() as usize * 4);
        let mut windows = Vec::with_capacity(spec.floors() as usize * 6);
        let mut doors = Vec::new();

        for i in 0..spec.floors() {
            let base_y = i as f32 * fh;
            let mid_y = base_y + fh / 2.0;

            slabs.push(SlabPlan {
                position: Vec3::new(0.0, base_y, 0.0),
                size: Vec3::new(w, SLAB_THICKNESS, w),
            });

            // Front, back, left, right.
            walls.push(WallPlan {
                position: Vec3::new(0.0, mid_y, w / 2.0),
                size: Vec3::new(w, fh, WALL_THICKNESS),
            });
            walls.push(WallPlan {
                position: Vec3::new(0.0, mid_y, -w / 2.0),
                size: Vec3::new(w, fh, WALL_THICKNESS),
            });
            walls.push(WallPlan {
                position: Vec3::new(-w / 2.0, mid_y, 0.0),
                size: Vec3::new(WALL_THICKNESS, fh, w),
            });
            walls.push(WallPlan {
                position: Vec3::new(w / 2.0, mid_y, 0.0),
                size: Vec3::new(WALL_THICKNESS, fh, w),
            });

            // Ground floor only: one front door resting on the slab.
            if i == 0 {
                let closed_z = w / 2.0 + 0.1;
                doors.push(DoorPlan {
                    position: Vec3::new(0.0, base_y + DOOR_HEIGHT / 2.0, closed_z),
                    closed_z,
                    open_z: closed_z - DOOR_SWING,
                });
            }

            // Two front panes, four side panes, symmetric about the centre.
            for x in [-w / 3.0, w / 3.0] {
                windows.push(WindowPlan {
                    position: Vec3::new(x, mid_y, w / 2.0 + 0.1),
                    side_facing: false,
                });
            }
            for x in [w / 2.0 + 0.1, -w / 2.0 - 0.1] {
                for z in [-w / 3.0, w / 3.0] {
                    windows.push(WindowPlan {
                        position: Vec3::new(x, mid_y, z),
                        side_facing: true,
                    });
                }
            }
        }

        let roof = RoofPlan {
            position: Vec3::new(0.0, h + ROOF_CLEARANCE, 0.0),
            radius: w * ROOF_RADIUS_FACTOR,
            height: ROOF_HEIGHT,
            yaw: std::f32::consts::FRAC_PI_4,
        };

        Self {
            spec: *spec,
            footprint: w,
            floor_height: fh,
            pads,
            beams,
            slabs,
            walls,
            windows,
            doors,
            roof,
            machines: machine_layout(w, h),
        }
    }

    /// Elements that take part in the staged reveal (everything except the
    /// ground plane and the machines).
    pub fn revealed_element_count(&self) -> usize {
        self.pads.len()
            + self.beams.len()
            + self.slabs.len()
            + self.walls.len()
            + self.windows.len()
            + self.doors.len()
            + 1 // roof
    }

    /// Every entity a build spawns, including ground and machines.
    pub fn total_element_count(&self) -> usize {
        self.revealed_element_count() + 1 + self.machines.len()
    }
}

/// Fixed machine park around the footprint corners: crane behind-right,
/// mixer front-left, excavator out past the front-right corner.
fn machine_layout(w: f32, h: f32) -> Vec<MachinePlan> {
    let near = w + MACHINE_MARGIN;
    let far = w + EXCAVATOR_MARGIN;

    vec![
        MachinePlan {
            role: MachineRole::CraneBase,
            shape: MachineShape::Block(Vec3::new(1.0, 1.0, 1.0)),
            position: Vec3::new(near, 0.5, -near),
            tilt: 0.0,
        },
        MachinePlan {
            role: MachineRole::CraneTower,
            shape: MachineShape::Block(Vec3::new(0.5, h * 1.5, 0.5)),
            position: Vec3::new(near, h * 0.75, -near),
            tilt: 0.0,
        },
        MachinePlan {
            role: MachineRole::CraneArm,
            shape: MachineShape::Block(Vec3::new(w * 1.5, 0.2, 0.5)),
            position: Vec3::new(near - w * 0.75, h * 1.5 - 0.5, -near),
            tilt: 0.0,
        },
        MachinePlan {
            role: MachineRole::MixerBase,
            shape: MachineShape::Block(Vec3::new(1.5, 0.5, 2.5)),
            position: Vec3::new(-near, 0.25, near),
            tilt: 0.0,
        },
        MachinePlan {
            role: MachineRole::MixerDrum,
            shape: MachineShape::Drum {
                radius: 0.8,
                length: 1.5,
            },
            position: Vec3::new(-near, 1.25, near),
            tilt: std::f32::consts::FRAC_PI_4,
        },
        MachinePlan {
            role: MachineRole::ExcavatorBase,
            shape: MachineShape::Block(Vec3::new(2.0, 0.8, 3.0)),
            position: Vec3::new(far, 0.4, far),
            tilt: 0.0,
        },
        MachinePlan {
            role: MachineRole::ExcavatorArm,
            shape: MachineShape::Block(Vec3::new(0.5, 0.5, 2.0)),
            position: Vec3::new(far, 1.0, far + 1.0),
            tilt: 0.0,
        },
        MachinePlan {
            role: MachineRole::ExcavatorBucket,
            shape: MachineShape::Block(Vec3::new(0.8, 0.4, 0.8)),
            position: Vec3::new(far, 1.0, far + 2.5),
            tilt: 0.0,
        },
    ]
}

/// Window pane extents; side panes swap width and height before the 90
/// degree turn, matching the front profile.
pub fn window_size(side_facing: bool) -> Vec3 {
    if side_facing {
        Vec3::new(WINDOW_HEIGHT, WINDOW_WIDTH, WINDOW_THICKNESS)
    } else {
        Vec3::new(WINDOW_WIDTH, WINDOW_HEIGHT, WINDOW_THICKNESS)
    }
}

pub fn door_size() -> Vec3 {
    Vec3::new(DOOR_WIDTH, DOOR_HEIGHT, DOOR_THICKNESS)
}

pub fn beam_size(length: f32) -> Vec3 {
    Vec3::new(length, BEAM_THICKNESS, BEAM_THICKNESS)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(height: f32, floors: u32) -> ScenePlan {
        ScenePlan::new(&BuildingSpec::new(height, floors).unwrap())
    }

    #[test]
    fn test_three_floor_example() {
        // H=9, F=3: floor height 3, footprint 7.5, slabs at 0/3/6,
        // 12 wall panels, roof centred at 10.
        let p = plan(9.0, 3);
        assert!((p.footprint - 7.5).abs() < 1e-5);
        assert!((p.floor_height - 3.0).abs() < 1e-5);

        assert_eq!(p.slabs.len(), 3);
        for (i, slab) in p.slabs.iter().enumerate() {
            assert!((slab.position.y - i as f32 * 3.0).abs() < 1e-5);
        }

        assert_eq!(p.walls.len(), 12);
        assert!((p.roof.position.y - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_wall_groups_centred_per_floor() {
        let p = plan(9.0, 3);
        for (i, group) in p.walls.chunks(4).enumerate() {
            let expect = i as f32 * 3.0 + 1.5;
            for wall in group {
                assert!(
                    (wall.position.y - expect).abs() < 1e-5,
                    "floor {i} wall at {}",
                    wall.position.y
                );
            }
        }
    }

    #[test]
    fn test_single_door_on_ground_floor() {
        for floors in 1..6 {
            let p = plan(9.0, floors);
            assert_eq!(p.doors.len(), 1, "{floors} floors");
            let door = p.doors[0];
            // Bottom edge rests on the ground slab.
            assert!((door.position.y - 1.0).abs() < 1e-5);
            assert!((door.closed_z - (p.footprint / 2.0 + 0.1)).abs() < 1e-5);
            assert!((door.open_z - (door.closed_z - 1.0)).abs() < 1e-5);
        }
    }

    #[test]
    fn test_six_windows_per_floor() {
        for floors in 1..5 {
            let p = plan(10.0, floors);
            assert_eq!(p.windows.len(), 6 * floors as usize);
            let side = p.windows.iter().filter(|w| w.side_facing).count();
            assert_eq!(side, 4 * floors as usize);
        }
    }

    #[test]
    fn test_windows_symmetric() {
        let p = plan(9.0, 1);
        let sum_x: f32 = p.windows.iter().map(|w| w.position.x).sum();
        let sum_z: f32 = p.windows.iter().map(|w| w.position.z).sum();
        assert!(sum_x.abs() < 1e-4);
        // Front panes sit forward of the wall; side panes cancel in z.
        let front_z: f32 = p
            .windows
            .iter()
            .filter(|w| !w.side_facing)
            .map(|w| w.position.z)
            .sum();
        assert!((sum_z - front_z).abs() < 1e-4);
    }

    #[test]
    fn test_foundation_matches_layout_planner() {
        // footprint 7.5 -> 3x3 pads, 12 beams.
        let p = plan(9.0, 3);
        assert_eq!(p.pads.len(), 9);
        assert_eq!(p.beams.len(), 12);
        for pad in &p.pads {
            assert!((pad.position.y + 0.25).abs() < 1e-5);
        }
        for beam in &p.beams {
            assert!(beam.length > 0.0);
            assert!(beam.position.y.abs() < 1e-5);
        }
    }

    #[test]
    fn test_machine_park() {
        let p = plan(9.0, 3);
        assert_eq!(p.machines.len(), 8);
        let drum = p
            .machines
            .iter()
            .find(|m| m.role == MachineRole::MixerDrum)
            .unwrap();
        assert!(matches!(drum.shape, MachineShape::Drum { .. }));
        assert!(drum.tilt > 0.0);
        // The excavator parks further out than the crane.
        let crane = p
            .machines
            .iter()
            .find(|m| m.role == MachineRole::CraneBase)
            .unwrap();
        let excavator = p
            .machines
            .iter()
            .find(|m| m.role == MachineRole::ExcavatorBase)
            .unwrap();
        assert!(excavator.position.x > crane.position.x);
    }

    #[test]
    fn test_element_counts() {
        let p = plan(9.0, 3);
        // 9 pads + 12 beams + 3 slabs + 12 walls + 18 windows + 1 door + roof
        assert_eq!(p.revealed_element_count(), 56);
        // + ground + 8 machines
        assert_eq!(p.total_element_count(), 65);
    }

    #[test]
    fn test_roof_scales_with_footprint() {
        let small = plan(3.0, 1);
        let large = plan(20.0, 8);
        assert!(large.roof.radius > small.roof.radius);
        assert!((small.roof.radius - small.footprint * 0.7).abs() < 1e-5);
    }
}
