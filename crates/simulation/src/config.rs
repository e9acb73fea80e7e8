//! Shared dimensional and tuning constants.

/// Footprint side length for a zero-floor building, in world units.
pub const FOOTPRINT_BASE: f32 = 6.0;
/// Footprint growth per floor. A building's plan is always square:
/// side = FOOTPRINT_BASE + floors * FOOTPRINT_PER_FLOOR.
pub const FOOTPRINT_PER_FLOOR: f32 = 0.5;

/// Target spacing between footing pads. The pad grid is sized so that
/// actual pitch never exceeds this by much; see `footing::plan_layout`.
pub const FOOTING_SPACING: f32 = 3.0;
pub const PAD_RADIUS: f32 = 0.8;
pub const PAD_HEIGHT: f32 = 0.5;
pub const BEAM_THICKNESS: f32 = 0.3;

pub const WALL_THICKNESS: f32 = 0.2;
pub const SLAB_THICKNESS: f32 = 0.2;

pub const DOOR_WIDTH: f32 = 1.2;
pub const DOOR_HEIGHT: f32 = 2.0;
pub const DOOR_THICKNESS: f32 = 0.05;
/// How far a door slides along -Z when open.
pub const DOOR_SWING: f32 = 1.0;

pub const WINDOW_WIDTH: f32 = 1.0;
pub const WINDOW_HEIGHT: f32 = 0.8;
pub const WINDOW_THICKNESS: f32 = 0.05;

/// Pyramidal roof: base radius as a fraction of footprint, fixed height,
/// apex clearance above the top floor.
pub const ROOF_RADIUS_FACTOR: f32 = 0.7;
pub const ROOF_HEIGHT: f32 = 2.0;
pub const ROOF_CLEARANCE: f32 = 1.0;

pub const GROUND_SIZE: f32 = 200.0;

// Terrain provider noise parameters. Coordinates are degrees of
// latitude/longitude; frequencies are tuned so soil texture varies over
// tens of kilometres and elevation over hundreds.
pub const SOIL_NOISE_FREQUENCY: f32 = 0.8;
pub const ELEVATION_NOISE_FREQUENCY: f32 = 0.05;
pub const ELEVATION_SCALE_M: f32 = 2500.0;
/// Step used for the central-difference slope estimate, in degrees of
/// arc (~1 km at the equator).
pub const SLOPE_SAMPLE_STEP: f32 = 0.01;
pub const MAX_SLOPE_DEG: f32 = 45.0;

pub const SOIL_SEED: i32 = 1337;
pub const ELEVATION_SEED: i32 = 7001;
