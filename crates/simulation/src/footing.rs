//! Footing layout planner: maps a square footprint to a regular grid of
//! pad positions and the grade beams connecting adjacent pads.

use bevy::math::Vec2;

use crate::config::FOOTING_SPACING;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A grade beam between two grid-adjacent footing pads. Coordinates are
/// (x, z) on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamSegment {
    pub from: Vec2,
    pub to: Vec2,
}

impl BeamSegment {
    pub fn length(&self) -> f32 {
        self.from.distance(self.to)
    }

    pub fn midpoint(&self) -> Vec2 {
        (self.from + self.to) * 0.5
    }

    /// Yaw of the segment on the ground plane, matching the convention of
    /// a box whose long axis is +X.
    pub fn yaw(&self) -> f32 {
        let d = self.to - self.from;
        -d.y.atan2(d.x)
    }
}

/// Output of the planner: pads in row-major order, beams connecting each
/// pad to its -x and -z neighbor (so no segment appears twice).
#[derive(Debug, Clone, PartialEq)]
pub struct FootingLayout {
    pub pads: Vec<Vec2>,
    pub beams: Vec<BeamSegment>,
}

// ---------------------------------------------------------------------------
// Planner
// ---------------------------------------------------------------------------

/// Number of pads along one axis for a given footprint side length.
/// Always at least 2: even a footprint smaller than the target spacing
/// gets the minimum viable 2x2 foundation.
pub fn pads_per_axis(size: f32) -> usize {
    ((size / FOOTING_SPACING).ceil() as usize).max(2)
}

/// Plan the footing grid for a square footprint of side `size`, centred on
/// the origin. Pure and deterministic.
///
/// Pads are spaced evenly across [-size/2, size/2]; beams join each pad to
/// the actual coordinate of its immediate neighbor in the -x and -z
/// directions, so beam length always equals the real pad pitch.
pub fn plan_layout(size: f32) -> FootingLayout {
    let count = pads_per_axis(size.max(0.0));
    let half = size.max(0.0) / 2.0;
    let pitch = if count > 1 {
        size.max(0.0) / (count - 1) as f32
    } else {
        0.0
    };

    let mut pads = Vec::with_capacity(count * count);
    let mut beams = Vec::with_capacity(2 * count * (count - 1));

    for xi in 0..count {
        for zi in 0..count {
            let pad = Vec2::new(-half + xi as f32 * pitch, -half + zi as f32 * pitch);
            pads.push(pad);
            if xi > 0 {
                beams.push(BeamSegment {
                    from: pad,
                    to: Vec2::new(pad.x - pitch, pad.y),
                });
            }
            if zi > 0 {
                beams.push(BeamSegment {
                    from: pad,
                    to: Vec2::new(pad.x, pad.y - pitch),
                });
            }
        }
    }

    FootingLayout { pads, beams }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
