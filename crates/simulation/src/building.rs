//! Building dimensions as entered by the user, plus the construction
//! trigger event consumed by the rendering crate.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{FOOTPRINT_BASE, FOOTPRINT_PER_FLOOR};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Validated building dimensions. `floors >= 1` and `height > 0` hold for
/// every constructed value, so `floor_height` can never divide by zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuildingSpec {
    height: f32,
    floors: u32,
}

/// Rejection reasons for user-entered dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecError {
    NonPositiveHeight,
    ZeroFloors,
}

impl std::fmt::Display for SpecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpecError::NonPositiveHeight => write!(f, "height must be greater than zero"),
            SpecError::ZeroFloors => write!(f, "at least one floor is required"),
        }
    }
}

impl BuildingSpec {
    pub fn new(height: f32, floors: u32) -> Result<Self, SpecError> {
        if !(height > 0.0) {
            return Err(SpecError::NonPositiveHeight);
        }
        if floors == 0 {
            return Err(SpecError::ZeroFloors);
        }
        Ok(Self { height, floors })
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn floors(&self) -> u32 {
        self.floors
    }

    /// Square plan side length. Grows with floor count so taller buildings
    /// read as bulkier.
    pub fn footprint(&self) -> f32 {
        FOOTPRINT_BASE + self.floors as f32 * FOOTPRINT_PER_FLOOR
    }

    pub fn floor_height(&self) -> f32 {
        self.height / self.floors as f32
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Fired by the UI when the user starts construction. The rendering crate
/// tears down any previous site and replays the full reveal sequence.
#[derive(Event, Debug, Clone, Copy)]
pub struct BuildRequest {
    pub spec: BuildingSpec,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_spec() {
        let spec = BuildingSpec::new(9.0, 3).unwrap();
        assert_eq!(spec.height(), 9.0);
        assert_eq!(spec.floors(), 3);
    }

    #[test]
    fn test_floor_height_is_height_over_floors() {
        let spec = BuildingSpec::new(9.0, 3).unwrap();
        assert!((spec.floor_height() - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_footprint_grows_with_floors() {
        // 6 + 3 * 0.5 = 7.5
        let spec = BuildingSpec::new(9.0, 3).unwrap();
        assert!((spec.footprint() - 7.5).abs() < f32::EPSILON);

        let single = BuildingSpec::new(3.0, 1).unwrap();
        assert!((single.footprint() - 6.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_zero_floors_rejected() {
        assert_eq!(BuildingSpec::new(9.0, 0), Err(SpecError::ZeroFloors));
    }

    #[test]
    fn test_bad_height_rejected() {
        assert_eq!(
            BuildingSpec::new(0.0, 2),
            Err(SpecError::NonPositiveHeight)
        );
        assert_eq!(
            BuildingSpec::new(-4.0, 2),
            Err(SpecError::NonPositiveHeight)
        );
        assert_eq!(
            BuildingSpec::new(f32::NAN, 2),
            Err(SpecError::NonPositiveHeight)
        );
    }
}
