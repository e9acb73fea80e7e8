//! Heuristic foundation advisor.
//!
//! Threshold rules and small formulas that turn (building spec, terrain
//! sample) into a recommendation: foundation type, footing dimensions,
//! reinforcement, drainage, and material suggestions, plus the site
//! limits used to validate the form. Demo-grade rules, not engineering.

use serde::Serialize;

use crate::building::BuildingSpec;
use crate::terrain::{SoilType, TerrainSample};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FoundationType {
    Piled,
    Raft,
    Strip,
    DeepStrip,
    Pad,
}

impl FoundationType {
    pub fn name(self) -> &'static str {
        match self {
            FoundationType::Piled => "Piled Foundation",
            FoundationType::Raft => "Raft Foundation",
            FoundationType::Strip => "Strip Foundation",
            FoundationType::DeepStrip => "Deep Strip Foundation",
            FoundationType::Pad => "Pad Foundation",
        }
    }
}

/// Recommended footing block, metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FootingDimensions {
    pub width: f32,
    pub depth: f32,
    pub height: f32,
}

/// Rebar size and spacing, millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reinforcement {
    pub bar_mm: u32,
    pub spacing_mm: u32,
}

/// What a given soil will carry on a given slope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoilLimits {
    pub max_height: f32,
    pub max_floors: u32,
}

/// Why a building cannot go on this site as entered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SiteCheckError {
    TooTallForSlope { max_height: f32 },
    ExceedsSoilLimits { soil: SoilType, max_height: f32, max_floors: u32 },
}

impl std::fmt::Display for SiteCheckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SiteCheckError::TooTallForSlope { max_height } => write!(
                f,
                "too tall for this slope, max recommended {:.0} m",
                max_height.floor()
            ),
            SiteCheckError::ExceedsSoilLimits {
                soil,
                max_height,
                max_floors,
            } => write!(
                f,
                "exceeds {} soil limits, max {:.0} m / {} floors",
                soil.name(),
                max_height,
                max_floors
            ),
        }
    }
}

/// The full recommendation, displayed by the UI and exportable as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct FoundationReport {
    pub terrain: TerrainSample,
    pub spec: BuildingSpec,
    pub foundation: FoundationType,
    pub footing: FootingDimensions,
    pub reinforcement: Reinforcement,
    pub drainage: &'static str,
    pub materials: Vec<&'static str>,
}

// ---------------------------------------------------------------------------
// Site limits
// ---------------------------------------------------------------------------

/// Simple slope rule: every degree of slope past level ground costs half a
/// metre of allowable height, anchored at 25 m on flat ground.
pub fn max_height_for_slope(slope_deg: f32) -> f32 {
    10.0 + (30.0 - slope_deg) * 0.5
}

/// Height/floor caps by bearing class. Soils without an explicit row get
/// the clay (most conservative common) limits.
pub fn soil_limits(soil: SoilType, slope_deg: f32) -> SoilLimits {
    match soil {
        SoilType::Sandy => SoilLimits {
            max_height: 12.0 + (30.0 - slope_deg) * 0.3,
            max_floors: 3,
        },
        SoilType::Gravel => SoilLimits {
            max_height: 18.0 + (30.0 - slope_deg) * 0.6,
            max_floors: 5,
        },
        SoilType::Rock => SoilLimits {
            max_height: 25.0 + (30.0 - slope_deg) * 0.8,
            max_floors: 8,
        },
        _ => SoilLimits {
            max_height: 15.0 + (30.0 - slope_deg) * 0.4,
            max_floors: 4,
        },
    }
}

/// Form validation: slope rule first, then the soil table.
pub fn check_site(spec: &BuildingSpec, terrain: &TerrainSample) -> Result<(), SiteCheckError> {
    let slope_cap = max_height_for_slope(terrain.slope_deg);
    if spec.height() > slope_cap {
        return Err(SiteCheckError::TooTallForSlope {
            max_height: slope_cap,
        });
    }

    let limits = soil_limits(terrain.soil, terrain.slope_deg);
    if spec.height() > limits.max_height || spec.floors() > limits.max_floors {
        return Err(SiteCheckError::ExceedsSoilLimits {
            soil: terrain.soil,
            max_height: limits.max_height,
            max_floors: limits.max_floors,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Recommendations
// ---------------------------------------------------------------------------

pub fn foundation_type(spec: &BuildingSpec, terrain: &TerrainSample) -> FoundationType {
    if terrain.slope_deg > 15.0 {
        return FoundationType::Piled;
    }
    match terrain.soil {
        SoilType::Clay => FoundationType::Raft,
        SoilType::Sandy => FoundationType::Strip,
        _ if spec.height() > 15.0 || spec.floors() > 3 => FoundationType::DeepStrip,
        _ => FoundationType::Pad,
    }
}

pub fn footing_dimensions(spec: &BuildingSpec, terrain: &TerrainSample) -> FootingDimensions {
    let base = 1.0 + spec.height() / 10.0 + spec.floors() as f32 * 0.2;

    let size_multiplier = match terrain.soil {
        SoilType::Clay => 1.2,
        SoilType::Sandy => 1.1,
        SoilType::Rock => 0.9,
        _ => 1.0,
    };
    let slope_adjustment = 1.0 + terrain.slope_deg * 0.01;

    let plan = (base * size_multiplier * slope_adjustment * 10.0).round() / 10.0;
    FootingDimensions {
        width: plan,
        depth: plan,
        height: 0.5 + spec.height() * 0.05,
    }
}

pub fn reinforcement(spec: &BuildingSpec, terrain: &TerrainSample) -> Reinforcement {
    let mut bar = 10.0 + spec.height() / 3.0;
    let mut spacing = 150.0 - spec.height() * 2.0;

    match terrain.soil {
        SoilType::Clay => {
            bar += 2.0;
            spacing -= 10.0;
        }
        SoilType::Sandy => {
            bar += 1.0;
            spacing -= 5.0;
        }
        _ => {}
    }

    Reinforcement {
        bar_mm: (bar.round() as u32).clamp(10, 20),
        spacing_mm: (spacing.round() as u32).clamp(100, 200),
    }
}

pub fn drainage(terrain: &TerrainSample) -> &'static str {
    if terrain.slope_deg > 10.0 {
        return "Install French drains around perimeter";
    }
    if terrain.soil == SoilType::Clay {
        return "Include sub-surface drainage system";
    }
    "Standard perimeter drainage"
}

pub fn materials(spec: &BuildingSpec, terrain: &TerrainSample) -> Vec<&'static str> {
    let mut out = Vec::new();
    if terrain.soil == SoilType::Rock {
        out.push("Stone masonry");
    }
    if terrain.soil == SoilType::Clay {
        out.push("Reinforced concrete");
    }
    if spec.height() > 10.0 {
        out.push("Steel frame construction");
    }
    if out.is_empty() {
        out.push("Brick with concrete blocks");
    }
    out
}

/// Assemble the full report for display or export.
pub fn report(spec: &BuildingSpec, terrain: &TerrainSample) -> FoundationReport {
    FoundationReport {
        terrain: *terrain,
        spec: *spec,
        foundation: foundation_type(spec, terrain),
        footing: footing_dimensions(spec, terrain),
        reinforcement: reinforcement(spec, terrain),
        drainage: drainage(terrain),
        materials: materials(spec, terrain),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
