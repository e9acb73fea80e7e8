//! Local, deterministic terrain provider.
//!
//! Soil composition and elevation come from seeded noise fields over
//! latitude/longitude; a manual region table and USDA-style texture
//! thresholds then decide the soil type. Illustrative only -- the numbers
//! drive suggestion text and form validation, never the 3D layout.

use bevy::prelude::*;
use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};
use serde::{Deserialize, Serialize};

use crate::config::{
    ELEVATION_NOISE_FREQUENCY, ELEVATION_SCALE_M, ELEVATION_SEED, MAX_SLOPE_DEG,
    SLOPE_SAMPLE_STEP, SOIL_NOISE_FREQUENCY, SOIL_SEED,
};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Soil classes the advisor knows about. The first two come from the
/// manual region tables; the rest follow USDA texture thresholds, with
/// rocky/gravelly ground substituted at high elevation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoilType {
    BlackCotton,
    Desert,
    Clay,
    Sandy,
    Silt,
    ClayLoam,
    LoamySand,
    SiltLoam,
    SandyLoam,
    Loam,
    Gravel,
    Rock,
}

impl SoilType {
    /// Display name for panels and reports.
    pub fn name(self) -> &'static str {
        match self {
            SoilType::BlackCotton => "Black Cotton",
            SoilType::Desert => "Desert",
            SoilType::Clay => "Clay",
            SoilType::Sandy => "Sandy",
            SoilType::Silt => "Silt",
            SoilType::ClayLoam => "Clay Loam",
            SoilType::LoamySand => "Loamy Sand",
            SoilType::SiltLoam => "Silt Loam",
            SoilType::SandyLoam => "Sandy Loam",
            SoilType::Loam => "Loam",
            SoilType::Gravel => "Gravel",
            SoilType::Rock => "Rock",
        }
    }
}

/// Surface fractions in percent. clay + sand + silt sums to ~100;
/// organic is an independent 0-4% channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoilComposition {
    pub clay: f32,
    pub sand: f32,
    pub silt: f32,
    pub organic: f32,
}

/// Everything the UI and advisor need to know about a site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainSample {
    pub latitude: f32,
    pub longitude: f32,
    pub elevation_m: f32,
    pub slope_deg: f32,
    pub soil: SoilType,
}

/// The currently surveyed site. UI systems write the coordinates and
/// trigger a survey; the advisor reads the sample.
#[derive(Resource, Debug, Clone)]
pub struct SiteSurvey {
    pub latitude: f32,
    pub longitude: f32,
    pub sample: Option<TerrainSample>,
}

impl Default for SiteSurvey {
    fn default() -> Self {
        // Default site: the Western Ghats.
        Self {
            latitude: 10.09,
            longitude: 77.03,
            sample: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Noise fields
// ---------------------------------------------------------------------------

fn fbm_noise(seed: i32, frequency: f32) -> FastNoiseLite {
    let mut noise = FastNoiseLite::with_seed(seed);
    noise.set_noise_type(Some(NoiseType::OpenSimplex2));
    noise.set_frequency(Some(frequency));
    noise.set_fractal_type(Some(FractalType::FBm));
    noise.set_fractal_octaves(Some(4));
    noise
}

/// Noise channel normalised to [0, 1].
fn channel(seed: i32, frequency: f32, lat: f32, lon: f32) -> f32 {
    let raw = fbm_noise(seed, frequency).get_noise_2d(lon, lat);
    ((raw + 1.0) * 0.5).clamp(0.0, 1.0)
}

/// Synthetic surface composition at a coordinate.
pub fn sample_composition(lat: f32, lon: f32) -> SoilComposition {
    let clay_w = channel(SOIL_SEED, SOIL_NOISE_FREQUENCY, lat, lon);
    let sand_w = channel(SOIL_SEED + 1, SOIL_NOISE_FREQUENCY, lat, lon);
    let silt_w = channel(SOIL_SEED + 2, SOIL_NOISE_FREQUENCY, lat, lon);
    let organic = channel(SOIL_SEED + 3, SOIL_NOISE_FREQUENCY, lat, lon) * 4.0;

    let total = (clay_w + sand_w + silt_w).max(1e-6);
    SoilComposition {
        clay: clay_w / total * 100.0,
        sand: sand_w / total * 100.0,
        silt: silt_w / total * 100.0,
        organic,
    }
}

pub fn elevation_m(lat: f32, lon: f32) -> f32 {
    channel(ELEVATION_SEED, ELEVATION_NOISE_FREQUENCY, lat, lon) * ELEVATION_SCALE_M
}

/// Slope in degrees from a central-difference gradient of the elevation
/// field. One degree of arc is taken as 111.32 km of ground distance.
pub fn slope_deg(lat: f32, lon: f32) -> f32 {
    let step = SLOPE_SAMPLE_STEP;
    let metres_per_degree = 111_320.0;
    let dx = (elevation_m(lat, lon + step) - elevation_m(lat, lon - step))
        / (2.0 * step * metres_per_degree);
    let dz = (elevation_m(lat + step, lon) - elevation_m(lat - step, lon))
        / (2.0 * step * metres_per_degree);
    let gradient = (dx * dx + dz * dz).sqrt();
    gradient.atan().to_degrees().clamp(0.0, MAX_SLOPE_DEG)
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

struct PointRegion {
    points: &'static [(f32, f32)],
    threshold: f32,
    soil: SoilType,
}

struct BoundedRegion {
    min_lat: f32,
    max_lat: f32,
    min_lon: f32,
    max_lon: f32,
    soil: SoilType,
}

// Manual overrides: known black-cotton districts, a loam hill station,
// and the two big deserts.
const POINT_REGIONS: &[PointRegion] = &[
    PointRegion {
        points: &[(10.36, 77.96), (10.38, 77.95), (10.35, 77.98)],
        threshold: 0.1,
        soil: SoilType::BlackCotton,
    },
    PointRegion {
        points: &[(10.95, 77.30)],
        threshold: 0.05,
        soil: SoilType::BlackCotton,
    },
    PointRegion {
        points: &[(31.10, 77.15)],
        threshold: 0.2,
        soil: SoilType::Loam,
    },
];

const BOUNDED_REGIONS: &[BoundedRegion] = &[
    // Thar
    BoundedRegion {
        min_lat: 24.0,
        max_lat: 30.0,
        min_lon: 68.0,
        max_lon: 75.0,
        soil: SoilType::Desert,
    },
    // Sahara
    BoundedRegion {
        min_lat: 18.0,
        max_lat: 30.0,
        min_lon: -18.0,
        max_lon: 40.0,
        soil: SoilType::Desert,
    },
];

/// Manual region table, checked before any composition-based rule.
pub fn region_override(lat: f32, lon: f32) -> Option<SoilType> {
    for region in POINT_REGIONS {
        let hit = region.points.iter().any(|(r_lat, r_lon)| {
            (lat - r_lat).abs() < region.threshold && (lon - r_lon).abs() < region.threshold
        });
        if hit {
            return Some(region.soil);
        }
    }
    for region in BOUNDED_REGIONS {
        if lat >= region.min_lat
            && lat <= region.max_lat
            && lon >= region.min_lon
            && lon <= region.max_lon
        {
            return Some(region.soil);
        }
    }
    None
}

/// USDA-style texture classification over the synthetic composition.
pub fn classify(comp: &SoilComposition) -> SoilType {
    if comp.clay > 35.0 && comp.silt < 40.0 && comp.organic > 1.5 {
        return SoilType::BlackCotton;
    }
    if comp.sand > 85.0 && comp.clay < 10.0 && comp.organic < 1.0 {
        return SoilType::Desert;
    }
    if comp.clay >= 40.0 {
        return SoilType::Clay;
    }
    if comp.sand >= 70.0 {
        return SoilType::Sandy;
    }
    if comp.silt >= 80.0 {
        return SoilType::Silt;
    }
    if comp.clay >= 27.0 && comp.sand <= 20.0 {
        return SoilType::ClayLoam;
    }
    if comp.sand >= 43.0 && comp.clay <= 7.0 {
        return SoilType::LoamySand;
    }
    if comp.silt >= 50.0 && comp.clay < 27.0 {
        return SoilType::SiltLoam;
    }
    if comp.clay < 27.0 && comp.sand >= 45.0 {
        return SoilType::SandyLoam;
    }
    SoilType::Loam
}

/// Survey a coordinate: elevation, slope, and soil class.
///
/// High ground overrides the texture classes -- above ~1800 m the surface
/// reads as rock, and sandy ground above ~1200 m as gravel.
pub fn sample_terrain(lat: f32, lon: f32) -> TerrainSample {
    let elevation = elevation_m(lat, lon);
    let slope = slope_deg(lat, lon);

    let soil = region_override(lat, lon).unwrap_or_else(|| {
        let comp = sample_composition(lat, lon);
        if elevation > 1800.0 {
            SoilType::Rock
        } else if elevation > 1200.0 && comp.sand > 50.0 {
            SoilType::Gravel
        } else {
            classify(&comp)
        }
    });

    TerrainSample {
        latitude: lat,
        longitude: lon,
        elevation_m: elevation,
        slope_deg: slope,
        soil,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampling_is_deterministic() {
        let a = sample_terrain(10.09, 77.03);
        let b = sample_terrain(10.09, 77.03);
        assert_eq!(a, b);
    }

    #[test]
    fn test_composition_sums_to_100() {
        let comp = sample_composition(48.85, 2.35);
        let total = comp.clay + comp.sand + comp.silt;
        assert!((total - 100.0).abs() < 0.01, "total {total}");
    }

    #[test]
    fn test_slope_within_bounds() {
        for (lat, lon) in [(0.0, 0.0), (10.09, 77.03), (-33.9, 151.2), (64.1, -21.9)] {
            let slope = slope_deg(lat, lon);
            assert!((0.0..=MAX_SLOPE_DEG).contains(&slope), "slope {slope}");
        }
    }

    #[test]
    fn test_sahara_reads_as_desert() {
        assert_eq!(region_override(23.0, 10.0), Some(SoilType::Desert));
        assert_eq!(sample_terrain(23.0, 10.0).soil, SoilType::Desert);
    }

    #[test]
    fn test_thar_reads_as_desert() {
        assert_eq!(region_override(26.5, 71.0), Some(SoilType::Desert));
    }

    #[test]
    fn test_dindigul_reads_as_black_cotton() {
        assert_eq!(region_override(10.36, 77.96), Some(SoilType::BlackCotton));
    }

    #[test]
    fn test_shimla_reads_as_loam() {
        assert_eq!(region_override(31.10, 77.15), Some(SoilType::Loam));
    }

    #[test]
    fn test_no_override_in_open_ocean() {
        assert_eq!(region_override(-40.0, -130.0), None);
    }

    #[test]
    fn test_classification_thresholds() {
        let clay = SoilComposition {
            clay: 45.0,
            sand: 30.0,
            silt: 25.0,
            organic: 0.5,
        };
        assert_eq!(classify(&clay), SoilType::Clay);

        let sandy = SoilComposition {
            clay: 10.0,
            sand: 75.0,
            silt: 15.0,
            organic: 0.5,
        };
        assert_eq!(classify(&sandy), SoilType::Sandy);

        let black_cotton = SoilComposition {
            clay: 38.0,
            sand: 30.0,
            silt: 32.0,
            organic: 2.0,
        };
        assert_eq!(classify(&black_cotton), SoilType::BlackCotton);

        let desert = SoilComposition {
            clay: 5.0,
            sand: 90.0,
            silt: 5.0,
            organic: 0.2,
        };
        assert_eq!(classify(&desert), SoilType::Desert);

        let loam = SoilComposition {
            clay: 20.0,
            sand: 40.0,
            silt: 40.0,
            organic: 1.0,
        };
        assert_eq!(classify(&loam), SoilType::Loam);
    }

    #[test]
    fn test_sample_serializes() {
        let sample = sample_terrain(10.09, 77.03);
        let json = serde_json::to_string(&sample).unwrap();
        assert!(json.contains("soil"));
    }
}
