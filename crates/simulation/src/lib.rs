use bevy::prelude::*;

pub mod advisor;
pub mod building;
pub mod config;
pub mod footing;
pub mod terrain;

pub use building::{BuildRequest, BuildingSpec};

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<terrain::SiteSurvey>()
            .add_event::<BuildRequest>();
    }
}
