//! Site survey and building form.
//!
//! One side panel walks the user through the flow: pick coordinates,
//! survey the site, enter dimensions, read the foundation suggestions,
//! start construction. Validation mirrors the advisor's site checks; the
//! build button only fires with dimensions the advisor accepts.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use rendering::sequencer::ConstructionTimeline;
use simulation::advisor;
use simulation::building::{BuildRequest, BuildingSpec};
use simulation::terrain::{self, SiteSurvey};

const REPORT_PATH: &str = "foundation_report.json";

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// Raw form state; turned into a `BuildingSpec` only when valid.
#[derive(Resource)]
pub struct BuildForm {
    pub height: f32,
    pub floors: u32,
}

impl Default for BuildForm {
    fn default() -> Self {
        Self {
            height: 9.0,
            floors: 3,
        }
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// The main control panel.
pub fn build_panel_ui(
    mut contexts: EguiContexts,
    mut form: ResMut<BuildForm>,
    mut survey: ResMut<SiteSurvey>,
    timeline: Res<ConstructionTimeline>,
    mut requests: EventWriter<BuildRequest>,
) {
    egui::SidePanel::left("build_panel")
        .default_width(320.0)
        .show(contexts.ctx_mut(), |ui| {
            ui.heading("Site");
            ui.add(
                egui::Slider::new(&mut survey.latitude, -85.0..=85.0)
                    .text("latitude")
                    .suffix("\u{b0}"),
            );
            ui.add(
                egui::Slider::new(&mut survey.longitude, -180.0..=180.0)
                    .text("longitude")
                    .suffix("\u{b0}"),
            );
            if ui.button("Survey site").clicked() {
                survey.sample = Some(terrain::sample_terrain(survey.latitude, survey.longitude));
            }

            let Some(sample) = survey.sample else {
                ui.label("Survey a location to begin.");
                return;
            };

            ui.label(format!("Soil: {}", sample.soil.name()));
            ui.label(format!("Slope: {:.1}\u{b0}", sample.slope_deg));
            ui.label(format!("Elevation: {:.0} m", sample.elevation_m));

            ui.separator();
            ui.heading("Building");
            ui.add(
                egui::Slider::new(&mut form.height, 1.0..=40.0)
                    .text("height")
                    .suffix(" m"),
            );
            ui.add(egui::Slider::new(&mut form.floors, 1..=10).text("floors"));

            let spec = match BuildingSpec::new(form.height, form.floors) {
                Ok(spec) => spec,
                Err(err) => {
                    ui.colored_label(egui::Color32::from_rgb(220, 80, 60), format!("{err}"));
                    return;
                }
            };

            if let Err(err) = advisor::check_site(&spec, &sample) {
                ui.colored_label(egui::Color32::from_rgb(220, 80, 60), format!("{err}"));
                return;
            }

            ui.separator();
            ui.heading("Suggestions");
            let report = advisor::report(&spec, &sample);
            ui.label(format!("Foundation: {}", report.foundation.name()));
            ui.label(format!(
                "Footing: {:.1} m x {:.1} m x {:.2} m",
                report.footing.width, report.footing.depth, report.footing.height
            ));
            ui.label(format!(
                "Reinforcement: {} mm bars @ {} mm spacing",
                report.reinforcement.bar_mm, report.reinforcement.spacing_mm
            ));
            ui.label(format!("Drainage: {}", report.drainage));
            ui.label(format!("Materials: {}", report.materials.join(", ")));

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Start construction").clicked() {
                    requests.send(BuildRequest { spec });
                }
                if ui.button("Export report").clicked() {
                    export_report(&report);
                }
            });

            if timeline.is_running() {
                ui.add(egui::ProgressBar::new(timeline.fraction()).text("building"));
            }
        });
}

/// Write the current recommendation to disk as JSON. Failures are logged,
/// never fatal.
fn export_report(report: &advisor::FoundationReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => match std::fs::write(REPORT_PATH, json) {
            Ok(()) => info!("report written to {REPORT_PATH}"),
            Err(err) => warn!("report export failed: {err}"),
        },
        Err(err) => warn!("report serialization failed: {err}"),
    }
}
