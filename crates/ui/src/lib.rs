use bevy::prelude::*;
use bevy_egui::EguiPlugin;

pub mod build_panel;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin)
            .init_resource::<build_panel::BuildForm>()
            .add_systems(Update, build_panel::build_panel_ui);
    }
}
