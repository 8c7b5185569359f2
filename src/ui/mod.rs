use bevy::prelude::*;

mod camera;
mod parameter_panel;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            camera::CameraPlugin,
            parameter_panel::ParameterPanelPlugin,
        ));
    }
}
