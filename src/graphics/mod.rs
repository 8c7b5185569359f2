use bevy::prelude::*;

mod point_cloud;
mod points_material;

pub struct GraphicsPlugin;

impl Plugin for GraphicsPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::BLACK))
            .add_plugins(point_cloud::PointCloudPlugin);
    }
}
