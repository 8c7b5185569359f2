use super::points_material::{GalaxyPointsMaterial, ATTRIBUTE_CORNER};
use crate::prelude::*;
use bevy::{
    prelude::*,
    render::{
        mesh::{Indices, PrimitiveTopology},
        render_asset::RenderAssetUsages,
        view::NoFrustumCulling,
    },
};
use rayon::prelude::*;

const QUAD_CORNERS: [[f32; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

pub struct PointCloudPlugin;

impl Plugin for PointCloudPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MaterialPlugin::<GalaxyPointsMaterial>::default())
            .add_systems(Startup, spawn_point_cloud)
            .add_systems(PostUpdate, sync_point_cloud);
    }
}

/// The entity drawing the galaxy and the generation its mesh was built from.
#[derive(Resource)]
struct PointCloudControl {
    entity: Entity,
    material: Handle<GalaxyPointsMaterial>,
    mesh: Option<Handle<Mesh>>,
    generation: u32,
}

fn spawn_point_cloud(
    mut commands: Commands,
    mut materials: ResMut<Assets<GalaxyPointsMaterial>>,
    store: Res<ParameterStore>,
) {
    let material = materials.add(GalaxyPointsMaterial::new(store.config().size));
    let entity = commands
        .spawn((
            MeshMaterial3d(material.clone()),
            Transform::IDENTITY,
            Visibility::Inherited,
            // quads are expanded in the vertex shader, the mesh bounds are too small
            NoFrustumCulling,
        ))
        .id();

    commands.insert_resource(PointCloudControl {
        entity,
        material,
        mesh: None,
        generation: 0,
    });
}

/// Swaps in a new mesh whenever the store holds a newer generation.
/// The old mesh asset is released before the new one is attached.
fn sync_point_cloud(
    mut commands: Commands,
    store: Res<ParameterStore>,
    mut control: ResMut<PointCloudControl>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<GalaxyPointsMaterial>>,
) {
    if control.generation == store.generation() {
        return;
    }

    if let Some(old) = control.mesh.take() {
        meshes.remove(&old);
    }

    let buffers = store.buffers();
    if buffers.is_empty() {
        commands.entity(control.entity).remove::<Mesh3d>();
    } else {
        let mesh = meshes.add(point_cloud_mesh(buffers));
        commands.entity(control.entity).insert(Mesh3d(mesh.clone()));
        control.mesh = Some(mesh);
    }

    if let Some(material) = materials.get_mut(&control.material) {
        material.point_size = store.config().size;
    }

    control.generation = store.generation();
    debug!(
        "Point cloud rebuilt for generation {} ({} points)",
        control.generation,
        buffers.len()
    );
}

/// Expands every particle into a quad of four vertices sharing its centre and
/// color, with the corner offsets left to the vertex shader.
pub fn point_cloud_mesh(buffers: &ParticleBuffers) -> Mesh {
    let vertex_count = buffers.len() * QUAD_CORNERS.len();

    let mut positions = vec![[0.0f32; 3]; vertex_count];
    positions
        .par_chunks_exact_mut(QUAD_CORNERS.len())
        .zip(buffers.positions().par_iter())
        .for_each(|(quad, center)| quad.fill(*center));

    let mut colors = vec![[0.0f32; 4]; vertex_count];
    colors
        .par_chunks_exact_mut(QUAD_CORNERS.len())
        .zip(buffers.colors().par_iter())
        .for_each(|(quad, color)| quad.fill(linear_color(*color)));

    let corners: Vec<[f32; 2]> = QUAD_CORNERS
        .iter()
        .copied()
        .cycle()
        .take(vertex_count)
        .collect();

    let mut indices = vec![0u32; buffers.len() * QUAD_INDICES.len()];
    indices
        .par_chunks_exact_mut(QUAD_INDICES.len())
        .enumerate()
        .for_each(|(i, quad)| {
            let base = (i * QUAD_CORNERS.len()) as u32;
            for (index, offset) in quad.iter_mut().zip(QUAD_INDICES) {
                *index = base + offset;
            }
        });

    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(ATTRIBUTE_CORNER, corners)
    .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, colors)
    .with_inserted_indices(Indices::U32(indices))
}

/// Vertex colors are linear, the generator works in sRGB.
fn linear_color([r, g, b]: [f32; 3]) -> [f32; 4] {
    let linear = LinearRgba::from(Srgba::rgb(r, g, b));
    [linear.red, linear.green, linear.blue, 1.0]
}
