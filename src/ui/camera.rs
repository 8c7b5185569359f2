use bevy::{
    input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel},
    prelude::*,
    window::{PrimaryWindow, WindowResized},
};
use bevy_egui::EguiContexts;
use std::f32::consts::{FRAC_PI_2, TAU};

const INITIAL_POSITION: Vec3 = Vec3::new(3.0, 3.0, 3.0);
const FOV_DEGREES: f32 = 75.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 100.0;

/// Fraction of the pending motion applied per 60 Hz frame.
const DAMPING: f32 = 0.05;
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;
const MIN_DISTANCE: f32 = 0.5;
const MAX_DISTANCE: f32 = FAR * 0.5;
const LINE_ZOOM: f32 = 0.1;
const PIXEL_ZOOM: f32 = 0.002;

const MAX_PIXEL_RATIO: f32 = 2.0;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera)
            .add_systems(Update, cap_pixel_ratio)
            .add_systems(PostUpdate, camera_control_system);
    }
}

fn spawn_camera(mut commands: Commands) {
    let orbit = OrbitCamera::looking_at(INITIAL_POSITION, Vec3::ZERO);
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: FOV_DEGREES.to_radians(),
            near: NEAR,
            far: FAR,
            ..default()
        }),
        orbit.transform(),
        orbit,
    ));
}

/// Orbit navigation around a fixed target.
///
/// Input is collected into buffers and bled into the actual angles and
/// distance a little every frame, so motion eases out after the pointer stops.
#[derive(Component, Clone, Debug)]
pub struct OrbitCamera {
    target: Vec3,
    yaw: f32,
    pitch: f32,
    distance: f32,
    rotate_buffer: Vec2,
    zoom_buffer: f32,
}

impl OrbitCamera {
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().clamp(MIN_DISTANCE, MAX_DISTANCE);
        let direction = offset.normalize_or(Vec3::Z);
        Self {
            target,
            yaw: direction.x.atan2(direction.z),
            pitch: direction.y.asin().clamp(-PITCH_LIMIT, PITCH_LIMIT),
            distance,
            rotate_buffer: Vec2::ZERO,
            zoom_buffer: 0.0,
        }
    }

    /// Queues a rotation in radians: x turns around the vertical axis, y tilts.
    pub fn rotate(&mut self, delta: Vec2) {
        self.rotate_buffer += delta;
    }

    /// Queues a zoom; positive moves closer.
    pub fn zoom(&mut self, amount: f32) {
        self.zoom_buffer += amount;
    }

    pub fn step(&mut self, delta_secs: f32) {
        let blend = 1.0 - (1.0 - DAMPING).powf(delta_secs * 60.0);

        let rotation = self.rotate_buffer * blend;
        self.yaw -= rotation.x;
        self.pitch = (self.pitch + rotation.y).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.rotate_buffer -= rotation;

        let zoom = self.zoom_buffer * blend;
        self.distance = (self.distance * (-zoom).exp()).clamp(MIN_DISTANCE, MAX_DISTANCE);
        self.zoom_buffer -= zoom;
    }

    pub fn translation(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target + vec3(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * self.distance
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.translation()).looking_at(self.target, Vec3::Y)
    }
}

fn camera_control_system(
    mut cameras: Query<(&mut Transform, &mut OrbitCamera)>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut motion_evr: EventReader<MouseMotion>,
    mut scroll_evr: EventReader<MouseWheel>,
    mut contexts: EguiContexts,
    time: Res<Time>,
) {
    // drain both readers every frame, even when the panel owns the pointer
    let drag: Vec2 = motion_evr.read().map(|ev| ev.delta).sum();
    let scroll: f32 = scroll_evr
        .read()
        .map(|ev| match ev.unit {
            MouseScrollUnit::Line => ev.y * LINE_ZOOM,
            MouseScrollUnit::Pixel => ev.y * PIXEL_ZOOM,
        })
        .sum();

    let pointer_on_panel = contexts
        .try_ctx_mut()
        .is_some_and(|ctx| ctx.wants_pointer_input() || ctx.is_pointer_over_area());
    let height = windows.single().map(|w| w.height()).unwrap_or(1.0).max(1.0);

    for (mut transform, mut orbit) in &mut cameras {
        if !pointer_on_panel {
            if mouse_buttons.pressed(MouseButton::Left) {
                // a full-height drag turns the camera once around
                orbit.rotate(drag * TAU / height);
            }
            orbit.zoom(scroll);
        }
        orbit.step(time.delta_secs());
        *transform = orbit.transform();
    }
}

/// Bevy keeps the projection aspect in sync with the window itself. This only
/// caps the pixel density so high-DPI screens don't render more than 2x.
fn cap_pixel_ratio(mut resized: EventReader<WindowResized>, mut windows: Query<&mut Window>) {
    for ev in resized.read() {
        let Ok(mut window) = windows.get_mut(ev.window) else {
            continue;
        };
        let scale_override = pixel_ratio_override(window.resolution.base_scale_factor());
        if window.resolution.scale_factor_override() != scale_override {
            window.resolution.set_scale_factor_override(scale_override);
        }
        debug!("Window resized to {}x{}", ev.width, ev.height);
    }
}

fn pixel_ratio_override(base_scale_factor: f32) -> Option<f32> {
    (base_scale_factor > MAX_PIXEL_RATIO).then_some(MAX_PIXEL_RATIO)
}
