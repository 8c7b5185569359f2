use crate::galaxy::{GenerationStatus, ParametersCommitted};
use crate::prelude::*;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

pub struct ParameterPanelPlugin;

impl Plugin for ParameterPanelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ParameterDraft>()
            .add_systems(Startup, configure_visuals_system)
            .add_systems(Update, ui_system);
    }
}

/// Parameters as currently shown in the panel, ahead of the store until the
/// user finishes the edit.
#[derive(Resource)]
struct ParameterDraft {
    config: GalaxyConfig,
    gate: CommitGate,
}

impl FromWorld for ParameterDraft {
    fn from_world(world: &mut World) -> Self {
        let config = world
            .get_resource::<ParameterStore>()
            .map(|store| store.config().clone())
            .unwrap_or_default();
        Self {
            config,
            gate: CommitGate::default(),
        }
    }
}

/// Holds back edits while the user is still dragging or typing.
#[derive(Default, Debug)]
struct CommitGate {
    pending: bool,
}

impl CommitGate {
    fn note_edit(&mut self) {
        self.pending = true;
    }

    /// True once per finished interaction that changed something.
    fn poll(&mut self, interacting: bool) -> bool {
        if self.pending && !interacting {
            self.pending = false;
            true
        } else {
            false
        }
    }
}

fn configure_visuals_system(mut contexts: EguiContexts) {
    if let Some(ctx) = contexts.try_ctx_mut() {
        ctx.set_visuals(egui::Visuals {
            window_corner_radius: 0.0.into(),
            ..Default::default()
        });
    }
}

fn slider<N: egui::emath::Numeric>(
    ui: &mut egui::Ui,
    value: &mut N,
    min: N,
    max: N,
    step: N,
    label: &str,
) -> bool {
    ui.add(
        egui::Slider::new(value, min..=max)
            .step_by(step.to_f64())
            .text(label),
    )
    .changed()
}

fn color_picker(ui: &mut egui::Ui, color: &mut Vec3, label: &str) -> bool {
    let mut srgb = to_srgb8(*color);
    let changed = ui
        .horizontal(|ui| {
            let response = egui::color_picker::color_edit_button_srgb(ui, &mut srgb);
            ui.label(label);
            response.changed()
        })
        .inner;
    if changed {
        *color = from_srgb8(srgb);
    }
    changed
}

fn to_srgb8(color: Vec3) -> [u8; 3] {
    color
        .to_array()
        .map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

fn from_srgb8(color: [u8; 3]) -> Vec3 {
    Vec3::from_array(color.map(|c| f32::from(c) / 255.0))
}

fn ui_system(
    mut contexts: EguiContexts,
    mut draft: ResMut<ParameterDraft>,
    status: Res<GenerationStatus>,
    store: Res<ParameterStore>,
    mut commits: EventWriter<ParametersCommitted>,
) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };
    let draft = &mut *draft;
    let (min, max, step) = (GalaxyConfig::MIN, GalaxyConfig::MAX, GalaxyConfig::STEP);

    let mut edited = false;
    egui::SidePanel::left("parameter_panel")
        .default_width(340.0)
        .show(ctx, |ui| {
            ui.heading("Galaxy");
            let config = &mut draft.config;

            edited |= slider(ui, &mut config.count, min.count, max.count, step.count, "Count");
            edited |= slider(ui, &mut config.size, min.size, max.size, step.size, "Size");
            edited |= slider(ui, &mut config.radius, min.radius, max.radius, step.radius, "Radius");
            edited |= slider(
                ui,
                &mut config.branches,
                min.branches,
                max.branches,
                step.branches,
                "Branches",
            );
            edited |= slider(ui, &mut config.spin, min.spin, max.spin, step.spin, "Spin");
            edited |= slider(
                ui,
                &mut config.branch_radius,
                min.branch_radius,
                max.branch_radius,
                step.branch_radius,
                "Branch Radius",
            );
            edited |= slider(
                ui,
                &mut config.pointiness,
                min.pointiness,
                max.pointiness,
                step.pointiness,
                "Pointiness",
            );
            edited |= slider(
                ui,
                &mut config.color_randomness,
                min.color_randomness,
                max.color_randomness,
                step.color_randomness,
                "Color Randomness",
            );
            ui.separator();
            edited |= color_picker(ui, &mut config.inside_color, "Inside Color");
            edited |= color_picker(ui, &mut config.outside_color, "Outside Color");

            ui.separator();
            ui.label(format!(
                "Generation {} · {} particles",
                store.generation(),
                store.buffers().len()
            ));
            if let Some(err) = &status.last_error {
                ui.colored_label(egui::Color32::LIGHT_RED, err.to_string());
            }
        });

    if edited {
        draft.gate.note_edit();
    }

    let interacting = ctx.input(|i| i.pointer.any_down()) || ctx.wants_keyboard_input();
    if draft.gate.poll(interacting) {
        debug!("Committing galaxy parameters");
        commits.write(ParametersCommitted(draft.config.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_waits_for_the_interaction_to_end() {
        let mut gate = CommitGate::default();
        assert!(!gate.poll(false));

        gate.note_edit();
        assert!(!gate.poll(true));
        gate.note_edit();
        assert!(!gate.poll(true));

        assert!(gate.poll(false));
        assert!(!gate.poll(false));
    }

    #[test]
    fn srgb_bytes_round_trip_through_unit_floats() {
        let color = GalaxyConfig::default().inside_color;
        assert_eq!(to_srgb8(color), [0xff, 0x60, 0x30]);
        assert_eq!(to_srgb8(from_srgb8([0x23, 0x49, 0xa9])), [0x23, 0x49, 0xa9]);
    }

    #[test]
    fn out_of_gamut_colors_are_clamped_for_the_picker() {
        assert_eq!(to_srgb8(Vec3::new(-1.0, 2.0, 0.5)), [0, 255, 128]);
    }

    #[test]
    fn draft_starts_from_the_live_parameters() {
        let mut world = World::new();
        let config = GalaxyConfig {
            branches: 9,
            ..default()
        };
        world.insert_resource(ParameterStore::new(config.clone()));
        let draft = ParameterDraft::from_world(&mut world);
        assert_eq!(draft.config, config);
        assert!(!draft.gate.pending);
    }
}
