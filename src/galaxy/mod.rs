use bevy::prelude::*;
use std::time::Instant;

mod error;
mod galaxy_config;
mod generator;
mod parameter_store;
mod rng;

pub use error::GalaxyError;
pub use galaxy_config::GalaxyConfig;
pub use generator::{generate, ParticleBuffers};
pub use parameter_store::{CommitOutcome, ParameterStore};
pub use rng::GalaxyRng;

/// Sent by the control panel once the user has finished editing.
#[derive(Event, Clone, Debug)]
pub struct ParametersCommitted(pub GalaxyConfig);

/// Outcome of the most recent generation attempt.
#[derive(Resource, Default, Debug)]
pub struct GenerationStatus {
    pub last_error: Option<GalaxyError>,
}

pub struct GalaxyPlugin;

impl Plugin for GalaxyPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ParameterStore::new(GalaxyConfig::default()))
            .insert_resource(GalaxyRng::from_env())
            .init_resource::<GenerationStatus>()
            .add_event::<ParametersCommitted>()
            .add_systems(Startup, generate_initial_galaxy)
            .add_systems(Update, apply_committed_parameters);
    }
}

fn generate_initial_galaxy(
    mut store: ResMut<ParameterStore>,
    mut rng: ResMut<GalaxyRng>,
    mut status: ResMut<GenerationStatus>,
) {
    let started = Instant::now();
    let result = store.regenerate(&mut rng.0).map(CommitOutcome::Regenerated);
    report(result, &store, started, &mut status);
}

/// Regenerates from the latest commit of the frame. Earlier commits in the
/// same frame are superseded and skipped.
fn apply_committed_parameters(
    mut commits: EventReader<ParametersCommitted>,
    mut store: ResMut<ParameterStore>,
    mut rng: ResMut<GalaxyRng>,
    mut status: ResMut<GenerationStatus>,
) {
    let Some(ParametersCommitted(config)) = commits.read().last() else {
        return;
    };

    let started = Instant::now();
    let result = store.commit(config.clone(), &mut rng.0);
    report(result, &store, started, &mut status);
}

fn report(
    result: Result<CommitOutcome, GalaxyError>,
    store: &ParameterStore,
    started: Instant,
    status: &mut GenerationStatus,
) {
    match result {
        Ok(CommitOutcome::Regenerated(generation)) => {
            info!(
                "Galaxy generation {} ready: {} particles in {:.1?}",
                generation,
                store.buffers().len(),
                started.elapsed()
            );
            status.last_error = None;
        }
        Ok(CommitOutcome::Unchanged(generation)) => {
            debug!("Galaxy parameters unchanged, keeping generation {generation}");
            status.last_error = None;
        }
        Err(err) => {
            warn!("Galaxy regeneration failed, keeping previous particles: {err}");
            status.last_error = Some(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app(count: u32) -> App {
        let mut app = App::new();
        app.add_plugins(GalaxyPlugin)
            .insert_resource(GalaxyRng::from_seed(1))
            .insert_resource(ParameterStore::new(GalaxyConfig {
                count,
                ..default()
            }));
        app.update();
        app
    }

    fn store(app: &App) -> &ParameterStore {
        app.world().resource::<ParameterStore>()
    }

    #[test]
    fn startup_generates_the_initial_galaxy() {
        let app = test_app(300);
        assert_eq!(store(&app).generation(), 1);
        assert_eq!(store(&app).buffers().len(), 300);
    }

    #[test]
    fn commit_event_regenerates() {
        let mut app = test_app(300);
        app.world_mut().send_event(ParametersCommitted(GalaxyConfig {
            count: 600,
            ..default()
        }));
        app.update();

        assert_eq!(store(&app).generation(), 2);
        assert_eq!(store(&app).buffers().len(), 600);
        assert!(app.world().resource::<GenerationStatus>().last_error.is_none());
    }

    #[test]
    fn only_the_latest_commit_of_a_frame_is_applied() {
        let mut app = test_app(300);
        for count in [400, 500, 700] {
            app.world_mut().send_event(ParametersCommitted(GalaxyConfig {
                count,
                ..default()
            }));
        }
        app.update();

        assert_eq!(store(&app).generation(), 2);
        assert_eq!(store(&app).config().count, 700);
    }

    #[test]
    fn committing_the_live_parameters_keeps_the_galaxy() {
        let mut app = test_app(300);
        let before = store(&app).buffers().clone();

        let live = store(&app).config().clone();
        app.world_mut().send_event(ParametersCommitted(live));
        app.update();

        assert_eq!(store(&app).generation(), 1);
        assert_eq!(store(&app).buffers(), &before);
        assert!(app.world().resource::<GenerationStatus>().last_error.is_none());
    }

    #[test]
    fn invalid_commit_is_reported_and_previous_galaxy_kept() {
        let mut app = test_app(300);
        let before = store(&app).buffers().clone();

        app.world_mut().send_event(ParametersCommitted(GalaxyConfig {
            branches: 0,
            ..default()
        }));
        app.update();

        assert_eq!(store(&app).generation(), 1);
        assert_eq!(store(&app).buffers(), &before);
        assert!(matches!(
            app.world().resource::<GenerationStatus>().last_error,
            Some(GalaxyError::InvalidParameter { name: "branches", .. })
        ));
    }
}
