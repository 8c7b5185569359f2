use super::{generate, GalaxyConfig, GalaxyError, ParticleBuffers};
use bevy::prelude::*;
use rand::Rng;

/// What a [`ParameterStore::commit`] did with the parameters it was given.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A new sample was installed under this generation.
    Regenerated(u32),
    /// The parameters were already live, this generation was kept.
    Unchanged(u32),
}

/// Live galaxy parameters together with the buffers generated from them.
///
/// The store is the only owner of the buffer pair. A commit either replaces
/// parameters and buffers together or leaves both untouched.
#[derive(Resource, Debug)]
pub struct ParameterStore {
    config: GalaxyConfig,
    buffers: ParticleBuffers,
    generation: u32,
}

impl ParameterStore {
    /// A store holding `config` with no particles generated yet.
    pub fn new(config: GalaxyConfig) -> Self {
        Self {
            config,
            buffers: ParticleBuffers::default(),
            generation: 0,
        }
    }

    pub fn config(&self) -> &GalaxyConfig {
        &self.config
    }

    pub fn buffers(&self) -> &ParticleBuffers {
        &self.buffers
    }

    /// Bumped on every successful regeneration, 0 before the first one.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Installs `config` and a freshly generated buffer pair.
    ///
    /// Committing the parameters already live is a no-op once something has
    /// been generated. On error nothing changes.
    pub fn commit<R: Rng + ?Sized>(
        &mut self,
        config: GalaxyConfig,
        rng: &mut R,
    ) -> Result<CommitOutcome, GalaxyError> {
        if self.generation > 0 && config == self.config {
            return Ok(CommitOutcome::Unchanged(self.generation));
        }

        let buffers = generate(&config, rng)?;
        self.install(config, buffers);
        Ok(CommitOutcome::Regenerated(self.generation))
    }

    /// Draws a new sample of the live parameters.
    pub fn regenerate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<u32, GalaxyError> {
        let buffers = generate(&self.config, rng)?;
        self.install(self.config.clone(), buffers);
        Ok(self.generation)
    }

    fn install(&mut self, config: GalaxyConfig, buffers: ParticleBuffers) {
        // The previous pair is dropped here, before anyone sees the new one.
        self.buffers = buffers;
        self.config = config;
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn small_config() -> GalaxyConfig {
        GalaxyConfig {
            count: 500,
            ..default()
        }
    }

    #[test]
    fn new_store_has_nothing_generated() {
        let store = ParameterStore::new(small_config());
        assert_eq!(store.generation(), 0);
        assert!(store.buffers().is_empty());
    }

    #[test]
    fn regenerate_fills_buffers_for_live_config() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut store = ParameterStore::new(small_config());
        assert_eq!(store.regenerate(&mut rng), Ok(1));
        assert_eq!(store.buffers().len(), 500);

        let first = store.buffers().clone();
        assert_eq!(store.regenerate(&mut rng), Ok(2));
        assert_ne!(store.buffers(), &first);
    }

    #[test]
    fn commit_replaces_config_and_buffers_together() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut store = ParameterStore::new(small_config());
        store.regenerate(&mut rng).unwrap();

        let next = GalaxyConfig {
            count: 1_200,
            branches: 3,
            ..small_config()
        };
        assert_eq!(
            store.commit(next.clone(), &mut rng),
            Ok(CommitOutcome::Regenerated(2))
        );
        assert_eq!(store.config(), &next);
        assert_eq!(store.buffers().len(), 1_200);
    }

    #[test]
    fn failed_commit_keeps_previous_state() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut store = ParameterStore::new(small_config());
        store.regenerate(&mut rng).unwrap();
        let before = store.buffers().clone();

        let broken = GalaxyConfig {
            radius: 0.0,
            ..small_config()
        };
        assert!(store.commit(broken, &mut rng).is_err());
        assert_eq!(store.generation(), 1);
        assert_eq!(store.config(), &small_config());
        assert_eq!(store.buffers(), &before);
    }

    #[test]
    fn unchanged_commit_is_a_no_op() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut store = ParameterStore::new(small_config());
        store.regenerate(&mut rng).unwrap();
        let before = store.buffers().clone();

        assert_eq!(
            store.commit(small_config(), &mut rng),
            Ok(CommitOutcome::Unchanged(1))
        );
        assert_eq!(store.generation(), 1);
        assert_eq!(store.buffers(), &before);
    }

    #[test]
    fn first_commit_generates_even_with_same_config() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut store = ParameterStore::new(small_config());
        assert_eq!(
            store.commit(small_config(), &mut rng),
            Ok(CommitOutcome::Regenerated(1))
        );
        assert_eq!(store.buffers().len(), 500);
    }
}
