use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Environment variable holding a `u64` seed for reproducible galaxies.
pub const SEED_ENV_VAR: &str = "GALAXY_SEED";

/// The random source every galaxy generation draws from.
#[derive(Resource)]
pub struct GalaxyRng(pub ChaCha8Rng);

impl GalaxyRng {
    pub fn from_seed(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Seeds from `GALAXY_SEED` when it is set, otherwise from the thread RNG.
    pub fn from_env() -> Self {
        match seed_from(std::env::var(SEED_ENV_VAR).ok().as_deref()) {
            Some(seed) => {
                info!("Seeding galaxy generator with {SEED_ENV_VAR}={seed}");
                Self::from_seed(seed)
            }
            None => Self(ChaCha8Rng::from_rng(&mut rand::rng())),
        }
    }
}

fn seed_from(value: Option<&str>) -> Option<u64> {
    let value = value?.trim();
    match value.parse() {
        Ok(seed) => Some(seed),
        Err(err) => {
            warn!("Ignoring {SEED_ENV_VAR}={value:?}: {err}");
            None
        }
    }
}
