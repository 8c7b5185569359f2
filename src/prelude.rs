pub use crate::galaxy::{GalaxyConfig, ParameterStore, ParticleBuffers};
