use super::{GalaxyConfig, GalaxyError};
use bevy::prelude::*;
use rand::prelude::*;
use std::f32::consts::TAU;

/// Index-aligned position and color buffers of one generated galaxy.
///
/// Both buffers always hold the same number of particles. They are only ever
/// built together by [`generate`], so a partially updated pair can't exist.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParticleBuffers {
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 3]>,
}

impl ParticleBuffers {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    /// sRGB colors, every channel in `[0, 1]`.
    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }
}

/// Angle of the spiral arm particle `index` is assigned to.
///
/// Arms are handed out round-robin by index, so the result only depends on
/// `index` and `branches`. `branches` must be non-zero.
pub fn branch_angle(index: u32, branches: u32) -> f32 {
    (index % branches) as f32 * TAU / branches as f32
}

/// Samples `config.count` particles of a spiral galaxy.
///
/// Each particle draws from `rng` in a fixed order (radius, offset magnitude,
/// offset sign, two offset angles, then the red, green and blue jitter), so
/// identically seeded sources give bit-identical buffers.
pub fn generate<R: Rng + ?Sized>(
    config: &GalaxyConfig,
    rng: &mut R,
) -> Result<ParticleBuffers, GalaxyError> {
    config.validate()?;

    let count = config.count as usize;
    let mut positions = Vec::with_capacity(count);
    let mut colors = Vec::with_capacity(count);

    for index in 0..config.count {
        let (position, color) = sample_particle(config, index, rng);
        positions.push(position.to_array());
        colors.push(color.to_array());
    }

    Ok(ParticleBuffers { positions, colors })
}

fn sample_particle<R: Rng + ?Sized>(
    config: &GalaxyConfig,
    index: u32,
    rng: &mut R,
) -> (Vec3, Vec3) {
    // Normalized radius, at most 1/sqrt(2e) ≈ 0.43 (reached at u = 1/sqrt(2)).
    let u: f32 = rng.random();
    let t = u * (-u * u).exp();
    let radius = t * config.radius;

    let angle = branch_angle(index, config.branches) + config.spin * TAU * t;
    let offset = scatter_offset(config, t, rng);

    let position = vec3(angle.cos() * radius, 0.0, angle.sin() * radius) + offset;
    (position, particle_color(config, t, rng))
}

/// Spherical jitter around the arm, shrinking towards the rim.
fn scatter_offset<R: Rng + ?Sized>(config: &GalaxyConfig, t: f32, rng: &mut R) -> Vec3 {
    let magnitude: f32 = rng.random();
    let sign = if rng.random::<f32>() < 0.5 { 1.0 } else { -1.0 };
    let offset_radius =
        config.branch_radius * magnitude * (-(t * t) * config.pointiness).exp() * sign;

    let azimuth = rng.random::<f32>() * TAU;
    let elevation = rng.random::<f32>() * TAU;

    let horizontal = offset_radius * elevation.cos();
    vec3(
        horizontal * azimuth.cos(),
        offset_radius * elevation.sin(),
        horizontal * azimuth.sin(),
    )
}

fn particle_color<R: Rng + ?Sized>(config: &GalaxyConfig, t: f32, rng: &mut R) -> Vec3 {
    let mixed = config.inside_color.lerp(config.outside_color, t);

    let r: f32 = rng.random();
    let g: f32 = rng.random();
    let b: f32 = rng.random();
    let jitter = (vec3(r, g, b) - 0.5) * 2.0 * config.color_randomness;

    (mixed + jitter).clamp(Vec3::ZERO, Vec3::ONE)
}
