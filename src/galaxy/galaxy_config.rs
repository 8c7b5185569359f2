use bevy::prelude::*;

use super::GalaxyError;

/// Scalar parameters of one generated galaxy.
///
/// Colors are sRGB components in `[0, 1]`. Field ranges are declared by
/// [`GalaxyConfig::MIN`], [`GalaxyConfig::MAX`] and [`GalaxyConfig::STEP`] and
/// enforced by the control panel; [`GalaxyConfig::validate`] only rejects
/// values that would make generation degenerate.
#[derive(Clone, Debug, PartialEq)]
pub struct GalaxyConfig {
    pub count: u32,
    pub size: f32,
    pub radius: f32,
    pub branches: u32,
    pub spin: f32,
    pub inside_color: Vec3,
    pub outside_color: Vec3,
    pub pointiness: f32,
    pub branch_radius: f32,
    pub color_randomness: f32,
}

impl Default for GalaxyConfig {
    fn default() -> Self {
        Self {
            count: 100_000,
            size: 0.01,
            radius: 5.0,
            branches: 5,
            spin: 0.7,
            inside_color: Vec3::new(1.0, 0.376, 0.188),  // #ff6030
            outside_color: Vec3::new(0.137, 0.286, 0.663), // #2349a9
            pointiness: 1.5,
            branch_radius: 0.9,
            color_randomness: 0.25,
        }
    }
}

impl GalaxyConfig {
    pub const MIN: Self = Self {
        count: 100,
        size: 0.001,
        radius: 0.01,
        branches: 2,
        spin: -2.0,
        inside_color: Vec3::ZERO,
        outside_color: Vec3::ZERO,
        pointiness: 0.01,
        branch_radius: 0.0,
        color_randomness: 0.0,
    };
    pub const MAX: Self = Self {
        count: 1_000_000,
        size: 0.1,
        radius: 20.0,
        branches: 20,
        spin: 2.0,
        inside_color: Vec3::ONE,
        outside_color: Vec3::ONE,
        pointiness: 3.0,
        branch_radius: 1.5,
        color_randomness: 1.0,
    };
    /// Slider increments. Color steps are unused, pickers are free-form.
    pub const STEP: Self = Self {
        count: 100,
        size: 0.001,
        radius: 0.01,
        branches: 1,
        spin: 0.001,
        inside_color: Vec3::ZERO,
        outside_color: Vec3::ZERO,
        pointiness: 0.001,
        branch_radius: 0.01,
        color_randomness: 0.001,
    };

    /// Rejects parameter combinations that would put NaN or infinities into
    /// the particle buffers. `count == 0` is allowed and yields empty buffers.
    pub fn validate(&self) -> Result<(), GalaxyError> {
        if self.branches < 1 {
            return Err(GalaxyError::invalid("branches", "must be at least 1"));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(GalaxyError::invalid(
                "radius",
                format!("must be a positive finite number, got {}", self.radius),
            ));
        }

        let scalars = [
            ("size", self.size),
            ("spin", self.spin),
            ("pointiness", self.pointiness),
            ("branch_radius", self.branch_radius),
            ("color_randomness", self.color_randomness),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(GalaxyError::invalid(name, format!("must be finite, got {value}")));
            }
        }
        if self.size <= 0.0 {
            return Err(GalaxyError::invalid("size", "must be positive"));
        }
        if self.pointiness < 0.0 {
            return Err(GalaxyError::invalid("pointiness", "must not be negative"));
        }
        if self.branch_radius < 0.0 {
            return Err(GalaxyError::invalid("branch_radius", "must not be negative"));
        }

        for (name, color) in [
            ("inside_color", self.inside_color),
            ("outside_color", self.outside_color),
        ] {
            if !color.is_finite() {
                return Err(GalaxyError::invalid(name, "components must be finite"));
            }
        }

        Ok(())
    }
}
