use std::borrow::Cow;
use thiserror::Error;

/// Errors that can occur while generating a galaxy.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GalaxyError {
    /// A parameter would make generation degenerate (division by zero, NaN).
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: Cow<'static, str>,
    },
}

impl GalaxyError {
    pub fn invalid(name: &'static str, reason: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
