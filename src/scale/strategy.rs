//! Fit policies mapping a viewport onto a design resolution.

use crate::geom::Dimensions;

use super::{Scale, ScaleError};

/// Base density used when none is given, in dots per inch.
pub const DEFAULT_BASE_DENSITY: f64 = 72.0;

/// Policy turning a viewport size into scale multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ScaleStrategy {
    /// Always 1.0 on both axes.
    Identity,
    /// Independent width and height ratios.
    Stretch,
    /// Uniform scale keeping the whole design visible (smaller ratio).
    #[default]
    FitInside,
    /// Uniform scale covering the whole viewport (larger ratio).
    FitOutside,
    /// Uniform scale from the host density, ignoring the viewport.
    DensityBased {
        /// Density the design was authored at.
        base_density: f64,
    },
}

impl ScaleStrategy {
    /// Density-based scaling against [`DEFAULT_BASE_DENSITY`].
    pub const fn density_based() -> Self {
        Self::DensityBased {
            base_density: DEFAULT_BASE_DENSITY,
        }
    }

    /// Short name for logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Stretch => "stretch",
            Self::FitInside => "fit-inside",
            Self::FitOutside => "fit-outside",
            Self::DensityBased { .. } => "density",
        }
    }

    /// Check the strategy's own parameters.
    pub fn validate(self) -> Result<(), ScaleError> {
        match self {
            Self::DensityBased { base_density } => check_density(base_density),
            Self::Identity | Self::Stretch | Self::FitInside | Self::FitOutside => Ok(()),
        }
    }

    /// Compute multipliers for a viewport.
    ///
    /// `density` is the host's current density, consulted only by
    /// [`ScaleStrategy::DensityBased`]. The viewport is checked only by the
    /// strategies that read it. A ratio that overflows is rejected with the
    /// error of the input that produced it, so a published scale is always
    /// finite.
    pub fn compute(
        self,
        viewport: Dimensions,
        base: Dimensions,
        density: Option<f64>,
    ) -> Result<Scale, ScaleError> {
        if !base.is_positive() {
            return Err(ScaleError::InvalidBaseSize {
                width: base.width,
                height: base.height,
            });
        }
        match self {
            Self::Identity => Ok(Scale::IDENTITY),
            Self::Stretch | Self::FitInside | Self::FitOutside => {
                let invalid = ScaleError::InvalidViewport {
                    width: viewport.width,
                    height: viewport.height,
                };
                if !viewport.is_non_negative() {
                    return Err(invalid);
                }
                let ratio_x = viewport.width / base.width;
                let ratio_y = viewport.height / base.height;
                let scale = match self {
                    Self::Stretch => Scale::new(ratio_x, ratio_y),
                    Self::FitInside => Scale::uniform(ratio_x.min(ratio_y)),
                    _ => Scale::uniform(ratio_x.max(ratio_y)),
                };
                if scale.is_finite() {
                    Ok(scale)
                } else {
                    Err(invalid)
                }
            }
            Self::DensityBased { base_density } => {
                check_density(base_density)?;
                let density = density.ok_or(ScaleError::DensityUnavailable)?;
                check_density(density)?;
                let scale = Scale::uniform(density / base_density);
                if scale.is_finite() {
                    Ok(scale)
                } else {
                    Err(ScaleError::InvalidDensity { density })
                }
            }
        }
    }
}

fn check_density(density: f64) -> Result<(), ScaleError> {
    if density.is_finite() && density > 0.0 {
        Ok(())
    } else {
        Err(ScaleError::InvalidDensity { density })
    }
}
