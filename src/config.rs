//! Controller configuration.

use crate::geom::Dimensions;
use crate::scale::ScaleStrategy;

/// Default design width.
pub const DEFAULT_BASE_WIDTH: f64 = 800.0;
/// Default design height.
pub const DEFAULT_BASE_HEIGHT: f64 = 600.0;

/// Configuration for a [`ScaleController`](crate::scale::ScaleController).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleConfig {
    /// Design resolution the layout was authored at.
    ///
    /// Ignored when the controller is built around an existing shared factor.
    pub base: Dimensions,
    /// Strategy active right after construction.
    pub strategy: ScaleStrategy,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            base: Dimensions::new(DEFAULT_BASE_WIDTH, DEFAULT_BASE_HEIGHT),
            strategy: ScaleStrategy::FitInside,
        }
    }
}
