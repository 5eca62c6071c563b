//! Scale factors and the strategies that produce them.
//!
//! A [`ScaleFactor`] holds the live multipliers for a design resolution. It is
//! written only by a [`ScaleController`] running its active [`ScaleStrategy`];
//! everything else reads it.

mod controller;
mod strategy;

pub use controller::{ScaleController, ScaleControllerBuilder};
pub use strategy::{DEFAULT_BASE_DENSITY, ScaleStrategy};

use std::sync::{Arc, RwLock};

use crate::geom::{Axis, Dimensions, ObjectGeometry};

/// Errors raised by scaling and anchoring operations.
///
/// Every variant is raised before any state is mutated.
#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ScaleError {
    /// Base width or height is not strictly positive.
    #[display("base size must be positive, got {width}x{height}")]
    InvalidBaseSize {
        /// Offending width.
        width: f64,
        /// Offending height.
        height: f64,
    },
    /// Viewport width or height is negative or not finite.
    #[display("viewport size must be non-negative, got {width}x{height}")]
    InvalidViewport {
        /// Offending width.
        width: f64,
        /// Offending height.
        height: f64,
    },
    /// A base or host density is not strictly positive.
    #[display("density must be positive, got {density}")]
    InvalidDensity {
        /// Offending density.
        density: f64,
    },
    /// Object geometry has a non-positive size or non-finite edges.
    #[display("object geometry must have a positive size, got {width}x{height}")]
    InvalidGeometry {
        /// Offending width.
        width: f64,
        /// Offending height.
        height: f64,
    },
    /// Container base size is not strictly positive.
    #[display("container size must be positive, got {width}x{height}")]
    InvalidContainer {
        /// Offending width.
        width: f64,
        /// Offending height.
        height: f64,
    },
    /// No controller was given and none is current on this thread.
    #[display("no scale controller is current on this thread")]
    NoCurrentController,
    /// Density scaling was requested but the host cannot report density.
    #[display("host cannot report screen density")]
    DensityUnavailable,
}

/// Error classes exposed to callers choosing a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum ErrorKind {
    /// The caller supplied an invalid value. Not recoverable by retrying.
    InvalidConfiguration,
    /// The host lacks a capability the request depends on.
    UnsupportedCapability,
}

impl ScaleError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DensityUnavailable => ErrorKind::UnsupportedCapability,
            Self::InvalidBaseSize { .. }
            | Self::InvalidViewport { .. }
            | Self::InvalidDensity { .. }
            | Self::InvalidGeometry { .. }
            | Self::InvalidContainer { .. }
            | Self::NoCurrentController => ErrorKind::InvalidConfiguration,
        }
    }
}

pub(crate) fn validate_geometry(geometry: &ObjectGeometry) -> Result<(), ScaleError> {
    let finite_origin = geometry.left.is_finite() && geometry.top.is_finite();
    if !finite_origin || !geometry.size().is_positive() {
        return Err(ScaleError::InvalidGeometry {
            width: geometry.width,
            height: geometry.height,
        });
    }
    Ok(())
}

pub(crate) fn validate_container(container: Dimensions) -> Result<(), ScaleError> {
    if !container.is_positive() {
        return Err(ScaleError::InvalidContainer {
            width: container.width,
            height: container.height,
        });
    }
    Ok(())
}

/// A pair of per-axis multipliers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    /// Horizontal multiplier.
    pub x: f64,
    /// Vertical multiplier.
    pub y: f64,
}

impl Scale {
    /// The identity scale.
    pub const IDENTITY: Self = Self::uniform(1.0);

    /// Create a scale from two multipliers.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Create a scale with the same multiplier on both axes.
    pub const fn uniform(value: f64) -> Self {
        Self { x: value, y: value }
    }

    /// Multiplier along an axis.
    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Check that both multipliers are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Observer fired after every published change to a [`ScaleFactor`].
pub type ScaleObserver = Arc<dyn Fn(Scale) + Send + Sync>;

/// Observer registration handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Shared, live scale multipliers for one design resolution.
///
/// Clones share state, so several controllers can drive one factor to keep
/// nested layouts in step. The base size is fixed at construction.
#[derive(Clone)]
pub struct ScaleFactor {
    inner: Arc<RwLock<FactorState>>,
}

struct FactorState {
    base: Dimensions,
    scale: Scale,
    generation: u64,
    next_observer_id: u64,
    observers: Vec<(ObserverId, ScaleObserver)>,
}

impl ScaleFactor {
    /// Create a factor for a base size, starting at the identity scale.
    pub fn new(base: Dimensions) -> Result<Self, ScaleError> {
        if !base.is_positive() {
            return Err(ScaleError::InvalidBaseSize {
                width: base.width,
                height: base.height,
            });
        }
        Ok(Self {
            inner: Arc::new(RwLock::new(FactorState {
                base,
                scale: Scale::IDENTITY,
                generation: 0,
                next_observer_id: 0,
                observers: Vec::new(),
            })),
        })
    }

    /// Base (design) size.
    pub fn base(&self) -> Dimensions {
        self.inner.read().expect("scale factor lock").base
    }

    /// Base width.
    pub fn base_width(&self) -> f64 {
        self.base().width
    }

    /// Base height.
    pub fn base_height(&self) -> f64 {
        self.base().height
    }

    /// Current multipliers, read atomically.
    pub fn scale(&self) -> Scale {
        self.inner.read().expect("scale factor lock").scale
    }

    /// Current horizontal multiplier.
    pub fn x(&self) -> f64 {
        self.scale().x
    }

    /// Current vertical multiplier.
    pub fn y(&self) -> f64 {
        self.scale().y
    }

    /// Current multiplier along an axis.
    pub fn along(&self, axis: Axis) -> f64 {
        self.scale().along(axis)
    }

    /// Number of changes published so far.
    pub fn generation(&self) -> u64 {
        self.inner.read().expect("scale factor lock").generation
    }

    /// Map a base-space horizontal distance into live space.
    pub fn to_live_x(&self, value: f64) -> f64 {
        value * self.x()
    }

    /// Map a base-space vertical distance into live space.
    pub fn to_live_y(&self, value: f64) -> f64 {
        value * self.y()
    }

    /// Map base-space dimensions into live space.
    pub fn to_live(&self, size: Dimensions) -> Dimensions {
        let scale = self.scale();
        Dimensions::new(size.width * scale.x, size.height * scale.y)
    }

    /// Check whether two handles share the same state.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Register an observer. Observers run in registration order.
    pub fn observe(&self, observer: impl Fn(Scale) + Send + Sync + 'static) -> ObserverId {
        let mut state = self.inner.write().expect("scale factor lock");
        state.next_observer_id = state.next_observer_id.wrapping_add(1);
        let id = ObserverId(state.next_observer_id);
        state.observers.push((id, Arc::new(observer)));
        id
    }

    /// Remove an observer. Returns false if it was not registered.
    pub fn unobserve(&self, id: ObserverId) -> bool {
        let mut state = self.inner.write().expect("scale factor lock");
        let before = state.observers.len();
        state.observers.retain(|(existing, _)| *existing != id);
        state.observers.len() != before
    }

    /// Write new multipliers, then notify observers outside the lock.
    pub(crate) fn publish(&self, scale: Scale) {
        let observers: Vec<ScaleObserver> = {
            let mut state = self.inner.write().expect("scale factor lock");
            state.scale = scale;
            state.generation = state.generation.wrapping_add(1);
            state
                .observers
                .iter()
                .map(|(_, observer)| Arc::clone(observer))
                .collect()
        };
        for observer in observers {
            observer(scale);
        }
    }
}

impl std::fmt::Debug for ScaleFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.read().expect("scale factor lock");
        f.debug_struct("ScaleFactor")
            .field("base", &state.base)
            .field("scale", &state.scale)
            .field("generation", &state.generation)
            .field("observers", &state.observers.len())
            .finish()
    }
}
