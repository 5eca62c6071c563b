//! layout_scale maps layouts authored at a design resolution onto a live
//! viewport. The crate covers fit policies for scale factors and per-object
//! edge anchoring for 2D scene graphs.

#![forbid(unsafe_code)]

pub mod anchor;
pub mod config;
pub mod geom;
#[cfg(feature = "gpui")]
pub mod gpui_backend;
pub mod scale;
pub mod viewport;

pub use anchor::{
    AnchorDecision, AnchorOptions, AnchorRule, AxisDecision, AxisRule, ConstraintList,
    LayoutContainer, LayoutObject, Placement, RuleSink, infer_anchor, infer_axis,
};
pub use config::ScaleConfig;
pub use geom::{Axis, Dimensions, LiveRect, ObjectGeometry, Span};
#[cfg(feature = "gpui")]
pub use gpui_backend::{GpuiViewportConfig, ScaledRoot};
pub use scale::{
    DEFAULT_BASE_DENSITY, ErrorKind, ObserverId, Scale, ScaleController, ScaleControllerBuilder,
    ScaleError, ScaleFactor, ScaleObserver, ScaleStrategy,
};
pub use viewport::{ResizeListener, SharedViewport, SubscriptionId, ViewportSource};
