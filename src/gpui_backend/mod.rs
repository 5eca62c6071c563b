//! GPUI integration for layout_scale.
//!
//! This module provides a root view that reports a GPUI window's content
//! bounds and scale factor to a [`SharedViewport`](crate::viewport::SharedViewport),
//! so every controller subscribed to it follows window resizes.

mod config;
mod view;

pub use config::GpuiViewportConfig;
pub use view::ScaledRoot;
