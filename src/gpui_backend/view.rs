use gpui::prelude::*;
use gpui::{Bounds, Entity, Pixels, Window, canvas, div};

use crate::geom::Dimensions;
use crate::viewport::SharedViewport;

use super::config::GpuiViewportConfig;

/// A GPUI view that feeds its bounds into a [`SharedViewport`].
///
/// The content view is drawn on top of a full-size measuring canvas. Sizes
/// measured during a frame reach subscribed controllers immediately and are
/// visible to the content from the next render on.
pub struct ScaledRoot<V: Render> {
    viewport: SharedViewport,
    content: Entity<V>,
    config: GpuiViewportConfig,
}

impl<V: Render> ScaledRoot<V> {
    /// Wrap a content view with the default [`GpuiViewportConfig`].
    pub fn new(viewport: SharedViewport, content: Entity<V>) -> Self {
        Self::with_config(viewport, content, GpuiViewportConfig::default())
    }

    /// Wrap a content view with a custom configuration.
    pub fn with_config(
        viewport: SharedViewport,
        content: Entity<V>,
        config: GpuiViewportConfig,
    ) -> Self {
        Self {
            viewport,
            content,
            config,
        }
    }

    /// The viewport this view reports to.
    pub fn viewport(&self) -> &SharedViewport {
        &self.viewport
    }
}

impl<V: Render> Render for ScaledRoot<V> {
    fn render(&mut self, _window: &mut Window, _cx: &mut Context<Self>) -> impl IntoElement {
        let viewport = self.viewport.clone();
        let config = self.config.clone();

        div()
            .size_full()
            .relative()
            .child(
                canvas(
                    move |bounds, window, _| report_bounds(&viewport, &config, bounds, window),
                    |_, _, _, _| {},
                )
                .absolute()
                .size_full(),
            )
            .child(self.content.clone())
    }
}

fn report_bounds(
    viewport: &SharedViewport,
    config: &GpuiViewportConfig,
    bounds: Bounds<Pixels>,
    window: &mut Window,
) {
    if config.report_density {
        let density = f64::from(window.scale_factor()) * config.reference_density;
        viewport.set_density(Some(density));
    }
    let size = Dimensions::new(
        f64::from(f32::from(bounds.size.width)),
        f64::from(f32::from(bounds.size.height)),
    );
    if viewport.resize(size) {
        log::trace!("window content resized to {}x{}", size.width, size.height);
    }
}
