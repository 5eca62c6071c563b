/// Configuration for the GPUI viewport adapter.
#[derive(Debug, Clone)]
pub struct GpuiViewportConfig {
    /// Density reported at a window scale factor of 1.0.
    pub reference_density: f64,
    /// Report density to the viewport at all.
    pub report_density: bool,
}

impl Default for GpuiViewportConfig {
    fn default() -> Self {
        Self {
            reference_density: 96.0,
            report_density: true,
        }
    }
}
