//! Scale controllers: strategy selection and resize-driven recomputation.

use std::cell::RefCell;
use std::sync::{Arc, RwLock};

use crate::config::ScaleConfig;
use crate::geom::Dimensions;
use crate::viewport::{ResizeListener, SubscriptionId, ViewportSource};

use super::{Scale, ScaleError, ScaleFactor, ScaleStrategy};

thread_local! {
    static CURRENT: RefCell<Option<ScaleController>> = const { RefCell::new(None) };
}

/// Owner of a [`ScaleFactor`] and the strategy that writes it.
///
/// Clones are handles to the same controller. A controller built with a
/// viewport source subscribes to it and recomputes on every resize until
/// [`ScaleController::dispose`] is called.
#[derive(Clone)]
pub struct ScaleController {
    inner: Arc<RwLock<ControllerState>>,
}

struct ControllerState {
    factor: ScaleFactor,
    strategy: ScaleStrategy,
    viewport: Dimensions,
    source: Option<Arc<dyn ViewportSource>>,
    subscription: Option<SubscriptionId>,
}

impl ControllerState {
    fn density(&self) -> Option<f64> {
        self.source.as_ref().and_then(|source| source.density())
    }
}

impl Drop for ControllerState {
    fn drop(&mut self) {
        if let Some((subscription, source)) = self.subscription.take().zip(self.source.as_ref()) {
            source.unsubscribe(subscription);
            log::debug!("dropped scale controller unsubscribed from viewport source");
        }
    }
}

impl ScaleController {
    /// Start building a controller.
    pub fn builder() -> ScaleControllerBuilder {
        ScaleControllerBuilder::default()
    }

    /// Create a controller for a base size with no viewport source.
    ///
    /// The controller fits inside and becomes current on this thread.
    pub fn with_base(width: f64, height: f64) -> Result<Self, ScaleError> {
        Self::builder()
            .base_size(Dimensions::new(width, height))
            .build()
    }

    /// The controller most recently made current on this thread.
    pub fn current() -> Option<Self> {
        CURRENT.with(|current| current.borrow().clone())
    }

    /// Make this controller the current one on this thread.
    pub fn make_current(&self) {
        CURRENT.with(|current| *current.borrow_mut() = Some(self.clone()));
    }

    /// Check whether this controller is current on this thread.
    pub fn is_current(&self) -> bool {
        CURRENT.with(|current| {
            current
                .borrow()
                .as_ref()
                .is_some_and(|current| current.ptr_eq(self))
        })
    }

    /// Check whether two handles refer to the same controller.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Handle to the factor this controller writes.
    pub fn scale_factor(&self) -> ScaleFactor {
        self.inner.read().expect("scale controller lock").factor.clone()
    }

    /// Current multipliers.
    pub fn scale(&self) -> Scale {
        self.scale_factor().scale()
    }

    /// Current horizontal multiplier.
    pub fn x(&self) -> f64 {
        self.scale().x
    }

    /// Current vertical multiplier.
    pub fn y(&self) -> f64 {
        self.scale().y
    }

    /// Base (design) size.
    pub fn base(&self) -> Dimensions {
        self.scale_factor().base()
    }

    /// Base width.
    pub fn base_width(&self) -> f64 {
        self.base().width
    }

    /// Base height.
    pub fn base_height(&self) -> f64 {
        self.base().height
    }

    /// Active strategy.
    pub fn strategy(&self) -> ScaleStrategy {
        self.inner.read().expect("scale controller lock").strategy
    }

    /// Last viewport size used for a recompute.
    pub fn viewport(&self) -> Dimensions {
        self.inner.read().expect("scale controller lock").viewport
    }

    /// Check whether the controller still listens to its viewport source.
    pub fn is_subscribed(&self) -> bool {
        self.inner
            .read()
            .expect("scale controller lock")
            .subscription
            .is_some()
    }

    /// Switch strategy and recompute against the last known viewport.
    ///
    /// On error the previous strategy and scale stay in place.
    pub fn set_strategy(&self, strategy: ScaleStrategy) -> Result<Scale, ScaleError> {
        let scale = self.apply(None, Some(strategy))?;
        log::debug!(
            "scale strategy set to {}: {:.4}x{:.4}",
            strategy.name(),
            scale.x,
            scale.y
        );
        Ok(scale)
    }

    /// Use a fixed 1.0 scale.
    pub fn set_no_scale(&self) -> Result<Scale, ScaleError> {
        self.set_strategy(ScaleStrategy::Identity)
    }

    /// Stretch each axis independently.
    pub fn set_stretch(&self) -> Result<Scale, ScaleError> {
        self.set_strategy(ScaleStrategy::Stretch)
    }

    /// Fit the whole design inside the viewport.
    pub fn set_fit_inside(&self) -> Result<Scale, ScaleError> {
        self.set_strategy(ScaleStrategy::FitInside)
    }

    /// Cover the whole viewport with the design.
    pub fn set_fit_outside(&self) -> Result<Scale, ScaleError> {
        self.set_strategy(ScaleStrategy::FitOutside)
    }

    /// Scale by host density relative to `base_density`.
    ///
    /// Fails with [`ScaleError::DensityUnavailable`] when the host cannot
    /// report density, leaving the previous strategy active.
    pub fn set_density_based(&self, base_density: f64) -> Result<Scale, ScaleError> {
        let result = self.set_strategy(ScaleStrategy::DensityBased { base_density });
        if let Err(ScaleError::DensityUnavailable) = result {
            log::warn!("density scaling requested but the host reports no density");
        }
        result
    }

    /// Recompute for a new viewport size.
    pub fn resize(&self, viewport: Dimensions) -> Result<Scale, ScaleError> {
        self.apply(Some(viewport), None)
    }

    /// Recompute against the last known viewport.
    pub fn refresh(&self) -> Result<Scale, ScaleError> {
        self.apply(None, None)
    }

    /// Stop listening to the viewport source. Calling it again is a no-op.
    ///
    /// Dropping the last handle unsubscribes as well; `dispose` detaches
    /// while handles are still alive.
    pub fn dispose(&self) {
        let detached = {
            let mut state = self.inner.write().expect("scale controller lock");
            state
                .subscription
                .take()
                .zip(state.source.clone())
        };
        if let Some((subscription, source)) = detached {
            source.unsubscribe(subscription);
            log::debug!("scale controller unsubscribed from viewport source");
        }
        CURRENT.with(|current| {
            let mut current = current.borrow_mut();
            if current.as_ref().is_some_and(|current| current.ptr_eq(self)) {
                *current = None;
            }
        });
    }

    fn apply(
        &self,
        viewport: Option<Dimensions>,
        strategy: Option<ScaleStrategy>,
    ) -> Result<Scale, ScaleError> {
        let (factor, scale) = {
            let mut state = self.inner.write().expect("scale controller lock");
            let viewport = viewport.unwrap_or(state.viewport);
            let strategy = strategy.unwrap_or(state.strategy);
            strategy.validate()?;
            let scale = strategy.compute(viewport, state.factor.base(), state.density())?;
            state.viewport = viewport;
            state.strategy = strategy;
            log::trace!(
                "recomputed {} scale for {}x{}: {:.4}x{:.4}",
                strategy.name(),
                viewport.width,
                viewport.height,
                scale.x,
                scale.y
            );
            (state.factor.clone(), scale)
        };
        factor.publish(scale);
        Ok(scale)
    }

    fn subscribe(&self, source: &Arc<dyn ViewportSource>) -> SubscriptionId {
        let weak = Arc::downgrade(&self.inner);
        let listener: ResizeListener = Arc::new(move |size: Dimensions| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let controller = ScaleController { inner };
            if let Err(err) = controller.resize(size) {
                log::warn!("ignoring viewport resize: {err}");
            }
        });
        source.subscribe(listener)
    }
}

impl std::fmt::Debug for ScaleController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.read().expect("scale controller lock");
        f.debug_struct("ScaleController")
            .field("factor", &state.factor)
            .field("strategy", &state.strategy)
            .field("viewport", &state.viewport)
            .field("subscribed", &state.subscription.is_some())
            .finish()
    }
}

/// Builder for configuring a controller before construction.
pub struct ScaleControllerBuilder {
    config: ScaleConfig,
    source: Option<Arc<dyn ViewportSource>>,
    factor: Option<ScaleFactor>,
    make_current: bool,
}

impl Default for ScaleControllerBuilder {
    fn default() -> Self {
        Self {
            config: ScaleConfig::default(),
            source: None,
            factor: None,
            make_current: true,
        }
    }
}

impl ScaleControllerBuilder {
    /// Replace the whole configuration.
    pub fn config(mut self, config: ScaleConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the design resolution.
    pub fn base_size(mut self, base: Dimensions) -> Self {
        self.config.base = base;
        self
    }

    /// Set the initial strategy.
    pub fn strategy(mut self, strategy: ScaleStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Subscribe to a viewport source.
    pub fn source(mut self, source: impl ViewportSource + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    /// Write into an existing shared factor instead of creating one.
    ///
    /// The factor's base size takes precedence over the configured one.
    pub fn scale_factor(mut self, factor: ScaleFactor) -> Self {
        self.factor = Some(factor);
        self
    }

    /// Whether the built controller becomes current on this thread.
    pub fn make_current(mut self, make_current: bool) -> Self {
        self.make_current = make_current;
        self
    }

    /// Validate the configuration, compute the first scale and subscribe.
    pub fn build(self) -> Result<ScaleController, ScaleError> {
        let strategy = self.config.strategy;
        strategy.validate()?;
        let factor = match self.factor {
            Some(factor) => factor,
            None => ScaleFactor::new(self.config.base)?,
        };
        let base = factor.base();
        let viewport = self.source.as_ref().map_or(base, |source| source.size());
        let density = self.source.as_ref().and_then(|source| source.density());
        let scale = strategy.compute(viewport, base, density)?;

        let source = self.source;
        let controller = ScaleController {
            inner: Arc::new(RwLock::new(ControllerState {
                factor: factor.clone(),
                strategy,
                viewport,
                source: source.clone(),
                subscription: None,
            })),
        };
        factor.publish(scale);
        if let Some(source) = &source {
            let subscription = controller.subscribe(source);
            controller
                .inner
                .write()
                .expect("scale controller lock")
                .subscription = Some(subscription);
        }
        if self.make_current {
            controller.make_current();
        }
        log::debug!(
            "scale controller created: base {}x{}, {} scale {:.4}x{:.4}",
            base.width,
            base.height,
            strategy.name(),
            scale.x,
            scale.y
        );
        Ok(controller)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use proptest::prelude::*;

    use super::*;
    use crate::scale::DEFAULT_BASE_DENSITY;
    use crate::viewport::SharedViewport;

    fn controller_for(viewport: &SharedViewport) -> ScaleController {
        ScaleController::builder()
            .source(viewport.clone())
            .make_current(false)
            .build()
            .unwrap()
    }

    #[test]
    fn defaults_to_fit_inside_at_800_by_600() {
        let controller = ScaleController::builder().make_current(false).build().unwrap();
        assert_eq!(controller.strategy(), ScaleStrategy::FitInside);
        assert_eq!(controller.base_width(), 800.0);
        assert_eq!(controller.base_height(), 600.0);
        assert_eq!(controller.scale(), Scale::IDENTITY);
    }

    #[test]
    fn rejects_invalid_base_size() {
        let err = ScaleController::with_base(0.0, 600.0).unwrap_err();
        assert!(err.kind().is_invalid_configuration());
    }

    #[test]
    fn resize_event_recomputes() {
        let viewport = SharedViewport::new(Dimensions::new(800.0, 600.0));
        let controller = controller_for(&viewport);

        viewport.resize(Dimensions::new(1600.0, 900.0));

        assert_eq!(controller.scale(), Scale::uniform(1.5));
        assert_eq!(controller.viewport(), Dimensions::new(1600.0, 900.0));
    }

    #[test]
    fn switching_strategy_recomputes_immediately() {
        let viewport = SharedViewport::new(Dimensions::new(1600.0, 900.0));
        let controller = controller_for(&viewport);
        assert_eq!(controller.scale(), Scale::uniform(1.5));

        assert_eq!(controller.set_stretch().unwrap(), Scale::new(2.0, 1.5));
        assert_eq!(controller.set_fit_outside().unwrap(), Scale::uniform(2.0));
        assert_eq!(controller.set_no_scale().unwrap(), Scale::IDENTITY);
        assert_eq!(controller.x(), 1.0);
    }

    #[test]
    fn density_strategy_requires_host_density() {
        let viewport = SharedViewport::new(Dimensions::new(1600.0, 900.0));
        let controller = controller_for(&viewport);

        let err = controller.set_density_based(72.0).unwrap_err();

        assert!(err.kind().is_unsupported_capability());
        assert_eq!(controller.strategy(), ScaleStrategy::FitInside);
        assert_eq!(controller.scale(), Scale::uniform(1.5));
    }

    #[test]
    fn density_strategy_follows_host_density() {
        let viewport = SharedViewport::new(Dimensions::new(1600.0, 900.0)).with_density(144.0);
        let controller = controller_for(&viewport);

        assert_eq!(controller.set_density_based(72.0).unwrap(), Scale::uniform(2.0));
        viewport.set_density(Some(216.0));
        assert_eq!(controller.scale(), Scale::uniform(3.0));
        assert!(matches!(
            controller.set_density_based(0.0),
            Err(ScaleError::InvalidDensity { .. })
        ));
    }

    #[test]
    fn observers_fire_after_write() {
        let viewport = SharedViewport::new(Dimensions::new(800.0, 600.0));
        let controller = controller_for(&viewport);
        let factor = controller.scale_factor();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let reader = factor.clone();
        factor.observe(move |scale| sink.lock().unwrap().push((scale, reader.scale())));

        viewport.resize(Dimensions::new(400.0, 300.0));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, Scale::uniform(0.5));
        assert_eq!(seen[0].0, seen[0].1);
    }

    #[test]
    fn nested_controllers_share_one_factor() {
        let viewport = SharedViewport::new(Dimensions::new(800.0, 600.0));
        let outer = controller_for(&viewport);
        let inner = ScaleController::builder()
            .scale_factor(outer.scale_factor())
            .strategy(ScaleStrategy::Stretch)
            .source(viewport.clone())
            .make_current(false)
            .build()
            .unwrap();
        assert!(inner.scale_factor().ptr_eq(&outer.scale_factor()));

        viewport.resize(Dimensions::new(1600.0, 900.0));

        // Subscription order: the stretch controller ran last.
        assert_eq!(outer.scale(), Scale::new(2.0, 1.5));
        assert_eq!(inner.base(), outer.base());
    }

    #[test]
    fn dispose_unsubscribes() {
        let viewport = SharedViewport::new(Dimensions::new(800.0, 600.0));
        let controller = controller_for(&viewport);
        assert_eq!(viewport.listener_count(), 1);

        controller.dispose();
        controller.dispose();
        viewport.resize(Dimensions::new(1600.0, 1200.0));

        assert!(!controller.is_subscribed());
        assert_eq!(viewport.listener_count(), 0);
        assert_eq!(controller.scale(), Scale::IDENTITY);
    }

    #[test]
    fn dropping_controllers_releases_their_listeners() {
        let viewport = SharedViewport::new(Dimensions::new(800.0, 600.0));
        let survivor = controller_for(&viewport);
        for _ in 0..100 {
            drop(controller_for(&viewport));
        }
        assert_eq!(viewport.listener_count(), 1);

        viewport.resize(Dimensions::new(1600.0, 1200.0));
        assert_eq!(survivor.scale(), Scale::uniform(2.0));

        drop(survivor);
        assert_eq!(viewport.listener_count(), 0);
    }

    #[test]
    fn overflowing_resize_keeps_previous_scale() {
        let controller = ScaleController::builder()
            .base_size(Dimensions::new(1e-300, 1e-300))
            .make_current(false)
            .build()
            .unwrap();
        let before = controller.scale();

        let err = controller.resize(Dimensions::new(1e300, 1e300)).unwrap_err();

        assert!(err.kind().is_invalid_configuration());
        assert_eq!(controller.scale(), before);
        assert!(controller.scale().is_finite());
    }

    #[test]
    fn refresh_recomputes_against_last_viewport() {
        let controller = ScaleController::builder().make_current(false).build().unwrap();
        controller.resize(Dimensions::new(1600.0, 900.0)).unwrap();
        let factor = controller.scale_factor();
        let generation = factor.generation();

        assert_eq!(controller.refresh().unwrap(), Scale::uniform(1.5));
        assert_eq!(factor.generation(), generation + 1);
        assert_eq!(controller.viewport(), Dimensions::new(1600.0, 900.0));
    }

    #[test]
    fn invalid_resize_keeps_previous_scale() {
        let controller = ScaleController::builder().make_current(false).build().unwrap();
        controller.resize(Dimensions::new(1600.0, 1200.0)).unwrap();

        let err = controller.resize(Dimensions::new(f64::NAN, 10.0)).unwrap_err();

        assert!(matches!(err, ScaleError::InvalidViewport { .. }));
        assert_eq!(controller.scale(), Scale::uniform(2.0));
        assert_eq!(controller.viewport(), Dimensions::new(1600.0, 1200.0));
    }

    #[test]
    fn current_controller_tracks_latest_and_dispose() {
        let first = ScaleController::with_base(800.0, 600.0).unwrap();
        assert!(first.is_current());
        let second = ScaleController::with_base(1024.0, 768.0).unwrap();
        assert!(second.is_current());
        assert!(!first.is_current());

        second.dispose();
        assert!(ScaleController::current().is_none());
        first.make_current();
        assert!(ScaleController::current().is_some_and(|current| current.ptr_eq(&first)));
        first.dispose();
    }

    proptest! {
        #[test]
        fn setters_are_idempotent(
            width in 1.0f64..4096.0,
            height in 1.0f64..4096.0,
            density in 1.0f64..600.0,
            pick in 0usize..5,
        ) {
            let viewport =
                SharedViewport::new(Dimensions::new(width, height)).with_density(density);
            let controller = controller_for(&viewport);
            let set = |controller: &ScaleController| match pick {
                0 => controller.set_no_scale(),
                1 => controller.set_stretch(),
                2 => controller.set_fit_inside(),
                3 => controller.set_fit_outside(),
                _ => controller.set_density_based(DEFAULT_BASE_DENSITY),
            };
            let once = set(&controller).unwrap();
            let twice = set(&controller).unwrap();
            prop_assert_eq!(once, twice);
            prop_assert_eq!(controller.scale(), once);
        }
    }
}
