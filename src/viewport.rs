//! Host viewport sources and resize notifications.
//!
//! A [`ViewportSource`] is the only capability this crate needs from a UI
//! platform. [`SharedViewport`] is an in-process implementation that hosts feed
//! from their own resize events, and that tests drive directly.

use std::sync::{Arc, RwLock};

use crate::geom::Dimensions;

/// Callback invoked synchronously with the new viewport size.
pub type ResizeListener = Arc<dyn Fn(Dimensions) + Send + Sync>;

/// Subscription handle returned by [`ViewportSource::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Host capability: read the viewport and observe its resizes.
///
/// Implementations must invoke listeners on the thread that delivers the
/// resize, in subscription order, without holding internal locks.
pub trait ViewportSource: Send + Sync {
    /// Current viewport size.
    fn size(&self) -> Dimensions;

    /// Current screen density, if the host can report one.
    fn density(&self) -> Option<f64> {
        None
    }

    /// Register a resize listener.
    fn subscribe(&self, listener: ResizeListener) -> SubscriptionId;

    /// Remove a resize listener. Returns false if it was not registered.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

/// Shared, cloneable viewport fed by the host.
#[derive(Clone)]
pub struct SharedViewport {
    inner: Arc<RwLock<ViewportState>>,
}

struct ViewportState {
    size: Dimensions,
    density: Option<f64>,
    next_id: u64,
    listeners: Vec<(SubscriptionId, ResizeListener)>,
}

impl SharedViewport {
    /// Create a viewport of the given size without density support.
    pub fn new(size: Dimensions) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ViewportState {
                size,
                density: None,
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Report a screen density.
    pub fn with_density(self, density: f64) -> Self {
        self.inner.write().expect("viewport lock").density = Some(density);
        self
    }

    /// Deliver a resize. Returns false, without notifying, if unchanged.
    pub fn resize(&self, size: Dimensions) -> bool {
        let listeners = {
            let mut state = self.inner.write().expect("viewport lock");
            if state.size == size {
                return false;
            }
            state.size = size;
            state.snapshot_listeners()
        };
        for listener in listeners {
            listener(size);
        }
        true
    }

    /// Change the reported density, notifying listeners if it changed.
    pub fn set_density(&self, density: Option<f64>) -> bool {
        let (size, listeners) = {
            let mut state = self.inner.write().expect("viewport lock");
            if state.density == density {
                return false;
            }
            state.density = density;
            (state.size, state.snapshot_listeners())
        };
        for listener in listeners {
            listener(size);
        }
        true
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.read().expect("viewport lock").listeners.len()
    }
}

impl ViewportState {
    fn snapshot_listeners(&self) -> Vec<ResizeListener> {
        self.listeners
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect()
    }
}

impl ViewportSource for SharedViewport {
    fn size(&self) -> Dimensions {
        self.inner.read().expect("viewport lock").size
    }

    fn density(&self) -> Option<f64> {
        self.inner.read().expect("viewport lock").density
    }

    fn subscribe(&self, listener: ResizeListener) -> SubscriptionId {
        let mut state = self.inner.write().expect("viewport lock");
        state.next_id = state.next_id.wrapping_add(1);
        let id = SubscriptionId(state.next_id);
        state.listeners.push((id, listener));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.inner.write().expect("viewport lock");
        let before = state.listeners.len();
        state.listeners.retain(|(existing, _)| *existing != id);
        state.listeners.len() != before
    }
}

impl std::fmt::Debug for SharedViewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.read().expect("viewport lock");
        f.debug_struct("SharedViewport")
            .field("size", &state.size)
            .field("density", &state.density)
            .field("listeners", &state.listeners.len())
            .finish()
    }
}
