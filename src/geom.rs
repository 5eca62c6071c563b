//! Geometric primitives shared by scaling and anchoring.
//!
//! Base-space values describe layouts as authored at the design resolution.
//! Live-space values are what the host should actually draw.

/// Layout axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal axis (left to right).
    X,
    /// Vertical axis (top to bottom).
    Y,
}

impl Axis {
    /// Both axes, X first.
    pub const ALL: [Self; 2] = [Self::X, Self::Y];
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Dimensions {
    /// Create new dimensions.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Extent along one axis.
    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }

    /// Check whether both extents are finite and strictly positive.
    pub fn is_positive(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Check whether both extents are finite and not negative.
    pub fn is_non_negative(&self) -> bool {
        self.width.is_finite()
            && self.height.is_finite()
            && self.width >= 0.0
            && self.height >= 0.0
    }
}

/// Base-space bounding box of an object, relative to its container.
///
/// Right and bottom edges are derived from the origin and size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectGeometry {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl ObjectGeometry {
    /// Create geometry from an origin and size.
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Create geometry from its four edges, swapping inverted edges.
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        let (left, right) = if left > right { (right, left) } else { (left, right) };
        let (top, bottom) = if top > bottom { (bottom, top) } else { (top, bottom) };
        Self::new(left, top, right - left, bottom - top)
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Object size.
    pub fn size(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// Near edge (left or top) along an axis.
    pub fn near(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.left,
            Axis::Y => self.top,
        }
    }

    /// Far edge (right or bottom) along an axis.
    pub fn far(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.right(),
            Axis::Y => self.bottom(),
        }
    }

    /// Extent along an axis.
    pub fn extent(&self, axis: Axis) -> f64 {
        self.size().along(axis)
    }

    /// Center coordinate along an axis.
    pub fn center(&self, axis: Axis) -> f64 {
        self.near(axis) + self.extent(axis) * 0.5
    }
}

/// Live placement along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    /// Near-edge position.
    pub position: f64,
    /// Extent.
    pub size: f64,
}

impl Span {
    /// Create a new span.
    pub const fn new(position: f64, size: f64) -> Self {
        Self { position, size }
    }

    /// Far-edge position.
    pub fn end(&self) -> f64 {
        self.position + self.size
    }

    /// Center position.
    pub fn center(&self) -> f64 {
        self.position + self.size * 0.5
    }
}

/// Live rectangle composed from two independent spans.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveRect {
    /// Horizontal placement.
    pub x: Span,
    /// Vertical placement.
    pub y: Span,
}

impl LiveRect {
    /// Create a rectangle from two spans.
    pub const fn new(x: Span, y: Span) -> Self {
        Self { x, y }
    }

    /// Span along an axis.
    pub fn along(&self, axis: Axis) -> Span {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Rectangle size.
    pub fn size(&self) -> Dimensions {
        Dimensions::new(self.x.size, self.y.size)
    }
}
