//! Edge anchoring for objects laid out at a design resolution.
//!
//! An anchor decision picks, per axis, which part of the container an object
//! tracks as the scale changes. Deciding captures a base-space margin once;
//! the resulting [`AnchorRule`] rebuilds the live placement from that margin
//! and the current [`ScaleFactor`] on every layout pass.

mod constraint;
mod facade;

pub use constraint::{ConstraintList, Placement, RuleSink};
pub use facade::{
    AnchorOptions, LayoutContainer, LayoutObject, anchor, preserve, preserve_children, stick_bottom,
    stick_bottom_left, stick_bottom_right, stick_center, stick_center_x, stick_center_y, stick_left,
    stick_right, stick_top, stick_top_left, stick_top_right, stretch, stretch_x, stretch_y,
};

use crate::geom::{Axis, Dimensions, ObjectGeometry, Span};
use crate::scale::{ScaleError, ScaleFactor, validate_container, validate_geometry};

/// What an object tracks along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum AxisDecision {
    /// Keep the scaled distance to the near edge (left or top).
    StickNear,
    /// Keep the scaled distance to the far edge (right or bottom).
    StickFar,
    /// Keep the scaled offset from the container center.
    StickCenter,
    /// Grow with the container, keeping the scaled slack.
    Stretch,
}

/// Independent decisions for both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnchorDecision {
    /// Horizontal decision.
    pub x: AxisDecision,
    /// Vertical decision.
    pub y: AxisDecision,
}

impl AnchorDecision {
    /// Top-left corner.
    pub const TOP_LEFT: Self = Self::new(AxisDecision::StickNear, AxisDecision::StickNear);
    /// Top-right corner.
    pub const TOP_RIGHT: Self = Self::new(AxisDecision::StickFar, AxisDecision::StickNear);
    /// Bottom-left corner.
    pub const BOTTOM_LEFT: Self = Self::new(AxisDecision::StickNear, AxisDecision::StickFar);
    /// Bottom-right corner.
    pub const BOTTOM_RIGHT: Self = Self::new(AxisDecision::StickFar, AxisDecision::StickFar);
    /// Container center.
    pub const CENTER: Self = Self::new(AxisDecision::StickCenter, AxisDecision::StickCenter);
    /// Stretch on both axes.
    pub const STRETCH: Self = Self::new(AxisDecision::Stretch, AxisDecision::Stretch);

    /// Create a decision pair.
    pub const fn new(x: AxisDecision, y: AxisDecision) -> Self {
        Self { x, y }
    }

    /// Decision along an axis.
    pub fn along(&self, axis: Axis) -> AxisDecision {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }
}

/// Guess the rule that best preserves an object's placement along one axis.
///
/// Objects larger than half the container stretch. Otherwise the object
/// sticks to the center if that is strictly closer than both edges, else to
/// the strictly nearer edge; ties go to the far edge.
pub fn infer_axis(geometry: &ObjectGeometry, container: Dimensions, axis: Axis) -> AxisDecision {
    let container_size = container.along(axis);
    if geometry.extent(axis) > container_size * 0.5 {
        return AxisDecision::Stretch;
    }
    let near = geometry.near(axis);
    let far = container_size - geometry.far(axis);
    let center = (geometry.center(axis) - container_size * 0.5).abs();
    pick_reference(near, far, center)
}

fn pick_reference(near: f64, far: f64, center: f64) -> AxisDecision {
    if center < near && center < far {
        AxisDecision::StickCenter
    } else if near < far {
        AxisDecision::StickNear
    } else {
        AxisDecision::StickFar
    }
}

/// Guess anchoring for both axes independently.
pub fn infer_anchor(
    geometry: &ObjectGeometry,
    container: Dimensions,
) -> Result<AnchorDecision, ScaleError> {
    validate_geometry(geometry)?;
    validate_container(container)?;
    Ok(AnchorDecision::new(
        infer_axis(geometry, container, Axis::X),
        infer_axis(geometry, container, Axis::Y),
    ))
}

/// One axis of an anchor: a decision plus the margin captured for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRule {
    axis: Axis,
    decision: AxisDecision,
    margin: f64,
    base_near: f64,
    base_size: f64,
    rigid: bool,
}

impl AxisRule {
    /// Capture the base-space margin for a decision.
    ///
    /// In rigid mode the object keeps its authored size, and a stretch keeps
    /// its unscaled slack.
    pub fn capture(
        axis: Axis,
        decision: AxisDecision,
        geometry: &ObjectGeometry,
        container: Dimensions,
        rigid: bool,
    ) -> Self {
        let container_size = container.along(axis);
        let base_size = geometry.extent(axis);
        let margin = match decision {
            AxisDecision::StickNear => geometry.near(axis),
            AxisDecision::StickFar => container_size - geometry.far(axis),
            AxisDecision::StickCenter => geometry.center(axis) - container_size * 0.5,
            AxisDecision::Stretch => container_size - base_size,
        };
        Self {
            axis,
            decision,
            margin,
            base_near: geometry.near(axis),
            base_size,
            rigid,
        }
    }

    /// Axis this rule places.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Decision this rule applies.
    pub fn decision(&self) -> AxisDecision {
        self.decision
    }

    /// Captured base-space margin.
    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Whether the authored size is kept unscaled.
    pub fn is_rigid(&self) -> bool {
        self.rigid
    }

    /// Live placement for a live container extent and axis multiplier.
    pub fn resolve(&self, container: f64, scale: f64) -> Span {
        let size = if self.rigid {
            self.base_size
        } else {
            self.base_size * scale
        };
        match self.decision {
            AxisDecision::StickNear => Span::new(self.margin * scale, size),
            AxisDecision::StickFar => Span::new(container - self.margin * scale - size, size),
            AxisDecision::StickCenter => {
                Span::new(container * 0.5 + self.margin * scale - size * 0.5, size)
            }
            AxisDecision::Stretch => {
                let slack = if self.rigid {
                    self.margin
                } else {
                    self.margin * scale
                };
                Span::new(self.base_near * scale, (container - slack).max(0.0))
            }
        }
    }
}

/// An axis rule bound to the factor it reads on every layout pass.
#[derive(Debug, Clone)]
pub struct AnchorRule {
    rule: AxisRule,
    factor: ScaleFactor,
}

impl AnchorRule {
    /// Bind a rule to a factor.
    pub fn new(rule: AxisRule, factor: ScaleFactor) -> Self {
        Self { rule, factor }
    }

    /// The captured axis rule.
    pub fn rule(&self) -> &AxisRule {
        &self.rule
    }

    /// Axis this rule places.
    pub fn axis(&self) -> Axis {
        self.rule.axis
    }

    /// The factor this rule reads.
    pub fn scale_factor(&self) -> &ScaleFactor {
        &self.factor
    }

    /// Live placement inside a live container.
    pub fn resolve(&self, container: Dimensions) -> Span {
        let axis = self.rule.axis;
        self.rule
            .resolve(container.along(axis), self.factor.along(axis))
    }
}
