//! Ordered rule storage keyed by target object.

use crate::geom::{Axis, Dimensions, LiveRect, ObjectGeometry, Span};

use super::AnchorRule;

/// Destination for rules produced by anchor operations.
///
/// Hosts with their own constraint system implement this to receive rules;
/// [`ConstraintList`] is a minimal in-process implementation.
pub trait RuleSink<T> {
    /// Register a rule for a target. Later rules for the same axis win.
    fn register(&mut self, target: T, rule: AnchorRule);
}

/// One resolved rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement<T> {
    /// Object the rule belongs to.
    pub target: T,
    /// Axis the rule placed.
    pub axis: Axis,
    /// Live placement on that axis.
    pub span: Span,
}

/// Ordered list of anchor rules keyed by target.
#[derive(Debug, Clone)]
pub struct ConstraintList<T> {
    rules: Vec<(T, AnchorRule)>,
}

impl<T> Default for ConstraintList<T> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<T: Clone + PartialEq> ConstraintList<T> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check whether no rules are registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules registered for a target, in registration order.
    pub fn rules_for<'a>(&'a self, target: &'a T) -> impl Iterator<Item = &'a AnchorRule> + 'a {
        self.rules
            .iter()
            .filter(move |(existing, _)| existing == target)
            .map(|(_, rule)| rule)
    }

    /// Drop every rule registered for a target. Returns the number removed.
    pub fn remove(&mut self, target: &T) -> usize {
        let before = self.rules.len();
        self.rules.retain(|(existing, _)| existing != target);
        before - self.rules.len()
    }

    /// Evaluate every rule against a live container, in registration order.
    pub fn resolve(&self, container: Dimensions) -> Vec<Placement<T>> {
        self.rules
            .iter()
            .map(|(target, rule)| Placement {
                target: target.clone(),
                axis: rule.axis(),
                span: rule.resolve(container),
            })
            .collect()
    }

    /// Live rectangle for one target.
    ///
    /// The last rule per axis wins; an axis with no rule keeps its base
    /// placement.
    pub fn resolve_rect(
        &self,
        target: &T,
        base: &ObjectGeometry,
        container: Dimensions,
    ) -> LiveRect {
        let mut x = Span::new(base.left, base.width);
        let mut y = Span::new(base.top, base.height);
        for rule in self.rules_for(target) {
            let span = rule.resolve(container);
            match rule.axis() {
                Axis::X => x = span,
                Axis::Y => y = span,
            }
        }
        LiveRect::new(x, y)
    }
}

impl<T> RuleSink<T> for ConstraintList<T> {
    fn register(&mut self, target: T, rule: AnchorRule) {
        self.rules.push((target, rule));
    }
}
