//! Named anchoring operations over scene objects.
//!
//! Each operation captures margins from an object's base geometry and
//! registers one rule per affected axis into a [`RuleSink`]. Composite
//! operations are the independent application of their per-axis parts.

use crate::geom::{Axis, Dimensions, ObjectGeometry};
use crate::scale::{ScaleController, ScaleError, ScaleFactor, validate_container, validate_geometry};

use super::{AnchorDecision, AnchorRule, AxisDecision, AxisRule, RuleSink, infer_anchor};

/// An object that can be anchored.
pub trait LayoutObject {
    /// Key the object's rules are registered under.
    type Id: Clone;

    /// Key for this object.
    fn id(&self) -> Self::Id;

    /// Bounding box at the design resolution, relative to the container.
    fn base_geometry(&self) -> ObjectGeometry;
}

/// A container whose children can be anchored in bulk.
pub trait LayoutContainer {
    /// Child object type.
    type Child: LayoutObject;

    /// Container size at the design resolution.
    fn base_size(&self) -> Dimensions;

    /// Direct children.
    fn children(&self) -> impl Iterator<Item = &Self::Child>;
}

/// Options shared by every anchoring operation.
#[derive(Debug, Clone, Default)]
pub struct AnchorOptions {
    rigid: bool,
    controller: Option<ScaleController>,
    container: Option<Dimensions>,
}

impl AnchorOptions {
    /// Non-rigid anchoring against the current controller's base size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep authored sizes unscaled.
    pub fn rigid(mut self, rigid: bool) -> Self {
        self.rigid = rigid;
        self
    }

    /// Bind rules to this controller's factor instead of the current one.
    pub fn controller(mut self, controller: &ScaleController) -> Self {
        self.controller = Some(controller.clone());
        self
    }

    /// Base size of the container, defaulting to the controller's base size.
    pub fn container(mut self, container: Dimensions) -> Self {
        self.container = Some(container);
        self
    }
}

struct Binding {
    factor: ScaleFactor,
    container: Dimensions,
    rigid: bool,
}

impl Binding {
    fn resolve(options: &AnchorOptions, container: Option<Dimensions>) -> Result<Self, ScaleError> {
        let controller = match &options.controller {
            Some(controller) => controller.clone(),
            None => ScaleController::current().ok_or(ScaleError::NoCurrentController)?,
        };
        let factor = controller.scale_factor();
        let container = container
            .or(options.container)
            .unwrap_or_else(|| factor.base());
        validate_container(container)?;
        Ok(Self {
            factor,
            container,
            rigid: options.rigid,
        })
    }

    fn rules(
        &self,
        geometry: ObjectGeometry,
        x: Option<AxisDecision>,
        y: Option<AxisDecision>,
    ) -> impl Iterator<Item = AnchorRule> + '_ {
        Axis::ALL
            .into_iter()
            .zip([x, y])
            .filter_map(move |(axis, decision)| {
                let decision = decision?;
                let rule = AxisRule::capture(axis, decision, &geometry, self.container, self.rigid);
                Some(AnchorRule::new(rule, self.factor.clone()))
            })
    }
}

fn apply<O, S>(
    sink: &mut S,
    object: &O,
    x: Option<AxisDecision>,
    y: Option<AxisDecision>,
    options: &AnchorOptions,
) -> Result<(), ScaleError>
where
    O: LayoutObject + ?Sized,
    S: RuleSink<O::Id> + ?Sized,
{
    let geometry = object.base_geometry();
    validate_geometry(&geometry)?;
    let binding = Binding::resolve(options, None)?;
    for rule in binding.rules(geometry, x, y) {
        log::trace!(
            "anchoring {:?} axis with {:?}, margin {}",
            rule.axis(),
            rule.rule().decision(),
            rule.rule().margin()
        );
        sink.register(object.id(), rule);
    }
    Ok(())
}

macro_rules! anchor_ops {
    ($($(#[$doc:meta])* $name:ident => ($x:expr, $y:expr);)*) => {
        $(
            $(#[$doc])*
            pub fn $name<O, S>(
                sink: &mut S,
                object: &O,
                options: &AnchorOptions,
            ) -> Result<(), ScaleError>
            where
                O: LayoutObject + ?Sized,
                S: RuleSink<O::Id> + ?Sized,
            {
                apply(sink, object, $x, $y, options)
            }
        )*
    };
}

anchor_ops! {
    /// Keep the scaled distance to the container's left edge.
    stick_left => (Some(AxisDecision::StickNear), None);
    /// Keep the scaled distance to the container's right edge.
    stick_right => (Some(AxisDecision::StickFar), None);
    /// Keep the scaled distance to the container's top edge.
    stick_top => (None, Some(AxisDecision::StickNear));
    /// Keep the scaled distance to the container's bottom edge.
    stick_bottom => (None, Some(AxisDecision::StickFar));
    /// Keep the scaled horizontal offset from the container center.
    stick_center_x => (Some(AxisDecision::StickCenter), None);
    /// Keep the scaled vertical offset from the container center.
    stick_center_y => (None, Some(AxisDecision::StickCenter));
    /// Track the top-left corner.
    stick_top_left => (Some(AxisDecision::StickNear), Some(AxisDecision::StickNear));
    /// Track the top-right corner.
    stick_top_right => (Some(AxisDecision::StickFar), Some(AxisDecision::StickNear));
    /// Track the bottom-left corner.
    stick_bottom_left => (Some(AxisDecision::StickNear), Some(AxisDecision::StickFar));
    /// Track the bottom-right corner.
    stick_bottom_right => (Some(AxisDecision::StickFar), Some(AxisDecision::StickFar));
    /// Track the container center on both axes.
    stick_center => (Some(AxisDecision::StickCenter), Some(AxisDecision::StickCenter));
    /// Stretch horizontally with the container.
    stretch_x => (Some(AxisDecision::Stretch), None);
    /// Stretch vertically with the container.
    stretch_y => (None, Some(AxisDecision::Stretch));
    /// Stretch on both axes, keeping every side's margin.
    stretch => (Some(AxisDecision::Stretch), Some(AxisDecision::Stretch));
}

/// Apply an explicit decision pair.
pub fn anchor<O, S>(
    sink: &mut S,
    object: &O,
    decision: AnchorDecision,
    options: &AnchorOptions,
) -> Result<(), ScaleError>
where
    O: LayoutObject + ?Sized,
    S: RuleSink<O::Id> + ?Sized,
{
    apply(sink, object, Some(decision.x), Some(decision.y), options)
}

/// Infer and apply the anchoring that best preserves an object's placement.
pub fn preserve<O, S>(
    sink: &mut S,
    object: &O,
    options: &AnchorOptions,
) -> Result<AnchorDecision, ScaleError>
where
    O: LayoutObject + ?Sized,
    S: RuleSink<O::Id> + ?Sized,
{
    let geometry = object.base_geometry();
    let binding = Binding::resolve(options, None)?;
    let decision = infer_anchor(&geometry, binding.container)?;
    log::debug!("preserving placement with {decision:?}");
    for rule in binding.rules(geometry, Some(decision.x), Some(decision.y)) {
        sink.register(object.id(), rule);
    }
    Ok(decision)
}

/// Infer and apply anchoring for every child of a container.
///
/// Every child is validated before any rule is registered.
pub fn preserve_children<C, S>(
    sink: &mut S,
    container: &C,
    options: &AnchorOptions,
) -> Result<Vec<(<C::Child as LayoutObject>::Id, AnchorDecision)>, ScaleError>
where
    C: LayoutContainer + ?Sized,
    S: RuleSink<<C::Child as LayoutObject>::Id> + ?Sized,
{
    let binding = Binding::resolve(options, Some(container.base_size()))?;
    let planned = container
        .children()
        .map(|child| {
            let geometry = child.base_geometry();
            let decision = infer_anchor(&geometry, binding.container)?;
            Ok((child.id(), geometry, decision))
        })
        .collect::<Result<Vec<_>, ScaleError>>()?;

    let mut decisions = Vec::with_capacity(planned.len());
    for (id, geometry, decision) in planned {
        for rule in binding.rules(geometry, Some(decision.x), Some(decision.y)) {
            sink.register(id.clone(), rule);
        }
        decisions.push((id, decision));
    }
    log::debug!("preserved placement for {} children", decisions.len());
    Ok(decisions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::ConstraintList;
    use crate::geom::{LiveRect, Span};
    use crate::viewport::SharedViewport;

    struct Sprite {
        id: u32,
        geometry: ObjectGeometry,
    }

    impl LayoutObject for Sprite {
        type Id = u32;

        fn id(&self) -> u32 {
            self.id
        }

        fn base_geometry(&self) -> ObjectGeometry {
            self.geometry
        }
    }

    struct Stage {
        size: Dimensions,
        sprites: Vec<Sprite>,
    }

    impl LayoutContainer for Stage {
        type Child = Sprite;

        fn base_size(&self) -> Dimensions {
            self.size
        }

        fn children(&self) -> impl Iterator<Item = &Sprite> {
            self.sprites.iter()
        }
    }

    fn sprite(id: u32, left: f64, top: f64, width: f64, height: f64) -> Sprite {
        Sprite {
            id,
            geometry: ObjectGeometry::new(left, top, width, height),
        }
    }

    fn stretch_controller(viewport: &SharedViewport) -> ScaleController {
        ScaleController::builder()
            .source(viewport.clone())
            .strategy(crate::scale::ScaleStrategy::Stretch)
            .make_current(false)
            .build()
            .unwrap()
    }

    #[test]
    fn preserve_tracks_bottom_left_badge_through_resize() {
        let viewport = SharedViewport::new(Dimensions::new(800.0, 600.0));
        let controller = stretch_controller(&viewport);
        let options = AnchorOptions::new().controller(&controller);
        let badge = sprite(7, 10.0, 550.0, 50.0, 40.0);
        let mut list = ConstraintList::new();

        let decision = preserve(&mut list, &badge, &options).unwrap();
        assert_eq!(decision, AnchorDecision::BOTTOM_LEFT);

        let live = Dimensions::new(1600.0, 600.0);
        viewport.resize(live);
        let rect = list.resolve_rect(&7, &badge.geometry, live);

        assert_eq!(rect.x, Span::new(20.0, 100.0));
        assert_eq!(rect.y, Span::new(550.0, 40.0));
    }

    #[test]
    fn single_axis_ops_register_one_rule() {
        let controller = ScaleController::builder().make_current(false).build().unwrap();
        let options = AnchorOptions::new().controller(&controller);
        let object = sprite(1, 10.0, 10.0, 20.0, 20.0);
        let mut list = ConstraintList::new();

        stick_left(&mut list, &object, &options).unwrap();
        stick_bottom(&mut list, &object, &options).unwrap();
        stick_center_x(&mut list, &object, &options).unwrap();
        stretch_y(&mut list, &object, &options).unwrap();

        let axes: Vec<Axis> = list.rules_for(&1).map(AnchorRule::axis).collect();
        assert_eq!(axes, vec![Axis::X, Axis::Y, Axis::X, Axis::Y]);
    }

    #[test]
    fn composites_match_their_axis_parts() {
        let viewport = SharedViewport::new(Dimensions::new(800.0, 600.0));
        let controller = stretch_controller(&viewport);
        let options = AnchorOptions::new().controller(&controller);
        let object = sprite(1, 700.0, 500.0, 60.0, 40.0);

        let mut composite = ConstraintList::new();
        stick_bottom_right(&mut composite, &object, &options).unwrap();
        let mut parts = ConstraintList::new();
        stick_right(&mut parts, &object, &options).unwrap();
        stick_bottom(&mut parts, &object, &options).unwrap();

        let live = Dimensions::new(1200.0, 900.0);
        viewport.resize(live);
        let composite = composite.resolve_rect(&1, &object.geometry, live);
        let parts = parts.resolve_rect(&1, &object.geometry, live);

        assert_eq!(composite, parts);
        assert_eq!(composite.x.end(), 1200.0 - 40.0 * 1.5);
        assert_eq!(composite.y.end(), 900.0 - 60.0 * 1.5);
    }

    #[test]
    fn every_named_operation_reproduces_base_layout_at_identity() {
        let controller = ScaleController::builder().make_current(false).build().unwrap();
        let object = sprite(3, 120.0, 80.0, 200.0, 100.0);
        let base = Dimensions::new(800.0, 600.0);
        type Op = fn(&mut ConstraintList<u32>, &Sprite, &AnchorOptions) -> Result<(), ScaleError>;
        let ops: [Op; 14] = [
            stick_left,
            stick_right,
            stick_top,
            stick_bottom,
            stick_center_x,
            stick_center_y,
            stick_top_left,
            stick_top_right,
            stick_bottom_left,
            stick_bottom_right,
            stick_center,
            stretch_x,
            stretch_y,
            stretch,
        ];
        for rigid in [false, true] {
            let options = AnchorOptions::new().controller(&controller).rigid(rigid);
            for op in ops {
                let mut list = ConstraintList::new();
                op(&mut list, &object, &options).unwrap();
                let rect = list.resolve_rect(&3, &object.geometry, base);
                let expected = LiveRect::new(Span::new(120.0, 200.0), Span::new(80.0, 100.0));
                assert!((rect.x.position - expected.x.position).abs() < 1e-9);
                assert!((rect.y.position - expected.y.position).abs() < 1e-9);
                assert!((rect.x.size - expected.x.size).abs() < 1e-9);
                assert!((rect.y.size - expected.y.size).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn explicit_container_overrides_controller_base() {
        let controller = ScaleController::builder().make_current(false).build().unwrap();
        let options = AnchorOptions::new()
            .controller(&controller)
            .container(Dimensions::new(200.0, 100.0));
        let object = sprite(1, 150.0, 10.0, 20.0, 20.0);
        let mut list = ConstraintList::new();

        stick_right(&mut list, &object, &options).unwrap();

        let rule = list.rules_for(&1).next().unwrap();
        assert_eq!(rule.rule().margin(), 30.0);
    }

    #[test]
    fn missing_controller_is_reported() {
        let object = sprite(1, 0.0, 0.0, 10.0, 10.0);
        let mut list = ConstraintList::new();
        let err = stick_left(&mut list, &object, &AnchorOptions::new()).unwrap_err();
        assert_eq!(err, ScaleError::NoCurrentController);
        assert!(list.is_empty());
    }

    #[test]
    fn falls_back_to_current_controller() {
        let controller = ScaleController::with_base(400.0, 300.0).unwrap();
        let object = sprite(1, 300.0, 10.0, 20.0, 20.0);
        let mut list = ConstraintList::new();

        stick_right(&mut list, &object, &AnchorOptions::new()).unwrap();

        let rule = list.rules_for(&1).next().unwrap();
        assert!(rule.scale_factor().ptr_eq(&controller.scale_factor()));
        assert_eq!(rule.rule().margin(), 80.0);
        controller.dispose();
    }

    #[test]
    fn preserve_children_decides_each_child_independently() {
        let controller = ScaleController::builder().make_current(false).build().unwrap();
        let stage = Stage {
            size: Dimensions::new(800.0, 600.0),
            sprites: vec![
                sprite(1, 10.0, 10.0, 50.0, 50.0),
                sprite(2, 740.0, 540.0, 50.0, 50.0),
                sprite(3, 375.0, 275.0, 50.0, 50.0),
                sprite(4, 0.0, 0.0, 800.0, 600.0),
            ],
        };
        let mut list = ConstraintList::new();

        let decisions =
            preserve_children(&mut list, &stage, &AnchorOptions::new().controller(&controller))
                .unwrap();

        assert_eq!(
            decisions,
            vec![
                (1, AnchorDecision::TOP_LEFT),
                (2, AnchorDecision::BOTTOM_RIGHT),
                (3, AnchorDecision::CENTER),
                (4, AnchorDecision::STRETCH),
            ]
        );
        assert_eq!(list.len(), 8);
    }

    #[test]
    fn preserve_children_fails_before_registering() {
        let controller = ScaleController::builder().make_current(false).build().unwrap();
        let stage = Stage {
            size: Dimensions::new(800.0, 600.0),
            sprites: vec![sprite(1, 10.0, 10.0, 50.0, 50.0), sprite(2, 0.0, 0.0, 0.0, 5.0)],
        };
        let mut list = ConstraintList::new();

        let options = AnchorOptions::new().controller(&controller);
        let err = preserve_children(&mut list, &stage, &options).unwrap_err();

        assert!(matches!(err, ScaleError::InvalidGeometry { .. }));
        assert!(list.is_empty());
    }
}
