use layout_scale::anchor::{self, ConstraintList, LayoutContainer, LayoutObject};
use layout_scale::{AnchorOptions, Dimensions, ObjectGeometry, ScaleController, SharedViewport};

struct Widget {
    name: &'static str,
    geometry: ObjectGeometry,
}

impl LayoutObject for Widget {
    type Id = &'static str;

    fn id(&self) -> Self::Id {
        self.name
    }

    fn base_geometry(&self) -> ObjectGeometry {
        self.geometry
    }
}

struct Screen {
    size: Dimensions,
    widgets: Vec<Widget>,
}

impl LayoutContainer for Screen {
    type Child = Widget;

    fn base_size(&self) -> Dimensions {
        self.size
    }

    fn children(&self) -> impl Iterator<Item = &Widget> {
        self.widgets.iter()
    }
}

fn main() -> Result<(), layout_scale::ScaleError> {
    env_logger::init();

    let base = Dimensions::new(800.0, 600.0);
    let viewport = SharedViewport::new(base);
    let controller = ScaleController::builder()
        .base_size(base)
        .source(viewport.clone())
        .build()?;
    controller.set_stretch()?;

    let screen = Screen {
        size: base,
        widgets: vec![
            Widget {
                name: "health",
                geometry: ObjectGeometry::new(10.0, 550.0, 50.0, 40.0),
            },
            Widget {
                name: "minimap",
                geometry: ObjectGeometry::new(640.0, 10.0, 150.0, 150.0),
            },
            Widget {
                name: "dialog",
                geometry: ObjectGeometry::new(300.0, 250.0, 200.0, 100.0),
            },
            Widget {
                name: "toolbar",
                geometry: ObjectGeometry::new(0.0, 0.0, 800.0, 32.0),
            },
        ],
    };

    let mut constraints = ConstraintList::new();
    let decisions = anchor::preserve_children(&mut constraints, &screen, &AnchorOptions::new())?;
    for (name, decision) in &decisions {
        log::info!("{name}: {decision:?}");
    }

    for size in [
        Dimensions::new(1600.0, 600.0),
        Dimensions::new(1280.0, 720.0),
        Dimensions::new(640.0, 480.0),
    ] {
        viewport.resize(size);
        println!(
            "viewport {}x{} -> scale {:.3}x{:.3}",
            size.width,
            size.height,
            controller.x(),
            controller.y()
        );
        for widget in &screen.widgets {
            let rect = constraints.resolve_rect(&widget.name, &widget.geometry, size);
            println!(
                "  {:<8} x={:>7.1} y={:>7.1} w={:>7.1} h={:>7.1}",
                widget.name, rect.x.position, rect.y.position, rect.x.size, rect.y.size
            );
        }
    }

    controller.dispose();
    Ok(())
}
