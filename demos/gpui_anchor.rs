use gpui::prelude::*;
use gpui::{AppContext, Application, Bounds, WindowBounds, WindowOptions, div, px, rgb, size};

use layout_scale::anchor::{self, ConstraintList, LayoutObject};
use layout_scale::{
    AnchorOptions, Dimensions, ObjectGeometry, ScaleController, ScaledRoot, SharedViewport,
    ViewportSource,
};

#[derive(Clone, Copy)]
struct Panel {
    name: &'static str,
    color: u32,
    geometry: ObjectGeometry,
}

impl LayoutObject for Panel {
    type Id = &'static str;

    fn id(&self) -> Self::Id {
        self.name
    }

    fn base_geometry(&self) -> ObjectGeometry {
        self.geometry
    }
}

struct AnchoredHud {
    viewport: SharedViewport,
    panels: Vec<Panel>,
    constraints: ConstraintList<&'static str>,
    _controller: ScaleController,
}

impl gpui::Render for AnchoredHud {
    fn render(
        &mut self,
        _window: &mut gpui::Window,
        _cx: &mut gpui::Context<Self>,
    ) -> impl gpui::IntoElement {
        let live = self.viewport.size();
        div()
            .size_full()
            .relative()
            .bg(rgb(0x101418))
            .children(self.panels.iter().map(|panel| {
                let rect = self
                    .constraints
                    .resolve_rect(&panel.name, &panel.geometry, live);
                div()
                    .absolute()
                    .left(px(rect.x.position as f32))
                    .top(px(rect.y.position as f32))
                    .w(px(rect.x.size as f32))
                    .h(px(rect.y.size as f32))
                    .bg(rgb(panel.color))
            }))
    }
}

fn main() {
    env_logger::init();

    Application::new().run(|cx| {
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                None,
                size(px(800.0), px(600.0)),
                cx,
            ))),
            ..Default::default()
        };

        cx.open_window(options, |_window, cx| {
            let base = Dimensions::new(800.0, 600.0);
            let viewport = SharedViewport::new(base);
            let controller = ScaleController::builder()
                .base_size(base)
                .source(viewport.clone())
                .build()
                .expect("valid base size");

            let panels = vec![
                Panel {
                    name: "health",
                    color: 0xc62828,
                    geometry: ObjectGeometry::new(10.0, 550.0, 120.0, 40.0),
                },
                Panel {
                    name: "minimap",
                    color: 0x2e7d32,
                    geometry: ObjectGeometry::new(640.0, 10.0, 150.0, 150.0),
                },
                Panel {
                    name: "toolbar",
                    color: 0x1565c0,
                    geometry: ObjectGeometry::new(0.0, 0.0, 800.0, 32.0),
                },
            ];
            let mut constraints = ConstraintList::new();
            let options = AnchorOptions::new().controller(&controller);
            for panel in &panels {
                anchor::preserve(&mut constraints, panel, &options).expect("valid panel geometry");
            }

            let hud = cx.new(|_| AnchoredHud {
                viewport: viewport.clone(),
                panels,
                constraints,
                _controller: controller,
            });
            cx.new(|_| ScaledRoot::new(viewport, hud))
        })
        .unwrap();
    });
}
