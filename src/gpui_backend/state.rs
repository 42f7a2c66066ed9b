use std::collections::HashSet;

use crate::geom::{LogicalPoint, ScreenPoint};
use crate::host::{
    ChartHost, CoordinateSpace, HandleScroll, PointerHost, PointerKind, ScrollControl,
};
use crate::primitive::DraggablePointsPrimitive;
use crate::transform::Transform;
use crate::view::Viewport;

/// Host capabilities of the GPUI view, handed to the overlay on every call.
#[derive(Debug, Clone, Default)]
pub(crate) struct ChartSurface {
    /// Plot-area transform; screen positions are local to the plot area.
    pub(crate) transform: Option<Transform>,
    /// Window position of the canvas.
    pub(crate) origin: ScreenPoint,
    pub(crate) left_panel_width: f32,
    pub(crate) listening: HashSet<PointerKind>,
    pub(crate) scroll: HandleScroll,
    pub(crate) needs_update: bool,
}

impl ChartSurface {
    pub(crate) fn is_listening(&self, kind: PointerKind) -> bool {
        self.listening.contains(&kind)
    }

    /// Convert a window position into plot-area coordinates.
    pub(crate) fn to_local(&self, position: ScreenPoint) -> ScreenPoint {
        ScreenPoint::new(
            position.x - self.origin.x - self.left_panel_width,
            position.y - self.origin.y,
        )
    }
}

impl CoordinateSpace for ChartSurface {
    fn time_to_x(&self, time: i64) -> Option<f32> {
        self.transform.as_ref()?.time_to_x(time)
    }

    fn value_to_y(&self, value: f64) -> Option<f32> {
        self.transform.as_ref()?.value_to_y(value)
    }
}

impl ScrollControl for ChartSurface {
    fn apply_scroll_options(&mut self, options: HandleScroll) {
        self.scroll = options;
    }
}

impl PointerHost for ChartSurface {
    fn listen(&mut self, kind: PointerKind) {
        self.listening.insert(kind);
    }

    fn unlisten(&mut self, kind: PointerKind) {
        self.listening.remove(&kind);
    }

    fn surface_origin(&self) -> ScreenPoint {
        self.origin
    }

    fn left_panel_width(&self) -> f32 {
        self.left_panel_width
    }
}

impl ChartHost for ChartSurface {
    fn request_update(&mut self) {
        self.needs_update = true;
    }
}

#[derive(Debug, Default)]
pub(crate) struct PayoffUiState {
    pub(crate) surface: ChartSurface,
    pub(crate) overlay: DraggablePointsPrimitive,
    pub(crate) curve: Vec<LogicalPoint>,
    pub(crate) preview: Option<Vec<LogicalPoint>>,
    /// Viewport set by panning; `None` fits the data.
    pub(crate) manual_view: Option<Viewport>,
    pub(crate) pan_last: Option<ScreenPoint>,
    pub(crate) point_hovered: bool,
}

/// Data change requested through a [`PayoffHandle`](super::PayoffHandle).
#[derive(Debug, Clone)]
pub(crate) enum PayoffUpdate {
    Curve(Vec<LogicalPoint>),
    Preview(Option<Vec<LogicalPoint>>),
    Points {
        points: Vec<LogicalPoint>,
        candidates: Vec<LogicalPoint>,
    },
    FitView,
}

impl PayoffUiState {
    pub(crate) fn apply(&mut self, update: PayoffUpdate) {
        match update {
            PayoffUpdate::Curve(curve) => self.curve = curve,
            PayoffUpdate::Preview(preview) => self.preview = preview,
            PayoffUpdate::Points { points, candidates } => {
                self.overlay.set_data(points, candidates, &mut self.surface);
            }
            PayoffUpdate::FitView => self.manual_view = None,
        }
    }
}
