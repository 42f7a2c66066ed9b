//! gpui_payoff is an interactive payoff-diagram core built for GPUI.
//! Users drag control points on a chart and drop them onto snap candidates;
//! the resulting payoff curve is re-interpolated from the new anchors.

#![forbid(unsafe_code)]

pub mod axis;
pub mod delegate;
pub mod geom;
pub mod gesture;
pub mod host;
#[cfg(feature = "gpui")]
mod interaction;
pub mod points;
pub mod primitive;
pub mod render;
pub mod spline;
pub mod strategy;
pub mod style;
pub mod transform;
pub mod view;

#[cfg(feature = "gpui")]
pub mod gpui_backend;

pub use axis::{AxisLayout, AxisTick, TextMeasurer, nice_ticks, tick_label};
pub use delegate::{Delegate, OwnerId, SubscriptionId};
pub use geom::{LogicalPoint, ScreenPoint, ScreenRect};
pub use gesture::{DragHandler, GestureSink, GestureState, MoveSource, PointerEvent};
pub use host::{ChartHost, CoordinateSpace, HandleScroll, PointerHost, PointerKind, ScrollControl};
pub use points::{
    CandidatePoint, DragCancel, DragComplete, DragMove, DragStart, DraggablePoints, PointModel,
};
pub use primitive::{DragEvents, DraggablePointsPrimitive, HoveredItem, SeriesPrimitive, ZOrder};
pub use render::{
    Color, ColorError, LineSegment, LineStyle, RenderCommand, RenderList, TextStyle,
    build_signed_fill,
};
pub use spline::{LinearSpline, SplineError, linear_spline, sample_curve};
pub use strategy::PayoffStrategy;
pub use style::{PointsStyle, Theme};
pub use transform::Transform;
pub use view::{Range, Viewport};

#[cfg(feature = "gpui")]
pub use gpui_backend::{GpuiPayoffView, PayoffHandle, PayoffViewConfig};
