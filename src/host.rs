//! Capabilities consumed from the host chart.
//!
//! The draggable-points overlay never owns the chart. Everything it needs
//! (coordinate projection, pan/scroll switches, pointer listener registration,
//! redraw requests) is passed in through these traits on every call.

use crate::geom::{LogicalPoint, ScreenPoint};

/// Projection from logical coordinates into the host's plot-area pixels.
pub trait CoordinateSpace {
    /// Horizontal pixel position of a time, or `None` when it cannot be projected.
    fn time_to_x(&self, time: i64) -> Option<f32>;

    /// Vertical pixel position of a value, or `None` when it cannot be projected.
    fn value_to_y(&self, value: f64) -> Option<f32>;

    /// Project a logical point, yielding NaN on axes the host could not map.
    fn project(&self, point: LogicalPoint) -> ScreenPoint {
        ScreenPoint::new(
            self.time_to_x(point.time).unwrap_or(f32::NAN),
            self.value_to_y(point.value).unwrap_or(f32::NAN),
        )
    }
}

/// Native pan/scroll switches of the host chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandleScroll {
    /// Horizontal touch drag pans the chart.
    pub horz_touch_drag: bool,
    /// Vertical touch drag pans the chart.
    pub vert_touch_drag: bool,
    /// Mouse move with a pressed button pans the chart.
    pub pressed_mouse_move: bool,
}

impl HandleScroll {
    /// All native scrolling enabled.
    pub const ENABLED: Self = Self {
        horz_touch_drag: true,
        vert_touch_drag: true,
        pressed_mouse_move: true,
    };

    /// All native scrolling disabled.
    pub const DISABLED: Self = Self {
        horz_touch_drag: false,
        vert_touch_drag: false,
        pressed_mouse_move: false,
    };
}

impl Default for HandleScroll {
    fn default() -> Self {
        Self::ENABLED
    }
}

/// Host switch for native pan/scroll handling.
pub trait ScrollControl {
    /// Apply the given scroll handling flags.
    fn apply_scroll_options(&mut self, options: HandleScroll);
}

/// Host pointer notifications the gesture adapter can listen to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// Primary button pressed.
    Down,
    /// Pointer moved.
    Move,
    /// Primary button released.
    Up,
    /// Gesture aborted by the host.
    Cancel,
    /// Crosshair moved; positions are already local to the plot area.
    CrosshairMove,
}

/// Pointer listener registration on the host's root element.
pub trait PointerHost {
    /// Start delivering events of `kind`.
    fn listen(&mut self, kind: PointerKind);

    /// Stop delivering events of `kind`.
    fn unlisten(&mut self, kind: PointerKind);

    /// Top-left corner of the chart element in client coordinates.
    fn surface_origin(&self) -> ScreenPoint;

    /// Width of the fixed panel left of the plot area (the left price scale).
    fn left_panel_width(&self) -> f32;
}

/// Full capability set handed to a [`SeriesPrimitive`](crate::primitive::SeriesPrimitive).
pub trait ChartHost: CoordinateSpace + ScrollControl + PointerHost {
    /// Ask the host to schedule a redraw.
    fn request_update(&mut self);
}
