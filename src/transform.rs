//! Coordinate transforms between logical and screen space.

use crate::geom::{LogicalPoint, ScreenPoint, ScreenRect};
use crate::host::CoordinateSpace;
use crate::view::{Range, Viewport};

const MIN_SPAN: f64 = 1e-12;

/// Linear transform from logical coordinates into screen coordinates.
///
/// Time grows to the right, value grows upwards.
#[derive(Debug, Clone)]
pub struct Transform {
    viewport: Viewport,
    screen: ScreenRect,
    x_axis: Range,
    y_axis: Range,
}

impl Transform {
    /// Create a transform for the given viewport and screen rectangle.
    ///
    /// Returns `None` when the rectangle is empty or the viewport is not finite.
    pub fn new(viewport: Viewport, screen: ScreenRect) -> Option<Self> {
        if !screen.is_valid() || !viewport.x.is_finite() || !viewport.y.is_finite() {
            return None;
        }
        Some(Self {
            viewport,
            screen,
            x_axis: viewport.x.with_min_span(MIN_SPAN),
            y_axis: viewport.y.with_min_span(MIN_SPAN),
        })
    }

    /// Access the viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Access the screen rectangle.
    pub fn screen(&self) -> ScreenRect {
        self.screen
    }

    /// Map a horizontal data coordinate into screen space.
    pub fn x_to_screen(&self, x: f64) -> f32 {
        let x_norm = (x - self.x_axis.min) / self.x_axis.span();
        (self.screen.min.x as f64 + x_norm * self.screen.width() as f64) as f32
    }

    /// Map a vertical data coordinate into screen space.
    pub fn y_to_screen(&self, y: f64) -> f32 {
        let y_norm = (y - self.y_axis.min) / self.y_axis.span();
        (self.screen.max.y as f64 - y_norm * self.screen.height() as f64) as f32
    }

    /// Map a logical point into screen space.
    pub fn logical_to_screen(&self, point: LogicalPoint) -> ScreenPoint {
        ScreenPoint::new(self.x_to_screen(point.time as f64), self.y_to_screen(point.value))
    }

    /// Map a screen point into continuous data space as `(time, value)`.
    pub fn screen_to_data(&self, point: ScreenPoint) -> Option<(f64, f64)> {
        if !point.is_finite() {
            return None;
        }
        let x_norm = (point.x as f64 - self.screen.min.x as f64) / self.screen.width() as f64;
        let y_norm = (self.screen.max.y as f64 - point.y as f64) / self.screen.height() as f64;
        let x = self.x_axis.min + x_norm * self.x_axis.span();
        let y = self.y_axis.min + y_norm * self.y_axis.span();
        Some((x, y))
    }
}

impl CoordinateSpace for Transform {
    fn time_to_x(&self, time: i64) -> Option<f32> {
        let x = self.x_to_screen(time as f64);
        x.is_finite().then_some(x)
    }

    fn value_to_y(&self, value: f64) -> Option<f32> {
        let y = self.y_to_screen(value);
        y.is_finite().then_some(y)
    }
}
