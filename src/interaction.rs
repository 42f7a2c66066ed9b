//! Native chart interaction shared by render backends.
//!
//! Backends pan the viewport with the pressed mouse only while the host's
//! scroll handling allows it; the draggable-points overlay switches it off
//! for the duration of a drag.

use crate::geom::ScreenPoint;
use crate::host::HandleScroll;
use crate::transform::Transform;
use crate::view::{Range, Viewport};

/// Pan a viewport by a pixel delta.
///
/// Dragging right or down moves the visible data right or down, so the
/// viewport shifts the opposite way in data space.
pub(crate) fn pan_viewport(
    viewport: Viewport,
    delta_pixels: ScreenPoint,
    transform: &Transform,
) -> Option<Viewport> {
    let origin = transform.screen_to_data(ScreenPoint::new(0.0, 0.0))?;
    let shifted = transform.screen_to_data(delta_pixels)?;
    let dx = shifted.0 - origin.0;
    let dy = shifted.1 - origin.1;
    Some(Viewport::new(
        Range::new(viewport.x.min - dx, viewport.x.max - dx),
        Range::new(viewport.y.min - dy, viewport.y.max - dy),
    ))
}

/// Pixel delta a pressed-mouse move may apply under `options`.
///
/// Touch-drag axis flags restrict the pan to the enabled axes.
pub(crate) fn allowed_pan(options: HandleScroll, delta_pixels: ScreenPoint) -> Option<ScreenPoint> {
    if !options.pressed_mouse_move {
        return None;
    }
    let x = if options.horz_touch_drag { delta_pixels.x } else { 0.0 };
    let y = if options.vert_touch_drag { delta_pixels.y } else { 0.0 };
    (x != 0.0 || y != 0.0).then_some(ScreenPoint::new(x, y))
}
