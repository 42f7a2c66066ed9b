//! Draggable-points overlay as a chart primitive.
//!
//! [`DraggablePointsPrimitive`] is the façade the host chart talks to. It is
//! attached to and detached from a host, asked to refresh and draw once per
//! frame, hit-tested on hover, and fed raw pointer events. Application code
//! subscribes to drag start/move/complete/cancel through [`DragEvents`].

use std::rc::Rc;

use crate::delegate::{Delegate, OwnerId, SubscriptionId};
use crate::geom::LogicalPoint;
use crate::gesture::{DragHandler, GestureCall, MoveSource, PointerEvent};
use crate::host::ChartHost;
use crate::points::{DragCancel, DragComplete, DragMove, DragStart, DraggablePoints};
use crate::render::{RenderCommand, RenderList};
use crate::style::PointsStyle;

/// Identifier reported by [`HoveredItem::external_id`].
pub const DRAGGABLE_POINTS_ID: &str = "draggable-points";

/// Stacking of a primitive relative to the series it is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZOrder {
    /// Below the series.
    Bottom,
    /// Same layer as the series.
    Normal,
    /// Above the series.
    #[default]
    Top,
}

/// Hit-test answer telling the host which cursor to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoveredItem {
    /// Stacking of the hovered item.
    pub z_order: ZOrder,
    /// Suggested cursor, such as `"move"`.
    pub cursor_style: String,
    /// Identifier of the primitive that was hit.
    pub external_id: &'static str,
}

/// Lifecycle of a primitive attached to a host chart.
///
/// The host is passed to every call; primitives never keep a reference to it.
pub trait SeriesPrimitive {
    /// Called once when the primitive is attached to `host`.
    fn attached<H: ChartHost + ?Sized>(&mut self, host: &mut H);

    /// Called once when the primitive is removed from `host`.
    fn detached<H: ChartHost + ?Sized>(&mut self, host: &mut H);

    /// Called before every render pass; the view transform may have changed.
    fn update_all_views<H: ChartHost + ?Sized>(&mut self, host: &H);

    /// Emit the draw commands of this primitive.
    fn draw(&self, target: &mut RenderList);

    /// Report whether the pointer at `(x, y)` is over this primitive.
    fn hit_test(&mut self, x: f32, y: f32) -> Option<HoveredItem>;
}

/// Drag lifecycle notifications.
#[derive(Debug, Default)]
pub struct DragEvents {
    /// A drag started on a point.
    pub start: Delegate<DragStart>,
    /// The snap target was recomputed during a drag.
    pub moved: Delegate<DragMove>,
    /// A drag completed; carries every point after the commit.
    pub complete: Delegate<DragComplete>,
    /// A drag was cancelled; no point data.
    pub cancel: Delegate<DragCancel>,
}

impl DragEvents {
    /// Remove every registration of `owner` from all four lists.
    pub fn unsubscribe_all(&self, owner: OwnerId) -> usize {
        self.start.unsubscribe_all(owner)
            + self.moved.unsubscribe_all(owner)
            + self.complete.unsubscribe_all(owner)
            + self.cancel.unsubscribe_all(owner)
    }

    fn destroy(&self) {
        self.start.destroy();
        self.moved.destroy();
        self.complete.destroy();
        self.cancel.destroy();
    }
}

/// Interactive overlay of draggable points snapping to candidate positions.
#[derive(Debug)]
pub struct DraggablePointsPrimitive {
    style: PointsStyle,
    points: Vec<LogicalPoint>,
    candidates: Vec<LogicalPoint>,
    model: DraggablePoints,
    gesture: DragHandler,
    events: Rc<DragEvents>,
    attached: bool,
}

impl DraggablePointsPrimitive {
    /// Create a detached primitive with the default style.
    pub fn new() -> Self {
        Self::with_style(PointsStyle::default())
    }

    /// Create a detached primitive with a custom style.
    pub fn with_style(style: PointsStyle) -> Self {
        Self {
            model: DraggablePoints::new(style.vicinity_threshold_px),
            style,
            points: Vec::new(),
            candidates: Vec::new(),
            gesture: DragHandler::new(MoveSource::Pointer),
            events: Rc::new(DragEvents::default()),
            attached: false,
        }
    }

    /// Read drag moves from host crosshair notifications instead of pointer moves.
    ///
    /// Only takes effect while detached.
    pub fn with_move_source(mut self, move_source: MoveSource) -> Self {
        if !self.attached {
            self.gesture = DragHandler::new(move_source);
        }
        self
    }

    /// Replace the displayed points and snap candidates.
    ///
    /// An active drag is cancelled first. While detached the data is kept and
    /// projected on attach.
    pub fn set_data<H: ChartHost + ?Sized>(
        &mut self,
        points: Vec<LogicalPoint>,
        candidates: Vec<LogicalPoint>,
        host: &mut H,
    ) {
        self.points = points;
        self.candidates = candidates;
        if !self.attached {
            return;
        }
        self.cancel_drag(host);
        self.model.set_data(&self.points, &self.candidates, &*host);
        host.request_update();
    }

    /// Shared handle to the drag notifications.
    ///
    /// Callbacks may hold a clone to unsubscribe themselves or others while a
    /// dispatch is running.
    pub fn events(&self) -> Rc<DragEvents> {
        Rc::clone(&self.events)
    }

    /// Subscribe to drag starts.
    pub fn subscribe_drag_start(
        &self,
        owner: OwnerId,
        callback: impl Fn(&DragStart) + 'static,
    ) -> SubscriptionId {
        self.events.start.subscribe(owner, callback, false)
    }

    /// Subscribe to snap target updates during a drag.
    pub fn subscribe_drag_move(
        &self,
        owner: OwnerId,
        callback: impl Fn(&DragMove) + 'static,
    ) -> SubscriptionId {
        self.events.moved.subscribe(owner, callback, false)
    }

    /// Subscribe to completed drags.
    pub fn subscribe_drag_complete(
        &self,
        owner: OwnerId,
        callback: impl Fn(&DragComplete) + 'static,
    ) -> SubscriptionId {
        self.events.complete.subscribe(owner, callback, false)
    }

    /// Subscribe to cancelled drags.
    pub fn subscribe_drag_cancel(
        &self,
        owner: OwnerId,
        callback: impl Fn(&DragCancel) + 'static,
    ) -> SubscriptionId {
        self.events.cancel.subscribe(owner, callback, false)
    }

    /// Remove one drag-start subscription.
    pub fn unsubscribe_drag_start(&self, owner: OwnerId, id: SubscriptionId) -> bool {
        self.events.start.unsubscribe(owner, id)
    }

    /// Remove one drag-move subscription.
    pub fn unsubscribe_drag_move(&self, owner: OwnerId, id: SubscriptionId) -> bool {
        self.events.moved.unsubscribe(owner, id)
    }

    /// Remove one drag-complete subscription.
    pub fn unsubscribe_drag_complete(&self, owner: OwnerId, id: SubscriptionId) -> bool {
        self.events.complete.unsubscribe(owner, id)
    }

    /// Remove one drag-cancel subscription.
    pub fn unsubscribe_drag_cancel(&self, owner: OwnerId, id: SubscriptionId) -> bool {
        self.events.cancel.unsubscribe(owner, id)
    }

    /// Remove every drag subscription of `owner`.
    pub fn unsubscribe_all(&self, owner: OwnerId) -> usize {
        self.events.unsubscribe_all(owner)
    }

    /// Feed a host pointer event through the gesture adapter and the model.
    pub fn handle_pointer<H: ChartHost + ?Sized>(&mut self, event: PointerEvent, host: &mut H) {
        if !self.attached {
            return;
        }
        if matches!(event, PointerEvent::Down(_)) {
            // The view may have moved since the last frame.
            self.model.refresh_projection(&*host);
        }
        let mut calls = Vec::new();
        self.gesture.handle(event, host, &mut calls);
        for call in calls {
            match call {
                GestureCall::Start(position) => {
                    if let Some(start) = self.model.on_drag_start(position, host) {
                        self.events.start.dispatch(&start);
                        host.request_update();
                    }
                }
                GestureCall::Move(position) => {
                    if let Some(moved) = self.model.on_drag(position) {
                        self.events.moved.dispatch(&moved);
                        host.request_update();
                    }
                }
                GestureCall::Complete => {
                    if let Some(done) = self.model.on_drag_complete(host) {
                        self.points.clone_from(&done.points);
                        self.events.complete.dispatch(&done);
                        host.request_update();
                    }
                }
                GestureCall::Cancel => self.cancel_drag(host),
            }
        }
    }

    /// Current logical positions of the points.
    pub fn points(&self) -> &[LogicalPoint] {
        &self.points
    }

    /// The underlying point model.
    pub fn model(&self) -> &DraggablePoints {
        &self.model
    }

    /// Styling in use.
    pub fn style(&self) -> &PointsStyle {
        &self.style
    }

    /// Check whether the primitive is attached to a host.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Check whether a point is being dragged.
    pub fn is_dragging(&self) -> bool {
        self.model.is_dragging()
    }

    /// Drop every subscription; later drags notify nobody.
    pub fn destroy(&self) {
        self.events.destroy();
    }

    fn cancel_drag<H: ChartHost + ?Sized>(&mut self, host: &mut H) {
        if let Some(cancel) = self.model.on_drag_cancel(host) {
            self.events.cancel.dispatch(&cancel);
            host.request_update();
        }
    }
}

impl Default for DraggablePointsPrimitive {
    fn default() -> Self {
        Self::new()
    }
}

impl SeriesPrimitive for DraggablePointsPrimitive {
    fn attached<H: ChartHost + ?Sized>(&mut self, host: &mut H) {
        if self.attached {
            return;
        }
        self.gesture.connect(host);
        self.model.set_data(&self.points, &self.candidates, &*host);
        self.attached = true;
        tracing::debug!(
            points = self.points.len(),
            candidates = self.candidates.len(),
            "draggable points attached"
        );
    }

    fn detached<H: ChartHost + ?Sized>(&mut self, host: &mut H) {
        if !self.attached {
            return;
        }
        // Restore native scrolling before the listeners go away.
        self.cancel_drag(host);
        self.gesture.disconnect(host);
        self.attached = false;
        tracing::debug!("draggable points detached");
    }

    fn update_all_views<H: ChartHost + ?Sized>(&mut self, host: &H) {
        if self.attached {
            self.model.refresh_projection(host);
            tracing::trace!("draggable points views updated");
        }
    }

    fn draw(&self, target: &mut RenderList) {
        if !self.attached {
            return;
        }
        let style = &self.style;
        let dragged = self.model.dragged();

        for (index, model) in self.model.points().iter().enumerate() {
            if !model.screen.is_finite() {
                continue;
            }
            target.push(RenderCommand::Disc {
                center: model.screen,
                radius: style.point_radius,
                fill: style.point_color,
            });
            if model.is_hovered && dragged != Some(index) {
                target.push(RenderCommand::Ring {
                    center: model.screen,
                    radius: style.hover_ring_radius,
                    stroke: style.hover_ring(),
                });
            }
        }

        if dragged.is_none() {
            return;
        }
        for candidate in self.model.candidates() {
            if candidate.screen.is_finite() {
                target.push(RenderCommand::Disc {
                    center: candidate.screen,
                    radius: style.candidate_radius,
                    fill: style.candidate_color,
                });
            }
        }
        if let Some(next) = self.model.next_possible() {
            if next.screen.is_finite() {
                target.push(RenderCommand::Disc {
                    center: next.screen,
                    radius: style.snap_radius,
                    fill: style.snap_color,
                });
                target.push(RenderCommand::Ring {
                    center: next.screen,
                    radius: style.snap_ring_radius,
                    stroke: style.snap_ring(),
                });
            }
        }
    }

    fn hit_test(&mut self, x: f32, y: f32) -> Option<HoveredItem> {
        if !self.attached {
            return None;
        }
        let hovered = self.model.hit_test_hover(x, y);
        tracing::trace!(x, y, hovered, "draggable points hit test");
        hovered.then(|| HoveredItem {
            z_order: ZOrder::Top,
            cursor_style: self.style.cursor_style.clone(),
            external_id: DRAGGABLE_POINTS_ID,
        })
    }
}
