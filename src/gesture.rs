//! Pointer gesture adapter.
//!
//! Turns raw host pointer notifications into a drag lifecycle:
//! start, any number of moves, then either complete or cancel. Move events are
//! only listened to while a drag is in progress.

use crate::geom::ScreenPoint;
use crate::host::{PointerHost, PointerKind};

/// Raw pointer notification delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Primary button pressed at a client position.
    Down(ScreenPoint),
    /// Pointer moved to a client position.
    Move(ScreenPoint),
    /// Crosshair moved; `None` when the crosshair left the plot area.
    CrosshairMove(Option<ScreenPoint>),
    /// Primary button released.
    Up,
    /// Host aborted the gesture.
    Cancel,
}

/// Where drag moves are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveSource {
    /// Raw pointer moves in client coordinates.
    #[default]
    Pointer,
    /// Host crosshair notifications, already in plot-area coordinates.
    Crosshair,
}

impl MoveSource {
    fn kind(self) -> PointerKind {
        match self {
            Self::Pointer => PointerKind::Move,
            Self::Crosshair => PointerKind::CrosshairMove,
        }
    }
}

/// Gesture adapter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureState {
    /// Not connected to a host.
    #[default]
    Disconnected,
    /// Listening for a pointer press.
    Idle,
    /// Between a press and its release or cancellation.
    Dragging,
}

/// Receiver of the drag lifecycle.
///
/// Positions are in plot-area coordinates: `(0, 0)` is the plot origin, with
/// the left panel already subtracted.
pub trait GestureSink {
    /// A press started a drag.
    fn on_drag_start(&mut self, position: ScreenPoint);
    /// The pointer moved during a drag.
    fn on_drag(&mut self, position: ScreenPoint);
    /// The drag ended normally.
    fn on_drag_complete(&mut self);
    /// The drag was aborted; nothing should be committed.
    fn on_drag_cancel(&mut self);
}

/// One recorded [`GestureSink`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureCall {
    /// [`GestureSink::on_drag_start`].
    Start(ScreenPoint),
    /// [`GestureSink::on_drag`].
    Move(ScreenPoint),
    /// [`GestureSink::on_drag_complete`].
    Complete,
    /// [`GestureSink::on_drag_cancel`].
    Cancel,
}

/// Records calls so they can be applied after the host borrow ends.
impl GestureSink for Vec<GestureCall> {
    fn on_drag_start(&mut self, position: ScreenPoint) {
        self.push(GestureCall::Start(position));
    }

    fn on_drag(&mut self, position: ScreenPoint) {
        self.push(GestureCall::Move(position));
    }

    fn on_drag_complete(&mut self) {
        self.push(GestureCall::Complete);
    }

    fn on_drag_cancel(&mut self) {
        self.push(GestureCall::Cancel);
    }
}

/// Converts host pointer events into [`GestureSink`] calls.
#[derive(Debug, Clone, Default)]
pub struct DragHandler {
    state: GestureState,
    move_source: MoveSource,
}

impl DragHandler {
    /// Create a disconnected handler reading moves from `move_source`.
    pub fn new(move_source: MoveSource) -> Self {
        Self {
            state: GestureState::Disconnected,
            move_source,
        }
    }

    /// Current state.
    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Check whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.state == GestureState::Dragging
    }

    /// Register the press, release and cancel listeners on the host.
    pub fn connect(&mut self, host: &mut (impl PointerHost + ?Sized)) {
        if self.state != GestureState::Disconnected {
            return;
        }
        host.listen(PointerKind::Down);
        host.listen(PointerKind::Up);
        host.listen(PointerKind::Cancel);
        self.state = GestureState::Idle;
    }

    /// Remove every listener this handler registered. Safe from any state.
    ///
    /// A drag in progress is dropped without notifying the sink.
    pub fn disconnect(&mut self, host: &mut (impl PointerHost + ?Sized)) {
        if self.state == GestureState::Disconnected {
            return;
        }
        host.unlisten(PointerKind::Down);
        host.unlisten(PointerKind::Up);
        host.unlisten(PointerKind::Cancel);
        if self.state == GestureState::Dragging {
            host.unlisten(self.move_source.kind());
        }
        self.state = GestureState::Disconnected;
    }

    /// Feed one host event through the state machine.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        host: &mut (impl PointerHost + ?Sized),
        sink: &mut (impl GestureSink + ?Sized),
    ) {
        match (self.state, event) {
            (GestureState::Idle, PointerEvent::Down(client)) => {
                self.state = GestureState::Dragging;
                host.listen(self.move_source.kind());
                sink.on_drag_start(local_position(&*host, client));
            }
            (GestureState::Dragging, PointerEvent::Move(client))
                if self.move_source == MoveSource::Pointer =>
            {
                sink.on_drag(local_position(&*host, client));
            }
            (GestureState::Dragging, PointerEvent::CrosshairMove(Some(position)))
                if self.move_source == MoveSource::Crosshair =>
            {
                sink.on_drag(position);
            }
            (GestureState::Dragging, PointerEvent::Up) => {
                self.state = GestureState::Idle;
                host.unlisten(self.move_source.kind());
                sink.on_drag_complete();
            }
            (GestureState::Dragging, PointerEvent::Cancel) => {
                self.state = GestureState::Idle;
                host.unlisten(self.move_source.kind());
                sink.on_drag_cancel();
            }
            (state, event) => {
                tracing::trace!(?state, ?event, "pointer event ignored");
            }
        }
    }
}

fn local_position(host: &(impl PointerHost + ?Sized), client: ScreenPoint) -> ScreenPoint {
    let origin = host.surface_origin();
    ScreenPoint::new(
        client.x - origin.x - host.left_panel_width(),
        client.y - origin.y,
    )
}
