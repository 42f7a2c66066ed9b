use std::cell::RefCell;
use std::rc::Rc;

use gpui::prelude::*;
use gpui::{
    CursorStyle, MouseButton, MouseDownEvent, MouseMoveEvent, MouseUpEvent, Pixels, Point, Window,
    canvas, div,
};

use crate::geom::{LogicalPoint, ScreenPoint};
use crate::gesture::PointerEvent;
use crate::host::PointerKind;
use crate::interaction::{allowed_pan, pan_viewport};
use crate::primitive::{DragEvents, DraggablePointsPrimitive, SeriesPrimitive};
use crate::style::Theme;

use super::config::PayoffViewConfig;
use super::frame::build_frame;
use super::paint::{paint_frame, to_hsla};
use super::state::{PayoffUiState, PayoffUpdate};
use super::text::GpuiTextMeasurer;

/// A GPUI view that renders a payoff curve with draggable points.
///
/// The curve is colored by sign, a translucent preview curve can be shown
/// while a point is dragged, and pressing outside a point pans the chart.
pub struct GpuiPayoffView {
    state: Rc<RefCell<PayoffUiState>>,
    pending: Rc<RefCell<Vec<PayoffUpdate>>>,
    config: PayoffViewConfig,
    theme: Theme,
}

impl GpuiPayoffView {
    /// Create a view with the default theme and configuration.
    pub fn new() -> Self {
        Self::with_config(Theme::default(), PayoffViewConfig::default())
    }

    /// Create a view with a custom theme and configuration.
    pub fn with_config(theme: Theme, config: PayoffViewConfig) -> Self {
        let mut state = PayoffUiState {
            overlay: DraggablePointsPrimitive::with_style(theme.points.clone()),
            ..PayoffUiState::default()
        };
        state.surface.left_panel_width = config.left_scale_width;
        state.overlay.attached(&mut state.surface);
        Self {
            state: Rc::new(RefCell::new(state)),
            pending: Rc::new(RefCell::new(Vec::new())),
            config,
            theme,
        }
    }

    /// Get a handle for updating the displayed data and subscribing to drags.
    ///
    /// Handle updates are applied when the view next paints. Inside drag
    /// callbacks that repaint is already scheduled; elsewhere call
    /// [`refresh`](Self::refresh) through the view entity, for example
    /// `view.update(cx, |view, cx| view.refresh(cx))`.
    pub fn handle(&self) -> PayoffHandle {
        PayoffHandle {
            pending: Rc::clone(&self.pending),
            events: self.state.borrow().overlay.events(),
        }
    }

    /// Schedule a repaint if handle updates are waiting.
    pub fn refresh(&mut self, cx: &mut Context<Self>) {
        if !self.pending.borrow().is_empty() {
            cx.notify();
        }
    }

    fn on_mouse_down(&mut self, ev: &MouseDownEvent, cx: &mut Context<Self>) {
        let pos = screen_point(ev.position);
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        if state.surface.is_listening(PointerKind::Down) {
            state
                .overlay
                .handle_pointer(PointerEvent::Down(pos), &mut state.surface);
        }
        state.pan_last = Some(pos);
        flush(state, cx);
    }

    fn on_mouse_move(&mut self, ev: &MouseMoveEvent, cx: &mut Context<Self>) {
        let pos = screen_point(ev.position);
        let mut state = self.state.borrow_mut();
        let state = &mut *state;

        if state.surface.is_listening(PointerKind::Move) {
            state
                .overlay
                .handle_pointer(PointerEvent::Move(pos), &mut state.surface);
        }

        if let Some(last) = state.pan_last.filter(|_| ev.pressed_button == Some(MouseButton::Left)) {
            let delta = ScreenPoint::new(pos.x - last.x, pos.y - last.y);
            state.pan_last = Some(pos);
            if let Some(delta) = allowed_pan(state.surface.scroll, delta) {
                pan(state, delta);
            }
        } else if !state.overlay.is_dragging() {
            let local = state.surface.to_local(pos);
            let hovered = state.overlay.hit_test(local.x, local.y).is_some();
            if hovered != state.point_hovered {
                state.point_hovered = hovered;
                state.surface.needs_update = true;
            }
        }
        flush(state, cx);
    }

    fn on_mouse_up(&mut self, _ev: &MouseUpEvent, cx: &mut Context<Self>) {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        state.pan_last = None;
        if state.surface.is_listening(PointerKind::Up) {
            state
                .overlay
                .handle_pointer(PointerEvent::Up, &mut state.surface);
        }
        flush(state, cx);
    }

    fn on_mouse_up_out(&mut self, _ev: &MouseUpEvent, cx: &mut Context<Self>) {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        state.pan_last = None;
        if state.surface.is_listening(PointerKind::Cancel) {
            state
                .overlay
                .handle_pointer(PointerEvent::Cancel, &mut state.surface);
        }
        flush(state, cx);
    }

    fn cursor(&self) -> CursorStyle {
        let state = self.state.borrow();
        if state.overlay.is_dragging() {
            CursorStyle::ClosedHand
        } else if state.point_hovered {
            cursor_style(&state.overlay.style().cursor_style)
        } else {
            CursorStyle::Arrow
        }
    }
}

impl Default for GpuiPayoffView {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for GpuiPayoffView {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.try_borrow_mut() {
            let state = &mut *state;
            state.overlay.detached(&mut state.surface);
        }
    }
}

impl Render for GpuiPayoffView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let state = Rc::clone(&self.state);
        let pending = Rc::clone(&self.pending);
        let config = self.config.clone();
        let theme = self.theme.clone();
        let background = to_hsla(theme.background);

        div()
            .size_full()
            .bg(background)
            .cursor(self.cursor())
            .child(
                canvas(
                    move |bounds, window, _| {
                        let mut state = state.borrow_mut();
                        apply_pending(&mut state, &pending);
                        let measurer = GpuiTextMeasurer::new(window);
                        build_frame(&mut state, &config, &theme, bounds, &measurer)
                    },
                    move |_, frame, window, cx| {
                        paint_frame(&frame, window, cx);
                    },
                )
                .size_full(),
            )
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_down(ev, cx);
                }),
            )
            .on_mouse_move(cx.listener(|this, ev, _, cx| {
                this.on_mouse_move(ev, cx);
            }))
            .on_mouse_up(
                MouseButton::Left,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_up(ev, cx);
                }),
            )
            .on_mouse_up_out(
                MouseButton::Left,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_up_out(ev, cx);
                }),
            )
    }
}

/// A handle for feeding data into a `GpuiPayoffView` and observing drags.
///
/// Updates are queued and applied at the start of the next frame, so they may
/// be issued from inside drag callbacks. The handle does not schedule that
/// frame itself: outside drag callbacks, notify the view afterwards with
/// [`GpuiPayoffView::refresh`].
#[derive(Clone)]
pub struct PayoffHandle {
    pending: Rc<RefCell<Vec<PayoffUpdate>>>,
    events: Rc<DragEvents>,
}

impl PayoffHandle {
    /// Replace the payoff curve.
    pub fn set_curve(&self, curve: Vec<LogicalPoint>) {
        self.push(PayoffUpdate::Curve(curve));
    }

    /// Show the translucent preview curve.
    pub fn show_preview(&self, preview: Vec<LogicalPoint>) {
        self.push(PayoffUpdate::Preview(Some(preview)));
    }

    /// Hide the preview curve.
    pub fn hide_preview(&self) {
        self.push(PayoffUpdate::Preview(None));
    }

    /// Replace the draggable points and their snap candidates.
    pub fn set_points(&self, points: Vec<LogicalPoint>, candidates: Vec<LogicalPoint>) {
        self.push(PayoffUpdate::Points { points, candidates });
    }

    /// Drop any panned viewport and fit the data again.
    pub fn fit_view(&self) {
        self.push(PayoffUpdate::FitView);
    }

    /// Check whether updates are queued for the next frame.
    pub fn has_pending_updates(&self) -> bool {
        !self.pending.borrow().is_empty()
    }

    /// Drag notifications of the overlay.
    pub fn events(&self) -> Rc<DragEvents> {
        Rc::clone(&self.events)
    }

    fn push(&self, update: PayoffUpdate) {
        self.pending.borrow_mut().push(update);
    }
}

fn apply_pending(state: &mut PayoffUiState, pending: &RefCell<Vec<PayoffUpdate>>) {
    // Drag callbacks may queue more updates while these apply.
    let updates = std::mem::take(&mut *pending.borrow_mut());
    for update in updates {
        state.apply(update);
    }
}

fn pan(state: &mut PayoffUiState, delta: ScreenPoint) {
    let Some(transform) = state.surface.transform.clone() else {
        return;
    };
    let Some(next) = pan_viewport(transform.viewport(), delta, &transform) else {
        return;
    };
    state.manual_view = Some(next);
    state.surface.transform = crate::transform::Transform::new(next, transform.screen());
    state.overlay.update_all_views(&state.surface);
    state.surface.needs_update = true;
}

fn flush(state: &mut PayoffUiState, cx: &mut Context<GpuiPayoffView>) {
    if state.surface.needs_update {
        state.surface.needs_update = false;
        cx.notify();
    }
}

fn cursor_style(name: &str) -> CursorStyle {
    match name {
        "move" | "grab" => CursorStyle::OpenHand,
        "grabbing" => CursorStyle::ClosedHand,
        "pointer" => CursorStyle::PointingHand,
        "crosshair" => CursorStyle::Crosshair,
        _ => CursorStyle::Arrow,
    }
}

fn screen_point(point: Point<Pixels>) -> ScreenPoint {
    ScreenPoint::new(f32::from(point.x), f32::from(point.y))
}
