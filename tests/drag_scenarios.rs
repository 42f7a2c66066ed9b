use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use gpui_payoff::{
    ChartHost, CoordinateSpace, HandleScroll, LogicalPoint, MoveSource, OwnerId, PayoffStrategy,
    PointerEvent, PointerHost, PointerKind, Range, RenderCommand, RenderList, ScreenPoint,
    ScreenRect, ScrollControl, SeriesPrimitive, Transform, Viewport, DraggablePointsPrimitive,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// In-memory host: time 0..20 and value -10..10 over a 200x200 plot area.
struct Chart {
    transform: Option<Transform>,
    origin: ScreenPoint,
    left_panel: f32,
    listening: HashSet<PointerKind>,
    scroll: HandleScroll,
    updates: usize,
}

impl Chart {
    fn new() -> Self {
        let viewport = Viewport::new(Range::new(0.0, 20.0), Range::new(-10.0, 10.0));
        let rect = ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(200.0, 200.0));
        Self {
            transform: Transform::new(viewport, rect),
            origin: ScreenPoint::new(0.0, 0.0),
            left_panel: 0.0,
            listening: HashSet::new(),
            scroll: HandleScroll::ENABLED,
            updates: 0,
        }
    }

    /// Client position of a plot-local pixel.
    fn client(&self, x: f32, y: f32) -> ScreenPoint {
        ScreenPoint::new(x + self.origin.x + self.left_panel, y + self.origin.y)
    }

    fn deliver(&mut self, primitive: &mut DraggablePointsPrimitive, event: PointerEvent) {
        let kind = match event {
            PointerEvent::Down(_) => PointerKind::Down,
            PointerEvent::Move(_) => PointerKind::Move,
            PointerEvent::CrosshairMove(_) => PointerKind::CrosshairMove,
            PointerEvent::Up => PointerKind::Up,
            PointerEvent::Cancel => PointerKind::Cancel,
        };
        if self.listening.contains(&kind) {
            primitive.handle_pointer(event, self);
        }
    }
}

impl CoordinateSpace for Chart {
    fn time_to_x(&self, time: i64) -> Option<f32> {
        self.transform.as_ref()?.time_to_x(time)
    }

    fn value_to_y(&self, value: f64) -> Option<f32> {
        self.transform.as_ref()?.value_to_y(value)
    }
}

impl ScrollControl for Chart {
    fn apply_scroll_options(&mut self, options: HandleScroll) {
        self.scroll = options;
    }
}

impl PointerHost for Chart {
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
        self.left_panel
    }
}

impl ChartHost for Chart {
    fn request_update(&mut self) {
        self.updates += 1;
    }
}

fn strategy_overlay(chart: &mut Chart, strategy: &PayoffStrategy) -> DraggablePointsPrimitive {
    let mut primitive = DraggablePointsPrimitive::new();
    let (points, candidates) = strategy.draggable_points();
    primitive.set_data(points, candidates, chart);
    primitive.attached(chart);
    primitive
}

#[test]
fn dragging_the_break_reprices_the_strategy() {
    init_tracing();
    let mut chart = Chart::new();
    let strategy = PayoffStrategy::default();
    let mut primitive = strategy_overlay(&mut chart, &strategy);

    let previews = Rc::new(RefCell::new(Vec::new()));
    let committed = Rc::new(RefCell::new(None));
    let owner = OwnerId::next();
    {
        let previews = Rc::clone(&previews);
        primitive.subscribe_drag_move(owner, move |moved| {
            if let Some(next) = moved.candidate {
                previews.borrow_mut().push(strategy.preview(next.point));
            }
        });
    }
    {
        let committed = Rc::clone(&committed);
        primitive.subscribe_drag_complete(owner, move |done| {
            *committed.borrow_mut() = done.points.first().copied();
        });
    }

    // The break at (10, -5) sits at (100, 150).
    let down = chart.client(100.0, 150.0);
    chart.deliver(&mut primitive, PointerEvent::Down(down));
    assert_eq!(chart.scroll, HandleScroll::DISABLED);
    let over_twelve = chart.client(118.0, 152.0);
    chart.deliver(&mut primitive, PointerEvent::Move(over_twelve));
    chart.deliver(&mut primitive, PointerEvent::Up);

    assert_eq!(chart.scroll, HandleScroll::ENABLED);
    let new_break = committed.borrow().expect("drag completed");
    assert_eq!(new_break, LogicalPoint::new(12, -5.0));
    let preview = previews.borrow();
    assert_eq!(preview.len(), 1);
    assert_eq!(preview[0][11], LogicalPoint::new(12, -5.0));

    let next = strategy.with_break(new_break);
    assert_eq!(next.break_point, LogicalPoint::new(12, -2.5));
    let (points, candidates) = next.draggable_points();
    primitive.set_data(points, candidates, &mut chart);
    assert_eq!(primitive.model().points()[0].screen, ScreenPoint::new(120.0, 125.0));
    assert!(chart.updates >= 3);
}

#[test]
fn panel_and_origin_offsets_are_removed() {
    let mut chart = Chart::new();
    chart.origin = ScreenPoint::new(50.0, 20.0);
    chart.left_panel = 30.0;
    let mut primitive = strategy_overlay(&mut chart, &PayoffStrategy::default());

    // Raw local coordinates would miss the point entirely.
    chart.deliver(&mut primitive, PointerEvent::Down(ScreenPoint::new(100.0, 150.0)));
    assert!(!primitive.is_dragging());
    chart.deliver(&mut primitive, PointerEvent::Down(chart.client(104.0, 146.0)));
    assert!(primitive.is_dragging());
    chart.deliver(&mut primitive, PointerEvent::Move(chart.client(31.0, 150.0)));
    chart.deliver(&mut primitive, PointerEvent::Up);
    assert_eq!(primitive.points(), [LogicalPoint::new(3, -5.0)]);
}

#[test]
fn release_without_moving_keeps_the_point() {
    let mut chart = Chart::new();
    let mut primitive = strategy_overlay(&mut chart, &PayoffStrategy::default());
    chart.deliver(&mut primitive, PointerEvent::Down(chart.client(100.0, 150.0)));
    chart.deliver(&mut primitive, PointerEvent::Up);
    assert_eq!(primitive.points(), [LogicalPoint::new(10, -5.0)]);
}

#[test]
fn empty_candidates_commit_nothing() {
    let mut chart = Chart::new();
    let mut primitive = DraggablePointsPrimitive::new();
    primitive.set_data(vec![LogicalPoint::new(10, -5.0)], Vec::new(), &mut chart);
    primitive.attached(&mut chart);

    chart.deliver(&mut primitive, PointerEvent::Down(chart.client(100.0, 150.0)));
    chart.deliver(&mut primitive, PointerEvent::Move(chart.client(40.0, 40.0)));
    assert!(primitive.model().next_possible().is_none());
    chart.deliver(&mut primitive, PointerEvent::Up);
    assert_eq!(primitive.points(), [LogicalPoint::new(10, -5.0)]);
}

#[test]
fn cancelled_drag_leaves_points_untouched() {
    let mut chart = Chart::new();
    let mut primitive = strategy_overlay(&mut chart, &PayoffStrategy::default());
    let completions = Rc::new(RefCell::new(0));
    {
        let completions = Rc::clone(&completions);
        primitive.subscribe_drag_complete(OwnerId::ANONYMOUS, move |_| {
            *completions.borrow_mut() += 1;
        });
    }
    chart.deliver(&mut primitive, PointerEvent::Down(chart.client(100.0, 150.0)));
    chart.deliver(&mut primitive, PointerEvent::Move(chart.client(180.0, 150.0)));
    chart.deliver(&mut primitive, PointerEvent::Cancel);
    chart.deliver(&mut primitive, PointerEvent::Up);

    assert_eq!(*completions.borrow(), 0);
    assert_eq!(primitive.points(), [LogicalPoint::new(10, -5.0)]);
    assert_eq!(chart.scroll, HandleScroll::ENABLED);
    assert!(!chart.listening.contains(&PointerKind::Move));
}

#[test]
fn crosshair_moves_drive_the_snap() {
    let mut chart = Chart::new();
    chart.left_panel = 40.0;
    let mut primitive = DraggablePointsPrimitive::new().with_move_source(MoveSource::Crosshair);
    let (points, candidates) = PayoffStrategy::default().draggable_points();
    primitive.set_data(points, candidates, &mut chart);
    primitive.attached(&mut chart);

    chart.deliver(&mut primitive, PointerEvent::Down(chart.client(100.0, 150.0)));
    assert!(chart.listening.contains(&PointerKind::CrosshairMove));
    chart.deliver(&mut primitive, PointerEvent::Move(chart.client(180.0, 150.0)));
    chart.deliver(
        &mut primitive,
        PointerEvent::CrosshairMove(Some(ScreenPoint::new(79.0, 150.0))),
    );
    chart.deliver(&mut primitive, PointerEvent::Up);
    assert_eq!(primitive.points(), [LogicalPoint::new(8, -5.0)]);
}

#[test]
fn listeners_survive_panics_and_self_removal() {
    let mut chart = Chart::new();
    let mut primitive = strategy_overlay(&mut chart, &PayoffStrategy::default());
    let events = primitive.events();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let owner = OwnerId::next();

    primitive.subscribe_drag_start(owner, |_| panic!("listener failure"));
    let id = Rc::new(RefCell::new(None));
    {
        let seen = Rc::clone(&seen);
        let events = Rc::clone(&events);
        let listener_id = Rc::clone(&id);
        let subscribed = primitive.subscribe_drag_start(owner, move |start| {
            seen.borrow_mut().push(start.index);
            if let Some(id) = *listener_id.borrow() {
                events.start.unsubscribe(owner, id);
            }
        });
        *id.borrow_mut() = Some(subscribed);
    }

    for _ in 0..2 {
        chart.deliver(&mut primitive, PointerEvent::Down(chart.client(100.0, 150.0)));
        chart.deliver(&mut primitive, PointerEvent::Up);
    }
    assert_eq!(*seen.borrow(), [0]);
    assert_eq!(primitive.unsubscribe_all(owner), 1);
}

#[test]
fn unprojectable_points_are_inert() {
    let mut chart = Chart::new();
    chart.transform = None;
    let mut primitive = strategy_overlay(&mut chart, &PayoffStrategy::default());

    assert!(primitive.model().points()[0].screen.x.is_nan());
    assert!(primitive.hit_test(100.0, 150.0).is_none());
    chart.deliver(&mut primitive, PointerEvent::Down(chart.client(100.0, 150.0)));
    assert!(!primitive.is_dragging());
    let mut list = RenderList::new();
    primitive.draw(&mut list);
    assert!(list.commands().is_empty());
}

#[test]
fn redraw_follows_the_view_transform() {
    let mut chart = Chart::new();
    let mut primitive = strategy_overlay(&mut chart, &PayoffStrategy::default());
    let viewport = Viewport::new(Range::new(5.0, 15.0), Range::new(-10.0, 10.0));
    let rect = ScreenRect::new(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(200.0, 200.0));
    chart.transform = Transform::new(viewport, rect);
    primitive.update_all_views(&chart);

    let mut list = RenderList::new();
    primitive.draw(&mut list);
    assert!(matches!(
        list.commands(),
        [RenderCommand::Disc { center, .. }] if *center == ScreenPoint::new(100.0, 150.0)
    ));
    assert!(primitive.hit_test(100.0, 150.0).is_some());
    primitive.detached(&mut chart);
    assert!(chart.listening.is_empty());
}
