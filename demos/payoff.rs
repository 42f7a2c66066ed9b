use std::cell::Cell;
use std::rc::Rc;

use gpui::{AppContext, Application, Bounds, WindowBounds, WindowOptions, px, size};
use tracing_subscriber::EnvFilter;

use gpui_payoff::{GpuiPayoffView, OwnerId, PayoffHandle, PayoffStrategy};

fn publish(handle: &PayoffHandle, strategy: &PayoffStrategy) {
    let (points, candidates) = strategy.draggable_points();
    handle.set_curve(strategy.curve());
    handle.set_points(points, candidates);
    handle.hide_preview();
}

fn wire(handle: PayoffHandle) {
    let strategy = Rc::new(Cell::new(PayoffStrategy::default()));
    publish(&handle, &strategy.get());

    let events = handle.events();
    let owner = OwnerId::next();
    {
        let handle = handle.clone();
        let strategy = Rc::clone(&strategy);
        events.moved.subscribe(
            owner,
            move |moved| match moved.candidate {
                Some(next) => handle.show_preview(strategy.get().preview(next.point)),
                None => handle.hide_preview(),
            },
            false,
        );
    }
    {
        let handle = handle.clone();
        events.cancel.subscribe(owner, move |_| handle.hide_preview(), false);
    }
    events.complete.subscribe(
        owner,
        move |done| {
            let Some(&new_break) = done.points.first() else {
                return;
            };
            let next = strategy.get().with_break(new_break);
            tracing::info!(?next, "strategy updated");
            strategy.set(next);
            publish(&handle, &next);
        },
        false,
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    Application::new().run(|cx| {
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                None,
                size(px(720.0), px(480.0)),
                cx,
            ))),
            ..Default::default()
        };

        cx.open_window(options, |_window, cx| {
            let view = GpuiPayoffView::new();
            wire(view.handle());
            cx.new(|_| view)
        })
        .unwrap();
    });
}
