use gpui::{Bounds, Pixels};

use crate::axis::{AxisLayout, TextMeasurer};
use crate::geom::{ScreenPoint, ScreenRect};
use crate::primitive::SeriesPrimitive;
use crate::render::{
    Color, LineSegment, LineStyle, RenderCommand, RenderList, TextStyle, build_line_segments,
    build_signed_fill, build_signed_segments,
};
use crate::style::Theme;
use crate::transform::Transform;
use crate::view::{Range, Viewport};

use super::config::PayoffViewConfig;
use super::state::PayoffUiState;

const TICK_LENGTH: f32 = 4.0;
const LABEL_PADDING: f32 = 4.0;
const LABEL_GAP: f32 = 2.0;

/// Draw commands in plot-area coordinates plus the window offset of that area.
#[derive(Debug, Clone)]
pub(crate) struct PayoffFrame {
    pub(crate) render: RenderList,
    pub(crate) offset: ScreenPoint,
}

pub(crate) fn build_frame(
    state: &mut PayoffUiState,
    config: &PayoffViewConfig,
    theme: &Theme,
    bounds: Bounds<Pixels>,
    measurer: &impl TextMeasurer,
) -> PayoffFrame {
    let mut render = RenderList::new();

    let origin = ScreenPoint::new(f32::from(bounds.origin.x), f32::from(bounds.origin.y));
    let full_width = f32::from(bounds.size.width);
    let full_height = f32::from(bounds.size.height);
    let left = config.left_scale_width.clamp(0.0, (full_width - 1.0).max(0.0));
    let offset = ScreenPoint::new(origin.x + left, origin.y);

    state.surface.origin = origin;
    state.surface.left_panel_width = left;

    let plot_width = full_width - left;
    if plot_width <= 1.0 || full_height <= 1.0 {
        state.surface.transform = None;
        return PayoffFrame { render, offset };
    }

    let plot_rect = ScreenRect::new(
        ScreenPoint::new(0.0, 0.0),
        ScreenPoint::new(plot_width, full_height),
    );
    let viewport = state.manual_view.unwrap_or_else(|| fit_view(state, config));
    state.surface.transform = Transform::new(viewport, plot_rect);
    state.overlay.update_all_views(&state.surface);

    let Some(transform) = state.surface.transform.as_ref() else {
        return PayoffFrame { render, offset };
    };

    render.push(RenderCommand::LineSegments {
        segments: vec![LineSegment::new(
            ScreenPoint::new(0.0, 0.0),
            ScreenPoint::new(0.0, full_height),
        )],
        style: LineStyle {
            color: theme.axis,
            width: 1.0,
        },
    });

    let layout = AxisLayout::build(
        transform.viewport().y,
        full_height,
        config.scale_label_size,
        measurer,
    );
    push_value_scale(&mut render, &layout, transform, left, full_height, theme, config, measurer);

    render.push(RenderCommand::ClipRect(plot_rect));
    let (mut fill_above, mut fill_below) = (Vec::new(), Vec::new());
    build_signed_fill(&state.curve, transform, &mut fill_above, &mut fill_below);
    push_fill(&mut render, fill_above, theme.profit_fill);
    push_fill(&mut render, fill_below, theme.loss_fill);

    let zero = transform.y_to_screen(0.0);
    if zero.is_finite() {
        render.push(RenderCommand::LineSegments {
            segments: vec![LineSegment::new(
                ScreenPoint::new(0.0, zero),
                ScreenPoint::new(plot_width, zero),
            )],
            style: LineStyle {
                color: theme.axis,
                width: 1.0,
            },
        });
    }

    let (mut above, mut below) = (Vec::new(), Vec::new());
    build_signed_segments(&state.curve, transform, plot_rect, &mut above, &mut below);
    push_lines(&mut render, above, theme.profit_line, config.line_width);
    push_lines(&mut render, below, theme.loss_line, config.line_width);

    if let Some(preview) = state.preview.as_ref() {
        let mut segments = Vec::new();
        build_line_segments(preview, transform, plot_rect, &mut segments);
        push_lines(&mut render, segments, theme.preview_line, config.line_width);
    }

    state.overlay.draw(&mut render);
    render.push(RenderCommand::ClipEnd);

    PayoffFrame { render, offset }
}

fn fit_view(state: &PayoffUiState, config: &PayoffViewConfig) -> Viewport {
    let overlay = state.overlay.points();
    Viewport::fit_points(state.curve.iter().chain(overlay))
        .map(|viewport| viewport.padded(config.padding_frac, config.min_padding))
        .unwrap_or_else(|| Viewport::new(Range::new(0.0, 1.0), Range::new(0.0, 1.0)))
}

/// Tick marks and labels right-aligned in the panel left of the plot area.
#[allow(clippy::too_many_arguments)]
fn push_value_scale(
    render: &mut RenderList,
    layout: &AxisLayout,
    transform: &Transform,
    panel_width: f32,
    height: f32,
    theme: &Theme,
    config: &PayoffViewConfig,
    measurer: &impl TextMeasurer,
) {
    let mut ticks = Vec::new();
    let mut last_label_top = f32::INFINITY;
    for tick in &layout.ticks {
        let y = transform.y_to_screen(tick.value);
        if !y.is_finite() || y < 0.0 || y > height {
            continue;
        }
        ticks.push(LineSegment::new(
            ScreenPoint::new(-TICK_LENGTH, y),
            ScreenPoint::new(0.0, y),
        ));

        let size = measurer.measure(&tick.label, config.scale_label_size);
        let x = (-TICK_LENGTH - LABEL_PADDING - size.0).max(-panel_width);
        let top = (y - size.1 * 0.5).clamp(0.0, (height - size.1).max(0.0));
        if top + size.1 > last_label_top - LABEL_GAP {
            continue;
        }
        render.push(RenderCommand::Text {
            position: ScreenPoint::new(x, top),
            text: tick.label.clone(),
            style: TextStyle {
                color: theme.scale_text,
                size: config.scale_label_size,
            },
        });
        last_label_top = top;
    }
    push_lines(render, ticks, theme.axis, 1.0);
}

fn push_fill(render: &mut RenderList, polygons: Vec<Vec<ScreenPoint>>, color: Color) {
    if polygons.is_empty() {
        return;
    }
    render.push(RenderCommand::Fill { polygons, color });
}

fn push_lines(
    render: &mut RenderList,
    segments: Vec<LineSegment>,
    color: Color,
    width: f32,
) {
    if segments.is_empty() {
        return;
    }
    render.push(RenderCommand::LineSegments {
        segments,
        style: LineStyle { color, width },
    });
}

#[cfg(test)]
mod tests {
    use gpui::{point, px, size};

    use super::*;
    use crate::geom::LogicalPoint;

    struct FixedWidth;

    impl TextMeasurer for FixedWidth {
        fn measure(&self, text: &str, size: f32) -> (f32, f32) {
            (text.chars().count() as f32 * size * 0.5, size + 2.0)
        }
    }

    fn frame_for(curve: Vec<LogicalPoint>) -> PayoffFrame {
        let mut state = PayoffUiState {
            curve,
            manual_view: Some(Viewport::new(Range::new(0.0, 4.0), Range::new(-2.0, 2.0))),
            ..PayoffUiState::default()
        };
        let bounds = Bounds::new(point(px(0.0), px(0.0)), size(px(256.0), px(200.0)));
        let theme = Theme::default();
        build_frame(&mut state, &PayoffViewConfig::default(), &theme, bounds, &FixedWidth)
    }

    #[test]
    fn value_scale_is_labelled_in_left_panel() {
        let frame = frame_for(Vec::new());
        let labels: Vec<_> = frame
            .render
            .commands()
            .iter()
            .filter_map(|command| match command {
                RenderCommand::Text { position, text, .. } => Some((text.as_str(), *position)),
                _ => None,
            })
            .collect();
        let texts: Vec<_> = labels.iter().map(|(text, _)| *text).collect();
        assert_eq!(texts, ["-2", "-1", "0", "1", "2"]);
        assert!(labels.iter().all(|(_, position)| position.x < 0.0 && position.x >= -56.0));
        assert_eq!(labels[2].1, ScreenPoint::new(-13.5, 93.5));
        assert_eq!(frame.offset, ScreenPoint::new(56.0, 0.0));
    }

    #[test]
    fn payoff_area_is_filled_by_sign() {
        let theme = Theme::default();
        let frame = frame_for(vec![
            LogicalPoint::new(0, 1.0),
            LogicalPoint::new(2, -1.0),
            LogicalPoint::new(4, -1.0),
        ]);
        let commands = frame.render.commands();
        let clip = commands
            .iter()
            .position(|command| matches!(command, RenderCommand::ClipRect(_)))
            .expect("plot clip");
        let fills: Vec<_> = commands
            .iter()
            .enumerate()
            .filter_map(|(index, command)| match command {
                RenderCommand::Fill { polygons, color } => Some((index, polygons.len(), *color)),
                _ => None,
            })
            .collect();
        assert_eq!(fills.len(), 2);
        assert!(fills.iter().all(|(index, count, _)| *index > clip && *count == 1));
        assert_eq!(fills[0].2, theme.profit_fill);
        assert_eq!(fills[1].2, theme.loss_fill);
        assert_eq!(theme.profit_fill.a, 0.1);
    }
}
