use gpui::{
    App, BorderStyle, Bounds, ContentMask, Corners, Edges, PathBuilder, Pixels, SharedString,
    TextRun, Window, font, point, px, quad,
};

use crate::geom::{ScreenPoint, ScreenRect};
use crate::render::{Color, LineSegment, LineStyle, RenderCommand, TextStyle};

use super::frame::PayoffFrame;
use super::text::SCALE_FONT;

pub(crate) fn paint_frame(frame: &PayoffFrame, window: &mut Window, cx: &mut App) {
    let offset = frame.offset;
    let mut clip_stack: Vec<ContentMask<Pixels>> = Vec::new();
    for command in frame.render.commands() {
        match command {
            RenderCommand::ClipRect(rect) => {
                clip_stack.push(ContentMask {
                    bounds: to_bounds(*rect, offset),
                });
            }
            RenderCommand::ClipEnd => {
                clip_stack.pop();
            }
            RenderCommand::LineSegments { segments, style } => {
                with_clip(window, &clip_stack, |window| {
                    paint_lines(window, segments, *style, offset);
                });
            }
            RenderCommand::Disc {
                center,
                radius,
                fill,
            } => {
                with_clip(window, &clip_stack, |window| {
                    paint_circle(window, *center, *radius, *fill, None, offset);
                });
            }
            RenderCommand::Ring {
                center,
                radius,
                stroke,
            } => {
                with_clip(window, &clip_stack, |window| {
                    paint_circle(
                        window,
                        *center,
                        *radius,
                        Color::TRANSPARENT,
                        Some(*stroke),
                        offset,
                    );
                });
            }
            RenderCommand::Fill { polygons, color } => {
                with_clip(window, &clip_stack, |window| {
                    paint_fill(window, polygons, *color, offset);
                });
            }
            RenderCommand::Text {
                position,
                text,
                style,
            } => {
                with_clip(window, &clip_stack, |window| {
                    paint_text(window, cx, *position, text, style, offset);
                });
            }
        }
    }
}

fn paint_lines(window: &mut Window, segments: &[LineSegment], style: LineStyle, offset: ScreenPoint) {
    if segments.is_empty() {
        return;
    }
    let width = style.width.max(0.5);
    let mut builder = PathBuilder::stroke(px(width));
    for segment in segments {
        builder.move_to(point(
            px(segment.start.x + offset.x),
            px(segment.start.y + offset.y),
        ));
        builder.line_to(point(px(segment.end.x + offset.x), px(segment.end.y + offset.y)));
    }
    if let Ok(path) = builder.build() {
        window.paint_path(path, to_rgba(style.color));
    }
}

fn paint_fill(window: &mut Window, polygons: &[Vec<ScreenPoint>], color: Color, offset: ScreenPoint) {
    for polygon in polygons {
        let Some((first, rest)) = polygon.split_first() else {
            continue;
        };
        let mut builder = PathBuilder::fill();
        builder.move_to(point(px(first.x + offset.x), px(first.y + offset.y)));
        for vertex in rest {
            builder.line_to(point(px(vertex.x + offset.x), px(vertex.y + offset.y)));
        }
        builder.close();
        if let Ok(path) = builder.build() {
            window.paint_path(path, to_rgba(color));
        }
    }
}

fn paint_text(
    window: &mut Window,
    cx: &mut App,
    position: ScreenPoint,
    text: &str,
    style: &TextStyle,
    offset: ScreenPoint,
) {
    if text.is_empty() {
        return;
    }
    let run = TextRun {
        len: text.len(),
        font: font(SCALE_FONT),
        color: to_hsla(style.color),
        background_color: None,
        underline: None,
        strikethrough: None,
    };
    let shaped = window.text_system().shape_line(
        SharedString::from(text.to_string()),
        px(style.size),
        &[run],
        None,
    );
    let line_height = shaped.ascent + shaped.descent;
    let origin = point(px(position.x + offset.x), px(position.y + offset.y));
    if let Err(err) = shaped.paint(origin, line_height, window, cx) {
        tracing::debug!(%err, text, "value scale label not painted");
    }
}

fn paint_circle(
    window: &mut Window,
    center: ScreenPoint,
    radius: f32,
    fill: Color,
    stroke: Option<LineStyle>,
    offset: ScreenPoint,
) {
    let radius = radius.max(1.0);
    let x = center.x + offset.x;
    let y = center.y + offset.y;
    let bounds = Bounds::from_corners(
        point(px(x - radius), px(y - radius)),
        point(px(x + radius), px(y + radius)),
    );
    let (border_width, border_color) = match stroke {
        Some(stroke) => (stroke.width, stroke.color),
        None => (0.0, fill),
    };
    window.paint_quad(quad(
        bounds,
        Corners::all(px(radius)),
        to_rgba(fill),
        Edges::all(px(border_width)),
        to_rgba(border_color),
        BorderStyle::default(),
    ));
}

fn to_rgba(color: Color) -> gpui::Rgba {
    gpui::Rgba {
        r: color.r,
        g: color.g,
        b: color.b,
        a: color.a,
    }
}

pub(crate) fn to_hsla(color: Color) -> gpui::Hsla {
    gpui::Hsla::from(to_rgba(color))
}

fn to_bounds(rect: ScreenRect, offset: ScreenPoint) -> Bounds<Pixels> {
    Bounds::from_corners(
        point(px(rect.min.x + offset.x), px(rect.min.y + offset.y)),
        point(px(rect.max.x + offset.x), px(rect.max.y + offset.y)),
    )
}

fn with_clip(window: &mut Window, stack: &[ContentMask<Pixels>], f: impl FnOnce(&mut Window)) {
    if let Some(mask) = stack.last() {
        window.with_content_mask(Some(mask.clone()), f);
    } else {
        f(window);
    }
}
