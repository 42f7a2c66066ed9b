//! Rendering primitives and clipping helpers.
//!
//! These types are backend-agnostic: the point overlay and the payoff curve
//! describe what to draw as a [`RenderList`], and a render backend (such as
//! the GPUI backend) paints it.

use thiserror::Error;

use crate::geom::{LogicalPoint, ScreenPoint, ScreenRect};
use crate::transform::Transform;

/// Errors raised when parsing colors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// The string does not start with `#`.
    #[error("color `{0}` is missing the leading `#`")]
    MissingHash(String),
    /// The string is neither `#rgb` nor `#rrggbb`.
    #[error("color `{0}` must have 3 or 6 hex digits")]
    BadLength(String),
    /// A digit is not hexadecimal.
    #[error("color `{0}` contains a non-hex digit")]
    BadDigit(String),
}

/// RGBA color.
///
/// All components are expected to be in the 0.0..=1.0 range.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color {
    /// Create a new color.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    /// Opaque blue.
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0, 1.0);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Build an opaque color from 8-bit channels.
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Parse `#rgb` or `#rrggbb`.
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let digits = hex
            .strip_prefix('#')
            .ok_or_else(|| ColorError::MissingHash(hex.to_string()))?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::BadDigit(hex.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ColorError::BadDigit(hex.to_string()))
        };
        match digits.len() {
            3 => {
                let r = channel(0..1)?;
                let g = channel(1..2)?;
                let b = channel(2..3)?;
                Ok(Self::from_rgb8(r * 17, g * 17, b * 17))
            }
            6 => Ok(Self::from_rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            _ => Err(ColorError::BadLength(hex.to_string())),
        }
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }
}

/// Line stroke styling.
///
/// The width is expressed in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineStyle {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
        }
    }
}

/// Text styling.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextStyle {
    /// Text color.
    pub color: Color,
    /// Font size in pixels.
    pub size: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            size: 12.0,
        }
    }
}

/// A line segment in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    /// Segment start.
    pub start: ScreenPoint,
    /// Segment end.
    pub end: ScreenPoint,
}

impl LineSegment {
    /// Create a new line segment.
    pub fn new(start: ScreenPoint, end: ScreenPoint) -> Self {
        Self { start, end }
    }
}

/// A single draw instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Start clipping to a rectangle.
    ClipRect(ScreenRect),
    /// End clipping.
    ClipEnd,
    /// Draw line segments.
    LineSegments {
        /// Segments to draw.
        segments: Vec<LineSegment>,
        /// Styling for the segments.
        style: LineStyle,
    },
    /// Fill a circle.
    Disc {
        /// Circle center.
        center: ScreenPoint,
        /// Radius in pixels.
        radius: f32,
        /// Fill color.
        fill: Color,
    },
    /// Stroke a circle outline.
    Ring {
        /// Circle center.
        center: ScreenPoint,
        /// Radius in pixels.
        radius: f32,
        /// Outline styling.
        stroke: LineStyle,
    },
    /// Fill closed polygons.
    Fill {
        /// Polygon outlines; each one is closed implicitly.
        polygons: Vec<Vec<ScreenPoint>>,
        /// Fill color.
        color: Color,
    },
    /// Draw a single line of text with its top-left corner at `position`.
    Text {
        /// Top-left corner.
        position: ScreenPoint,
        /// Text content.
        text: String,
        /// Text styling.
        style: TextStyle,
    },
}

/// Ordered draw instructions for one render pass.
#[derive(Debug, Default, Clone)]
pub struct RenderList {
    commands: Vec<RenderCommand>,
}

impl RenderList {
    /// Create an empty render list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a render command.
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    /// Access all render commands.
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Drop every command, keeping the allocation.
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

/// Build clipped line segments through consecutive logical points.
///
/// Segments are split into two groups by the sign of their midpoint value:
/// `(at_or_above_zero, below_zero)`.
pub fn build_signed_segments(
    points: &[LogicalPoint],
    transform: &Transform,
    clip: ScreenRect,
    above: &mut Vec<LineSegment>,
    below: &mut Vec<LineSegment>,
) {
    above.clear();
    below.clear();
    for window in points.windows(2) {
        let start = transform.logical_to_screen(window[0]);
        let end = transform.logical_to_screen(window[1]);
        if !start.is_finite() || !end.is_finite() {
            continue;
        }
        let Some((start, end)) = clip_segment(start, end, clip) else {
            continue;
        };
        let mid = (window[0].value + window[1].value) * 0.5;
        let out = if mid >= 0.0 { &mut *above } else { &mut *below };
        out.push(LineSegment::new(start, end));
    }
}

/// Build clipped line segments through consecutive logical points.
pub fn build_line_segments(
    points: &[LogicalPoint],
    transform: &Transform,
    clip: ScreenRect,
    out: &mut Vec<LineSegment>,
) {
    out.clear();
    for window in points.windows(2) {
        let start = transform.logical_to_screen(window[0]);
        let end = transform.logical_to_screen(window[1]);
        if !start.is_finite() || !end.is_finite() {
            continue;
        }
        if let Some((start, end)) = clip_segment(start, end, clip) {
            out.push(LineSegment::new(start, end));
        }
    }
}

/// Build the areas enclosed between a curve and the zero baseline.
///
/// Areas are split where the curve crosses zero and grouped as
/// `(above_zero, below_zero)`. Points that cannot be projected break the
/// curve into separate areas. Polygons are not clipped; draw them inside a
/// clip rectangle.
pub fn build_signed_fill(
    points: &[LogicalPoint],
    transform: &Transform,
    above: &mut Vec<Vec<ScreenPoint>>,
    below: &mut Vec<Vec<ScreenPoint>>,
) {
    above.clear();
    below.clear();
    let baseline = transform.y_to_screen(0.0);
    if !baseline.is_finite() {
        return;
    }

    let mut area = SignedArea::new(baseline);
    let mut prev: Option<(f64, ScreenPoint)> = None;
    for point in points {
        let screen = transform.logical_to_screen(*point);
        if !screen.is_finite() || !point.value.is_finite() {
            area.close(above, below);
            prev = None;
            continue;
        }
        if let Some((last_value, last_screen)) = prev {
            let crosses = (last_value > 0.0 && point.value < 0.0)
                || (last_value < 0.0 && point.value > 0.0);
            if crosses {
                let t = (last_value / (last_value - point.value)) as f32;
                let x = last_screen.x + (screen.x - last_screen.x) * t;
                let crossing = ScreenPoint::new(x, baseline);
                area.push(crossing, 0.0);
                area.close(above, below);
                area.push(crossing, 0.0);
            }
        }
        area.push(screen, point.value);
        prev = Some((point.value, screen));
    }
    area.close(above, below);
}

struct SignedArea {
    baseline: f32,
    outline: Vec<ScreenPoint>,
    positive: Option<bool>,
}

impl SignedArea {
    fn new(baseline: f32) -> Self {
        Self {
            baseline,
            outline: Vec::new(),
            positive: None,
        }
    }

    fn push(&mut self, point: ScreenPoint, value: f64) {
        if self.outline.is_empty() && point.y != self.baseline {
            self.outline.push(ScreenPoint::new(point.x, self.baseline));
        }
        if value != 0.0 {
            self.positive = Some(value > 0.0);
        }
        self.outline.push(point);
    }

    fn close(&mut self, above: &mut Vec<Vec<ScreenPoint>>, below: &mut Vec<Vec<ScreenPoint>>) {
        let mut outline = std::mem::take(&mut self.outline);
        let Some(positive) = self.positive.take() else {
            return;
        };
        if let Some(last) = outline.last().copied() {
            if last.y != self.baseline {
                outline.push(ScreenPoint::new(last.x, self.baseline));
            }
        }
        if outline.len() < 3 {
            return;
        }
        if positive {
            above.push(outline);
        } else {
            below.push(outline);
        }
    }
}

fn clip_segment(
    mut start: ScreenPoint,
    mut end: ScreenPoint,
    rect: ScreenRect,
) -> Option<(ScreenPoint, ScreenPoint)> {
    let mut out_start = region_code(start, rect);
    let mut out_end = region_code(end, rect);

    loop {
        if (out_start | out_end) == 0 {
            return Some((start, end));
        }
        if (out_start & out_end) != 0 {
            return None;
        }

        let out_code = if out_start != 0 { out_start } else { out_end };
        let next = if (out_code & TOP) != 0 {
            let x = start.x + (end.x - start.x) * (rect.min.y - start.y) / (end.y - start.y);
            ScreenPoint::new(x, rect.min.y)
        } else if (out_code & BOTTOM) != 0 {
            let x = start.x + (end.x - start.x) * (rect.max.y - start.y) / (end.y - start.y);
            ScreenPoint::new(x, rect.max.y)
        } else if (out_code & RIGHT) != 0 {
            let y = start.y + (end.y - start.y) * (rect.max.x - start.x) / (end.x - start.x);
            ScreenPoint::new(rect.max.x, y)
        } else {
            let y = start.y + (end.y - start.y) * (rect.min.x - start.x) / (end.x - start.x);
            ScreenPoint::new(rect.min.x, y)
        };

        if out_code == out_start {
            start = next;
            out_start = region_code(start, rect);
        } else {
            end = next;
            out_end = region_code(end, rect);
        }
    }
}

const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const TOP: u8 = 4;
const BOTTOM: u8 = 8;

fn region_code(point: ScreenPoint, rect: ScreenRect) -> u8 {
    let mut code = 0;
    if point.x < rect.min.x {
        code |= LEFT;
    } else if point.x > rect.max.x {
        code |= RIGHT;
    }
    if point.y < rect.min.y {
        code |= TOP;
    } else if point.y > rect.max.y {
        code |= BOTTOM;
    }
    code
}
