//! Styling and theming.

use crate::render::{Color, LineStyle};

/// Look and hit-testing tolerances of the draggable-points overlay.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PointsStyle {
    /// Half-size of the square hover/hit area around a point, per axis.
    pub vicinity_threshold_px: f32,
    /// Radius of the filled disc drawn for every point.
    pub point_radius: f32,
    /// Radius of the ring drawn around the hovered point.
    pub hover_ring_radius: f32,
    /// Radius of the discs drawn for snap candidates during a drag.
    pub candidate_radius: f32,
    /// Radius of the disc marking the live snap target.
    pub snap_radius: f32,
    /// Radius of the ring around the live snap target.
    pub snap_ring_radius: f32,
    /// Stroke width of both rings.
    pub ring_width: f32,
    /// Fill of regular points and stroke of the hover ring.
    pub point_color: Color,
    /// Fill of snap candidates.
    pub candidate_color: Color,
    /// Fill and ring color of the live snap target.
    pub snap_color: Color,
    /// Cursor suggested to the host while a point is hovered.
    pub cursor_style: String,
}

impl Default for PointsStyle {
    fn default() -> Self {
        Self {
            vicinity_threshold_px: 10.0,
            point_radius: 5.0,
            hover_ring_radius: 10.0,
            candidate_radius: 3.0,
            snap_radius: 5.0,
            snap_ring_radius: 10.0,
            ring_width: 1.0,
            point_color: Color::BLUE,
            candidate_color: Color::from_rgb8(0xaa, 0xaa, 0xaa),
            snap_color: Color::from_rgb8(0x1e, 0x88, 0xe5),
            cursor_style: "move".to_string(),
        }
    }
}

impl PointsStyle {
    pub(crate) fn hover_ring(&self) -> LineStyle {
        LineStyle {
            color: self.point_color,
            width: self.ring_width,
        }
    }

    pub(crate) fn snap_ring(&self) -> LineStyle {
        LineStyle {
            color: self.snap_color,
            width: self.ring_width,
        }
    }
}

/// Visual theme for payoff charts.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Theme {
    /// Chart background.
    pub background: Color,
    /// Zero baseline and left scale border.
    pub axis: Color,
    /// Payoff line where the payoff is positive.
    pub profit_line: Color,
    /// Payoff line where the payoff is negative.
    pub loss_line: Color,
    /// Area between a positive payoff and zero.
    pub profit_fill: Color,
    /// Area between a negative payoff and zero.
    pub loss_fill: Color,
    /// Preview line drawn while a breakpoint is being dragged.
    pub preview_line: Color,
    /// Value scale labels and tick marks.
    pub scale_text: Color,
    /// Draggable-points overlay.
    pub points: PointsStyle,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            axis: Color::from_rgb8(0xb2, 0xb5, 0xbe),
            profit_line: Color::from_rgb8(0x24, 0xb2, 0x9b),
            loss_line: Color::from_rgb8(0xe9, 0x1e, 0x63),
            profit_fill: Color::from_rgb8(0x24, 0xb2, 0x9b).with_alpha(0.1),
            loss_fill: Color::from_rgb8(0xe9, 0x1e, 0x63).with_alpha(0.1),
            preview_line: Color::BLACK.with_alpha(0.2),
            scale_text: Color::from_rgb8(0x78, 0x7b, 0x86),
            points: PointsStyle::default(),
        }
    }
}

impl Theme {
    /// Create the default theme.
    pub fn new() -> Self {
        Self::default()
    }
}
