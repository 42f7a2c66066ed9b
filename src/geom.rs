//! Geometric primitives shared by the point model and the render backends.
//!
//! [`LogicalPoint`] lives in domain units (integer time, real value) and is the
//! authoritative position of a control point. [`ScreenPoint`] is its pixel
//! projection under the current view transform and is always derived.

/// A control point in domain units.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogicalPoint {
    /// Time coordinate (horizontal axis).
    pub time: i64,
    /// Value coordinate (vertical axis).
    pub value: f64,
}

impl LogicalPoint {
    /// Create a new logical point.
    pub fn new(time: i64, value: f64) -> Self {
        Self { time, value }
    }
}

/// A point in screen space (pixel coordinates).
///
/// Coordinates are NaN when the host could not project the logical point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScreenPoint {
    /// X value in screen pixels.
    pub x: f32,
    /// Y value in screen pixels.
    pub y: f32,
}

impl ScreenPoint {
    /// Create a new screen point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// A point that cannot be hit, snapped to, or drawn.
    pub const UNPROJECTED: Self = Self {
        x: f32::NAN,
        y: f32::NAN,
    };

    /// Check whether both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: ScreenPoint) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Check whether `other` lies inside the open square of half-size
    /// `threshold` centred on this point.
    pub fn within_square(&self, other: ScreenPoint, threshold: f32) -> bool {
        (self.x - other.x).abs() < threshold && (self.y - other.y).abs() < threshold
    }
}

/// A rectangle in screen space (pixel coordinates).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    /// Top-left corner.
    pub min: ScreenPoint,
    /// Bottom-right corner.
    pub max: ScreenPoint,
}

impl ScreenRect {
    /// Create a new screen rectangle from corners.
    pub fn new(min: ScreenPoint, max: ScreenPoint) -> Self {
        Self { min, max }
    }

    /// Rectangle width in pixels.
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Rectangle height in pixels.
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Check whether the rectangle has positive area.
    pub fn is_valid(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    /// Check whether the rectangle contains a point (edges inclusive).
    pub fn contains(&self, point: ScreenPoint) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}
