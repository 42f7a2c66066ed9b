//! Visible data ranges.

use crate::geom::LogicalPoint;

/// Numeric range with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
}

impl Range {
    /// Create a new range, swapping bounds if needed.
    pub fn new(mut min: f64, mut max: f64) -> Self {
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        Self { min, max }
    }

    /// Span of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Check whether both bounds are finite.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Check whether the range has positive span and finite bounds.
    pub fn is_valid(&self) -> bool {
        self.is_finite() && self.span() > 0.0
    }

    /// Expand the range to include a value.
    pub fn expand_to_include(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Add padding around the range.
    pub fn padded(&self, frac: f64, min_padding: f64) -> Self {
        let span = self.span().abs();
        let padding = (span * frac).max(min_padding);
        Self {
            min: self.min - padding,
            max: self.max + padding,
        }
    }

    /// Ensure the range has at least the given span.
    pub fn with_min_span(&self, min_span: f64) -> Self {
        let span = self.span();
        if span >= min_span {
            return *self;
        }
        let center = (self.min + self.max) * 0.5;
        let half = min_span * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }
}

/// Visible data ranges on both axes.
///
/// `x` is measured in time units, `y` in value units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Time axis range.
    pub x: Range,
    /// Value axis range.
    pub y: Range,
}

impl Viewport {
    /// Create a viewport from X and Y ranges.
    pub fn new(x: Range, y: Range) -> Self {
        Self { x, y }
    }

    /// Smallest viewport containing every point, or `None` for no finite points.
    pub fn fit_points<'a>(points: impl IntoIterator<Item = &'a LogicalPoint>) -> Option<Self> {
        let mut bounds: Option<Self> = None;
        for point in points {
            if !point.value.is_finite() {
                continue;
            }
            let time = point.time as f64;
            match bounds.as_mut() {
                None => {
                    bounds = Some(Self::new(
                        Range::new(time, time),
                        Range::new(point.value, point.value),
                    ));
                }
                Some(existing) => {
                    existing.x.expand_to_include(time);
                    existing.y.expand_to_include(point.value);
                }
            }
        }
        bounds
    }

    /// Check whether both axes are valid.
    pub fn is_valid(&self) -> bool {
        self.x.is_valid() && self.y.is_valid()
    }

    /// Apply padding to both axes.
    pub fn padded(&self, frac: f64, min_padding: f64) -> Self {
        Self {
            x: self.x.padded(frac, min_padding),
            y: self.y.padded(frac, min_padding),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_with_min_span_expands() {
        let range = Range::new(2.0, 2.0);
        let expanded = range.with_min_span(1.0);
        assert!(expanded.span() >= 1.0);
        assert!(((expanded.min + expanded.max) * 0.5 - 2.0).abs() < 1e-9);
    }

    #[test]
    fn fit_points_covers_all() {
        let points = [
            LogicalPoint::new(1, -5.0),
            LogicalPoint::new(10, -5.0),
            LogicalPoint::new(20, 5.0),
        ];
        let viewport = Viewport::fit_points(&points).expect("bounds");
        assert_eq!(viewport.x, Range::new(1.0, 20.0));
        assert_eq!(viewport.y, Range::new(-5.0, 5.0));
        assert!(Viewport::fit_points(std::iter::empty()).is_none());
    }
}
