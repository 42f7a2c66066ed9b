//! Three-anchor payoff strategy driven by the draggable break point.

use crate::geom::LogicalPoint;
use crate::spline::sample_curve;

/// Times at which the break point may be dropped.
pub const BREAK_CANDIDATE_TIMES: [i64; 8] = [3, 8, 10, 11, 12, 13, 15, 18];

/// Payoff defined by a start, a break and an end anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PayoffStrategy {
    /// First anchor; the curve starts at its time.
    pub start: LogicalPoint,
    /// Draggable anchor.
    pub break_point: LogicalPoint,
    /// Last anchor; the curve stops one step before its time.
    pub end: LogicalPoint,
}

impl Default for PayoffStrategy {
    fn default() -> Self {
        Self {
            start: LogicalPoint::new(1, -5.0),
            break_point: LogicalPoint::new(10, -5.0),
            end: LogicalPoint::new(20, 5.0),
        }
    }
}

impl PayoffStrategy {
    /// Create a strategy from its three anchors.
    pub fn new(start: LogicalPoint, break_point: LogicalPoint, end: LogicalPoint) -> Self {
        Self {
            start,
            break_point,
            end,
        }
    }

    /// Payoff sampled at every integer time from `start` up to, not including, `end`.
    pub fn curve(&self) -> Vec<LogicalPoint> {
        self.preview(self.break_point)
    }

    /// Payoff with `next` standing in for the break point.
    pub fn preview(&self, next: LogicalPoint) -> Vec<LogicalPoint> {
        sample_curve(&[self.start, next, self.end], self.start.time..self.end.time)
    }

    /// Draggable points and their snap candidates.
    ///
    /// The break point is the only draggable point; candidates share its premium.
    pub fn draggable_points(&self) -> (Vec<LogicalPoint>, Vec<LogicalPoint>) {
        let premium = self.break_point.value;
        let candidates = BREAK_CANDIDATE_TIMES
            .iter()
            .map(|&time| LogicalPoint::new(time, premium))
            .collect();
        (vec![self.break_point], candidates)
    }

    /// Strategy after the break point was dropped at `new_break`.
    ///
    /// Moving the break later halves the premium, otherwise it doubles.
    pub fn with_break(&self, new_break: LogicalPoint) -> Self {
        let premium = if self.break_point.time < new_break.time {
            new_break.value / 2.0
        } else {
            new_break.value * 2.0
        };
        tracing::debug!(
            from = self.break_point.time,
            to = new_break.time,
            premium,
            "break point moved"
        );
        Self {
            start: LogicalPoint::new(1, premium),
            break_point: LogicalPoint::new(new_break.time, premium),
            end: self.end,
        }
    }
}
