//! Piecewise-linear interpolation over sparse anchors.
//!
//! Anchors are expected in ascending time order. Queries outside the anchor
//! span return `0.0` instead of extrapolating, and a query matching an anchor
//! time returns that anchor's value unchanged.

use thiserror::Error;

use crate::geom::LogicalPoint;

/// Errors raised when building a spline from separate columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SplineError {
    /// Time and value columns have different lengths.
    #[error("anchor columns differ in length: {times} times, {values} values")]
    LengthMismatch {
        /// Number of time entries.
        times: usize,
        /// Number of value entries.
        values: usize,
    },
}

/// Linear spline through a set of anchors.
#[derive(Debug, Clone, Copy)]
pub struct LinearSpline<'a> {
    anchors: &'a [LogicalPoint],
}

impl<'a> LinearSpline<'a> {
    /// Create a spline over anchors sorted by ascending time.
    pub fn new(anchors: &'a [LogicalPoint]) -> Self {
        Self { anchors }
    }

    /// Value of the spline at `time`.
    pub fn at(&self, time: i64) -> f64 {
        // The first anchor at or after `time`; order is trusted, not checked.
        let Some(index) = self.anchors.iter().position(|anchor| anchor.time >= time) else {
            return 0.0;
        };
        let next = self.anchors[index];
        if next.time == time {
            return next.value;
        }
        let Some(prev) = index.checked_sub(1).map(|prev| self.anchors[prev]) else {
            return 0.0;
        };

        // Widened so spans across the whole i64 range cannot overflow.
        let span = match i128::from(next.time) - i128::from(prev.time) {
            0 => 1,
            span => span,
        };
        let offset = i128::from(time) - i128::from(prev.time);
        let slope = (next.value - prev.value) / span as f64;
        prev.value + slope * offset as f64
    }

    /// Sample the spline at each of `times`.
    pub fn sample(&self, times: impl IntoIterator<Item = i64>) -> Vec<f64> {
        times.into_iter().map(|time| self.at(time)).collect()
    }
}

/// Interpolate `values` over `times` at each entry of `new_times`.
pub fn linear_spline(
    times: &[i64],
    values: &[f64],
    new_times: &[i64],
) -> Result<Vec<f64>, SplineError> {
    if times.len() != values.len() {
        return Err(SplineError::LengthMismatch {
            times: times.len(),
            values: values.len(),
        });
    }
    let anchors: Vec<LogicalPoint> = times
        .iter()
        .zip(values)
        .map(|(&time, &value)| LogicalPoint::new(time, value))
        .collect();
    Ok(LinearSpline::new(&anchors).sample(new_times.iter().copied()))
}

/// Dense curve sampled at every integer time in `times`.
pub fn sample_curve(anchors: &[LogicalPoint], times: std::ops::Range<i64>) -> Vec<LogicalPoint> {
    let spline = LinearSpline::new(anchors);
    times
        .map(|time| LogicalPoint::new(time, spline.at(time)))
        .collect()
}
