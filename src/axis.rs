//! Value scale ticks and label layout.

use crate::view::Range;

// Upper bound on ticks per axis, reached only with degenerate pixel spans.
const MAX_TICKS: usize = 50;

/// Measures rendered text.
///
/// Returns `(width, height)` in pixels for `text` at font `size`.
pub trait TextMeasurer {
    /// Measure a single line of text.
    fn measure(&self, text: &str, size: f32) -> (f32, f32);
}

/// A labelled tick on the value scale.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    /// Data value of the tick.
    pub value: f64,
    /// Formatted label.
    pub label: String,
}

/// Ticks of one axis together with the size of their widest label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisLayout {
    /// Ticks in ascending value order.
    pub ticks: Vec<AxisTick>,
    /// Distance between neighbouring ticks.
    pub step: f64,
    /// Largest label extent as `(width, height)`.
    pub max_label_size: (f32, f32),
}

impl AxisLayout {
    /// Lay out ticks for `range` spread over `pixel_span` pixels.
    ///
    /// Tick density follows the label height so that labels get roughly three
    /// line heights of room each.
    pub fn build(
        range: Range,
        pixel_span: f32,
        label_size: f32,
        measurer: &impl TextMeasurer,
    ) -> Self {
        let line_height = measurer.measure("0", label_size).1.max(1.0);
        let target = (pixel_span / (line_height * 3.0)).floor().max(2.0) as usize;
        let Some((values, step)) = nice_ticks(range, target) else {
            return Self::default();
        };

        let mut max_label_size = (0.0_f32, 0.0_f32);
        let ticks = values
            .into_iter()
            .map(|value| {
                let label = tick_label(value, step);
                let (width, height) = measurer.measure(&label, label_size);
                max_label_size.0 = max_label_size.0.max(width);
                max_label_size.1 = max_label_size.1.max(height);
                AxisTick { value, label }
            })
            .collect();
        Self {
            ticks,
            step,
            max_label_size,
        }
    }
}

/// Round tick values covering `range`, about `target_count` of them.
///
/// Steps are 1, 2 or 5 times a power of ten. Returns `None` for an invalid
/// range.
pub fn nice_ticks(range: Range, target_count: usize) -> Option<(Vec<f64>, f64)> {
    if !range.is_valid() || target_count == 0 {
        return None;
    }
    let rough = range.span() / target_count as f64;
    let magnitude = 10_f64.powf(rough.log10().floor());
    let normalized = rough / magnitude;
    let step = if normalized < 1.5 {
        magnitude
    } else if normalized < 3.5 {
        magnitude * 2.0
    } else if normalized < 7.5 {
        magnitude * 5.0
    } else {
        magnitude * 10.0
    };
    if !step.is_finite() || step <= 0.0 {
        return None;
    }

    // Ticks are multiples of the step so that zero is labelled exactly.
    let first = (range.min / step).ceil();
    let last = (range.max / step).floor();
    if !first.is_finite() || !last.is_finite() || last < first {
        return Some((Vec::new(), step));
    }
    let count = ((last - first) as usize + 1).min(MAX_TICKS);
    let values = (0..count)
        .map(|index| {
            let value = (first + index as f64) * step;
            if value == 0.0 { 0.0 } else { value }
        })
        .collect();
    Some((values, step))
}

/// Format a tick value with as many decimals as the step needs.
pub fn tick_label(value: f64, step: f64) -> String {
    let decimals = if step >= 0.95 {
        0
    } else {
        (-(step * 1.05).log10().floor()).clamp(1.0, 8.0) as usize
    };
    format!("{value:.decimals$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedWidth;

    impl TextMeasurer for FixedWidth {
        fn measure(&self, text: &str, size: f32) -> (f32, f32) {
            (text.chars().count() as f32 * size * 0.5, size + 2.0)
        }
    }

    #[test]
    fn nice_ticks_use_round_steps() {
        let (values, step) = nice_ticks(Range::new(-7.5, 12.5), 5).expect("valid range");
        assert_eq!(step, 5.0);
        assert_eq!(values, [-5.0, 0.0, 5.0, 10.0]);
    }

    #[test]
    fn nice_ticks_reject_empty_range() {
        assert!(nice_ticks(Range::new(3.0, 3.0), 5).is_none());
        assert!(nice_ticks(Range::new(0.0, f64::INFINITY), 5).is_none());
        assert!(nice_ticks(Range::new(0.0, 1.0), 0).is_none());
    }

    #[test]
    fn labels_follow_step_precision() {
        assert_eq!(tick_label(10.0, 5.0), "10");
        assert_eq!(tick_label(0.5, 0.5), "0.5");
        assert_eq!(tick_label(0.25, 0.05), "0.25");
        assert_eq!(tick_label(0.1 + 0.2, 0.1), "0.3");
    }

    #[test]
    fn layout_spaces_ticks_by_label_height() {
        let layout = AxisLayout::build(Range::new(-1.0, 1.0), 200.0, 10.0, &FixedWidth);
        assert_eq!(layout.step, 0.5);
        let labels: Vec<_> = layout.ticks.iter().map(|tick| tick.label.as_str()).collect();
        assert_eq!(labels, ["-1.0", "-0.5", "0.0", "0.5", "1.0"]);
        assert_eq!(layout.max_label_size, (20.0, 12.0));
    }

    #[test]
    fn zero_tick_is_never_negative() {
        let (values, step) = nice_ticks(Range::new(-0.4, 3.0), 3).expect("valid range");
        assert_eq!(step, 1.0);
        assert_eq!(values, [0.0, 1.0, 2.0, 3.0]);
        assert!(values[0].is_sign_positive());
        assert_eq!(tick_label(values[0], step), "0");
    }
}
