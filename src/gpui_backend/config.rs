/// Configuration for the GPUI payoff view.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PayoffViewConfig {
    /// Width of the price scale panel left of the plot area.
    pub left_scale_width: f32,
    /// Padding fraction applied when auto-fitting data.
    pub padding_frac: f64,
    /// Minimum padding applied when auto-fitting data.
    pub min_padding: f64,
    /// Stroke width of the payoff and preview lines.
    pub line_width: f32,
    /// Font size of the value scale labels.
    pub scale_label_size: f32,
}

impl Default for PayoffViewConfig {
    fn default() -> Self {
        Self {
            left_scale_width: 56.0,
            padding_frac: 0.1,
            min_padding: 1.0,
            line_width: 3.0,
            scale_label_size: 11.0,
        }
    }
}
