/// Format a hash rate for the sparkline's text label, e.g. `"R: 1234H/s"`.
///
/// Rounds half away from zero.  Negative and non-finite readings display as
/// zero so the label never shows `NaN` or a negative rate.
pub fn rate_label(value: f64) -> String {
    format!("R: {:.0}H/s", displayable(value).round())
}

/// Clamp a raw reading to a displayable, non-negative finite value.
pub(crate) fn displayable(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
