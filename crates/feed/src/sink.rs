use crate::window::Sample;

/// Renderer side of a feed: the chart that draws the window and the text
/// label that shows the latest rate.
///
/// Implementations must not block; they run inside the feed's tick.
pub trait ChartSink: Send + Sync {
    /// Whether the chart is still mounted.  Checked before every tick; a
    /// detached chart makes the tick a no-op.
    fn is_attached(&self) -> bool;

    /// Redraw the chart with the full window, oldest sample first.
    fn render(&self, window: &[Sample]);

    /// Update the text label identified by `label_id`.
    fn set_label(&self, label_id: &str, text: &str);
}
