use duos_feed::{ChartSink, Sample};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Text-mode sparkline: one block glyph per sample, scaled against a fixed
/// Y axis `[0, max_y]`.
///
/// Implements [`ChartSink`]; the dashboard reads back the latest frame when
/// it repaints.  Starts attached.
#[derive(Debug)]
pub struct TextSparkline {
    title: String,
    max_y: f64,
    attached: AtomicBool,
    frame: Mutex<SparkFrame>,
}

/// What the sparkline last drew.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparkFrame {
    pub bars: String,
    pub label_id: String,
    pub label: String,
}

impl TextSparkline {
    pub fn new(title: impl Into<String>, max_y: f64) -> Self {
        Self {
            title: title.into(),
            max_y,
            attached: AtomicBool::new(true),
            frame: Mutex::new(SparkFrame {
                label: duos_feed::rate_label(0.0),
                ..SparkFrame::default()
            }),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Mount the chart so ticks draw again.
    pub fn attach(&self) {
        self.attached.store(true, Ordering::Release);
    }

    /// Unmount the chart; ticks become no-ops until re-attached.
    pub fn detach(&self) {
        tracing::debug!(chart = %self.title, "sparkline detached");
        self.attached.store(false, Ordering::Release);
    }

    pub fn frame(&self) -> SparkFrame {
        self.frame.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn glyph(&self, value: f64) -> char {
        let ratio = if value.is_finite() {
            (value / self.max_y).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let idx = (ratio * (BARS.len() - 1) as f64).round() as usize;
        BARS[idx.min(BARS.len() - 1)]
    }
}

impl ChartSink for TextSparkline {
    fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }

    fn render(&self, window: &[Sample]) {
        let bars: String = window.iter().map(|s| self.glyph(s.value)).collect();
        self.frame.lock().unwrap_or_else(PoisonError::into_inner).bars = bars;
    }

    fn set_label(&self, label_id: &str, text: &str) {
        let mut frame = self.frame.lock().unwrap_or_else(PoisonError::into_inner);
        frame.label_id = label_id.to_string();
        frame.label = text.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_against_axis_max() {
        let spark = TextSparkline::new("Local hashrate", 700.0);
        spark.render(&[
            Sample::new(0, 0.0),
            Sample::new(1, 300.0),
            Sample::new(2, 700.0),
            Sample::new(3, 5_000.0),
        ]);
        assert_eq!(spark.frame().bars, "▁▄██");
    }

    #[test]
    fn non_finite_draws_floor() {
        let spark = TextSparkline::new("Network hashrate", 10.0);
        spark.render(&[Sample::new(0, f64::NAN), Sample::new(1, -3.0)]);
        assert_eq!(spark.frame().bars, "▁▁");
    }

    #[test]
    fn label_is_recorded_with_its_id() {
        let spark = TextSparkline::new("Local hashrate", 10.0);
        assert_eq!(spark.frame().label, "R: 0H/s");

        spark.set_label("lhr", "R: 5H/s");
        let frame = spark.frame();
        assert_eq!(frame.label_id, "lhr");
        assert_eq!(frame.label, "R: 5H/s");
    }

    #[test]
    fn attach_detach_toggles_liveness() {
        let spark = TextSparkline::new("x", 1.0);
        assert!(spark.is_attached());
        spark.detach();
        assert!(!spark.is_attached());
        spark.attach();
        assert!(spark.is_attached());
    }
}
