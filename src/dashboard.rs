//! Terminal frame composition.

use duos_core::{AppState, Panel};
use duos_widgets::TextSparkline;
use std::fmt::Write as _;

/// Clear screen and home the cursor.
const CLEAR: &str = "\x1b[2J\x1b[H";

/// Everything drawn on one repaint.
pub struct Dashboard {
    charts: Vec<std::sync::Arc<TextSparkline>>,
    panels: Vec<Box<dyn Panel>>,
}

impl Dashboard {
    pub fn new(charts: Vec<std::sync::Arc<TextSparkline>>, panels: Vec<Box<dyn Panel>>) -> Self {
        Self { charts, panels }
    }

    /// Compose a full frame for `state`, without the screen-clear prefix.
    pub fn render(&self, state: &AppState) -> String {
        let mut out = String::new();

        let updated = state
            .updated_at
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "never".to_string());
        let _ = writeln!(out, "DUO wallet  (updated {updated})");

        if let Some(alert) = &state.alert {
            let _ = writeln!(out, "! {}: {}", alert.title, alert.message);
        }

        for chart in &self.charts {
            let frame = chart.frame();
            let _ = writeln!(out, "\n── {} ── {}", chart.title(), frame.label);
            let _ = writeln!(out, "{}", frame.bars);
        }

        for panel in &self.panels {
            let _ = writeln!(out, "\n── {} ──", panel.title());
            for line in panel.lines(state) {
                let _ = writeln!(out, "{line}");
            }
        }

        out
    }

    /// Repaint the terminal.
    pub fn draw(&self, state: &AppState) {
        print!("{CLEAR}{}", self.render(state));
    }
}
