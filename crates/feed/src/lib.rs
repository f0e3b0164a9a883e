//! Bounded rolling-sample feeds driving the hash-rate sparklines.
//!
//! A [`RollingFeed`] reads one metric from shared state on a fixed cadence,
//! appends it to a fixed-size [`RollingWindow`] (evicting the oldest sample)
//! and republishes the window to a [`ChartSink`].

pub mod feed;
pub mod label;
pub mod sink;
pub mod source;
pub mod window;

pub use feed::{FeedState, RollingFeed, TickOutcome};
pub use label::rate_label;
pub use sink::ChartSink;
pub use source::{HashRate, MetricSource, StateSource};
pub use window::{RollingWindow, Sample};
