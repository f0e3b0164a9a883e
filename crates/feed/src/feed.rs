use crate::label::{displayable, rate_label};
use crate::sink::ChartSink;
use crate::source::MetricSource;
use crate::window::{RollingWindow, Sample};
use duos_core::{PanelError, Result};
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, trace, warn};

/// Lifecycle of a [`RollingFeed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedState {
    Stopped,
    Running,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// A sample was appended and the chart redrawn.
    Rendered(Sample),
    /// The chart was detached; nothing changed.
    Detached,
}

/// Samples one metric on a fixed cadence into a bounded window and pushes
/// every update to a chart.
///
/// Each feed owns its window and at most one timer task.  The timer starts on
/// [`start`](Self::start) and is cancelled on [`stop`](Self::stop) or drop.
pub struct RollingFeed {
    shared: Arc<Shared>,
    interval: Duration,
    task: Option<JoinHandle<()>>,
}

struct Shared {
    label_id: String,
    source: Box<dyn MetricSource>,
    sink: Arc<dyn ChartSink>,
    tick: Mutex<TickState>,
}

struct TickState {
    window: RollingWindow,
    /// Bumped on every start and stop.  A timer task only ticks while the
    /// epoch it was spawned with is still current.
    epoch: u64,
}

impl RollingFeed {
    /// Build a stopped feed.  Touches neither `source` nor `sink`.
    ///
    /// `label_id` names the text label updated on every tick (`"lhr"`,
    /// `"nhr"`).  Fails only for a zero `interval`.
    pub fn new(
        capacity: NonZeroUsize,
        interval: Duration,
        label_id: impl Into<String>,
        source: impl MetricSource + 'static,
        sink: Arc<dyn ChartSink>,
    ) -> Result<Self> {
        let label_id = label_id.into();
        if interval.is_zero() {
            return Err(PanelError::Feed(format!(
                "feed '{label_id}': interval must be non-zero"
            )));
        }

        Ok(Self {
            shared: Arc::new(Shared {
                label_id,
                source: Box::new(source),
                sink,
                tick: Mutex::new(TickState {
                    window: RollingWindow::new(capacity),
                    epoch: 0,
                }),
            }),
            interval,
            task: None,
        })
    }

    pub fn label_id(&self) -> &str {
        &self.shared.label_id
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// `Running` while the timer task is alive.
    pub fn state(&self) -> FeedState {
        if self.task.as_ref().is_some_and(|task| !task.is_finished()) {
            FeedState::Running
        } else {
            FeedState::Stopped
        }
    }

    /// Copy of the current window, oldest first.
    pub fn window(&self) -> Vec<Sample> {
        self.shared.lock().window.to_vec()
    }

    /// Begin ticking every `interval`; the first tick fires one interval
    /// from now.  No-op if already running.
    ///
    /// Needs a Tokio runtime; without one the feed logs an error and stays
    /// stopped.
    pub fn start(&mut self) {
        if self.state() == FeedState::Running {
            return;
        }
        // A timer task that died is replaced rather than left in place.
        self.task = None;

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                error!(label = %self.shared.label_id, "cannot start feed outside a Tokio runtime: {e}");
                return;
            }
        };

        let epoch = {
            let mut state = self.shared.lock();
            state.epoch += 1;
            state.epoch
        };

        self.task = Some(runtime.spawn(timer_loop(
            Arc::clone(&self.shared),
            self.interval,
            epoch,
        )));
        info!(label = %self.shared.label_id, interval_ms = self.interval.as_millis() as u64, "feed started");
    }

    /// Cancel the timer.  No-op if already stopped.
    ///
    /// Waits for a tick already in progress to finish; once this returns no
    /// further tick runs.  Must not be called from inside the sink.
    pub fn stop(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };

        self.shared.lock().epoch += 1;
        task.abort();
        info!(label = %self.shared.label_id, "feed stopped");
    }

    /// Run one tick immediately, independent of the timer.
    pub fn tick(&self) -> TickOutcome {
        let mut state = self.shared.lock();
        self.shared.run_tick(&mut state)
    }
}

impl Drop for RollingFeed {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for RollingFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RollingFeed")
            .field("label_id", &self.shared.label_id)
            .field("interval", &self.interval)
            .field("state", &self.state())
            .finish()
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, TickState> {
        self.tick.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Tick if `epoch` is still current.  `None` tells the timer to exit.
    fn tick_in_epoch(&self, epoch: u64) -> Option<TickOutcome> {
        let mut state = self.lock();
        if state.epoch != epoch {
            return None;
        }
        Some(self.run_tick(&mut state))
    }

    /// One tick.  A panicking source counts as a missing reading and a
    /// panicking sink call is skipped, so the timer outlives both.
    fn run_tick(&self, state: &mut TickState) -> TickOutcome {
        let attached = catch(|| self.sink.is_attached()).unwrap_or_else(|| {
            warn!(label = %self.label_id, "chart liveness check panicked; tick skipped");
            false
        });
        if !attached {
            trace!(label = %self.label_id, "chart detached; tick skipped");
            return TickOutcome::Detached;
        }

        let raw = catch(|| self.source.read()).flatten().unwrap_or_else(|| {
            debug!(label = %self.label_id, "metric unavailable; sampling 0");
            0.0
        });

        let sample = state.window.push(displayable(raw));
        let window = state.window.as_slice();
        if catch(|| self.sink.render(window)).is_none() {
            warn!(label = %self.label_id, seq = sample.sequence, "chart render panicked");
        }
        let text = rate_label(raw);
        if catch(|| self.sink.set_label(&self.label_id, &text)).is_none() {
            warn!(label = %self.label_id, "label update panicked");
        }

        trace!(label = %self.label_id, seq = sample.sequence, value = sample.value, "tick");
        TickOutcome::Rendered(sample)
    }
}

/// Run `f`, turning a panic into `None`.
fn catch<R>(f: impl FnOnce() -> R) -> Option<R> {
    panic::catch_unwind(AssertUnwindSafe(f)).ok()
}

async fn timer_loop(shared: Arc<Shared>, period: Duration, epoch: u64) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    // A slow sink pushes later ticks back rather than bunching them up.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if shared.tick_in_epoch(epoch).is_none() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct RecordingSink {
        detached: AtomicBool,
        renders: Mutex<Vec<Vec<Sample>>>,
        labels: Mutex<Vec<(String, String)>>,
    }

    impl RecordingSink {
        fn render_count(&self) -> usize {
            self.renders.lock().unwrap().len()
        }

        fn last_render(&self) -> Vec<Sample> {
            self.renders.lock().unwrap().last().cloned().unwrap_or_default()
        }

        fn last_label(&self) -> Option<(String, String)> {
            self.labels.lock().unwrap().last().cloned()
        }
    }

    impl ChartSink for RecordingSink {
        fn is_attached(&self) -> bool {
            !self.detached.load(Ordering::SeqCst)
        }

        fn render(&self, window: &[Sample]) {
            self.renders.lock().unwrap().push(window.to_vec());
        }

        fn set_label(&self, label_id: &str, text: &str) {
            self.labels
                .lock()
                .unwrap()
                .push((label_id.to_string(), text.to_string()));
        }
    }

    const PERIOD: Duration = Duration::from_millis(500);

    fn feed_with(
        capacity: usize,
        source: impl MetricSource + 'static,
    ) -> (RollingFeed, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let feed = RollingFeed::new(
            NonZeroUsize::new(capacity).unwrap(),
            PERIOD,
            "lhr",
            source,
            sink.clone(),
        )
        .unwrap();
        (feed, sink)
    }

    fn counting_source() -> (impl MetricSource + 'static, Arc<AtomicUsize>) {
        let reads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&reads);
        let source = move || Some(counter.fetch_add(1, Ordering::SeqCst) as f64 + 1.0);
        (source, reads)
    }

    #[test]
    fn construction_has_no_side_effects() {
        let (source, reads) = counting_source();
        let (feed, sink) = feed_with(19, source);

        assert_eq!(feed.state(), FeedState::Stopped);
        assert_eq!(reads.load(Ordering::SeqCst), 0);
        assert_eq!(sink.render_count(), 0);
        assert_eq!(feed.window().len(), 19);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let sink: Arc<dyn ChartSink> = Arc::new(RecordingSink::default());
        let err = RollingFeed::new(
            NonZeroUsize::new(3).unwrap(),
            Duration::ZERO,
            "nhr",
            || Some(1.0),
            sink,
        )
        .unwrap_err();
        assert!(matches!(err, PanelError::Feed(_)));
    }

    #[test]
    fn tick_appends_renders_and_labels() {
        let (feed, sink) = feed_with(3, || Some(7.0));
        assert_eq!(
            feed.window(),
            vec![Sample::new(0, 0.0), Sample::new(1, 0.0), Sample::new(2, 0.0)]
        );

        assert_eq!(feed.tick(), TickOutcome::Rendered(Sample::new(3, 7.0)));

        let expected = vec![Sample::new(1, 0.0), Sample::new(2, 0.0), Sample::new(3, 7.0)];
        assert_eq!(feed.window(), expected);
        assert_eq!(sink.last_render(), expected);
        assert_eq!(
            sink.last_label(),
            Some(("lhr".to_string(), "R: 7H/s".to_string()))
        );
    }

    #[test]
    fn window_invariants_hold_over_many_ticks() {
        let (source, _) = counting_source();
        let (feed, _sink) = feed_with(19, source);

        for _ in 0..50 {
            feed.tick();
            let window = feed.window();
            assert_eq!(window.len(), 19);
            assert!(window
                .windows(2)
                .all(|p| p[1].sequence == p[0].sequence + 1));
        }
        assert_eq!(feed.window().last().unwrap().sequence, 18 + 50);
    }

    #[test]
    fn negative_reading_is_clamped() {
        let (feed, sink) = feed_with(3, || Some(-5.0));
        feed.tick();

        assert_eq!(feed.window()[2], Sample::new(3, 0.0));
        assert_eq!(sink.last_label().unwrap().1, "R: 0H/s");
    }

    #[test]
    fn nan_reading_is_clamped() {
        let (feed, sink) = feed_with(3, || Some(f64::NAN));
        feed.tick();

        assert_eq!(feed.window()[2].value, 0.0);
        assert_eq!(sink.last_label().unwrap().1, "R: 0H/s");
    }

    #[test]
    fn missing_reading_samples_zero_and_keeps_going() {
        let available = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&available);
        let (feed, _sink) = feed_with(3, move || flag.load(Ordering::SeqCst).then_some(4.0));

        assert_eq!(feed.tick(), TickOutcome::Rendered(Sample::new(3, 0.0)));
        available.store(true, Ordering::SeqCst);
        assert_eq!(feed.tick(), TickOutcome::Rendered(Sample::new(4, 4.0)));
    }

    #[test]
    fn detached_chart_freezes_window_until_reattached() {
        let (source, reads) = counting_source();
        let (feed, sink) = feed_with(3, source);
        feed.tick();
        let before = feed.window();
        let renders = sink.render_count();

        sink.detached.store(true, Ordering::SeqCst);
        assert_eq!(feed.tick(), TickOutcome::Detached);
        assert_eq!(feed.tick(), TickOutcome::Detached);
        assert_eq!(feed.window(), before);
        assert_eq!(sink.render_count(), renders);
        assert_eq!(reads.load(Ordering::SeqCst), 1);

        sink.detached.store(false, Ordering::SeqCst);
        assert_eq!(feed.tick(), TickOutcome::Rendered(Sample::new(4, 2.0)));
        assert_eq!(feed.window()[..2], before[1..]);
    }

    #[test]
    fn start_without_runtime_stays_stopped() {
        let (mut feed, _sink) = feed_with(3, || Some(1.0));
        feed.start();
        assert_eq!(feed.state(), FeedState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_on_cadence_once_started() {
        let (source, _) = counting_source();
        let (mut feed, sink) = feed_with(5, source);
        feed.start();
        assert_eq!(feed.state(), FeedState::Running);

        time::sleep(Duration::from_millis(1_250)).await;

        assert_eq!(sink.render_count(), 2);
        let seqs: Vec<u64> = sink
            .renders
            .lock()
            .unwrap()
            .iter()
            .map(|w| w.last().unwrap().sequence)
            .collect();
        assert_eq!(seqs, vec![5, 6]);
    }

    #[tokio::test(start_paused = true)]
    async fn start_and_stop_are_idempotent() {
        let (mut feed, sink) = feed_with(3, || Some(1.0));

        feed.stop();
        assert_eq!(feed.state(), FeedState::Stopped);

        feed.start();
        feed.start();
        assert_eq!(feed.state(), FeedState::Running);

        time::sleep(Duration::from_millis(600)).await;
        assert_eq!(sink.render_count(), 1, "double start must not double the timer");

        feed.stop();
        feed.stop();
        assert_eq!(feed.state(), FeedState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn no_tick_after_stop() {
        let (mut feed, sink) = feed_with(3, || Some(1.0));
        feed.start();
        time::sleep(Duration::from_millis(1_100)).await;
        feed.stop();
        let seen = sink.render_count();
        let window = feed.window();

        time::sleep(PERIOD * 4).await;

        assert_eq!(sink.render_count(), seen);
        assert_eq!(feed.window(), window);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_continues_sequence() {
        let (mut feed, _sink) = feed_with(3, || Some(2.0));
        feed.start();
        time::sleep(Duration::from_millis(600)).await;
        feed.stop();
        let last = feed.window()[2].sequence;

        feed.start();
        time::sleep(Duration::from_millis(600)).await;
        feed.stop();

        assert_eq!(feed.window()[2].sequence, last + 1);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_timer() {
        let (mut feed, sink) = feed_with(3, || Some(1.0));
        feed.start();
        time::sleep(Duration::from_millis(600)).await;
        drop(feed);
        let seen = sink.render_count();

        time::sleep(PERIOD * 4).await;
        assert_eq!(sink.render_count(), seen);
    }

    #[tokio::test(start_paused = true)]
    async fn detached_chart_keeps_timer_alive() {
        let (mut feed, sink) = feed_with(3, || Some(9.0));
        sink.detached.store(true, Ordering::SeqCst);
        feed.start();

        time::sleep(Duration::from_millis(1_100)).await;
        assert_eq!(sink.render_count(), 0);

        sink.detached.store(false, Ordering::SeqCst);
        time::sleep(PERIOD).await;
        assert_eq!(sink.render_count(), 1);
        assert_eq!(feed.state(), FeedState::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_source_samples_zero_and_timer_survives() {
        let reads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&reads);
        let source = move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("bridge glitch");
            }
            Some(5.0)
        };
        let (mut feed, sink) = feed_with(3, source);
        feed.start();

        time::sleep(Duration::from_millis(1_100)).await;

        assert_eq!(feed.state(), FeedState::Running);
        assert_eq!(reads.load(Ordering::SeqCst), 2);
        assert_eq!(sink.render_count(), 2);
        assert_eq!(
            feed.window()[1..],
            [Sample::new(3, 0.0), Sample::new(4, 5.0)]
        );
        assert_eq!(sink.last_label().unwrap().1, "R: 5H/s");
    }

    /// Panics on its first render, then records like [`RecordingSink`].
    #[derive(Default)]
    struct FlakySink {
        calls: AtomicUsize,
        inner: RecordingSink,
    }

    impl ChartSink for FlakySink {
        fn is_attached(&self) -> bool {
            true
        }

        fn render(&self, window: &[Sample]) {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("renderer crashed");
            }
            self.inner.render(window);
        }

        fn set_label(&self, label_id: &str, text: &str) {
            self.inner.set_label(label_id, text);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_render_does_not_stop_the_timer() {
        let sink = Arc::new(FlakySink::default());
        let mut feed = RollingFeed::new(
            NonZeroUsize::new(3).unwrap(),
            PERIOD,
            "lhr",
            || Some(2.0),
            sink.clone(),
        )
        .unwrap();
        feed.start();

        time::sleep(Duration::from_millis(1_600)).await;

        assert_eq!(feed.state(), FeedState::Running);
        assert_eq!(sink.calls.load(Ordering::SeqCst), 3);
        assert_eq!(sink.inner.render_count(), 2);
        // The label is still set on the tick whose render panicked.
        assert_eq!(sink.inner.labels.lock().unwrap().len(), 3);
        assert_eq!(feed.window()[2].sequence, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn network_feed_follows_shared_state() {
        use crate::source::{HashRate, StateSource};
        use duos_core::SharedState;

        let state = SharedState::default();
        let sink = Arc::new(RecordingSink::default());
        let mut feed = RollingFeed::new(
            NonZeroUsize::new(19).unwrap(),
            PERIOD,
            "nhr",
            StateSource::new(state.clone(), HashRate::Network),
            sink.clone(),
        )
        .unwrap();
        feed.start();

        // Not populated yet: the first tick samples zero.
        time::sleep(Duration::from_millis(600)).await;
        assert_eq!(sink.last_label(), Some(("nhr".to_string(), "R: 0H/s".to_string())));

        state.update(|s| {
            s.network_hashrate = Some(2_500_000.4);
            s.local_hashrate = Some(1.0);
        });
        time::sleep(PERIOD).await;

        let window = sink.last_render();
        assert_eq!(window.len(), 19);
        assert_eq!(window[17], Sample::new(19, 0.0));
        assert_eq!(window[18], Sample::new(20, 2_500_000.4));
        assert_eq!(
            sink.last_label(),
            Some(("nhr".to_string(), "R: 2500000H/s".to_string()))
        );
        feed.stop();
    }

    #[test]
    fn feed_reads_state_written_after_a_writer_panicked() {
        use crate::source::{HashRate, StateSource};
        use duos_core::SharedState;

        let state = SharedState::default();
        let writer = state.clone();
        let _ = std::thread::spawn(move || writer.update(|_| panic!("gatherer died"))).join();
        state.update(|s| s.local_hashrate = Some(1_234.0));

        let (feed, _sink) = feed_with(3, StateSource::new(state, HashRate::Local));
        for _ in 0..3 {
            feed.tick();
        }

        let values: Vec<f64> = feed.window().iter().map(|s| s.value).collect();
        assert_eq!(values, vec![1_234.0, 1_234.0, 1_234.0]);
    }
}
