use duos_core::SharedState;

/// Read access to the live value a feed samples.
///
/// `None` means the value is not available right now (shared state not yet
/// populated, lock poisoned, …); the feed records it as zero.
pub trait MetricSource: Send + Sync {
    fn read(&self) -> Option<f64>;
}

impl<F> MetricSource for F
where
    F: Fn() -> Option<f64> + Send + Sync,
{
    fn read(&self) -> Option<f64> {
        self()
    }
}

/// Which hash rate in [`SharedState`] a feed follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashRate {
    Local,
    Network,
}

/// Reads one of the hash rates out of [`SharedState`].
#[derive(Debug, Clone)]
pub struct StateSource {
    state: SharedState,
    metric: HashRate,
}

impl StateSource {
    pub fn new(state: SharedState, metric: HashRate) -> Self {
        Self { state, metric }
    }
}

impl MetricSource for StateSource {
    fn read(&self) -> Option<f64> {
        match self.metric {
            HashRate::Local => self.state.local_hashrate(),
            HashRate::Network => self.state.network_hashrate(),
        }
    }
}
