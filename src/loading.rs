//! Debounced blocking-loading indicator.
//!
//! A fetch that settles quickly (cache hit, fast network) should never
//! flash a spinner; a genuinely slow fetch still needs feedback. The
//! gate arms a deadline when a blocking fetch starts and only reports
//! `Showing` once the deadline has passed without a cancel.

use tokio::time::{Duration, Instant};

/// Where the loading indicator currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingState {
    /// Nothing pending; the UI shows content (or an empty state).
    Idle,
    /// A fetch is in flight but the debounce window is still open.
    Armed {
        /// When the indicator becomes visible unless cancelled first.
        deadline: Instant,
    },
    /// The debounce window elapsed; the UI shows a blocking indicator.
    Showing,
}

/// Timer-driven state machine for the loading indicator.
///
/// `Idle -> Armed -> Showing`, with `Armed -> Idle` on a cancel that
/// wins the race against the deadline (the cache-hit fast path) and
/// `Showing -> Idle` when the fetch finally settles. The race between
/// cancellation and the timer firing is an explicit transition here, not
/// an inline timeout/clear pair.
///
/// Time comes from `tokio::time::Instant`, so tests drive the deadline
/// with `tokio::time::{pause, advance}`.
#[derive(Debug)]
pub struct LoadingGate {
    delay: Duration,
    state: LoadingState,
}

impl LoadingGate {
    /// Default debounce before a blocking indicator may appear.
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: LoadingState::Idle,
        }
    }

    pub fn state(&self) -> LoadingState {
        self.state
    }

    pub fn is_showing(&self) -> bool {
        matches!(self.state, LoadingState::Showing)
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, LoadingState::Armed { .. })
    }

    /// Start (or restart) the debounce window.
    pub fn arm(&mut self) {
        self.state = LoadingState::Armed {
            deadline: Instant::now() + self.delay,
        };
    }

    /// The fetch settled: clear a pending window or a visible indicator.
    pub fn cancel(&mut self) {
        self.state = LoadingState::Idle;
    }

    /// Advance the machine against the clock. Promotes `Armed` to
    /// `Showing` once the deadline has passed; returns whether the
    /// indicator should currently be visible.
    pub fn tick(&mut self) -> bool {
        if let LoadingState::Armed { deadline } = self.state {
            if Instant::now() >= deadline {
                self.state = LoadingState::Showing;
            }
        }
        self.is_showing()
    }
}

impl Default for LoadingGate {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}
