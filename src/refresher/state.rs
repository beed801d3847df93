//! Refresher policy, published snapshot and the guarded inner state.

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::config::QrConfig;

/// Timing rules for one rotating secret.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshPolicy {
    /// Minimum spacing between fetches, measured from the last success.
    pub cooldown: Duration,
    /// Proactive refetch cadence while active.
    pub refresh_interval: Duration,
    /// Countdown start value after each successful fetch.
    pub validity_secs: u32,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self::from_config(&QrConfig::default())
    }
}

impl RefreshPolicy {
    pub fn from_config(config: &QrConfig) -> Self {
        Self {
            cooldown: Duration::from_millis(config.cooldown_ms),
            refresh_interval: Duration::from_millis(config.refresh_interval_ms.max(1)),
            validity_secs: config.validity_secs,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefresherPhase {
    Inactive,
    Active,
}

/// What a display surface renders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefresherSnapshot {
    pub phase: RefresherPhase,
    /// Last successfully fetched secret; `None` until the first success and
    /// after deactivation.
    pub secret: Option<String>,
    /// Seconds until the displayed secret is expected to expire.
    pub countdown_secs: u32,
}

/// Result of one fetch request against the refresher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new secret was stored.
    Fetched,
    /// Skipped: the last success is younger than the cooldown.
    CoolingDown { remaining: Duration },
    /// The source failed; the previous secret is kept.
    Failed,
    /// The refresher is inactive, or was deactivated while fetching.
    Inactive,
}

/// One activation: its cancellation token and background tasks.
pub(super) struct Session {
    pub(super) generation: u64,
    pub(super) token: CancellationToken,
    pub(super) tasks: Vec<JoinHandle<()>>,
}

impl Session {
    /// Cancel the token and abort the tasks. Synchronous.
    pub(super) fn shutdown(self) {
        self.token.cancel();
        for task in self.tasks {
            task.abort();
        }
    }
}

pub(super) struct State {
    pub(super) session: Option<Session>,
    /// Bumped on every activation; fetches started under an older value are
    /// discarded.
    pub(super) generation: u64,
    pub(super) secret: Option<String>,
    pub(super) countdown_secs: u32,
    pub(super) last_fetch: Option<Instant>,
}

impl State {
    pub(super) fn new(validity_secs: u32) -> Self {
        Self {
            session: None,
            generation: 0,
            secret: None,
            countdown_secs: validity_secs,
            last_fetch: None,
        }
    }

    /// True while `generation` is the live, uncancelled session.
    pub(super) fn is_current(&self, generation: u64) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.generation == generation && !s.token.is_cancelled())
    }

    /// Time left before another fetch is allowed, if any.
    pub(super) fn cooldown_remaining(&self, cooldown: Duration, now: Instant) -> Option<Duration> {
        let last = self.last_fetch?;
        let elapsed = now.saturating_duration_since(last);
        (elapsed < cooldown).then(|| cooldown - elapsed)
    }

    pub(super) fn snapshot(&self) -> RefresherSnapshot {
        RefresherSnapshot {
            phase: if self.session.is_some() {
                RefresherPhase::Active
            } else {
                RefresherPhase::Inactive
            },
            secret: self.secret.clone(),
            countdown_secs: self.countdown_secs,
        }
    }
}
