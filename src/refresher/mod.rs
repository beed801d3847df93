//! Time-gated refresher for a short-lived rotating secret.
//!
//! A [`CredentialRefresher`] enforces two timing rules at once:
//! - never fetch within `cooldown` of the last successful fetch;
//! - while active, refetch every `refresh_interval` so the secret rotates
//!   before the server-side validity window closes.
//!
//! Each activation is a session with its own [`CancellationToken`] and
//! generation number. [`CredentialRefresher::deactivate`] cancels the session
//! synchronously, and any fetch that completes afterwards is dropped instead of
//! written into the cleared state.

mod state;

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use state::{Session, State};

pub use state::{RefreshOutcome, RefreshPolicy, RefresherPhase, RefresherSnapshot};

const COUNTDOWN_STEP: Duration = Duration::from_secs(1);

/// Issues a new rotating secret.
#[async_trait]
pub trait SecretSource: Send + Sync + 'static {
    async fn issue_secret(&self) -> Result<String, ApiError>;
}

/// Holds the current secret plus its countdown, and keeps them fresh while
/// active. Instances share nothing with each other.
///
/// [`activate`](Self::activate) spawns onto the current tokio runtime.
pub struct CredentialRefresher<S: SecretSource> {
    source: Arc<S>,
    policy: RefreshPolicy,
    shared: Arc<Shared>,
}

struct Shared {
    state: Mutex<State>,
    updates: watch::Sender<RefresherSnapshot>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &State) {
        self.updates.send_replace(state.snapshot());
    }

    fn tick_countdown(&self, generation: u64) {
        let mut state = self.lock();
        if !state.is_current(generation) || state.countdown_secs == 0 {
            return;
        }
        state.countdown_secs -= 1;
        self.publish(&state);
    }
}

impl<S: SecretSource> CredentialRefresher<S> {
    pub fn new(source: Arc<S>, policy: RefreshPolicy) -> Self {
        let state = State::new(policy.validity_secs);
        let (updates, _) = watch::channel(state.snapshot());
        Self {
            source,
            policy,
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                updates,
            }),
        }
    }

    pub fn policy(&self) -> &RefreshPolicy {
        &self.policy
    }

    pub fn is_active(&self) -> bool {
        self.shared.lock().session.is_some()
    }

    pub fn snapshot(&self) -> RefresherSnapshot {
        self.shared.lock().snapshot()
    }

    /// Receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<RefresherSnapshot> {
        self.shared.updates.subscribe()
    }

    /// Start a session: one immediate fetch (subject to cooldown), a fetch
    /// every `refresh_interval`, and a one-second countdown.
    ///
    /// Returns `false` if already active; the running session is left as is.
    pub fn activate(&self) -> bool {
        let mut state = self.shared.lock();
        if state.session.is_some() {
            return false;
        }
        state.generation = state.generation.wrapping_add(1);
        let generation = state.generation;
        let token = CancellationToken::new();
        let tasks = vec![
            tokio::spawn(run_refresh_loop(
                self.source.clone(),
                self.shared.clone(),
                self.policy,
                generation,
                token.clone(),
            )),
            tokio::spawn(run_countdown(
                self.shared.clone(),
                generation,
                token.clone(),
            )),
        ];
        state.countdown_secs = self.policy.validity_secs;
        state.session = Some(Session {
            generation,
            token,
            tasks,
        });
        self.shared.publish(&state);
        info!(generation, "credential refresher activated");
        true
    }

    /// Tear the session down: cancel both timers, drop the secret, and make
    /// any in-flight fetch a no-op. Safe to call when inactive.
    pub fn deactivate(&self) {
        let mut state = self.shared.lock();
        let session = state.session.take();
        state.secret = None;
        state.countdown_secs = self.policy.validity_secs;
        state.last_fetch = None;
        self.shared.publish(&state);
        drop(state);

        if let Some(session) = session {
            let generation = session.generation;
            session.shutdown();
            info!(generation, "credential refresher deactivated");
        }
    }

    /// Ask for a fresh secret now. Honors the cooldown; never propagates
    /// source errors.
    pub async fn refresh(&self) -> RefreshOutcome {
        let generation = match &self.shared.lock().session {
            Some(session) => session.generation,
            None => return RefreshOutcome::Inactive,
        };
        fetch_once(self.source.as_ref(), &self.shared, &self.policy, generation).await
    }
}

impl<S: SecretSource> Drop for CredentialRefresher<S> {
    fn drop(&mut self) {
        let session = self.shared.lock().session.take();
        if let Some(session) = session {
            session.shutdown();
        }
    }
}

/// One guarded fetch. The cooldown check and the write-back both re-check
/// that `generation` is still the live session.
async fn fetch_once<S: SecretSource + ?Sized>(
    source: &S,
    shared: &Shared,
    policy: &RefreshPolicy,
    generation: u64,
) -> RefreshOutcome {
    {
        let state = shared.lock();
        if !state.is_current(generation) {
            return RefreshOutcome::Inactive;
        }
        if let Some(remaining) = state.cooldown_remaining(policy.cooldown, Instant::now()) {
            debug!(
                generation,
                remaining_ms = remaining.as_millis() as u64,
                "secret fetch skipped: cooling down"
            );
            return RefreshOutcome::CoolingDown { remaining };
        }
    }

    let result = source.issue_secret().await;

    let mut state = shared.lock();
    if !state.is_current(generation) {
        debug!(generation, "discarding secret fetched by a finished session");
        return RefreshOutcome::Inactive;
    }
    match result {
        Ok(secret) => {
            state.secret = Some(secret);
            state.countdown_secs = policy.validity_secs;
            state.last_fetch = Some(Instant::now());
            shared.publish(&state);
            debug!(generation, "rotating secret refreshed");
            RefreshOutcome::Fetched
        }
        Err(err) => {
            warn!(generation, error = %err, "rotating secret fetch failed; keeping previous secret");
            RefreshOutcome::Failed
        }
    }
}

async fn run_refresh_loop<S: SecretSource>(
    source: Arc<S>,
    shared: Arc<Shared>,
    policy: RefreshPolicy,
    generation: u64,
    token: CancellationToken,
) {
    // First tick completes immediately: that is the activation fetch.
    let mut ticker = interval(policy.refresh_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            biased;
            () = token.cancelled() => break,
            _ = ticker.tick() => {}
        }
        let outcome = tokio::select! {
            biased;
            () = token.cancelled() => break,
            outcome = fetch_once(source.as_ref(), &shared, &policy, generation) => outcome,
        };
        debug!(generation, ?outcome, "scheduled secret fetch finished");
    }
}

async fn run_countdown(shared: Arc<Shared>, generation: u64, token: CancellationToken) {
    let mut ticker = interval_at(Instant::now() + COUNTDOWN_STEP, COUNTDOWN_STEP);
    loop {
        tokio::select! {
            biased;
            () = token.cancelled() => break,
            _ = ticker.tick() => shared.tick_countdown(generation),
        }
    }
}
