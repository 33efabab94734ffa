use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use watch_core::{
    update, FailureKind, Msg, NotifyPolicy, PeriodOption, ProbeFailure, WatchState, WatchView,
};
use watch_engine::{ExtractError, ExtractedPeriod, PageProbe, ProbeError};
use watch_logging::{watch_info, watch_warn};

use crate::effects::EffectRunner;

/// Owns the watch state; nothing else reads or writes it.
pub struct Detector {
    state: WatchState,
    probe: PageProbe,
    runner: Arc<EffectRunner>,
}

impl Detector {
    pub fn new(policy: NotifyPolicy, probe: PageProbe, runner: Arc<EffectRunner>) -> Self {
        Self {
            state: WatchState::new(policy),
            probe,
            runner,
        }
    }

    pub fn view(&self) -> WatchView {
        self.state.view()
    }

    /// One fetch-parse-compare-notify cycle.
    pub async fn tick(&mut self) {
        let msg = observation_msg(self.probe.observe().await);
        if let Msg::ProbeFailed(failure) = &msg {
            watch_warn!("Probe of {} failed: {}", self.probe.url(), failure);
        }

        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            watch_info!("Watch state changed: {:?}", state.view());
        }
        self.state = state;

        self.runner.run(effects).await;
    }

    /// Ticks immediately, then every `interval`, until `shutdown` fires.
    pub async fn run(mut self, interval: Duration, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => self.tick().await,
            }
        }
        watch_info!("Detector stopped");
    }
}

/// Turns a probe result into the message the core understands.
pub fn observation_msg(result: Result<Vec<ExtractedPeriod>, ProbeError>) -> Msg {
    match result {
        Ok(options) => Msg::Observed(
            options
                .into_iter()
                .map(|option| PeriodOption::new(option.value.unwrap_or_default(), option.label))
                .collect(),
        ),
        Err(err) => Msg::ProbeFailed(probe_failure(&err)),
    }
}

fn probe_failure(err: &ProbeError) -> ProbeFailure {
    let kind = match err {
        ProbeError::Fetch(_) => FailureKind::Transport,
        ProbeError::Decode(_) => FailureKind::Parse,
        ProbeError::Extract(ExtractError::InvalidSelector { .. }) => FailureKind::Parse,
        ProbeError::Extract(ExtractError::MissingSelector(_)) => FailureKind::MissingSelector,
        ProbeError::Extract(ExtractError::NoOptions(_)) => FailureKind::Empty,
    };
    let detail = match err {
        ProbeError::Fetch(inner) => inner.to_string(),
        ProbeError::Decode(inner) => inner.to_string(),
        ProbeError::Extract(inner) => inner.to_string(),
    };
    ProbeFailure::new(kind, detail)
}
