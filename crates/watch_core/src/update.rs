use crate::{
    text, Effect, FailureKind, Msg, NotifyPolicy, PeriodOption, ProbeFailure, WatchState,
};

/// Pure update function: applies an observation to state and returns any effects.
pub fn update(mut state: WatchState, msg: Msg) -> (WatchState, Vec<Effect>) {
    let effects = match (state.policy(), msg) {
        (NotifyPolicy::Edge, Msg::Observed(options)) => match top_marker(&options) {
            Some(marker) => edge_success(&mut state, &marker),
            None => edge_failure(&mut state, empty_failure(&options)),
        },
        (NotifyPolicy::Edge, Msg::ProbeFailed(failure)) => edge_failure(&mut state, failure),
        (NotifyPolicy::SeenSet, Msg::Observed(options)) => seen_set_success(&mut state, &options),
        (NotifyPolicy::SeenSet, Msg::ProbeFailed(_)) => {
            state.enter_error();
            Vec::new()
        }
    };

    (state, effects)
}

fn edge_success(state: &mut WatchState, marker: &str) -> Vec<Effect> {
    if state.clear_error() {
        let changed = state.record_marker(marker);
        state.take_startup();
        return vec![Effect::admin(text::recovered(marker, changed))];
    }

    if !state.record_marker(marker) {
        return Vec::new();
    }
    if state.take_startup() {
        vec![Effect::admin(text::startup_snapshot(marker))]
    } else {
        vec![Effect::public(text::new_period(marker))]
    }
}

fn edge_failure(state: &mut WatchState, failure: ProbeFailure) -> Vec<Effect> {
    if state.enter_error() {
        vec![Effect::admin(text::site_failure(&failure))]
    } else {
        Vec::new()
    }
}

fn seen_set_success(state: &mut WatchState, options: &[PeriodOption]) -> Vec<Effect> {
    let listed: Vec<&PeriodOption> = options.iter().filter(|o| !o.value.is_empty()).collect();
    if listed.is_empty() {
        state.enter_error();
        return Vec::new();
    }
    state.clear_error();
    if let Some(marker) = top_marker(options) {
        state.record_marker(&marker);
    }

    listed
        .into_iter()
        .filter(|option| state.mark_seen(&option.value))
        .map(|option| Effect::public(text::new_period(option.display())))
        .collect()
}

fn top_marker(options: &[PeriodOption]) -> Option<String> {
    options
        .first()
        .map(|option| option.label.trim())
        .filter(|label| !label.is_empty())
        .map(ToOwned::to_owned)
}

fn empty_failure(options: &[PeriodOption]) -> ProbeFailure {
    if options.is_empty() {
        ProbeFailure::new(FailureKind::MissingSelector, "no period options")
    } else {
        ProbeFailure::new(FailureKind::Empty, "first period option has no text")
    }
}
