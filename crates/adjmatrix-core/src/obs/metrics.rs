use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// ReduceCounters
/// Ephemeral, in-memory counters for reduce calls.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ReduceCounters {
    // Entrypoints
    pub reduce_calls: u64,
    pub partial_reduces: u64,
    pub final_reduces: u64,

    // Volume
    pub partitions_merged: u64,
    pub buckets_in: u64,
    pub buckets_out: u64,
    pub zero_filled_buckets: u64,

    // Largest single reduce output
    pub max_buckets_out: u64,

    pub rejected_reduces: u64,
}

///
/// EventState
///

#[derive(Clone, Debug, Default)]
pub(crate) struct EventState {
    pub(crate) counters: ReduceCounters,
    pub(crate) rejections: BTreeMap<String, u64>,
}

///
/// EventReport
/// Point-in-time copy of reduce telemetry; rejections keyed by error class.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventReport {
    pub counters: ReduceCounters,
    pub rejections: BTreeMap<String, u64>,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

/// Copy the current state into a report.
pub(crate) fn report() -> EventReport {
    with_state(|m| EventReport {
        counters: m.counters.clone(),
        rejections: m.rejections.clone(),
    })
}
