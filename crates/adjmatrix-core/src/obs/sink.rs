//! Metrics sink boundary.
//!
//! All reduce instrumentation flows through `MetricsEvent` and `MetricsSink`.
//! This module is the only bridge between reduce logic and the global
//! metrics state.

use crate::{error::ErrorClass, obs::metrics, reduce::ReducePhase};
use std::cell::RefCell;

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<*const dyn MetricsSink>> = const { RefCell::new(None) };
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    ReduceStart {
        phase: ReducePhase,
        partitions: u64,
    },
    ReduceFinish {
        phase: ReducePhase,
        buckets_in: u64,
        buckets_out: u64,
    },
    ZeroFilled {
        buckets: u64,
    },
    ReduceRejected {
        class: ErrorClass,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default thread-local sink; used whenever no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::ReduceStart { phase, partitions } => {
                metrics::with_state_mut(|m| {
                    let c = &mut m.counters;
                    c.reduce_calls = c.reduce_calls.saturating_add(1);
                    match phase {
                        ReducePhase::Partial => {
                            c.partial_reduces = c.partial_reduces.saturating_add(1);
                        }
                        ReducePhase::Final => {
                            c.final_reduces = c.final_reduces.saturating_add(1);
                        }
                    }
                    c.partitions_merged = c.partitions_merged.saturating_add(partitions);
                });
            }

            MetricsEvent::ReduceFinish {
                buckets_in,
                buckets_out,
                ..
            } => {
                metrics::with_state_mut(|m| {
                    let c = &mut m.counters;
                    c.buckets_in = c.buckets_in.saturating_add(buckets_in);
                    c.buckets_out = c.buckets_out.saturating_add(buckets_out);
                    c.max_buckets_out = c.max_buckets_out.max(buckets_out);
                });
            }

            MetricsEvent::ZeroFilled { buckets } => {
                metrics::with_state_mut(|m| {
                    m.counters.zero_filled_buckets =
                        m.counters.zero_filled_buckets.saturating_add(buckets);
                });
            }

            MetricsEvent::ReduceRejected { class } => {
                metrics::with_state_mut(|m| {
                    m.counters.rejected_reduces = m.counters.rejected_reduces.saturating_add(1);
                    let entry = m.rejections.entry(class.to_string()).or_default();
                    *entry = entry.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    let override_ptr = SINK_OVERRIDE.with(|cell| *cell.borrow());
    if let Some(ptr) = override_ptr {
        // SAFETY:
        // - `ptr` comes from a live `&dyn MetricsSink` installed by `with_metrics_sink`,
        //   which restores the previous slot on every exit, including unwind.
        // - `record` is synchronous and never keeps `ptr` past this call.
        // - Only a shared reference is materialized, matching the installing borrow.
        unsafe { (&*ptr).record(event) };
    } else {
        GLOBAL_METRICS_SINK.record(event);
    }
}

/// Snapshot the current thread's reduce metrics.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset the current thread's reduce metrics.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with every reduce event routed to `sink`.
pub fn with_metrics_sink<T>(sink: &dyn MetricsSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<*const dyn MetricsSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0;
            });
        }
    }

    // SAFETY:
    // - The erased pointer is installed only for this dynamic scope and
    //   `Guard` restores the previous slot on all exits.
    // - `record` dereferences it synchronously and never persists it.
    let sink_ptr = unsafe { std::mem::transmute::<&dyn MetricsSink, *const dyn MetricsSink>(sink) };
    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink_ptr));
    let _guard = Guard(prev);

    f()
}

/// ReduceSpan
/// RAII guard that emits start/finish events for one reduce call.
/// Finish accounting happens even on unwind.

pub(crate) struct ReduceSpan {
    phase: ReducePhase,
    buckets_in: u64,
    buckets_out: u64,
}

impl ReduceSpan {
    /// Start a metrics span for one reduce over `partitions` inputs.
    #[must_use]
    pub(crate) fn new(phase: ReducePhase, partitions: usize) -> Self {
        record(MetricsEvent::ReduceStart {
            phase,
            partitions: partitions as u64,
        });

        Self {
            phase,
            buckets_in: 0,
            buckets_out: 0,
        }
    }

    pub(crate) const fn set_buckets_in(&mut self, buckets: u64) {
        self.buckets_in = buckets;
    }

    pub(crate) const fn set_buckets_out(&mut self, buckets: usize) {
        self.buckets_out = buckets as u64;
    }
}

impl Drop for ReduceSpan {
    fn drop(&mut self) {
        record(MetricsEvent::ReduceFinish {
            phase: self.phase,
            buckets_in: self.buckets_in,
            buckets_out: self.buckets_out,
        });
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::CapturingSink;

    #[test]
    fn override_sink_captures_events_and_is_restored() {
        metrics_reset_all();
        let sink = CapturingSink::default();

        with_metrics_sink(&sink, || {
            record(MetricsEvent::ZeroFilled { buckets: 3 });
        });
        record(MetricsEvent::ZeroFilled { buckets: 2 });

        assert_eq!(
            sink.events().as_slice(),
            &[MetricsEvent::ZeroFilled { buckets: 3 }]
        );
        assert_eq!(metrics_report().counters.zero_filled_buckets, 2);
    }

    #[test]
    fn span_records_start_and_finish_on_drop() {
        let sink = CapturingSink::default();

        with_metrics_sink(&sink, || {
            let mut span = ReduceSpan::new(ReducePhase::Final, 2);
            span.set_buckets_in(5);
            span.set_buckets_out(3);
        });

        assert_eq!(
            sink.events().as_slice(),
            &[
                MetricsEvent::ReduceStart {
                    phase: ReducePhase::Final,
                    partitions: 2,
                },
                MetricsEvent::ReduceFinish {
                    phase: ReducePhase::Final,
                    buckets_in: 5,
                    buckets_out: 3,
                },
            ]
        );
    }

    #[test]
    fn global_sink_tracks_rejections_by_class() {
        metrics_reset_all();

        record(MetricsEvent::ReduceRejected {
            class: ErrorClass::InvariantViolation,
        });
        record(MetricsEvent::ReduceRejected {
            class: ErrorClass::InvariantViolation,
        });

        let report = metrics_report();
        assert_eq!(report.counters.rejected_reduces, 2);
        assert_eq!(report.rejections.get("invariant_violation"), Some(&2));
    }
}
