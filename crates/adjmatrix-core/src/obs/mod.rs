//! Observability: reduce telemetry and the sink boundary it flows through.
//!
//! Reduce logic never touches `metrics` directly; every event goes through
//! `sink::record`.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventReport, ReduceCounters};
pub use sink::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink};
