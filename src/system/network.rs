use std::time::Duration;

use super::source::{MetricsError, NetworkCounters};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Throughput {
    pub download_kbps: f64,
    pub upload_kbps: f64,
}

/// Rates since `baseline` plus the baseline to use next tick.
///
/// Deltas are not clamped: a counter that went backwards (interface reset)
/// yields a negative rate for one tick. When counters are unavailable the
/// rates are zero and the old baseline is kept.
pub fn throughput(
    current: Result<NetworkCounters, MetricsError>,
    baseline: NetworkCounters,
    interval: Duration,
) -> (Throughput, NetworkCounters) {
    let Ok(current) = current else {
        return (Throughput::default(), baseline);
    };
    let seconds = interval.as_secs_f64();
    if seconds <= 0.0 {
        return (Throughput::default(), current);
    }

    let rate = |now: u64, before: u64| (now as f64 - before as f64) / 1024.0 / seconds;
    let rates = Throughput {
        download_kbps: rate(current.bytes_received, baseline.bytes_received),
        upload_kbps: rate(current.bytes_sent, baseline.bytes_sent),
    };
    (rates, current)
}
