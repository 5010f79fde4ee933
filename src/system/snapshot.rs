use chrono::{DateTime, Local};

use super::connection::ConnectionEntry;
use super::process::ProcessEntry;

/// One tick of fully assembled metrics. Never mutated after construction.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub cpu_usage_percent: f64,
    pub memory_used: u64,
    pub memory_total: u64,
    pub memory_available: u64,
    pub memory_used_percent: f64,
    pub download_rate_kbps: f64,
    pub upload_rate_kbps: f64,
    pub timestamp: DateTime<Local>,
    pub processes: Vec<ProcessEntry>,
    pub total_process_cpu: f64,
    pub connections: Vec<ConnectionEntry>,
}
