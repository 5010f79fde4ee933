use std::collections::HashMap;

use super::source::RawProcess;

/// Processes at or below this share of both CPU and memory are hidden.
pub const NOISE_THRESHOLD_PERCENT: f64 = 0.1;

#[derive(Clone, Debug, PartialEq)]
pub struct ProcessEntry {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f64,
    pub mem_percent: f64,
}

impl ProcessEntry {
    /// Share of `system_cpu` attributed to this process, scaled by its
    /// fraction of the summed per-process CPU.
    pub fn relative_cpu(&self, total_process_cpu: f64, system_cpu: f64) -> f64 {
        if total_process_cpu > 0.0 {
            (self.cpu_percent / total_process_cpu) * system_cpu
        } else {
            0.0
        }
    }

    pub fn memory_mib(&self, memory_total: u64) -> f64 {
        (self.mem_percent / 100.0) * (memory_total as f64 / (1024.0 * 1024.0))
    }
}

#[derive(Clone, Debug, Default)]
pub struct ProcessSample {
    /// Visible processes, memory descending.
    pub entries: Vec<ProcessEntry>,
    pub total_cpu: f64,
    /// Names of every enumerated process, visible or not.
    pub names: HashMap<u32, String>,
}

pub fn sample_processes(raw: Vec<RawProcess>) -> ProcessSample {
    let mut entries = Vec::new();
    let mut total_cpu = 0.0;
    let mut names = HashMap::with_capacity(raw.len());

    for process in raw {
        let name = process.name.unwrap_or_default();
        let cpu_percent = process.cpu_percent.unwrap_or(0.0);
        let mem_percent = process.mem_percent.unwrap_or(0.0);
        names.insert(process.pid, name.clone());

        if mem_percent > NOISE_THRESHOLD_PERCENT || cpu_percent > NOISE_THRESHOLD_PERCENT {
            total_cpu += cpu_percent;
            entries.push(ProcessEntry {
                pid: process.pid,
                name,
                cpu_percent,
                mem_percent,
            });
        }
    }

    // Stable sort keeps enumeration order among equal memory shares.
    entries.sort_by(|a, b| b.mem_percent.total_cmp(&a.mem_percent));

    ProcessSample {
        entries,
        total_cpu,
        names,
    }
}
