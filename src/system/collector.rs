use sysinfo::{Networks, ProcessRefreshKind, ProcessesToUpdate, System};

use super::platform;
use super::source::{
    MetricsError, MetricsSource, NetworkCounters, RawConnection, RawProcess, VirtualMemory,
};

/// [`MetricsSource`] backed by `sysinfo`, with socket enumeration from the
/// platform layer.
pub struct Collector {
    sys: System,
    networks: Networks,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu_usage();
        sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_memory().with_cpu(),
        );
        Collector {
            sys,
            networks: Networks::new_with_refreshed_list(),
        }
    }
}

impl MetricsSource for Collector {
    fn cpu_percent(&mut self) -> Result<f64, MetricsError> {
        self.sys.refresh_cpu_usage();
        if self.sys.cpus().is_empty() {
            return Err(MetricsError::Unavailable("cpu usage"));
        }
        Ok(self.sys.global_cpu_usage() as f64)
    }

    fn virtual_memory(&mut self) -> Result<VirtualMemory, MetricsError> {
        self.sys.refresh_memory();
        let total = self.sys.total_memory();
        if total == 0 {
            return Err(MetricsError::Unavailable("virtual memory"));
        }
        let used = self.sys.used_memory();
        Ok(VirtualMemory {
            used,
            total,
            available: self.sys.available_memory(),
            used_percent: used as f64 / total as f64 * 100.0,
        })
    }

    fn network_counters(&mut self) -> Result<NetworkCounters, MetricsError> {
        self.networks.refresh(true);
        if self.networks.list().is_empty() {
            return Err(MetricsError::Unavailable("network counters"));
        }
        let mut counters = NetworkCounters::default();
        for data in self.networks.list().values() {
            counters.bytes_received = counters.bytes_received.wrapping_add(data.total_received());
            counters.bytes_sent = counters.bytes_sent.wrapping_add(data.total_transmitted());
        }
        Ok(counters)
    }

    fn processes(&mut self) -> Result<Vec<RawProcess>, MetricsError> {
        self.sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_memory().with_cpu(),
        );
        let total_memory = self.sys.total_memory();

        let mut processes: Vec<RawProcess> = self
            .sys
            .processes()
            .iter()
            .map(|(pid, process)| {
                let name = process.name().to_string_lossy().to_string();
                let mem_percent = (total_memory > 0)
                    .then(|| process.memory() as f64 / total_memory as f64 * 100.0);
                RawProcess {
                    pid: pid.as_u32(),
                    name: (!name.is_empty()).then_some(name),
                    cpu_percent: Some(process.cpu_usage() as f64),
                    mem_percent,
                }
            })
            .collect();
        processes.sort_unstable_by_key(|p| p.pid);
        Ok(processes)
    }

    fn inet_connections(&mut self) -> Result<Vec<RawConnection>, MetricsError> {
        platform::inet_connections()
    }
}
