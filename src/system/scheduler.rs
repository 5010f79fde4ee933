use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use chrono::Local;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::connection::sample_connections;
use super::dns::DnsCache;
use super::network::throughput;
use super::process::sample_processes;
use super::snapshot::Snapshot;
use super::source::{MetricsError, MetricsSource, NetworkCounters, VirtualMemory};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);

/// Produces one [`Snapshot`] per call. Owns the network baseline, which is
/// never shared outside the sampling loop.
pub struct Sampler<S> {
    source: S,
    dns: DnsCache,
    baseline: NetworkCounters,
    interval: Duration,
}

impl<S: MetricsSource> Sampler<S> {
    pub fn new(mut source: S, dns: DnsCache, interval: Duration) -> Self {
        let baseline = or_default(source.network_counters(), "network counters");
        Sampler {
            source,
            dns,
            baseline,
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn sample(&mut self) -> Snapshot {
        let _tick_span = tracing::debug_span!("scheduler.tick").entered();

        let cpu_usage_percent = or_default(self.source.cpu_percent(), "cpu usage");
        let memory: VirtualMemory = or_default(self.source.virtual_memory(), "virtual memory");

        let counters = self.source.network_counters();
        if let Err(err) = &counters {
            tracing::warn!(error = %err, "network counters fetch failed");
        }
        let (rates, baseline) = throughput(counters, self.baseline, self.interval);
        self.baseline = baseline;

        let processes = sample_processes(or_default(self.source.processes(), "processes"));
        let connections = sample_connections(
            or_default(self.source.inet_connections(), "connections"),
            &processes.names,
            &self.dns,
        );

        Snapshot {
            cpu_usage_percent,
            memory_used: memory.used,
            memory_total: memory.total,
            memory_available: memory.available,
            memory_used_percent: memory.used_percent,
            download_rate_kbps: rates.download_kbps,
            upload_rate_kbps: rates.upload_kbps,
            timestamp: Local::now(),
            processes: processes.entries,
            total_process_cpu: processes.total_cpu,
            connections,
        }
    }
}

fn or_default<T: Default>(result: Result<T, MetricsError>, what: &'static str) -> T {
    result.unwrap_or_else(|err| {
        tracing::warn!(metric = what, error = %err, "metric fetch failed");
        T::default()
    })
}

/// Runs `sampler` every interval and posts each snapshot to `tx`.
///
/// Sampling runs on the blocking pool so slow system calls never stall the
/// UI task. The loop ends when the receiver is dropped.
pub fn spawn_scheduler<S>(sampler: Sampler<S>, tx: mpsc::UnboundedSender<Snapshot>) -> JoinHandle<()>
where
    S: MetricsSource + Send + 'static,
{
    tokio::spawn(async move {
        let mut sampler = sampler;
        let mut ticker = tokio::time::interval(sampler.interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; the baseline needs a full interval.
        ticker.tick().await;
        tracing::info!(interval_ms = sampler.interval().as_millis() as u64, "sampling loop started");

        loop {
            ticker.tick().await;
            let joined = tokio::task::spawn_blocking(move || {
                let snapshot = panic::catch_unwind(AssertUnwindSafe(|| sampler.sample()));
                (sampler, snapshot)
            })
            .await;

            let snapshot = match joined {
                Ok((returned, Ok(snapshot))) => {
                    sampler = returned;
                    snapshot
                }
                Ok((returned, Err(_))) => {
                    // The sampler outlives a panicking tick; only that tick is lost.
                    tracing::error!("sampling tick panicked");
                    sampler = returned;
                    continue;
                }
                Err(err) => {
                    tracing::error!(error = %err, "sampling task failed");
                    break;
                }
            };

            if tx.send(snapshot).is_err() {
                break;
            }
        }
        tracing::info!("sampling loop stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::connection::ConnectionStatus;
    use crate::system::source::{RawConnection, RawProcess};
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};

    #[derive(Default)]
    struct FakeSource {
        counters: Vec<Result<NetworkCounters, ()>>,
        fail_cpu: bool,
        fail_processes: bool,
        panicking_ticks: usize,
    }

    impl MetricsSource for FakeSource {
        fn cpu_percent(&mut self) -> Result<f64, MetricsError> {
            if self.panicking_ticks > 0 {
                self.panicking_ticks -= 1;
                panic!("cpu backend crashed");
            }
            if self.fail_cpu {
                Err(MetricsError::Unavailable("cpu"))
            } else {
                Ok(37.5)
            }
        }

        fn virtual_memory(&mut self) -> Result<VirtualMemory, MetricsError> {
            Ok(VirtualMemory {
                used: 4,
                total: 16,
                available: 12,
                used_percent: 25.0,
            })
        }

        fn network_counters(&mut self) -> Result<NetworkCounters, MetricsError> {
            if self.counters.is_empty() {
                return Err(MetricsError::Unavailable("network counters"));
            }
            self.counters
                .remove(0)
                .map_err(|_| MetricsError::Unavailable("network counters"))
        }

        fn processes(&mut self) -> Result<Vec<RawProcess>, MetricsError> {
            if self.fail_processes {
                return Err(MetricsError::Unavailable("processes"));
            }
            Ok(vec![
                RawProcess {
                    pid: 1,
                    name: Some("init".into()),
                    cpu_percent: Some(0.0),
                    mem_percent: Some(0.05),
                },
                RawProcess {
                    pid: 2,
                    name: Some("browser".into()),
                    cpu_percent: Some(1.0),
                    mem_percent: Some(5.0),
                },
                RawProcess {
                    pid: 3,
                    name: Some("db".into()),
                    cpu_percent: Some(0.0),
                    mem_percent: Some(10.0),
                },
            ])
        }

        fn inet_connections(&mut self) -> Result<Vec<RawConnection>, MetricsError> {
            Ok(vec![RawConnection {
                pid: 1,
                local: SocketAddr::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2)), 40000),
                remote: Some(SocketAddr::new(
                    IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7)),
                    443,
                )),
                status: ConnectionStatus::Established,
            }])
        }
    }

    fn counters(received: u64, sent: u64) -> Result<NetworkCounters, ()> {
        Ok(NetworkCounters {
            bytes_received: received,
            bytes_sent: sent,
        })
    }

    #[test]
    fn sample_assembles_every_section() {
        let (dns, _worker) = DnsCache::new();
        let source = FakeSource {
            counters: vec![counters(0, 0), counters(2048, 4096)],
            ..Default::default()
        };
        let mut sampler = Sampler::new(source, dns, Duration::from_secs(2));
        let snapshot = sampler.sample();

        assert_eq!(snapshot.cpu_usage_percent, 37.5);
        assert_eq!(snapshot.memory_total, 16);
        assert_eq!(snapshot.memory_available, 12);
        assert!((snapshot.download_rate_kbps - 1.0).abs() < 1e-9);
        assert!((snapshot.upload_rate_kbps - 2.0).abs() < 1e-9);
        let pids: Vec<u32> = snapshot.processes.iter().map(|p| p.pid).collect();
        assert_eq!(pids, vec![3, 2]);
        assert!((snapshot.total_process_cpu - 1.0).abs() < 1e-9);
        // pid 1 is hidden from the process list but still names its socket.
        assert_eq!(snapshot.connections.len(), 1);
        assert_eq!(snapshot.connections[0].process_name, "init");
        assert_eq!(snapshot.connections[0].remote_address, "203.0.113.7:443");
    }

    #[test]
    fn failed_fetches_degrade_to_defaults() {
        let (dns, _worker) = DnsCache::new();
        let source = FakeSource {
            counters: vec![counters(1000, 1000), Err(()), counters(3048, 1000)],
            fail_cpu: true,
            fail_processes: true,
            ..Default::default()
        };
        let mut sampler = Sampler::new(source, dns, Duration::from_secs(2));

        let first = sampler.sample();
        assert_eq!(first.cpu_usage_percent, 0.0);
        assert!(first.processes.is_empty());
        assert_eq!(first.download_rate_kbps, 0.0);
        assert_eq!(first.connections[0].process_name, "N/A");

        let second = sampler.sample();
        assert!((second.download_rate_kbps - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn scheduler_posts_snapshots_until_receiver_drops() {
        let (dns, _worker) = DnsCache::new();
        let source = FakeSource {
            counters: vec![counters(0, 0)],
            ..Default::default()
        };
        let sampler = Sampler::new(source, dns, Duration::from_millis(10));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = spawn_scheduler(sampler, tx);

        for _ in 0..2 {
            let snapshot = tokio::time::timeout(Duration::from_secs(5), rx.recv())
                .await
                .expect("timed out waiting for snapshot")
                .expect("scheduler stopped early");
            assert_eq!(snapshot.processes.len(), 2);
        }

        drop(rx);
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("scheduler did not stop")
            .unwrap();
    }

    #[tokio::test]
    async fn panicking_tick_does_not_stop_the_loop() {
        let (dns, _worker) = DnsCache::new();
        let source = FakeSource {
            counters: vec![counters(0, 0)],
            panicking_ticks: 2,
            ..Default::default()
        };
        let sampler = Sampler::new(source, dns, Duration::from_millis(10));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _handle = spawn_scheduler(sampler, tx);

        let snapshot = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for snapshot")
            .expect("scheduler stopped after a panicking tick");
        assert_eq!(snapshot.cpu_usage_percent, 37.5);
    }
}
