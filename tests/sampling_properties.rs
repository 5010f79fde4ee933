use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use proptest::prelude::*;
use pulsetop::system::connection::{ConnectionStatus, sample_connections};
use pulsetop::system::dns::DnsCache;
use pulsetop::system::network::throughput;
use pulsetop::system::process::{NOISE_THRESHOLD_PERCENT, sample_processes};
use pulsetop::system::source::{MetricsError, NetworkCounters, RawConnection, RawProcess};

fn status_strategy() -> impl Strategy<Value = ConnectionStatus> {
    prop_oneof![
        Just(ConnectionStatus::Established),
        Just(ConnectionStatus::SynSent),
        Just(ConnectionStatus::TimeWait),
        Just(ConnectionStatus::CloseWait),
        Just(ConnectionStatus::Listen),
        Just(ConnectionStatus::None),
    ]
}

fn raw_process_strategy() -> impl Strategy<Value = RawProcess> {
    (
        1u32..10_000,
        prop::option::of("[a-z]{1,8}"),
        prop::option::of(0.0f64..50.0),
        prop::option::of(0.0f64..50.0),
    )
        .prop_map(|(pid, name, cpu_percent, mem_percent)| RawProcess {
            pid,
            name,
            cpu_percent,
            mem_percent,
        })
}

fn raw_connection_strategy() -> impl Strategy<Value = RawConnection> {
    (
        0u32..6,
        status_strategy(),
        prop::option::of((any::<[u8; 4]>(), 1u16..65535)),
    )
        .prop_map(|(pid, status, remote)| RawConnection {
            pid,
            local: SocketAddr::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2)), 40000),
            remote: remote.map(|(octets, port)| SocketAddr::new(IpAddr::V4(Ipv4Addr::from(octets)), port)),
            status,
        })
}

proptest! {
    #[test]
    fn visible_processes_pass_the_noise_filter(
        raw in prop::collection::vec(raw_process_strategy(), 0..200),
    ) {
        let sample = sample_processes(raw);
        for entry in &sample.entries {
            prop_assert!(
                entry.mem_percent > NOISE_THRESHOLD_PERCENT
                    || entry.cpu_percent > NOISE_THRESHOLD_PERCENT,
                "pid {} should have been filtered", entry.pid
            );
        }
    }

    #[test]
    fn visible_processes_are_memory_descending(
        raw in prop::collection::vec(raw_process_strategy(), 0..200),
    ) {
        let sample = sample_processes(raw);
        for pair in sample.entries.windows(2) {
            prop_assert!(pair[0].mem_percent >= pair[1].mem_percent);
        }
    }

    #[test]
    fn total_cpu_sums_only_visible_processes(
        raw in prop::collection::vec(raw_process_strategy(), 0..200),
    ) {
        let expected: f64 = raw
            .iter()
            .map(|p| (p.cpu_percent.unwrap_or(0.0), p.mem_percent.unwrap_or(0.0)))
            .filter(|&(cpu, mem)| mem > NOISE_THRESHOLD_PERCENT || cpu > NOISE_THRESHOLD_PERCENT)
            .map(|(cpu, _)| cpu)
            .sum();
        let sample = sample_processes(raw);
        prop_assert!((sample.total_cpu - expected).abs() < 1e-6);

        let visible: f64 = sample.entries.iter().map(|e| e.cpu_percent).sum();
        prop_assert!((sample.total_cpu - visible).abs() < 1e-6);
    }

    #[test]
    fn hidden_connections_never_appear(
        raw in prop::collection::vec(raw_connection_strategy(), 0..100),
    ) {
        let (dns, _worker) = DnsCache::with_capacity(1024);
        let entries = sample_connections(raw, &HashMap::new(), &dns);
        for entry in &entries {
            prop_assert!(entry.pid != 0);
            prop_assert!(!matches!(entry.status, ConnectionStatus::Listen | ConnectionStatus::None));
            prop_assert!(!entry.remote_ip.is_loopback());
            prop_assert_eq!(entry.process_name.as_str(), "N/A");
        }
    }

    #[test]
    fn established_connections_come_first(
        raw in prop::collection::vec(raw_connection_strategy(), 0..100),
    ) {
        let (dns, _worker) = DnsCache::with_capacity(1024);
        let names: HashMap<u32, String> =
            (1..6).map(|pid| (pid, format!("proc{}", 6 - pid))).collect();
        let entries = sample_connections(raw, &names, &dns);
        for pair in entries.windows(2) {
            let a_est = pair[0].status == ConnectionStatus::Established;
            let b_est = pair[1].status == ConnectionStatus::Established;
            prop_assert!(a_est || !b_est);
            if a_est == b_est {
                prop_assert!(
                    (pair[0].process_name.as_str(), pair[0].pid)
                        <= (pair[1].process_name.as_str(), pair[1].pid)
                );
            }
        }
    }

    #[test]
    fn throughput_is_delta_over_interval(
        base_rx in 0u64..1 << 40,
        base_tx in 0u64..1 << 40,
        delta_rx in 0u64..1 << 30,
        delta_tx in 0u64..1 << 30,
        secs in 1u64..10,
    ) {
        let baseline = NetworkCounters { bytes_received: base_rx, bytes_sent: base_tx };
        let current = NetworkCounters {
            bytes_received: base_rx + delta_rx,
            bytes_sent: base_tx + delta_tx,
        };
        let (rates, next) = throughput(Ok(current), baseline, Duration::from_secs(secs));
        let expected_down = delta_rx as f64 / 1024.0 / secs as f64;
        let expected_up = delta_tx as f64 / 1024.0 / secs as f64;
        prop_assert!((rates.download_kbps - expected_down).abs() < 1e-6);
        prop_assert!((rates.upload_kbps - expected_up).abs() < 1e-6);
        prop_assert_eq!(next, current);
    }

    #[test]
    fn failed_counter_read_keeps_baseline(
        base_rx in any::<u64>(),
        base_tx in any::<u64>(),
    ) {
        let baseline = NetworkCounters { bytes_received: base_rx, bytes_sent: base_tx };
        let (rates, next) = throughput(
            Err(MetricsError::Unavailable("network counters")),
            baseline,
            Duration::from_secs(2),
        );
        prop_assert_eq!(rates.download_kbps, 0.0);
        prop_assert_eq!(rates.upload_kbps, 0.0);
        prop_assert_eq!(next, baseline);
    }
}
