use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use super::dns::DnsCache;
use super::source::RawConnection;

pub const CONNECTION_DISPLAY_LIMIT: usize = 50;

const UNKNOWN_PROCESS: &str = "N/A";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConnectionStatus {
    Established,
    SynSent,
    SynRecv,
    FinWait1,
    FinWait2,
    TimeWait,
    Close,
    CloseWait,
    LastAck,
    Listen,
    Closing,
    None,
}

impl ConnectionStatus {
    pub fn label(self) -> &'static str {
        match self {
            ConnectionStatus::Established => "ESTABLISHED",
            ConnectionStatus::SynSent => "SYN_SENT",
            ConnectionStatus::SynRecv => "SYN_RECV",
            ConnectionStatus::FinWait1 => "FIN_WAIT1",
            ConnectionStatus::FinWait2 => "FIN_WAIT2",
            ConnectionStatus::TimeWait => "TIME_WAIT",
            ConnectionStatus::Close => "CLOSE",
            ConnectionStatus::CloseWait => "CLOSE_WAIT",
            ConnectionStatus::LastAck => "LAST_ACK",
            ConnectionStatus::Listen => "LISTEN",
            ConnectionStatus::Closing => "CLOSING",
            ConnectionStatus::None => "NONE",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionEntry {
    pub pid: u32,
    pub process_name: String,
    pub local_address: String,
    /// Display host (resolved name or address) plus port.
    pub remote_address: String,
    pub remote_ip: IpAddr,
    pub status: ConnectionStatus,
}

/// Address as `host:port`, without IPv6 brackets.
pub fn format_host_port(host: &str, port: u16) -> String {
    format!("{host}:{port}")
}

/// Whether a raw socket is worth showing on the dashboard.
pub fn is_displayable(conn: &RawConnection) -> bool {
    if matches!(
        conn.status,
        ConnectionStatus::Listen | ConnectionStatus::None
    ) || conn.pid == 0
    {
        return false;
    }
    match conn.remote {
        Some(remote) => !remote.ip().to_canonical().is_loopback(),
        None => false,
    }
}

/// Established first, then process name, then pid.
pub fn display_order(a: &ConnectionEntry, b: &ConnectionEntry) -> Ordering {
    let a_est = a.status == ConnectionStatus::Established;
    let b_est = b.status == ConnectionStatus::Established;
    b_est
        .cmp(&a_est)
        .then_with(|| a.process_name.cmp(&b.process_name))
        .then_with(|| a.pid.cmp(&b.pid))
}

pub fn sample_connections(
    raw: Vec<RawConnection>,
    names: &HashMap<u32, String>,
    dns: &DnsCache,
) -> Vec<ConnectionEntry> {
    let mut entries: Vec<ConnectionEntry> = raw
        .into_iter()
        .filter(is_displayable)
        .filter_map(|conn| {
            let remote: SocketAddr = conn.remote?;
            let process_name = names
                .get(&conn.pid)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_PROCESS.to_string());
            let remote_host = dns.lookup(remote.ip());
            Some(ConnectionEntry {
                pid: conn.pid,
                process_name,
                local_address: format_host_port(&conn.local.ip().to_string(), conn.local.port()),
                remote_address: format_host_port(&remote_host, remote.port()),
                remote_ip: remote.ip(),
                status: conn.status,
            })
        })
        .collect();

    entries.sort_by(display_order);
    entries
}
