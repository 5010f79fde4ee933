use std::collections::HashMap;
use std::net::SocketAddr;

use procfs::net::TcpState;
use procfs::process::{FDTarget, all_processes};

use super::SocketTable;
use crate::system::connection::ConnectionStatus;
use crate::system::source::{MetricsError, RawConnection};

pub struct Platform;

impl SocketTable for Platform {
    fn inet_connections() -> Result<Vec<RawConnection>, MetricsError> {
        let owners = socket_owners()?;
        let mut connections = Vec::new();

        for entry in procfs::net::tcp().map_err(platform_error)? {
            connections.push(raw_connection(
                entry.local_address,
                entry.remote_address,
                tcp_status(&entry.state),
                entry.inode,
                &owners,
            ));
        }
        // tcp6/udp6 are missing when IPv6 is disabled.
        for entry in procfs::net::tcp6().unwrap_or_default() {
            connections.push(raw_connection(
                entry.local_address,
                entry.remote_address,
                tcp_status(&entry.state),
                entry.inode,
                &owners,
            ));
        }
        let udp = procfs::net::udp()
            .map_err(platform_error)?
            .into_iter()
            .chain(procfs::net::udp6().unwrap_or_default());
        for entry in udp {
            connections.push(raw_connection(
                entry.local_address,
                entry.remote_address,
                ConnectionStatus::None,
                entry.inode,
                &owners,
            ));
        }

        Ok(connections)
    }
}

fn platform_error(err: procfs::ProcError) -> MetricsError {
    MetricsError::Platform(Box::new(err))
}

/// Socket inode to owning pid. Processes we may not inspect are skipped,
/// leaving their sockets unowned.
fn socket_owners() -> Result<HashMap<u64, u32>, MetricsError> {
    let mut owners = HashMap::new();
    for process in all_processes().map_err(platform_error)?.flatten() {
        let Ok(pid) = u32::try_from(process.pid()) else {
            continue;
        };
        let Ok(fds) = process.fd() else {
            continue;
        };
        for fd in fds.flatten() {
            if let FDTarget::Socket(inode) = fd.target {
                owners.entry(inode).or_insert(pid);
            }
        }
    }
    Ok(owners)
}

/// An unconnected socket reports the unspecified address with port 0 as its
/// peer; that counts as no remote address.
fn raw_connection(
    local: SocketAddr,
    remote: SocketAddr,
    status: ConnectionStatus,
    inode: u64,
    owners: &HashMap<u64, u32>,
) -> RawConnection {
    let remote = (!(remote.ip().is_unspecified() && remote.port() == 0)).then_some(remote);
    RawConnection {
        pid: owners.get(&inode).copied().unwrap_or(0),
        local,
        remote,
        status,
    }
}

fn tcp_status(state: &TcpState) -> ConnectionStatus {
    match state {
        TcpState::Established => ConnectionStatus::Established,
        TcpState::SynSent => ConnectionStatus::SynSent,
        TcpState::SynRecv | TcpState::NewSynRecv => ConnectionStatus::SynRecv,
        TcpState::FinWait1 => ConnectionStatus::FinWait1,
        TcpState::FinWait2 => ConnectionStatus::FinWait2,
        TcpState::TimeWait => ConnectionStatus::TimeWait,
        TcpState::Close => ConnectionStatus::Close,
        TcpState::CloseWait => ConnectionStatus::CloseWait,
        TcpState::LastAck => ConnectionStatus::LastAck,
        TcpState::Listen => ConnectionStatus::Listen,
        TcpState::Closing => ConnectionStatus::Closing,
        #[allow(unreachable_patterns)]
        _ => ConnectionStatus::None,
    }
}
