use std::net::SocketAddr;

use thiserror::Error;

use super::connection::ConnectionStatus;

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("i/o error while reading metrics: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0} is unavailable")]
    Unavailable(&'static str),
    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),
    #[error("platform query failed: {0}")]
    Platform(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VirtualMemory {
    pub used: u64,
    pub total: u64,
    pub available: u64,
    pub used_percent: f64,
}

/// Cumulative byte counters summed over every interface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NetworkCounters {
    pub bytes_received: u64,
    pub bytes_sent: u64,
}

/// One enumerated process. `None` marks an attribute that could not be read.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawProcess {
    pub pid: u32,
    pub name: Option<String>,
    pub cpu_percent: Option<f64>,
    pub mem_percent: Option<f64>,
}

/// One enumerated inet socket. `pid` is 0 when no owner could be found.
#[derive(Clone, Debug, PartialEq)]
pub struct RawConnection {
    pub pid: u32,
    pub local: SocketAddr,
    pub remote: Option<SocketAddr>,
    pub status: ConnectionStatus,
}

/// Host metrics consumed by the sampling loop.
///
/// Methods take `&mut self` because most backends refresh cached state
/// before answering.
pub trait MetricsSource {
    fn cpu_percent(&mut self) -> Result<f64, MetricsError>;
    fn virtual_memory(&mut self) -> Result<VirtualMemory, MetricsError>;
    fn network_counters(&mut self) -> Result<NetworkCounters, MetricsError>;
    fn processes(&mut self) -> Result<Vec<RawProcess>, MetricsError>;
    fn inet_connections(&mut self) -> Result<Vec<RawConnection>, MetricsError>;
}
