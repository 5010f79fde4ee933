use super::source::{MetricsError, RawConnection};

pub trait SocketTable {
    /// Every TCP/UDP socket over IPv4 and IPv6 with its owning pid.
    fn inet_connections() -> Result<Vec<RawConnection>, MetricsError>;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(not(target_os = "linux"))]
mod unsupported;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(not(target_os = "linux"))]
use unsupported as platform_impl;

pub fn inet_connections() -> Result<Vec<RawConnection>, MetricsError> {
    platform_impl::Platform::inet_connections()
}
