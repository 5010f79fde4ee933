use super::SocketTable;
use crate::system::source::{MetricsError, RawConnection};

pub struct Platform;

impl SocketTable for Platform {
    fn inet_connections() -> Result<Vec<RawConnection>, MetricsError> {
        Err(MetricsError::Unsupported("connection enumeration"))
    }
}
