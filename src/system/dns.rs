//! Non-blocking reverse-DNS cache.
//!
//! A lookup never waits on the network: unseen addresses get a placeholder
//! (the address itself) and are queued for a single background resolver
//! thread. Entries are never evicted, so memory grows with the number of
//! distinct remote hosts seen during a session.

use std::collections::HashMap;
use std::io;
use std::net::IpAddr;
use std::sync::{Arc, PoisonError, RwLock};
use std::thread;

use tokio::sync::mpsc;

pub const LOOKUP_QUEUE_CAPACITY: usize = 256;

pub trait ReverseResolver: Send + 'static {
    /// Names registered for `ip`, most preferred first.
    fn reverse_lookup(&self, ip: IpAddr) -> io::Result<Vec<String>>;
}

/// Resolver backed by the system's `getnameinfo`.
pub struct SystemResolver;

impl ReverseResolver for SystemResolver {
    fn reverse_lookup(&self, ip: IpAddr) -> io::Result<Vec<String>> {
        dns_lookup::lookup_addr(&ip).map(|name| vec![name])
    }
}

type NameMap = Arc<RwLock<HashMap<IpAddr, String>>>;

#[derive(Clone)]
pub struct DnsCache {
    names: NameMap,
    queue: mpsc::Sender<IpAddr>,
}

/// Consumer half of the lookup queue. Owns nothing but the queue and a
/// handle to the shared map.
pub struct ResolverWorker {
    names: NameMap,
    queue: mpsc::Receiver<IpAddr>,
}

impl DnsCache {
    pub fn new() -> (Self, ResolverWorker) {
        Self::with_capacity(LOOKUP_QUEUE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> (Self, ResolverWorker) {
        let names: NameMap = Arc::new(RwLock::new(HashMap::new()));
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (
            DnsCache {
                names: Arc::clone(&names),
                queue: tx,
            },
            ResolverWorker { names, queue: rx },
        )
    }

    /// Display name for `ip`: the resolved host name once known, the address
    /// itself until then. An address is queued at most once; when the queue
    /// is full the request is dropped and the placeholder stays for good.
    pub fn lookup(&self, ip: IpAddr) -> String {
        {
            let names = self.names.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(name) = names.get(&ip) {
                return name.clone();
            }
        }

        let placeholder = ip.to_string();
        let mut names = self.names.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(name) = names.get(&ip) {
            return name.clone();
        }
        names.insert(ip, placeholder.clone());
        if let Err(err) = self.queue.try_send(ip) {
            tracing::debug!(%ip, error = %err, "dropped reverse lookup request");
        }
        placeholder
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.names
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl ResolverWorker {
    pub fn spawn<R: ReverseResolver>(self, resolver: R) -> io::Result<thread::JoinHandle<()>> {
        thread::Builder::new()
            .name("dns-resolver".into())
            .spawn(move || self.run(resolver))
    }

    /// Drains the queue until every `DnsCache` handle is dropped.
    pub fn run<R: ReverseResolver>(mut self, resolver: R) {
        tracing::info!("dns resolver started");
        while let Some(ip) = self.queue.blocking_recv() {
            let name = display_name(ip, resolver.reverse_lookup(ip));
            tracing::debug!(%ip, %name, "reverse lookup finished");
            self.names
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(ip, name);
        }
        tracing::info!("dns resolver stopped");
    }
}

/// First returned name without its trailing root dot; the address itself on
/// failure or when nothing usable came back.
fn display_name(ip: IpAddr, result: io::Result<Vec<String>>) -> String {
    result
        .ok()
        .and_then(|names| names.into_iter().next())
        .map(|name| name.strip_suffix('.').map(str::to_string).unwrap_or(name))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| ip.to_string())
}
