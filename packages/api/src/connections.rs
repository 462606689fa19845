// ABOUTME: Per-IP limit on concurrent live connections (WebSocket and SSE)
// ABOUTME: Slots are held by RAII guards and released when the connection ends

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Default maximum concurrent live connections per IP address
pub const DEFAULT_MAX_LIVE_CONNECTIONS_PER_IP: usize = 8;

/// Error returned when the live connection limit is exceeded
#[derive(Debug)]
pub struct LiveConnectionLimitExceeded;

/// Tracks concurrent live connections per IP address
#[derive(Clone)]
pub struct LiveConnectionTracker {
    connections: Arc<Mutex<HashMap<IpAddr, usize>>>,
    max_connections_per_ip: usize,
}

impl Default for LiveConnectionTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LIVE_CONNECTIONS_PER_IP)
    }
}

impl LiveConnectionTracker {
    /// A zero limit falls back to the default
    pub fn new(max_connections_per_ip: usize) -> Self {
        let max_connections_per_ip = if max_connections_per_ip == 0 {
            DEFAULT_MAX_LIVE_CONNECTIONS_PER_IP
        } else {
            max_connections_per_ip
        };

        Self {
            connections: Arc::new(Mutex::new(HashMap::new())),
            max_connections_per_ip,
        }
    }

    pub fn max_connections_per_ip(&self) -> usize {
        self.max_connections_per_ip
    }

    /// Try to acquire a connection slot for the given IP
    pub fn try_acquire(
        &self,
        ip: IpAddr,
    ) -> Result<LiveConnectionGuard, LiveConnectionLimitExceeded> {
        let mut connections = self.connections.lock().unwrap_or_else(|poisoned| {
            warn!("Live connection tracker mutex poisoned, recovering");
            poisoned.into_inner()
        });
        let count = connections.entry(ip).or_insert(0);

        if *count >= self.max_connections_per_ip {
            warn!(
                ip = %ip,
                current = %count,
                max = self.max_connections_per_ip,
                "Live connection limit exceeded"
            );
            return Err(LiveConnectionLimitExceeded);
        }

        *count += 1;
        debug!(ip = %ip, count = %count, "Live connection acquired");

        Ok(LiveConnectionGuard {
            ip,
            tracker: self.clone(),
        })
    }

    /// Number of open connections for `ip`
    pub fn active(&self, ip: IpAddr) -> usize {
        let connections = self
            .connections
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        connections.get(&ip).copied().unwrap_or(0)
    }

    fn release(&self, ip: IpAddr) {
        let mut connections = self.connections.lock().unwrap_or_else(|poisoned| {
            warn!("Live connection tracker mutex poisoned, recovering");
            poisoned.into_inner()
        });
        if let Some(count) = connections.get_mut(&ip) {
            *count = count.saturating_sub(1);
            debug!(ip = %ip, remaining = %count, "Live connection released");

            if *count == 0 {
                connections.remove(&ip);
            }
        }
    }
}

/// Releases its connection slot when dropped
pub struct LiveConnectionGuard {
    ip: IpAddr,
    tracker: LiveConnectionTracker,
}

impl Drop for LiveConnectionGuard {
    fn drop(&mut self) {
        self.tracker.release(self.ip);
    }
}
