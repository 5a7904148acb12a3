// ── Local server reachability ──
//
// A LAN-capable network does not guarantee the local server is on the
// same LAN (hotel WiFi, a VPN to somewhere else). Before preferring the
// local server, `ConnectionFactory::resolve_reachable` opens a plain TCP
// connection to its host and port.

use std::time::Duration;

use tokio::net::TcpStream;
use tracing::debug;
use url::Url;

/// TCP connect probe with bounded retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReachabilityProbe {
    /// Timeout of a single connect attempt.
    pub connect_timeout: Duration,
    /// Attempt budget. A timed-out attempt consumes `timeout_cost` of it.
    pub max_attempts: u32,
    /// Pause after a refused or failed attempt.
    pub retry_delay: Duration,
    /// Budget consumed by one timed-out attempt, its own slot included.
    pub timeout_cost: u32,
}

impl Default for ReachabilityProbe {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(1),
            max_attempts: 10,
            retry_delay: Duration::from_millis(200),
            timeout_cost: 6,
        }
    }
}

impl ReachabilityProbe {
    /// Returns `true` once a TCP connection to the URL's host and port succeeds.
    pub async fn is_reachable(&self, url: &Url) -> bool {
        // IPv6 literals come bracketed from the URL but not from the resolver.
        let Some(host) = url.host_str().map(|h| h.trim_start_matches('[').trim_end_matches(']'))
        else {
            return false;
        };
        let Some(port) = url.port_or_known_default() else {
            return false;
        };
        debug!(host, port, "checking reachability");

        let mut spent = 0;
        let mut attempt = 0;
        while spent < self.max_attempts {
            attempt += 1;
            match tokio::time::timeout(self.connect_timeout, TcpStream::connect((host, port))).await
            {
                Ok(Ok(_stream)) => {
                    debug!(host, port, attempt, "socket connected");
                    return true;
                }
                Ok(Err(e)) => {
                    debug!(host, port, attempt, error = %e, "socket connection failed");
                    spent += self.attempt_cost(false);
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(_) => {
                    debug!(host, port, attempt, "socket connect timed out");
                    spent += self.attempt_cost(true);
                }
            }
        }
        false
    }

    fn attempt_cost(&self, timed_out: bool) -> u32 {
        if timed_out {
            self.timeout_cost
        } else {
            1
        }
    }
}
