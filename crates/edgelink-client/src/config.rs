//! Client configuration types.

use std::time::Duration;

/// Retry interval used when none is configured (seconds)
pub const DEFAULT_RETRY_INTERVAL_S: u64 = 10;

/// Maximum idle connections kept per host
pub const MAX_HTTP_IDLE_CONNECTIONS: usize = 20;

/// How long an idle connection is kept (seconds)
pub const HTTP_IDLE_CONNECTION_TIMEOUT_S: u64 = 120;

/// Retry parameters for transport errors.
///
/// Carried for the request-issuing code; nothing in this crate retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// Number of retries on transport error
    pub retry_count: u32,

    /// Seconds between retries, 0 meaning the default
    pub retry_interval_s: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryConfig {
    /// No retries, default interval
    #[must_use]
    pub const fn new() -> Self {
        Self {
            retry_count: 0,
            retry_interval_s: DEFAULT_RETRY_INTERVAL_S,
        }
    }

    /// Set the retry count
    #[must_use]
    pub const fn retry_count(mut self, count: u32) -> Self {
        self.retry_count = count;
        self
    }

    /// Set the retry interval in seconds
    #[must_use]
    pub const fn retry_interval_s(mut self, secs: u64) -> Self {
        self.retry_interval_s = secs;
        self
    }

    /// Interval to actually wait: 10 seconds when unset
    #[must_use]
    pub const fn effective_interval_s(&self) -> u64 {
        if self.retry_interval_s == 0 {
            DEFAULT_RETRY_INTERVAL_S
        } else {
            self.retry_interval_s
        }
    }

    /// [`effective_interval_s`](Self::effective_interval_s) as a `Duration`
    #[must_use]
    pub const fn effective_interval(&self) -> Duration {
        Duration::from_secs(self.effective_interval_s())
    }
}

/// Fixed transport settings applied to every produced client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportTuning {
    /// TCP connect timeout
    pub dial_timeout: Duration,

    /// TCP keep-alive interval
    pub keep_alive: Duration,

    /// TLS handshake budget, on top of the dial timeout
    pub tls_handshake_timeout: Duration,

    /// Longest wait for the server to start answering
    pub response_header_timeout: Duration,

    /// Wait for `100 Continue`. reqwest never sends `Expect`, so this has
    /// no effect on produced clients.
    pub expect_continue_timeout: Duration,

    /// Idle connections kept per host
    pub max_idle_connections: usize,

    /// Idle connection lifetime
    pub idle_connection_timeout: Duration,
}

impl TransportTuning {
    /// The values every agent client uses
    pub const AGENT: Self = Self {
        dial_timeout: Duration::from_secs(20),
        keep_alive: Duration::from_secs(60),
        tls_handshake_timeout: Duration::from_secs(20),
        response_header_timeout: Duration::from_secs(20),
        expect_continue_timeout: Duration::from_secs(8),
        max_idle_connections: MAX_HTTP_IDLE_CONNECTIONS,
        idle_connection_timeout: Duration::from_secs(HTTP_IDLE_CONNECTION_TIMEOUT_S),
    };

    /// Budget for establishing a connection: dial plus TLS handshake
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        self.dial_timeout + self.tls_handshake_timeout
    }
}

impl Default for TransportTuning {
    fn default() -> Self {
        Self::AGENT
    }
}
