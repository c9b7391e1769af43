//! Bounded retries with exponential backoff.
//!
//! Server errors (5xx or status 0), timeouts and network failures are
//! retried; the delay before retry `n` is `base_delay * 2^n`. A 4xx reply
//! is returned at once.

use crate::error::{GeneratorError, Result};
use crate::transport::{HttpResponse, TransportError};
use querysmith_core::GeneratorConfig;
use std::time::Duration;
use tracing::{debug, warn};

/// Attempt limit, backoff base and per-attempt deadline for one kind of call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub base_delay: Duration,
    pub timeout: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration, timeout: Duration) -> Self {
        RetryPolicy {
            max_retries,
            base_delay,
            timeout,
        }
    }

    /// Policy for chat-completion calls.
    pub fn generation(config: &GeneratorConfig) -> Self {
        RetryPolicy::new(
            config.max_retries,
            config.base_delay(),
            config.generation_timeout(),
        )
    }

    /// Policy for short lookups such as the model listing.
    pub fn lookup(config: &GeneratorConfig) -> Self {
        RetryPolicy::new(
            config.lookup_max_retries,
            config.lookup_base_delay(),
            config.lookup_timeout(),
        )
    }

    /// Delay before retry number `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt.min(16)))
    }

    /// Run `call` until it succeeds, fails terminally, or retries run out.
    ///
    /// `call` receives the per-attempt deadline; `sleep` is invoked between
    /// attempts with the backoff delay.
    pub fn execute<F>(&self, mut call: F, sleep: &dyn Fn(Duration)) -> Result<HttpResponse>
    where
        F: FnMut(Duration) -> std::result::Result<HttpResponse, TransportError>,
    {
        let attempts = self.max_retries + 1;
        let mut attempt = 0;

        loop {
            let failure = match call(self.timeout) {
                Ok(response) if response.is_success() => return Ok(response),
                Ok(response) if response.is_server_error() => GeneratorError::Server {
                    status: response.status,
                    attempts: attempt + 1,
                },
                Ok(response) => GeneratorError::Client {
                    status: response.status,
                    body: response.body,
                },
                Err(TransportError::Timeout) => GeneratorError::Timeout {
                    attempts: attempt + 1,
                    timeout_ms: self.timeout.as_millis() as u64,
                },
                Err(TransportError::Network(reason)) => GeneratorError::Network {
                    attempts: attempt + 1,
                    reason,
                },
            };

            if !failure.is_retryable() {
                debug!("Request rejected, not retrying: {}", failure);
                return Err(failure);
            }
            if attempt + 1 >= attempts {
                return Err(failure);
            }

            let delay = self.delay_for(attempt);
            warn!(
                attempt = attempt + 1,
                delay_ms = delay.as_millis() as u64,
                "Request failed ({}), retrying",
                failure
            );
            sleep(delay);
            attempt += 1;
        }
    }
}
