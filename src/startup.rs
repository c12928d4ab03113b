//! Waiting for digiCamControl after launching it.
//!
//! The application exposes no ready signal. The default is to sleep for a
//! fixed warm-up period; the poll strategy instead probes the relay with a
//! cheap `get` until a well-formed response comes back.

use std::thread;
use std::time::Duration;

use crate::relay::Relay;
use crate::response;

/// Fixed warm-up period after launching digiCamControl.
pub const DEFAULT_WARMUP: Duration = Duration::from_secs(10);

/// Default number of readiness probes for [`StartupStrategy::Poll`].
pub const DEFAULT_POLL_ATTEMPTS: u32 = 10;

/// Default delay before the second probe; doubles after each failed probe.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Upper bound on the delay between two probes.
pub const DEFAULT_POLL_MAX: Duration = Duration::from_secs(5);

/// Side-effect free relay command used as a readiness probe.
pub const READINESS_PROBE: &str = "get session.name";

/// How to wait for a freshly launched digiCamControl.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupStrategy {
    /// Block for a fixed duration and assume the application is up.
    FixedDelay(Duration),
    /// Probe the relay up to `attempts` times, backing off from `interval`.
    Poll { attempts: u32, interval: Duration },
}

impl Default for StartupStrategy {
    fn default() -> Self {
        StartupStrategy::FixedDelay(DEFAULT_WARMUP)
    }
}

impl StartupStrategy {
    /// Poll strategy with the default attempt count and interval.
    pub fn poll() -> Self {
        StartupStrategy::Poll {
            attempts: DEFAULT_POLL_ATTEMPTS,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Outcome of waiting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// A probe succeeded after this many attempts.
    Confirmed { attempts: u32 },
    /// No readiness signal was observed; the application is assumed to be up.
    Assumed,
}

/// Block until digiCamControl is (probably) ready to accept relay commands.
pub fn wait_until_ready<R: Relay + ?Sized>(strategy: StartupStrategy, relay: &R) -> Readiness {
    match strategy {
        StartupStrategy::FixedDelay(delay) => {
            log::info!("Waiting {:?} for digiCamControl to start", delay);
            thread::sleep(delay);
            Readiness::Assumed
        }
        StartupStrategy::Poll { attempts, interval } => {
            for attempt in 0..attempts {
                match relay.invoke(READINESS_PROBE) {
                    Ok(raw) if response::is_enveloped(&raw) => {
                        log::info!("digiCamControl ready after {} probe(s)", attempt + 1);
                        return Readiness::Confirmed {
                            attempts: attempt + 1,
                        };
                    }
                    Ok(raw) => log::debug!("Probe {}: not ready ({:?})", attempt + 1, raw.trim()),
                    Err(e) => log::debug!("Probe {}: {}", attempt + 1, e),
                }

                if attempt + 1 < attempts {
                    thread::sleep(calculate_backoff(attempt, interval, DEFAULT_POLL_MAX));
                }
            }

            log::warn!(
                "digiCamControl did not answer after {} probe(s); continuing anyway",
                attempts
            );
            Readiness::Assumed
        }
    }
}

/// Exponential backoff: `min(base * 2^attempt, max)`.
pub fn calculate_backoff(attempt: u32, base: Duration, max: Duration) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt)).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::RelayError;
    use std::cell::Cell;

    /// Relay that fails until `ready_after` calls have been made.
    struct WarmingRelay {
        calls: Cell<u32>,
        ready_after: u32,
    }

    impl Relay for WarmingRelay {
        fn invoke(&self, subcommand: &str) -> Result<String, RelayError> {
            assert_eq!(subcommand, READINESS_PROBE);
            let n = self.calls.get() + 1;
            self.calls.set(n);
            if n >= self.ready_after {
                Ok(format!("{:<96}{}\"}}\r\n\r\n", ":;response:", "Session1"))
            } else {
                Err(RelayError::Exited {
                    code: Some(1),
                    output: "No connection".to_string(),
                })
            }
        }
    }

    fn poll(attempts: u32) -> StartupStrategy {
        StartupStrategy::Poll {
            attempts,
            interval: Duration::ZERO,
        }
    }

    #[test]
    fn test_default_is_ten_second_delay() {
        assert_eq!(
            StartupStrategy::default(),
            StartupStrategy::FixedDelay(Duration::from_secs(10))
        );
    }

    #[test]
    fn test_fixed_delay_never_probes() {
        let relay = WarmingRelay {
            calls: Cell::new(0),
            ready_after: 1,
        };
        let readiness = wait_until_ready(StartupStrategy::FixedDelay(Duration::ZERO), &relay);
        assert_eq!(readiness, Readiness::Assumed);
        assert_eq!(relay.calls.get(), 0);
    }

    #[test]
    fn test_poll_stops_at_first_ready_probe() {
        let relay = WarmingRelay {
            calls: Cell::new(0),
            ready_after: 3,
        };
        assert_eq!(
            wait_until_ready(poll(10), &relay),
            Readiness::Confirmed { attempts: 3 }
        );
        assert_eq!(relay.calls.get(), 3);
    }

    #[test]
    fn test_poll_gives_up_after_attempts() {
        let relay = WarmingRelay {
            calls: Cell::new(0),
            ready_after: u32::MAX,
        };
        assert_eq!(wait_until_ready(poll(4), &relay), Readiness::Assumed);
        assert_eq!(relay.calls.get(), 4);
    }

    #[test]
    fn test_poll_with_zero_attempts() {
        let relay = WarmingRelay {
            calls: Cell::new(0),
            ready_after: 1,
        };
        assert_eq!(wait_until_ready(poll(0), &relay), Readiness::Assumed);
        assert_eq!(relay.calls.get(), 0);
    }

    #[test]
    fn test_calculate_backoff_doubles() {
        let base = Duration::from_millis(500);
        let max = Duration::from_secs(5);
        assert_eq!(calculate_backoff(0, base, max), Duration::from_millis(500));
        assert_eq!(calculate_backoff(1, base, max), Duration::from_secs(1));
        assert_eq!(calculate_backoff(2, base, max), Duration::from_secs(2));
    }

    #[test]
    fn test_calculate_backoff_respects_max() {
        let delay = calculate_backoff(10, Duration::from_secs(1), Duration::from_secs(5));
        assert_eq!(delay, Duration::from_secs(5));
        let delay = calculate_backoff(40, Duration::from_secs(1), Duration::from_secs(5));
        assert_eq!(delay, Duration::from_secs(5));
    }
}
