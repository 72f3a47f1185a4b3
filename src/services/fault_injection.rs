//! Simulated transient failures.
//!
//! `GET /accounts` fails on purpose some of the time so clients can exercise
//! their retry handling. The decision is a `FaultInjector` strategy handed to
//! the service, so tests can switch it off or force it on.

use std::sync::Arc;

use rand::Rng;

/// Decides, once per call, whether to inject a failure.
pub trait FaultInjector: Send + Sync {
    fn should_fail(&self) -> bool;
}

/// Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFaults;

impl FaultInjector for NoFaults {
    fn should_fail(&self) -> bool {
        false
    }
}

/// Fails with probability `failure_rate` using the thread-local RNG.
#[derive(Debug, Clone, Copy)]
pub struct RandomFaults {
    failure_rate: f64,
}

impl RandomFaults {
    /// `failure_rate` is clamped to `0.0..=1.0`.
    pub fn new(failure_rate: f64) -> Self {
        Self {
            failure_rate: failure_rate.clamp(0.0, 1.0),
        }
    }
}

impl FaultInjector for RandomFaults {
    fn should_fail(&self) -> bool {
        self.failure_rate > 0.0 && rand::rng().random_bool(self.failure_rate)
    }
}

/// Any `Fn() -> bool` closure is a fault injector.
impl<F> FaultInjector for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn should_fail(&self) -> bool {
        self()
    }
}

/// Build the injector for a configured failure rate.
pub fn from_failure_rate(failure_rate: f64) -> Arc<dyn FaultInjector> {
    if failure_rate <= 0.0 {
        Arc::new(NoFaults)
    } else {
        Arc::new(RandomFaults::new(failure_rate))
    }
}
