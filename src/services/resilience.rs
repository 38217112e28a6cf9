//! Fault-tolerance wrapper around a [`PriceLookup`].
//!
//! The decorator adds a bulkhead, which caps concurrent lookups and fails fast
//! once the cap is reached, and a circuit breaker, which stops hitting a
//! failing store for a cool-down period. The resolution rule itself is left
//! untouched.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use tokio::sync::{Semaphore, SemaphorePermit};

use crate::domain::price::{Price, PriceQuery};
use crate::services::prices::PriceLookup;
use crate::services::{ServiceError, ServiceResult};

pub const DEFAULT_MAX_CONCURRENT_CALLS: usize = 25;
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 5;
pub const DEFAULT_OPEN_DURATION: Duration = Duration::from_secs(30);

/// Tuning knobs for [`ResilientPriceLookup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResilienceConfig {
    /// Lookups allowed to run at the same time.
    pub max_concurrent_calls: usize,
    /// Consecutive store failures that open the circuit.
    pub failure_threshold: u32,
    /// How long the circuit stays open before a trial call is let through.
    pub open_duration: Duration,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            max_concurrent_calls: DEFAULT_MAX_CONCURRENT_CALLS,
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            open_duration: DEFAULT_OPEN_DURATION,
        }
    }
}

/// Semaphore-based concurrency limit that never waits.
pub struct Bulkhead {
    permits: Semaphore,
}

impl Bulkhead {
    pub fn new(max_concurrent_calls: usize) -> Self {
        Self {
            permits: Semaphore::new(max_concurrent_calls),
        }
    }

    /// Take a slot if one is free. The slot is released when the permit drops.
    pub fn try_enter(&self) -> Option<SemaphorePermit<'_>> {
        self.permits.try_acquire().ok()
    }

    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BreakerState {
    Closed { failures: u32 },
    Open { until: Instant },
    /// A single trial call is in flight.
    HalfOpen,
}

/// Coarse view of the breaker state, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitStatus {
    Closed,
    Open,
    HalfOpen,
}

/// Consecutive-failure circuit breaker.
pub struct CircuitBreaker {
    state: Mutex<BreakerState>,
    failure_threshold: u32,
    open_duration: Duration,
}

impl CircuitBreaker {
    pub fn new(failure_threshold: u32, open_duration: Duration) -> Self {
        Self {
            state: Mutex::new(BreakerState::Closed { failures: 0 }),
            failure_threshold: failure_threshold.max(1),
            open_duration,
        }
    }

    pub fn status(&self) -> CircuitStatus {
        match *self.state.lock().unwrap_or_else(PoisonError::into_inner) {
            BreakerState::Closed { .. } => CircuitStatus::Closed,
            BreakerState::Open { .. } => CircuitStatus::Open,
            BreakerState::HalfOpen => CircuitStatus::HalfOpen,
        }
    }

    /// Whether a call may proceed. Moves an expired open circuit to half-open.
    pub fn try_acquire(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match *state {
            BreakerState::Closed { .. } => true,
            BreakerState::Open { until } if Instant::now() >= until => {
                log::info!("Price lookup circuit half-open, letting a trial call through");
                *state = BreakerState::HalfOpen;
                true
            }
            BreakerState::Open { .. } | BreakerState::HalfOpen => false,
        }
    }

    pub fn record_success(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state == BreakerState::HalfOpen {
            log::info!("Price lookup circuit closed");
        }
        *state = BreakerState::Closed { failures: 0 };
    }

    pub fn record_failure(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let next = match *state {
            BreakerState::Closed { failures } if failures + 1 < self.failure_threshold => {
                BreakerState::Closed {
                    failures: failures + 1,
                }
            }
            BreakerState::Closed { .. } | BreakerState::HalfOpen => {
                log::warn!(
                    "Price lookup circuit opened for {:?} after repeated store failures",
                    self.open_duration
                );
                BreakerState::Open {
                    until: Instant::now() + self.open_duration,
                }
            }
            open @ BreakerState::Open { .. } => open,
        };
        *state = next;
    }
}

/// Decorates a [`PriceLookup`] with a bulkhead and a circuit breaker.
///
/// Only store failures count against the breaker. A `NotFound` outcome is a
/// normal answer.
pub struct ResilientPriceLookup<L> {
    inner: L,
    bulkhead: Bulkhead,
    breaker: CircuitBreaker,
}

impl<L> ResilientPriceLookup<L>
where
    L: PriceLookup,
{
    pub fn new(inner: L, config: ResilienceConfig) -> Self {
        Self {
            inner,
            bulkhead: Bulkhead::new(config.max_concurrent_calls),
            breaker: CircuitBreaker::new(config.failure_threshold, config.open_duration),
        }
    }

    pub fn circuit_status(&self) -> CircuitStatus {
        self.breaker.status()
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }
}

impl<L> PriceLookup for ResilientPriceLookup<L>
where
    L: PriceLookup,
{
    fn find_applicable_price(&self, query: &PriceQuery) -> ServiceResult<Price> {
        let Some(_permit) = self.bulkhead.try_enter() else {
            log::warn!("Rejected price lookup: bulkhead is full");
            return Err(ServiceError::BulkheadFull);
        };

        if !self.breaker.try_acquire() {
            return Err(ServiceError::CircuitOpen);
        }

        let result = self.inner.find_applicable_price(query);
        match &result {
            Err(ServiceError::Repository(_)) => self.breaker.record_failure(),
            _ => self.breaker.record_success(),
        }
        result
    }
}
