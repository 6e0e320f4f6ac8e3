// src/gate.rs
// =============================================================================
// The concurrency gate: a process-wide limit on simultaneous remote probes.
//
// A batch may spawn hundreds of checks at once. Local checks are cheap, but
// every remote check opens a connection, so those have to pass through the
// gate first. The gate is a thin wrapper around tokio's Semaphore.
//
// Rust concepts:
// - RAII: a GatePermit gives its slot back when it is dropped, so every
//   early return or `?` in the caller releases exactly once
// - Arc: the gate is shared by every checker and every task
// =============================================================================

use std::sync::Arc;
use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

/// Bounded admission control for outbound probes.
#[derive(Debug)]
pub struct ConcurrencyGate {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// One admitted slot. Released on drop.
#[derive(Debug)]
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
}

impl ConcurrencyGate {
    /// Creates a gate admitting at most `capacity` holders at a time.
    /// A capacity of zero would deadlock every probe, so it is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Waits until a slot is free and takes it.
    ///
    /// Only fails if the gate has been closed, which nothing in this crate
    /// ever does.
    pub async fn acquire(&self) -> Result<GatePermit, AcquireError> {
        let permit = Arc::clone(&self.semaphore).acquire_owned().await?;
        Ok(GatePermit { _permit: permit })
    }

    /// Maximum number of simultaneous holders.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of slots free right now.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

impl GatePermit {
    /// Returns the slot to the gate. Equivalent to dropping the permit.
    pub fn release(self) {}
}
