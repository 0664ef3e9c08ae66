//! Combined admission controller

use super::gate::RateGate;
use super::inflight::{InflightGuard, InflightRegistry};
use super::locks::UserLocks;
use super::queue::{QueueTicket, RequestQueue};
use super::types::{AdmissionError, RequestKey, UserId};
use crate::config::AdmissionConfig;
use tokio::sync::OwnedMutexGuard;
use tracing::debug;

/// Composes the rate gate, inflight registry, request queue, and user lock
/// into a single `admit` call.
///
/// Order of checks: rate gate, then inflight registration, then the queue,
/// then the user lock. Registering inflight *before* taking a queue slot
/// makes admission and registration atomic — a duplicate is rejected without
/// ever consuming a slot, and a request that passed the queue gate cannot
/// subsequently lose an inflight race.
pub struct AdmissionController {
    gate: RateGate,
    inflight: InflightRegistry,
    queue: RequestQueue,
    locks: UserLocks,
}

impl AdmissionController {
    /// Create a controller with the given admission policy.
    pub fn new(config: AdmissionConfig) -> Self {
        let queue_depth = config.queue_depth;
        Self {
            gate: RateGate::new(config),
            inflight: InflightRegistry::new(),
            queue: RequestQueue::new(queue_depth),
            locks: UserLocks::new(),
        }
    }

    /// Run the full admission sequence for `(user, key)`.
    ///
    /// Suspends while predecessors in the user's queue run and while the
    /// user lock is held; fails fast with a backpressure error otherwise.
    /// The returned permit holds the queue slot, the inflight registration,
    /// and the user lock until it is dropped.
    pub async fn admit(
        &self,
        user: UserId,
        key: &RequestKey,
    ) -> Result<AdmissionPermit, AdmissionError> {
        self.gate.check(user)?;
        let inflight = self.inflight.try_register(user, key)?;
        let mut ticket = self.queue.enqueue_or_fail(user)?;

        // Fast checks are done; from here on we only wait our turn.
        ticket.wait().await;
        let lock = self.locks.acquire(user).await;
        debug!(user, key = %key, "request admitted");

        Ok(AdmissionPermit {
            _lock: lock,
            _ticket: ticket,
            _inflight: inflight,
        })
    }

    /// The inflight registry, for introspection.
    pub fn inflight(&self) -> &InflightRegistry {
        &self.inflight
    }

    /// The request queue, for introspection.
    pub fn queue(&self) -> &RequestQueue {
        &self.queue
    }

    /// The user lock table, for introspection.
    pub fn locks(&self) -> &UserLocks {
        &self.locks
    }
}

/// Proof that a request passed admission.
///
/// Holds the user lock, the queue slot, and the inflight registration.
/// Dropping the permit releases all three exactly once, in that order —
/// the inflight entry goes last so a duplicate probe keeps seeing
/// "in progress" until the user's queue and lock have actually moved on.
pub struct AdmissionPermit {
    _lock: OwnedMutexGuard<()>,
    _ticket: QueueTicket,
    _inflight: InflightGuard,
}
