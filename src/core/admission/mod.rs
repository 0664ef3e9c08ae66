//! Per-user admission control
//!
//! Four gates stand between an incoming request and the acquisition pipeline:
//!
//! 1. [`RateGate`] — sliding-window rate limit plus cooldown
//! 2. [`InflightRegistry`] — rejects a duplicate `(user, key)` while the
//!    first acquisition is still running
//! 3. [`RequestQueue`] — bounded per-user FIFO; excess requests fail fast
//! 4. [`UserLocks`] — at most one acquisition *executing* per user
//!
//! [`AdmissionController`] composes them in that order. All state is
//! in-memory, per-user, and guarded by fine-grained locks; it is soft
//! throttling state that does not survive a restart.

mod controller;
mod gate;
mod inflight;
mod locks;
mod queue;
mod types;


pub use controller::{AdmissionController, AdmissionPermit};
pub use gate::RateGate;
pub use inflight::{InflightGuard, InflightRegistry};
pub use locks::UserLocks;
pub use queue::{QueueTicket, RequestQueue};
pub use types::{AdmissionError, RequestKey, UserId};
