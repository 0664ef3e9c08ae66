//! Bounded per-user FIFO admission queue
//!
//! Each user gets an ordered queue of tickets. A ticket is resolved when it
//! reaches the head; exactly one ticket per user is ever resolved-but-not-
//! dequeued, which makes this a strict FIFO gate rather than a counting
//! semaphore. Enqueueing never blocks the caller on a full queue — it fails
//! immediately with [`AdmissionError::QueueOverflow`].

use super::types::{AdmissionError, UserId};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::oneshot;

struct Slot {
    id: u64,
    /// Sender used to resolve the ticket when it becomes the head.
    /// `None` once resolved.
    tx: Option<oneshot::Sender<()>>,
}

#[derive(Default)]
struct UserQueue {
    next_id: u64,
    slots: VecDeque<Slot>,
}

impl UserQueue {
    /// Remove the slot with `id`, waking the new head if the old head left.
    /// No-op when the slot is already gone.
    fn remove(&mut self, id: u64) {
        let Some(pos) = self.slots.iter().position(|s| s.id == id) else {
            return;
        };
        self.slots.remove(pos);
        if pos == 0 {
            if let Some(head) = self.slots.front_mut() {
                if let Some(tx) = head.tx.take() {
                    let _ = tx.send(());
                }
            }
        }
    }
}

/// Bounded per-user FIFO admission queue.
pub struct RequestQueue {
    capacity: usize,
    queues: DashMap<UserId, Arc<Mutex<UserQueue>>>,
}

impl RequestQueue {
    /// Create a queue with the given per-user capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            queues: DashMap::new(),
        }
    }

    /// Take a queue slot for `user`, or fail fast when the queue is full.
    ///
    /// The returned ticket must be awaited via [`QueueTicket::wait`] before
    /// proceeding; a sole entry resolves immediately. Dropping the ticket
    /// dequeues it (waking the successor if the ticket was the head), so
    /// release happens exactly once on every exit path.
    pub fn enqueue_or_fail(&self, user: UserId) -> Result<QueueTicket, AdmissionError> {
        let state = self
            .queues
            .entry(user)
            .or_insert_with(|| Arc::new(Mutex::new(UserQueue::default())))
            .clone();

        let mut queue = state.lock();
        if queue.slots.len() >= self.capacity {
            return Err(AdmissionError::QueueOverflow);
        }

        let id = queue.next_id;
        queue.next_id += 1;

        let (tx, rx) = oneshot::channel();
        queue.slots.push_back(Slot { id, tx: Some(tx) });

        // A sole entry is the head: resolve it right away.
        if queue.slots.len() == 1 {
            if let Some(front) = queue.slots.front_mut() {
                if let Some(tx) = front.tx.take() {
                    let _ = tx.send(());
                }
            }
        }
        drop(queue);

        Ok(QueueTicket {
            id,
            state,
            rx: Some(rx),
        })
    }

    /// Pending tickets for `user`, the resolved head included.
    pub fn pending(&self, user: UserId) -> usize {
        self.queues
            .get(&user)
            .map(|q| q.lock().slots.len())
            .unwrap_or(0)
    }
}

/// A slot in a user's admission queue, released on drop.
pub struct QueueTicket {
    id: u64,
    state: Arc<Mutex<UserQueue>>,
    rx: Option<oneshot::Receiver<()>>,
}

impl QueueTicket {
    /// Suspend until this ticket reaches the head of the queue.
    ///
    /// Returns immediately when the ticket was resolved at enqueue time.
    pub async fn wait(&mut self) {
        if let Some(rx) = self.rx.take() {
            // The sender lives in our slot until resolved; it is only dropped
            // when this ticket removes its own slot, so recv cannot fail
            // while we are still waiting.
            let _ = rx.await;
        }
    }
}

impl Drop for QueueTicket {
    fn drop(&mut self) {
        self.state.lock().remove(self.id);
    }
}
