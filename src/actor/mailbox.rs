//! Per-actor FIFO mailboxes

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// One queued message: an event name plus its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Event name used to select the receiving handler.
    pub event: String,
    /// Opaque payload text carried to the handler.
    pub payload: String,
    /// Monotonic enqueue counter, scoped to the owning mailbox.
    pub enqueued_at: u64,
}

/// A FIFO queue of messages owned by one actor. Grows without bound.
#[derive(Debug, Clone, Default)]
pub struct Mailbox {
    queue: VecDeque<Message>,
    next_seq: u64,
}

impl Mailbox {
    /// Create an empty mailbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to the back of the queue.
    pub fn push(&mut self, event: &str, payload: &str) {
        let enqueued_at = self.next_seq;
        self.next_seq += 1;
        self.queue.push_back(Message {
            event: event.to_string(),
            payload: payload.to_string(),
            enqueued_at,
        });
    }

    /// Remove and return the oldest message, if any.
    pub fn pop(&mut self) -> Option<Message> {
        self.queue.pop_front()
    }

    /// Number of queued messages.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether the mailbox holds no messages.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
