//! Bounded per-channel message ring

use std::collections::VecDeque;

use cord_core::{Entity, Snowflake};

use crate::entities::CachedMessage;

/// Most recent messages of one channel, oldest first
#[derive(Debug, Clone)]
pub struct MessageRing {
    capacity: usize,
    messages: VecDeque<CachedMessage>,
}

impl MessageRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            messages: VecDeque::with_capacity(capacity.min(16)),
        }
    }

    /// Append, evicting the oldest message once full
    pub fn push(&mut self, message: CachedMessage) -> Option<CachedMessage> {
        if self.capacity == 0 {
            return None;
        }
        let evicted = if self.messages.len() >= self.capacity {
            self.messages.pop_front()
        } else {
            None
        };
        self.messages.push_back(message);
        evicted
    }

    pub fn get(&self, message_id: Snowflake) -> Option<&CachedMessage> {
        self.messages.iter().find(|message| message.id() == message_id)
    }

    pub fn remove(&mut self, message_id: Snowflake) -> Option<CachedMessage> {
        let index = self
            .messages
            .iter()
            .position(|message| message.id() == message_id)?;
        self.messages.remove(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CachedMessage> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
