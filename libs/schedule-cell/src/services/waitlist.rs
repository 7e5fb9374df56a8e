// libs/schedule-cell/src/services/waitlist.rs
use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::WaitlistEntry;

/// Strict FIFO intake queue: the head is always the next candidate offered a
/// freed slot, and an entry leaves the queue exactly once, when its match is
/// committed.
#[derive(Clone)]
pub struct Waitlist {
    entries: Arc<RwLock<VecDeque<WaitlistEntry>>>,
}

impl Waitlist {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(VecDeque::new())),
        }
    }

    pub async fn join(
        &self,
        name: impl Into<String>,
        phone: impl Into<String>,
        preferred_period: impl Into<String>,
    ) -> WaitlistEntry {
        let entry = WaitlistEntry {
            id: Uuid::new_v4(),
            name: name.into(),
            phone: phone.into(),
            preferred_period: preferred_period.into(),
        };
        self.entries.write().await.push_back(entry.clone());
        entry
    }

    pub async fn peek(&self) -> Option<WaitlistEntry> {
        self.entries.read().await.front().cloned()
    }

    /// Dequeue the head. Callers only pop after the backfill committed.
    pub async fn pop(&self) -> Option<WaitlistEntry> {
        self.entries.write().await.pop_front()
    }

    pub async fn entries(&self) -> Vec<WaitlistEntry> {
        self.entries.read().await.iter().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for Waitlist {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn head_leaves_first_and_only_once() {
        let waitlist = Waitlist::new();
        waitlist.join("A", "1", "Morning").await;
        waitlist.join("B", "2", "Afternoon").await;
        waitlist.join("C", "3", "Morning").await;

        assert_eq!(waitlist.peek().await.unwrap().name, "A");
        assert_eq!(waitlist.pop().await.unwrap().name, "A");

        let remaining: Vec<String> =
            waitlist.entries().await.into_iter().map(|e| e.name).collect();
        assert_eq!(remaining, ["B", "C"]);
    }

    #[tokio::test]
    async fn popping_an_empty_queue_yields_nothing() {
        let waitlist = Waitlist::new();
        assert!(waitlist.pop().await.is_none());
        assert!(waitlist.is_empty().await);
    }
}
