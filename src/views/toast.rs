//! Transient notifications.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;

/// How long a notification stays visible.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

#[derive(Default)]
struct Slot {
    current: Option<Notification>,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

/// A single notification slot that clears itself after a fixed time.
///
/// Showing a new notification restarts the clock; an older timer never
/// clears a newer message.
pub struct Toast {
    slot: Arc<Mutex<Slot>>,
    ttl: Duration,
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Toast {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            ttl,
        }
    }

    /// Display `notification` and schedule its removal.
    pub fn show(&self, notification: Notification) {
        let mut slot = lock(&self.slot);
        slot.generation += 1;
        slot.current = Some(notification);
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }

        let generation = slot.generation;
        let shared = Arc::clone(&self.slot);
        let ttl = self.ttl;
        slot.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let mut slot = lock(&shared);
            if slot.generation == generation {
                slot.current = None;
                slot.timer = None;
            }
        }));
    }

    pub fn current(&self) -> Option<Notification> {
        lock(&self.slot).current.clone()
    }

    /// Remove the notification now.
    pub fn clear(&self) {
        let mut slot = lock(&self.slot);
        slot.generation += 1;
        slot.current = None;
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
    }
}

impl Default for Toast {
    fn default() -> Self {
        Self::new(NOTIFICATION_TTL)
    }
}

impl Drop for Toast {
    fn drop(&mut self) {
        if let Some(timer) = lock(&self.slot).timer.take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(message: &str) -> Notification {
        Notification {
            kind: NotificationKind::Success,
            message: message.to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_clears_after_ttl() {
        let toast = Toast::default();
        toast.show(note("hello"));

        tokio::time::sleep(Duration::from_millis(4_999)).await;
        assert_eq!(toast.current(), Some(note("hello")));

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(toast.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_message_keeps_full_ttl() {
        let toast = Toast::default();
        toast.show(note("first"));
        tokio::time::sleep(Duration::from_secs(3)).await;
        toast.show(note("second"));

        // The first message's deadline passes without clearing the second.
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(toast.current(), Some(note("second")));

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(toast.current(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear() {
        let toast = Toast::default();
        toast.show(note("bye"));
        toast.clear();
        assert_eq!(toast.current(), None);
    }
}
