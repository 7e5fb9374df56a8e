// libs/notification-cell/src/services/store.rs
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::{
    Notification, NotificationCategory, NotificationKind, PatientSnapshot, Ticker,
};
use crate::services::timers::{TimerKey, TimerRegistry};

const TOAST_TTL: Duration = Duration::from_secs(5);
const TICKER_TTL: Duration = Duration::from_secs(5);
const BUDGET_PULSE_TTL: Duration = Duration::from_secs(8);

/// Append-only event log with the three-stage visibility lifecycle
/// (toast -> bell -> audit history) plus the header ticker and the
/// budget-approval pulse.
///
/// Entries are prepended, so index 0 is always the newest event and every
/// derived view iterates most-recent-first.
#[derive(Clone)]
pub struct NotificationStore {
    entries: Arc<RwLock<Vec<Notification>>>,
    ticker: Arc<RwLock<Option<Ticker>>>,
    budget_pulse: Arc<RwLock<bool>>,
    next_id: Arc<AtomicI64>,
    timers: TimerRegistry,
    toast_ttl: Duration,
    ticker_ttl: Duration,
    pulse_ttl: Duration,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::with_timings(TOAST_TTL, TICKER_TTL, BUDGET_PULSE_TTL)
    }

    pub fn with_timings(toast_ttl: Duration, ticker_ttl: Duration, pulse_ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
            ticker: Arc::new(RwLock::new(None)),
            budget_pulse: Arc::new(RwLock::new(false)),
            next_id: Arc::new(AtomicI64::new(0)),
            timers: TimerRegistry::new(),
            toast_ttl,
            ticker_ttl,
            pulse_ttl,
        }
    }

    /// Record an event. Always succeeds; the entry starts visible as a toast
    /// and unread in the bell feed, with a pending expiry that clears the
    /// toast unless it was dismissed earlier.
    pub async fn record(
        &self,
        message: impl Into<String>,
        kind: NotificationKind,
        patient: Option<PatientSnapshot>,
        category: NotificationCategory,
    ) -> Notification {
        let message = message.into();
        let notification = Notification {
            id: self.allocate_id(),
            message: message.clone(),
            created_at: Utc::now(),
            read: false,
            visible: true,
            dismissed_from_bell: false,
            kind,
            category,
            patient,
        };

        debug!("Recording {:?} notification {}", kind, notification.id);
        self.entries.write().await.insert(0, notification.clone());

        self.arm_toast_expiry(notification.id);
        self.update_ticker(message, category).await;
        if category == NotificationCategory::Budget {
            self.arm_budget_pulse().await;
        }

        notification
    }

    /// Hide a toast. Idempotent, and a no-op for unknown ids.
    pub async fn dismiss_toast(&self, id: i64) {
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.iter_mut().find(|n| n.id == id) {
            entry.visible = false;
        }
    }

    /// Remove an entry from the bell feed for good. Implies the toast is gone
    /// too; the entry stays in the audit history.
    pub async fn dismiss_from_bell(&self, id: i64) {
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.iter_mut().find(|n| n.id == id) {
            entry.dismissed_from_bell = true;
            entry.visible = false;
        }
    }

    pub async fn mark_all_read(&self) {
        for entry in self.entries.write().await.iter_mut() {
            entry.read = true;
        }
    }

    pub async fn active_toasts(&self) -> Vec<Notification> {
        self.entries
            .read()
            .await
            .iter()
            .filter(|n| n.visible)
            .cloned()
            .collect()
    }

    pub async fn bell_feed(&self) -> Vec<Notification> {
        self.entries
            .read()
            .await
            .iter()
            .filter(|n| !n.dismissed_from_bell)
            .cloned()
            .collect()
    }

    pub async fn unread_count(&self) -> usize {
        self.entries
            .read()
            .await
            .iter()
            .filter(|n| !n.dismissed_from_bell && !n.read)
            .count()
    }

    /// Full history, newest first, filtered by free-text search over message,
    /// patient name and tax id, and optionally by kind.
    pub async fn audit_feed(
        &self,
        search: Option<&str>,
        kind: Option<NotificationKind>,
    ) -> Vec<Notification> {
        let needle = search.map(str::to_lowercase).filter(|s| !s.is_empty());
        self.entries
            .read()
            .await
            .iter()
            .filter(|n| kind.map_or(true, |k| n.kind == k))
            .filter(|n| match &needle {
                None => true,
                Some(needle) => {
                    n.message.to_lowercase().contains(needle)
                        || n.patient.as_ref().is_some_and(|p| {
                            p.name.to_lowercase().contains(needle)
                                || p.nif.as_deref().is_some_and(|nif| nif.contains(needle))
                        })
                }
            })
            .cloned()
            .collect()
    }

    pub async fn ticker(&self) -> Option<Ticker> {
        self.ticker.read().await.clone()
    }

    pub async fn budget_pulse(&self) -> bool {
        *self.budget_pulse.read().await
    }

    /// Abort every pending timer. Call on teardown so late expiries cannot
    /// touch a store nobody observes anymore.
    pub fn shutdown(&self) {
        self.timers.shutdown();
    }

    /// Monotonic, time-derived identifiers: two records in the same
    /// millisecond still get strictly increasing ids.
    fn allocate_id(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let previous = match self
            .next_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(last.max(now - 1) + 1)
            }) {
            Ok(value) | Err(value) => value,
        };
        previous.max(now - 1) + 1
    }

    fn arm_toast_expiry(&self, id: i64) {
        let entries = Arc::clone(&self.entries);
        self.timers
            .schedule(TimerKey::Toast(id), self.toast_ttl, async move {
                // Reads current state: an earlier manual dismissal makes this
                // a no-op rather than a second transition.
                let mut entries = entries.write().await;
                if let Some(entry) = entries.iter_mut().find(|n| n.id == id) {
                    entry.visible = false;
                }
            });
    }

    async fn update_ticker(&self, message: String, category: NotificationCategory) {
        *self.ticker.write().await = Some(Ticker { message, category });
        let ticker = Arc::clone(&self.ticker);
        self.timers
            .schedule(TimerKey::Ticker, self.ticker_ttl, async move {
                *ticker.write().await = None;
            });
    }

    async fn arm_budget_pulse(&self) {
        *self.budget_pulse.write().await = true;
        let pulse = Arc::clone(&self.budget_pulse);
        self.timers
            .schedule(TimerKey::BudgetPulse, self.pulse_ttl, async move {
                *pulse.write().await = false;
            });
    }
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn record_plain(store: &NotificationStore, message: &str) -> Notification {
        store
            .record(
                message,
                NotificationKind::Info,
                None,
                NotificationCategory::General,
            )
            .await
    }

    #[tokio::test]
    async fn newest_entry_comes_first_everywhere() {
        let store = NotificationStore::new();
        record_plain(&store, "first").await;
        record_plain(&store, "second").await;

        let feed = store.bell_feed().await;
        assert_eq!(feed[0].message, "second");
        assert_eq!(feed[1].message, "first");
        assert_eq!(store.active_toasts().await[0].message, "second");
    }

    #[tokio::test]
    async fn ids_are_strictly_increasing() {
        let store = NotificationStore::new();
        let mut last = 0;
        for n in 0..50 {
            let id = record_plain(&store, &format!("event {n}")).await.id;
            assert!(id > last, "id {id} not greater than {last}");
            last = id;
        }
    }

    #[tokio::test]
    async fn bell_dismissal_is_permanent_and_hides_the_toast() {
        let store = NotificationStore::new();
        let n = record_plain(&store, "booked").await;

        store.dismiss_from_bell(n.id).await;
        store.dismiss_from_bell(n.id).await; // idempotent

        assert!(store.bell_feed().await.is_empty());
        assert!(store.active_toasts().await.is_empty());
        // Still part of the audit history.
        let audit = store.audit_feed(None, None).await;
        assert_eq!(audit.len(), 1);
        assert!(audit[0].dismissed_from_bell);
        assert!(!audit[0].visible);
    }

    #[tokio::test]
    async fn mark_all_read_clears_the_unread_count() {
        let store = NotificationStore::new();
        record_plain(&store, "one").await;
        record_plain(&store, "two").await;
        assert_eq!(store.unread_count().await, 2);

        store.mark_all_read().await;
        assert_eq!(store.unread_count().await, 0);
    }

    #[tokio::test]
    async fn dismissing_an_unknown_id_is_a_no_op() {
        let store = NotificationStore::new();
        record_plain(&store, "kept").await;
        store.dismiss_toast(999).await;
        store.dismiss_from_bell(999).await;
        assert_eq!(store.active_toasts().await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn toast_expires_after_its_ttl() {
        let store = NotificationStore::new();
        record_plain(&store, "fleeting").await;
        assert_eq!(store.active_toasts().await.len(), 1);

        tokio::time::sleep(Duration::from_millis(5_100)).await;
        tokio::task::yield_now().await;
        assert!(store.active_toasts().await.is_empty());
        // Expiry only touches the toast flag.
        assert_eq!(store.bell_feed().await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_dismissal_then_late_expiry_changes_nothing() {
        let store = NotificationStore::new();
        let n = record_plain(&store, "dismissed early").await;

        store.dismiss_toast(n.id).await;
        let before = store.audit_feed(None, None).await;

        tokio::time::sleep(Duration::from_millis(5_100)).await;
        tokio::task::yield_now().await;

        let after = store.audit_feed(None, None).await;
        assert_eq!(before.len(), after.len());
        assert!(!after[0].visible);
        assert!(!after[0].dismissed_from_bell);
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_follows_the_newest_event_then_hides() {
        let store = NotificationStore::new();
        record_plain(&store, "older").await;
        record_plain(&store, "newest").await;

        let ticker = store.ticker().await.expect("ticker armed");
        assert_eq!(ticker.message, "newest");

        tokio::time::sleep(Duration::from_millis(5_100)).await;
        tokio::task::yield_now().await;
        assert!(store.ticker().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn budget_events_arm_the_pulse_for_eight_seconds() {
        let store = NotificationStore::new();
        store
            .record(
                "Budget approved",
                NotificationKind::Success,
                None,
                NotificationCategory::Budget,
            )
            .await;
        assert!(store.budget_pulse().await);

        tokio::time::sleep(Duration::from_millis(8_100)).await;
        tokio::task::yield_now().await;
        assert!(!store.budget_pulse().await);
    }

    #[tokio::test]
    async fn snapshot_is_captured_by_value() {
        let store = NotificationStore::new();
        let mut snapshot = PatientSnapshot::named("Ana Silva");
        snapshot.nif = Some("254888999".to_string());

        store
            .record(
                "Slot confirmed for Ana Silva.",
                NotificationKind::Success,
                Some(snapshot.clone()),
                NotificationCategory::Appointment,
            )
            .await;

        // Mutating the caller's copy must not reach the recorded entry.
        snapshot.name = "Renamed".to_string();

        let feed = store.bell_feed().await;
        let recorded = feed[0].patient.as_ref().expect("snapshot recorded");
        assert_eq!(recorded.name, "Ana Silva");
        assert_eq!(recorded.nif.as_deref(), Some("254888999"));
    }

    #[tokio::test]
    async fn audit_feed_filters_by_text_and_kind() {
        let store = NotificationStore::new();
        store
            .record(
                "Slot unavailable for Dr. Ricardo M.",
                NotificationKind::Warning,
                None,
                NotificationCategory::Appointment,
            )
            .await;
        store
            .record(
                "Notes for Ana Silva saved.",
                NotificationKind::Success,
                Some(PatientSnapshot {
                    name: "Ana Silva".to_string(),
                    nif: Some("254888999".to_string()),
                    email: None,
                    phone: None,
                }),
                NotificationCategory::Patient,
            )
            .await;

        assert_eq!(store.audit_feed(Some("ana"), None).await.len(), 1);
        assert_eq!(store.audit_feed(Some("254888"), None).await.len(), 1);
        assert_eq!(
            store
                .audit_feed(None, Some(NotificationKind::Warning))
                .await
                .len(),
            1
        );
        assert_eq!(store.audit_feed(Some("nobody"), None).await.len(), 0);
    }
}
