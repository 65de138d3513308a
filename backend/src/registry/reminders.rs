//! Timer registry for lead reminders.
//!
//! Each pending reminder owns a one-shot tokio task that sleeps until
//! `reminder_time` and then moves the reminder into the due outbox, where
//! `GET /api/reminders/due` picks it up. Timers are keyed by lead id:
//! scheduling again replaces the previous timer, and deleting the lead or
//! resolving the reminder aborts it.
//!
//! The set of pending reminders is persisted through the `LocalStore` port
//! under the `reminders` key so that `restore` can re-arm them after a
//! restart. Reminders already overdue at restore time fire immediately.

use crate::store::{LocalStore, StoreError};
use chrono::Utc;
use common::model::reminder::Reminder;
use log::{info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::AbortHandle;

const STORAGE_KEY: &str = "reminders";
/// Upper bound on fired reminders nobody has collected yet.
const MAX_DUE: usize = 500;
/// Uncollected reminders older than this are dropped from the outbox.
const DUE_RETENTION_MS: i64 = 7 * 24 * 60 * 60 * 1000;

struct Armed {
    reminder: Reminder,
    timer: AbortHandle,
}

struct Inner {
    storage: Arc<dyn LocalStore>,
    armed: Mutex<HashMap<String, Armed>>,
    due: Mutex<Vec<Reminder>>,
}

/// Clonable handle to the shared registry.
#[derive(Clone)]
pub struct ReminderRegistry {
    inner: Arc<Inner>,
}

impl ReminderRegistry {
    pub fn new(storage: Arc<dyn LocalStore>) -> Self {
        ReminderRegistry {
            inner: Arc::new(Inner {
                storage,
                armed: Mutex::new(HashMap::new()),
                due: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Re-arms every persisted reminder. Returns how many were restored.
    pub async fn restore(&self) -> Result<usize, StoreError> {
        let persisted: Vec<Reminder> = match self.inner.storage.get(STORAGE_KEY)? {
            Some(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                warn!("Discarding unreadable reminder registry: {}", e);
                Vec::new()
            }),
            None => Vec::new(),
        };

        let mut armed = self.inner.armed.lock().await;
        for reminder in persisted {
            let timer = self.arm(&reminder);
            armed.insert(reminder.lead_id.clone(), Armed { reminder, timer });
        }
        Ok(armed.len())
    }

    /// Arms (or re-arms) the reminder for its lead.
    pub async fn schedule(&self, reminder: Reminder) -> Result<(), StoreError> {
        let mut armed = self.inner.armed.lock().await;
        if let Some(previous) = armed.remove(&reminder.lead_id) {
            previous.timer.abort();
        }
        let timer = self.arm(&reminder);
        info!(
            "Reminder for lead {} set for {}",
            reminder.lead_id, reminder.reminder_time
        );
        armed.insert(reminder.lead_id.clone(), Armed { reminder, timer });
        self.persist(&armed)
    }

    /// Aborts the lead's timer, if any, and returns the cancelled reminder.
    pub async fn cancel(&self, lead_id: &str) -> Result<Option<Reminder>, StoreError> {
        let mut armed = self.inner.armed.lock().await;
        let Some(entry) = armed.remove(lead_id) else {
            return Ok(None);
        };
        entry.timer.abort();
        self.persist(&armed)?;
        Ok(Some(entry.reminder))
    }

    /// Pending reminders, soonest first.
    pub async fn pending(&self) -> Vec<Reminder> {
        let armed = self.inner.armed.lock().await;
        let mut pending: Vec<Reminder> = armed.values().map(|a| a.reminder.clone()).collect();
        pending.sort_by_key(|r| r.reminder_time);
        pending
    }

    /// Removes and returns the fired reminders accepted by `wanted`.
    pub async fn take_due<F>(&self, wanted: F) -> Vec<Reminder>
    where
        F: Fn(&Reminder) -> bool,
    {
        let mut due = self.inner.due.lock().await;
        let (taken, kept): (Vec<Reminder>, Vec<Reminder>) = due.drain(..).partition(|r| wanted(r));
        *due = kept;
        taken
    }

    fn arm(&self, reminder: &Reminder) -> AbortHandle {
        let registry = self.clone();
        let lead_id = reminder.lead_id.clone();
        let reminder_time = reminder.reminder_time;
        let wait = reminder_time.saturating_sub(Utc::now().timestamp_millis()).max(0) as u64;

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(wait)).await;
            registry.fire(&lead_id, reminder_time).await;
        })
        .abort_handle()
    }

    async fn fire(&self, lead_id: &str, reminder_time: i64) {
        let fired = {
            let mut armed = self.inner.armed.lock().await;
            // A replacement scheduled meanwhile owns the slot now.
            if armed
                .get(lead_id)
                .is_none_or(|a| a.reminder.reminder_time != reminder_time)
            {
                return;
            }
            let entry = armed.remove(lead_id);
            if let Err(e) = self.persist(&armed) {
                warn!("Could not persist reminders after firing {}: {}", lead_id, e);
            }
            entry.map(|a| a.reminder)
        };

        if let Some(reminder) = fired {
            info!(
                "Reminder due for lead {} ({})",
                reminder.lead_id,
                reminder.lead_name.as_deref().unwrap_or("unnamed")
            );
            let mut due = self.inner.due.lock().await;
            push_due(&mut due, reminder, Utc::now().timestamp_millis());
        }
    }

    fn persist(&self, armed: &HashMap<String, Armed>) -> Result<(), StoreError> {
        let reminders: Vec<&Reminder> = armed.values().map(|a| &a.reminder).collect();
        let json = serde_json::to_string(&reminders)?;
        self.inner.storage.set(STORAGE_KEY, &json)
    }
}

/// Appends to the outbox, dropping stale entries and the oldest overflow.
fn push_due(due: &mut Vec<Reminder>, reminder: Reminder, now_ms: i64) {
    due.push(reminder);
    let cutoff = now_ms - DUE_RETENTION_MS;
    let before = due.len();
    due.retain(|r| r.reminder_time >= cutoff);
    if due.len() > MAX_DUE {
        due.sort_by_key(|r| r.reminder_time);
        let excess = due.len() - MAX_DUE;
        due.drain(..excess);
    }
    if due.len() < before {
        warn!("Dropped {} uncollected reminder(s) from the outbox", before - due.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryKv;

    fn reminder(lead_id: &str, in_ms: i64) -> Reminder {
        Reminder {
            lead_id: lead_id.into(),
            lead_name: Some("Asha".into()),
            phone_number: None,
            email: None,
            specific_disposition: "Call after exams".into(),
            assigned_to: Some("a@s.in".into()),
            reminder_time: Utc::now().timestamp_millis() + in_ms,
            created_by: "a@s.in".into(),
        }
    }

    fn registry() -> (Arc<MemoryKv>, ReminderRegistry) {
        let kv = Arc::new(MemoryKv::default());
        (kv.clone(), ReminderRegistry::new(kv))
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_the_time_has_passed() {
        let (_kv, registry) = registry();
        registry.schedule(reminder("rec1", 60_000)).await.unwrap();

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(registry.take_due(|_| true).await.is_empty());
        assert_eq!(registry.pending().await.len(), 1);

        tokio::time::sleep(Duration::from_secs(31)).await;
        let due = registry.take_due(|_| true).await;
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].lead_id, "rec1");
        assert!(registry.pending().await.is_empty());
        assert!(registry.take_due(|_| true).await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_reminders_never_fire() {
        let (kv, registry) = registry();
        registry.schedule(reminder("rec1", 1_000)).await.unwrap();
        let cancelled = registry.cancel("rec1").await.unwrap();
        assert_eq!(cancelled.map(|r| r.lead_id).as_deref(), Some("rec1"));
        assert_eq!(registry.cancel("rec1").await.unwrap(), None);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(registry.take_due(|_| true).await.is_empty());
        assert_eq!(kv.get(STORAGE_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test(start_paused = true)]
    async fn rescheduling_replaces_the_previous_timer() {
        let (_kv, registry) = registry();
        registry.schedule(reminder("rec1", 1_000)).await.unwrap();
        registry.schedule(reminder("rec1", 120_000)).await.unwrap();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(registry.take_due(|_| true).await.is_empty());
        assert_eq!(registry.pending().await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn restore_rearms_persisted_reminders() {
        let kv = Arc::new(MemoryKv::default());
        let snapshot = vec![reminder("rec3", -1_000), reminder("rec4", 600_000)];
        kv.set(STORAGE_KEY, &serde_json::to_string(&snapshot).unwrap())
            .unwrap();

        let restored = ReminderRegistry::new(kv);
        assert_eq!(restored.restore().await.unwrap(), 2);

        tokio::time::sleep(Duration::from_millis(10)).await;
        let due = restored.take_due(|r| r.concerns("a@s.in")).await;
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].lead_id, "rec3");
        let pending: Vec<_> = restored
            .pending()
            .await
            .into_iter()
            .map(|r| r.lead_id)
            .collect();
        assert_eq!(pending, vec!["rec4".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn take_due_leaves_other_users_reminders() {
        let (_kv, registry) = registry();
        let mut other = reminder("rec2", 10);
        other.assigned_to = Some("b@s.in".into());
        other.created_by = "b@s.in".into();
        registry.schedule(reminder("rec1", 10)).await.unwrap();
        registry.schedule(other).await.unwrap();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(registry.take_due(|r| r.concerns("a@s.in")).await.len(), 1);
        assert_eq!(registry.take_due(|r| r.concerns("b@s.in")).await.len(), 1);
    }

    #[test]
    fn outbox_drops_stale_and_overflowing_entries() {
        let now = Utc::now().timestamp_millis();
        let mut due = Vec::new();
        push_due(&mut due, reminder("stale", -DUE_RETENTION_MS - 60_000), now);
        assert!(due.is_empty());

        for i in 0..MAX_DUE + 3 {
            let mut r = reminder(&format!("rec{}", i), 0);
            r.reminder_time = now - 1_000 + i as i64;
            push_due(&mut due, r, now);
        }
        assert_eq!(due.len(), MAX_DUE);
        assert_eq!(due[0].lead_id, "rec3");
        assert_eq!(due[MAX_DUE - 1].lead_id, format!("rec{}", MAX_DUE + 2));
    }
}
