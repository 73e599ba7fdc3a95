//! Background session reaper.
//!
//! A cooperative periodic task that asks the store to evict expired
//! sessions. Started explicitly, never at process import; stoppable without
//! letting a cancellation escape the caller. Two concurrent loops against
//! the same store is a defect, so `start` refuses to double-spawn.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::store::SessionStore;

/// Default sweep interval: 5 minutes.
pub const DEFAULT_REAP_INTERVAL: Duration = Duration::from_secs(300);

#[derive(Default)]
struct ReaperTask {
    handle: Option<JoinHandle<()>>,
    stop_tx: Option<oneshot::Sender<()>>,
}

pub struct SessionReaper {
    store: SessionStore,
    interval: Duration,
    task: Mutex<ReaperTask>,
}

impl SessionReaper {
    pub fn new(store: SessionStore, interval: Duration) -> Self {
        Self {
            store,
            interval,
            task: Mutex::new(ReaperTask::default()),
        }
    }

    pub fn with_default_interval(store: SessionStore) -> Self {
        Self::new(store, DEFAULT_REAP_INTERVAL)
    }

    /// Spawn the sweep loop. Idempotent: if a loop is already live this is
    /// a no-op; a finished loop is replaced.
    pub async fn start(self: &Arc<Self>) {
        let mut task = self.task.lock().await;
        if let Some(handle) = &task.handle {
            if !handle.is_finished() {
                debug!("Session reaper already running");
                return;
            }
        }

        let (stop_tx, stop_rx) = oneshot::channel();
        let reaper = Arc::clone(self);
        task.stop_tx = Some(stop_tx);
        task.handle = Some(tokio::spawn(async move {
            reaper.run(stop_rx).await;
        }));
        info!(interval_secs = self.interval.as_secs(), "Session reaper started");
    }

    /// Cancel the sweep loop and wait for it to finish. Safe to call when
    /// not running; never propagates the cancellation to the caller.
    pub async fn stop(&self) {
        let mut task = self.task.lock().await;
        if let Some(stop_tx) = task.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(handle) = task.handle.take() {
            let _ = handle.await;
            info!("Session reaper stopped");
        }
    }

    /// True while the sweep loop is live.
    pub async fn is_running(&self) -> bool {
        let task = self.task.lock().await;
        task.handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    async fn run(&self, mut stop_rx: oneshot::Receiver<()>) {
        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {
                    let reaped = self.store.cleanup_expired().await;
                    if reaped > 0 {
                        info!(reaped, "Reaped expired sessions");
                    }
                }
                _ = &mut stop_rx => {
                    debug!("Reaper loop cancelled");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, Utc};

    #[tokio::test]
    async fn reaper_evicts_expired_sessions() {
        let store = SessionStore::new();
        let session = store.create("user-1").await;
        store
            .with_session_mut(&session.id, |s| {
                s.last_activity = Utc::now() - ChronoDuration::minutes(s.timeout_minutes + 5);
            })
            .await
            .unwrap();

        let reaper = Arc::new(SessionReaper::new(store.clone(), Duration::from_millis(20)));
        reaper.start().await;

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(store.count().await, 0);

        reaper.stop().await;
        assert!(!reaper.is_running().await);
    }

    #[tokio::test]
    async fn start_is_idempotent_while_running() {
        let store = SessionStore::new();
        let reaper = Arc::new(SessionReaper::new(store, Duration::from_secs(60)));

        reaper.start().await;
        reaper.start().await;
        assert!(reaper.is_running().await);

        reaper.stop().await;
        assert!(!reaper.is_running().await);
    }

    #[tokio::test]
    async fn stop_without_start_is_harmless_and_restart_works() {
        let store = SessionStore::new();
        let reaper = Arc::new(SessionReaper::new(store, Duration::from_secs(60)));

        reaper.stop().await;

        reaper.start().await;
        reaper.stop().await;
        reaper.start().await;
        assert!(reaper.is_running().await);
        reaper.stop().await;
    }
}
