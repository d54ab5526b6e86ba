//! Scheduler engine — the loop that rechecks every watch.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::Notify;

use classwatch_core::config::WatchConfig;
use classwatch_core::error::Result;
use classwatch_core::traits::{AvailabilityProvider, NotificationSink};
use classwatch_store::{RequestStore, TrackingRequest};

use crate::message::open_seat_message;
use crate::policy::{EdgePolicy, NotifyDecision, NotifyPolicy, RepeatPolicy};

/// What one tick did, for the status surface and the per-tick hook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Requests evaluated this tick.
    pub checked: usize,
    /// Notifications actually delivered.
    pub notified: usize,
    /// Requests whose check or delivery failed (and were skipped).
    pub failed: usize,
}

type TickHook = Box<dyn Fn(TickSummary) + Send + Sync>;

/// The polling scheduler. One background task, sequential checks, a
/// courtesy delay between them. Cheap to share via `Arc`.
pub struct WatchScheduler {
    store: Arc<RequestStore>,
    provider: Arc<dyn AvailabilityProvider>,
    sink: Arc<dyn NotificationSink>,
    policy: Arc<dyn NotifyPolicy>,
    check_interval: Duration,
    check_delay: Duration,
    running: AtomicBool,
    shutdown: Notify,
    on_tick: Mutex<Option<TickHook>>,
}

impl WatchScheduler {
    pub fn new(
        store: Arc<RequestStore>,
        provider: Arc<dyn AvailabilityProvider>,
        sink: Arc<dyn NotificationSink>,
        policy: Arc<dyn NotifyPolicy>,
        config: &WatchConfig,
    ) -> Self {
        Self {
            store,
            provider,
            sink,
            policy,
            check_interval: Duration::from_secs(config.check_interval_minutes * 60),
            check_delay: Duration::from_millis(config.check_delay_ms),
            running: AtomicBool::new(false),
            shutdown: Notify::new(),
            on_tick: Mutex::new(None),
        }
    }

    /// Pick the dedupe policy the config asks for.
    pub fn policy_from_config(config: &WatchConfig) -> Arc<dyn NotifyPolicy> {
        if config.renotify_every_tick {
            Arc::new(RepeatPolicy)
        } else {
            Arc::new(EdgePolicy::new())
        }
    }

    /// Per-tick observability hook (request count processed etc.).
    pub fn set_on_tick<F>(&self, hook: F)
    where
        F: Fn(TickSummary) + Send + Sync + 'static,
    {
        *self.on_tick.lock().expect("hook lock poisoned") = Some(Box::new(hook));
    }

    /// Spawn the background loop. A no-op when already running.
    pub fn start(self: &Arc<Self>) {
        if self.running.swap(true, Ordering::SeqCst) {
            tracing::debug!("Background checker already running");
            return;
        }

        tracing::info!(
            "⏰ Background checker started (interval: {}s)",
            self.check_interval.as_secs()
        );

        let scheduler = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(scheduler.check_interval);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        if !scheduler.running.load(Ordering::SeqCst) {
                            break;
                        }
                        let summary = scheduler.run_tick().await;
                        if let Some(hook) = scheduler
                            .on_tick
                            .lock()
                            .expect("hook lock poisoned")
                            .as_ref()
                        {
                            hook(summary);
                        }
                    }
                    _ = scheduler.shutdown.notified() => break,
                }
            }
            tracing::info!("⏰ Background checker stopped");
        });
    }

    /// Stop before the next tick; an in-flight tick runs to completion.
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            self.shutdown.notify_waiters();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// One full pass over all stored requests, in insertion order.
    ///
    /// Public so tests and the status surface can drive ticks without
    /// wall-clock waits. A failing request is logged and skipped; it
    /// never aborts the rest of the tick.
    pub async fn run_tick(&self) -> TickSummary {
        tracing::info!("Running background availability check...");
        let requests = self.store.list_all();

        if requests.is_empty() {
            tracing::info!("No active tracking requests");
            return TickSummary::default();
        }

        tracing::info!("Checking {} tracking request(s)", requests.len());
        let mut summary = TickSummary {
            checked: requests.len(),
            ..Default::default()
        };

        for request in &requests {
            match self.check_one(request).await {
                Ok(true) => summary.notified += 1,
                Ok(false) => {}
                Err(e) => {
                    summary.failed += 1;
                    tracing::error!("Error checking request {}: {e}", request.id);
                }
            }
            // Courtesy pause between provider hits.
            tokio::time::sleep(self.check_delay).await;
        }

        tracing::info!(
            "Background check completed ({} checked, {} notified, {} failed)",
            summary.checked,
            summary.notified,
            summary.failed
        );
        summary
    }

    /// Check one request; returns whether a notification went out.
    async fn check_one(&self, request: &TrackingRequest) -> Result<bool> {
        let outcome = request.kind.check(self.provider.as_ref(), &request.term).await;

        // Stamp "we tried" even when the lookup failed, so a live
        // request never shows a stale last_checked.
        if let Err(e) = self.store.update_checked(&request.id) {
            tracing::warn!("⚠️ Failed to stamp last_checked for {}: {e}", request.id);
        }

        let result = outcome?;

        match self.policy.decide(request, &result) {
            NotifyDecision::NotAvailable | NotifyDecision::AlreadyNotified => Ok(false),
            NotifyDecision::NotifyNow => {
                let text = open_seat_message(request, &result);
                self.sink
                    .send(request.channel_id, request.user_id, &text)
                    .await?;
                // Only a delivered notification counts as notified.
                self.store.update_notified(&request.id)?;
                self.policy.mark_sent(&request.id);
                tracing::info!(
                    "🔔 Notified {} about {} availability",
                    request.username,
                    request.kind.describe()
                );
                Ok(true)
            }
        }
    }
}
