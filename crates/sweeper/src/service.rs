//! Core sweeper: ingestion, the periodic sweep cycle, admin operations.

use std::{
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use {
    tokio::{
        sync::{Mutex, Notify, RwLock},
        task::JoinHandle,
    },
    tracing::{debug, info, warn},
};

use crate::{
    Result,
    backend::{BackendError, ChannelDirectory, MessageBackend},
    error::Error,
    parse::parse_ttl_seconds,
    store::ConfigStore,
    types::{ChannelConfig, RemoveReport, TrackedChannel},
};

/// Fixed sweep cadence. Deletion is best-effort: a message outlives its
/// deadline by at most one cycle plus backend latency.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(10);

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// What the sweep decided about one expired entry.
enum Disposition {
    /// Drop the entry from pending; the reason lands in the debug log.
    Retire(&'static str),
    /// Keep the entry for the next cycle.
    Defer(BackendError),
}

/// The deletion scheduler.
///
/// Every registry read-modify-write serializes through the single `lock`.
/// Throughput is bounded by the 10-second sweep cadence, not by lock
/// contention, so there is no finer-grained locking.
pub struct SweeperService {
    store: Arc<dyn ConfigStore>,
    backend: Arc<dyn MessageBackend>,
    directory: Arc<dyn ChannelDirectory>,
    lock: Mutex<()>,
    sweep_handle: Mutex<Option<JoinHandle<()>>>,
    shutdown: Arc<Notify>,
    running: RwLock<bool>,
}

impl SweeperService {
    pub fn new(
        store: Arc<dyn ConfigStore>,
        backend: Arc<dyn MessageBackend>,
        directory: Arc<dyn ChannelDirectory>,
    ) -> Arc<Self> {
        Arc::new(Self {
            store,
            backend,
            directory,
            lock: Mutex::new(()),
            sweep_handle: Mutex::new(None),
            shutdown: Arc::new(Notify::new()),
            running: RwLock::new(false),
        })
    }

    /// Start the background sweep loop.
    pub async fn start(self: &Arc<Self>) {
        *self.running.write().await = true;

        let svc = Arc::clone(self);
        let handle = tokio::spawn(async move {
            svc.sweep_loop().await;
        });

        *self.sweep_handle.lock().await = Some(handle);
        info!(interval_secs = SWEEP_INTERVAL.as_secs(), "sweeper started");
    }

    /// Stop the background sweep loop. A cycle already in flight is aborted.
    pub async fn stop(&self) {
        *self.running.write().await = false;
        self.shutdown.notify_one();

        let mut handle = self.sweep_handle.lock().await;
        if let Some(h) = handle.take() {
            h.abort();
        }
        info!("sweeper stopped");
    }

    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }

    // ── Ingestion ───────────────────────────────────────────────────────

    /// Event hook for a newly observed message.
    pub async fn on_message(
        &self,
        channel_id: &str,
        message_id: &str,
        author_is_bot: bool,
    ) -> Result<()> {
        self.on_message_at(channel_id, message_id, author_is_bot, now_secs())
            .await
    }

    /// Ingestion with an explicit clock: schedules `message_id` for deletion
    /// at `now + ttl`. No-op for bot authors and untracked channels.
    pub async fn on_message_at(
        &self,
        channel_id: &str,
        message_id: &str,
        author_is_bot: bool,
        now: u64,
    ) -> Result<()> {
        if author_is_bot {
            return Ok(());
        }

        let _guard = self.lock.lock().await;
        let config = self.store.get_channel(channel_id).await?;
        if !config.is_tracking() {
            return Ok(());
        }

        let deadline = now.saturating_add(config.ttl_seconds);
        let mut pending = config.pending;
        pending.insert(message_id.to_string(), deadline);
        self.store.set_pending(channel_id, pending).await?;

        debug!(channel_id, message_id, deadline, "message scheduled for deletion");
        Ok(())
    }

    // ── Sweep ───────────────────────────────────────────────────────────

    async fn sweep_loop(self: &Arc<Self>) {
        loop {
            if !*self.running.read().await {
                break;
            }

            self.sweep_once(now_secs()).await;

            let shutdown = Arc::clone(&self.shutdown);
            tokio::select! {
                () = tokio::time::sleep(SWEEP_INTERVAL) => {},
                () = shutdown.notified() => {
                    debug!("sweep loop woken for shutdown");
                    break;
                },
            }
        }
    }

    /// One sweep cycle at time `now`. Faults never escape the cycle: failing
    /// channels and messages are deferred to the next one.
    pub async fn sweep_once(&self, now: u64) {
        let _guard = self.lock.lock().await;

        let channels = match self.store.all_channels().await {
            Ok(channels) => channels,
            Err(error) => {
                warn!(%error, "sweep skipped: cannot load channel configs");
                return;
            },
        };

        for (channel_id, config) in channels {
            if !config.is_tracking() {
                continue;
            }
            self.sweep_channel(&channel_id, config, now).await;
        }
    }

    async fn sweep_channel(&self, channel_id: &str, config: ChannelConfig, now: u64) {
        // Entries in unavailable channels stay pending for a future cycle.
        match self.directory.resolve(channel_id).await {
            Some(channel) if channel.is_trackable() && channel.bot_can_manage => {},
            Some(_) => {
                debug!(channel_id, "channel untrackable or permission lost, deferring");
                return;
            },
            None => {
                debug!(channel_id, "channel no longer resolves, deferring");
                return;
            },
        }

        // Iterate a snapshot, mutate the working map, persist only on change.
        let snapshot: Vec<(String, u64)> = config
            .pending
            .iter()
            .map(|(id, deadline)| (id.clone(), *deadline))
            .collect();
        let mut pending = config.pending;
        let mut changed = false;

        for (message_id, deadline) in snapshot {
            if deadline > now {
                continue;
            }

            match self.reap_message(channel_id, &message_id).await {
                Disposition::Retire(reason) => {
                    pending.remove(&message_id);
                    changed = true;
                    debug!(channel_id, message_id, reason, "entry retired");
                },
                Disposition::Defer(error) => {
                    warn!(channel_id, message_id, %error, "deletion deferred, retrying next cycle");
                },
            }
        }

        if changed {
            if let Err(error) = self.store.set_pending(channel_id, pending).await {
                warn!(channel_id, %error, "failed to persist swept pending map");
            }
        }
    }

    /// Fetch-then-delete for one expired entry.
    async fn reap_message(&self, channel_id: &str, message_id: &str) -> Disposition {
        let message = match self.backend.fetch_message(channel_id, message_id).await {
            Ok(message) => message,
            Err(error) if error.is_terminal() => return Disposition::Retire("fetch terminal"),
            Err(error) => return Disposition::Defer(error),
        };

        // Pinned messages are permanently exempt once their deadline passes.
        if message.pinned {
            return Disposition::Retire("pinned");
        }

        match self.backend.delete_message(channel_id, message_id).await {
            Ok(()) => Disposition::Retire("deleted"),
            Err(error) if error.is_terminal() => Disposition::Retire("delete terminal"),
            Err(error) => Disposition::Defer(error),
        }
    }

    // ── Admin operations ────────────────────────────────────────────────

    /// Set a channel's TTL from a raw duration string, returning the
    /// normalized effective seconds. `"0"` disables tracking. Requires the
    /// channel to be a trackable kind and both the bot and `actor_id` to hold
    /// manage-messages there. Deadlines already pending are left untouched.
    pub async fn set_channel_ttl(
        &self,
        channel_id: &str,
        raw_duration: &str,
        actor_id: &str,
    ) -> Result<u64> {
        let seconds = parse_ttl_seconds(raw_duration)?;

        let channel = self
            .directory
            .resolve(channel_id)
            .await
            .ok_or_else(|| Error::channel_unavailable(channel_id))?;
        if !channel.is_trackable() {
            return Err(Error::untrackable(channel_id));
        }
        if !channel.bot_can_manage {
            return Err(Error::permission_denied(channel_id, "bot"));
        }
        if !self.directory.can_manage_messages(channel_id, actor_id).await {
            return Err(Error::permission_denied(channel_id, actor_id));
        }

        let _guard = self.lock.lock().await;
        self.store.set_ttl(channel_id, seconds).await?;
        info!(channel_id, ttl_seconds = seconds, "channel TTL updated");
        Ok(seconds)
    }

    /// Exempt messages from deletion. Ids not currently pending are reported
    /// back rather than treated as errors.
    pub async fn remove_messages(&self, channel_id: &str, ids: &[String]) -> Result<RemoveReport> {
        let _guard = self.lock.lock().await;
        let config = self.store.get_channel(channel_id).await?;
        let mut pending = config.pending;

        let mut report = RemoveReport::default();
        for id in ids {
            if pending.remove(id).is_some() {
                report.removed.push(id.clone());
            } else {
                report.not_found.push(id.clone());
            }
        }

        if !report.removed.is_empty() {
            self.store.set_pending(channel_id, pending).await?;
            info!(
                channel_id,
                removed = report.removed.len(),
                "messages exempted from deletion"
            );
        }
        Ok(report)
    }

    /// Clear a channel's entire pending map. The TTL is untouched, so new
    /// messages keep getting tracked. Idempotent.
    pub async fn wipe_channel(&self, channel_id: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.store
            .set_pending(channel_id, std::collections::HashMap::new())
            .await?;
        info!(channel_id, "pending map wiped");
        Ok(())
    }

    /// All channels with a non-zero TTL, sorted by id for stable output.
    pub async fn list_tracked(&self) -> Result<Vec<TrackedChannel>> {
        let _guard = self.lock.lock().await;
        let channels = self.store.all_channels().await?;

        let mut tracked: Vec<TrackedChannel> = channels
            .into_iter()
            .filter(|(_, config)| config.is_tracking())
            .map(|(channel_id, config)| TrackedChannel {
                channel_id,
                ttl_seconds: config.ttl_seconds,
            })
            .collect();
        tracked.sort_by(|a, b| a.channel_id.cmp(&b.channel_id));
        Ok(tracked)
    }
}
