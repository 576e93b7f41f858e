use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::time::{sleep, Duration};
use tracing::{debug, warn};

use super::sink::{ClickSink, ClickUpdate};

#[derive(Debug, Clone, Copy)]
struct Pending {
    count: u64,
    last_clicked_at: DateTime<Utc>,
}

/// Buffers click counts per link id and flushes them to a sink on an
/// interval. Recording a click is a lock-free map update, so the redirect
/// path never waits on storage.
pub struct ClickManager {
    buffer: DashMap<i64, Pending>,
    // Prevents overlapping flushes when a manual flush races the timer.
    flushing: AtomicBool,
    sink: Arc<dyn ClickSink>,
    flush_interval: Duration,
}

impl ClickManager {
    pub fn new(sink: Arc<dyn ClickSink>, flush_interval: Duration) -> Self {
        Self {
            buffer: DashMap::new(),
            flushing: AtomicBool::new(false),
            sink,
            flush_interval,
        }
    }

    /// Record one visit. Cheap and infallible; called on the redirect path.
    pub fn increment(&self, link_id: i64) {
        let now = Utc::now();
        self.buffer
            .entry(link_id)
            .and_modify(|p| {
                p.count += 1;
                p.last_clicked_at = now;
            })
            .or_insert(Pending {
                count: 1,
                last_clicked_at: now,
            });
    }

    /// Number of links with unflushed clicks.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Periodic flush loop; spawned once at startup.
    pub async fn run_flush_loop(self: Arc<Self>) {
        loop {
            sleep(self.flush_interval).await;
            self.flush().await;
        }
    }

    /// Drain the buffer into the sink. Failures are logged and the batch is
    /// dropped; a lost batch must never surface to a client.
    pub async fn flush(&self) {
        if self.flushing.swap(true, Ordering::SeqCst) {
            debug!("Click flush already in progress, skipping");
            return;
        }

        let updates: Vec<ClickUpdate> = self
            .buffer
            .iter()
            .map(|entry| ClickUpdate {
                link_id: *entry.key(),
                count: entry.value().count,
                last_clicked_at: entry.value().last_clicked_at,
            })
            .collect();

        if updates.is_empty() {
            self.flushing.store(false, Ordering::SeqCst);
            return;
        }
        self.buffer.clear();

        let batch_size = updates.len();
        if let Err(e) = self.sink.flush_clicks(updates).await {
            warn!("Click flush failed, dropping {} entries: {}", batch_size, e);
        } else {
            debug!("Flushed clicks for {} links", batch_size);
        }

        self.flushing.store(false, Ordering::SeqCst);
    }
}
