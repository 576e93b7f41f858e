use chrono::{DateTime, Utc};

/// One buffered batch entry: how many visits a link received and when the
/// most recent one happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickUpdate {
    pub link_id: i64,
    pub count: u64,
    pub last_clicked_at: DateTime<Utc>,
}

/// Where drained click batches go. The storage backend implements this;
/// tests substitute a recording sink.
#[async_trait::async_trait]
pub trait ClickSink: Send + Sync {
    async fn flush_clicks(&self, updates: Vec<ClickUpdate>) -> anyhow::Result<()>;
}
