use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A live short link. Soft-deleted rows never leave the storage layer,
/// so `deleted_at` is not part of the domain type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Link {
    /// Stable internal identity; click bookkeeping is addressed by this,
    /// never by the (reusable) code.
    pub id: i64,
    pub code: String,
    pub target_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub last_clicked_at: Option<DateTime<Utc>>,
}
