use std::time::Duration;

use tokio::time::timeout;
use tracing::{error, info};

use crate::storage::click::click_manager;

const SHUTDOWN_FLUSH_TIMEOUT_SECS: u64 = 10;

/// Final click-buffer flush, run after the HTTP server has stopped accepting
/// requests. Bounded so a wedged database cannot hang process exit.
pub async fn flush_on_shutdown() {
    let Some(manager) = click_manager() else {
        info!("Click manager not installed, nothing to flush");
        return;
    };

    match timeout(
        Duration::from_secs(SHUTDOWN_FLUSH_TIMEOUT_SECS),
        manager.flush(),
    )
    .await
    {
        Ok(()) => info!("Click buffer flushed on shutdown"),
        Err(_) => error!(
            "Shutdown click flush timed out after {} seconds",
            SHUTDOWN_FLUSH_TIMEOUT_SECS
        ),
    }
}
