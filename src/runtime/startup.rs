use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::config::get_config;
use crate::services::LinkService;
use crate::storage::click::{set_click_manager, ClickManager};
use crate::storage::{Repository, RepositoryFactory, SeaOrmRepository};

/// Everything `main` needs to wire the HTTP server, built in one explicit
/// sequence: storage (with migrations) first, then services, then the click
/// manager and its flush task.
pub struct StartupContext {
    pub storage: Arc<SeaOrmRepository>,
    pub repository: Arc<dyn Repository>,
    pub link_service: Arc<LinkService>,
}

pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = RepositoryFactory::create()
        .await
        .context("Failed to create storage backend")?;
    let repository: Arc<dyn Repository> = storage.clone();

    let link_service = Arc::new(LinkService::new(repository.clone()));

    let flush_interval = get_config().features.click_flush_interval;
    match storage.as_click_sink() {
        Some(sink) => {
            let manager = Arc::new(ClickManager::new(sink, Duration::from_secs(flush_interval)));
            set_click_manager(manager.clone());
            tokio::spawn(manager.run_flush_loop());
            debug!("Click manager installed, flush interval {}s", flush_interval);
        }
        None => {
            warn!("Storage backend exposes no click sink; click tracking disabled");
        }
    }

    info!(
        "Startup preparation completed in {:?}",
        start_time.elapsed()
    );

    Ok(StartupContext {
        storage,
        repository,
        link_service,
    })
}
