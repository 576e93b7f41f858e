use std::sync::{Arc, OnceLock};

use super::manager::ClickManager;

static CLICK_MANAGER: OnceLock<Arc<ClickManager>> = OnceLock::new();

/// Install the process-wide click manager. Startup calls this exactly once,
/// after storage is ready.
pub fn set_click_manager(manager: Arc<ClickManager>) {
    if CLICK_MANAGER.set(manager).is_err() {
        panic!("click manager has already been installed");
    }
}

/// The installed click manager, if startup has run.
pub fn click_manager() -> Option<Arc<ClickManager>> {
    CLICK_MANAGER.get().cloned()
}
