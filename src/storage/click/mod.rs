//! Best-effort click ledger.
//!
//! Redirect handlers record visits into an in-memory buffer; a background
//! task periodically flushes the buffer to storage. A flush failure is logged
//! and never reaches the client that already received its redirect.

mod global;
mod manager;
mod sink;

pub use global::{click_manager, set_click_manager};
pub use manager::ClickManager;
pub use sink::{ClickSink, ClickUpdate};
