//! Business logic shared by the HTTP handlers.

mod health;
mod link_service;
mod redirect;

pub use health::{AppStartTime, HealthService};
pub use link_service::{CreateLinkRequest, LinkCreateResult, LinkService, MAX_GENERATE_ATTEMPTS};
pub use redirect::RedirectService;
