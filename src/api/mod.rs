//! HTTP surface: JSON API, health probe, and the redirect catch-all.

use actix_web::web;

mod links;
pub mod types;

use crate::services::{HealthService, RedirectService};

pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/links", web::get().to(links::get_links))
            .route("/links", web::post().to(links::post_link))
            .route("/links/{code}", web::get().to(links::get_link))
            .route("/links/{code}", web::delete().to(links::delete_link)),
    );
}

pub fn health_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(HealthService::health_check));
}

/// Must be registered last: `/{path}` swallows everything the other scopes
/// did not claim.
pub fn redirect_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/{path:.*}",
        web::get().to(RedirectService::handle_redirect),
    );
}
