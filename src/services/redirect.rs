use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Responder};
use tracing::{debug, error, trace};

use crate::config::get_config;
use crate::storage::click::click_manager;
use crate::storage::Repository;
use crate::utils::is_valid_code;

pub struct RedirectService {}

impl RedirectService {
    pub async fn handle_redirect(
        path: web::Path<String>,
        storage: web::Data<Arc<dyn Repository>>,
    ) -> impl Responder {
        let code = path.into_inner();

        if code.is_empty() {
            let default_url = get_config().features.default_url.clone();
            return HttpResponse::TemporaryRedirect()
                .insert_header(("Location", default_url))
                .finish();
        }

        // Malformed codes can never match a row; skip the storage round trip.
        if !is_valid_code(&code) {
            trace!("Invalid code shape rejected: {}", code);
            return Self::not_found_response();
        }

        match storage.find_active(&code).await {
            Ok(Some(link)) => {
                // The ledger write is a buffered in-memory increment; the
                // redirect below never waits on storage for it.
                Self::record_click(link.id);
                HttpResponse::build(StatusCode::TEMPORARY_REDIRECT)
                    .insert_header(("Location", link.target_url))
                    .finish()
            }
            Ok(None) => {
                debug!("Redirect link not found: {}", code);
                Self::not_found_response()
            }
            Err(e) => {
                error!("Database error during redirect lookup: {}", e);
                HttpResponse::InternalServerError()
                    .insert_header(("Content-Type", "text/plain; charset=utf-8"))
                    .body("Internal Server Error")
            }
        }
    }

    fn record_click(link_id: i64) {
        match click_manager() {
            Some(manager) => manager.increment(link_id),
            None => {
                debug!("Click manager not installed, skipping click for link {}", link_id);
            }
        }
    }

    fn not_found_response() -> HttpResponse {
        HttpResponse::build(StatusCode::NOT_FOUND)
            .insert_header(("Content-Type", "text/plain; charset=utf-8"))
            .insert_header(("Cache-Control", "public, max-age=60"))
            .body("Not Found")
    }
}
