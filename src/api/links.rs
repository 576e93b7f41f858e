//! JSON API handlers backing the dashboard.

use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};
use tracing::{info, trace};

use crate::services::{CreateLinkRequest, LinkService};

use super::types::{error_response, GetLinksQuery, LinkResponse, MessageBody, PostNewLink};

/// `GET /api/links?search=` — all active links, newest first.
pub async fn get_links(
    query: web::Query<GetLinksQuery>,
    service: web::Data<Arc<LinkService>>,
) -> impl Responder {
    trace!("API: list links, search={:?}", query.search);

    match service.list_links(query.search.as_deref()).await {
        Ok(links) => {
            let body: Vec<LinkResponse> = links.into_iter().map(LinkResponse::from).collect();
            info!("API: returning {} links", body.len());
            HttpResponse::Ok().json(body)
        }
        Err(e) => error_response(&e),
    }
}

/// `POST /api/links` — create a link, allocating a code when none is given.
pub async fn post_link(
    payload: web::Json<PostNewLink>,
    service: web::Data<Arc<LinkService>>,
) -> impl Responder {
    let payload = payload.into_inner();

    let request = CreateLinkRequest {
        code: payload.code,
        target: payload.url,
    };

    match service.create_link(request).await {
        Ok(result) => HttpResponse::Created().json(LinkResponse::from(result.link)),
        Err(e) => error_response(&e),
    }
}

/// `GET /api/links/{code}` — one link with its click stats.
pub async fn get_link(
    path: web::Path<String>,
    service: web::Data<Arc<LinkService>>,
) -> impl Responder {
    let code = path.into_inner();

    match service.get_link(&code).await {
        Ok(link) => HttpResponse::Ok().json(LinkResponse::from(link)),
        Err(e) => error_response(&e),
    }
}

/// `DELETE /api/links/{code}` — soft delete; the code becomes reusable.
pub async fn delete_link(
    path: web::Path<String>,
    service: web::Data<Arc<LinkService>>,
) -> impl Responder {
    let code = path.into_inner();

    match service.delete_link(&code).await {
        Ok(()) => HttpResponse::Ok().json(MessageBody {
            message: "Link deleted successfully".to_string(),
        }),
        Err(e) => error_response(&e),
    }
}
