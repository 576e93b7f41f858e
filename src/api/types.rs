use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::LinkmintError;
use crate::storage::Link;

#[derive(Debug, Deserialize)]
pub struct PostNewLink {
    pub url: String,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GetLinksQuery {
    #[serde(default)]
    pub search: Option<String>,
}

/// Wire shape of a link. Internal row ids stay internal.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub code: String,
    pub target_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub last_clicked_at: Option<DateTime<Utc>>,
}

impl From<Link> for LinkResponse {
    fn from(link: Link) -> Self {
        Self {
            code: link.code,
            target_url: link.target_url,
            clicks: link.clicks,
            created_at: link.created_at,
            last_clicked_at: link.last_clicked_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

fn error_status(err: &LinkmintError) -> StatusCode {
    match err {
        LinkmintError::Validation(_) => StatusCode::BAD_REQUEST,
        LinkmintError::Conflict(_) => StatusCode::CONFLICT,
        LinkmintError::NotFound(_) => StatusCode::NOT_FOUND,
        // Exhausted is transient but still the server's problem; database
        // details never reach the wire.
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn error_response(err: &LinkmintError) -> HttpResponse {
    let status = error_status(err);
    let body = if status == StatusCode::INTERNAL_SERVER_ERROR && !err.is_transient() {
        "Internal server error".to_string()
    } else {
        err.message().to_string()
    };
    HttpResponse::build(status).json(ErrorBody { error: body })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            error_status(&LinkmintError::validation("x")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_status(&LinkmintError::conflict("x")),
            StatusCode::CONFLICT
        );
        assert_eq!(
            error_status(&LinkmintError::not_found("x")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_status(&LinkmintError::exhausted("x")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            error_status(&LinkmintError::database_operation("x")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
