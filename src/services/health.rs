use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use tracing::{error, trace};

use crate::storage::Repository;

/// Recorded once in `main`, injected as app data.
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
    uptime: String,
    uptime_seconds: i64,
    database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    links_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    version: &'static str,
}

pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        storage: web::Data<Arc<dyn Repository>>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        trace!("Received health check request");

        let now = chrono::Utc::now();
        let uptime_seconds = (now - app_start_time.start_datetime).num_seconds().max(0);

        // Count instead of SELECT 1: proves the table is reachable without
        // loading rows, and the number is useful in the payload.
        let probe = tokio::time::timeout(Duration::from_secs(5), storage.count_active()).await;

        match probe {
            Ok(Ok(count)) => HttpResponse::Ok().json(HealthResponse {
                status: "healthy",
                timestamp: now.to_rfc3339(),
                uptime: format_uptime(uptime_seconds),
                uptime_seconds,
                database: "connected",
                links_count: Some(count),
                error: None,
                version: env!("CARGO_PKG_VERSION"),
            }),
            Ok(Err(e)) => {
                error!("Health check database probe failed: {}", e);
                Self::unhealthy(now, uptime_seconds, format!("database error: {}", e))
            }
            Err(_) => {
                error!("Health check database probe timed out");
                Self::unhealthy(now, uptime_seconds, "timeout".to_string())
            }
        }
    }

    fn unhealthy(
        now: chrono::DateTime<chrono::Utc>,
        uptime_seconds: i64,
        error: String,
    ) -> HttpResponse {
        HttpResponse::ServiceUnavailable().json(HealthResponse {
            status: "unhealthy",
            timestamp: now.to_rfc3339(),
            uptime: format_uptime(uptime_seconds),
            uptime_seconds,
            database: "disconnected",
            links_count: None,
            error: Some(error),
            version: env!("CARGO_PKG_VERSION"),
        })
    }
}

fn format_uptime(seconds: i64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;
    let secs = seconds % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{}d", days));
    }
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if minutes > 0 {
        parts.push(format!("{}m", minutes));
    }
    if secs > 0 || parts.is_empty() {
        parts.push(format!("{}s", secs));
    }

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_formatting() {
        assert_eq!(format_uptime(0), "0s");
        assert_eq!(format_uptime(59), "59s");
        assert_eq!(format_uptime(60), "1m");
        assert_eq!(format_uptime(3_661), "1h 1m 1s");
        assert_eq!(format_uptime(90_000), "1d 1h");
    }
}
