use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing::info;

use linkmint::api;
use linkmint::config::{init_config, Config};
use linkmint::runtime::{shutdown, startup};
use linkmint::services::AppStartTime;
use linkmint::system::logging::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load();
    init_config(config.clone());

    let _log_guard = init_logging(&config);

    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    let ctx = startup::prepare_server_startup().await?;
    let repository = ctx.repository.clone();
    let link_service = ctx.link_service.clone();

    info!(
        "Listening on {}:{} ({} workers)",
        config.server.host, config.server.port, config.server.cpu_count
    );

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "DELETE"])
            .allowed_headers(vec!["Content-Type", "Accept"])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(repository.clone()))
            .app_data(web::Data::new(link_service.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .configure(api::api_routes)
            .configure(api::health_routes)
            .configure(api::redirect_routes)
    })
    .workers(config.server.cpu_count)
    .bind((config.server.host.as_str(), config.server.port))?
    .run();

    // Actix handles the stop signal itself; once the server returns, drain
    // whatever the click buffer still holds.
    let result = server.await;
    shutdown::flush_on_shutdown().await;

    result.map_err(Into::into)
}
