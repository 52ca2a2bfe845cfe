use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use std::sync::Arc;

use chat_service::{
    config::Config, db, logging, routes, security::token::TokenIssuer, state::AppState,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init_tracing();

    let config = Config::from_env()?;
    if config.uses_dev_jwt_key() {
        tracing::warn!("JWT_KEY not set; using insecure development signing key");
    }

    let pool = db::connect(&config.database_url).await?;
    db::MIGRATOR.run(&pool).await?;
    tracing::info!("database ready");

    let state = AppState {
        db: pool,
        tokens: TokenIssuer::new(&config.jwt_key, config.token_ttl_secs),
        config: Arc::new(config.clone()),
    };

    let bind_addr = (config.host.clone(), config.port);
    tracing::info!("listening on {}:{}", bind_addr.0, bind_addr.1);

    let cors_origins = config.cors_origins.clone();
    HttpServer::new(move || {
        let cors = if cors_origins.is_empty() {
            Cors::permissive()
        } else {
            let mut cors = Cors::default()
                .allow_any_method()
                .allow_any_header()
                .supports_credentials();
            for origin in &cors_origins {
                cors = cors.allowed_origin(origin);
            }
            cors
        };

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(cors)
            .configure(routes::configure_routes)
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}
