use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;

use pushkind_prices::config::ServerConfig;
use pushkind_prices::db::{establish_connection_pool, run_migrations};
use pushkind_prices::repository::DieselRepository;
use pushkind_prices::routes::api::{api_v1_prices, health};
use pushkind_prices::services::prices::PriceService;
use pushkind_prices::services::resilience::ResilientPriceLookup;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let config = ServerConfig::from_env();

    let pool = match establish_connection_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_migrations(&pool) {
        log::error!("Failed to prepare the database: {e}");
        std::process::exit(1);
    }

    let repo = DieselRepository::new(pool);
    let lookup = web::Data::new(ResilientPriceLookup::new(
        PriceService::new(repo.clone(), config.selection),
        config.resilience,
    ));

    log::info!(
        "Serving prices on {}:{} ({:?} selection)",
        config.address,
        config.port,
        config.selection
    );

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(health)
            .service(web::scope("/api").service(api_v1_prices))
            .app_data(lookup.clone())
            .app_data(web::Data::new(repo.clone()))
    })
    .bind((config.address, config.port))?
    .run()
    .await
}
