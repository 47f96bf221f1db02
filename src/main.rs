use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use jobboard_backend::auth::jwks::JwksCache;
use jobboard_backend::cache::RedisCache;
use jobboard_backend::db::sources::{CompanySource, JobSource};
use jobboard_backend::handlers;
use jobboard_backend::listing::Paginator;
use jobboard_backend::{Config, create_pool};
use migration::{Migrator, MigratorTrait};
use std::io;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = Config::from_env().map_err(io::Error::other)?;

    let db = create_pool(&config.database_url)
        .await
        .map_err(io::Error::other)?;
    tracing::info!("Connected to database");

    if config.run_migrations {
        Migrator::up(&db, None).await.map_err(io::Error::other)?;
        tracing::info!("Migrations applied");
    }

    let redis_cache = RedisCache::new(&config.redis_url, config.cache.clone())
        .await
        .map_err(io::Error::other)?;
    let redis_data = web::Data::new(Arc::new(redis_cache));
    tracing::info!("Connected to Redis");

    let jwks_cache = web::Data::new(Arc::new(JwksCache::new(
        &config.supabase_project_ref,
        &config.supabase_anon_key,
    )));

    let listing = &config.listing;
    let job_pages = web::Data::new(Paginator::new(
        JobSource::new(db.clone()),
        listing.job_page_size,
        listing.fetch_timeout,
    ));
    let company_pages = web::Data::new(Paginator::new(
        CompanySource::new(db.clone()),
        listing.company_page_size,
        listing.fetch_timeout,
    ));
    let db_data = web::Data::new(db);

    let bind_addr = config.bind_addr();
    tracing::info!("Server running at http://{bind_addr}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(db_data.clone())
            .app_data(redis_data.clone())
            .app_data(jwks_cache.clone())
            .app_data(job_pages.clone())
            .app_data(company_pages.clone())
            .service(web::scope("/api").configure(handlers::init_routes))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
