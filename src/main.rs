use std::io;

use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use env_logger::Env;

use storefront::db::establish_connection_pool;
use storefront::models::config::ServerConfig;
use storefront::repository::DieselRepository;
use storefront::routes::{configure, json_config, multipart_config, query_config};
use storefront::storage::MediaStorage;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(Env::new().default_filter_or("info"));

    let server_config = ServerConfig::load().map_err(|e| {
        log::error!("Failed to load configuration: {e}");
        io::Error::other(e)
    })?;

    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        log::error!("Failed to open database {}: {e}", server_config.database_url);
        io::Error::other(e)
    })?;

    std::fs::create_dir_all(&server_config.media_root)?;

    let repo = web::Data::new(DieselRepository::new(pool));
    let storage = web::Data::new(MediaStorage::new(&server_config.media_root));
    let media_root = server_config.media_root.clone();
    let max_upload_size = server_config.max_upload_size;

    log::info!(
        "Starting storefront on {}:{}",
        server_config.address,
        server_config.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(repo.clone())
            .app_data(storage.clone())
            .app_data(json_config())
            .app_data(query_config())
            .app_data(multipart_config(max_upload_size))
            .configure(configure)
            .service(Files::new("/media", &media_root))
    })
    .bind((server_config.address.as_str(), server_config.port))?
    .run()
    .await
}
