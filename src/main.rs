use actix_cors::Cors;
use actix_web::{http::Method, middleware::Logger, web, App, HttpServer};
use clap::Parser;
use env_logger::Env;
use log::{error, info, LevelFilter};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use token_explorer::config::{Config, DEFAULT_CONFIG_PATH};
use token_explorer::database::StorageService;
use token_explorer::providers::ReqwestHttpClient;
use token_explorer::routes::configure_routes;
use token_explorer::services::{initialize_token_data, PageRegions, TokenDataService, MAIN_REGION};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, default_value = "info")]
    log_level: String,

    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // 1. Parse command line arguments and setup logging
    let args = Args::parse();
    let log_level = match args.log_level.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level.to_string())).init();

    // 2. Load configuration
    let config = Config::load_or_default(&args.config)?;

    info!("Starting Token Explorer...");
    info!("Configuration loaded: {:?}", config);

    // 3. Storage, HTTP client and providers
    let storage = StorageService::new(&config.storage).await?;
    info!("Using {:?} storage backend", storage.backend());

    let http = ReqwestHttpClient::new(config.coingecko.request_timeout_ms.map(Duration::from_millis))?;
    let token_data = TokenDataService::new(storage.cache(), Arc::new(http), &config.coingecko);

    // 4. Load token data in the background; pages show progress meanwhile
    let regions = PageRegions::new();
    regions.register(MAIN_REGION);
    {
        let regions = regions.clone();
        let token_data = token_data.clone();
        actix_web::rt::spawn(async move {
            if let Err(e) = initialize_token_data(&regions, &token_data).await {
                error!("Failed to load token data: {}", e);
            }
        });
    }

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server will be available at http://{}", bind_addr);

    let config = Arc::new(config);
    HttpServer::new(move || {
        let allowed_origins = config.cors.allowed_origins.clone();
        let cors = Cors::default().allowed_origin_fn(move |origin, _req_head| {
            let origin_str = match origin.to_str() {
                Ok(s) => s,
                Err(_) => return false,
            };
            allowed_origins.iter().any(|allowed| origin_str == allowed)
        });

        let mut methods: Vec<Method> = config
            .cors
            .allowed_methods
            .iter()
            .filter_map(|m| m.parse().ok())
            .collect();
        methods.push(Method::OPTIONS);

        let cors = cors
            .allowed_methods(methods)
            .allowed_headers(config.cors.allowed_headers.clone())
            .max_age(3600);

        let cors = if config.cors.supports_credentials {
            cors.supports_credentials()
        } else {
            cors
        };

        App::new()
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(token_data.clone()))
            .app_data(web::Data::new(regions.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .configure(configure_routes)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    Ok(())
}
