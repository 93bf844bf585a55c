use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use hrm_leave::config::Config;
use hrm_leave::db::init_db;
use hrm_leave::docs::ApiDoc;
use hrm_leave::leave::{LeavePolicy, LeaveService};
use hrm_leave::routes;
use hrm_leave::store::{
    CachedDirectory, EmployeeDirectory, InMemoryDirectory, InMemoryLeaveStore, LeaveRequestStore,
    MySqlDirectory, MySqlLeaveStore,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

const DIRECTORY_WARMUP_BATCH: usize = 250;

#[get("/")]
async fn index() -> impl Responder {
    "Leave service is running"
}

async fn build_backends(
    config: &Config,
) -> anyhow::Result<(Arc<dyn EmployeeDirectory>, Arc<dyn LeaveRequestStore>)> {
    let Some(database_url) = config.database_url.as_deref() else {
        warn!("DATABASE_URL not set, using in-memory storage");
        let directory = match config.employees_file.as_deref() {
            Some(path) => InMemoryDirectory::from_json_file(path)?,
            None => InMemoryDirectory::new(),
        };
        let directory: Arc<dyn EmployeeDirectory> = Arc::new(directory);
        let store: Arc<dyn LeaveRequestStore> = Arc::new(InMemoryLeaveStore::new());
        return Ok((directory, store));
    };

    let pool = init_db(database_url).await?;

    let cached = Arc::new(CachedDirectory::new(
        MySqlDirectory::new(pool.clone()),
        config.directory_cache_capacity,
        Duration::from_secs(config.directory_cache_ttl_secs),
    ));

    let cache_for_warmup = cached.clone();
    let pool_for_warmup = pool.clone();
    actix_web::rt::spawn(async move {
        if let Err(e) = cache_for_warmup
            .warmup(&pool_for_warmup, DIRECTORY_WARMUP_BATCH)
            .await
        {
            warn!(error = %e, "Failed to warmup employee directory cache");
        }
    });

    let directory: Arc<dyn EmployeeDirectory> = cached;
    let store: Arc<dyn LeaveRequestStore> = Arc::new(MySqlLeaveStore::new(pool));
    Ok((directory, store))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let level = config
        .log_level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(annual_leave_days = config.annual_leave_days, "Server starting...");

    let (directory, store) = build_backends(&config).await?;
    let service = Data::new(LeaveService::new(
        directory,
        store,
        LeavePolicy::new(config.annual_leave_days),
    ));

    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(service.clone())
            .service(index)
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
