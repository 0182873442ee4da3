use actix_web::HttpServer;
use configurable_module_example::{
    APPLICATION_NAME, AppModule, ApplicationConfig, LoggerOptions, StartupError, create_app, logging,
};

#[actix_web::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let config = ApplicationConfig::load()?;
    let _log_guard = logging::init(&LoggerOptions::from_config(APPLICATION_NAME, &config))?;

    let module = AppModule::bootstrap(config).await?;
    let port = module.config().app_port;

    let server = HttpServer::new({
        let module = module.clone();
        move || create_app(&module)
    })
    .bind(("0.0.0.0", port))?
    .run();

    tracing::info!("Application is running on: {port}");
    server.await?;
    Ok(())
}
