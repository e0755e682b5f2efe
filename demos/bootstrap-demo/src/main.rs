use lifeline::prelude::*;
use std::time::Duration;

mod services;

use services::{AppModule, Database, RequestLogger, ReportScheduler, UsersController};

fn build_modules() -> Result<ModuleRegistry, LifelineError> {
    let mut database = Module::new("DatabaseModule", None);
    database
        .set_distance(2)
        .add_provider(InstanceWrapper::singleton("Database", shared(Database::new())))?;

    let mut logger = InstanceWrapper::transient("RequestLogger");
    logger
        .add_transient_instance("UsersController", Some(shared(RequestLogger::new("UsersController"))))
        .add_transient_instance("ReportScheduler", Some(shared(RequestLogger::new("ReportScheduler"))));

    let mut app = Module::of(AppModule);
    app.set_distance(1)
        .add_provider(InstanceWrapper::singleton("ReportScheduler", shared(ReportScheduler::default())))?
        .add_provider(logger)?
        .add_provider(InstanceWrapper::request_scoped("RequestContext"))?
        .add_controller(InstanceWrapper::singleton("UsersController", shared(UsersController)))?;

    let mut modules = ModuleRegistry::new();
    modules.add_module(database)?;
    modules.add_module(app)?;
    Ok(modules)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    tracing::info!("🚀 Starting bootstrap demo...");

    let config = LifecycleConfig::from_env()?;
    let context = Arc::new(
        ApplicationContext::builder()
            .modules(build_modules()?)
            .config(config)
            .init_timeout(Duration::from_secs(30))
            .build()
            .await?,
    );

    tracing::info!("✅ Application ready, press Ctrl+C to stop");

    context.spawn_shutdown_handler().await?;

    tracing::info!("👋 Demo stopped");
    Ok(())
}
