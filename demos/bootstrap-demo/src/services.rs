use lifeline::prelude::*;
use std::time::Duration;

#[derive(LifecycleHooks)]
#[lifecycle(bootstrap)]
pub struct AppModule;

#[async_trait]
impl OnApplicationBootstrap for AppModule {
    async fn on_application_bootstrap(&mut self) -> Result<(), LifecycleError> {
        tracing::info!("🎉 AppModule: every provider is bootstrapped");
        Ok(())
    }
}

#[derive(LifecycleHooks)]
#[lifecycle(init, destroy)]
pub struct Database {
    connected: bool,
}

impl Database {
    pub fn new() -> Self {
        Self { connected: false }
    }
}

#[async_trait]
impl OnModuleInit for Database {
    async fn on_module_init(&mut self) -> Result<(), LifecycleError> {
        tracing::info!("📦 Database: Initializing connection pool...");

        // Simulate connection delay
        tokio::time::sleep(Duration::from_millis(100)).await;

        self.connected = true;
        tracing::info!("✅ Database: Connected");
        Ok(())
    }
}

#[async_trait]
impl OnModuleDestroy for Database {
    async fn on_module_destroy(&mut self) -> Result<(), LifecycleError> {
        if self.connected {
            tracing::info!("🔌 Database: Closing connections");
            self.connected = false;
        }
        Ok(())
    }
}

#[derive(Default, LifecycleHooks)]
#[lifecycle(bootstrap, before_shutdown, shutdown)]
pub struct ReportScheduler {
    jobs: Vec<tokio::task::JoinHandle<()>>,
}

#[async_trait]
impl OnApplicationBootstrap for ReportScheduler {
    async fn on_application_bootstrap(&mut self) -> Result<(), LifecycleError> {
        tracing::info!("⏰ ReportScheduler: Starting nightly report job");
        self.jobs.push(tokio::spawn(async {
            let mut ticker = tokio::time::interval(Duration::from_secs(60));
            loop {
                ticker.tick().await;
                tracing::debug!("ReportScheduler: tick");
            }
        }));
        Ok(())
    }
}

#[async_trait]
impl BeforeApplicationShutdown for ReportScheduler {
    async fn before_application_shutdown(
        &mut self,
        signal: Option<ShutdownSignal>,
    ) -> Result<(), LifecycleError> {
        tracing::info!(?signal, "⏸ ReportScheduler: No new jobs will be scheduled");
        Ok(())
    }
}

#[async_trait]
impl OnApplicationShutdown for ReportScheduler {
    async fn on_application_shutdown(
        &mut self,
        _signal: Option<ShutdownSignal>,
    ) -> Result<(), LifecycleError> {
        for job in self.jobs.drain(..) {
            job.abort();
        }
        tracing::info!("🛑 ReportScheduler: Jobs stopped");
        Ok(())
    }
}

#[derive(LifecycleHooks)]
#[lifecycle(bootstrap)]
pub struct RequestLogger {
    owner: &'static str,
}

impl RequestLogger {
    pub fn new(owner: &'static str) -> Self {
        Self { owner }
    }
}

#[async_trait]
impl OnApplicationBootstrap for RequestLogger {
    async fn on_application_bootstrap(&mut self) -> Result<(), LifecycleError> {
        tracing::info!("📝 RequestLogger for {}: ready", self.owner);
        Ok(())
    }
}

#[derive(LifecycleHooks)]
pub struct UsersController;
