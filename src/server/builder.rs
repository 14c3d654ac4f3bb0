//! ServerBuilder for fluent API to build the HTTP server

use super::host::{ServerHost, Stores};
use super::rest::RestExposure;
use crate::config::AppConfig;
use crate::core::events::EventBus;
use crate::entities::dealer::Dealer;
use crate::entities::payment::Payment;
use crate::entities::vehicle::Vehicle;
use crate::seed::seed_demo_data;
use crate::settlement::{OutcomeDecider, Scheduler, TokioScheduler, WeightedRandomOutcome};
use crate::storage::InMemoryStore;
use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder wiring stores, services, the settlement engine and the router
///
/// # Example
///
/// ```ignore
/// ServerBuilder::new()
///     .with_config(AppConfig::load()?)
///     .serve()
///     .await?;
/// ```
#[derive(Default)]
pub struct ServerBuilder {
    config: Option<AppConfig>,
    stores: Option<Stores>,
    decider: Option<Arc<dyn OutcomeDecider>>,
    scheduler: Option<Arc<dyn Scheduler>>,
    event_bus: Option<EventBus>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this configuration instead of the defaults
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Inject store handles (in-memory stores otherwise)
    pub fn with_stores(mut self, stores: Stores) -> Self {
        self.stores = Some(stores);
        self
    }

    /// Replace the weighted random outcome, e.g. with a fixed one in tests
    pub fn with_outcome_decider(mut self, decider: Arc<dyn OutcomeDecider>) -> Self {
        self.decider = Some(decider);
        self
    }

    /// Replace the tokio scheduler
    pub fn with_scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Set the capacity of the event bus (default 1024)
    pub fn with_event_bus(mut self, capacity: usize) -> Self {
        self.event_bus = Some(EventBus::new(capacity));
        self
    }

    /// Build the host without starting any timer
    pub fn build_host(self) -> Result<ServerHost> {
        let config = self.config.unwrap_or_default();
        config.validate().context("invalid configuration")?;

        let stores = self.stores.unwrap_or_else(|| Stores {
            dealers: Arc::new(InMemoryStore::<Dealer>::new()),
            vehicles: Arc::new(InMemoryStore::<Vehicle>::new()),
            payments: Arc::new(InMemoryStore::<Payment>::new()),
        });
        let decider: Arc<dyn OutcomeDecider> = match self.decider {
            Some(decider) => decider,
            None => Arc::new(WeightedRandomOutcome::new(config.settlement.success_ratio)),
        };
        let scheduler: Arc<dyn Scheduler> = match self.scheduler {
            Some(scheduler) => scheduler,
            None => Arc::new(TokioScheduler),
        };

        Ok(ServerHost::from_components(
            config,
            stores,
            decider,
            scheduler,
            self.event_bus.unwrap_or_default(),
        ))
    }

    /// Build the REST router
    ///
    /// The periodic sweep is not started; delayed completions still fire
    /// through the scheduler.
    pub fn build(self) -> Result<Router> {
        Ok(self.build_with_host()?.0)
    }

    /// Build the REST router and keep a handle on the host
    pub fn build_with_host(self) -> Result<(Router, Arc<ServerHost>)> {
        let host = Arc::new(self.build_host()?);
        Ok((RestExposure::build_router(host.clone()), host))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Seed demo data when configured
    /// - Run one sweep for payments left PENDING by a previous process
    /// - Start the periodic sweep
    /// - Bind to the configured address and serve until Ctrl+C or SIGTERM
    pub async fn serve(self) -> Result<()> {
        let (app, host) = self.build_with_host()?;

        if host.config.seed_demo_data {
            seed_demo_data(&host.stores)
                .await
                .context("failed to seed demo data")?;
        }

        let stale_after = host.engine.policy().stale_after;
        host.engine
            .sweep_stale_pending(stale_after)
            .await
            .context("startup settlement sweep failed")?;
        let sweeper = host.engine.start_sweeper();

        let addr = host.config.server.address();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;

        tracing::info!("Server listening on {}", addr);

        let served = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await;

        sweeper.abort();
        served?;

        tracing::info!(
            settlements = host.engine.settlements(),
            overrides = host.engine.overrides(),
            "Server shutdown complete"
        );
        Ok(())
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
