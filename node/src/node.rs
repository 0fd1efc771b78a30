//! The assembled node: engine + fan-out + background sweeper.

use std::sync::Arc;
use std::time::Duration;

use pact_lifecycle::{DeadlineSweeper, LifecycleEngine};
use pact_notify::{ConnectionDirectory, DirectorySink, NotificationFanout};
use pact_store::{NotificationStore, Store};
use pact_types::Clock;

use crate::config::NodeConfig;
use crate::error::NodeError;
use crate::shutdown::ShutdownController;

/// A running PACT node.
///
/// Owns the lifecycle engine, the connection directory for live pushes,
/// and the shutdown controller. The transport layer (out of scope here)
/// registers user sessions with [`directory`](Self::directory) and drives
/// operations through [`engine`](Self::engine).
pub struct PactNode {
    engine: Arc<LifecycleEngine>,
    directory: Arc<ConnectionDirectory>,
    clock: Arc<dyn Clock>,
    shutdown: ShutdownController,
    sweep_interval: Duration,
}

impl PactNode {
    /// Wire up a node over the given store and clock.
    pub fn new<S>(
        config: &NodeConfig,
        store: Arc<S>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, NodeError>
    where
        S: Store + 'static,
    {
        config.validate()?;

        let directory = Arc::new(ConnectionDirectory::new());
        let fanout = Arc::new(NotificationFanout::new(
            Arc::clone(&store) as Arc<dyn NotificationStore + Send + Sync>,
            Arc::new(DirectorySink::new(Arc::clone(&directory))),
            Arc::clone(&clock),
        ));

        let engine = Arc::new(LifecycleEngine::new(
            store as Arc<dyn Store>,
            Arc::clone(&clock),
            config.params.clone(),
        ));
        engine.register_observer(fanout);

        Ok(Self {
            engine,
            directory,
            clock,
            shutdown: ShutdownController::new(),
            sweep_interval: Duration::from_secs(config.params.sweep_interval_secs),
        })
    }

    pub fn engine(&self) -> &Arc<LifecycleEngine> {
        &self.engine
    }

    pub fn directory(&self) -> &Arc<ConnectionDirectory> {
        &self.directory
    }

    pub fn shutdown_controller(&self) -> &ShutdownController {
        &self.shutdown
    }

    /// Spawn the periodic deadline sweeper.
    ///
    /// Runs one pass per interval tick until shutdown. The returned handle
    /// is joined by [`run`](Self::run); callers driving the node manually
    /// should await it after triggering shutdown.
    pub fn spawn_sweeper(&self) -> tokio::task::JoinHandle<()> {
        let sweeper = DeadlineSweeper::new(Arc::clone(&self.engine));
        let clock = Arc::clone(&self.clock);
        let mut shutdown_rx = self.shutdown.subscribe();
        let period = self.sweep_interval;

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        tracing::info!("deadline sweeper shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        let report = sweeper.run_once(clock.now());
                        if report.errors > 0 {
                            tracing::warn!(?report, "sweep pass finished with errors");
                        }
                    }
                }
            }
        })
    }

    /// Run until an OS signal arrives, then stop the background tasks.
    pub async fn run(&self) {
        let sweeper = self.spawn_sweeper();
        tracing::info!(
            sweep_interval_secs = self.sweep_interval.as_secs(),
            "node started"
        );
        self.shutdown.wait_for_signal().await;
        if let Err(e) = sweeper.await {
            tracing::warn!(error = %e, "sweeper task did not shut down cleanly");
        }
        tracing::info!("node stopped");
    }
}
