//! initd - initiative daemon
//!
//! Loads player and monster rosters from CSV directories, rolls a
//! reproducible turn order per encounter, and serves it as a page. Roster
//! directories are watched and republished while the server runs.

pub mod api;
pub mod combat;
pub mod config;
pub mod encounter;
pub mod error;
pub mod reload;
pub mod render;
pub mod roster;

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tracing::{error, info};

pub use config::Config;
use encounter::{EncounterRegistry, Registry};
use render::PageRenderer;
use roster::{Roster, RosterStore};

/// The initd server instance
pub struct Server {
    config: Config,
    roster: Arc<RosterStore>,
    encounters: Arc<EncounterRegistry>,
    renderer: Arc<PageRenderer>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl Server {
    /// Create a new server instance, loading both roster directories.
    ///
    /// Any load error is returned; the server never starts on partial data.
    pub async fn new(config: Config) -> Result<Self> {
        let players_dir = config.players_dir();
        let roster = Roster::load(&players_dir)?;
        info!("Loaded {} players from {}", roster.len(), players_dir.display());

        let monsters_dir = config.monsters_dir();
        let registry = Registry::load(&monsters_dir)?;
        info!(
            "Loaded {} encounters from {}",
            registry.len(),
            monsters_dir.display()
        );

        let roster = RosterStore::shared(roster);
        let encounters = EncounterRegistry::shared(registry, roster.clone());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Ok(Self {
            config,
            roster,
            encounters,
            renderer: Arc::new(PageRenderer::new()?),
            shutdown_tx,
            shutdown_rx,
        })
    }

    /// Get the player roster store
    pub fn roster(&self) -> Arc<RosterStore> {
        self.roster.clone()
    }

    /// Get the encounter registry
    pub fn encounters(&self) -> Arc<EncounterRegistry> {
        self.encounters.clone()
    }

    /// Build the router
    fn router(&self) -> Router {
        api::router(api::AppState {
            roster: self.roster.clone(),
            encounters: self.encounters.clone(),
            renderer: self.renderer.clone(),
        })
    }

    /// Run the server until shutdown or a failed reload.
    ///
    /// A reload that cannot load its directory ends the server with that
    /// error.
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        let local_addr = listener.local_addr()?;
        info!("initd listening on {}", local_addr);

        let (fatal_tx, mut fatal_rx) = mpsc::unbounded_channel();
        let players = reload::spawn_watcher(
            self.config.players_dir(),
            self.roster.clone(),
            fatal_tx.clone(),
        )?;
        let monsters = reload::spawn_watcher(
            self.config.monsters_dir(),
            self.encounters.clone(),
            fatal_tx,
        )?;

        let router = self.router();
        let mut shutdown_rx = self.shutdown_rx.clone();
        let serve = axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown_rx.changed().await.ok();
            })
            .into_future();

        let result = tokio::select! {
            res = serve => res.map_err(anyhow::Error::from),
            Some(failure) = fatal_rx.recv() => {
                error!("Stopping: {}", failure);
                Err(failure.into())
            }
        };

        players.abort();
        monsters.abort();

        if result.is_ok() {
            info!("initd shutdown complete");
        }
        result
    }

    /// Signal the server to shutdown
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Get the configured bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }
}
