//! Player roster snapshots
//!
//! The current roster lives behind an `ArcSwap`: readers take a pinned
//! `Arc<Roster>` without locking, and a reload swaps in a fully built
//! replacement in one step. A published roster is never mutated.

use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::info;

use super::source::{discover, read_source};
use crate::combat::Combatant;
use crate::error::LoadError;

/// An ordered, immutable set of players
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    players: Vec<Combatant>,
}

impl Roster {
    pub fn new(players: Vec<Combatant>) -> Self {
        Self { players }
    }

    /// Load every source under `dir`, concatenated in path order
    pub fn load(dir: &Path) -> Result<Self, LoadError> {
        let mut players = Vec::new();
        for path in discover(dir)? {
            players.extend(read_source(&path)?);
        }
        Ok(Self { players })
    }

    pub fn players(&self) -> &[Combatant] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

/// Holder of the currently published roster
#[derive(Debug)]
pub struct RosterStore {
    current: ArcSwap<Roster>,
}

impl RosterStore {
    pub fn new(roster: Roster) -> Self {
        Self {
            current: ArcSwap::from_pointee(roster),
        }
    }

    /// Create a shared instance
    pub fn shared(roster: Roster) -> Arc<Self> {
        Arc::new(Self::new(roster))
    }

    /// The roster visible right now
    pub fn snapshot(&self) -> Arc<Roster> {
        self.current.load_full()
    }

    /// Replace the visible roster
    pub fn publish(&self, roster: Roster) {
        self.current.store(Arc::new(roster));
    }

    /// Load `dir` and publish the result. Nothing is published on error.
    pub fn reload(&self, dir: &Path) -> Result<usize, LoadError> {
        let roster = Roster::load(dir)?;
        let count = roster.len();
        self.publish(roster);
        info!("Loaded {} players from {}", count, dir.display());
        Ok(count)
    }
}

impl Default for RosterStore {
    fn default() -> Self {
        Self::new(Roster::default())
    }
}
