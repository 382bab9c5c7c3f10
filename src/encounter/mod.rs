//! Encounter registry
//!
//! Every monster source file becomes one encounter. Encounters are addressed
//! by index in path order, so the index is stable for a given directory
//! layout. Looking one up pairs its monsters with the live player roster and
//! rolls a fresh turn order.

use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::Serialize;
use tracing::info;

use crate::combat::{roll_initiative, Combatant, RollResult};
use crate::error::LoadError;
use crate::roster::{discover, read_source, Roster, RosterStore};

/// The monsters of one encounter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MonsterGroup {
    monsters: Vec<Combatant>,
}

impl MonsterGroup {
    pub fn new(monsters: Vec<Combatant>) -> Self {
        Self { monsters }
    }

    pub fn monsters(&self) -> &[Combatant] {
        &self.monsters
    }

    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }
}

/// A monster group plus its most recent turn order.
///
/// `Encounter::default()` is the "no such encounter" value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Encounter {
    /// Source path relative to the monster directory, without extension
    pub name: String,
    pub monsters: MonsterGroup,
    pub turn_order: Vec<RollResult>,
}

impl Encounter {
    pub fn new(name: impl Into<String>, monsters: MonsterGroup) -> Self {
        Self {
            name: name.into(),
            monsters,
            turn_order: Vec::new(),
        }
    }

    /// A copy of this encounter with turn order rolled against `roster`
    pub fn rolled(&self, roster: &Roster) -> Self {
        Self {
            name: self.name.clone(),
            monsters: self.monsters.clone(),
            turn_order: roll_initiative(roster.players(), self.monsters.monsters()),
        }
    }

    /// True for the "no such encounter" value
    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty() && self.turn_order.is_empty()
    }
}

/// An immutable, index-addressable set of encounters
#[derive(Debug, Clone, Default)]
pub struct Registry {
    encounters: Vec<Encounter>,
}

impl Registry {
    pub fn new(encounters: Vec<Encounter>) -> Self {
        Self { encounters }
    }

    /// Build one encounter per source under `dir`, in path order
    pub fn load(dir: &Path) -> Result<Self, LoadError> {
        let mut encounters = Vec::new();
        for path in discover(dir)? {
            let monsters = MonsterGroup::new(read_source(&path)?);
            let name = path
                .strip_prefix(dir)
                .unwrap_or(&path)
                .with_extension("")
                .to_string_lossy()
                .into_owned();
            encounters.push(Encounter::new(name, monsters));
        }
        Ok(Self { encounters })
    }

    pub fn get(&self, index: usize) -> Option<&Encounter> {
        self.encounters.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Encounter> {
        self.encounters.iter()
    }

    pub fn len(&self) -> usize {
        self.encounters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encounters.is_empty()
    }
}

/// Holder of the published registry, paired with the live player roster
#[derive(Debug)]
pub struct EncounterRegistry {
    current: ArcSwap<Registry>,
    roster: Arc<RosterStore>,
}

impl EncounterRegistry {
    pub fn new(registry: Registry, roster: Arc<RosterStore>) -> Self {
        Self {
            current: ArcSwap::from_pointee(registry),
            roster,
        }
    }

    /// Create a shared instance
    pub fn shared(registry: Registry, roster: Arc<RosterStore>) -> Arc<Self> {
        Arc::new(Self::new(registry, roster))
    }

    /// Look up encounter `index` and roll its turn order against the
    /// current roster. Out-of-range indices (including negative ones)
    /// return an empty encounter.
    pub fn at(&self, index: i64) -> Encounter {
        let registry = self.current.load();
        let found = usize::try_from(index)
            .ok()
            .and_then(|i| registry.get(i));

        match found {
            Some(encounter) => encounter.rolled(&self.roster.snapshot()),
            None => Encounter::default(),
        }
    }

    /// The registry visible right now
    pub fn snapshot(&self) -> Arc<Registry> {
        self.current.load_full()
    }

    /// Replace the visible registry
    pub fn publish(&self, registry: Registry) {
        self.current.store(Arc::new(registry));
    }

    /// Load `dir` and publish the result. Nothing is published on error.
    pub fn reload(&self, dir: &Path) -> Result<usize, LoadError> {
        let registry = Registry::load(dir)?;
        let count = registry.len();
        self.publish(registry);
        info!("Loaded {} encounters from {}", count, dir.display());
        Ok(count)
    }

    pub fn len(&self) -> usize {
        self.current.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
