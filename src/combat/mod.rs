//! Combat module
//!
//! Only initiative is modelled here:
//! - Dice values (e.g., "1d20+3") rolled against a supplied RNG
//! - Seeded, reproducible initiative rolls and turn order ranking

mod dice;
mod initiative;

pub use dice::{DiceRoll, INITIATIVE_SIDES};
pub use initiative::{encounter_seed, rank, roll_initiative, Combatant, RollResult};
