//! Initiative rolls
//!
//! Turn order looks random per fight but is stable across repeated views of
//! the same fight: the RNG is seeded from the identity of every combatant, so
//! the same players and monsters always produce the same ranking, and any
//! change to a name or modifier produces a new one.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::dice::DiceRoll;

const FNV64_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV64_PRIME: u64 = 0x0000_0100_0000_01b3;

/// A player or monster taking part in an encounter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    pub dexterity_modifier: i32,
}

impl Combatant {
    pub fn new(name: impl Into<String>, dexterity_modifier: i32) -> Self {
        Self {
            name: name.into(),
            dexterity_modifier,
        }
    }

    /// The die this combatant rolls for initiative
    pub fn initiative_die(&self) -> DiceRoll {
        DiceRoll::d20(self.dexterity_modifier)
    }
}

/// One combatant's resolved initiative
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollResult {
    pub name: String,
    pub value: i32,
}

/// 64-bit FNV-1 (multiply, then xor)
struct Fnv64(u64);

impl Fnv64 {
    fn new() -> Self {
        Self(FNV64_OFFSET_BASIS)
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.0 = self.0.wrapping_mul(FNV64_PRIME);
            self.0 ^= u64::from(*byte);
        }
    }

    fn finish(&self) -> u64 {
        self.0
    }
}

/// Derive the RNG seed for an encounter.
///
/// Hashes `name` followed by the decimal modifier for every monster, then
/// every player, in stored order.
pub fn encounter_seed(players: &[Combatant], monsters: &[Combatant]) -> u64 {
    let mut hasher = Fnv64::new();
    for c in monsters.iter().chain(players) {
        hasher.write(c.name.as_bytes());
        hasher.write(c.dexterity_modifier.to_string().as_bytes());
    }
    hasher.finish()
}

/// Sort results into turn order: highest value first.
///
/// The sort is stable, so equal values keep their input order.
pub fn rank(mut results: Vec<RollResult>) -> Vec<RollResult> {
    results.sort_by(|a, b| b.value.cmp(&a.value));
    results
}

/// Roll initiative for every player, then every monster, and rank the results
pub fn roll_initiative(players: &[Combatant], monsters: &[Combatant]) -> Vec<RollResult> {
    let seed = encounter_seed(players, monsters);
    let mut rng = StdRng::seed_from_u64(seed);
    debug!(
        seed,
        players = players.len(),
        monsters = monsters.len(),
        "rolling initiative"
    );

    let results = players
        .iter()
        .chain(monsters)
        .map(|c| {
            let die = c.initiative_die();
            let value = die.roll_with(&mut rng);
            debug!("{} rolls {} = {}", c.name, die, value);
            RollResult {
                name: c.name.clone(),
                value,
            }
        })
        .collect();

    rank(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn party() -> Vec<Combatant> {
        vec![Combatant::new("Aria", 3), Combatant::new("Borin", -1)]
    }

    fn goblins() -> Vec<Combatant> {
        vec![Combatant::new("Goblin", 2)]
    }

    #[test]
    fn test_fnv64_known_vectors() {
        let mut h = Fnv64::new();
        h.write(b"");
        assert_eq!(h.finish(), 0xcbf2_9ce4_8422_2325);

        let mut h = Fnv64::new();
        h.write(b"a");
        assert_eq!(h.finish(), 0xaf63_bd4c_8601_b7be);
    }

    #[test]
    fn test_example_encounter() {
        let order = roll_initiative(&party(), &goblins());
        assert_eq!(order.len(), 3);

        let mut names: Vec<&str> = order.iter().map(|r| r.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["Aria", "Borin", "Goblin"]);

        for pair in order.windows(2) {
            assert!(pair[0].value >= pair[1].value);
        }

        assert_eq!(order, roll_initiative(&party(), &goblins()));
    }

    #[test]
    fn test_roll_is_deterministic() {
        let first = roll_initiative(&party(), &goblins());
        for _ in 0..10 {
            assert_eq!(roll_initiative(&party(), &goblins()), first);
        }
    }

    #[test]
    fn test_length_matches_combatants() {
        assert!(roll_initiative(&[], &[]).is_empty());
        assert_eq!(roll_initiative(&party(), &[]).len(), 2);
        assert_eq!(roll_initiative(&[], &goblins()).len(), 1);

        let horde: Vec<Combatant> = (0..25)
            .map(|i| Combatant::new(format!("Kobold {}", i), i % 3 - 1))
            .collect();
        assert_eq!(roll_initiative(&party(), &horde).len(), 27);
    }

    #[test]
    fn test_values_within_die_range() {
        let players: Vec<Combatant> = (-5..=5)
            .map(|m| Combatant::new(format!("P{}", m), m))
            .collect();
        let monsters: Vec<Combatant> = (-3..=8)
            .map(|m| Combatant::new(format!("M{}", m), m))
            .collect();

        for r in roll_initiative(&players, &monsters) {
            let c = players
                .iter()
                .chain(&monsters)
                .find(|c| c.name == r.name)
                .unwrap();
            let die = c.initiative_die();
            assert!(
                (die.min()..=die.max()).contains(&r.value),
                "{} rolled {} outside {}..={}",
                r.name,
                r.value,
                die.min(),
                die.max()
            );
        }
    }

    #[test]
    fn test_seed_changes_with_any_modifier() {
        let base = encounter_seed(&party(), &goblins());

        let mut players = party();
        players[1].dexterity_modifier = 0;
        assert_ne!(encounter_seed(&players, &goblins()), base);

        let mut monsters = goblins();
        monsters[0].dexterity_modifier = 3;
        assert_ne!(encounter_seed(&party(), &monsters), base);

        let mut renamed = party();
        renamed[0].name = "Arya".to_string();
        assert_ne!(encounter_seed(&renamed, &goblins()), base);
    }

    #[test]
    fn test_seed_is_order_sensitive() {
        let mut swapped = party();
        swapped.swap(0, 1);
        assert_ne!(
            encounter_seed(&swapped, &goblins()),
            encounter_seed(&party(), &goblins())
        );
    }

    #[test]
    fn test_modifier_change_reshuffles() {
        let players: Vec<Combatant> = (0..6)
            .map(|i| Combatant::new(format!("Hero {}", i), 1))
            .collect();
        let base = roll_initiative(&players, &goblins());

        let changed = (2..12)
            .filter(|m| {
                let mut monsters = goblins();
                monsters[0].dexterity_modifier = *m;
                roll_initiative(&players, &monsters) != base
            })
            .count();
        assert!(changed >= 9, "only {} of 10 variants changed the order", changed);
    }

    #[test]
    fn test_rank_keeps_input_order_on_ties() {
        let results = vec![
            RollResult { name: "a".into(), value: 10 },
            RollResult { name: "b".into(), value: 15 },
            RollResult { name: "c".into(), value: 10 },
            RollResult { name: "d".into(), value: 15 },
        ];
        let names: Vec<String> = rank(results).into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_ties_follow_player_then_monster_order() {
        // 40 combatants on a d20 guarantees repeated values
        let players: Vec<Combatant> = (0..20)
            .map(|i| Combatant::new(format!("{:02}", i), 0))
            .collect();
        let monsters: Vec<Combatant> = (20..40)
            .map(|i| Combatant::new(format!("{:02}", i), 0))
            .collect();

        let order = roll_initiative(&players, &monsters);
        let mut saw_tie = false;
        for pair in order.windows(2) {
            if pair[0].value == pair[1].value {
                saw_tie = true;
                assert!(pair[0].name < pair[1].name, "{:?} before {:?}", pair[0], pair[1]);
            }
        }
        assert!(saw_tie);
    }
}
