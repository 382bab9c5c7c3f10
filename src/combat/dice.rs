//! Dice rolling
//!
//! A `DiceRoll` is a plain value ("1d20+3"); rolling draws from a
//! caller-supplied RNG so results are reproducible under a fixed seed.

use rand::Rng;

/// Sides on the initiative die
pub const INITIATIVE_SIDES: u32 = 20;

/// A dice roll such as `1d20+3`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceRoll {
    /// Number of dice to roll
    pub count: u32,
    /// Number of sides per die
    pub sides: u32,
    /// Modifier to add/subtract
    pub modifier: i32,
}

impl DiceRoll {
    /// Create a new dice roll
    pub fn new(count: u32, sides: u32, modifier: i32) -> Self {
        Self { count, sides, modifier }
    }

    /// A single d20 plus `modifier`
    pub fn d20(modifier: i32) -> Self {
        Self::new(1, INITIATIVE_SIDES, modifier)
    }

    /// Roll the dice with the given RNG and return the total.
    ///
    /// Totals saturate at the `i32` bounds.
    pub fn roll_with<R: Rng + ?Sized>(&self, rng: &mut R) -> i32 {
        let mut total: i32 = 0;
        for _ in 0..self.count {
            total = total.saturating_add(rng.random_range(1..=self.sides) as i32);
        }
        total.saturating_add(self.modifier)
    }

    /// Get the minimum possible result
    pub fn min(&self) -> i32 {
        i32::try_from(self.count)
            .unwrap_or(i32::MAX)
            .saturating_add(self.modifier)
    }

    /// Get the maximum possible result
    pub fn max(&self) -> i32 {
        i32::try_from(self.count.saturating_mul(self.sides))
            .unwrap_or(i32::MAX)
            .saturating_add(self.modifier)
    }
}

impl std::fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.modifier > 0 {
            write!(f, "{}d{}+{}", self.count, self.sides, self.modifier)
        } else if self.modifier < 0 {
            write!(f, "{}d{}{}", self.count, self.sides, self.modifier)
        } else {
            write!(f, "{}d{}", self.count, self.sides)
        }
    }
}
