use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Source of the hidden dice rolled at the start of every round.
pub trait DiceRoller: Send + Sync {
    /// Roll one hand per seat; `counts[seat]` dice with faces `1..=faces`.
    /// Seats with a count of zero get an empty hand.
    fn roll_round(&mut self, counts: &[u32], faces: u8) -> Vec<Vec<u8>>;
}

/// Seeded dice cup. The same seed always yields the same sequence of rolls.
///
/// # Examples
///
/// ```
/// use dudo_engine::dice::{DiceCup, DiceRoller};
///
/// let mut a = DiceCup::new_with_seed(7);
/// let mut b = DiceCup::new_with_seed(7);
/// assert_eq!(a.roll_round(&[5, 3], 6), b.roll_round(&[5, 3], 6));
/// ```
#[derive(Debug)]
pub struct DiceCup {
    rng: ChaCha20Rng,
}

impl DiceCup {
    pub fn new_with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha20Rng::from_os_rng(),
        }
    }

    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::new_with_seed(s),
            None => Self::from_entropy(),
        }
    }

    fn roll(&mut self, count: u32, faces: u8) -> Vec<u8> {
        (0..count).map(|_| self.rng.random_range(1..=faces)).collect()
    }
}

impl DiceRoller for DiceCup {
    fn roll_round(&mut self, counts: &[u32], faces: u8) -> Vec<Vec<u8>> {
        counts.iter().map(|&c| self.roll(c, faces)).collect()
    }
}

/// Fixed hands, one set per round, indexed by seat.
///
/// Each scripted hand is truncated to the player's current dice count.
/// Once the script runs out, dice come from a seeded [`DiceCup`].
#[derive(Debug)]
pub struct ScriptedDice {
    rounds: VecDeque<Vec<Vec<u8>>>,
    fallback: DiceCup,
}

impl ScriptedDice {
    pub fn new(rounds: Vec<Vec<Vec<u8>>>) -> Self {
        Self {
            rounds: rounds.into(),
            fallback: DiceCup::new_with_seed(0),
        }
    }

    pub fn remaining_rounds(&self) -> usize {
        self.rounds.len()
    }
}

impl DiceRoller for ScriptedDice {
    fn roll_round(&mut self, counts: &[u32], faces: u8) -> Vec<Vec<u8>> {
        let Some(mut script) = self.rounds.pop_front() else {
            return self.fallback.roll_round(counts, faces);
        };
        counts
            .iter()
            .enumerate()
            .map(|(seat, &count)| {
                let mut hand = script.get_mut(seat).map(std::mem::take).unwrap_or_default();
                if hand.len() < count as usize {
                    let extra = count - hand.len() as u32;
                    hand.extend(self.fallback.roll(extra, faces));
                }
                hand.truncate(count as usize);
                hand
            })
            .collect()
    }
}
