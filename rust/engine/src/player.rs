use serde::{Deserialize, Serialize};

/// Authoritative state of one seat. Owned by the engine; agents only ever see
/// the projection built by [`crate::view::project`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Unique player name, taken from the agent
    name: String,
    /// Dice still owned; zero means eliminated
    dice_count: u32,
    /// Hidden dice for the current round
    dice: Vec<u8>,
}

impl PlayerState {
    pub fn new(name: impl Into<String>, dice_count: u32) -> Self {
        Self {
            name: name.into(),
            dice_count,
            dice: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dice_count(&self) -> u32 {
        self.dice_count
    }

    pub fn dice(&self) -> &[u8] {
        &self.dice
    }

    pub fn is_eliminated(&self) -> bool {
        self.dice_count == 0
    }

    pub(crate) fn set_dice(&mut self, dice: Vec<u8>) {
        assert_eq!(
            dice.len(),
            self.dice_count as usize,
            "rolled hand must match dice count for {}",
            self.name
        );
        self.dice = dice;
    }

    pub(crate) fn lose_die(&mut self) {
        assert!(self.dice_count > 0, "{} has no die to lose", self.name);
        self.dice_count -= 1;
    }

    /// Adds one die without exceeding `cap`.
    pub(crate) fn gain_die(&mut self, cap: u32) {
        self.dice_count = (self.dice_count + 1).min(cap);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn losing_last_die_eliminates() {
        let mut p = PlayerState::new("ana", 1);
        assert!(!p.is_eliminated());
        p.lose_die();
        assert!(p.is_eliminated());
    }

    #[test]
    fn gaining_is_capped() {
        let mut p = PlayerState::new("ana", 4);
        p.gain_die(5);
        p.gain_die(5);
        assert_eq!(p.dice_count(), 5);
    }

    #[test]
    #[should_panic]
    fn losing_from_zero_is_a_bug() {
        let mut p = PlayerState::new("ana", 0);
        p.lose_die();
    }
}
