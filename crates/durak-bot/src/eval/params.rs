use serde::{Deserialize, Serialize};

/// Weights of the linear hand evaluation. Any field left out of a config file
/// keeps its default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalParams {
    /// Score of a player who has shed every card.
    pub win_bonus: f64,
    /// Added to a trump card's rank.
    pub trump_bonus: f64,
    /// Subtracted from a plain card's rank.
    pub non_trump_offset: f64,
    /// Placeholder value of a face-down card.
    pub unknown_value: f64,
    /// Deck size at or below which the small-deck penalty applies.
    pub deck_cutoff: usize,
    /// Per-card penalty once the deck is nearly gone.
    pub small_deck_penalty: f64,
    /// Per-card penalty while the deck is still large.
    pub big_deck_penalty: f64,
}

impl Default for EvalParams {
    fn default() -> Self {
        Self {
            win_bonus: 500.0,
            trump_bonus: 25.0,
            non_trump_offset: 5.0,
            unknown_value: 2.0,
            deck_cutoff: 3,
            small_deck_penalty: 20.0,
            big_deck_penalty: 5.0,
        }
    }
}

impl EvalParams {
    pub fn hand_size_penalty(&self, cards_in_deck: usize) -> f64 {
        if cards_in_deck <= self.deck_cutoff {
            self.small_deck_penalty
        } else {
            self.big_deck_penalty
        }
    }
}
