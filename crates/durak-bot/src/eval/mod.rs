mod params;

pub use params::EvalParams;

use durak_core::game::state::GameState;
use durak_core::model::face::CardFace;

/// Value of one player's position on its own: card values minus a per-card
/// penalty that grows once the deck runs low.
pub fn hand_score(state: &GameState, player: usize, params: &EvalParams) -> f64 {
    if state.has_won(player) {
        return params.win_bonus;
    }

    let trump = state.trump().suit;
    let hand = state.hand(player);
    let cards: f64 = hand
        .iter()
        .map(|face| match face {
            CardFace::Up(card) if card.suit == trump => {
                f64::from(card.rank.ordinal()) + params.trump_bonus
            }
            CardFace::Up(card) => f64::from(card.rank.ordinal()) - params.non_trump_offset,
            CardFace::Down => params.unknown_value,
        })
        .sum();

    cards - params.hand_size_penalty(state.cards_in_deck()) * hand.len() as f64
}

/// Own score minus the worst opponent's. In a last-player-loses game staying
/// ahead of the weakest seat matters more than the average.
pub fn evaluate(state: &GameState, player: usize, params: &EvalParams) -> f64 {
    let own = hand_score(state, player, params);
    let worst = (0..state.num_players())
        .filter(|&other| other != player)
        .map(|other| hand_score(state, other, params))
        .fold(None, |worst: Option<f64>, score| {
            Some(worst.map_or(score, |w| w.min(score)))
        });
    own - worst.unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::{EvalParams, evaluate, hand_score};
    use durak_core::game::state::GameState;
    use durak_core::model::card::Card;
    use durak_core::model::face::CardFace;
    use durak_core::model::rank::Rank;
    use durak_core::model::suit::Suit;

    fn up(rank: Rank, suit: Suit) -> CardFace {
        CardFace::Up(Card::new(rank, suit))
    }

    fn table() -> GameState {
        let mut state = GameState::with_seed(3, 1).unwrap();
        state.set_trump(Card::new(Rank::Six, Suit::Hearts));
        state.set_hand(0, vec![up(Rank::Ace, Suit::Hearts), up(Rank::Six, Suit::Clubs)]);
        state.set_hand(1, vec![CardFace::Down, CardFace::Down, CardFace::Down]);
        state.set_hand(2, vec![up(Rank::Ten, Suit::Spades)]);
        state
    }

    #[test]
    fn scores_cards_by_rank_suit_and_deck_size() {
        let params = EvalParams::default();
        let mut state = table();
        // Ace of trump 8 + 25, six of clubs 0 - 5, two cards at 5 each.
        assert_eq!(hand_score(&state, 0, &params), 33.0 - 5.0 - 10.0);
        assert_eq!(hand_score(&state, 1, &params), 6.0 - 15.0);

        state.set_deck(Vec::new());
        assert_eq!(hand_score(&state, 0, &params), 33.0 - 5.0 - 40.0);
    }

    #[test]
    fn evaluation_is_relative_to_the_worst_opponent() {
        let params = EvalParams::default();
        let state = table();
        let own = hand_score(&state, 0, &params);
        let worst = hand_score(&state, 1, &params).min(hand_score(&state, 2, &params));
        assert_eq!(evaluate(&state, 0, &params), own - worst);
    }

    #[test]
    fn weights_come_from_the_caller() {
        let state = table();
        let heavy = EvalParams {
            trump_bonus: 100.0,
            ..EvalParams::default()
        };
        assert!(
            hand_score(&state, 0, &heavy) > hand_score(&state, 0, &EvalParams::default())
        );
    }

    #[test]
    fn partial_params_fill_in_defaults() {
        let params: EvalParams = serde_json::from_str(r#"{"win_bonus": 900.0}"#).unwrap();
        assert_eq!(params.win_bonus, 900.0);
        assert_eq!(params.trump_bonus, EvalParams::default().trump_bonus);
    }
}
