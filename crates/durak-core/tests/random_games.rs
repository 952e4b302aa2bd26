use durak_core::game::error::ActionError;
use durak_core::game::state::GameState;
use durak_core::model::card::DECK_SIZE;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

const ACTION_LIMIT: usize = 2000;

fn check_invariants(state: &GameState) {
    assert_eq!(state.total_cards(), DECK_SIZE);
    assert_eq!(state.plays().len(), state.covers().len());
    for player in 0..state.num_players() {
        for card in state.known(player).iter() {
            assert!(
                state.hand(player).contains(*card),
                "player {player} is known to hold {card} but does not"
            );
        }
    }
    if !state.is_over() {
        assert!(!state.all_actions().is_empty());
        assert_ne!(state.attacker(), state.defender());
        assert!(!state.has_won(state.attacker()));
        assert!(!state.has_won(state.defender()));
    }
}

fn check_mask(state: &GameState, me: usize) {
    let view = state.masked_for(me);
    assert_eq!(view.hand(me), state.hand(me));
    assert_eq!(view.cards_in_deck(), state.cards_in_deck());
    for player in 0..state.num_players() {
        assert_eq!(view.hand(player).len(), state.hand(player).len());
        if player != me {
            let revealed = view.hand(player).len() - view.hand(player).count_down();
            assert_eq!(revealed, state.known(player).len());
        }
    }
    assert_eq!(view.player_actions(me).len(), state.player_actions(me).len());
}

/// Plays uniformly random legal actions; returns the final state and the
/// number of actions taken.
fn play_random_game(players: usize, seed: u64) -> (GameState, usize) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut state = GameState::with_seed(players, seed).unwrap();
    check_invariants(&state);

    let mut taken = 0;
    while taken < ACTION_LIMIT && !state.is_over() {
        let actions = state.all_actions();
        let action = *actions.choose(&mut rng).unwrap();
        state.try_take_action(action).unwrap();
        taken += 1;
        check_invariants(&state);
        check_mask(&state, action.player);
    }
    (state, taken)
}

/// Random play ends well inside this many actions at every table size.
const TERMINATION_BOUND: usize = 1000;

#[test]
fn random_games_keep_the_table_consistent_and_finish() {
    for players in 2..=6 {
        for seed in 0..40u64 {
            let seed = seed * 31 + players as u64;
            let (state, actions) = play_random_game(players, seed);
            assert!(
                state.is_over(),
                "{players}-player game with seed {seed} still running after {actions} actions"
            );
            assert!(actions <= TERMINATION_BOUND);
        }
    }
}

#[test]
fn finished_games_have_one_loser() {
    let mut finished = 0;
    for seed in 0..60u64 {
        let (state, _) = play_random_game(2, seed);
        if state.is_over() {
            finished += 1;
            let loser = state.loser().unwrap();
            assert!(!state.has_won(loser));
            assert_eq!(state.won_count(), 1);
            assert_eq!(state.cards_in_deck(), 0);
        }
    }
    assert!(finished > 0, "no random two-player game finished");
}

#[test]
fn finished_games_refuse_further_actions() {
    let finished = (0..60u64)
        .map(|seed| play_random_game(3, seed).0)
        .find(GameState::is_over);
    if let Some(mut state) = finished {
        let loser = state.loser().unwrap();
        assert_eq!(
            state.try_take_action(durak_core::model::action::Action::pick_up(loser)),
            Err(ActionError::GameOver)
        );
    }
}

#[test]
fn seeded_games_replay_identically() {
    let a = play_random_game(4, 77);
    let b = play_random_game(4, 77);
    assert_eq!(a, b);
}
