use crate::game::state::GameState;
use crate::model::action::Action;
use serde::{Deserialize, Serialize};

/// What one seat is allowed to see: the state masked for that player and the
/// actions open to them. This is the payload handed to remote or scripted agents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerView {
    pub player: usize,
    pub state: GameState,
    pub actions: Vec<Action>,
}

impl PlayerView {
    pub fn capture(state: &GameState, player: usize) -> Self {
        let masked = state.masked_for(player);
        let actions = masked.player_actions(player);
        PlayerView {
            player,
            state: masked,
            actions,
        }
    }

    pub fn to_json(state: &GameState, player: usize) -> serde_json::Result<String> {
        let view = Self::capture(state, player);
        serde_json::to_string_pretty(&view)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::PlayerView;
    use crate::game::state::GameState;

    #[test]
    fn view_serializes_to_json() {
        let state = GameState::with_seed(3, 99).unwrap();
        let attacker = state.attacker();
        let json = PlayerView::to_json(&state, attacker).unwrap();
        assert!(json.contains(&format!("\"player\": {attacker}")));
        assert!(json.contains("\"Verb\""));
        // Opponents' unrevealed cards travel as the face-down code.
        assert!(json.contains("-1"));
    }

    #[test]
    fn view_roundtrip_keeps_the_masked_state() {
        let state = GameState::with_seed(4, 123).unwrap();
        let attacker = state.attacker();
        let json = PlayerView::to_json(&state, attacker).unwrap();
        let view = PlayerView::from_json(&json).unwrap();
        assert_eq!(view, PlayerView::capture(&state, attacker));
        assert_eq!(view.state.hand(attacker), state.hand(attacker));
        assert_eq!(view.actions, state.player_actions(attacker));
    }

    #[test]
    fn view_hides_other_hands() {
        let state = GameState::with_seed(2, 5).unwrap();
        let view = PlayerView::capture(&state, 0);
        assert_eq!(view.state.hand(1).count_down(), state.hand(1).len());
        assert_eq!(view.state.hand(0).count_down(), 0);
    }

    fn tampered(
        state: &GameState,
        player: usize,
        edit: impl FnOnce(&mut serde_json::Value),
    ) -> String {
        let mut value: serde_json::Value =
            serde_json::from_str(&PlayerView::to_json(state, player).unwrap()).unwrap();
        edit(&mut value["state"]);
        value.to_string()
    }

    #[test]
    fn views_with_a_broken_table_are_rejected() {
        let mut state = GameState::with_seed(2, 8).unwrap();
        let attacker = state.attacker();
        let opening = state.player_actions(attacker)[0];
        state.take_action(opening);
        let defender = state.defender();

        let json = tampered(&state, defender, |s| s["covers"] = serde_json::json!([]));
        assert!(PlayerView::from_json(&json).is_err());

        let json = tampered(&state, defender, |s| {
            let plays = s["plays"].clone();
            s["plays"] = serde_json::json!([plays[0], plays[0]]);
        });
        assert!(PlayerView::from_json(&json).is_err());
    }

    #[test]
    fn views_with_bad_seats_are_rejected() {
        let state = GameState::with_seed(3, 8).unwrap();
        let attacker = state.attacker();

        let json = tampered(&state, attacker, |s| s["defender"] = serde_json::json!(3));
        assert!(PlayerView::from_json(&json).is_err());

        let json = tampered(&state, attacker, |s| s["won"] = serde_json::json!([false, false]));
        assert!(PlayerView::from_json(&json).is_err());

        let json = tampered(&state, attacker, |s| {
            let hand = s["hands"][0].clone();
            let known = s["known"][0].clone();
            s["hands"] = serde_json::json!([hand]);
            s["known"] = serde_json::json!([known]);
            s["passed"] = serde_json::json!([false]);
            s["deferring"] = serde_json::json!([false]);
            s["won"] = serde_json::json!([false]);
        });
        assert!(PlayerView::from_json(&json).is_err());

        // The untouched view still restores.
        let json = tampered(&state, attacker, |_| {});
        let view = PlayerView::from_json(&json).unwrap();
        assert_eq!(view.actions, view.state.player_actions(attacker));
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(PlayerView::from_json("{\"player\": 0}").is_err());
    }
}
