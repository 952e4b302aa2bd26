use super::Policy;
use crate::bot::SearchBot;
use durak_core::game::state::GameState;
use durak_core::model::action::Action;
use std::time::Instant;
use tracing::{Level, event};

/// Adapter that lets a [`SearchBot`] take a seat.
pub struct SearchPolicy {
    name: String,
    bot: SearchBot,
}

impl SearchPolicy {
    pub fn new(name: impl Into<String>, bot: SearchBot) -> Self {
        Self {
            name: name.into(),
            bot,
        }
    }

    pub fn bot(&self) -> &SearchBot {
        &self.bot
    }
}

impl Policy for SearchPolicy {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose(&mut self, state: &GameState, player: usize) -> Option<Action> {
        let started = Instant::now();
        let report = self.bot.analyse(state, player);
        if let Some(action) = report.action {
            event!(
                target: "durak_bot::play",
                Level::INFO,
                agent = %self.name,
                player,
                deck = state.cards_in_deck(),
                depth = report.depth,
                nodes = report.nodes,
                timed_out = report.timed_out,
                elapsed_ms = started.elapsed().as_millis() as u64,
                chosen = %action,
            );
        }
        report.action
    }
}
