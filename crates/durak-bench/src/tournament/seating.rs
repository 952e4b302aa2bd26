/// Deterministic assignment of agents to seats. Game `g` seats agent
/// `(g + seat) % agents` so every agent cycles through every seat.
pub struct SeatRotation {
    agents: usize,
    players: usize,
}

impl SeatRotation {
    pub fn new(agents: usize, players: usize) -> Self {
        Self { agents, players }
    }

    /// Agent index for each seat of game `game_index`.
    pub fn seating(&self, game_index: usize) -> Vec<usize> {
        if self.agents == 0 {
            return Vec::new();
        }
        (0..self.players)
            .map(|seat| (game_index + seat) % self.agents)
            .collect()
    }
}
