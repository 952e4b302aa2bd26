mod seating;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use durak_bot::bot::{DEFAULT_MAX_DEPTH, DEFAULT_TIME_BUDGET_MS};
use durak_bot::eval::EvalParams;
use durak_bot::policy::{Policy, RandomPolicy, SearchPolicy};
use durak_bot::SearchBot;
use durak_core::game::error::{ActionError, SetupError};
use durak_core::game::state::GameState;
use durak_core::model::action::Action;
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{AgentConfig, AgentKind, BenchmarkConfig, ResolvedOutputs};

pub use seating::SeatRotation;

/// Plays the configured games and writes one JSONL row per game plus a
/// Markdown loss table.
pub struct MatchRunner {
    config: BenchmarkConfig,
    outputs: ResolvedOutputs,
    agents: Vec<AgentBlueprint>,
    rotation: SeatRotation,
    logging_enabled: bool,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub games_played: usize,
    pub finished: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub telemetry_path: Option<PathBuf>,
}

impl MatchRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: BenchmarkConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let agents = AgentBlueprint::from_configs(&config.agents)?;
        if agents.is_empty() {
            return Err(AgentError::NoAgents.into());
        }
        let rotation = SeatRotation::new(agents.len(), config.games.players);

        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            agents,
            rotation,
        })
    }

    /// Execute every game, streaming JSONL rows to disk.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.jsonl.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.games.seed.unwrap_or(0));
        let mut tallies: Vec<AgentTally> = self.agents.iter().map(AgentTally::new).collect();
        let mut rows_written = 0usize;
        let mut finished = 0usize;

        for game_index in 0..self.config.games.count {
            let game_seed = rng.next_u64();
            let outcome = self.play_game(game_index, game_seed)?;

            for seat in &outcome.seats {
                let tally = &mut tallies[seat.agent_index];
                tally.seats += 1;
                tally.decisions += seat.metrics.decisions;
                tally.total_ms += seat.metrics.total_ms;
                if outcome.loser == Some(seat.seat) {
                    tally.losses += 1;
                }
            }
            if outcome.finished {
                finished += 1;
            }

            write_game_row(&mut writer, &self.config, game_index, game_seed, &outcome)?;
            rows_written += 1;
        }

        writer.flush()?;
        write_summary(
            &self.outputs.summary_md,
            &self.config,
            &tallies,
            finished,
        )?;

        let telemetry_path = if self.logging_enabled {
            self.outputs
                .summary_md
                .parent()
                .map(|dir| dir.join("telemetry.jsonl"))
        } else {
            None
        };

        Ok(RunSummary {
            games_played: self.config.games.count,
            finished,
            rows_written,
            jsonl_path: self.outputs.jsonl.clone(),
            summary_path: self.outputs.summary_md.clone(),
            telemetry_path,
        })
    }

    fn play_game(&self, game_index: usize, game_seed: u64) -> Result<GameOutcome, RunnerError> {
        let mut state = GameState::with_seed(self.config.games.players, game_seed)?;
        let seating = self.rotation.seating(game_index);
        let mut seats = build_seats(&seating, &self.agents, game_seed);
        let players = seats.len();

        let mut applied = 0usize;
        let mut rejected = 0usize;
        let mut fallbacks = 0usize;
        let mut forced = 0usize;
        let mut cursor = state.attacker();

        while !state.is_over() && applied < self.config.games.max_actions {
            let mut progressed = None;

            // Offer the move to each seat in turn, starting after the last actor.
            for offset in 0..players {
                let player = (cursor + offset) % players;
                if state.player_actions(player).is_empty() {
                    continue;
                }

                let seat = &mut seats[player];
                let start = Instant::now();
                let choice = seat.policy.choose(&state, player);
                seat.metrics.record(start.elapsed());

                let mut committed = None;
                if let Some(action) = choice {
                    let result = if action.player == player {
                        state.try_take_action(action)
                    } else {
                        Err(ActionError::Illegal(action))
                    };
                    match result {
                        Ok(()) => committed = Some(action),
                        Err(err) => {
                            rejected += 1;
                            event!(
                                target: "durak_bench::action",
                                Level::WARN,
                                run_id = %self.config.run_id,
                                game_index = game_index as u32,
                                agent = %seat.agent_name,
                                player,
                                action = %action,
                                error = %err,
                                "policy chose an illegal action"
                            );
                        }
                    }
                }

                if committed.is_none() && state.try_take_action(Action::pass(player)).is_ok() {
                    fallbacks += 1;
                    committed = Some(Action::pass(player));
                }

                if let Some(action) = committed {
                    progressed = Some(action);
                    break;
                }
            }

            let action = match progressed {
                Some(action) => action,
                None => {
                    // Every seat with a move declined it.
                    let Some(action) = state.all_actions().first().copied() else {
                        break;
                    };
                    state.take_action(action);
                    forced += 1;
                    event!(
                        target: "durak_bench::action",
                        Level::WARN,
                        run_id = %self.config.run_id,
                        game_index = game_index as u32,
                        action = %action,
                        "no seat acted; forcing first legal action"
                    );
                    action
                }
            };

            applied += 1;
            cursor = (action.player + 1) % players;

            if self.logging_enabled && tracing::enabled!(Level::DEBUG) {
                event!(
                    target: "durak_bench::action",
                    Level::DEBUG,
                    run_id = %self.config.run_id,
                    game_index = game_index as u32,
                    step = applied as u32,
                    deck = state.cards_in_deck(),
                    action = %action
                );
            }
        }

        let finished = state.is_over();
        let loser = state.loser();
        let seats: Vec<SeatResult> = seats
            .into_iter()
            .enumerate()
            .map(|(seat, slot)| SeatResult {
                seat,
                agent_index: slot.agent_index,
                agent_name: slot.agent_name,
                metrics: slot.metrics.finalize(),
            })
            .collect();

        event!(
            target: "durak_bench::game",
            Level::INFO,
            run_id = %self.config.run_id,
            game_index = game_index as u32,
            game_seed,
            finished,
            loser = loser.map(|seat| seats[seat].agent_name.as_str()).unwrap_or("none"),
            actions = applied,
            rejected,
            fallbacks,
            forced
        );

        Ok(GameOutcome {
            seats,
            finished,
            loser,
            actions: applied,
            rejected,
            fallbacks,
            forced,
        })
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

fn build_seats(seating: &[usize], agents: &[AgentBlueprint], game_seed: u64) -> Vec<SeatState> {
    seating
        .iter()
        .enumerate()
        .map(|(seat, &agent_index)| {
            let agent = &agents[agent_index];
            SeatState {
                agent_index,
                agent_name: agent.name.clone(),
                policy: agent.spawn_policy(game_seed.wrapping_add(seat as u64 + 1)),
                metrics: DecisionMetrics::default(),
            }
        })
        .collect()
}

fn write_game_row(
    writer: &mut BufWriter<File>,
    config: &BenchmarkConfig,
    game_index: usize,
    game_seed: u64,
    outcome: &GameOutcome,
) -> Result<(), RunnerError> {
    let row = GameLogRow {
        run_id: config.run_id.clone(),
        game_id: format!("G{game_index:05}"),
        game_index,
        game_seed,
        players: outcome.seats.len(),
        seating: outcome
            .seats
            .iter()
            .map(|seat| SeatSnapshot {
                seat: seat.seat,
                agent: seat.agent_name.clone(),
                decisions: seat.metrics.decisions,
                avg_ms_per_decision: seat.metrics.avg_ms_per_decision,
            })
            .collect(),
        finished: outcome.finished,
        loser_seat: outcome.loser,
        loser: outcome.loser.map(|seat| outcome.seats[seat].agent_name.clone()),
        actions: outcome.actions,
        rejected: outcome.rejected,
        fallbacks: outcome.fallbacks,
        forced: outcome.forced,
    };

    serde_json::to_writer(&mut *writer, &row)?;
    writer.write_all(b"\n")?;
    Ok(())
}

fn write_summary(
    path: &Path,
    config: &BenchmarkConfig,
    tallies: &[AgentTally],
    finished: usize,
) -> Result<(), RunnerError> {
    let games = config.games.count;
    let mut out = String::new();
    out.push_str("# Durak Bench Summary\n\n");
    out.push_str(&format!(
        "Run `{}`: {games} games at {} seats, {finished} finished, {} unfinished after {} actions.\n\n",
        config.run_id,
        config.games.players,
        games - finished,
        config.games.max_actions
    ));
    out.push_str("| Agent | Kind | Seats | Losses | Loss % | Avg ms/decision |\n");
    out.push_str("|-------|------|-------|--------|--------|-----------------|\n");

    for tally in tallies {
        let loss_rate = if tally.seats == 0 {
            0.0
        } else {
            tally.losses as f64 / tally.seats as f64
        };
        let avg_ms = if tally.decisions == 0 {
            0.0
        } else {
            tally.total_ms / f64::from(tally.decisions)
        };
        out.push_str(&format!(
            "| {name} | {kind:?} | {seats} | {losses} | {loss:.1}% | {avg_ms:.2} |\n",
            name = tally.name,
            kind = tally.kind,
            seats = tally.seats,
            losses = tally.losses,
            loss = loss_rate * 100.0,
        ));
    }

    fs::write(path, out)?;
    Ok(())
}

struct SeatState {
    agent_index: usize,
    agent_name: String,
    policy: Box<dyn Policy>,
    metrics: DecisionMetrics,
}

struct GameOutcome {
    seats: Vec<SeatResult>,
    finished: bool,
    loser: Option<usize>,
    actions: usize,
    rejected: usize,
    fallbacks: usize,
    forced: usize,
}

struct SeatResult {
    seat: usize,
    agent_index: usize,
    agent_name: String,
    metrics: DecisionSummary,
}

struct AgentTally {
    name: String,
    kind: AgentKind,
    seats: usize,
    losses: usize,
    decisions: u32,
    total_ms: f64,
}

impl AgentTally {
    fn new(agent: &AgentBlueprint) -> Self {
        Self {
            name: agent.name.clone(),
            kind: agent.kind(),
            seats: 0,
            losses: 0,
            decisions: 0,
            total_ms: 0.0,
        }
    }
}

#[derive(Default)]
struct DecisionMetrics {
    total: Duration,
    decisions: u32,
}

impl DecisionMetrics {
    fn record(&mut self, duration: Duration) {
        self.total += duration;
        self.decisions += 1;
    }

    fn finalize(self) -> DecisionSummary {
        let avg_ms = if self.decisions == 0 {
            0.0
        } else {
            self.total.as_secs_f64() * 1000.0 / f64::from(self.decisions)
        };

        DecisionSummary {
            decisions: self.decisions,
            avg_ms_per_decision: avg_ms,
            total_ms: self.total.as_secs_f64() * 1000.0,
        }
    }
}

#[derive(Clone)]
struct DecisionSummary {
    decisions: u32,
    avg_ms_per_decision: f64,
    total_ms: f64,
}

#[derive(Serialize)]
struct SeatSnapshot {
    seat: usize,
    agent: String,
    decisions: u32,
    avg_ms_per_decision: f64,
}

#[derive(Serialize)]
struct GameLogRow {
    run_id: String,
    game_id: String,
    game_index: usize,
    game_seed: u64,
    players: usize,
    seating: Vec<SeatSnapshot>,
    finished: bool,
    loser_seat: Option<usize>,
    loser: Option<String>,
    actions: usize,
    rejected: usize,
    fallbacks: usize,
    forced: usize,
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{0}")]
    Agent(#[from] AgentError),
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize log row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("could not set up game: {0}")]
    Setup(#[from] SetupError),
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("no agents configured")]
    NoAgents,
    #[error("invalid search parameter for agent '{name}': {message}")]
    InvalidSearchParam { name: String, message: String },
}

struct AgentBlueprint {
    name: String,
    implementation: AgentImplementation,
}

enum AgentImplementation {
    Search(SearchOptions),
    Random,
}

impl AgentBlueprint {
    fn from_configs(configs: &[AgentConfig]) -> Result<Vec<Self>, AgentError> {
        configs.iter().map(Self::from_config).collect()
    }

    fn from_config(config: &AgentConfig) -> Result<Self, AgentError> {
        let implementation = match config.kind {
            AgentKind::Search => {
                AgentImplementation::Search(SearchOptions::from_params(&config.name, &config.params)?)
            }
            AgentKind::Random => AgentImplementation::Random,
        };

        Ok(Self {
            name: config.name.clone(),
            implementation,
        })
    }

    fn kind(&self) -> AgentKind {
        match self.implementation {
            AgentImplementation::Search(_) => AgentKind::Search,
            AgentImplementation::Random => AgentKind::Random,
        }
    }

    fn spawn_policy(&self, seed: u64) -> Box<dyn Policy> {
        match &self.implementation {
            AgentImplementation::Search(opts) => {
                Box::new(SearchPolicy::new(self.name.clone(), opts.bot()))
            }
            AgentImplementation::Random => Box::new(RandomPolicy::new(self.name.clone(), seed)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct SearchOptions {
    depth: usize,
    time_budget_ms: u64,
    eval: EvalParams,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            depth: DEFAULT_MAX_DEPTH,
            time_budget_ms: DEFAULT_TIME_BUDGET_MS,
            eval: EvalParams::default(),
        }
    }
}

impl SearchOptions {
    fn from_params(name: &str, params: &serde_yaml::Value) -> Result<Self, AgentError> {
        let mut options = Self::default();
        if params.is_null() {
            return Ok(options);
        }

        let invalid = |message: &str| AgentError::InvalidSearchParam {
            name: name.to_string(),
            message: message.to_string(),
        };

        let mapping = params
            .as_mapping()
            .ok_or_else(|| invalid("expected mapping for search params"))?;

        for (key, value) in mapping {
            match key.as_str() {
                Some("depth") => {
                    options.depth = value
                        .as_u64()
                        .filter(|&depth| depth > 0)
                        .ok_or_else(|| invalid("depth must be a positive integer"))?
                        as usize;
                }
                Some("time_budget_ms") => {
                    options.time_budget_ms = value
                        .as_u64()
                        .ok_or_else(|| invalid("time_budget_ms must be an integer"))?;
                }
                Some("eval") => {
                    options.eval = serde_yaml::from_value(value.clone()).map_err(|err| {
                        AgentError::InvalidSearchParam {
                            name: name.to_string(),
                            message: format!("eval: {err}"),
                        }
                    })?;
                }
                _ => {}
            }
        }

        Ok(options)
    }

    fn bot(&self) -> SearchBot {
        SearchBot::new(
            self.eval,
            self.depth,
            Duration::from_millis(self.time_budget_ms),
        )
    }
}
