pub mod bot;
pub mod eval;
pub mod policy;
pub mod search;
pub mod table;

pub use bot::{DurakSearch, SearchBot, find_best_action};
pub use eval::{EvalParams, evaluate, hand_score};
pub use policy::{Policy, RandomPolicy, SearchPolicy};
pub use search::{Deadline, SearchOutcome, SearchReport, SearchState, Timeout};
pub use table::SharedTable;
