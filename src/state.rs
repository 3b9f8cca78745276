use std::collections::VecDeque;

use crate::views::{ComparisonView, MovesPanel, PokemonCard, RawPanel, StatsPanel, TeamMemberRow, TypesPanel};

const MAX_LOGS: usize = 200;

/// Per-invocation lifecycle of the most recent action: `Idle` until the first
/// dispatch, then `Loading`, then terminal in `Success`/`Failure` until the
/// next dispatch resets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    Idle,
    Loading,
    Success,
    Failure,
}

/// What the results panel currently shows. Exactly one view at a time;
/// every action replaces it wholesale.
#[derive(Debug, Clone)]
pub enum ResultView {
    Empty,
    Card(PokemonCard),
    Raw(RawPanel),
    Stats(StatsPanel),
    Moves(MovesPanel),
    Types(TypesPanel),
    Comparison(ComparisonView),
    Team(Vec<TeamMemberRow>),
    Error(String),
}

#[derive(Debug)]
pub struct AppState {
    pub input: String,
    pub input_active: bool,
    pub phase: FetchPhase,
    pub view: ResultView,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            input_active: false,
            phase: FetchPhase::Idle,
            view: ResultView::Empty,
            logs: VecDeque::with_capacity(MAX_LOGS),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

/// Requests the host sends to the provider thread.
#[derive(Debug, Clone)]
pub enum ProviderCommand {
    Lookup { identifier: String },
    RandomLookup,
    Compare { first: String, second: String },
    BuildTeam,
    ShowRaw,
    ShowStats,
    ShowMoves,
    ShowTypes,
    ClearCurrent,
}

/// Updates the provider sends back; `apply_delta` folds them into state.
#[derive(Debug, Clone)]
pub enum Delta {
    FetchStarted { label: String },
    ShowView(ResultView),
    ShowError(String),
    Log(String),
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::FetchStarted { label } => {
            state.phase = FetchPhase::Loading;
            state.push_log(format!("[INFO] {label}"));
        }
        Delta::ShowView(view) => {
            state.phase = FetchPhase::Success;
            state.view = view;
        }
        Delta::ShowError(message) => {
            state.phase = FetchPhase::Failure;
            state.view = ResultView::Error(message);
        }
        Delta::Log(message) => state.push_log(message),
    }
}
