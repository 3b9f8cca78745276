use std::collections::HashSet;

use rand::Rng;
use rayon::prelude::*;

use crate::dex_config::DexConfig;
use crate::error::DexError;
use crate::pokemon_fetch::{self, Pokemon};
use crate::store::SharedStore;
use crate::views::{
    self, ComparisonView, MovesPanel, PokemonCard, RawPanel, StatsPanel, TeamMemberRow, TypesPanel,
};

/// Where entities come from. The live API client is one implementation;
/// tests substitute in-memory fakes behind the same seam.
pub trait PokemonSource: Send + Sync {
    fn fetch_pokemon(&self, identifier: &str) -> Result<Pokemon, DexError>;
}

/// Fetches from the live API, one attempt per call, no caching.
pub struct HttpSource {
    api_base: String,
}

impl HttpSource {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
        }
    }
}

impl PokemonSource for HttpSource {
    fn fetch_pokemon(&self, identifier: &str) -> Result<Pokemon, DexError> {
        pokemon_fetch::fetch_pokemon(&self.api_base, identifier)
    }
}

/// What became of a dispatched lookup. A superseded lookup finished after a
/// newer one was dispatched; its result is discarded rather than shown.
#[derive(Debug)]
pub enum LookupOutcome {
    Completed(PokemonCard),
    Superseded { identifier: String },
}

/// Validate -> fetch -> store -> render. The store is written before the
/// card is built, so a card that fails to render still leaves the fetched
/// entity available to the raw/stats/moves/types operations.
pub fn lookup(
    source: &dyn PokemonSource,
    store: &SharedStore,
    raw_identifier: &str,
) -> Result<LookupOutcome, DexError> {
    let identifier = pokemon_fetch::normalize_identifier(raw_identifier)?;
    let ticket = store.issue_ticket();

    let entity = source.fetch_pokemon(&identifier)?;
    if !store.set_if_current(ticket, entity) {
        return Ok(LookupOutcome::Superseded { identifier });
    }

    let card = store.with_current(|entity| views::card_view(entity))?;
    Ok(LookupOutcome::Completed(card))
}

pub fn random_identifier(rng: &mut impl Rng, max_id: u32) -> u32 {
    rng.gen_range(1..=max_id.max(1))
}

pub fn random_lookup(
    source: &dyn PokemonSource,
    store: &SharedStore,
    rng: &mut impl Rng,
    max_id: u32,
) -> Result<LookupOutcome, DexError> {
    let id = random_identifier(rng, max_id);
    lookup(source, store, &id.to_string())
}

/// Both fetches run concurrently and both must succeed; the error of a
/// failing side already names its identifier. Neither result touches the
/// store.
pub fn compare(
    source: &dyn PokemonSource,
    first_raw: &str,
    second_raw: &str,
) -> Result<ComparisonView, DexError> {
    let first = pokemon_fetch::normalize_identifier(first_raw)?;
    let second = pokemon_fetch::normalize_identifier(second_raw)?;

    let (left, right) = rayon::join(
        || source.fetch_pokemon(&first),
        || source.fetch_pokemon(&second),
    );

    match (left, right) {
        (Ok(left), Ok(right)) => views::comparison_view(&left, &right),
        (Err(err), _) | (Ok(_), Err(err)) => Err(err),
    }
}

/// Rejection-samples `team_size` pairwise-distinct ids in `[1, max_id]`,
/// keeping draw order.
pub fn team_identifiers(rng: &mut impl Rng, team_size: usize, max_id: u32) -> Vec<u32> {
    let max_id = max_id.max(1);
    // More slots than ids would never terminate.
    let team_size = team_size.min(max_id as usize);

    let mut seen = HashSet::new();
    let mut ordered = Vec::with_capacity(team_size);
    while ordered.len() < team_size {
        let id = rng.gen_range(1..=max_id);
        if seen.insert(id) {
            ordered.push(id);
        }
    }
    ordered
}

/// All `team_size` fetches run concurrently; any failure fails the whole
/// build and partial results are discarded.
pub fn build_team(
    source: &dyn PokemonSource,
    rng: &mut impl Rng,
    cfg: &DexConfig,
) -> Result<Vec<TeamMemberRow>, DexError> {
    let ids = team_identifiers(rng, cfg.team_size, cfg.max_pokemon_id);

    let members: Result<Vec<Pokemon>, DexError> = ids
        .par_iter()
        .map(|id| source.fetch_pokemon(&id.to_string()))
        .collect();

    members?.iter().map(views::team_member_row).collect()
}

pub fn show_raw(store: &SharedStore) -> Result<RawPanel, DexError> {
    store.with_current(views::raw_panel)
}

pub fn show_stats(store: &SharedStore) -> Result<StatsPanel, DexError> {
    store.with_current(views::stats_panel)
}

pub fn show_moves(store: &SharedStore, limit: usize) -> Result<MovesPanel, DexError> {
    store.with_current(|entity| Ok(views::moves_panel(entity, limit)))
}

pub fn show_types(store: &SharedStore) -> Result<TypesPanel, DexError> {
    store.with_current(views::types_panel)
}
