use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use pokedex_terminal::dex_config::DexConfig;
use pokedex_terminal::error::DexError;
use pokedex_terminal::orchestrator::{
    self, LookupOutcome, PokemonSource, build_team, compare, lookup, random_identifier,
    random_lookup, team_identifiers,
};
use pokedex_terminal::pokemon_fetch::Pokemon;
use pokedex_terminal::store::SharedStore;

fn make_pokemon(id: u32, name: &str, primary_type: &str) -> Pokemon {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "name": name,
        "height": 4,
        "weight": 60,
        "types": [{ "type": { "name": primary_type } }],
        "stats": [
            { "base_stat": 35, "stat": { "name": "hp" } },
            { "base_stat": 55, "stat": { "name": "attack" } }
        ],
        "moves": [
            { "move": { "name": "tackle" } }
        ],
        "sprites": { "front_default": null }
    }))
    .expect("valid entity json")
}

/// In-memory source that counts invocations and records every identifier.
struct FakeSource {
    known: HashMap<String, Pokemon>,
    calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl FakeSource {
    fn new(known: Vec<Pokemon>) -> Self {
        Self {
            known: known
                .into_iter()
                .map(|p| (p.name.clone(), p))
                .collect(),
            calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

impl PokemonSource for FakeSource {
    fn fetch_pokemon(&self, identifier: &str) -> Result<Pokemon, DexError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(identifier.to_string());
        self.known
            .get(identifier)
            .cloned()
            .ok_or_else(|| DexError::NotFound {
                identifier: identifier.to_string(),
            })
    }
}

/// Synthesizes an entity for any numeric identifier; never fails.
struct SynthSource;

impl PokemonSource for SynthSource {
    fn fetch_pokemon(&self, identifier: &str) -> Result<Pokemon, DexError> {
        let id: u32 = identifier.parse().map_err(|_| DexError::NotFound {
            identifier: identifier.to_string(),
        })?;
        Ok(make_pokemon(id, &format!("synth-{id}"), "normal"))
    }
}

/// Fails for even ids only; odd ids resolve.
struct OddOnlySource;

impl PokemonSource for OddOnlySource {
    fn fetch_pokemon(&self, identifier: &str) -> Result<Pokemon, DexError> {
        let id: u32 = identifier.parse().unwrap_or(0);
        if id % 2 == 1 {
            Ok(make_pokemon(id, &format!("odd-{id}"), "normal"))
        } else {
            Err(DexError::NotFound {
                identifier: identifier.to_string(),
            })
        }
    }
}

#[test]
fn blank_lookup_fails_fast_without_network() {
    let source = FakeSource::new(vec![make_pokemon(25, "pikachu", "electric")]);
    let store = SharedStore::new();

    assert!(matches!(
        lookup(&source, &store, ""),
        Err(DexError::InvalidInput)
    ));
    assert!(matches!(
        lookup(&source, &store, "   "),
        Err(DexError::InvalidInput)
    ));
    assert_eq!(source.calls(), 0);
    assert!(store.is_empty());
}

#[test]
fn lookup_stores_and_renders_the_card() {
    let source = FakeSource::new(vec![make_pokemon(25, "pikachu", "electric")]);
    let store = SharedStore::new();

    let outcome = lookup(&source, &store, "  PIKACHU ").expect("lookup should succeed");
    let card = match outcome {
        LookupOutcome::Completed(card) => card,
        LookupOutcome::Superseded { .. } => panic!("nothing raced this lookup"),
    };
    assert_eq!(card.id, 25);
    assert_eq!(card.height, "0.4 m");

    let stats = orchestrator::show_stats(&store).expect("store should be populated");
    assert_eq!(stats.name, "pikachu");
    assert_eq!(stats.lines.len(), 2);
}

#[test]
fn lookup_failure_leaves_the_store_untouched() {
    let source = FakeSource::new(vec![]);
    let store = SharedStore::new();

    let err = lookup(&source, &store, "missingno123").unwrap_err();
    match err {
        DexError::NotFound { identifier } => assert_eq!(identifier, "missingno123"),
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert!(store.is_empty());
    assert!(matches!(
        orchestrator::show_raw(&store),
        Err(DexError::NoCurrentEntity)
    ));
}

/// Delegates to the inner source but first dispatches a newer lookup,
/// simulating a slow fetch that gets overtaken mid-flight.
struct OvertakenSource<'a> {
    inner: FakeSource,
    store: &'a SharedStore,
}

impl PokemonSource for OvertakenSource<'_> {
    fn fetch_pokemon(&self, identifier: &str) -> Result<Pokemon, DexError> {
        self.store.issue_ticket();
        self.inner.fetch_pokemon(identifier)
    }
}

#[test]
fn overtaken_lookup_is_dropped() {
    let store = SharedStore::new();
    let source = OvertakenSource {
        inner: FakeSource::new(vec![make_pokemon(25, "pikachu", "electric")]),
        store: &store,
    };

    let outcome = lookup(&source, &store, "pikachu").expect("fetch itself succeeded");
    assert!(matches!(
        outcome,
        LookupOutcome::Superseded { identifier } if identifier == "pikachu"
    ));
    assert!(store.is_empty());
}

#[test]
fn random_identifiers_stay_in_range() {
    let mut rng = rand::thread_rng();
    for _ in 0..1000 {
        let id = random_identifier(&mut rng, 1010);
        assert!((1..=1010).contains(&id));
    }
}

#[test]
fn random_lookup_delegates_with_a_numeric_identifier() {
    let source = FakeSource::new(vec![]);
    let store = SharedStore::new();
    let mut rng = rand::thread_rng();

    // Nothing resolves, which is fine: the delegated identifier is the point.
    let _ = random_lookup(&source, &store, &mut rng, 50);
    let requested = source.requested();
    assert_eq!(requested.len(), 1);
    let id: u32 = requested[0].parse().expect("identifier should be numeric");
    assert!((1..=50).contains(&id));
}

#[test]
fn compare_fetches_both_and_names_the_missing_one() {
    let source = FakeSource::new(vec![make_pokemon(25, "pikachu", "electric")]);

    let err = compare(&source, "pikachu", "missingno123").unwrap_err();
    match err {
        DexError::NotFound { identifier } => assert_eq!(identifier, "missingno123"),
        other => panic!("expected NotFound, got {other:?}"),
    }
    // All-or-nothing join: both sides were attempted.
    assert_eq!(source.calls(), 2);
}

#[test]
fn compare_renders_side_by_side() {
    let source = FakeSource::new(vec![
        make_pokemon(25, "pikachu", "electric"),
        make_pokemon(6, "charizard", "fire"),
    ]);

    let view = compare(&source, "Pikachu", "CHARIZARD").expect("both resolve");
    assert_eq!(view.left.name, "pikachu");
    assert_eq!(view.right.name, "charizard");
    assert_eq!(view.right.types[0], "fire");
}

#[test]
fn compare_rejects_blank_sides_offline() {
    let source = FakeSource::new(vec![make_pokemon(25, "pikachu", "electric")]);
    assert!(matches!(
        compare(&source, "pikachu", "  "),
        Err(DexError::InvalidInput)
    ));
    assert_eq!(source.calls(), 0);
}

#[test]
fn team_identifiers_are_distinct_and_in_range() {
    let mut rng = rand::thread_rng();
    for _ in 0..50 {
        let ids = team_identifiers(&mut rng, 3, 1010);
        assert_eq!(ids.len(), 3);
        assert!(ids.iter().all(|id| (1..=1010).contains(id)));
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[0], ids[2]);
        assert_ne!(ids[1], ids[2]);
    }
}

#[test]
fn team_identifiers_cap_at_the_id_space() {
    let mut rng = rand::thread_rng();
    let ids = team_identifiers(&mut rng, 6, 4);
    assert_eq!(ids.len(), 4);
}

#[test]
fn build_team_returns_exactly_team_size_members() {
    let mut rng = rand::thread_rng();
    let cfg = DexConfig {
        max_pokemon_id: 100,
        ..DexConfig::default()
    };

    let team = build_team(&SynthSource, &mut rng, &cfg).expect("synthetic fetches succeed");
    assert_eq!(team.len(), cfg.team_size);

    let mut ids: Vec<u32> = team.iter().map(|m| m.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), cfg.team_size);
    assert!(team.iter().all(|m| m.primary_type == "normal"));
}

#[test]
fn build_team_is_all_or_nothing() {
    let mut rng = rand::thread_rng();
    // Id space {1, 2} with a team of two: id 2 always fails the build.
    let cfg = DexConfig {
        max_pokemon_id: 2,
        team_size: 2,
        ..DexConfig::default()
    };

    let result = build_team(&OddOnlySource, &mut rng, &cfg);
    assert!(matches!(result, Err(DexError::NotFound { .. })));
}
