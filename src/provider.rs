use std::env;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::dex_config::DexConfig;
use crate::error::DexError;
use crate::orchestrator::{self, HttpSource, LookupOutcome, PokemonSource};
use crate::state::{Delta, ProviderCommand, ResultView};
use crate::store::SharedStore;

/// Owns the network side of the app: receives commands from the host,
/// dispatches fetch jobs onto a bounded pool, and reports back as deltas.
/// View-only operations read the shared store inline; they never hit the
/// network.
pub fn spawn_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    thread::spawn(move || {
        let cfg = Arc::new(DexConfig::from_env());
        let store = Arc::new(SharedStore::new());
        let source: Arc<dyn PokemonSource> = Arc::new(HttpSource::new(cfg.api_base.clone()));
        let pool = build_fetch_pool();

        let _ = tx.send(Delta::Log(format!(
            "[INFO] Dex ready: ids 1-{}, team of {}",
            cfg.max_pokemon_id, cfg.team_size
        )));

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::Lookup { identifier } => {
                    let _ = tx.send(Delta::FetchStarted {
                        label: format!("Lookup: {identifier}"),
                    });
                    let tx = tx.clone();
                    let store = store.clone();
                    let source = source.clone();
                    spawn_job(&pool, move || {
                        send_lookup_result(
                            &tx,
                            orchestrator::lookup(source.as_ref(), &store, &identifier),
                        );
                    });
                }
                ProviderCommand::RandomLookup => {
                    let _ = tx.send(Delta::FetchStarted {
                        label: "Random lookup".to_string(),
                    });
                    let tx = tx.clone();
                    let store = store.clone();
                    let source = source.clone();
                    let max_id = cfg.max_pokemon_id;
                    spawn_job(&pool, move || {
                        let mut rng = rand::thread_rng();
                        send_lookup_result(
                            &tx,
                            orchestrator::random_lookup(source.as_ref(), &store, &mut rng, max_id),
                        );
                    });
                }
                ProviderCommand::Compare { first, second } => {
                    let _ = tx.send(Delta::FetchStarted {
                        label: format!("Compare: {first} vs {second}"),
                    });
                    let tx = tx.clone();
                    let source = source.clone();
                    spawn_job(&pool, move || {
                        match orchestrator::compare(source.as_ref(), &first, &second) {
                            Ok(view) => {
                                let _ = tx.send(Delta::ShowView(ResultView::Comparison(view)));
                            }
                            Err(err) => {
                                let _ = tx.send(Delta::Log(format!("[WARN] Compare: {err}")));
                                let _ = tx.send(Delta::ShowError(format!(
                                    "Could not compare \"{first}\" with \"{second}\": {}",
                                    err.user_message()
                                )));
                            }
                        }
                    });
                }
                ProviderCommand::BuildTeam => {
                    let _ = tx.send(Delta::FetchStarted {
                        label: format!("Team build: {} random picks", cfg.team_size),
                    });
                    let tx = tx.clone();
                    let source = source.clone();
                    let cfg = cfg.clone();
                    spawn_job(&pool, move || {
                        let mut rng = rand::thread_rng();
                        match orchestrator::build_team(source.as_ref(), &mut rng, &cfg) {
                            Ok(team) => {
                                let _ = tx.send(Delta::ShowView(ResultView::Team(team)));
                            }
                            Err(err) => {
                                let _ = tx.send(Delta::Log(format!("[WARN] Team build: {err}")));
                                let _ = tx.send(Delta::ShowError(
                                    "Could not assemble your team. Please try again!".to_string(),
                                ));
                            }
                        }
                    });
                }
                ProviderCommand::ShowRaw => {
                    send_view_result(&tx, orchestrator::show_raw(&store).map(ResultView::Raw));
                }
                ProviderCommand::ShowStats => {
                    send_view_result(&tx, orchestrator::show_stats(&store).map(ResultView::Stats));
                }
                ProviderCommand::ShowMoves => {
                    send_view_result(
                        &tx,
                        orchestrator::show_moves(&store, cfg.moves_shown).map(ResultView::Moves),
                    );
                }
                ProviderCommand::ShowTypes => {
                    send_view_result(&tx, orchestrator::show_types(&store).map(ResultView::Types));
                }
                ProviderCommand::ClearCurrent => {
                    store.clear();
                    let _ = tx.send(Delta::Log("[INFO] Current entity cleared".to_string()));
                    let _ = tx.send(Delta::ShowView(ResultView::Empty));
                }
            }
        }
    });
}

fn send_lookup_result(tx: &Sender<Delta>, result: Result<LookupOutcome, DexError>) {
    match result {
        Ok(LookupOutcome::Completed(card)) => {
            let _ = tx.send(Delta::ShowView(ResultView::Card(card)));
        }
        Ok(LookupOutcome::Superseded { identifier }) => {
            let _ = tx.send(Delta::Log(format!(
                "[INFO] Superseded lookup dropped: {identifier}"
            )));
        }
        Err(err) => send_failure(tx, err),
    }
}

fn send_view_result(tx: &Sender<Delta>, result: Result<ResultView, DexError>) {
    match result {
        Ok(view) => {
            let _ = tx.send(Delta::ShowView(view));
        }
        Err(err) => send_failure(tx, err),
    }
}

fn send_failure(tx: &Sender<Delta>, err: DexError) {
    let _ = tx.send(Delta::Log(format!("[WARN] {err}")));
    let _ = tx.send(Delta::ShowError(err.user_message()));
}

fn spawn_job(pool: &Option<rayon::ThreadPool>, job: impl FnOnce() + Send + 'static) {
    if let Some(pool) = pool.as_ref() {
        pool.spawn(job);
    } else {
        thread::spawn(job);
    }
}

fn build_fetch_pool() -> Option<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(fetch_parallelism())
        .build()
        .ok()
}

fn fetch_parallelism() -> usize {
    env::var("FETCH_PARALLELISM")
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(4)
        .clamp(2, 32)
}
