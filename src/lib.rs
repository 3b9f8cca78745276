//! Terminal Pokédex: a fetch-transform-render client for the public Pokémon
//! REST API. A background provider thread owns the network side; the binary
//! in `main.rs` is a ratatui host that renders the view models it sends back.

pub mod dex_config;
pub mod error;
pub mod http_client;
pub mod orchestrator;
pub mod pokemon_fetch;
pub mod provider;
pub mod state;
pub mod store;
pub mod views;
