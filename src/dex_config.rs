use std::env;

use crate::pokemon_fetch::DEFAULT_API_BASE;

/// Snapshot of the remote dataset's size at design time. It drifts as the
/// dataset grows, so it is an env-overridable default rather than a constant
/// the rest of the code reaches for.
pub const DEFAULT_MAX_POKEMON_ID: u32 = 1010;
pub const DEFAULT_TEAM_SIZE: usize = 3;
pub const DEFAULT_MOVES_SHOWN: usize = 10;

#[derive(Debug, Clone)]
pub struct DexConfig {
    pub api_base: String,
    /// Upper bound (inclusive) for random identifier draws.
    pub max_pokemon_id: u32,
    pub team_size: usize,
    pub moves_shown: usize,
}

impl Default for DexConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            max_pokemon_id: DEFAULT_MAX_POKEMON_ID,
            team_size: DEFAULT_TEAM_SIZE,
            moves_shown: DEFAULT_MOVES_SHOWN,
        }
    }
}

impl DexConfig {
    pub fn from_env() -> Self {
        Self {
            api_base: opt_env("POKEAPI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            max_pokemon_id: parse_env_or("POKEDEX_MAX_ID", DEFAULT_MAX_POKEMON_ID)
                .clamp(1, 100_000),
            team_size: parse_env_or("POKEDEX_TEAM_SIZE", DEFAULT_TEAM_SIZE).clamp(1, 6),
            moves_shown: parse_env_or("POKEDEX_MOVES_SHOWN", DEFAULT_MOVES_SHOWN).clamp(1, 50),
        }
    }
}

fn opt_env(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|val| {
        let trimmed = val.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn parse_env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|val| val.trim().parse::<T>().ok())
        .unwrap_or(default)
}
