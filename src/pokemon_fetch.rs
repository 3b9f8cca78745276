use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};

use crate::error::DexError;
use crate::http_client::http_client;

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";

/// One Pokémon record in the API's own nested shape, consumed read-only.
///
/// `types`, `stats` and `moves` carry no serde defaults: a document missing
/// any of them fails deserialization and surfaces as a malformed entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    /// API-native tenth-of-a-metre units.
    pub height: u32,
    /// API-native tenth-of-a-kilogram units.
    pub weight: u32,
    pub types: Vec<TypeSlot>,
    pub stats: Vec<StatSlot>,
    pub moves: Vec<MoveSlot>,
    #[serde(default)]
    pub sprites: Sprites,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeSlot {
    #[serde(rename = "type")]
    pub type_info: NamedResource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatSlot {
    pub base_stat: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveSlot {
    #[serde(rename = "move")]
    pub move_info: NamedResource,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sprites {
    #[serde(default)]
    pub front_default: Option<String>,
}

/// Trims and lowercases an identifier. Numeric ids pass through in their
/// decimal form. Blank input is rejected before any network activity.
pub fn normalize_identifier(raw: &str) -> Result<String, DexError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DexError::InvalidInput);
    }
    Ok(trimmed.to_ascii_lowercase())
}

pub fn parse_pokemon_json(raw: &str) -> Result<Pokemon, DexError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(DexError::MalformedEntity(anyhow!("empty pokemon document")));
    }
    serde_json::from_str(trimmed)
        .context("invalid pokemon json")
        .map_err(DexError::MalformedEntity)
}

/// One GET against `{base}/pokemon/{identifier}`, exactly one attempt.
///
/// The identifier must already be normalized. Any non-success status maps to
/// `NotFound` for that identifier; retrying is the caller's decision (none of
/// the orchestrators do).
pub fn fetch_pokemon(base: &str, identifier: &str) -> Result<Pokemon, DexError> {
    let client = http_client().map_err(DexError::Transport)?;
    let url = format!("{}/pokemon/{identifier}", base.trim_end_matches('/'));

    let resp = client
        .get(&url)
        .send()
        .with_context(|| format!("request failed: {url}"))
        .map_err(DexError::Transport)?;

    if !resp.status().is_success() {
        return Err(DexError::NotFound {
            identifier: identifier.to_string(),
        });
    }

    let body = resp
        .text()
        .context("failed reading body")
        .map_err(DexError::Transport)?;
    parse_pokemon_json(&body)
}
