use anyhow::{Context, anyhow};

use crate::error::DexError;
use crate::pokemon_fetch::Pokemon;

/// One displayable stat: API order preserved, label upper-cased with the
/// separators spaced out (`special-attack` -> `SPECIAL ATTACK`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatLine {
    pub label: String,
    pub value: u32,
}

/// The full card a successful lookup renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PokemonCard {
    pub id: u32,
    pub name: String,
    pub sprite_url: Option<String>,
    /// Already formatted, e.g. `0.4 m`.
    pub height: String,
    /// Already formatted, e.g. `6 kg`.
    pub weight: String,
    pub types: Vec<String>,
    pub stats: Vec<StatLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsPanel {
    pub name: String,
    pub lines: Vec<StatLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovesPanel {
    pub name: String,
    pub shown: Vec<String>,
    pub total: usize,
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypesPanel {
    pub name: String,
    pub types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPanel {
    pub name: String,
    pub pretty: String,
}

/// Side-by-side comparison; each side keeps its own display fields, nothing
/// is merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonView {
    pub left: PokemonCard,
    pub right: PokemonCard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamMemberRow {
    pub id: u32,
    pub name: String,
    pub primary_type: String,
    pub sprite_url: Option<String>,
}

pub fn stats_view(entity: &Pokemon) -> Result<Vec<StatLine>, DexError> {
    if entity.stats.is_empty() {
        return Err(malformed("entity has no stats"));
    }
    Ok(entity
        .stats
        .iter()
        .map(|slot| StatLine {
            label: display_label(&slot.stat.name),
            value: slot.base_stat,
        })
        .collect())
}

/// First `limit` move names, separators spaced out. Fewer than `limit` moves
/// (including none) is not an error.
pub fn moves_view(entity: &Pokemon, limit: usize) -> Vec<String> {
    entity
        .moves
        .iter()
        .take(limit)
        .map(|slot| display_words(&slot.move_info.name))
        .collect()
}

/// Type names verbatim, order preserved (first entry is the primary type).
pub fn types_view(entity: &Pokemon) -> Result<Vec<String>, DexError> {
    if entity.types.is_empty() {
        return Err(malformed("entity has no types"));
    }
    Ok(entity
        .types
        .iter()
        .map(|slot| slot.type_info.name.clone())
        .collect())
}

pub fn card_view(entity: &Pokemon) -> Result<PokemonCard, DexError> {
    Ok(PokemonCard {
        id: entity.id,
        name: entity.name.clone(),
        sprite_url: entity.sprites.front_default.clone(),
        height: format_metres(entity.height),
        weight: format_kilograms(entity.weight),
        types: types_view(entity)?,
        stats: stats_view(entity)?,
    })
}

pub fn comparison_view(left: &Pokemon, right: &Pokemon) -> Result<ComparisonView, DexError> {
    Ok(ComparisonView {
        left: card_view(left)?,
        right: card_view(right)?,
    })
}

pub fn team_member_row(entity: &Pokemon) -> Result<TeamMemberRow, DexError> {
    let primary_type = entity
        .types
        .first()
        .map(|slot| slot.type_info.name.clone())
        .ok_or_else(|| malformed("entity has no types"))?;
    Ok(TeamMemberRow {
        id: entity.id,
        name: entity.name.clone(),
        primary_type,
        sprite_url: entity.sprites.front_default.clone(),
    })
}

pub fn stats_panel(entity: &Pokemon) -> Result<StatsPanel, DexError> {
    Ok(StatsPanel {
        name: entity.name.clone(),
        lines: stats_view(entity)?,
    })
}

pub fn moves_panel(entity: &Pokemon, limit: usize) -> MovesPanel {
    MovesPanel {
        name: entity.name.clone(),
        shown: moves_view(entity, limit),
        total: entity.moves.len(),
        limit,
    }
}

pub fn types_panel(entity: &Pokemon) -> Result<TypesPanel, DexError> {
    Ok(TypesPanel {
        name: entity.name.clone(),
        types: types_view(entity)?,
    })
}

pub fn raw_panel(entity: &Pokemon) -> Result<RawPanel, DexError> {
    let pretty = serde_json::to_string_pretty(entity)
        .context("serialize entity")
        .map_err(DexError::MalformedEntity)?;
    Ok(RawPanel {
        name: entity.name.clone(),
        pretty,
    })
}

pub fn display_label(stat_name: &str) -> String {
    stat_name.replace('-', " ").to_uppercase()
}

pub fn display_words(move_name: &str) -> String {
    move_name.replace('-', " ")
}

pub fn format_metres(height: u32) -> String {
    format!("{} m", tenth_units(height))
}

pub fn format_kilograms(weight: u32) -> String {
    format!("{} kg", tenth_units(weight))
}

// Integer split keeps tenth-unit values exact: 4 -> "0.4", 60 -> "6".
fn tenth_units(raw: u32) -> String {
    if raw % 10 == 0 {
        format!("{}", raw / 10)
    } else {
        format!("{}.{}", raw / 10, raw % 10)
    }
}

fn malformed(msg: &'static str) -> DexError {
    DexError::MalformedEntity(anyhow!(msg))
}
