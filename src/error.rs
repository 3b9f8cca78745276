use std::error::Error as StdError;
use std::fmt;

/// Failure taxonomy for the fetch-transform-render pipeline.
///
/// Every variant converts to exactly one user-facing string via
/// [`DexError::user_message`]; nothing past the provider boundary ever sees
/// the raw error.
#[derive(Debug)]
pub enum DexError {
    /// Empty or blank identifier, rejected before any network activity.
    InvalidInput,
    /// The remote answered a non-success status for this identifier.
    NotFound { identifier: String },
    /// Network-level failure: no usable response at all.
    Transport(anyhow::Error),
    /// A response or stored entity does not match the expected shape.
    MalformedEntity(anyhow::Error),
    /// A view-only operation ran before any successful fetch.
    NoCurrentEntity,
}

impl DexError {
    pub fn user_message(&self) -> String {
        match self {
            DexError::InvalidInput => "Please enter a Pokemon name or ID!".to_string(),
            DexError::NotFound { identifier } => format!(
                "Could not find Pokemon \"{identifier}\". Check the spelling or try a different name!"
            ),
            DexError::Transport(_) => {
                "Could not reach the Pokemon API. Please try again!".to_string()
            }
            DexError::MalformedEntity(_) => "Could not parse the Pokemon data.".to_string(),
            DexError::NoCurrentEntity => {
                "No Pokemon data available. Search for a Pokemon first!".to_string()
            }
        }
    }
}

impl fmt::Display for DexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DexError::InvalidInput => write!(f, "empty identifier"),
            DexError::NotFound { identifier } => write!(f, "pokemon not found: {identifier}"),
            DexError::Transport(err) => write!(f, "transport failure: {err:#}"),
            DexError::MalformedEntity(err) => write!(f, "malformed entity: {err:#}"),
            DexError::NoCurrentEntity => write!(f, "no entity fetched yet"),
        }
    }
}

impl StdError for DexError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            DexError::Transport(err) | DexError::MalformedEntity(err) => {
                let cause: &(dyn StdError + 'static) = &**err;
                Some(cause)
            }
            _ => None,
        }
    }
}
