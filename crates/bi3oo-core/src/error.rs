use std::fmt;
use thiserror::Error;

/// Errors surfaced by the marketplace core.
///
/// Content-fetch failures never reach callers of the fetch service (they are
/// absorbed into fallback data); the variant exists so providers and logs can
/// name them.
#[derive(Debug, Error)]
pub enum MarketError {
    #[error("No matching user")]
    NotFound,

    #[error("Already exists: {0}")]
    Conflict(ConflictKey),

    #[error("Credentials do not match")]
    BadCredential,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Content fetch failed: {0}")]
    FetchFailure(String),

    #[error("Stored snapshot for '{slot}' is corrupt: {reason}")]
    StorageCorrupt { slot: String, reason: String },

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Unique key that an insert collided with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictKey {
    Email(String),
    ListingId(String),
}

impl fmt::Display for ConflictKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictKey::Email(email) => write!(f, "email {}", email),
            ConflictKey::ListingId(id) => write!(f, "listing {}", id),
        }
    }
}

impl MarketError {
    /// Message suitable for showing to the end user (French UI).
    pub fn user_message(&self) -> String {
        match self {
            MarketError::NotFound => "Utilisateur non trouvé".to_string(),
            MarketError::Conflict(ConflictKey::Email(_)) => "Cet email est déjà utilisé".to_string(),
            MarketError::Conflict(ConflictKey::ListingId(id)) => {
                format!("Une annonce {} existe déjà", id)
            }
            MarketError::BadCredential => "Mot de passe incorrect".to_string(),
            MarketError::Validation(msg) => msg.clone(),
            MarketError::FetchFailure(_) => "Service indisponible, réessayez plus tard".to_string(),
            MarketError::StorageCorrupt { .. } | MarketError::Storage(_) => {
                "Impossible d'enregistrer les données".to_string()
            }
        }
    }
}

impl From<std::io::Error> for MarketError {
    fn from(err: std::io::Error) -> Self {
        MarketError::Storage(err.to_string())
    }
}

impl From<rusqlite::Error> for MarketError {
    fn from(err: rusqlite::Error) -> Self {
        MarketError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for MarketError {
    fn from(err: serde_json::Error) -> Self {
        MarketError::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MarketError>;
