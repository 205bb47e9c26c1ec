pub mod ai;
pub mod auth;
pub mod chat;
pub mod config;
pub mod content;
pub mod controller;
pub mod error;
pub mod kv;
pub mod marketplace;
pub mod model;
pub mod provider;
pub mod store;

// Re-export main types for convenience
pub use ai::{GeminiClient, OllamaClient};
pub use chat::ChatSession;
pub use config::{Config, StorageBackend};
pub use content::ContentService;
pub use controller::{Action, AppState, Effect, Screen, SearchContext};
pub use error::{ConflictKey, MarketError};
pub use kv::{FileKv, KvStore, MemoryKv, SqliteKv};
pub use marketplace::Marketplace;
pub use model::{ChatMessage, Listing, ListingDraft, Sender, User, CATEGORIES};
pub use provider::{ContentProvider, Provider};
pub use store::LocalStore;
