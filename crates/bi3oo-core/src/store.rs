use crate::error::{ConflictKey, MarketError, Result};
use crate::kv::KvStore;
use crate::model::{Listing, User};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

pub const USERS_SLOT: &str = "lbc_sql_users";
pub const LISTINGS_SLOT: &str = "lbc_sql_listings";

/// In-memory users/listings tables mirrored to two key-value slots.
///
/// Rows are kept in insertion order; an insert re-serializes only the table
/// it touched.
pub struct LocalStore {
    kv: Arc<dyn KvStore>,
    users: Vec<User>,
    listings: Vec<Listing>,
}

impl LocalStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self {
            kv,
            users: Vec::new(),
            listings: Vec::new(),
        }
    }

    /// Build a store and load whatever snapshot the backend holds.
    pub fn open(kv: Arc<dyn KvStore>) -> Self {
        let mut store = Self::new(kv);
        store.init();
        store
    }

    /// Load both slots. A missing slot is an empty table; an unreadable or
    /// malformed one is logged and treated as empty.
    pub fn init(&mut self) {
        self.users = self.load_slot(USERS_SLOT);
        self.listings = self.load_slot(LISTINGS_SLOT);
        debug!(
            users = self.users.len(),
            listings = self.listings.len(),
            "local store loaded"
        );
    }

    fn load_slot<T: DeserializeOwned>(&self, slot: &str) -> Vec<T> {
        let raw = match self.kv.get(slot) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(slot, error = %e, "could not read stored snapshot, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(rows) => rows,
            Err(e) => {
                let err = MarketError::StorageCorrupt {
                    slot: slot.to_string(),
                    reason: e.to_string(),
                };
                warn!(error = %err, "ignoring stored snapshot");
                Vec::new()
            }
        }
    }

    pub fn insert_listing(&mut self, listing: Listing) -> Result<()> {
        if self.query_listing(&listing.id).is_some() {
            return Err(MarketError::Conflict(ConflictKey::ListingId(listing.id)));
        }
        self.listings.push(listing);
        if let Err(e) = write_slot(self.kv.as_ref(), LISTINGS_SLOT, &self.listings) {
            self.listings.pop();
            return Err(e);
        }
        Ok(())
    }

    pub fn insert_user(&mut self, user: User) -> Result<()> {
        if self.query_user(&user.email).is_some() {
            return Err(MarketError::Conflict(ConflictKey::Email(user.email)));
        }
        self.users.push(user);
        if let Err(e) = write_slot(self.kv.as_ref(), USERS_SLOT, &self.users) {
            self.users.pop();
            return Err(e);
        }
        Ok(())
    }

    /// All stored listings, newest first.
    pub fn query_all_listings(&self) -> Vec<Listing> {
        self.listings.iter().rev().cloned().collect()
    }

    /// All registered users, newest first.
    pub fn all_users(&self) -> Vec<User> {
        self.users.iter().rev().cloned().collect()
    }

    pub fn query_listing(&self, id: &str) -> Option<Listing> {
        self.listings.iter().find(|l| l.id == id).cloned()
    }

    pub fn query_user(&self, email: &str) -> Option<User> {
        self.users.iter().find(|u| u.email == email).cloned()
    }

    pub fn listing_count(&self) -> usize {
        self.listings.len()
    }

    pub fn contains_listing(&self, id: &str) -> bool {
        self.listings.iter().any(|l| l.id == id)
    }
}

fn write_slot<T: Serialize>(kv: &dyn KvStore, slot: &str, rows: &[T]) -> Result<()> {
    let json = serde_json::to_string(rows)?;
    kv.set(slot, &json)
}
