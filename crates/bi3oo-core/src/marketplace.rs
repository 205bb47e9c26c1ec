use crate::auth;
use crate::chat::ChatSession;
use crate::content::ContentService;
use crate::controller::{merge_listings, wants_generated, Action, AppState, Effect};
use crate::error::{MarketError, Result};
use crate::model::{Listing, ListingDraft, User, LOCAL_ID_PREFIX};
use crate::store::LocalStore;
use chrono::Utc;
use tracing::{debug, info};

pub const DEFAULT_TITLE: &str = "Sans titre";
pub const DEFAULT_LOCATION: &str = "France";
pub const DEFAULT_CATEGORY: &str = "autres";
pub const DEFAULT_SELLER: &str = "Anonyme";
pub const JUST_NOW: &str = "À l'instant";
pub const PLACEHOLDER_IMAGE: &str = "https://picsum.photos/600/400?grayscale";

/// Owns the store, the content service and the screen state, and runs the
/// effects the state machine asks for, one at a time.
pub struct Marketplace {
    store: LocalStore,
    content: ContentService,
    state: AppState,
}

impl Marketplace {
    pub fn new(store: LocalStore, content: ContentService) -> Self {
        Self {
            store,
            content,
            state: AppState::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn content(&self) -> &ContentService {
        &self.content
    }

    /// Populate the home feed.
    pub async fn start(&mut self) {
        self.dispatch(Action::Refresh).await;
    }

    /// Apply an action and run whatever effect it produces.
    pub async fn dispatch(&mut self, action: Action) {
        if let Some(effect) = self.apply(action) {
            self.run_effect(effect).await;
        }
    }

    /// Apply an action without running its effect, so a front-end can
    /// render the intermediate (loading) state first.
    pub fn apply(&mut self, action: Action) -> Option<Effect> {
        self.state.update(action)
    }

    pub async fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::LoadListings {
                ticket,
                query,
                category,
            } => {
                let listings = self.load_listings(&query, &category).await;
                self.state.update(Action::ListingsLoaded { ticket, listings });
            }
        }
    }

    /// Stored listings matching the search followed by generated ones.
    pub async fn load_listings(&self, query: &str, category: &str) -> Vec<Listing> {
        let local = self.store.query_all_listings();
        let generated = if wants_generated(query, local.len()) {
            self.content.fetch_listings(query, category).await
        } else {
            Vec::new()
        };
        debug!(
            local = local.len(),
            generated = generated.len(),
            query,
            category,
            "listings loaded"
        );
        merge_listings(&local, generated, query, category)
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<User> {
        let user = auth::login(&self.store, email, password)?;
        self.state.update(Action::LoginSucceeded(user.clone()));
        Ok(user)
    }

    pub fn register(&mut self, email: &str, password: &str, name: &str) -> Result<User> {
        let user = auth::register(&mut self.store, email, password, name)?;
        self.state.update(Action::LoginSucceeded(user.clone()));
        Ok(user)
    }

    pub fn logout(&mut self) {
        if let Some(user) = &self.state.user {
            info!(email = %user.email, "user logged out");
        }
        self.state.update(Action::Logout);
    }

    /// Validate the draft, persist it as a local listing and show it.
    pub fn post_ad(&mut self, draft: &ListingDraft) -> Result<Listing> {
        if let Some(step) = draft.first_invalid_step() {
            return Err(MarketError::Validation(format!(
                "étape {} incomplète",
                step
            )));
        }

        let id = next_local_id(&self.store, Utc::now().timestamp_millis());
        let listing = build_listing(draft, id, self.state.user.as_ref());
        self.store.insert_listing(listing.clone())?;
        info!(id = %listing.id, title = %listing.title, "listing posted");

        self.state.update(Action::AdPosted(listing.clone()));
        Ok(listing)
    }

    /// Conversation about the selected listing, seeded with the opening
    /// question and the seller's answer.
    pub async fn open_chat(&self) -> Option<ChatSession> {
        let listing = self.state.selected.clone()?;
        Some(ChatSession::open(listing, &self.content).await)
    }
}

/// `local-{millis}`, bumped until no stored listing uses it.
pub fn next_local_id(store: &LocalStore, now_millis: i64) -> String {
    let mut stamp = now_millis;
    loop {
        let id = format!("{}{}", LOCAL_ID_PREFIX, stamp);
        if !store.contains_listing(&id) {
            return id;
        }
        stamp += 1;
    }
}

/// Listing for a submitted draft; empty fields take their defaults.
pub fn build_listing(draft: &ListingDraft, id: String, user: Option<&User>) -> Listing {
    fn or_default(value: &str, default: &str) -> String {
        match value.trim() {
            "" => default.to_string(),
            v => v.to_string(),
        }
    }

    let seller_name = match user {
        Some(user) => user.name.clone(),
        None => or_default(&draft.seller_name, DEFAULT_SELLER),
    };

    Listing {
        id,
        title: or_default(&draft.title, DEFAULT_TITLE),
        price: draft.parsed_price().unwrap_or(0.0),
        location: or_default(&draft.location, DEFAULT_LOCATION),
        date: JUST_NOW.to_string(),
        image_url: draft
            .image_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
        category: or_default(&draft.category, DEFAULT_CATEGORY),
        description: draft.description.trim().to_string(),
        seller_name,
        is_pro: false,
    }
}
