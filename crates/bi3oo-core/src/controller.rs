//! Screen state machine
//!
//! All navigation goes through [`AppState::update`], which mutates the state
//! and returns the side effect (if any) the caller has to run. Effects report
//! back through [`Action::ListingsLoaded`].

use crate::model::{Listing, User, ALL_CATEGORIES};
use std::collections::HashSet;

/// Below this many stored listings the feed is padded with generated ones.
pub const SPARSE_LOCAL_INVENTORY: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Results,
    Detail,
    PostAd,
    Login,
    Messages,
}

impl Screen {
    /// Screens only reachable by a logged-in user.
    pub fn requires_auth(&self) -> bool {
        matches!(self, Screen::PostAd | Screen::Messages)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchContext {
    pub query: String,
    pub category: String,
}

impl Default for SearchContext {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: ALL_CATEGORIES.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    /// Reload the feed for the current search context
    Refresh,
    Search { query: String, location: String },
    SelectCategory(String),
    OpenListing(Listing),
    PostAdClicked,
    ContactSeller,
    LoginClicked,
    LoginSucceeded(User),
    Logout,
    Back,
    GoHome,
    CancelPostAd,
    AdPosted(Listing),
    ListingsLoaded { ticket: u64, listings: Vec<Listing> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadListings {
        ticket: u64,
        query: String,
        category: String,
    },
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub listings: Vec<Listing>,
    pub selected: Option<Listing>,
    pub loading: bool,
    pub user: Option<User>,
    pub search: SearchContext,
    /// Guarded screen the user was heading to when sent to login
    pub after_login: Option<Screen>,
    load_ticket: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            screen: Screen::Home,
            listings: Vec::new(),
            selected: None,
            loading: false,
            user: None,
            search: SearchContext::default(),
            after_login: None,
            load_ticket: 0,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    /// Ticket of the most recently requested load.
    pub fn load_ticket(&self) -> u64 {
        self.load_ticket
    }

    pub fn update(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::Refresh => Some(self.request_load()),
            Action::Search { query, location } => {
                let query = format!("{} {}", query.trim(), location.trim())
                    .trim()
                    .to_string();
                self.search = SearchContext {
                    query,
                    category: ALL_CATEGORIES.to_string(),
                };
                self.screen = Screen::Results;
                Some(self.request_load())
            }
            Action::SelectCategory(category) => {
                self.search = SearchContext {
                    query: String::new(),
                    category,
                };
                self.screen = Screen::Results;
                Some(self.request_load())
            }
            Action::OpenListing(listing) => {
                self.selected = Some(listing);
                self.screen = Screen::Detail;
                None
            }
            Action::PostAdClicked => {
                self.navigate_guarded(Screen::PostAd);
                None
            }
            Action::ContactSeller => {
                if self.selected.is_some() {
                    self.navigate_guarded(Screen::Messages);
                }
                None
            }
            Action::LoginClicked => {
                if !self.is_logged_in() {
                    self.after_login = None;
                    self.open_login();
                }
                None
            }
            Action::LoginSucceeded(user) => {
                self.user = Some(user);
                self.screen = match self.after_login.take() {
                    Some(Screen::Messages) if self.selected.is_some() => Screen::Messages,
                    Some(Screen::PostAd) => Screen::PostAd,
                    _ if self.selected.is_some() => Screen::Detail,
                    _ => Screen::Home,
                };
                None
            }
            Action::Logout => {
                self.user = None;
                if self.screen.requires_auth() {
                    self.screen = Screen::Home;
                }
                None
            }
            Action::Back => {
                self.screen = match self.screen {
                    Screen::Detail => Screen::Results,
                    Screen::Messages if self.selected.is_some() => Screen::Detail,
                    _ => Screen::Home,
                };
                None
            }
            Action::GoHome => {
                self.screen = Screen::Home;
                self.search = SearchContext::default();
                Some(self.request_load())
            }
            Action::CancelPostAd => {
                self.screen = Screen::Home;
                None
            }
            Action::AdPosted(listing) => {
                self.listings.insert(0, listing.clone());
                self.selected = Some(listing);
                self.screen = Screen::Detail;
                None
            }
            Action::ListingsLoaded { ticket, listings } => {
                // A newer search superseded this load
                if ticket == self.load_ticket {
                    self.listings = listings;
                    self.loading = false;
                }
                None
            }
        }
    }

    fn navigate_guarded(&mut self, target: Screen) {
        if self.is_logged_in() {
            self.screen = target;
        } else {
            self.after_login = Some(target);
            self.open_login();
        }
    }

    fn open_login(&mut self) {
        self.screen = Screen::Login;
    }

    fn request_load(&mut self) -> Effect {
        self.load_ticket += 1;
        self.loading = true;
        Effect::LoadListings {
            ticket: self.load_ticket,
            query: self.search.query.clone(),
            category: self.search.category.clone(),
        }
    }
}

/// Generated listings are wanted for explicit searches and while the local
/// inventory is too small to fill the feed.
pub fn wants_generated(query: &str, local_total: usize) -> bool {
    !query.trim().is_empty() || local_total < SPARSE_LOCAL_INVENTORY
}

/// Stored listings matching the search, followed by generated ones.
/// Generated listings whose id collides with a stored one are dropped.
pub fn merge_listings(
    local: &[Listing],
    generated: Vec<Listing>,
    query: &str,
    category: &str,
) -> Vec<Listing> {
    let mut merged: Vec<Listing> = local
        .iter()
        .filter(|l| l.matches(query, category))
        .cloned()
        .collect();

    let local_ids: HashSet<&str> = local.iter().map(|l| l.id.as_str()).collect();
    let mut seen: HashSet<String> = HashSet::new();
    merged.extend(
        generated
            .into_iter()
            .filter(|l| !local_ids.contains(l.id.as_str()) && seen.insert(l.id.clone())),
    );
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(id: &str, title: &str, category: &str) -> Listing {
        Listing {
            id: id.to_string(),
            title: title.to_string(),
            price: 100.0,
            location: "Bordeaux".to_string(),
            date: "Hier".to_string(),
            image_url: String::new(),
            category: category.to_string(),
            description: String::new(),
            seller_name: "Jo".to_string(),
            is_pro: false,
        }
    }

    fn user() -> User {
        User {
            email: "jo@exemple.com".to_string(),
            password_hash: "cHc=".to_string(),
            name: "Jo".to_string(),
        }
    }

    #[test]
    fn test_search_goes_to_results_and_loads() {
        let mut state = AppState::new();
        let effect = state.update(Action::Search {
            query: "velo".to_string(),
            location: "Lyon".to_string(),
        });

        assert_eq!(state.screen, Screen::Results);
        assert!(state.loading);
        assert_eq!(
            effect,
            Some(Effect::LoadListings {
                ticket: 1,
                query: "velo Lyon".to_string(),
                category: "all".to_string(),
            })
        );
    }

    #[test]
    fn test_search_without_location_is_trimmed() {
        let mut state = AppState::new();
        state.update(Action::Search {
            query: "velo".to_string(),
            location: String::new(),
        });
        assert_eq!(state.search.query, "velo");
    }

    #[test]
    fn test_category_clears_query() {
        let mut state = AppState::new();
        state.search.query = "velo".to_string();
        state.update(Action::SelectCategory("vehicules".to_string()));
        assert_eq!(state.search.query, "");
        assert_eq!(state.search.category, "vehicules");
        assert_eq!(state.screen, Screen::Results);
    }

    #[test]
    fn test_guards_redirect_to_login() {
        let mut state = AppState::new();
        state.update(Action::PostAdClicked);
        assert_eq!(state.screen, Screen::Login);

        let mut state = AppState::new();
        state.update(Action::OpenListing(listing("a", "Table", "maison")));
        state.update(Action::ContactSeller);
        assert_eq!(state.screen, Screen::Login);
    }

    #[test]
    fn test_login_resumes_guarded_screen() {
        let mut state = AppState::new();
        state.update(Action::OpenListing(listing("a", "Table", "maison")));
        state.update(Action::ContactSeller);
        state.update(Action::LoginSucceeded(user()));
        assert_eq!(state.screen, Screen::Messages);

        let mut state = AppState::new();
        state.update(Action::PostAdClicked);
        state.update(Action::LoginSucceeded(user()));
        assert_eq!(state.screen, Screen::PostAd);
    }

    #[test]
    fn test_plain_login_returns_home_or_detail() {
        let mut state = AppState::new();
        state.update(Action::LoginClicked);
        state.update(Action::LoginSucceeded(user()));
        assert_eq!(state.screen, Screen::Home);
        assert!(state.is_logged_in());

        let mut state = AppState::new();
        state.update(Action::OpenListing(listing("a", "Table", "maison")));
        state.update(Action::LoginClicked);
        state.update(Action::LoginSucceeded(user()));
        assert_eq!(state.screen, Screen::Detail);
    }

    #[test]
    fn test_login_from_home_returns_to_selected_listing() {
        let mut state = AppState::new();
        state.update(Action::OpenListing(listing("a", "Table", "maison")));
        state.update(Action::GoHome);
        state.update(Action::LoginClicked);
        state.update(Action::LoginSucceeded(user()));
        assert_eq!(state.screen, Screen::Detail);
        assert_eq!(state.selected.as_ref().map(|l| l.id.as_str()), Some("a"));
    }

    #[test]
    fn test_logged_in_user_passes_guards() {
        let mut state = AppState::new();
        state.user = Some(user());
        state.update(Action::PostAdClicked);
        assert_eq!(state.screen, Screen::PostAd);

        state.update(Action::OpenListing(listing("a", "Table", "maison")));
        state.update(Action::ContactSeller);
        assert_eq!(state.screen, Screen::Messages);
    }

    #[test]
    fn test_back_targets() {
        let mut state = AppState::new();
        state.user = Some(user());
        state.update(Action::OpenListing(listing("a", "Table", "maison")));
        state.update(Action::ContactSeller);

        state.update(Action::Back);
        assert_eq!(state.screen, Screen::Detail);
        state.update(Action::Back);
        assert_eq!(state.screen, Screen::Results);
        state.update(Action::Back);
        assert_eq!(state.screen, Screen::Home);
    }

    #[test]
    fn test_logout_leaves_guarded_screen() {
        let mut state = AppState::new();
        state.user = Some(user());
        state.update(Action::PostAdClicked);
        state.update(Action::Logout);
        assert_eq!(state.screen, Screen::Home);
        assert!(!state.is_logged_in());
    }

    #[test]
    fn test_stale_load_is_ignored() {
        let mut state = AppState::new();
        state.update(Action::Search {
            query: "velo".to_string(),
            location: String::new(),
        });
        state.update(Action::SelectCategory("maison".to_string()));
        assert_eq!(state.load_ticket(), 2);

        state.update(Action::ListingsLoaded {
            ticket: 1,
            listings: vec![listing("old", "Vélo", "loisirs")],
        });
        assert!(state.listings.is_empty());
        assert!(state.loading);

        state.update(Action::ListingsLoaded {
            ticket: 2,
            listings: vec![listing("new", "Table", "maison")],
        });
        assert_eq!(state.listings[0].id, "new");
        assert!(!state.loading);
    }

    #[test]
    fn test_ad_posted_is_prepended_and_selected() {
        let mut state = AppState::new();
        state.listings = vec![listing("ai-1", "Table", "maison")];
        state.update(Action::AdPosted(listing("local-1", "Vélo", "loisirs")));
        assert_eq!(state.listings[0].id, "local-1");
        assert_eq!(state.selected.as_ref().unwrap().id, "local-1");
        assert_eq!(state.screen, Screen::Detail);
    }

    #[test]
    fn test_go_home_resets_search() {
        let mut state = AppState::new();
        state.update(Action::SelectCategory("mode".to_string()));
        let effect = state.update(Action::GoHome);
        assert_eq!(state.search, SearchContext::default());
        assert!(matches!(effect, Some(Effect::LoadListings { ticket: 2, .. })));
    }

    #[test]
    fn test_wants_generated() {
        assert!(wants_generated("velo", 10));
        assert!(wants_generated("", 3));
        assert!(!wants_generated("", 4));
    }

    #[test]
    fn test_merge_filters_local_and_keeps_order() {
        let local = vec![
            listing("local-2", "Vélo électrique", "loisirs"),
            listing("local-1", "Renault Clio", "vehicules"),
        ];
        let generated = vec![listing("ai-1", "Peugeot 208", "vehicules")];

        let merged = merge_listings(&local, generated, "", "vehicules");
        let ids: Vec<&str> = merged.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["local-1", "ai-1"]);
    }

    #[test]
    fn test_merge_query_filter_only_applies_to_local() {
        let local = vec![
            listing("local-1", "VELO vintage", "loisirs"),
            listing("local-2", "Canapé", "maison"),
        ];
        let merged = merge_listings(&local, Vec::new(), "velo", ALL_CATEGORIES);
        assert_eq!(merged.len(), 1);
        assert!(merged
            .iter()
            .all(|l| l.title.to_lowercase().contains("velo")));
    }

    #[test]
    fn test_merge_drops_colliding_generated_ids() {
        let local = vec![listing("dup", "Table", "maison")];
        let generated = vec![
            listing("dup", "Autre table", "maison"),
            listing("ai-1", "Chaise", "maison"),
            listing("ai-1", "Chaise bis", "maison"),
        ];
        let merged = merge_listings(&local, generated, "", ALL_CATEGORIES);
        let ids: Vec<&str> = merged.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["dup", "ai-1"]);
    }
}
