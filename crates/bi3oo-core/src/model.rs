//! UI-agnostic marketplace records
//!
//! These types are shared by the store, the content service and any front-end.
//! Field names serialize in camelCase so persisted slots and model output use
//! the same shape.

use serde::{Deserialize, Serialize};

/// Prefix marking listings that were posted locally (and persisted).
pub const LOCAL_ID_PREFIX: &str = "local-";

/// Pseudo-category matching every listing.
pub const ALL_CATEGORIES: &str = "all";

/// Categories offered by the post-ad form and the category bar: (id, label).
pub const CATEGORIES: &[(&str, &str)] = &[
    ("maison", "Maison"),
    ("mode", "Mode"),
    ("vehicules", "Véhicules"),
    ("immobilier", "Immobilier"),
    ("multimedia", "Multimédia"),
    ("loisirs", "Loisirs"),
    ("autres", "Autres"),
];

pub fn category_label(id: &str) -> &str {
    CATEGORIES
        .iter()
        .find(|(cat, _)| *cat == id)
        .map(|(_, label)| *label)
        .unwrap_or(id)
}

/// A classified ad, either posted locally or synthesized by the content API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub location: String,
    /// Display string ("Aujourd'hui, 14:30", "À l'instant", ...)
    pub date: String,
    pub image_url: String,
    pub category: String,
    pub description: String,
    pub seller_name: String,
    pub is_pro: bool,
}

impl Listing {
    pub fn is_local(&self) -> bool {
        self.id.starts_with(LOCAL_ID_PREFIX)
    }

    /// Price formatted for display, without decimals when it is a whole number.
    pub fn display_price(&self) -> String {
        if self.price.fract() == 0.0 {
            format!("{:.0} €", self.price)
        } else {
            format!("{:.2} €", self.price)
        }
    }

    /// Case-insensitive title match combined with category equality.
    /// An empty query and the `all` category match everything.
    pub fn matches(&self, query: &str, category: &str) -> bool {
        let matches_category = category == ALL_CATEGORIES || self.category == category;
        let query = query.trim();
        let matches_query =
            query.is_empty() || self.title.to_lowercase().contains(&query.to_lowercase());
        matches_category && matches_query
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: String,
    /// Reversible placeholder encoding, see [`crate::auth::encode_password`].
    pub password_hash: String,
    pub name: String,
}

/// Who wrote a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Me,
    Them,
}

/// One turn of a buyer/seller conversation. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub sender: Sender,
    pub text: String,
    pub timestamp: String,
}

/// Post-ad form contents, filled in three steps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingDraft {
    pub title: String,
    pub category: String,
    pub description: String,
    /// Raw text as typed; parsed on validation.
    pub price: String,
    pub location: String,
    pub seller_name: String,
    pub image_url: Option<String>,
}

impl ListingDraft {
    pub const STEPS: u8 = 3;

    /// Whether the fields belonging to `step` (1-based) are acceptable.
    pub fn validate_step(&self, step: u8) -> bool {
        match step {
            1 => self.title.trim().chars().count() >= 3 && !self.category.is_empty(),
            2 => self.description.trim().chars().count() >= 10,
            3 => {
                self.parsed_price().is_some()
                    && !self.location.trim().is_empty()
                    && !self.seller_name.trim().is_empty()
            }
            _ => false,
        }
    }

    /// First step that fails validation, if any.
    pub fn first_invalid_step(&self) -> Option<u8> {
        (1..=Self::STEPS).find(|step| !self.validate_step(*step))
    }

    pub fn parsed_price(&self) -> Option<f64> {
        let price: f64 = self.price.trim().replace(',', ".").parse().ok()?;
        (price.is_finite() && price >= 0.0).then_some(price)
    }
}
