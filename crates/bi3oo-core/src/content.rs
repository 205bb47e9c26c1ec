//! AI-generated listings and seller replies, with static fallbacks.
//!
//! Nothing in here returns an error to the caller: a failed or unusable
//! generation is logged and replaced by fixed content.

use crate::error::MarketError;
use crate::model::{Listing, ALL_CATEGORIES};
use crate::provider::ContentProvider;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

/// Number of listings requested per generation.
pub const LISTINGS_PER_FETCH: usize = 8;

pub const REPLY_WHEN_EMPTY: &str = "Bonjour, oui c'est toujours disponible !";
pub const REPLY_ON_FAILURE: &str = "Bonjour, je suis disponible pour en discuter.";

/// Stable placeholder image seeded by the listing id.
pub fn image_url_for(id: &str) -> String {
    format!("https://picsum.photos/seed/{}/600/400", id)
}

/// Output schema for generated listings: an array of objects with nine
/// required fields (the image URL is derived locally).
pub fn listing_schema() -> Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "id": { "type": "string" },
                "title": { "type": "string" },
                "price": { "type": "number" },
                "location": { "type": "string" },
                "date": { "type": "string" },
                "category": { "type": "string" },
                "description": { "type": "string" },
                "sellerName": { "type": "string" },
                "isPro": { "type": "boolean" }
            },
            "required": [
                "id", "title", "price", "location", "date",
                "category", "description", "sellerName", "isPro"
            ]
        }
    })
}

/// Listing as produced by the model, before the image URL is attached.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedListing {
    id: String,
    title: String,
    price: f64,
    location: String,
    date: String,
    category: String,
    description: String,
    seller_name: String,
    is_pro: bool,
}

impl GeneratedListing {
    fn is_valid(&self) -> bool {
        !self.id.trim().is_empty() && self.price.is_finite() && self.price >= 0.0
    }

    fn into_listing(self) -> Listing {
        Listing {
            image_url: image_url_for(&self.id),
            id: self.id,
            title: self.title,
            price: self.price,
            location: self.location,
            date: self.date,
            category: self.category,
            description: self.description,
            seller_name: self.seller_name,
            is_pro: self.is_pro,
        }
    }
}

/// Hand-written listings shown whenever generation fails.
pub fn fallback_listings() -> Vec<Listing> {
    vec![
        Listing {
            id: "err-1".to_string(),
            title: "Canapé Vintage".to_string(),
            price: 150.0,
            location: "Paris 75011".to_string(),
            date: "Aujourd'hui, 10:00".to_string(),
            image_url: "https://picsum.photos/seed/err1/600/400".to_string(),
            category: "Maison".to_string(),
            description: "Très beau canapé vintage en velours vert. À venir chercher sur place."
                .to_string(),
            seller_name: "Marie L.".to_string(),
            is_pro: false,
        },
        Listing {
            id: "err-2".to_string(),
            title: "iPhone 13 - Parfait état".to_string(),
            price: 550.0,
            location: "Lyon 69002".to_string(),
            date: "Hier, 18:30".to_string(),
            image_url: "https://picsum.photos/seed/err2/600/400".to_string(),
            category: "Électronique".to_string(),
            description: "iPhone 13 128Go, batterie neuve. Vendu avec coque.".to_string(),
            seller_name: "Thomas B.".to_string(),
            is_pro: false,
        },
    ]
}

fn listings_prompt(query: &str, category: &str) -> String {
    let query = match query.trim() {
        "" => "items récents",
        q => q,
    };
    let category = match category {
        "" => ALL_CATEGORIES,
        c => c,
    };

    format!(
        r#"Generate {count} realistic classified ad listings for a French marketplace site like Bi3oo.

Context:
- Search Query: "{query}"
- Category: "{category}"

Requirements:
- Language: French
- Currency: Euro (€)
- Locations: Real French cities (Paris, Lyon, Marseille, Bordeaux, Lille, Nantes, etc.)
- Dates: Relative dates like "Aujourd'hui, 14:30", "Hier, 09:15", etc.
- Titles: Concise and catchy.
- Descriptions: Detailed (2-3 sentences).
- Prices: Realistic for the item."#,
        count = LISTINGS_PER_FETCH,
    )
}

fn reply_prompt(listing: &Listing, user_message: &str) -> String {
    format!(
        r#"You are playing the role of a seller on a French classifieds site called Bi3oo.
You are selling: "{title}" for {price}.
Description: "{description}".

The buyer just sent you this message: "{message}"

Write a short, realistic, and polite response in French.
If they ask if it's available, say yes.
Keep it brief (1-2 sentences)."#,
        title = listing.title,
        price = listing.display_price(),
        description = listing.description,
        message = user_message,
    )
}

/// Parse and validate the model's JSON. Invalid items are dropped.
fn parse_listings(text: &str) -> Result<Vec<Listing>, serde_json::Error> {
    let raw: Vec<GeneratedListing> = serde_json::from_str(text.trim())?;
    let total = raw.len();
    let listings: Vec<Listing> = raw
        .into_iter()
        .filter(GeneratedListing::is_valid)
        .map(GeneratedListing::into_listing)
        .collect();
    if listings.len() < total {
        debug!(dropped = total - listings.len(), "discarded invalid generated listings");
    }
    Ok(listings)
}

#[derive(Clone)]
pub struct ContentService {
    provider: Arc<dyn ContentProvider>,
}

impl ContentService {
    pub fn new(provider: Arc<dyn ContentProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Generated listings for a query/category. Never empty.
    pub async fn fetch_listings(&self, query: &str, category: &str) -> Vec<Listing> {
        let prompt = listings_prompt(query, category);
        let schema = listing_schema();

        let text = match self.provider.generate(&prompt, Some(&schema)).await {
            Ok(text) => text,
            Err(e) => {
                let err = MarketError::FetchFailure(e.to_string());
                warn!(provider = self.provider.name(), error = %err, "using fallback listings");
                return fallback_listings();
            }
        };

        match parse_listings(&text) {
            Ok(listings) if !listings.is_empty() => {
                debug!(count = listings.len(), "generated listings");
                listings
            }
            Ok(_) => {
                warn!(provider = self.provider.name(), "no usable generated listings, using fallback");
                fallback_listings()
            }
            Err(e) => {
                let err = MarketError::FetchFailure(format!("unparseable listing JSON: {}", e));
                warn!(provider = self.provider.name(), error = %err, "using fallback listings");
                fallback_listings()
            }
        }
    }

    /// Single-turn reply from the seller of `listing`.
    pub async fn generate_chat_reply(&self, listing: &Listing, user_message: &str) -> String {
        let prompt = reply_prompt(listing, user_message);
        match self.provider.generate(&prompt, None).await {
            Ok(text) if text.trim().is_empty() => REPLY_WHEN_EMPTY.to_string(),
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                let err = MarketError::FetchFailure(e.to_string());
                warn!(provider = self.provider.name(), error = %err, "using fallback chat reply");
                REPLY_ON_FAILURE.to_string()
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::provider::ContentProvider;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::Mutex;

    /// Provider returning canned text and recording prompts.
    pub struct FakeProvider {
        pub response: Option<String>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl FakeProvider {
        pub fn replying(text: &str) -> Self {
            Self {
                response: Some(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn failing() -> Self {
            Self {
                response: None,
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ContentProvider for FakeProvider {
        async fn generate(&self, prompt: &str, _schema: Option<&Value>) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.response
                .clone()
                .ok_or_else(|| anyhow!("upstream unavailable"))
        }

        fn name(&self) -> &'static str {
            "fake"
        }
    }

    pub const TWO_LISTINGS: &str = r#"[
        {"id":"ai-1","title":"Vélo de course","price":320,"location":"Lyon","date":"Hier, 09:15",
         "category":"loisirs","description":"Cadre alu.","sellerName":"Luc","isPro":false},
        {"id":"ai-2","title":"Clio 4","price":8900.5,"location":"Lille","date":"Aujourd'hui, 14:30",
         "category":"vehicules","description":"Diesel.","sellerName":"Garage Nord","isPro":true}
    ]"#;
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    fn make_service(provider: FakeProvider) -> (ContentService, Arc<FakeProvider>) {
        let provider = Arc::new(provider);
        (ContentService::new(provider.clone()), provider)
    }

    #[tokio::test]
    async fn test_fetch_listings_attaches_image_urls() {
        let (service, _) = make_service(FakeProvider::replying(TWO_LISTINGS));
        let listings = service.fetch_listings("velo", "all").await;

        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].image_url, "https://picsum.photos/seed/ai-1/600/400");
        assert!(listings[1].is_pro);
        assert_eq!(listings[1].price, 8900.5);
    }

    #[tokio::test]
    async fn test_fetch_listings_falls_back_when_upstream_fails() {
        let (service, _) = make_service(FakeProvider::failing());
        let listings = service.fetch_listings("", "all").await;
        assert!(!listings.is_empty());
        assert_eq!(listings, fallback_listings());
    }

    #[tokio::test]
    async fn test_fetch_listings_falls_back_on_bad_json() {
        let (service, _) = make_service(FakeProvider::replying("Voici vos annonces !"));
        assert_eq!(service.fetch_listings("", "all").await, fallback_listings());

        // Missing required fields
        let (service, _) = make_service(FakeProvider::replying(r#"[{"id":"x","title":"t"}]"#));
        assert_eq!(service.fetch_listings("", "all").await, fallback_listings());
    }

    #[tokio::test]
    async fn test_fetch_listings_drops_invalid_items() {
        let text = r#"[
            {"id":"ok","title":"Table","price":40,"location":"Paris","date":"Hier",
             "category":"maison","description":"Chêne.","sellerName":"Ana","isPro":false},
            {"id":"neg","title":"Chaise","price":-3,"location":"Paris","date":"Hier",
             "category":"maison","description":"Bois.","sellerName":"Ana","isPro":false}
        ]"#;
        let (service, _) = make_service(FakeProvider::replying(text));
        let listings = service.fetch_listings("", "maison").await;
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].id, "ok");
    }

    #[tokio::test]
    async fn test_empty_generation_falls_back() {
        let (service, _) = make_service(FakeProvider::replying("[]"));
        assert_eq!(service.fetch_listings("", "all").await.len(), 2);
    }

    #[tokio::test]
    async fn test_prompt_mentions_query_and_category() {
        let (service, provider) = make_service(FakeProvider::replying(TWO_LISTINGS));
        service.fetch_listings("velo Lyon", "loisirs").await;
        service.fetch_listings("", "all").await;

        let prompts = provider.prompts.lock().unwrap();
        assert!(prompts[0].contains("\"velo Lyon\""));
        assert!(prompts[0].contains("\"loisirs\""));
        assert!(prompts[1].contains("items récents"));
    }

    #[tokio::test]
    async fn test_chat_reply_fallbacks() {
        let listing = fallback_listings().remove(0);

        let (service, provider) = make_service(FakeProvider::replying("  Oui, il est dispo.  "));
        let reply = service.generate_chat_reply(&listing, "Disponible ?").await;
        assert_eq!(reply, "Oui, il est dispo.");
        assert!(provider.prompts.lock().unwrap()[0].contains("Canapé Vintage"));

        let (service, _) = make_service(FakeProvider::replying(" "));
        assert_eq!(service.generate_chat_reply(&listing, "?").await, REPLY_WHEN_EMPTY);

        let (service, _) = make_service(FakeProvider::failing());
        assert_eq!(service.generate_chat_reply(&listing, "?").await, REPLY_ON_FAILURE);
    }

    #[test]
    fn test_schema_requires_nine_fields() {
        let schema = listing_schema();
        assert_eq!(schema["items"]["required"].as_array().unwrap().len(), 9);
    }
}
