use crate::content::ContentService;
use crate::model::{ChatMessage, Listing, Sender};
use chrono::Local;

/// Buyer-side conversation about one listing. Lives only in memory.
#[derive(Debug, Clone)]
pub struct ChatSession {
    listing: Listing,
    messages: Vec<ChatMessage>,
    next_seq: u64,
}

impl ChatSession {
    pub fn new(listing: Listing) -> Self {
        Self {
            listing,
            messages: Vec::new(),
            next_seq: 1,
        }
    }

    /// Start a conversation: the buyer asks whether the item is still
    /// available and the seller answers.
    pub async fn open(listing: Listing, content: &ContentService) -> Self {
        let mut session = Self::new(listing);
        let opening = session.opening_message();
        session.push(Sender::Me, &opening);
        session.receive_reply(content, &opening).await;
        session
    }

    pub fn opening_message(&self) -> String {
        format!(
            "Bonjour, votre annonce \"{}\" est-elle toujours disponible ?",
            self.listing.title
        )
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Record a buyer message. Blank text is ignored and yields `None`.
    pub fn push_user(&mut self, text: &str) -> Option<String> {
        if text.trim().is_empty() {
            return None;
        }
        self.push(Sender::Me, text);
        Some(text.to_string())
    }

    /// Ask the seller to answer `user_text` and append the reply.
    pub async fn receive_reply(&mut self, content: &ContentService, user_text: &str) {
        let reply = content.generate_chat_reply(&self.listing, user_text).await;
        self.push(Sender::Them, &reply);
    }

    /// Buyer message followed by the seller's reply. Returns false for blank input.
    pub async fn send(&mut self, content: &ContentService, text: &str) -> bool {
        match self.push_user(text) {
            Some(text) => {
                self.receive_reply(content, &text).await;
                true
            }
            None => false,
        }
    }

    fn push(&mut self, sender: Sender, text: &str) {
        let prefix = match sender {
            Sender::Me => "me",
            Sender::Them => "them",
        };
        self.messages.push(ChatMessage {
            id: format!("{}-{}", prefix, self.next_seq),
            sender,
            text: text.to_string(),
            timestamp: Local::now().format("%H:%M").to_string(),
        });
        self.next_seq += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::testing::FakeProvider;
    use crate::content::{fallback_listings, REPLY_ON_FAILURE};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_open_seeds_question_and_reply() {
        let content = ContentService::new(Arc::new(FakeProvider::replying("Oui, toujours dispo.")));
        let session = ChatSession::open(fallback_listings().remove(0), &content).await;

        let messages = session.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender, Sender::Me);
        assert!(messages[0].text.contains("\"Canapé Vintage\""));
        assert_eq!(messages[1].sender, Sender::Them);
        assert_eq!(messages[1].text, "Oui, toujours dispo.");
        assert_eq!(messages[1].timestamp.len(), 5);
    }

    #[tokio::test]
    async fn test_blank_message_ignored() {
        let content = ContentService::new(Arc::new(FakeProvider::failing()));
        let mut session = ChatSession::new(fallback_listings().remove(1));

        assert!(!session.send(&content, "   ").await);
        assert!(session.messages().is_empty());

        assert!(session.send(&content, "Dernier prix ?").await);
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[1].text, REPLY_ON_FAILURE);
        assert_ne!(session.messages()[0].id, session.messages()[1].id);
    }
}
