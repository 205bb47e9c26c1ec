use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// A text-generation backend.
///
/// `schema`, when given, is a JSON schema the response text must conform to;
/// backends that support structured output forward it, the caller still
/// validates what comes back.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    async fn generate(&self, prompt: &str, schema: Option<&Value>) -> Result<String>;

    /// Name of the backend, used in logs
    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gemini,
    Ollama,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::Ollama => "ollama",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gemini" => Some(Provider::Gemini),
            "ollama" => Some(Provider::Ollama),
            _ => None,
        }
    }

    pub fn all() -> Vec<Provider> {
        vec![Provider::Gemini, Provider::Ollama]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Gemini => "Gemini (Google)",
            Provider::Ollama => "Ollama (Local)",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini-2.5-flash",
            Provider::Ollama => "gemma3:latest",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_names_roundtrip() {
        for provider in Provider::all() {
            assert_eq!(Provider::from_str(provider.as_str()), Some(provider));
        }
        assert_eq!(Provider::from_str("GEMINI"), Some(Provider::Gemini));
        assert_eq!(Provider::from_str("claude"), None);
    }
}
