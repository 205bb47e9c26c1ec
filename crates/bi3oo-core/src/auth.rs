//! Account lookup and registration over the local store.
//!
//! WARNING: the stored "hash" is plain base64 of the password. It is reversible
//! and offers no protection at all; it only exists so the demo can compare
//! credentials. Do not use this module for real credential storage.

use crate::error::{ConflictKey, MarketError, Result};
use crate::model::User;
use crate::store::LocalStore;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::info;

/// Placeholder password encoding (base64). Not a security primitive.
pub fn encode_password(password: &str) -> String {
    STANDARD.encode(password.as_bytes())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn require_credentials(email: &str, password: &str) -> Result<()> {
    if email.is_empty() {
        return Err(MarketError::Validation("adresse e-mail requise".to_string()));
    }
    if password.is_empty() {
        return Err(MarketError::Validation("mot de passe requis".to_string()));
    }
    Ok(())
}

pub fn login(store: &LocalStore, email: &str, password: &str) -> Result<User> {
    let email = normalize_email(email);
    require_credentials(&email, password)?;

    let user = store.query_user(&email).ok_or(MarketError::NotFound)?;
    if user.password_hash != encode_password(password) {
        return Err(MarketError::BadCredential);
    }

    info!(email = %user.email, "user logged in");
    Ok(user)
}

/// Create an account. An empty display name falls back to the local part of
/// the email address.
pub fn register(store: &mut LocalStore, email: &str, password: &str, name: &str) -> Result<User> {
    let email = normalize_email(email);
    require_credentials(&email, password)?;

    if store.query_user(&email).is_some() {
        return Err(MarketError::Conflict(ConflictKey::Email(email)));
    }

    let name = match name.trim() {
        "" => email.split('@').next().unwrap_or(&email).to_string(),
        name => name.to_string(),
    };

    let user = User {
        email,
        password_hash: encode_password(password),
        name,
    };
    store.insert_user(user.clone())?;

    info!(email = %user.email, "user registered");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKv;
    use std::sync::Arc;

    fn store() -> LocalStore {
        LocalStore::open(Arc::new(MemoryKv::new()))
    }

    #[test]
    fn test_encoding_is_reversible_base64() {
        assert_eq!(encode_password("secret"), "c2VjcmV0");
    }

    #[test]
    fn test_register_then_login() {
        let mut store = store();
        register(&mut store, "marie@exemple.com", "pw123", "Marie L.").unwrap();

        let user = login(&store, "marie@exemple.com", "pw123").unwrap();
        assert_eq!(user.name, "Marie L.");
    }

    #[test]
    fn test_register_twice_conflicts() {
        let mut store = store();
        register(&mut store, "marie@exemple.com", "pw123", "Marie").unwrap();
        let err = register(&mut store, "marie@exemple.com", "other", "Marie 2").unwrap_err();
        assert!(matches!(err, MarketError::Conflict(ConflictKey::Email(_))));
        assert_eq!(err.user_message(), "Cet email est déjà utilisé");
    }

    #[test]
    fn test_wrong_password_is_bad_credential() {
        let mut store = store();
        register(&mut store, "marie@exemple.com", "pw123", "Marie").unwrap();
        let err = login(&store, "marie@exemple.com", "nope").unwrap_err();
        assert!(matches!(err, MarketError::BadCredential));
    }

    #[test]
    fn test_unknown_email_is_not_found() {
        let store = store();
        let err = login(&store, "ghost@exemple.com", "pw").unwrap_err();
        assert!(matches!(err, MarketError::NotFound));
    }

    #[test]
    fn test_email_is_normalized() {
        let mut store = store();
        register(&mut store, "  Thomas@Exemple.com ", "pw", "Thomas").unwrap();
        assert!(login(&store, "thomas@exemple.com", "pw").is_ok());
    }

    #[test]
    fn test_empty_fields_rejected() {
        let mut store = store();
        assert!(matches!(
            register(&mut store, "", "pw", "x").unwrap_err(),
            MarketError::Validation(_)
        ));
        assert!(matches!(
            login(&store, "a@b.fr", "").unwrap_err(),
            MarketError::Validation(_)
        ));
    }

    #[test]
    fn test_default_name_from_email() {
        let mut store = store();
        let user = register(&mut store, "lucie@exemple.com", "pw", " ").unwrap();
        assert_eq!(user.name, "lucie");
    }
}
