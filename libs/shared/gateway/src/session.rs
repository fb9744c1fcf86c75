use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, info, warn};

use shared_models::auth::TokenClaims;
use shared_models::error::ClientError;
use shared_utils::jwt::decode_claims;

/// Name of the single storage slot holding the raw bearer token.
pub const TOKEN_SLOT: &str = "authToken";

/// Process-wide holder of the current bearer token.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore: Send + Sync {
    fn save(&self, token: &str) -> Result<(), ClientError>;

    fn get(&self) -> Option<String>;

    fn clear(&self) -> Result<(), ClientError>;
}

/// Decode the claims of whatever token is currently stored.
pub fn current_claims(store: &dyn SessionStore) -> Option<TokenClaims> {
    store.get().as_deref().and_then(decode_claims)
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: RwLock<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn save(&self, token: &str) -> Result<(), ClientError> {
        let mut slot = self.token.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(token.to_string());
        Ok(())
    }

    fn get(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn clear(&self) -> Result<(), ClientError> {
        let mut slot = self.token.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = None;
        Ok(())
    }
}

/// Token slot persisted as a file so a session survives restarts.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    slot_path: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            slot_path: dir.as_ref().join(TOKEN_SLOT),
        }
    }

    pub fn slot_path(&self) -> &Path {
        &self.slot_path
    }
}

impl SessionStore for FileSessionStore {
    fn save(&self, token: &str) -> Result<(), ClientError> {
        if let Some(dir) = self.slot_path.parent() {
            fs::create_dir_all(dir).map_err(|e| {
                ClientError::Storage(format!("Cannot create session directory {}: {}", dir.display(), e))
            })?;
        }

        fs::write(&self.slot_path, token)
            .map_err(|e| ClientError::Storage(format!("Cannot write session token: {}", e)))?;

        info!("Session token saved to {}", self.slot_path.display());
        Ok(())
    }

    fn get(&self) -> Option<String> {
        match fs::read_to_string(&self.slot_path) {
            Ok(contents) => {
                let token = contents.trim();
                (!token.is_empty()).then(|| token.to_string())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No session token at {}", self.slot_path.display());
                None
            }
            Err(e) => {
                warn!("Failed to read session token: {}", e);
                None
            }
        }
    }

    fn clear(&self) -> Result<(), ClientError> {
        match fs::remove_file(&self.slot_path) {
            Ok(()) => {
                info!("Session token cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::Storage(format!("Cannot remove session token: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_utils::test_utils::{JwtTestUtils, TestUser};

    #[test]
    fn test_memory_store_lifecycle() {
        let store = MemorySessionStore::new();
        assert_eq!(store.get(), None);

        store.save("abc.def.ghi").unwrap();
        assert_eq!(store.get().as_deref(), Some("abc.def.ghi"));

        store.clear().unwrap();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session"));
        store.save("token-1").unwrap();

        let reopened = FileSessionStore::new(dir.path().join("session"));
        assert_eq!(reopened.get().as_deref(), Some("token-1"));

        reopened.clear().unwrap();
        assert_eq!(store.get(), None);
        assert!(!store.slot_path().exists());
    }

    #[test]
    fn test_file_store_clear_without_token_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path());
        assert!(store.clear().is_ok());
        assert_eq!(store.get(), None);
    }

    #[test]
    fn test_current_claims_uses_stored_token() {
        let store = MemorySessionStore::new();
        assert_eq!(current_claims(&store), None);

        let user = TestUser::doctor(3, "rahul@clinic.in");
        store.save(&JwtTestUtils::create_test_token(&user, None)).unwrap();

        let claims = current_claims(&store).unwrap();
        assert_eq!(claims.role.as_deref(), Some("DOCTOR"));
        assert_eq!(claims.user_id, Some(3));
    }
}
