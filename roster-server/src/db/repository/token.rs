//! Revoked token registry (logout)

use super::RepoResult;
use crate::db::storage::REVOKED_TOKENS_TABLE;
use crate::db::{Storage, StorageError};
use redb::ReadableTable;

#[derive(Clone)]
pub struct TokenRepository {
    storage: Storage,
}

impl TokenRepository {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Record a token id as revoked until its expiry
    pub fn revoke(&self, jti: &str, expires_at: i64) -> RepoResult<()> {
        let txn = self.storage.begin_write()?;
        {
            let mut table = txn
                .open_table(REVOKED_TOKENS_TABLE)
                .map_err(StorageError::from)?;
            table.insert(jti, expires_at).map_err(StorageError::from)?;
        }
        txn.commit().map_err(StorageError::from)?;
        Ok(())
    }

    pub fn is_revoked(&self, jti: &str) -> RepoResult<bool> {
        Ok(self.storage.is_revoked(jti)?)
    }

    /// Drop entries whose token has expired anyway; returns how many
    pub fn purge_expired(&self, now_secs: i64) -> RepoResult<usize> {
        let txn = self.storage.begin_write()?;
        let purged = {
            let mut table = txn
                .open_table(REVOKED_TOKENS_TABLE)
                .map_err(StorageError::from)?;
            let mut expired = Vec::new();
            for entry in table.iter().map_err(StorageError::from)? {
                let (jti, exp) = entry.map_err(StorageError::from)?;
                if exp.value() <= now_secs {
                    expired.push(jti.value().to_string());
                }
            }
            for jti in &expired {
                table.remove(jti.as_str()).map_err(StorageError::from)?;
            }
            expired.len()
        };
        txn.commit().map_err(StorageError::from)?;
        Ok(purged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revoke_and_purge() {
        let repo = TokenRepository::new(Storage::open_in_memory().unwrap());
        repo.revoke("old", 100).unwrap();
        repo.revoke("fresh", 10_000).unwrap();
        assert!(repo.is_revoked("old").unwrap());
        assert!(!repo.is_revoked("never").unwrap());

        assert_eq!(repo.purge_expired(1_000).unwrap(), 1);
        assert!(!repo.is_revoked("old").unwrap());
        assert!(repo.is_revoked("fresh").unwrap());
    }
}
