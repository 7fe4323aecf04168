//! InMemory Identity Store
//!
//! ユーザー管理は外部のコラボレーターであり、このサーバーは存在確認と表示名の
//! 参照だけを必要とします。起動時に JSON ファイルから読み込むか、テストで登録します。

use std::{collections::HashMap, path::Path};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::domain::{IdentityId, IdentityStore, RepositoryError};

/// Seed file entry: `[{"profile_id": "...", "user_name": "..."}]`
#[derive(Debug, Deserialize)]
struct IdentityRecord {
    profile_id: String,
    user_name: String,
}

#[derive(Default)]
pub struct InMemoryIdentityStore {
    names: RwLock<HashMap<IdentityId, String>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or rename) an identity.
    pub async fn upsert(&self, identity: IdentityId, name: impl Into<String>) {
        self.names.write().await.insert(identity, name.into());
    }

    /// Load identities from a JSON seed file.
    pub async fn load_from_file(path: &Path) -> Result<Self, IdentitySeedError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| IdentitySeedError::Read(e.to_string()))?;
        Self::from_json(&raw).await
    }

    pub async fn from_json(raw: &str) -> Result<Self, IdentitySeedError> {
        let records: Vec<IdentityRecord> =
            serde_json::from_str(raw).map_err(|e| IdentitySeedError::Parse(e.to_string()))?;
        let store = Self::new();
        for record in records {
            let identity = IdentityId::new(record.profile_id)
                .map_err(|e| IdentitySeedError::Parse(e.to_string()))?;
            store.upsert(identity, record.user_name).await;
        }
        Ok(store)
    }

    pub async fn len(&self) -> usize {
        self.names.read().await.len()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IdentitySeedError {
    #[error("failed to read identity seed file: {0}")]
    Read(String),
    #[error("invalid identity seed file: {0}")]
    Parse(String),
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn exists(&self, identity: &IdentityId) -> Result<bool, RepositoryError> {
        Ok(self.names.read().await.contains_key(identity))
    }

    async fn find_name(&self, identity: &IdentityId) -> Result<Option<String>, RepositoryError> {
        Ok(self.names.read().await.get(identity).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_from_json_loads_records() {
        // テスト項目: JSON のシードから ID と表示名を読み込める
        // given (前提条件):
        let raw = r#"[
            {"profile_id": "alice", "user_name": "Alice"},
            {"profile_id": "bob", "user_name": "Bob"}
        ]"#;

        // when (操作):
        let store = InMemoryIdentityStore::from_json(raw).await.unwrap();

        // then (期待する結果):
        let alice = IdentityId::new("alice".to_string()).unwrap();
        let carol = IdentityId::new("carol".to_string()).unwrap();
        assert_eq!(store.len().await, 2);
        assert!(store.exists(&alice).await.unwrap());
        assert_eq!(store.find_name(&alice).await.unwrap().as_deref(), Some("Alice"));
        assert!(!store.exists(&carol).await.unwrap());
        assert_eq!(store.find_name(&carol).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_from_json_rejects_empty_profile_id() {
        // テスト項目: 空の profile_id を含むシードはエラーになる
        let raw = r#"[{"profile_id": "", "user_name": "Nobody"}]"#;

        let result = InMemoryIdentityStore::from_json(raw).await;

        assert!(matches!(result, Err(IdentitySeedError::Parse(_))));
    }
}
