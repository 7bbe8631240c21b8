// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! In-memory registration store, used when no store directory is configured.

use crate::providers::RegistrationStore;
use crate::types::RegistrationEntry;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, RegistrationEntry>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl RegistrationStore for MemoryStore {
    async fn put(&self, entry: &RegistrationEntry) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(entry.instance_id.clone(), entry.clone());
        Ok(())
    }

    async fn fetch(&self, instance_id: &str) -> Result<Option<RegistrationEntry>> {
        Ok(self.entries.read().await.get(instance_id).cloned())
    }

    async fn delete(&self, instance_id: &str) -> Result<()> {
        self.entries.write().await.remove(instance_id);
        Ok(())
    }
}
