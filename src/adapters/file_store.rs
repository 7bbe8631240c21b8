// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Registration store persisted as a single JSON document.
//!
//! The document lives at `<dir>/<table>.json` and maps instance ids to their
//! [`RegistrationEntry`]. Writes go to a temporary file which is then renamed
//! over the document, so a crash never leaves a truncated file behind.

use crate::providers::RegistrationStore;
use crate::types::RegistrationEntry;
use anyhow::{Context as AnyhowContext, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

type Table = BTreeMap<String, RegistrationEntry>;

/// JSON-file [`RegistrationStore`].
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(dir: &Path, table_name: &str) -> Self {
        Self {
            path: dir.join(format!("{table_name}.json")),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_table(&self) -> Result<Table> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Table::new()),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("Corrupt registration table {}", self.path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Table::new()),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", self.path.display())),
        }
    }

    async fn write_table(&self, table: &Table) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let bytes = serde_json::to_vec_pretty(table)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

#[async_trait]
impl RegistrationStore for JsonFileStore {
    async fn put(&self, entry: &RegistrationEntry) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut table = self.read_table().await?;
        table.insert(entry.instance_id.clone(), entry.clone());
        self.write_table(&table).await?;
        debug!(
            instance_id = %entry.instance_id,
            records = entry.records.len(),
            path = %self.path.display(),
            "Stored registration entry"
        );
        Ok(())
    }

    async fn fetch(&self, instance_id: &str) -> Result<Option<RegistrationEntry>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_table().await?.remove(instance_id))
    }

    async fn delete(&self, instance_id: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut table = self.read_table().await?;
        if table.remove(instance_id).is_none() {
            debug!(instance_id, "No registration entry to delete");
            return Ok(());
        }
        self.write_table(&table).await
    }
}

#[cfg(test)]
#[path = "file_store_tests.rs"]
mod file_store_tests;
