//! Persistence boundary: store and retrieve extraction results.
//!
//! The pipeline produces an [`crate::ExtractionResult`]; everything after
//! that — databases, object stores, HTTP handlers — lives behind
//! [`ResultStore`]. The store assigns the identifier on acceptance; the
//! pipeline never mints ids.
//!
//! [`MemoryStore`] is the reference implementation, suitable for tests and
//! single-process deployments. A database-backed implementation only needs
//! to satisfy the same two methods.

use crate::output::ExtractionResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// An extraction result with its store-assigned identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredExtraction {
    pub id: Uuid,
    #[serde(flatten)]
    pub result: ExtractionResult,
}

/// Failures at the persistence boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No extraction with the given id exists.
    #[error("No extraction found with id {id}")]
    NotFound { id: Uuid },

    /// Backend-specific failure (connection loss, serialization, …).
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Async persistence seam for extraction results.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Accept one result, assign it an identifier, and return the stored
    /// record.
    async fn save(&self, result: ExtractionResult) -> Result<StoredExtraction, StoreError>;

    /// Retrieve a previously stored result by identifier.
    async fn get(&self, id: Uuid) -> Result<StoredExtraction, StoreError>;
}

/// In-memory [`ResultStore`] backed by a `RwLock`ed map.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<Uuid, StoredExtraction>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn save(&self, result: ExtractionResult) -> Result<StoredExtraction, StoreError> {
        let stored = StoredExtraction {
            id: Uuid::new_v4(),
            result,
        };
        self.records
            .write()
            .await
            .insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get(&self, id: Uuid) -> Result<StoredExtraction, StoreError> {
        self.records
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { id })
    }
}
