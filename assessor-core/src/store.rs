//! Persistence collaborator contract.

use crate::{AssessmentTest, StoreError, TestId, TestPayload, UpdateTestPayload};
use async_trait::async_trait;

/// Source of truth for assessment tests.
///
/// Every call is single-shot: exactly one success or one failure per request,
/// no retries, no state carried between calls.
#[async_trait]
pub trait AssessmentStore: Send + Sync {
    /// All persisted tests.
    async fn list(&self) -> Result<Vec<AssessmentTest>, StoreError>;

    /// One test; `StoreError::NotFound` when the id is unknown.
    async fn get(&self, id: &TestId) -> Result<AssessmentTest, StoreError>;

    /// Persist a new test. The store assigns the id and `last_updated`.
    async fn create(&self, payload: &TestPayload) -> Result<AssessmentTest, StoreError>;

    /// Replace an existing test. The store refreshes `last_updated`.
    async fn update(&self, payload: &UpdateTestPayload) -> Result<AssessmentTest, StoreError>;

    async fn delete(&self, id: &TestId) -> Result<(), StoreError>;
}
