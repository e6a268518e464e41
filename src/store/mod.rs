use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub mod memory;
pub mod postgres;

/// Errors from the persistence boundary
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// A crafting build: a named set of components assembled from stash items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Build {
    pub id: Uuid,
    pub name: String,
    pub notes: Option<String>,
    pub components: Vec<BuildComponent>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildComponent {
    pub item_name: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StashItem {
    pub id: Uuid,
    pub name: String,
    pub quantity: i64,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: Uuid,
    pub label: String,
    pub done: bool,
    pub done_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyMember {
    pub id: Uuid,
    pub display_name: String,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

/// Insert payloads. IDs and timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewBuild {
    pub name: String,
    pub notes: Option<String>,
    pub components: Vec<BuildComponent>,
}

#[derive(Debug, Clone)]
pub struct NewStashItem {
    pub name: String,
    pub quantity: i64,
    pub location: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewChecklistItem {
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct NewMember {
    pub display_name: String,
    pub role: String,
}

/// Partial updates. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct BuildChanges {
    pub name: Option<String>,
    pub notes: Option<String>,
    pub components: Option<Vec<BuildComponent>>,
}

#[derive(Debug, Clone, Default)]
pub struct StashItemChanges {
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub location: Option<String>,
}

/// Narrow persistence interface the handlers call through. Implementations
/// must be safe to share across concurrent requests.
#[async_trait]
pub trait Store: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;

    // Builds
    async fn list_builds(&self) -> Result<Vec<Build>, StoreError>;
    async fn get_build(&self, id: Uuid) -> Result<Option<Build>, StoreError>;
    async fn insert_build(&self, build: NewBuild) -> Result<Build, StoreError>;
    async fn update_build(&self, id: Uuid, changes: BuildChanges) -> Result<Option<Build>, StoreError>;
    async fn delete_build(&self, id: Uuid) -> Result<bool, StoreError>;

    // Stash
    async fn list_stash_items(&self) -> Result<Vec<StashItem>, StoreError>;
    async fn insert_stash_item(&self, item: NewStashItem) -> Result<StashItem, StoreError>;
    async fn update_stash_item(&self, id: Uuid, changes: StashItemChanges) -> Result<Option<StashItem>, StoreError>;
    async fn delete_stash_item(&self, id: Uuid) -> Result<bool, StoreError>;

    // Checklist
    async fn list_checklist_items(&self) -> Result<Vec<ChecklistItem>, StoreError>;
    async fn insert_checklist_item(&self, item: NewChecklistItem) -> Result<ChecklistItem, StoreError>;
    async fn set_checklist_done(&self, id: Uuid, done: bool) -> Result<Option<ChecklistItem>, StoreError>;
    async fn delete_checklist_item(&self, id: Uuid) -> Result<bool, StoreError>;
    /// Remove items completed before `cutoff`; returns how many were purged
    async fn purge_done_checklist(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError>;

    // Party members
    async fn list_members(&self) -> Result<Vec<PartyMember>, StoreError>;
    async fn insert_member(&self, member: NewMember) -> Result<PartyMember, StoreError>;
    /// Delete exactly one membership row; returns false when the id is unknown
    async fn delete_member(&self, id: Uuid) -> Result<bool, StoreError>;
}
