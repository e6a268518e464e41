use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    Build, BuildChanges, ChecklistItem, NewBuild, NewChecklistItem, NewMember, NewStashItem,
    PartyMember, StashItem, StashItemChanges, Store, StoreError,
};

/// In-memory store used by tests and as the development fallback when no
/// database is configured.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    builds: HashMap<Uuid, Build>,
    stash: HashMap<Uuid, StashItem>,
    checklist: HashMap<Uuid, ChecklistItem>,
    members: HashMap<Uuid, PartyMember>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn list_builds(&self) -> Result<Vec<Build>, StoreError> {
        let inner = self.inner.read().await;
        let mut builds: Vec<Build> = inner.builds.values().cloned().collect();
        builds.sort_by_key(|b| b.created_at);
        Ok(builds)
    }

    async fn get_build(&self, id: Uuid) -> Result<Option<Build>, StoreError> {
        Ok(self.inner.read().await.builds.get(&id).cloned())
    }

    async fn insert_build(&self, build: NewBuild) -> Result<Build, StoreError> {
        let now = Utc::now();
        let build = Build {
            id: Uuid::new_v4(),
            name: build.name,
            notes: build.notes,
            components: build.components,
            created_at: now,
            updated_at: now,
        };
        self.inner.write().await.builds.insert(build.id, build.clone());
        Ok(build)
    }

    async fn update_build(&self, id: Uuid, changes: BuildChanges) -> Result<Option<Build>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(build) = inner.builds.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            build.name = name;
        }
        if let Some(notes) = changes.notes {
            build.notes = Some(notes);
        }
        if let Some(components) = changes.components {
            build.components = components;
        }
        build.updated_at = Utc::now();
        Ok(Some(build.clone()))
    }

    async fn delete_build(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.builds.remove(&id).is_some())
    }

    async fn list_stash_items(&self) -> Result<Vec<StashItem>, StoreError> {
        let inner = self.inner.read().await;
        let mut items: Vec<StashItem> = inner.stash.values().cloned().collect();
        items.sort_by_key(|i| i.created_at);
        Ok(items)
    }

    async fn insert_stash_item(&self, item: NewStashItem) -> Result<StashItem, StoreError> {
        let now = Utc::now();
        let item = StashItem {
            id: Uuid::new_v4(),
            name: item.name,
            quantity: item.quantity,
            location: item.location,
            created_at: now,
            updated_at: now,
        };
        self.inner.write().await.stash.insert(item.id, item.clone());
        Ok(item)
    }

    async fn update_stash_item(&self, id: Uuid, changes: StashItemChanges) -> Result<Option<StashItem>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(item) = inner.stash.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            item.name = name;
        }
        if let Some(quantity) = changes.quantity {
            item.quantity = quantity;
        }
        if let Some(location) = changes.location {
            item.location = Some(location);
        }
        item.updated_at = Utc::now();
        Ok(Some(item.clone()))
    }

    async fn delete_stash_item(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.stash.remove(&id).is_some())
    }

    async fn list_checklist_items(&self) -> Result<Vec<ChecklistItem>, StoreError> {
        let inner = self.inner.read().await;
        let mut items: Vec<ChecklistItem> = inner.checklist.values().cloned().collect();
        items.sort_by_key(|i| i.created_at);
        Ok(items)
    }

    async fn insert_checklist_item(&self, item: NewChecklistItem) -> Result<ChecklistItem, StoreError> {
        let item = ChecklistItem {
            id: Uuid::new_v4(),
            label: item.label,
            done: false,
            done_at: None,
            created_at: Utc::now(),
        };
        self.inner.write().await.checklist.insert(item.id, item.clone());
        Ok(item)
    }

    async fn set_checklist_done(&self, id: Uuid, done: bool) -> Result<Option<ChecklistItem>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(item) = inner.checklist.get_mut(&id) else {
            return Ok(None);
        };
        item.done = done;
        item.done_at = if done { Some(Utc::now()) } else { None };
        Ok(Some(item.clone()))
    }

    async fn delete_checklist_item(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.checklist.remove(&id).is_some())
    }

    async fn purge_done_checklist(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.checklist.len();
        inner
            .checklist
            .retain(|_, item| !matches!(item.done_at, Some(done_at) if done_at < cutoff));
        Ok((before - inner.checklist.len()) as u64)
    }

    async fn list_members(&self) -> Result<Vec<PartyMember>, StoreError> {
        let inner = self.inner.read().await;
        let mut members: Vec<PartyMember> = inner.members.values().cloned().collect();
        members.sort_by_key(|m| m.joined_at);
        Ok(members)
    }

    async fn insert_member(&self, member: NewMember) -> Result<PartyMember, StoreError> {
        let member = PartyMember {
            id: Uuid::new_v4(),
            display_name: member.display_name,
            role: member.role,
            joined_at: Utc::now(),
        };
        self.inner.write().await.members.insert(member.id, member.clone());
        Ok(member)
    }

    async fn delete_member(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.members.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_delete_member_removes_exactly_one_row() {
        let store = MemoryStore::new();
        let kept = store
            .insert_member(NewMember { display_name: "Rowan".into(), role: "keeper".into() })
            .await
            .unwrap();
        let removed = store
            .insert_member(NewMember { display_name: "Ash".into(), role: "scout".into() })
            .await
            .unwrap();

        assert!(store.delete_member(removed.id).await.unwrap());
        // Second delete of the same id finds nothing
        assert!(!store.delete_member(removed.id).await.unwrap());

        let remaining = store.list_members().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, kept.id);
    }

    #[tokio::test]
    async fn test_purge_done_checklist_respects_cutoff() {
        let store = MemoryStore::new();
        let old = store
            .insert_checklist_item(NewChecklistItem { label: "restock firewood".into() })
            .await
            .unwrap();
        let fresh = store
            .insert_checklist_item(NewChecklistItem { label: "patch roof".into() })
            .await
            .unwrap();
        let open = store
            .insert_checklist_item(NewChecklistItem { label: "clean stash".into() })
            .await
            .unwrap();

        store.set_checklist_done(old.id, true).await.unwrap();
        store.set_checklist_done(fresh.id, true).await.unwrap();

        // Backdate the first completion past the cutoff
        {
            let mut inner = store.inner.write().await;
            inner.checklist.get_mut(&old.id).unwrap().done_at =
                Some(Utc::now() - Duration::days(30));
        }

        let purged = store
            .purge_done_checklist(Utc::now() - Duration::days(7))
            .await
            .unwrap();
        assert_eq!(purged, 1);

        let remaining = store.list_checklist_items().await.unwrap();
        let ids: Vec<Uuid> = remaining.iter().map(|i| i.id).collect();
        assert!(ids.contains(&fresh.id));
        assert!(ids.contains(&open.id));
        assert!(!ids.contains(&old.id));
    }

    #[tokio::test]
    async fn test_update_build_merges_changes() {
        let store = MemoryStore::new();
        let build = store
            .insert_build(NewBuild {
                name: "workbench".into(),
                notes: None,
                components: vec![],
            })
            .await
            .unwrap();

        let updated = store
            .update_build(
                build.id,
                BuildChanges { notes: Some("needs sanding".into()), ..Default::default() },
            )
            .await
            .unwrap()
            .expect("build exists");

        assert_eq!(updated.name, "workbench");
        assert_eq!(updated.notes.as_deref(), Some("needs sanding"));
    }
}
