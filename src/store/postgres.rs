use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::config::DatabaseConfig;

use super::{
    Build, BuildChanges, BuildComponent, ChecklistItem, NewBuild, NewChecklistItem, NewMember,
    NewStashItem, PartyMember, StashItem, StashItemChanges, Store, StoreError,
};

/// Postgres-backed store. One database per household.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(std::time::Duration::from_secs(config.connect_timeout_secs))
            .connect(url)
            .await?;

        info!("Created database pool ({} max connections)", config.max_connections);
        Ok(Self { pool })
    }

    /// Create the household tables if they do not exist yet
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS builds (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                notes TEXT,
                components JSONB NOT NULL DEFAULT '[]',
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )"#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS stash_items (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                quantity BIGINT NOT NULL,
                location TEXT,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )"#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS checklist_items (
                id UUID PRIMARY KEY,
                label TEXT NOT NULL,
                done BOOLEAN NOT NULL DEFAULT FALSE,
                done_at TIMESTAMPTZ,
                created_at TIMESTAMPTZ NOT NULL
            )"#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS party_members (
                id UUID PRIMARY KEY,
                display_name TEXT NOT NULL,
                role TEXT NOT NULL,
                joined_at TIMESTAMPTZ NOT NULL
            )"#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct BuildRow {
    id: Uuid,
    name: String,
    notes: Option<String>,
    components: Json<Vec<BuildComponent>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BuildRow> for Build {
    fn from(row: BuildRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            notes: row.notes,
            components: row.components.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_builds(&self) -> Result<Vec<Build>, StoreError> {
        let rows: Vec<BuildRow> =
            sqlx::query_as("SELECT * FROM builds ORDER BY created_at")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(Build::from).collect())
    }

    async fn get_build(&self, id: Uuid) -> Result<Option<Build>, StoreError> {
        let row: Option<BuildRow> =
            sqlx::query_as("SELECT * FROM builds WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Build::from))
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
        sqlx::query(
            "INSERT INTO builds (id, name, notes, components, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(build.id)
        .bind(&build.name)
        .bind(&build.notes)
        .bind(Json(&build.components))
        .bind(build.created_at)
        .bind(build.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(build)
    }

    async fn update_build(&self, id: Uuid, changes: BuildChanges) -> Result<Option<Build>, StoreError> {
        let row: Option<BuildRow> = sqlx::query_as(
            "UPDATE builds SET \
                name = COALESCE($2, name), \
                notes = COALESCE($3, notes), \
                components = COALESCE($4, components), \
                updated_at = $5 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.notes)
        .bind(changes.components.map(Json))
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Build::from))
    }

    async fn delete_build(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM builds WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_stash_items(&self) -> Result<Vec<StashItem>, StoreError> {
        let items = sqlx::query_as::<_, StashItemRow>("SELECT * FROM stash_items ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;
        Ok(items.into_iter().map(StashItem::from).collect())
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
        sqlx::query(
            "INSERT INTO stash_items (id, name, quantity, location, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(item.id)
        .bind(&item.name)
        .bind(item.quantity)
        .bind(&item.location)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(item)
    }

    async fn update_stash_item(&self, id: Uuid, changes: StashItemChanges) -> Result<Option<StashItem>, StoreError> {
        let row: Option<StashItemRow> = sqlx::query_as(
            "UPDATE stash_items SET \
                name = COALESCE($2, name), \
                quantity = COALESCE($3, quantity), \
                location = COALESCE($4, location), \
                updated_at = $5 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.quantity)
        .bind(changes.location)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(StashItem::from))
    }

    async fn delete_stash_item(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM stash_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_checklist_items(&self) -> Result<Vec<ChecklistItem>, StoreError> {
        let items =
            sqlx::query_as::<_, ChecklistRow>("SELECT * FROM checklist_items ORDER BY created_at")
                .fetch_all(&self.pool)
                .await?;
        Ok(items.into_iter().map(ChecklistItem::from).collect())
    }

    async fn insert_checklist_item(&self, item: NewChecklistItem) -> Result<ChecklistItem, StoreError> {
        let item = ChecklistItem {
            id: Uuid::new_v4(),
            label: item.label,
            done: false,
            done_at: None,
            created_at: Utc::now(),
        };
        sqlx::query(
            "INSERT INTO checklist_items (id, label, done, done_at, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(item.id)
        .bind(&item.label)
        .bind(item.done)
        .bind(item.done_at)
        .bind(item.created_at)
        .execute(&self.pool)
        .await?;
        Ok(item)
    }

    async fn set_checklist_done(&self, id: Uuid, done: bool) -> Result<Option<ChecklistItem>, StoreError> {
        let row: Option<ChecklistRow> = sqlx::query_as(
            "UPDATE checklist_items SET \
                done = $2, \
                done_at = CASE WHEN $2 THEN $3 ELSE NULL END \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(done)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(ChecklistItem::from))
    }

    async fn delete_checklist_item(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM checklist_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn purge_done_checklist(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM checklist_items WHERE done AND done_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn list_members(&self) -> Result<Vec<PartyMember>, StoreError> {
        let members =
            sqlx::query_as::<_, MemberRow>("SELECT * FROM party_members ORDER BY joined_at")
                .fetch_all(&self.pool)
                .await?;
        Ok(members.into_iter().map(PartyMember::from).collect())
    }

    async fn insert_member(&self, member: NewMember) -> Result<PartyMember, StoreError> {
        let member = PartyMember {
            id: Uuid::new_v4(),
            display_name: member.display_name,
            role: member.role,
            joined_at: Utc::now(),
        };
        sqlx::query(
            "INSERT INTO party_members (id, display_name, role, joined_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(member.id)
        .bind(&member.display_name)
        .bind(&member.role)
        .bind(member.joined_at)
        .execute(&self.pool)
        .await?;
        Ok(member)
    }

    async fn delete_member(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM party_members WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(sqlx::FromRow)]
struct StashItemRow {
    id: Uuid,
    name: String,
    quantity: i64,
    location: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<StashItemRow> for StashItem {
    fn from(row: StashItemRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            quantity: row.quantity,
            location: row.location,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ChecklistRow {
    id: Uuid,
    label: String,
    done: bool,
    done_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<ChecklistRow> for ChecklistItem {
    fn from(row: ChecklistRow) -> Self {
        Self {
            id: row.id,
            label: row.label,
            done: row.done,
            done_at: row.done_at,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct MemberRow {
    id: Uuid,
    display_name: String,
    role: String,
    joined_at: DateTime<Utc>,
}

impl From<MemberRow> for PartyMember {
    fn from(row: MemberRow) -> Self {
        Self {
            id: row.id,
            display_name: row.display_name,
            role: row.role,
            joined_at: row.joined_at,
        }
    }
}
