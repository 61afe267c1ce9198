use super::{GalleryStore, Site};
use crate::core::error::SitegenError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, migrate::MigrateDatabase, sqlite::SqlitePoolOptions};
use uuid::Uuid;

const MIGRATIONS_SQL: &str = "
CREATE TABLE IF NOT EXISTS sites (
    id TEXT PRIMARY KEY NOT NULL, -- UUID
    name TEXT NOT NULL,
    code TEXT NOT NULL,
    accepted INTEGER NOT NULL DEFAULT 0,
    views INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL -- Unix Timestamp (seconds)
);
CREATE INDEX IF NOT EXISTS idx_sites_accepted ON sites(accepted);
";

#[derive(sqlx::FromRow)]
struct SiteRow {
    id: String,
    name: String,
    code: String,
    accepted: bool,
    views: i64,
    created_at: i64,
}

impl TryFrom<SiteRow> for Site {
    type Error = SitegenError;

    fn try_from(row: SiteRow) -> Result<Self, Self::Error> {
        Ok(Site {
            id: Uuid::parse_str(&row.id)
                .map_err(|e| SitegenError::Store(format!("Bad site id {}: {}", row.id, e)))?,
            name: row.name,
            code: row.code,
            accepted: row.accepted,
            views: row.views,
            created_at: DateTime::from_timestamp(row.created_at, 0).ok_or_else(|| {
                SitegenError::Store(format!("Invalid created_at timestamp {}", row.created_at))
            })?,
        })
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// Gallery backed by a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteGallery {
    pool: SqlitePool,
}

impl SqliteGallery {
    /// Connects to `database_url`, creating the database file when missing,
    /// and applies the schema.
    pub async fn connect(database_url: &str) -> Result<Self, SitegenError> {
        if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
            tracing::info!("Database not found, creating {}", database_url);
            Sqlite::create_database(database_url).await?;
        }

        let mut options = SqlitePoolOptions::new();
        if is_in_memory(database_url) {
            // Each connection to an in-memory database sees its own empty copy.
            options = options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }
        let pool = options.connect(database_url).await?;
        Self::run_migrations(&pool).await?;
        tracing::info!("Gallery database ready at {}", database_url);
        Ok(Self { pool })
    }

    #[cfg(test)]
    pub async fn in_memory() -> Self {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        Self::run_migrations(&pool).await.unwrap();
        Self { pool }
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<(), SitegenError> {
        sqlx::query(MIGRATIONS_SQL).execute(pool).await?;
        Ok(())
    }

    #[cfg(test)]
    async fn accept(&self, id: Uuid) {
        sqlx::query("UPDATE sites SET accepted = 1 WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .unwrap();
    }
}

#[async_trait]
impl GalleryStore for SqliteGallery {
    async fn list_accepted(&self) -> Result<Vec<Site>, SitegenError> {
        let rows = sqlx::query_as::<_, SiteRow>(
            r#"
            SELECT id, name, code, accepted, views, created_at
            FROM sites
            WHERE accepted = 1
            ORDER BY views DESC, name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Site::try_from).collect()
    }

    async fn insert(&self, name: &str, code: &str) -> Result<Site, SitegenError> {
        let site = Site {
            id: Uuid::new_v4(),
            name: name.to_string(),
            code: code.to_string(),
            accepted: false,
            views: 0,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO sites (id, name, code, accepted, views, created_at)
            VALUES (?, ?, ?, 0, 0, ?)
            "#,
        )
        .bind(site.id.to_string())
        .bind(&site.name)
        .bind(&site.code)
        .bind(site.created_at.timestamp())
        .execute(&self.pool)
        .await?;

        tracing::debug!(id = %site.id, "inserted site");
        // Stored timestamps have second precision.
        Ok(Site {
            created_at: DateTime::from_timestamp(site.created_at.timestamp(), 0)
                .unwrap_or(site.created_at),
            ..site
        })
    }

    async fn get(&self, id: Uuid) -> Result<Option<Site>, SitegenError> {
        let row = sqlx::query_as::<_, SiteRow>(
            "SELECT id, name, code, accepted, views, created_at FROM sites WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Site::try_from).transpose()
    }

    async fn increment_views(&self, id: Uuid) -> Result<bool, SitegenError> {
        let result = sqlx::query("UPDATE sites SET views = views + 1 WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
