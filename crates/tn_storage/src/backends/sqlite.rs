use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tn_core::{Error, NewRecord, NewsFilter, NewsRecord, NewsStore, Result};

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS news (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        source TEXT NOT NULL,
        url TEXT NOT NULL UNIQUE,
        published_at TEXT NOT NULL
    )
    "#,
    // Add future migrations here
];

/// SQLite-backed store. Every statement autocommits, so an `insert` that
/// returns `Ok` is durable.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&format!(
            "sqlite:{}",
            path.as_ref().display()
        ))
        .map_err(|e| Error::Storage(format!("invalid database path: {}", e)))?
        .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| Error::Storage(format!("failed to open database: {}", e)))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Storage(format!("migration {} failed: {}", i, e)))?;
        }

        Ok(Self { pool })
    }
}

fn row_to_record(row: &SqliteRow) -> Result<NewsRecord> {
    let published_at: String = row.get("published_at");
    let published_at = DateTime::parse_from_rfc3339(&published_at)
        .map_err(|e| Error::Storage(format!("corrupt published_at column: {}", e)))?
        .with_timezone(&Utc);

    Ok(NewsRecord {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        source: row.get("source"),
        url: row.get("url"),
        published_at,
    })
}

#[async_trait]
impl NewsStore for SqliteStore {
    async fn find_by_url(&self, url: &str) -> Result<Option<NewsRecord>> {
        let row = sqlx::query(
            "SELECT id, title, content, source, url, published_at FROM news WHERE url = ?",
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::Storage(e.to_string()))?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn insert(&self, record: NewRecord) -> Result<NewsRecord> {
        let result = sqlx::query(
            "INSERT INTO news (title, content, source, url, published_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&record.title)
        .bind(&record.content)
        .bind(&record.source)
        .bind(&record.url)
        .bind(record.published_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Storage(format!("failed to insert {}: {}", record.url, e)))?;

        Ok(NewsRecord {
            id: result.last_insert_rowid(),
            title: record.title,
            content: record.content,
            source: record.source,
            url: record.url,
            published_at: record.published_at,
        })
    }

    async fn get(&self, id: i64) -> Result<Option<NewsRecord>> {
        let row = sqlx::query(
            "SELECT id, title, content, source, url, published_at FROM news WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Error::Storage(e.to_string()))?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn list(&self, filter: NewsFilter) -> Result<Vec<NewsRecord>> {
        let mut sql = String::from(
            "SELECT id, title, content, source, url, published_at FROM news WHERE 1=1",
        );
        if filter.title.is_some() {
            sql.push_str(" AND title LIKE ?");
        }
        if filter.source.is_some() {
            sql.push_str(" AND source LIKE ?");
        }
        sql.push_str(" ORDER BY id");

        let mut query = sqlx::query(&sql);
        if let Some(title) = &filter.title {
            query = query.bind(format!("%{}%", title));
        }
        if let Some(source) = &filter.source {
            query = query.bind(format!("%{}%", source));
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Storage(e.to_string()))?;

        rows.iter().map(row_to_record).collect()
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM news WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Storage(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
