use std::str::FromStr;
use anyhow::Result;
use shared::{PostId, VoteDirection};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Error, Pool, Sqlite};
use tracing::{debug, info};

const SCHEMA: &str = include_str!("../data/schema.sql");

#[derive(Debug)]
pub struct DatabaseConnection {
    database: Pool<Sqlite>,
}

#[derive(Debug, PartialEq)]
pub enum DbResponse<T> {
    Ok(T),
    Err,
}

impl DatabaseConnection {
    pub async fn new(db_path: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(db_path)?.create_if_missing(true);

        // sqlite creates the file but not the directories leading to it.
        if let Some(dir) = options.clone().get_filename().parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }

        let database = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        Self::with_pool(database).await
    }

    async fn with_pool(database: Pool<Sqlite>) -> Result<Self> {
        sqlx::query(SCHEMA).execute(&database).await?;
        info!("Database schema ready");

        Ok(Self { database })
    }

    /// Creates the post with no votes. Existing posts keep their count.
    pub async fn create_post(&self, post: &PostId) -> Result<i64> {
        sqlx::query("INSERT INTO posts (id) VALUES (?) ON CONFLICT(id) DO NOTHING")
            .bind(post.as_str())
            .execute(&self.database)
            .await?;

        match self.get_upvotes(post).await? {
            DbResponse::Ok(v) => Ok(v),
            DbResponse::Err => Err(anyhow::anyhow!("Post {post} vanished after insert")),
        }
    }

    pub async fn get_upvotes(&self, post: &PostId) -> Result<DbResponse<i64>> {
        let query: Result<(i64,), _> = sqlx::query_as("SELECT upvotes FROM posts WHERE id = ?")
            .bind(post.as_str())
            .fetch_one(&self.database)
            .await;

        match query {
            Ok(v) => Ok(DbResponse::Ok(v.0)),
            Err(Error::RowNotFound) => Ok(DbResponse::Err),
            Err(e) => Err(anyhow::Error::from(e)),
        }
    }

    /// Adds the vote in a single statement and returns the new count.
    pub async fn apply_vote(&self, post: &PostId, direction: VoteDirection) -> Result<DbResponse<i64>> {
        let row: Option<(i64,)> =
            sqlx::query_as("UPDATE posts SET upvotes = upvotes + ? WHERE id = ? RETURNING upvotes")
                .bind(direction.delta())
                .bind(post.as_str())
                .fetch_optional(&self.database)
                .await?;

        debug!("{direction} on post {post}: {row:?}");

        Ok(match row {
            Some(v) => DbResponse::Ok(v.0),
            None => DbResponse::Err,
        })
    }

    #[cfg(test)]
    pub async fn in_memory() -> Self {
        // A single connection, since every sqlite memory connection is its own database.
        let database = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        Self::with_pool(database).await.unwrap()
    }
}
