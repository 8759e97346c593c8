//! SQLite persistence layer for Frontdesk.
//!
//! This crate provides async database operations for agents, calls,
//! transcripts, users and billing records using SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{Database, agent::NewAgent, agent};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:frontdesk.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Create an agent
//!     let agent = agent::create_agent(db.pool(), &NewAgent::named("Reception")).await?;
//!     println!("created agent {}", agent.id);
//!
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod call;
pub mod document;
pub mod error;
pub mod models;
pub mod phone_number;
pub mod setting;
pub mod transaction;
pub mod transcript;
pub mod user;

pub use error::{DatabaseError, Result};
pub use models::{
    Agent, AgentDocument, Call, PhoneNumber, Transaction, TranscriptEntry, User,
};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Current wall-clock time as epoch milliseconds.
///
/// Call and transcript timestamps are stored as epoch ms so the turn
/// controller can do duration arithmetic and transcript ordering keeps
/// sub-second resolution.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    /// Webhook turns for concurrent calls each hold a connection briefly.
    const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/frontdesk.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect("sqlite::memory:").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::NewAgent;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_agent_crud() {
        let db = test_db().await;

        // Create
        let agent = agent::create_agent(db.pool(), &NewAgent::named("Reception"))
            .await
            .unwrap();
        assert_eq!(agent.name, "Reception");
        assert_eq!(agent.max_wait_secs, 10);

        // Read
        let fetched = agent::get_agent(db.pool(), agent.id).await.unwrap();
        assert_eq!(fetched, agent);

        // Update
        let mut updated = agent.clone();
        updated.prompt = "You are a receptionist.".to_string();
        agent::update_agent(db.pool(), &updated).await.unwrap();
        let fetched = agent::get_agent(db.pool(), agent.id).await.unwrap();
        assert_eq!(fetched.prompt, "You are a receptionist.");

        // List
        let agents = agent::list_agents(db.pool()).await.unwrap();
        assert_eq!(agents.len(), 1);

        // Delete
        agent::delete_agent(db.pool(), agent.id).await.unwrap();
        let result = agent::get_agent(db.pool(), agent.id).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_agent_delete_cascades() {
        let db = test_db().await;
        let pool = db.pool();

        let agent = agent::create_agent(pool, &NewAgent::named("Front desk"))
            .await
            .unwrap();
        document::add_document(pool, agent.id, "hours", "Open 9-5").await.unwrap();
        let number = phone_number::create_number(pool, "+15550001111", "Main line")
            .await
            .unwrap();
        phone_number::bind_to_agent(pool, number.id, agent.id).await.unwrap();

        // A staff account scoped to this agent alone goes with it.
        let staff = user::create_user(
            pool,
            &user::NewUser {
                email: "staff@example.com".to_string(),
                password_hash: "x".to_string(),
                name: "Staff".to_string(),
                role: "staff".to_string(),
                assigned_agent_id: Some(agent.id),
                plan: "STARTER".to_string(),
            },
        )
        .await
        .unwrap();

        agent::delete_agent(pool, agent.id).await.unwrap();

        let number = phone_number::get_number(pool, number.id).await.unwrap();
        assert_eq!(number.agent_id, None);
        assert!(document::list_documents(pool, agent.id).await.unwrap().is_empty());
        assert!(matches!(
            user::get_user(pool, staff.id).await,
            Err(DatabaseError::NotFound { .. })
        ));
    }
}
