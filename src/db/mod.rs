//! Document store connection handling.
//!
//! Wraps the MongoDB client together with the transaction capability of the
//! deployment, resolved once at startup instead of probed per operation.

use mongodb::bson::doc;
use mongodb::{Client, ClientSession, Collection, Database};

use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};
use crate::models::{Role, User};
use crate::utils::password::hash_password;

/// Handle to the document store.
///
/// `Client` uses `Arc` internally, so cloning is cheap and `Store` can be
/// carried by value inside repositories and application state.
#[derive(Clone)]
pub struct Store {
    client: Client,
    database: Database,
    supports_transactions: bool,
}

impl Store {
    /// Connects to the store and probes the deployment topology.
    ///
    /// Multi-document transactions need a replica set; the probe result is
    /// cached for the lifetime of the process so mutating operations do not
    /// pay an extra round trip per call.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let client = Client::with_uri_str(&config.uri)
            .await
            .map_err(|e| AppError::database("connect", e))?;
        let database = client.database(&config.name);
        let supports_transactions = is_replica_set(&database).await?;

        Ok(Self {
            client,
            database,
            supports_transactions,
        })
    }

    /// Returns a typed handle to a named collection.
    pub fn collection<T>(&self, name: &str) -> Collection<T>
    where
        T: Send + Sync,
    {
        self.database.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Whether the deployment supports multi-document transactions.
    pub fn supports_transactions(&self) -> bool {
        self.supports_transactions
    }

    /// Starts a client session for transactional work.
    pub async fn start_session(&self) -> AppResult<ClientSession> {
        self.client
            .start_session()
            .await
            .map_err(|e| AppError::database("start session", e))
    }
}

/// Probes whether the deployment is a replica set. A standalone node reports
/// no `setName` in its hello response.
async fn is_replica_set(database: &Database) -> AppResult<bool> {
    let reply = database
        .run_command(doc! { "hello": 1 })
        .await
        .map_err(|e| AppError::database("topology probe", e))?;

    Ok(reply.get_str("setName").is_ok())
}

/// Wipes the users collection and inserts a default admin and customer
/// account. Intended for development and test bootstrap only.
pub async fn seed_users(store: &Store) -> AppResult<()> {
    let users: Collection<User> = store.collection("users");

    users
        .delete_many(doc! {})
        .await
        .map_err(|e| AppError::database("seed: clear users", e))?;

    let accounts = vec![
        User::new(
            "Admin User".to_string(),
            "admin@example.com".to_string(),
            hash_password("adminpassword")?,
            Role::Admin,
            None,
            None,
        ),
        User::new(
            "Customer User".to_string(),
            "customer@example.com".to_string(),
            hash_password("customerpassword")?,
            Role::Customer,
            None,
            None,
        ),
    ];

    users
        .insert_many(accounts)
        .await
        .map_err(|e| AppError::database("seed: insert users", e))?;

    tracing::info!("Users seeded successfully");
    Ok(())
}
