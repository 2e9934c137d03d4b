//! Per-request database sessions.
//!
//! A [`Session`] is one connection handed to one request. Dropping it gives the connection back,
//! whichever way the handler exits. [`SessionProvider`] is the seam: production uses
//! [`PoolSessions`], tests hand in a single connection through [`SharedSession`].

use crate::error::AppError;
use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, SqliteConnection, SqlitePool};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

pub enum Session {
    Pooled(PoolConnection<Sqlite>),
    Shared(OwnedMutexGuard<SqliteConnection>),
}

impl Deref for Session {
    type Target = SqliteConnection;

    fn deref(&self) -> &SqliteConnection {
        match self {
            Session::Pooled(c) => &**c,
            Session::Shared(g) => &**g,
        }
    }
}

impl DerefMut for Session {
    fn deref_mut(&mut self) -> &mut SqliteConnection {
        match self {
            Session::Pooled(c) => &mut **c,
            Session::Shared(g) => &mut **g,
        }
    }
}

#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn open(&self) -> Result<Session, AppError>;
}

/// Checks a fresh connection out of the pool for every request.
#[derive(Clone)]
pub struct PoolSessions {
    pool: SqlitePool,
}

impl PoolSessions {
    pub fn new(pool: SqlitePool) -> Self {
        PoolSessions { pool }
    }
}

#[async_trait]
impl SessionProvider for PoolSessions {
    async fn open(&self) -> Result<Session, AppError> {
        let conn = self.pool.acquire().await?;
        Ok(Session::Pooled(conn))
    }
}

/// Hands every request the same caller-supplied connection, one request at a time.
/// Needed for `sqlite::memory:`, where each new connection would see an empty database.
#[derive(Clone)]
pub struct SharedSession {
    conn: Arc<Mutex<SqliteConnection>>,
}

impl SharedSession {
    pub fn new(conn: SqliteConnection) -> Self {
        SharedSession {
            conn: Arc::new(Mutex::new(conn)),
        }
    }
}

#[async_trait]
impl SessionProvider for SharedSession {
    async fn open(&self) -> Result<Session, AppError> {
        Ok(Session::Shared(self.conn.clone().lock_owned().await))
    }
}
