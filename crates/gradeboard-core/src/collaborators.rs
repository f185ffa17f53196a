//! External collaborator seams
//!
//! Persistence and authentication are owned elsewhere; the core only needs
//! these traits to fetch a snapshot for a caller it can trust. Every board
//! operation is ownership-scoped: the store answers as if boards belonging
//! to other users did not exist.

use crate::error::{AuthError, BoardStoreError};
use crate::types::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A board with its current document snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    /// Board id
    pub id: Uuid,
    /// User-visible title
    pub title: String,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
    /// Raw editor snapshot
    pub snapshot: Value,
}

/// Listing row without the snapshot payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSummary {
    /// Board id
    pub id: Uuid,
    /// User-visible title
    pub title: String,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// Row-oriented board persistence, reached by id and owner.
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// Create an empty board for `owner`.
    async fn create(&self, owner: &UserId, title: &str) -> Result<Board, BoardStoreError>;

    /// All of `owner`'s boards, most recently updated first.
    async fn list(&self, owner: &UserId) -> Result<Vec<BoardSummary>, BoardStoreError>;

    /// One board with its snapshot.
    async fn get(&self, owner: &UserId, board_id: Uuid) -> Result<Board, BoardStoreError>;

    /// Replace a board's snapshot and touch its timestamp.
    async fn save_snapshot(
        &self,
        owner: &UserId,
        board_id: Uuid,
        snapshot: Value,
    ) -> Result<(), BoardStoreError>;

    /// Retitle a board.
    async fn rename(&self, owner: &UserId, board_id: Uuid, title: &str) -> Result<(), BoardStoreError>;

    /// Delete a board and its snapshot.
    async fn delete(&self, owner: &UserId, board_id: Uuid) -> Result<(), BoardStoreError>;
}

/// Session-to-identity resolution, owned by the auth collaborator.
#[async_trait]
pub trait Identity: Send + Sync {
    /// The authenticated caller, or [`AuthError::Unauthenticated`].
    async fn current_user(&self) -> Result<UserId, AuthError>;
}
