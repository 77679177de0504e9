pub mod client;
pub mod memory;
mod record;

use async_trait::async_trait;
use nn_chat_common::model::{
    Id, ModelValidationError,
    post::{CreatePost, Post, PostMarker},
};
use thiserror::Error;

pub type Result<T, E = DbError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("An object in the database was invalid: {0}")]
    Data(#[from] ModelValidationError),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error("Running migrations failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Persistence of posts. Identifiers and creation times are assigned here.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// All posts in ascending identifier order.
    async fn list_posts(&self) -> Result<Vec<Post>>;

    async fn create_post(&self, post: &CreatePost) -> Result<Post>;

    async fn fetch_post(&self, post_id: Id<PostMarker>) -> Result<Option<Post>>;

    /// Returns whether a post was removed.
    async fn delete_post(&self, post_id: Id<PostMarker>) -> Result<bool>;
}
