use crate::{PostStore, Result};
use async_trait::async_trait;
use nn_chat_common::model::{
    Id,
    post::{CreatePost, Post, PostMarker},
};
use std::collections::BTreeMap;
use time::UtcDateTime;
use tokio::sync::RwLock;

/// Process-local post storage. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryPostStore {
    inner: RwLock<MemoryPosts>,
}

#[derive(Debug, Default)]
struct MemoryPosts {
    last_id: i64,
    posts: BTreeMap<Id<PostMarker>, Post>,
}

impl MemoryPostStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `post` with an explicit creation time.
    pub async fn create_post_at(&self, post: &CreatePost, created_at: UtcDateTime) -> Result<Post> {
        let mut inner = self.inner.write().await;

        inner.last_id += 1;
        let post = Post {
            id: Id::new(inner.last_id)?,
            content: post.content.clone(),
            posted_by: post.posted_by.clone(),
            created_at,
        };
        inner.posts.insert(post.id, post.clone());

        Ok(post)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.posts.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.posts.is_empty()
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn list_posts(&self) -> Result<Vec<Post>> {
        Ok(self.inner.read().await.posts.values().cloned().collect())
    }

    async fn create_post(&self, post: &CreatePost) -> Result<Post> {
        self.create_post_at(post, UtcDateTime::now()).await
    }

    async fn fetch_post(&self, post_id: Id<PostMarker>) -> Result<Option<Post>> {
        Ok(self.inner.read().await.posts.get(&post_id).cloned())
    }

    async fn delete_post(&self, post_id: Id<PostMarker>) -> Result<bool> {
        Ok(self.inner.write().await.posts.remove(&post_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use crate::{PostStore, memory::MemoryPostStore};
    use nn_chat_common::model::{Id, post::CreatePost, user::UserName};

    fn create(content: &str, user: &str) -> CreatePost {
        CreatePost {
            content: content.to_owned(),
            posted_by: UserName::new(user.to_owned()).unwrap(),
        }
    }

    #[tokio::test]
    async fn ids_ascend_and_are_not_reused() {
        let store = MemoryPostStore::new();

        let first = store.create_post(&create("one", "alice")).await.unwrap();
        let second = store.create_post(&create("two", "bob")).await.unwrap();
        assert!(first.id < second.id);

        assert!(store.delete_post(second.id).await.unwrap());
        let third = store.create_post(&create("three", "alice")).await.unwrap();
        assert!(third.id > second.id);
    }

    #[tokio::test]
    async fn list_in_ascending_order() {
        let store = MemoryPostStore::new();
        for content in ["a", "b", "c", "d"] {
            store.create_post(&create(content, "alice")).await.unwrap();
        }
        let second = Id::new(2).unwrap();
        store.delete_post(second).await.unwrap();

        let posts = store.list_posts().await.unwrap();
        let ids: Vec<i64> = posts.iter().map(|post| post.id.get()).collect();
        assert_eq!(ids, [1, 3, 4]);
        assert_eq!(posts[1].content, "c");
    }

    #[tokio::test]
    async fn fetch_and_delete() {
        let store = MemoryPostStore::new();
        let post = store.create_post(&create("hello", "alice")).await.unwrap();

        assert_eq!(store.fetch_post(post.id).await.unwrap(), Some(post.clone()));
        assert!(store.delete_post(post.id).await.unwrap());
        assert_eq!(store.fetch_post(post.id).await.unwrap(), None);
        assert!(!store.delete_post(post.id).await.unwrap());
        assert!(store.is_empty().await);
    }
}
