use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{BlogPost, NewPost, PostChanges};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity. Fails with `Constraint` if the ID is taken.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;

    /// Delete every entity, returning how many were removed.
    async fn delete_all(&self) -> Result<u64, RepoError>;
}

/// Post store.
#[async_trait]
pub trait PostRepository: BaseRepository<BlogPost, Uuid> {
    /// Every stored post, oldest first (ties broken by id).
    async fn list_all(&self) -> Result<Vec<BlogPost>, RepoError>;

    /// Replace the supplied fields of the post with `id`.
    ///
    /// Returns `RepoError::NotFound` if no such post exists.
    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<BlogPost, RepoError>;

    /// Assign an id and creation time, then persist.
    async fn create(&self, new_post: NewPost) -> Result<BlogPost, RepoError> {
        self.insert(BlogPost::new(new_post)).await
    }

    /// Create several posts at once. Used for seeding.
    async fn insert_many(&self, posts: Vec<NewPost>) -> Result<Vec<BlogPost>, RepoError> {
        let mut created = Vec::with_capacity(posts.len());
        for post in posts {
            created.push(self.create(post).await?);
        }
        Ok(created)
    }

    /// Remove every post. Used for teardown.
    async fn clear(&self) -> Result<u64, RepoError> {
        self.delete_all().await
    }

    /// Check the backing store is reachable.
    async fn ping(&self) -> Result<(), RepoError> {
        Ok(())
    }
}
