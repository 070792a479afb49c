//! PostgreSQL post store.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, QueryOrder, Set};
use uuid::Uuid;

use blog_core::domain::{BlogPost, NewPost, PostChanges};
use blog_core::error::RepoError;
use blog_core::ports::PostRepository;

use super::entity::post::{self, Entity as PostEntity};
use super::postgres_base::{PostgresBaseRepository, query_error, write_error};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list_all(&self) -> Result<Vec<BlogPost>, RepoError> {
        let result = PostEntity::find()
            .order_by_asc(post::Column::Created)
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<BlogPost, RepoError> {
        let model = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_error)?
            .ok_or(RepoError::NotFound)?;

        if changes.is_empty() {
            return Ok(model.into());
        }

        let mut active = model.into_active_model();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(content) = changes.content {
            active.content = Set(content);
        }
        if let Some(author) = changes.author {
            active.author = Set(author.into());
        }

        tracing::debug!(post_id = %id, "Updating post");
        let updated = active.update(&self.db).await.map_err(query_error)?;
        Ok(updated.into())
    }

    async fn insert_many(&self, posts: Vec<NewPost>) -> Result<Vec<BlogPost>, RepoError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let created: Vec<BlogPost> = posts.into_iter().map(BlogPost::new).collect();
        let models = created.iter().cloned().map(post::ActiveModel::from);

        let inserted = PostEntity::insert_many(models)
            .exec_without_returning(&self.db)
            .await
            .map_err(write_error)?;

        tracing::debug!(count = inserted, "Inserted posts");
        Ok(created)
    }

    async fn ping(&self) -> Result<(), RepoError> {
        self.db
            .ping()
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))
    }
}
