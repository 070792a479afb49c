//! Post entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::{FromJsonQueryResult, Set};
use serde::{Deserialize, Serialize};

use blog_core::domain::{Author, BlogPost};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub author: AuthorDocument,
    pub created: DateTimeWithTimeZone,
}

/// The `author` sub-document, stored as JSONB.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDocument {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<AuthorDocument> for Author {
    fn from(doc: AuthorDocument) -> Self {
        Author::new(doc.first_name, doc.last_name)
    }
}

impl From<Author> for AuthorDocument {
    fn from(author: Author) -> Self {
        Self {
            first_name: author.first_name,
            last_name: author.last_name,
        }
    }
}

/// Conversion from SeaORM Model to Domain BlogPost.
impl From<Model> for BlogPost {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            content: model.content,
            author: model.author.into(),
            created: model.created.into(),
        }
    }
}

/// Conversion from Domain BlogPost to SeaORM ActiveModel.
impl From<BlogPost> for ActiveModel {
    fn from(post: BlogPost) -> Self {
        Self {
            id: Set(post.id),
            title: Set(post.title),
            content: Set(post.content),
            author: Set(post.author.into()),
            created: Set(post.created.into()),
        }
    }
}
