use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Author of a post, stored as a nested sub-document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub first_name: String,
    pub last_name: String,
}

impl Author {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Display form used on the wire: `"First Last"`, trimmed.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Blog post entity.
///
/// `id` and `created` are assigned once, by [`BlogPost::new`], and never
/// change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author: Author,
    pub created: DateTime<Utc>,
}

impl BlogPost {
    /// Create a post with a fresh id and creation timestamp.
    ///
    /// The timestamp is truncated to milliseconds, the precision it is
    /// rendered with.
    pub fn new(new_post: NewPost) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: new_post.title,
            content: new_post.content,
            author: new_post.author,
            created: Utc::now().trunc_subsecs(3),
        }
    }

    /// Replace the fields present in `changes`.
    pub fn apply(&mut self, changes: PostChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
        if let Some(author) = changes.author {
            self.author = author;
        }
    }
}

/// Input for creating a post.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author: Author,
}

impl NewPost {
    pub fn new(title: impl Into<String>, content: impl Into<String>, author: Author) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            author,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        require_text("title", &self.title)?;
        require_text("content", &self.content)
    }
}

/// Partial update of a post. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<Author>,
}

impl PostChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.author.is_none()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(title) = &self.title {
            require_text("title", title)?;
        }
        if let Some(content) = &self.content {
            require_text("content", content)?;
        }
        Ok(())
    }
}

fn require_text(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("`{}` must not be empty", field)));
    }
    Ok(())
}
