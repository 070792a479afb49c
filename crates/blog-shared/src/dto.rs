//! Data Transfer Objects - request/response types for the API.
//!
//! Request fields are optional so that a missing field can be reported as a
//! 400 with a precise message instead of a generic deserialization error.

use serde::{Deserialize, Serialize};

/// Nested author document as sent by clients.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorPayload {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Request to create a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<AuthorPayload>,
}

/// Request to update a post. `id` must repeat the id in the path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub id: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<AuthorPayload>,
}

/// Response representation of a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: String,
    /// Author display name, `"First Last"`.
    pub author: String,
    pub content: String,
    pub title: String,
    /// ISO-8601 UTC timestamp with millisecond precision.
    pub created: String,
}
