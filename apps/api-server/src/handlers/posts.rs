//! Blog post handlers.

use actix_web::{HttpResponse, web};
use chrono::SecondsFormat;
use uuid::Uuid;

use blog_core::DomainError;
use blog_core::domain::{Author, BlogPost, NewPost, PostChanges};
use blog_shared::dto::{AuthorPayload, CreatePostRequest, PostResponse, UpdatePostRequest};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const ENTITY: &str = "BlogPost";

/// GET /posts
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list_all().await?;
    let body: Vec<PostResponse> = posts.into_iter().map(to_response).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// GET /posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or(DomainError::NotFound {
            entity_type: ENTITY,
            id,
        })?;

    Ok(HttpResponse::Ok().json(to_response(post)))
}

/// POST /posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let title = required("title", req.title)?;
    let content = required("content", req.content)?;
    let author = required("author", req.author)?;

    let new_post = NewPost::new(title, content, to_author(author));
    new_post.validate()?;

    let post = state.posts.create(new_post).await?;
    tracing::info!(post_id = %post.id, "Created post");

    Ok(HttpResponse::Created().json(to_response(post)))
}

/// PUT /posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let path_id = path.into_inner();
    let req = body.into_inner();

    if req.id.as_deref() != Some(path_id.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Request path id ({}) and request body id ({}) must match",
            path_id,
            req.id.as_deref().unwrap_or("missing")
        )));
    }

    let id = parse_id(&path_id)?;
    let changes = PostChanges {
        title: req.title,
        content: req.content,
        author: req.author.map(to_author),
    };
    changes.validate()?;

    state.posts.update(id, changes).await?;
    tracing::info!(post_id = %id, "Updated post");

    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    state.posts.delete(id).await?;
    tracing::info!(post_id = %id, "Deleted post");

    Ok(HttpResponse::NoContent().finish())
}

/// An id that is not a UUID cannot name a stored post.
fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::NotFound(format!("{} with id {} not found", ENTITY, raw)))
}

fn required<T>(field: &str, value: Option<T>) -> AppResult<T> {
    value.ok_or_else(|| AppError::BadRequest(format!("Missing `{}` in request body", field)))
}

fn to_author(payload: AuthorPayload) -> Author {
    Author::new(payload.first_name, payload.last_name)
}

fn to_response(post: BlogPost) -> PostResponse {
    PostResponse {
        id: post.id.to_string(),
        author: post.author.full_name(),
        content: post.content,
        title: post.title,
        created: post.created.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}
