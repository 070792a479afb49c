//! HTTP scenarios shared by the in-memory and PostgreSQL suites.
//!
//! Each scenario expects an empty store and leaves whatever it created behind.

#![allow(dead_code)]

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};
use uuid::Uuid;

use api_server::{AppState, configure_routes};
use blog_core::domain::{Author, BlogPost, NewPost};

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

const AUTHORS: [(&str, &str); 4] = [
    ("Ada", "Lovelace"),
    ("Grace", "Hopper"),
    ("Alan", "Turing"),
    ("Barbara", "Liskov"),
];

/// Blog posts for seeding.
pub fn sample_posts(count: usize) -> Vec<NewPost> {
    (0..count)
        .map(|i| {
            let (first, last) = AUTHORS[i % AUTHORS.len()];
            NewPost::new(
                format!("Post number {}", i + 1),
                format!("Body of post {}.\nIt spans more than one line.", i + 1),
                Author::new(first, last),
            )
        })
        .collect()
}

pub async fn seed(state: &AppState, count: usize) -> Vec<BlogPost> {
    state
        .posts
        .insert_many(sample_posts(count))
        .await
        .expect("seeding posts")
}

async fn stored_count(state: &AppState) -> usize {
    state.posts.list_all().await.expect("listing posts").len()
}

fn assert_post_shape(value: &Value) {
    for key in ["id", "author", "content", "title", "created"] {
        assert!(value.get(key).is_some(), "missing `{}` in {}", key, value);
    }
    assert!(value["author"].is_string(), "author should be a display name");
}

pub async fn list_returns_every_post(state: AppState) {
    let seeded = seed(&state, 5).await;
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/posts").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Vec<Value> = test::read_body_json(resp).await;
    assert_eq!(body.len(), seeded.len());
    body.iter().for_each(assert_post_shape);

    for post in &seeded {
        let listed = body
            .iter()
            .find(|v| v["id"] == post.id.to_string())
            .expect("seeded post should be listed");
        assert_eq!(listed["title"], post.title);
        assert_eq!(listed["content"], post.content);
        assert_eq!(listed["author"], post.author.full_name());
    }
}

pub async fn list_empty_store(state: AppState) {
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/posts").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Vec<Value> = test::read_body_json(resp).await;
    assert!(body.is_empty());
}

pub async fn get_returns_single_post(state: AppState) {
    let seeded = seed(&state, 3).await;
    let post = &seeded[1];
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}", post.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_post_shape(&body);
    assert_eq!(body["id"], post.id.to_string());
    assert_eq!(body["title"], post.title);
    assert_eq!(body["content"], post.content);
    assert_eq!(body["author"], post.author.full_name());
}

pub async fn get_missing_post_is_404(state: AppState) {
    seed(&state, 2).await;
    let app = init_app!(state);

    for uri in [format!("/posts/{}", Uuid::new_v4()), "/posts/not-an-id".to_string()] {
        let req = test::TestRequest::get().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "GET {}", uri);

        let body = test::read_body(resp).await;
        assert!(body.is_empty());
    }
}

pub async fn create_then_get(state: AppState) {
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(json!({
            "title": "Hello",
            "content": "World",
            "author": {"firstName": "Ada", "lastName": "Lovelace"}
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let created: Value = test::read_body_json(resp).await;
    assert_post_shape(&created);
    assert_eq!(created["title"], "Hello");
    assert_eq!(created["content"], "World");
    assert_eq!(created["author"], "Ada Lovelace");

    let id = created["id"].as_str().expect("id should be a string");
    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let fetched: Value = test::read_body_json(resp).await;
    assert_eq!(fetched, created);
    assert_eq!(stored_count(&state).await, 1);
}

pub async fn create_requires_fields(state: AppState) {
    let app = init_app!(state);
    let complete = json!({
        "title": "Hello",
        "content": "World",
        "author": {"firstName": "Ada", "lastName": "Lovelace"}
    });

    for field in ["title", "content", "author"] {
        let mut body = complete.clone();
        body.as_object_mut().unwrap().remove(field);

        let req = test::TestRequest::post()
            .uri("/posts")
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "without {}", field);

        let problem: Value = test::read_body_json(resp).await;
        assert_eq!(problem["status"], 400);
        assert_eq!(
            problem["detail"],
            format!("Missing `{}` in request body", field)
        );
    }

    assert_eq!(stored_count(&state).await, 0);
}

pub async fn create_rejects_malformed_body(state: AppState) {
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/posts")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"title\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(json!({"title": " ", "content": "World", "author": {}}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert_eq!(stored_count(&state).await, 0);
}

pub async fn update_replaces_fields(state: AppState) {
    let seeded = seed(&state, 2).await;
    let post = &seeded[0];
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}", post.id))
        .to_request();
    let before: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::put()
        .uri(&format!("/posts/{}", post.id))
        .set_json(json!({
            "id": post.id.to_string(),
            "title": "Updated title",
            "content": "Updated content",
            "author": {"firstName": "Edsger", "lastName": "Dijkstra"}
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(test::read_body(resp).await.is_empty());

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}", post.id))
        .to_request();
    let after: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(after["id"], before["id"]);
    assert_eq!(after["created"], before["created"]);
    assert_eq!(after["title"], "Updated title");
    assert_eq!(after["content"], "Updated content");
    assert_eq!(after["author"], "Edsger Dijkstra");

    // Untouched sibling.
    let other = state.posts.find_by_id(seeded[1].id).await.unwrap().unwrap();
    assert_eq!(other, seeded[1]);
}

pub async fn update_partial_keeps_other_fields(state: AppState) {
    let seeded = seed(&state, 1).await;
    let post = &seeded[0];
    let app = init_app!(state);

    let req = test::TestRequest::put()
        .uri(&format!("/posts/{}", post.id))
        .set_json(json!({"id": post.id.to_string(), "title": "Only the title"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let stored = state.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Only the title");
    assert_eq!(stored.content, post.content);
    assert_eq!(stored.author, post.author);
    assert_eq!(stored.created, post.created);
}

pub async fn update_rejects_id_mismatch(state: AppState) {
    let seeded = seed(&state, 1).await;
    let post = &seeded[0];
    let app = init_app!(state);

    for body in [
        json!({"id": Uuid::new_v4().to_string(), "title": "Nope"}),
        json!({"title": "Nope"}),
    ] {
        let req = test::TestRequest::put()
            .uri(&format!("/posts/{}", post.id))
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let problem: Value = test::read_body_json(resp).await;
        let detail = problem["detail"].as_str().unwrap();
        assert!(detail.contains("must match"), "{}", detail);
    }

    let stored = state.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.title, post.title);
}

pub async fn update_missing_post_is_404(state: AppState) {
    let app = init_app!(state);
    let id = Uuid::new_v4();

    let req = test::TestRequest::put()
        .uri(&format!("/posts/{}", id))
        .set_json(json!({"id": id.to_string(), "title": "Ghost"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(stored_count(&state).await, 0);
}

pub async fn delete_removes_post(state: AppState) {
    let seeded = seed(&state, 3).await;
    let post = &seeded[2];
    let app = init_app!(state);

    let req = test::TestRequest::delete()
        .uri(&format!("/posts/{}", post.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(test::read_body(resp).await.is_empty());

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}", post.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    assert_eq!(stored_count(&state).await, 2);
}

pub async fn delete_missing_post_is_404(state: AppState) {
    seed(&state, 2).await;
    let app = init_app!(state);

    let req = test::TestRequest::delete()
        .uri(&format!("/posts/{}", Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    assert_eq!(stored_count(&state).await, 2);
}

pub async fn health_reports_store(state: AppState, expected_store: &str) {
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], expected_store);
}

pub async fn non_json_content_type_is_400(state: AppState) {
    let seeded = seed(&state, 1).await;
    let post = &seeded[0];
    let app = init_app!(state);

    let payload = json!({
        "id": post.id.to_string(),
        "title": "Hello",
        "content": "World",
        "author": {"firstName": "Ada", "lastName": "Lovelace"}
    })
    .to_string();

    let req = test::TestRequest::post()
        .uri("/posts")
        .insert_header(("content-type", "text/plain"))
        .set_payload(payload.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let problem: Value = test::read_body_json(resp).await;
    assert_eq!(problem["status"], 400);

    let req = test::TestRequest::put()
        .uri(&format!("/posts/{}", post.id))
        .insert_header(("content-type", "text/plain"))
        .set_payload(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert_eq!(stored_count(&state).await, 1);
    let stored = state.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(&stored, post);
}

pub async fn update_rejects_malformed_body(state: AppState) {
    let seeded = seed(&state, 1).await;
    let post = &seeded[0];
    let app = init_app!(state);

    let req = test::TestRequest::put()
        .uri(&format!("/posts/{}", post.id))
        .insert_header(("content-type", "application/json"))
        .set_payload(format!("{{\"id\": \"{}\", \"title\": ", post.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let problem: Value = test::read_body_json(resp).await;
    assert_eq!(problem["title"], "Bad Request");

    let stored = state.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(&stored, post);
}

pub async fn create_rejects_null_author(state: AppState) {
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(json!({"title": "Hello", "content": "World", "author": null}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let problem: Value = test::read_body_json(resp).await;
    assert_eq!(problem["detail"], "Missing `author` in request body");
    assert_eq!(stored_count(&state).await, 0);
}

pub async fn delete_missing_upper_case_id_is_404(state: AppState) {
    seed(&state, 1).await;
    let app = init_app!(state);

    let req = test::TestRequest::delete()
        .uri(&format!("/posts/{}", Uuid::new_v4().to_string().to_uppercase()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    assert_eq!(stored_count(&state).await, 1);
}
