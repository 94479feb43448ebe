//! Common test utilities and helpers
//!
//! Builds the real router over a seeded `MemoryStore` and sends JSON
//! requests through it with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use quillpress::backend::auth::sessions::create_token;
use quillpress::backend::server::create_app;
use quillpress::backend::store::MemoryStore;
use quillpress::shared::{AppConfig, Article, User};

pub const TEST_SECRET: &str = "integration-test-secret";

/// A seeded user with a valid bearer token
pub struct TestUser {
    pub user: User,
    pub token: String,
}

impl TestUser {
    pub fn id(&self) -> Uuid {
        self.user.id
    }
}

/// Router plus direct access to its store
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let config = AppConfig::builder()
            .jwt_secret(TEST_SECRET)
            .build()
            .expect("test config");
        let router = create_app(config, store.clone());
        Self { router, store }
    }

    pub async fn user(&self, username: &str, is_author: bool) -> TestUser {
        let user = User::new(username, Some(format!("/avatars/{}.png", username))).with_author(is_author);
        self.store.insert_user(user.clone()).await;
        let token = create_token(user.id, TEST_SECRET).expect("test token");
        TestUser { user, token }
    }

    pub async fn article(&self, title: &str, author: &TestUser) -> Article {
        let article = Article::new(title, "Body", author.id());
        self.store.insert_article(article.clone()).await;
        article
    }

    /// Send a request and decode the JSON response body
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, json)
    }

    /// Create a comment and return the thread from the response
    pub async fn comment(
        &self,
        author: &TestUser,
        article: &Article,
        content: &str,
        parent: Option<&str>,
    ) -> Value {
        let mut body = serde_json::json!({
            "content": content,
            "articleId": article.id.to_string(),
        });
        if let Some(parent) = parent {
            body["parentCommentId"] = Value::String(parent.to_string());
        }

        let (status, json) = self
            .send(Method::POST, "/api/comments", Some(&author.token), Some(body))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", json);
        json["comment"].clone()
    }

    pub async fn threads(&self, article: &Article) -> Vec<Value> {
        let (status, json) = self
            .send(Method::GET, &format!("/api/comments/article/{}", article.id), None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        json.as_array().cloned().unwrap_or_default()
    }
}

/// Id field of a JSON comment node
pub fn id_of(node: &Value) -> String {
    node["id"].as_str().unwrap_or_default().to_string()
}

/// Reply ids of a JSON thread node, in order
pub fn reply_ids(thread: &Value) -> Vec<String> {
    thread["replies"]
        .as_array()
        .map(|replies| replies.iter().map(id_of).collect())
        .unwrap_or_default()
}
