//! Common test utilities
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::util::ServiceExt;
use uuid::Uuid;

use transaction_streaming::api::{self, auth::Claims, AppState, PrincipalResolver};
use transaction_streaming::handlers::{EventNotifier, TransactionHandler};
use transaction_streaming::ports::{EventPublisher, PublishError};
use transaction_streaming::repository::InMemoryTransactionRepository;

pub const JWT_SECRET: &str = "integration-test-secret";

/// Publisher that keeps every payload it was given
#[derive(Default)]
pub struct RecordingPublisher {
    published: Mutex<Vec<(String, Value)>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<(String, Value)> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, topic: &str, payload: &Value) -> Result<(), PublishError> {
        self.published
            .lock()
            .unwrap()
            .push((topic.to_string(), payload.clone()));
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub repo: Arc<InMemoryTransactionRepository>,
    pub publisher: Arc<RecordingPublisher>,
    pub user_id: Uuid,
}

/// Full router over the in-memory repository with one registered user
pub fn spawn_app() -> TestApp {
    let user_id = Uuid::new_v4();
    let repo = Arc::new(InMemoryTransactionRepository::with_users([user_id]));
    let publisher = Arc::new(RecordingPublisher::default());

    let handler = TransactionHandler::new(
        repo.clone(),
        EventNotifier::new(publisher.clone(), "transaction_events"),
    );
    let state = AppState::new(handler, PrincipalResolver::new(JWT_SECRET));

    TestApp {
        router: api::build_router(state),
        repo,
        publisher,
        user_id,
    }
}

/// Sign a token whose `sub` is `user_id`
pub fn token_for(user_id: Uuid) -> String {
    let claims = Claims {
        sub: Some(user_id.to_string()),
        email: Some("tester@example.com".to_string()),
        exp: Some((Utc::now() + Duration::hours(1)).timestamp()),
        ..Claims::default()
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

/// Send one request and decode the JSON body (Null when empty)
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let request = builder
        .body(Body::from(body.unwrap_or_default().to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

/// Connect to DATABASE_URL and apply the schema
pub async fn setup_test_db() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    for statement in schema_statements() {
        sqlx::query(&statement)
            .execute(&pool)
            .await
            .expect("Failed to apply schema");
    }

    pool
}

/// Statements of the reference migration, comment lines removed
pub fn schema_statements() -> Vec<String> {
    let schema = include_str!("../../migrations/0001_create_transactions.sql");
    let sql: String = schema
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n");

    sql.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Insert a user row so transactions can reference it
pub async fn seed_user(pool: &PgPool) -> Uuid {
    let user_id = Uuid::new_v4();
    sqlx::query("INSERT INTO users (id, email) VALUES ($1, $2)")
        .bind(user_id)
        .bind(format!("{}@example.test", user_id))
        .execute(pool)
        .await
        .expect("Failed to seed user");
    user_id
}
