#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;

use resource_api::app::{self, AppState};
use resource_api::config::AppConfig;
use resource_api::database::{MemoryResourceStore, Resource, ResourceStore, StoreError};
use resource_api::types::{OwnerKey, ResourceId, UserId};

pub use resource_api::middleware::USER_HEADER;

/// A running server on an ephemeral port plus a client bound to it.
pub struct TestServer {
    pub base_url: String,
    pub client: Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn create(&self, user: &str) -> Result<String> {
        let res = self
            .client
            .post(self.url("/resources"))
            .header(USER_HEADER, user)
            .body("{}")
            .send()
            .await?;
        anyhow::ensure!(res.status() == 201, "create failed with {}", res.status());
        let body = res.json::<Value>().await?;
        body["data"]["id"]
            .as_str()
            .map(String::from)
            .context("missing data.id in create response")
    }

    pub async fn get(&self, user: &str, path: &str) -> Result<Response> {
        Ok(self
            .client
            .get(self.url(path))
            .header(USER_HEADER, user)
            .send()
            .await?)
    }
}

pub async fn spawn_server() -> Result<TestServer> {
    spawn_with_store(Arc::new(MemoryResourceStore::new()), AppConfig::from_lookup(|_| None)).await
}

pub async fn spawn_with_store(
    store: Arc<dyn ResourceStore>,
    config: AppConfig,
) -> Result<TestServer> {
    let state = Arc::new(AppState::new(store, &config));
    let app = app::router(state, &config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind test listener")?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        let _ = axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await;
    });

    Ok(TestServer {
        base_url: format!("http://{}", addr),
        client: Client::new(),
    })
}

/// Store that fails every operation with a fixed message.
pub struct FailingStore;

const FAILURE: &str = "connection refused";

#[async_trait]
impl ResourceStore for FailingStore {
    async fn list(&self, _: &UserId, _: i64, _: i64) -> Result<Vec<Resource>, StoreError> {
        Err(StoreError::Connection(FAILURE.into()))
    }
    async fn get(&self, _: OwnerKey<'_>) -> Result<Option<Resource>, StoreError> {
        Err(StoreError::Connection(FAILURE.into()))
    }
    async fn insert(&self, _: &UserId, _: &Resource) -> Result<(), StoreError> {
        Err(StoreError::Connection(FAILURE.into()))
    }
    async fn update(&self, _: &UserId, _: &Resource) -> Result<u64, StoreError> {
        Err(StoreError::Connection(FAILURE.into()))
    }
    async fn delete(&self, _: OwnerKey<'_>) -> Result<u64, StoreError> {
        Err(StoreError::Connection(FAILURE.into()))
    }
    async fn exists(&self, _: &ResourceId) -> Result<bool, StoreError> {
        Err(StoreError::Connection(FAILURE.into()))
    }
    async fn ping(&self) -> Result<(), StoreError> {
        Err(StoreError::Connection(FAILURE.into()))
    }
}
