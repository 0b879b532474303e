//! Shared utilities for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use settings_manager::config::{ServerConfig, StorageBackend};
use settings_manager::document::ConfigDocument;
use settings_manager::http::HttpServer;
use settings_manager::lifecycle::{build_service, Shutdown};
use settings_manager::storage::{MemoryStore, SettingsStore, StorageError};
use settings_manager::ConfigService;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

pub const API_KEY: &str = "test-admin-key";

/// In-memory config with a known admin key.
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.storage.backend = StorageBackend::Memory;
    config.admin.api_key = API_KEY.to_string();
    config
}

/// A running server on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub service: Arc<ConfigService>,
    shutdown: Shutdown,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Trigger graceful shutdown and wait for the server task.
    pub async fn stop(self) {
        self.shutdown.trigger();
        let _ = tokio::time::timeout(Duration::from_secs(5), self.handle).await;
    }
}

pub async fn spawn_server(config: ServerConfig) -> TestServer {
    let service = build_service(&config).unwrap();
    spawn_with_service(config, service).await
}

pub async fn spawn_with_service(config: ServerConfig, service: Arc<ConfigService>) -> TestServer {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    let server = HttpServer::new(&config, service.clone());

    let handle = tokio::spawn(async move {
        server.run(listener, receiver).await.unwrap();
    });

    TestServer {
        addr,
        service,
        shutdown,
        handle,
    }
}

/// Memory store whose reads take `delay` and are counted.
pub struct SlowStore {
    inner: MemoryStore,
    delay: Duration,
    loads: AtomicUsize,
}

impl SlowStore {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MemoryStore::new(),
            delay,
            loads: AtomicUsize::new(0),
        }
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SettingsStore for SlowStore {
    async fn load(&self) -> Result<Option<Value>, StorageError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.inner.load().await
    }

    async fn save(&self, document: &ConfigDocument) -> Result<(), StorageError> {
        tokio::time::sleep(self.delay).await;
        self.inner.save(document).await
    }

    fn describe(&self) -> String {
        "slow-memory".to_string()
    }
}
