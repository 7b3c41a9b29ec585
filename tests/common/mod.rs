//! Shared utilities for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use avatar_server::config::AvatarConfig;
use avatar_server::convert::{ConversionAdapter, ConvertError, EncodeOptions, GltfWriter, ModelFormat};
use avatar_server::lifecycle::startup::{assemble, pipeline_builder};
use avatar_server::lifecycle::Shutdown;
use avatar_server::model::ModelDocument;
use avatar_server::pipeline::PipelineBuilder;
use bytes::Bytes;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// A running server on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a server with default converters.
pub async fn start_server(config: AvatarConfig) -> TestServer {
    start_server_with(config, |builder| builder).await
}

/// Start a server after letting the caller adjust the pipeline.
pub async fn start_server_with<F>(mut config: AvatarConfig, customize: F) -> TestServer
where
    F: FnOnce(PipelineBuilder) -> PipelineBuilder,
{
    config.listener.bind_address = "127.0.0.1:0".into();
    let builder = customize(pipeline_builder(&config).unwrap());
    let server = assemble(config, builder).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Writes glTF JSON after an optional delay, counting calls.
#[derive(Debug, Default)]
pub struct CountingAdapter {
    pub calls: AtomicUsize,
    pub delay: Duration,
}

impl CountingAdapter {
    pub fn with_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            delay,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConversionAdapter for CountingAdapter {
    async fn encode(&self, model: ModelDocument, options: EncodeOptions) -> Result<Bytes, ConvertError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        GltfWriter.encode(model, options).await
    }
}

/// Fails while `failing` is set, then behaves like [`GltfWriter`].
#[derive(Debug)]
pub struct FlakyAdapter {
    pub failing: AtomicBool,
    pub calls: AtomicUsize,
}

impl FlakyAdapter {
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            failing: AtomicBool::new(true),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn recover(&self) {
        self.failing.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl ConversionAdapter for FlakyAdapter {
    async fn encode(&self, model: ModelDocument, options: EncodeOptions) -> Result<Bytes, ConvertError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(ConvertError::Worker("injected failure".into()));
        }
        GltfWriter.encode(model, options).await
    }
}

/// Attach `adapter` as the glTF converter.
pub fn gltf_adapter(adapter: Arc<dyn ConversionAdapter>) -> impl FnOnce(PipelineBuilder) -> PipelineBuilder {
    move |builder| builder.adapter(ModelFormat::Gltf, adapter)
}
