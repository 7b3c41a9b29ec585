//! Memoized avatar generation.

use bytes::Bytes;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use thiserror::Error;

use crate::cache::{GenerationCache, DEFAULT_CAPACITY};
use crate::convert::{ConversionAdapter, ConvertError, EncodeOptions, GlbPackager, GltfWriter, ModelFormat};
use crate::model::{customize, ModelTemplate};
use crate::observability::metrics;
use crate::palette::Palette;
use crate::params::{normalize, CacheKey, CanonicalParams};

type ConversionResult = Result<Bytes, Arc<ConvertError>>;
type PendingArtifact = Shared<BoxFuture<'static, ConversionResult>>;

/// How a request was served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Served from the cache.
    Hit,
    /// This request started the conversion.
    Miss,
    /// Waited on a conversion started by another request.
    Joined,
}

impl CacheStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CacheStatus::Hit => "hit",
            CacheStatus::Miss => "miss",
            CacheStatus::Joined => "joined",
        }
    }
}

/// A generated (or cached) artifact.
#[derive(Debug, Clone)]
pub struct Generated {
    pub format: ModelFormat,
    pub key: CacheKey,
    pub bytes: Bytes,
    pub status: CacheStatus,
}

/// Errors that terminate a single generation request.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no converter registered for format {0}")]
    UnsupportedFormat(ModelFormat),

    #[error("conversion of {key} to {format} failed: {source}")]
    Conversion {
        format: ModelFormat,
        key: CacheKey,
        #[source]
        source: Arc<ConvertError>,
    },
}

/// Cache, converter and in-flight conversions for one output format.
struct Stage {
    adapter: Arc<dyn ConversionAdapter>,
    cache: Mutex<GenerationCache<CacheKey, Bytes>>,
    in_flight: DashMap<CacheKey, PendingArtifact>,
}

impl Stage {
    fn lookup(&self, key: &CacheKey) -> Option<Bytes> {
        let mut cache = self.cache.lock().expect("generation cache mutex poisoned");
        if cache.has(key) {
            cache.get(key).cloned()
        } else {
            None
        }
    }

    fn store(&self, format: ModelFormat, key: CacheKey, bytes: Bytes) {
        let mut cache = self.cache.lock().expect("generation cache mutex poisoned");
        if let Some((evicted, _)) = cache.set(key, bytes) {
            tracing::debug!(format = %format, key = %evicted, "Evicted least recently used model");
        }
        metrics::record_cache_size(format.as_str(), cache.len());
    }
}

struct Inner {
    palette: Arc<Palette>,
    template: Arc<ModelTemplate>,
    options: EncodeOptions,
    coalesce: bool,
    stages: HashMap<ModelFormat, Stage>,
}

impl Inner {
    fn stage(&self, format: ModelFormat) -> Result<&Stage, PipelineError> {
        self.stages
            .get(&format)
            .ok_or(PipelineError::UnsupportedFormat(format))
    }

    /// Customize, encode and, on success, cache.
    async fn convert(&self, format: ModelFormat, key: &CacheKey, params: &CanonicalParams) -> Result<Bytes, ConvertError> {
        let Some(stage) = self.stages.get(&format) else {
            return Err(ConvertError::Unsupported("output format"));
        };

        let start = Instant::now();
        let model = customize(&self.template, params, &self.palette);
        let result = stage.adapter.encode(model, self.options).await;
        metrics::record_conversion(format.as_str(), result.is_ok(), start);

        match &result {
            Ok(bytes) => {
                tracing::info!(
                    format = %format,
                    key = %key,
                    size = bytes.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Generated model"
                );
                stage.store(format, key.clone(), bytes.clone());
            }
            Err(e) => {
                tracing::error!(format = %format, key = %key, error = %e, "Model conversion failed");
            }
        }
        result
    }
}

/// Normalize → cache → customize → convert, shared by all request handlers.
#[derive(Clone)]
pub struct AvatarPipeline {
    inner: Arc<Inner>,
}

impl AvatarPipeline {
    pub fn builder(palette: Arc<Palette>, template: Arc<ModelTemplate>) -> PipelineBuilder {
        PipelineBuilder::new(palette, template)
    }

    pub fn palette(&self) -> &Palette {
        &self.inner.palette
    }

    pub fn template(&self) -> &ModelTemplate {
        &self.inner.template
    }

    /// Adapters registered for formats that cannot honour the configured
    /// compression request.
    pub fn formats_lacking_compression(&self) -> Vec<ModelFormat> {
        if !self.inner.options.compression {
            return Vec::new();
        }
        let mut formats: Vec<ModelFormat> = self
            .inner
            .stages
            .iter()
            .filter(|(_, stage)| !stage.adapter.supports_compression())
            .map(|(format, _)| *format)
            .collect();
        formats.sort_by_key(|f| f.as_str());
        formats
    }

    /// Number of cached artifacts for `format`.
    pub fn cached_len(&self, format: ModelFormat) -> usize {
        self.inner
            .stages
            .get(&format)
            .map(|stage| stage.cache.lock().expect("generation cache mutex poisoned").len())
            .unwrap_or(0)
    }

    /// True if `key` is cached for `format`. Does not affect recency.
    pub fn is_cached(&self, format: ModelFormat, key: &CacheKey) -> bool {
        self.inner
            .stages
            .get(&format)
            .map(|stage| stage.cache.lock().expect("generation cache mutex poisoned").has(key))
            .unwrap_or(false)
    }

    /// Produce the artifact for a raw parameter bag.
    pub async fn generate<I, K, V>(&self, format: ModelFormat, raw: I) -> Result<Generated, PipelineError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let params = normalize(&self.inner.palette, raw);
        let key = params.cache_key();
        let stage = self.inner.stage(format)?;

        if let Some(bytes) = stage.lookup(&key) {
            return Ok(self.served(format, key, bytes, CacheStatus::Hit));
        }

        let (pending, status) = if self.inner.coalesce {
            match stage.in_flight.entry(key.clone()) {
                Entry::Occupied(entry) => (entry.get().clone(), CacheStatus::Joined),
                Entry::Vacant(entry) => {
                    // A conversion may have finished between the lookup and here.
                    if let Some(bytes) = stage.lookup(&key) {
                        drop(entry);
                        return Ok(self.served(format, key, bytes, CacheStatus::Hit));
                    }
                    let pending = self.spawn_conversion(format, key.clone(), params);
                    entry.insert(pending.clone());
                    (pending, CacheStatus::Miss)
                }
            }
        } else {
            (self.spawn_conversion(format, key.clone(), params), CacheStatus::Miss)
        };

        match pending.await {
            Ok(bytes) => Ok(self.served(format, key, bytes, status)),
            Err(source) => Err(PipelineError::Conversion { format, key, source }),
        }
    }

    fn served(&self, format: ModelFormat, key: CacheKey, bytes: Bytes, status: CacheStatus) -> Generated {
        tracing::debug!(format = %format, key = %key, outcome = status.as_str(), "Model served");
        metrics::record_cache_lookup(format.as_str(), status.as_str());
        Generated {
            format,
            key,
            bytes,
            status,
        }
    }

    /// Run the conversion as a detached task and return a joinable handle.
    fn spawn_conversion(&self, format: ModelFormat, key: CacheKey, params: CanonicalParams) -> PendingArtifact {
        let inner = self.inner.clone();
        let handle = tokio::spawn(async move {
            let result = inner.convert(format, &key, &params).await;
            if let Some(stage) = inner.stages.get(&format) {
                stage.in_flight.remove(&key);
            }
            result.map_err(Arc::new)
        });

        async move {
            handle
                .await
                .unwrap_or_else(|e| Err(Arc::new(ConvertError::Worker(e.to_string()))))
        }
        .boxed()
        .shared()
    }
}

impl std::fmt::Debug for AvatarPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvatarPipeline")
            .field("formats", &self.inner.stages.keys().collect::<Vec<_>>())
            .field("options", &self.inner.options)
            .field("coalesce", &self.inner.coalesce)
            .finish()
    }
}

/// Assembles an [`AvatarPipeline`].
///
/// GLB and glTF converters are registered by default; `adapter` replaces
/// the converter for one format.
pub struct PipelineBuilder {
    palette: Arc<Palette>,
    template: Arc<ModelTemplate>,
    capacity: NonZeroUsize,
    options: EncodeOptions,
    coalesce: bool,
    adapters: HashMap<ModelFormat, Arc<dyn ConversionAdapter>>,
}

impl PipelineBuilder {
    pub fn new(palette: Arc<Palette>, template: Arc<ModelTemplate>) -> Self {
        let mut adapters: HashMap<ModelFormat, Arc<dyn ConversionAdapter>> = HashMap::new();
        adapters.insert(ModelFormat::Glb, Arc::new(GlbPackager));
        adapters.insert(ModelFormat::Gltf, Arc::new(GltfWriter));

        Self {
            palette,
            template,
            capacity: NonZeroUsize::new(DEFAULT_CAPACITY).unwrap_or(NonZeroUsize::MIN),
            options: EncodeOptions::default(),
            coalesce: true,
            adapters,
        }
    }

    /// Cache capacity per format.
    pub fn capacity(mut self, capacity: NonZeroUsize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn options(mut self, options: EncodeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn coalesce_in_flight(mut self, coalesce: bool) -> Self {
        self.coalesce = coalesce;
        self
    }

    pub fn adapter(mut self, format: ModelFormat, adapter: Arc<dyn ConversionAdapter>) -> Self {
        self.adapters.insert(format, adapter);
        self
    }

    pub fn build(self) -> AvatarPipeline {
        let capacity = self.capacity;
        let stages = self
            .adapters
            .into_iter()
            .map(|(format, adapter)| {
                let stage = Stage {
                    adapter,
                    cache: Mutex::new(GenerationCache::new(capacity)),
                    in_flight: DashMap::new(),
                };
                (format, stage)
            })
            .collect();

        AvatarPipeline {
            inner: Arc::new(Inner {
                palette: self.palette,
                template: self.template,
                options: self.options,
                coalesce: self.coalesce,
                stages,
            }),
        }
    }
}
