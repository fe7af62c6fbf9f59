//! Asset loading: LRU byte-budgeted cache, retry with backoff, in-flight
//! deduplication, a priority queue for concurrent loads, and format
//! negotiation against browser capabilities.

use std::collections::{HashMap, HashSet, VecDeque};
use std::future::Future;
use std::rc::Rc;
use std::cell::RefCell;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to load {url} after {attempts} attempts: {last}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last: String,
    },
    #[error("timed out waiting for in-flight load of {0}")]
    LoadTimeout(String),
    #[error("loader error: {0}")]
    Loader(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoadPriority {
    Low,
    Medium,
    High,
}

#[derive(Clone, Copy, Debug)]
pub struct LoadConfig {
    pub max_retries: u32,
    /// Bytes charged against the cache budget for this asset.
    pub size_estimate: usize,
    pub priority: LoadPriority,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            size_estimate: 1024 * 1024,
            priority: LoadPriority::Medium,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

struct CacheEntry<A> {
    asset: A,
    size_bytes: usize,
    last_access: u64,
}

/// Byte-budgeted LRU cache. Recency is tracked per access, so a `get` of an
/// old entry protects it from the next eviction sweep.
pub struct AssetCache<A> {
    entries: HashMap<String, CacheEntry<A>>,
    max_bytes: usize,
    current_bytes: usize,
    access_clock: u64,
    stats: CacheStats,
}

impl<A: Clone> AssetCache<A> {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            max_bytes,
            current_bytes: 0,
            access_clock: 0,
            stats: CacheStats::default(),
        }
    }

    pub fn get(&mut self, url: &str) -> Option<A> {
        self.access_clock += 1;
        match self.entries.get_mut(url) {
            Some(entry) => {
                entry.last_access = self.access_clock;
                self.stats.hits += 1;
                Some(entry.asset.clone())
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    /// Insert, evicting least-recently-used entries until the asset fits.
    /// Assets larger than the whole budget are not cached.
    pub fn insert(&mut self, url: impl Into<String>, asset: A, size_bytes: usize) {
        let url = url.into();
        if size_bytes > self.max_bytes {
            log::warn!("asset {url} ({size_bytes} bytes) exceeds cache budget, not caching");
            return;
        }
        if let Some(old) = self.entries.remove(&url) {
            self.current_bytes -= old.size_bytes;
        }
        while self.current_bytes + size_bytes > self.max_bytes {
            let Some(lru) = self
                .entries
                .iter()
                .min_by_key(|(_, e)| e.last_access)
                .map(|(k, _)| k.clone())
            else {
                break;
            };
            if let Some(evicted) = self.entries.remove(&lru) {
                self.current_bytes -= evicted.size_bytes;
                self.stats.evictions += 1;
                log::debug!("evicted asset {lru} ({} bytes)", evicted.size_bytes);
            }
        }
        self.access_clock += 1;
        self.entries.insert(
            url,
            CacheEntry {
                asset,
                size_bytes,
                last_access: self.access_clock,
            },
        );
        self.current_bytes += size_bytes;
    }

    pub fn remove(&mut self, url: &str) {
        if let Some(entry) = self.entries.remove(url) {
            self.current_bytes -= entry.size_bytes;
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.current_bytes = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn used_bytes(&self) -> usize {
        self.current_bytes
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

/// Pure scheduling for concurrent loads: highest priority first, FIFO within
/// a priority, bounded running set. The wasm side drives this by spawning a
/// future per `start_next` result.
pub struct LoadingQueue {
    pending: VecDeque<(String, LoadPriority)>,
    running: HashSet<String>,
    max_concurrent: usize,
}

impl LoadingQueue {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            pending: VecDeque::new(),
            running: HashSet::new(),
            max_concurrent,
        }
    }

    pub fn enqueue(&mut self, url: impl Into<String>, priority: LoadPriority) {
        let url = url.into();
        if self.running.contains(&url) {
            return;
        }
        // Re-enqueuing a pending url at a higher priority promotes it;
        // equal or lower requests are dropped.
        if let Some(existing) = self.pending.iter().position(|(u, _)| *u == url) {
            if self.pending[existing].1 >= priority {
                return;
            }
            self.pending.remove(existing);
        }
        // Insert before the first lower-priority entry; equal priorities
        // stay in arrival order.
        let at = self
            .pending
            .iter()
            .position(|(_, p)| *p < priority)
            .unwrap_or(self.pending.len());
        self.pending.insert(at, (url, priority));
    }

    pub fn start_next(&mut self) -> Option<String> {
        if self.running.len() >= self.max_concurrent {
            return None;
        }
        let (url, _) = self.pending.pop_front()?;
        self.running.insert(url.clone());
        Some(url)
    }

    pub fn finish(&mut self, url: &str) {
        self.running.remove(url);
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn running_len(&self) -> usize {
        self.running.len()
    }
}

const IN_FLIGHT_POLL_MS: i32 = 50;
const IN_FLIGHT_POLL_LIMIT: u32 = 200;

/// Front door for asset loading. Generic over the asset type so textures,
/// models and raw buffers share the cache/retry machinery; the caller
/// supplies the actual fetch as an async closure.
pub struct AssetManager<A> {
    cache: Rc<RefCell<AssetCache<A>>>,
    in_flight: Rc<RefCell<HashSet<String>>>,
}

impl<A: Clone> AssetManager<A> {
    pub fn new(cache_budget_bytes: usize) -> Self {
        Self {
            cache: Rc::new(RefCell::new(AssetCache::new(cache_budget_bytes))),
            in_flight: Rc::new(RefCell::new(HashSet::new())),
        }
    }

    pub fn cached(&self, url: &str) -> Option<A> {
        self.cache.borrow_mut().get(url)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.borrow().stats()
    }

    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
    }

    /// Load an asset through the cache. Concurrent requests for the same url
    /// wait for the first one instead of duplicating the fetch; failures are
    /// retried with linear backoff.
    pub async fn load_asset<F, Fut>(
        &self,
        url: &str,
        config: LoadConfig,
        loader: F,
    ) -> Result<A, AssetError>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<A, String>>,
    {
        if let Some(asset) = self.cache.borrow_mut().get(url) {
            return Ok(asset);
        }

        if self.in_flight.borrow().contains(url) {
            let mut polls = 0;
            while self.in_flight.borrow().contains(url) {
                if polls >= IN_FLIGHT_POLL_LIMIT {
                    return Err(AssetError::LoadTimeout(url.to_string()));
                }
                crate::util::sleep_ms(IN_FLIGHT_POLL_MS).await;
                polls += 1;
            }
            // The other load finished; it either cached the asset or failed.
            if let Some(asset) = self.cache.borrow_mut().get(url) {
                return Ok(asset);
            }
        }

        self.in_flight.borrow_mut().insert(url.to_string());
        let result = self.load_with_retries(url, &config, &loader).await;
        self.in_flight.borrow_mut().remove(url);
        result
    }

    async fn load_with_retries<F, Fut>(
        &self,
        url: &str,
        config: &LoadConfig,
        loader: &F,
    ) -> Result<A, AssetError>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<A, String>>,
    {
        let attempts = config.max_retries.max(1);
        let mut last = String::new();
        for attempt in 1..=attempts {
            match loader(url.to_string()).await {
                Ok(asset) => {
                    self.cache
                        .borrow_mut()
                        .insert(url, asset.clone(), config.size_estimate);
                    return Ok(asset);
                }
                Err(err) => {
                    log::warn!("load attempt {attempt}/{attempts} for {url} failed: {err}");
                    last = err;
                    if attempt < attempts {
                        crate::util::sleep_ms(1000 * attempt as i32).await;
                    }
                }
            }
        }
        Err(AssetError::RetriesExhausted {
            url: url.to_string(),
            attempts,
            last,
        })
    }

    /// Warm the cache; load failures are logged, not surfaced.
    pub async fn preload<F, Fut>(&self, urls: &[&str], config: LoadConfig, loader: F)
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<A, String>>,
    {
        for url in urls {
            if let Err(err) = self.load_asset(url, config, &loader).await {
                log::warn!("preload of {url} failed: {err}");
            }
        }
    }
}

/// Browser capabilities that drive format choice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompressionSupport {
    pub webassembly: bool,
    pub webp: bool,
    pub s3tc: bool,
    pub bptc: bool,
    pub astc: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureFormat {
    Astc,
    Bptc,
    S3tc,
    Webp,
    Png,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelFormat {
    /// Draco-compressed glTF; decoding needs WebAssembly.
    GltfDraco,
    Gltf,
}

/// Best texture format the device can decode, best first.
pub fn choose_texture_format(support: &CompressionSupport) -> TextureFormat {
    if support.astc {
        TextureFormat::Astc
    } else if support.bptc {
        TextureFormat::Bptc
    } else if support.s3tc {
        TextureFormat::S3tc
    } else if support.webp {
        TextureFormat::Webp
    } else {
        TextureFormat::Png
    }
}

pub fn choose_model_format(support: &CompressionSupport) -> ModelFormat {
    if support.webassembly {
        ModelFormat::GltfDraco
    } else {
        ModelFormat::Gltf
    }
}

/// Probe the running browser. Anything that cannot be probed reports as
/// unsupported.
#[cfg(target_arch = "wasm32")]
pub fn detect_compression_support() -> CompressionSupport {
    use wasm_bindgen::JsCast;

    let webassembly = js_sys::Reflect::has(&js_sys::global(), &"WebAssembly".into())
        .unwrap_or(false);

    let mut support = CompressionSupport {
        webassembly,
        ..CompressionSupport::default()
    };

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return support;
    };
    let Ok(element) = document.create_element("canvas") else {
        return support;
    };
    let Ok(canvas) = element.dyn_into::<web_sys::HtmlCanvasElement>() else {
        return support;
    };

    support.webp = canvas
        .to_data_url_with_type("image/webp")
        .map(|u| u.starts_with("data:image/webp"))
        .unwrap_or(false);

    if let Ok(Some(ctx)) = canvas.get_context("webgl2") {
        if let Ok(gl) = ctx.dyn_into::<web_sys::WebGl2RenderingContext>() {
            let has = |name: &str| matches!(gl.get_extension(name), Ok(Some(_)));
            support.s3tc = has("WEBGL_compressed_texture_s3tc");
            support.bptc = has("EXT_texture_compression_bptc");
            support.astc = has("WEBGL_compressed_texture_astc");
        }
    }
    support
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn cache_evicts_least_recently_used_first() {
        let mut cache: AssetCache<&str> = AssetCache::new(300);
        cache.insert("a", "a", 100);
        cache.insert("b", "b", 100);
        cache.insert("c", "c", 100);
        // Touch "a" so "b" becomes the LRU entry.
        assert_eq!(cache.get("a"), Some("a"));
        cache.insert("d", "d", 100);
        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
        assert!(cache.contains("d"));
        assert_eq!(cache.stats().evictions, 1);
        assert_eq!(cache.used_bytes(), 300);
    }

    #[test]
    fn oversized_asset_is_not_cached() {
        let mut cache: AssetCache<&str> = AssetCache::new(100);
        cache.insert("huge", "huge", 500);
        assert!(cache.is_empty());
    }

    #[test]
    fn reinsert_replaces_without_double_charging() {
        let mut cache: AssetCache<&str> = AssetCache::new(300);
        cache.insert("a", "v1", 100);
        cache.insert("a", "v2", 200);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.used_bytes(), 200);
        assert_eq!(cache.get("a"), Some("v2"));
    }

    #[test]
    fn stats_count_hits_and_misses() {
        let mut cache: AssetCache<&str> = AssetCache::new(100);
        assert_eq!(cache.get("a"), None);
        cache.insert("a", "a", 10);
        cache.get("a");
        cache.get("a");
        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 2);
    }

    #[test]
    fn queue_orders_by_priority_then_arrival() {
        let mut q = LoadingQueue::new(2);
        q.enqueue("low-1", LoadPriority::Low);
        q.enqueue("high-1", LoadPriority::High);
        q.enqueue("med-1", LoadPriority::Medium);
        q.enqueue("high-2", LoadPriority::High);

        assert_eq!(q.start_next().as_deref(), Some("high-1"));
        assert_eq!(q.start_next().as_deref(), Some("high-2"));
        // Concurrency cap reached.
        assert_eq!(q.start_next(), None);
        q.finish("high-1");
        assert_eq!(q.start_next().as_deref(), Some("med-1"));
        q.finish("high-2");
        assert_eq!(q.start_next().as_deref(), Some("low-1"));
    }

    #[test]
    fn queue_deduplicates_urls() {
        let mut q = LoadingQueue::new(1);
        q.enqueue("a", LoadPriority::Medium);
        q.enqueue("a", LoadPriority::Medium);
        q.enqueue("a", LoadPriority::Low);
        assert_eq!(q.pending_len(), 1);
        assert_eq!(q.start_next().as_deref(), Some("a"));
        q.enqueue("a", LoadPriority::High); // still running
        assert_eq!(q.pending_len(), 0);
    }

    #[test]
    fn queue_reenqueue_at_higher_priority_promotes() {
        let mut q = LoadingQueue::new(1);
        q.enqueue("med-1", LoadPriority::Medium);
        q.enqueue("low-1", LoadPriority::Low);
        q.enqueue("low-1", LoadPriority::High);
        assert_eq!(q.pending_len(), 2);
        assert_eq!(q.start_next().as_deref(), Some("low-1"));
    }

    #[test]
    fn load_asset_caches_and_skips_loader_on_hit() {
        let mgr: AssetManager<String> = AssetManager::new(10 * 1024 * 1024);
        let calls = Rc::new(Cell::new(0u32));

        let c = calls.clone();
        let loader = move |url: String| {
            let c = c.clone();
            async move {
                c.set(c.get() + 1);
                Ok(format!("asset:{url}"))
            }
        };

        let first = futures::executor::block_on(mgr.load_asset(
            "tex.png",
            LoadConfig::default(),
            &loader,
        ));
        let second = futures::executor::block_on(mgr.load_asset(
            "tex.png",
            LoadConfig::default(),
            &loader,
        ));
        assert_eq!(first.unwrap(), "asset:tex.png");
        assert_eq!(second.unwrap(), "asset:tex.png");
        assert_eq!(calls.get(), 1);
        assert_eq!(mgr.cache_stats().hits, 1);
    }

    #[test]
    fn load_asset_retries_then_succeeds() {
        let mgr: AssetManager<String> = AssetManager::new(10 * 1024 * 1024);
        let calls = Rc::new(Cell::new(0u32));

        let c = calls.clone();
        let loader = move |_url: String| {
            let c = c.clone();
            async move {
                c.set(c.get() + 1);
                if c.get() < 3 {
                    Err("network".to_string())
                } else {
                    Ok("ok".to_string())
                }
            }
        };

        let result = futures::executor::block_on(mgr.load_asset(
            "model.glb",
            LoadConfig::default(),
            &loader,
        ));
        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn load_asset_reports_exhausted_retries() {
        let mgr: AssetManager<String> = AssetManager::new(1024);
        let loader = |_url: String| async move { Err::<String, _>("404".to_string()) };
        let result = futures::executor::block_on(mgr.load_asset(
            "missing.png",
            LoadConfig {
                max_retries: 2,
                ..LoadConfig::default()
            },
            &loader,
        ));
        match result {
            Err(AssetError::RetriesExhausted { attempts, last, .. }) => {
                assert_eq!(attempts, 2);
                assert_eq!(last, "404");
            }
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
        assert!(mgr.cached("missing.png").is_none());
    }

    #[test]
    fn format_choice_prefers_hardware_compression() {
        let all = CompressionSupport {
            webassembly: true,
            webp: true,
            s3tc: true,
            bptc: true,
            astc: true,
        };
        assert_eq!(choose_texture_format(&all), TextureFormat::Astc);
        assert_eq!(
            choose_texture_format(&CompressionSupport {
                astc: false,
                ..all
            }),
            TextureFormat::Bptc
        );
        assert_eq!(
            choose_texture_format(&CompressionSupport::default()),
            TextureFormat::Png
        );
        assert_eq!(choose_model_format(&all), ModelFormat::GltfDraco);
        assert_eq!(
            choose_model_format(&CompressionSupport::default()),
            ModelFormat::Gltf
        );
    }
}
