//! 离线缓存 Worker
//!
//! 模拟浏览器 Service Worker 的 安装 → 激活 → 拦截请求 生命周期，
//! 存储与网络通过 trait 注入。只保留一个版本化缓存，升级版本并激活后删除旧缓存。

pub mod http;
pub mod storage;

use std::fmt;
use std::str::FromStr;

use futures::future::try_join_all;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, warn};

pub use http::{FetchRequest, FetchResponse, Network, NetworkError, ResponseKind};
#[cfg(target_arch = "wasm32")]
pub use storage::LocalCacheStorage;
pub use storage::{CacheStorage, MemoryCacheStorage, StorageError};

pub type WorkerResult<T> = Result<T, WorkerError>;

pub const DEFAULT_CACHE_PREFIX: &str = "dataviz-cache";
pub const DEFAULT_CACHE_VERSION: &str = "v5";
pub const DEFAULT_PRECACHE: [&str; 5] = [
    "./",
    "./index.html",
    "./manifest.json",
    "./icons/192.png",
    "./icons/512.png",
];

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CachePolicy {
    /// 优先读缓存，允许返回旧内容
    CacheFirst,
    /// 优先走网络，失败时回退到缓存
    #[default]
    NetworkFirst,
}

impl CachePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            CachePolicy::CacheFirst => "cache-first",
            CachePolicy::NetworkFirst => "network-first",
        }
    }
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown cache policy `{0}`, expected cache-first or network-first")]
pub struct ParsePolicyError(String);

impl FromStr for CachePolicy {
    type Err = ParsePolicyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cache-first" | "cache_first" => Ok(CachePolicy::CacheFirst),
            "network-first" | "network_first" => Ok(CachePolicy::NetworkFirst),
            _ => Err(ParsePolicyError(value.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Unregistered,
    Installing,
    Installed,
    Activating,
    Active,
}

impl LifecycleState {
    pub fn label(self) -> &'static str {
        match self {
            LifecycleState::Unregistered => "未注册",
            LifecycleState::Installing => "安装中",
            LifecycleState::Installed => "等待激活",
            LifecycleState::Activating => "激活中",
            LifecycleState::Active => "离线可用",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkerConfig {
    pub cache_prefix: String,
    pub cache_version: String,
    /// 预缓存清单解析所依据的基础 URL
    pub scope: String,
    pub precache: Vec<String>,
    pub policy: CachePolicy,
    /// 安装成功后立即激活，不再等待
    pub skip_waiting: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            cache_prefix: DEFAULT_CACHE_PREFIX.to_string(),
            cache_version: DEFAULT_CACHE_VERSION.to_string(),
            scope: "http://localhost:8080/".to_string(),
            precache: DEFAULT_PRECACHE.iter().map(|path| path.to_string()).collect(),
            policy: CachePolicy::default(),
            skip_waiting: true,
        }
    }
}

impl WorkerConfig {
    pub fn cache_name(&self) -> String {
        format!("{}-{}", self.cache_prefix, self.cache_version)
    }

    pub fn scope_url(&self) -> WorkerResult<Url> {
        Url::parse(&self.scope).map_err(|err| WorkerError::InvalidUrl {
            url: self.scope.clone(),
            reason: err.to_string(),
        })
    }

    pub fn precache_requests(&self) -> WorkerResult<Vec<FetchRequest>> {
        let scope = self.scope_url()?;
        self.precache
            .iter()
            .map(|path| {
                scope
                    .join(path)
                    .map(FetchRequest::get)
                    .map_err(|err| WorkerError::InvalidUrl {
                        url: path.clone(),
                        reason: err.to_string(),
                    })
            })
            .collect()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkerError {
    #[error("precache of {url} failed: {reason}")]
    Precache { url: String, reason: String },
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("invalid url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("cannot {action} while {state:?}")]
    InvalidTransition {
        action: &'static str,
        state: LifecycleState,
    },
}

pub struct OfflineWorker<S, N> {
    config: WorkerConfig,
    storage: S,
    network: N,
    state: LifecycleState,
    clients_claimed: bool,
}

impl<S, N> OfflineWorker<S, N>
where
    S: CacheStorage,
    N: Network,
{
    pub fn new(config: WorkerConfig, storage: S, network: N) -> Self {
        Self {
            config,
            storage,
            network,
            state: LifecycleState::Unregistered,
            clients_claimed: false,
        }
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    /// 激活时是否已接管打开的页面
    pub fn claimed_clients(&self) -> bool {
        self.clients_claimed
    }

    /// 安装；设置了 `skip_waiting` 时随即激活
    pub async fn start(&mut self) -> WorkerResult<()> {
        self.install().await?;
        if self.config.skip_waiting {
            self.activate().await?;
        }
        Ok(())
    }

    /// 预缓存清单。要么全部写入缓存，要么安装失败并保持未注册
    pub async fn install(&mut self) -> WorkerResult<()> {
        if self.state != LifecycleState::Unregistered {
            return Err(WorkerError::InvalidTransition {
                action: "install",
                state: self.state,
            });
        }

        self.state = LifecycleState::Installing;
        match self.precache().await {
            Ok(count) => {
                self.state = LifecycleState::Installed;
                info!(cache = %self.config.cache_name(), count, "offline worker installed");
                Ok(())
            }
            Err(err) => {
                self.state = LifecycleState::Unregistered;
                error!(cache = %self.config.cache_name(), %err, "offline worker install failed");
                Err(err)
            }
        }
    }

    async fn precache(&self) -> WorkerResult<usize> {
        let requests = self.config.precache_requests()?;
        let entries = try_join_all(requests.into_iter().map(move |request| async move {
            let response =
                self.network
                    .fetch(&request)
                    .await
                    .map_err(|err| WorkerError::Precache {
                        url: request.url.to_string(),
                        reason: err.to_string(),
                    })?;
            if !response.is_success() {
                return Err(WorkerError::Precache {
                    url: request.url.to_string(),
                    reason: format!("status {}", response.status),
                });
            }
            Ok::<_, WorkerError>((request, response))
        }))
        .await?;

        let cache_name = self.config.cache_name();
        let count = entries.len();
        self.storage.open(&cache_name).await?;
        self.storage.put_all(&cache_name, entries).await?;
        Ok(count)
    }

    /// 删除所有非当前版本的缓存并接管页面，返回被删除的缓存名
    pub async fn activate(&mut self) -> WorkerResult<Vec<String>> {
        if self.state != LifecycleState::Installed {
            return Err(WorkerError::InvalidTransition {
                action: "activate",
                state: self.state,
            });
        }

        self.state = LifecycleState::Activating;
        match self.sweep_stale_stores().await {
            Ok(removed) => {
                self.clients_claimed = true;
                self.state = LifecycleState::Active;
                info!(
                    cache = %self.config.cache_name(),
                    removed = removed.len(),
                    policy = %self.config.policy,
                    "offline worker active"
                );
                Ok(removed)
            }
            Err(err) => {
                self.state = LifecycleState::Installed;
                error!(%err, "offline worker activation failed");
                Err(err)
            }
        }
    }

    async fn sweep_stale_stores(&self) -> WorkerResult<Vec<String>> {
        let current = self.config.cache_name();
        let mut removed = Vec::new();
        for name in self.storage.keys().await? {
            if name == current {
                continue;
            }
            if self.storage.delete(&name).await? {
                debug!(cache = %name, "removed stale cache");
                removed.push(name);
            }
        }
        Ok(removed)
    }

    /// 处理拦截到的请求。`Ok(None)` 表示不接管，调用方应直接走网络
    pub async fn handle_fetch(
        &self,
        request: &FetchRequest,
    ) -> WorkerResult<Option<FetchResponse>> {
        if !request.is_http() {
            return Ok(None);
        }
        if self.state != LifecycleState::Active {
            debug!(%request, state = ?self.state, "worker not active, passing through");
            return Ok(None);
        }

        let response = match self.config.policy {
            CachePolicy::CacheFirst => self.cache_first(request).await?,
            CachePolicy::NetworkFirst => self.network_first(request).await?,
        };
        Ok(Some(response))
    }

    /// 应用自身的请求入口：Worker 接管时按缓存策略处理，不接管时直接走网络
    pub async fn fetch(&self, request: &FetchRequest) -> WorkerResult<FetchResponse> {
        match self.handle_fetch(request).await? {
            Some(response) => Ok(response),
            None => Ok(self.network.fetch(request).await?),
        }
    }

    async fn cache_first(&self, request: &FetchRequest) -> WorkerResult<FetchResponse> {
        if let Some(hit) = self.cached(request).await {
            return Ok(hit);
        }
        let response = self.network.fetch(request).await?;
        self.store_copy(request, &response).await;
        Ok(response)
    }

    async fn network_first(&self, request: &FetchRequest) -> WorkerResult<FetchResponse> {
        match self.network.fetch(request).await {
            Ok(response) => {
                self.store_copy(request, &response).await;
                Ok(response)
            }
            Err(err) => {
                debug!(%request, %err, "network failed, trying cache");
                match self.cached(request).await {
                    Some(hit) => Ok(hit),
                    None => Err(err.into()),
                }
            }
        }
    }

    async fn cached(&self, request: &FetchRequest) -> Option<FetchResponse> {
        match self.storage.lookup(&self.config.cache_name(), request).await {
            Ok(hit) => hit,
            Err(err) => {
                warn!(%request, %err, "cache lookup failed");
                None
            }
        }
    }

    /// 调用方保留 `response`，缓存写入的是副本
    async fn store_copy(&self, request: &FetchRequest, response: &FetchResponse) {
        if !request.is_get() || !response.is_cacheable() {
            return;
        }
        let cache_name = self.config.cache_name();
        if let Err(err) = self
            .storage
            .put(&cache_name, request, response.duplicate())
            .await
        {
            warn!(%request, %err, "failed to cache response");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::storage::StorageResult;
    use async_trait::async_trait;
    use futures::executor::block_on;
    use reqwest::Method;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    const SCOPE: &str = "http://localhost:8080/";

    /// 按路径返回预设内容，可切换为离线
    #[derive(Default)]
    struct FakeNetwork {
        routes: RefCell<HashMap<String, (u16, String)>>,
        offline: Cell<bool>,
        calls: Cell<usize>,
    }

    impl FakeNetwork {
        fn serving_manifest() -> Self {
            let network = Self::default();
            for path in DEFAULT_PRECACHE {
                network.route(path.trim_start_matches('.'), 200, &format!("asset {path}"));
            }
            network
        }

        fn route(&self, path: &str, status: u16, body: &str) {
            self.routes
                .borrow_mut()
                .insert(path.to_string(), (status, body.to_string()));
        }

        fn calls(&self) -> usize {
            self.calls.get()
        }
    }

    #[async_trait(?Send)]
    impl Network for FakeNetwork {
        async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, NetworkError> {
            self.calls.set(self.calls.get() + 1);
            if self.offline.get() {
                return Err(NetworkError::Unreachable("offline".into()));
            }
            let routes = self.routes.borrow();
            match routes.get(request.url.path()) {
                Some((status, body)) => Ok(FetchResponse::new(
                    request.url.to_string(),
                    *status,
                    body.as_bytes(),
                )),
                None => Ok(FetchResponse::new(request.url.to_string(), 404, "")),
            }
        }
    }

    /// 读写正常，但列出缓存名时失败
    #[derive(Default)]
    struct BrokenListing {
        inner: MemoryCacheStorage,
    }

    #[async_trait(?Send)]
    impl CacheStorage for BrokenListing {
        async fn open(&self, name: &str) -> StorageResult<()> {
            self.inner.open(name).await
        }

        async fn keys(&self) -> StorageResult<Vec<String>> {
            Err(StorageError::Backend("quota exceeded".into()))
        }

        async fn delete(&self, name: &str) -> StorageResult<bool> {
            self.inner.delete(name).await
        }

        async fn lookup(
            &self,
            name: &str,
            request: &FetchRequest,
        ) -> StorageResult<Option<FetchResponse>> {
            self.inner.lookup(name, request).await
        }

        async fn put(
            &self,
            name: &str,
            request: &FetchRequest,
            response: FetchResponse,
        ) -> StorageResult<()> {
            self.inner.put(name, request, response).await
        }

        async fn put_all(
            &self,
            name: &str,
            entries: Vec<(FetchRequest, FetchResponse)>,
        ) -> StorageResult<()> {
            self.inner.put_all(name, entries).await
        }
    }

    fn config(policy: CachePolicy, version: &str) -> WorkerConfig {
        WorkerConfig {
            cache_version: version.to_string(),
            scope: SCOPE.to_string(),
            policy,
            ..WorkerConfig::default()
        }
    }

    fn get(path: &str) -> FetchRequest {
        FetchRequest::parse(Method::GET, &format!("http://localhost:8080{path}")).unwrap()
    }

    fn active_worker(policy: CachePolicy) -> OfflineWorker<MemoryCacheStorage, FakeNetwork> {
        let mut worker = OfflineWorker::new(
            config(policy, "v5"),
            MemoryCacheStorage::new(),
            FakeNetwork::serving_manifest(),
        );
        block_on(worker.start()).unwrap();
        worker
    }

    #[test]
    fn cache_name_embeds_version() {
        assert_eq!(WorkerConfig::default().cache_name(), "dataviz-cache-v5");
    }

    #[test]
    fn policy_parses_from_config_strings() {
        assert_eq!("cache-first".parse::<CachePolicy>().unwrap(), CachePolicy::CacheFirst);
        assert_eq!(" Network-First ".parse::<CachePolicy>().unwrap(), CachePolicy::NetworkFirst);
        assert!("stale-while-revalidate".parse::<CachePolicy>().is_err());
    }

    #[test]
    fn precache_manifest_resolves_against_scope() {
        let requests = config(CachePolicy::CacheFirst, "v1").precache_requests().unwrap();
        let urls: Vec<String> = requests.iter().map(|req| req.url.to_string()).collect();
        assert_eq!(urls[0], "http://localhost:8080/");
        assert_eq!(urls[4], "http://localhost:8080/icons/512.png");
    }

    #[test]
    fn start_installs_and_activates() {
        let worker = active_worker(CachePolicy::NetworkFirst);
        assert_eq!(worker.state(), LifecycleState::Active);
        assert!(worker.claimed_clients());
        let keys = block_on(worker.storage().keys()).unwrap();
        assert_eq!(keys, vec!["dataviz-cache-v5"]);
    }

    #[test]
    fn install_is_all_or_nothing() {
        let network = FakeNetwork::serving_manifest();
        network.route("/icons/512.png", 404, "");
        let mut worker = OfflineWorker::new(
            config(CachePolicy::CacheFirst, "v5"),
            MemoryCacheStorage::new(),
            network,
        );

        let err = block_on(worker.install()).unwrap_err();
        assert!(matches!(err, WorkerError::Precache { ref url, .. } if url.ends_with("/icons/512.png")));
        assert_eq!(worker.state(), LifecycleState::Unregistered);
        assert!(block_on(worker.storage().keys()).unwrap().is_empty());
    }

    #[test]
    fn unreachable_network_fails_install() {
        let network = FakeNetwork::serving_manifest();
        network.offline.set(true);
        let mut worker = OfflineWorker::new(
            config(CachePolicy::NetworkFirst, "v5"),
            MemoryCacheStorage::new(),
            network,
        );

        let err = block_on(worker.install()).unwrap_err();
        assert!(matches!(err, WorkerError::Precache { ref reason, .. } if reason.contains("offline")));
        assert_eq!(worker.state(), LifecycleState::Unregistered);
        assert!(block_on(worker.storage().keys()).unwrap().is_empty());
    }

    #[test]
    fn storage_failure_during_activation_keeps_worker_installed() {
        let mut worker = OfflineWorker::new(
            config(CachePolicy::CacheFirst, "v5"),
            BrokenListing::default(),
            FakeNetwork::serving_manifest(),
        );
        block_on(worker.install()).unwrap();

        let err = block_on(worker.activate()).unwrap_err();
        assert_eq!(err, WorkerError::Storage(StorageError::Backend("quota exceeded".into())));
        assert_eq!(worker.state(), LifecycleState::Installed);
        assert!(!worker.claimed_clients());
    }

    #[test]
    fn activate_requires_install() {
        let mut worker = OfflineWorker::new(
            config(CachePolicy::CacheFirst, "v5"),
            MemoryCacheStorage::new(),
            FakeNetwork::serving_manifest(),
        );
        let err = block_on(worker.activate()).unwrap_err();
        assert_eq!(
            err,
            WorkerError::InvalidTransition {
                action: "activate",
                state: LifecycleState::Unregistered
            }
        );
    }

    #[test]
    fn activation_drops_previous_versions() {
        block_on(async {
            let storage = MemoryCacheStorage::new();
            storage.open("dataviz-cache-v1").await.unwrap();
            storage
                .put(
                    "dataviz-cache-v1",
                    &get("/index.html"),
                    FetchResponse::new("/index.html", 200, "old shell"),
                )
                .await
                .unwrap();

            let mut worker = OfflineWorker::new(
                config(CachePolicy::CacheFirst, "v2"),
                storage,
                FakeNetwork::serving_manifest(),
            );
            worker.install().await.unwrap();
            assert_eq!(worker.state(), LifecycleState::Installed);
            assert_eq!(worker.storage().keys().await.unwrap().len(), 2);

            let removed = worker.activate().await.unwrap();
            assert_eq!(removed, vec!["dataviz-cache-v1"]);
            assert_eq!(worker.storage().keys().await.unwrap(), vec!["dataviz-cache-v2"]);
        });
    }

    #[test]
    fn precached_resources_are_served_offline() {
        let worker = active_worker(CachePolicy::NetworkFirst);
        worker.network.offline.set(true);
        for path in ["/", "/index.html", "/manifest.json", "/icons/192.png"] {
            let response = block_on(worker.handle_fetch(&get(path))).unwrap().unwrap();
            assert_eq!(response.status, 200, "{path}");
        }
    }

    #[test]
    fn cache_first_returns_stale_entry_without_network() {
        let worker = active_worker(CachePolicy::CacheFirst);
        worker.network.route("/manifest.json", 200, "fresh manifest");
        let before = worker.network.calls();

        let response = block_on(worker.handle_fetch(&get("/manifest.json")))
            .unwrap()
            .unwrap();
        assert_eq!(response.text(), "asset ./manifest.json");
        assert_eq!(worker.network.calls(), before);
    }

    #[test]
    fn cache_first_miss_fetches_and_stores_copy() {
        let worker = active_worker(CachePolicy::CacheFirst);
        worker.network.route("/assets/index-x8s.js", 200, "bundle");

        let first = block_on(worker.handle_fetch(&get("/assets/index-x8s.js"))).unwrap().unwrap();
        assert_eq!(first.text(), "bundle");
        let calls = worker.network.calls();

        worker.network.offline.set(true);
        let second = block_on(worker.handle_fetch(&get("/assets/index-x8s.js"))).unwrap().unwrap();
        assert_eq!(second, first);
        assert_eq!(worker.network.calls(), calls);
    }

    #[test]
    fn non_200_responses_are_returned_but_not_cached() {
        let worker = active_worker(CachePolicy::CacheFirst);
        let missing = block_on(worker.handle_fetch(&get("/missing.png"))).unwrap().unwrap();
        assert_eq!(missing.status, 404);
        let cached = block_on(
            worker
                .storage()
                .lookup("dataviz-cache-v5", &get("/missing.png")),
        )
        .unwrap();
        assert!(cached.is_none());
    }

    #[test]
    fn network_first_prefers_live_response() {
        let worker = active_worker(CachePolicy::NetworkFirst);
        worker.network.route("/manifest.json", 200, "fresh manifest");

        let response = block_on(worker.handle_fetch(&get("/manifest.json"))).unwrap().unwrap();
        assert_eq!(response.text(), "fresh manifest");

        worker.network.offline.set(true);
        let fallback = block_on(worker.handle_fetch(&get("/manifest.json"))).unwrap().unwrap();
        assert_eq!(fallback.text(), "fresh manifest");
    }

    #[test]
    fn network_first_returns_but_skips_caching_non_200() {
        let worker = active_worker(CachePolicy::NetworkFirst);
        worker.network.route("/api/report.json", 503, "busy");

        let response = block_on(worker.handle_fetch(&get("/api/report.json"))).unwrap().unwrap();
        assert_eq!(response.status, 503);
        assert_eq!(response.text(), "busy");

        let cached = block_on(
            worker
                .storage()
                .lookup("dataviz-cache-v5", &get("/api/report.json")),
        )
        .unwrap();
        assert!(cached.is_none());
    }

    #[test]
    fn fetch_goes_to_network_when_worker_passes_through() {
        let idle = OfflineWorker::new(
            config(CachePolicy::CacheFirst, "v5"),
            MemoryCacheStorage::new(),
            FakeNetwork::serving_manifest(),
        );
        let response = block_on(idle.fetch(&get("/manifest.json"))).unwrap();
        assert_eq!(response.text(), "asset ./manifest.json");
        assert_eq!(idle.network.calls(), 1);

        let worker = active_worker(CachePolicy::CacheFirst);
        worker.network.offline.set(true);
        let cached = block_on(worker.fetch(&get("/manifest.json"))).unwrap();
        assert_eq!(cached.text(), "asset ./manifest.json");
    }

    #[test]
    fn network_first_propagates_error_on_cache_miss() {
        let worker = active_worker(CachePolicy::NetworkFirst);
        worker.network.offline.set(true);
        let err = block_on(worker.handle_fetch(&get("/api/report.json"))).unwrap_err();
        assert_eq!(err, WorkerError::Network(NetworkError::Unreachable("offline".into())));
    }

    #[test]
    fn only_get_requests_are_written() {
        let worker = active_worker(CachePolicy::NetworkFirst);
        worker.network.route("/api/submit", 200, "accepted");
        let post = FetchRequest::new(Method::POST, get("/api/submit").url);

        let response = block_on(worker.handle_fetch(&post)).unwrap().unwrap();
        assert_eq!(response.text(), "accepted");

        let cached = block_on(
            worker
                .storage()
                .lookup("dataviz-cache-v5", &get("/api/submit")),
        )
        .unwrap();
        assert!(cached.is_none());
    }

    #[test]
    fn non_http_and_inactive_requests_pass_through() {
        let worker = active_worker(CachePolicy::CacheFirst);
        let extension = FetchRequest::parse(Method::GET, "chrome-extension://abc/inject.js").unwrap();
        assert!(block_on(worker.handle_fetch(&extension)).unwrap().is_none());

        let idle = OfflineWorker::new(
            config(CachePolicy::CacheFirst, "v5"),
            MemoryCacheStorage::new(),
            FakeNetwork::serving_manifest(),
        );
        assert!(block_on(idle.handle_fetch(&get("/index.html"))).unwrap().is_none());
        assert_eq!(idle.network.calls(), 0);
    }

    #[test]
    fn concurrent_fetches_resolve_independently() {
        let worker = active_worker(CachePolicy::CacheFirst);
        worker.network.route("/a.js", 200, "a");
        worker.network.route("/b.js", 200, "b");
        let (req_a, req_b, req_manifest) = (get("/a.js"), get("/b.js"), get("/manifest.json"));
        let (a, b, manifest) = block_on(async {
            futures::join!(
                worker.handle_fetch(&req_a),
                worker.handle_fetch(&req_b),
                worker.handle_fetch(&req_manifest),
            )
        });
        assert_eq!(a.unwrap().unwrap().text(), "a");
        assert_eq!(b.unwrap().unwrap().text(), "b");
        assert_eq!(manifest.unwrap().unwrap().status, 200);
    }
}
