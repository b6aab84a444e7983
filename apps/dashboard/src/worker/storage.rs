use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::http::{FetchRequest, FetchResponse};

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("cache store `{0}` does not exist")]
    MissingStore(String),
    #[error("storage backend failure: {0}")]
    Backend(String),
    #[error("storage lock poisoned")]
    Poisoned,
}

/// 按名称区分的版本化响应缓存。单个操作是原子的，同一键的并发写入不保证顺序
#[async_trait(?Send)]
pub trait CacheStorage {
    /// 缓存不存在时创建
    async fn open(&self, name: &str) -> StorageResult<()>;
    async fn keys(&self) -> StorageResult<Vec<String>>;
    /// 返回是否确实删除了缓存
    async fn delete(&self, name: &str) -> StorageResult<bool>;
    async fn lookup(
        &self,
        name: &str,
        request: &FetchRequest,
    ) -> StorageResult<Option<FetchResponse>>;
    async fn put(
        &self,
        name: &str,
        request: &FetchRequest,
        response: FetchResponse,
    ) -> StorageResult<()>;
    /// 全部写入或全部不写
    async fn put_all(
        &self,
        name: &str,
        entries: Vec<(FetchRequest, FetchResponse)>,
    ) -> StorageResult<()>;
}

/// 单个缓存的持久化形式
#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredCache {
    #[serde(default)]
    entries: BTreeMap<String, FetchResponse>,
}

impl StoredCache {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 只存 GET 请求，其他方法一律未命中
    pub fn lookup(&self, request: &FetchRequest) -> Option<FetchResponse> {
        if !request.is_get() {
            return None;
        }
        self.entries
            .get(&request.cache_key())
            .map(FetchResponse::duplicate)
    }

    pub fn insert(&mut self, request: &FetchRequest, response: FetchResponse) {
        self.entries.insert(request.cache_key(), response);
    }
}

#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    stores: Mutex<BTreeMap<String, StoredCache>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_stores<T>(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, StoredCache>) -> StorageResult<T>,
    ) -> StorageResult<T> {
        let mut stores = self.stores.lock().map_err(|_| StorageError::Poisoned)?;
        f(&mut stores)
    }
}

#[async_trait(?Send)]
impl CacheStorage for MemoryCacheStorage {
    async fn open(&self, name: &str) -> StorageResult<()> {
        self.with_stores(|stores| {
            stores.entry(name.to_string()).or_default();
            Ok(())
        })
    }

    async fn keys(&self) -> StorageResult<Vec<String>> {
        self.with_stores(|stores| Ok(stores.keys().cloned().collect()))
    }

    async fn delete(&self, name: &str) -> StorageResult<bool> {
        self.with_stores(|stores| Ok(stores.remove(name).is_some()))
    }

    async fn lookup(
        &self,
        name: &str,
        request: &FetchRequest,
    ) -> StorageResult<Option<FetchResponse>> {
        self.with_stores(|stores| Ok(stores.get(name).and_then(|store| store.lookup(request))))
    }

    async fn put(
        &self,
        name: &str,
        request: &FetchRequest,
        response: FetchResponse,
    ) -> StorageResult<()> {
        self.with_stores(|stores| {
            stores
                .get_mut(name)
                .ok_or_else(|| StorageError::MissingStore(name.to_string()))?
                .insert(request, response);
            Ok(())
        })
    }

    async fn put_all(
        &self,
        name: &str,
        entries: Vec<(FetchRequest, FetchResponse)>,
    ) -> StorageResult<()> {
        self.with_stores(|stores| {
            let store = stores
                .get_mut(name)
                .ok_or_else(|| StorageError::MissingStore(name.to_string()))?;
            for (request, response) in entries {
                store.insert(&request, response);
            }
            Ok(())
        })
    }
}

#[cfg(target_arch = "wasm32")]
pub use local::LocalCacheStorage;

#[cfg(target_arch = "wasm32")]
mod local {
    use async_trait::async_trait;
    use gloo_storage::errors::StorageError as GlooStorageError;
    use gloo_storage::{LocalStorage, Storage};
    use serde::de::DeserializeOwned;

    use super::{CacheStorage, StorageError, StorageResult, StoredCache};
    use crate::worker::http::{FetchRequest, FetchResponse};

    /// 基于 LocalStorage 的缓存实现：一个索引键记录所有缓存名，每个缓存单独一条 JSON 记录。
    #[derive(Clone, Debug)]
    pub struct LocalCacheStorage {
        namespace: String,
    }

    impl LocalCacheStorage {
        pub fn new(namespace: impl Into<String>) -> Self {
            Self {
                namespace: namespace.into(),
            }
        }

        fn index_key(&self) -> String {
            format!("{}:caches", self.namespace)
        }

        fn store_key(&self, name: &str) -> String {
            format!("{}:cache:{}", self.namespace, name)
        }

        fn read_index(&self) -> StorageResult<Vec<String>> {
            read_or_default(&self.index_key())
        }

        fn write_index(&self, names: &[String]) -> StorageResult<()> {
            LocalStorage::set(self.index_key(), names).map_err(backend)
        }

        fn read_store(&self, name: &str) -> StorageResult<StoredCache> {
            if !self.read_index()?.iter().any(|existing| existing == name) {
                return Err(StorageError::MissingStore(name.to_string()));
            }
            read_or_default(&self.store_key(name))
        }

        fn write_store(&self, name: &str, store: &StoredCache) -> StorageResult<()> {
            LocalStorage::set(self.store_key(name), store).map_err(backend)
        }
    }

    #[async_trait(?Send)]
    impl CacheStorage for LocalCacheStorage {
        async fn open(&self, name: &str) -> StorageResult<()> {
            let mut names = self.read_index()?;
            if !names.iter().any(|existing| existing == name) {
                names.push(name.to_string());
                self.write_store(name, &StoredCache::default())?;
                self.write_index(&names)?;
            }
            Ok(())
        }

        async fn keys(&self) -> StorageResult<Vec<String>> {
            self.read_index()
        }

        async fn delete(&self, name: &str) -> StorageResult<bool> {
            let mut names = self.read_index()?;
            let before = names.len();
            names.retain(|existing| existing != name);
            if names.len() == before {
                return Ok(false);
            }
            LocalStorage::delete(self.store_key(name));
            self.write_index(&names)?;
            Ok(true)
        }

        async fn lookup(
            &self,
            name: &str,
            request: &FetchRequest,
        ) -> StorageResult<Option<FetchResponse>> {
            match self.read_store(name) {
                Ok(store) => Ok(store.lookup(request)),
                Err(StorageError::MissingStore(_)) => Ok(None),
                Err(err) => Err(err),
            }
        }

        async fn put(
            &self,
            name: &str,
            request: &FetchRequest,
            response: FetchResponse,
        ) -> StorageResult<()> {
            let mut store = self.read_store(name)?;
            store.insert(request, response);
            self.write_store(name, &store)
        }

        async fn put_all(
            &self,
            name: &str,
            entries: Vec<(FetchRequest, FetchResponse)>,
        ) -> StorageResult<()> {
            let mut store = self.read_store(name)?;
            for (request, response) in entries {
                store.insert(&request, response);
            }
            // 单次写入，保证整批原子
            self.write_store(name, &store)
        }
    }

    fn read_or_default<T: DeserializeOwned + Default>(key: &str) -> StorageResult<T> {
        match LocalStorage::get::<T>(key) {
            Ok(value) => Ok(value),
            Err(GlooStorageError::KeyNotFound(_)) => Ok(T::default()),
            Err(err) => Err(backend(err)),
        }
    }

    fn backend(err: GlooStorageError) -> StorageError {
        StorageError::Backend(err.to_string())
    }
}
