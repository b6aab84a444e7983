use std::rc::Rc;

use anyhow::Context;
use dioxus::prelude::*;
#[cfg(target_arch = "wasm32")]
use gloo_timers::future::TimeoutFuture;
use tracing::{debug, error, info, warn};

use crate::api::ReqwestNetwork;
use crate::models::AppManifest;
use crate::state::{use_app_actions, AppActions};
use crate::worker::{
    CacheStorage, FetchRequest, LifecycleState, Network, OfflineWorker, WorkerResult,
};
use crate::APP_CONFIG;

#[cfg(target_arch = "wasm32")]
type OfflineStorage = crate::worker::LocalCacheStorage;

#[cfg(not(target_arch = "wasm32"))]
type OfflineStorage = crate::worker::MemoryCacheStorage;

pub type AppWorker = OfflineWorker<OfflineStorage, ReqwestNetwork>;

#[cfg(target_arch = "wasm32")]
fn offline_storage() -> OfflineStorage {
    crate::worker::LocalCacheStorage::new("dataviz")
}

#[cfg(not(target_arch = "wasm32"))]
fn offline_storage() -> OfflineStorage {
    crate::worker::MemoryCacheStorage::new()
}

/// 持有启动后的离线 Worker，应用自身的请求都经由它发出
#[derive(Clone, Copy)]
pub struct OfflineClient {
    worker: Signal<Option<Rc<AppWorker>>>,
}

impl OfflineClient {
    /// 启动流程结束前为 `None`
    pub fn worker(&self) -> Option<Rc<AppWorker>> {
        self.worker.read().clone()
    }
}

/// 启动离线缓存：预缓存应用外壳并清理旧版本缓存，生命周期同步到 AppState。
/// 启动结束后 Worker 保留在返回的 [`OfflineClient`] 中，安装失败时请求直接走网络。
pub fn use_offline_worker() -> OfflineClient {
    let actions = use_app_actions();
    let mut slot = use_signal(|| None::<Rc<AppWorker>>);

    use_future(move || async move {
        #[cfg(target_arch = "wasm32")]
        TimeoutFuture::new(0).await;

        if let Some(worker) = boot_worker(actions).await {
            slot.set(Some(Rc::new(worker)));
        }
    });

    OfflineClient { worker: slot }
}

async fn boot_worker(actions: AppActions) -> Option<AppWorker> {
    let Some(config) = APP_CONFIG.get() else {
        actions.set_offline_error(Some("缺少应用配置，离线缓存未启动".into()));
        return None;
    };

    let worker_config = config.worker_config();
    actions.set_offline_target(worker_config.cache_name(), worker_config.policy);

    let network = match ReqwestNetwork::new(config) {
        Ok(network) => network,
        Err(err) => {
            error!(?err, "offline network init failed");
            actions.set_offline_error(Some(format!("离线缓存初始化失败: {err}")));
            return None;
        }
    };

    let mut worker = OfflineWorker::new(worker_config, offline_storage(), network);
    match run_lifecycle(&mut worker, |state| actions.set_offline_lifecycle(state)).await {
        Ok(()) => info!(state = ?worker.state(), "offline cache ready"),
        Err(err) => {
            warn!(%err, "offline cache unavailable");
            actions.set_offline_error(Some(format!("离线缓存不可用: {err}")));
        }
    }
    actions.set_offline_lifecycle(worker.state());
    Some(worker)
}

// 逐步推进，让角标经过每个中间状态
async fn run_lifecycle<S, N>(
    worker: &mut OfflineWorker<S, N>,
    report: impl Fn(LifecycleState),
) -> WorkerResult<()>
where
    S: CacheStorage,
    N: Network,
{
    report(LifecycleState::Installing);
    worker.install().await?;
    report(LifecycleState::Installed);

    if worker.config().skip_waiting {
        report(LifecycleState::Activating);
        let removed = worker.activate().await?;
        debug!(?removed, "stale caches removed");
    }
    Ok(())
}

/// 经由离线 Worker 读取应用清单，用作页面标题
pub fn use_app_manifest(client: OfflineClient) -> Option<AppManifest> {
    let manifest = use_resource(move || async move {
        let worker = client.worker()?;
        load_manifest(&*worker)
            .await
            .map_err(|err| warn!(?err, "manifest unavailable"))
            .ok()
    });

    manifest.cloned().flatten()
}

async fn load_manifest<S, N>(worker: &OfflineWorker<S, N>) -> anyhow::Result<AppManifest>
where
    S: CacheStorage,
    N: Network,
{
    let url = worker
        .config()
        .scope_url()?
        .join("./manifest.json")
        .context("failed to resolve manifest url")?;
    let response = worker.fetch(&FetchRequest::get(url)).await?;
    anyhow::ensure!(
        response.is_success(),
        "manifest request returned status {}",
        response.status
    );
    AppManifest::from_json(&response.body).context("manifest is not valid json")
}
