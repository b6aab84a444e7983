use dioxus::prelude::*;
use time::{Date, OffsetDateTime};
use tracing::debug;

use crate::fixtures::mock_data::{EntitySource, MockDataSource};
use crate::models::{mode_metrics, DataItem, DateRange, Metric, Mode};
use crate::worker::{CachePolicy, LifecycleState};

pub type AppSignal = Signal<AppState>;

const DEFAULT_SELECTION: usize = 3;

/// 视图状态：模式、日期区间、选择项，以及当前模式生成的条目集合
#[derive(Clone, Debug, PartialEq)]
pub struct ViewState {
    mode: Mode,
    date_range: DateRange,
    raw_data: Vec<DataItem>,
    selected_ids: Vec<String>,
    selected_metrics: Vec<Metric>,
}

/// 过滤视图：已选条目按生成顺序排列，指标按选择顺序排列
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilteredView<'a> {
    pub entities: &'a [DataItem],
    pub selected_ids: &'a [String],
    pub metrics: &'a [Metric],
}

impl<'a> FilteredView<'a> {
    pub fn iter(&self) -> impl Iterator<Item = &'a DataItem> + 'a {
        let entities = self.entities;
        let selected = self.selected_ids;
        entities
            .iter()
            .filter(move |item| selected.contains(&item.id))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none() || self.metrics.is_empty()
    }

    pub fn to_vec(&self) -> Vec<DataItem> {
        self.iter().cloned().collect()
    }
}

impl ViewState {
    pub fn initial<S: EntitySource + ?Sized>(source: &S, today: Date) -> Self {
        let mut view = Self {
            mode: Mode::default(),
            date_range: DateRange::current_month(today),
            raw_data: Vec::new(),
            selected_ids: Vec::new(),
            selected_metrics: Vec::new(),
        };
        view.set_mode(view.mode, source);
        view
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn date_range(&self) -> DateRange {
        self.date_range
    }

    pub fn raw_data(&self) -> &[DataItem] {
        &self.raw_data
    }

    pub fn selected_ids(&self) -> &[String] {
        &self.selected_ids
    }

    pub fn selected_metrics(&self) -> &[Metric] {
        &self.selected_metrics
    }

    pub fn available_metrics(&self) -> &'static [Metric] {
        mode_metrics(self.mode)
    }

    pub fn is_metric_selected(&self, metric: Metric) -> bool {
        self.selected_metrics.contains(&metric)
    }

    pub fn is_id_selected(&self, id: &str) -> bool {
        self.selected_ids.iter().any(|selected| selected == id)
    }

    /// 切换模式并重置派生状态。旧的选择项即使仍然合法也会被丢弃
    pub fn set_mode<S: EntitySource + ?Sized>(&mut self, mode: Mode, source: &S) {
        self.mode = mode;
        self.raw_data = source.generate(mode);
        self.selected_ids = self
            .raw_data
            .iter()
            .take(DEFAULT_SELECTION)
            .map(|item| item.id.clone())
            .collect();
        self.selected_metrics = mode_metrics(mode).first().copied().into_iter().collect();
        debug!(
            ?mode,
            entities = self.raw_data.len(),
            "view state reset for mode"
        );
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.date_range = range;
    }

    pub fn toggle_metric(&mut self, metric: Metric) {
        if !self.available_metrics().contains(&metric) {
            debug!(?metric, mode = ?self.mode, "ignoring metric outside current mode");
            return;
        }
        toggle_keeping_one(&mut self.selected_metrics, metric);
    }

    pub fn toggle_id(&mut self, id: &str) {
        if !self.raw_data.iter().any(|item| item.id == id) {
            debug!(id, "ignoring unknown entity id");
            return;
        }
        toggle_keeping_one(&mut self.selected_ids, id.to_string());
    }

    pub fn filtered_view(&self) -> FilteredView<'_> {
        FilteredView {
            entities: &self.raw_data,
            selected_ids: &self.selected_ids,
            metrics: &self.selected_metrics,
        }
    }
}

/// 已存在则移除（最后一个除外），否则追加到末尾
fn toggle_keeping_one<T: PartialEq>(values: &mut Vec<T>, value: T) {
    match values.iter().position(|existing| *existing == value) {
        Some(_) if values.len() == 1 => {}
        Some(index) => {
            values.remove(index);
        }
        None => values.push(value),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OfflineState {
    pub lifecycle: LifecycleState,
    pub cache_name: Option<String>,
    pub policy: CachePolicy,
    pub error: Option<String>,
}

impl Default for OfflineState {
    fn default() -> Self {
        Self {
            lifecycle: LifecycleState::Unregistered,
            cache_name: None,
            policy: CachePolicy::default(),
            error: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppState {
    pub view: ViewState,
    pub offline: OfflineState,
}

impl AppState {
    pub fn new(today: Date) -> Self {
        Self {
            view: ViewState::initial(&MockDataSource::new(), today),
            offline: OfflineState::default(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(OffsetDateTime::now_utc().date())
    }
}

#[derive(Clone, Copy)]
pub struct AppActions {
    state: AppSignal,
}

impl AppActions {
    pub fn set_mode(&self, mode: Mode) {
        let source = MockDataSource::new();
        let mut signal = self.state;
        signal.write().view.set_mode(mode, &source);
    }

    pub fn set_date_range(&self, range: DateRange) {
        let mut signal = self.state;
        signal.write().view.set_date_range(range);
    }

    pub fn toggle_metric(&self, metric: Metric) {
        let mut signal = self.state;
        signal.write().view.toggle_metric(metric);
    }

    pub fn toggle_id(&self, id: &str) {
        let mut signal = self.state;
        signal.write().view.toggle_id(id);
    }

    pub fn set_offline_lifecycle(&self, lifecycle: LifecycleState) {
        let mut signal = self.state;
        let mut state = signal.write();
        state.offline.lifecycle = lifecycle;
        if lifecycle == LifecycleState::Active {
            state.offline.error = None;
        }
    }

    pub fn set_offline_target(&self, cache_name: String, policy: CachePolicy) {
        let mut signal = self.state;
        let mut state = signal.write();
        state.offline.cache_name = Some(cache_name);
        state.offline.policy = policy;
    }

    pub fn set_offline_error(&self, message: Option<String>) {
        let mut signal = self.state;
        signal.write().offline.error = message;
    }
}

pub fn use_app_state() -> AppSignal {
    try_use_context::<AppSignal>().expect("AppState context not provided")
}

pub fn use_app_actions() -> AppActions {
    let state = use_app_state();
    AppActions { state }
}
