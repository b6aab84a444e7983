#![allow(non_snake_case)]

mod api;
mod config;
mod fixtures;
mod hooks;
mod models;
mod state;
mod ui;
mod worker;

use config::AppConfig;
use dioxus::prelude::*;
use dioxus_router::prelude::*;
use hooks::offline::{use_app_manifest, use_offline_worker};
use once_cell::sync::OnceCell;
use state::AppState;
use tracing::info;
use ui::dashboard::DataDashboard;
use ui::entity_selector::EntitySelector;
use ui::header::Header;
use ui::metric_selector::MetricSelector;

pub(crate) static APP_CONFIG: OnceCell<AppConfig> = OnceCell::new();

const DEFAULT_TITLE: &str = "DataViz";

fn main() {
    console_error_panic_hook::set_once();
    init_logging();
    bootstrap_infrastructure();
    launch(App);
}

fn init_logging() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = dioxus_logger::init(tracing::Level::INFO);
    });
}

fn bootstrap_infrastructure() {
    let config = AppConfig::from_env();
    info!(
        profile = ?config.profile,
        scope = ?config.scope_url,
        policy = %config.cache_policy,
        cache_version = %config.cache_version,
        "dashboard configuration loaded"
    );
    let _ = APP_CONFIG.set(config);
}

#[component]
fn App() -> Element {
    let app_state = use_signal(AppState::default);

    use_context_provider(|| app_state);

    rsx! {
        Router::<Route> {}
    }
}

#[derive(Clone, Routable, Debug, PartialEq)]
enum Route {
    #[route("/")]
    Dashboard {},
}

#[component]
fn Dashboard() -> Element {
    let offline = use_offline_worker();
    let title = use_app_manifest(offline)
        .map(|manifest| manifest.title().to_string())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());

    rsx! {
        document::Title { "{title}" }
        div { class: "flex flex-col h-screen bg-slate-50 text-slate-900",
            Header {}
            MetricSelector {}
            main { class: "flex-1 overflow-y-auto", DataDashboard {} }
            footer { class: "flex-none", EntitySelector {} }
        }
    }
}
