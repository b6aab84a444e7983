use dioxus::prelude::*;

use crate::state::{use_app_actions, use_app_state};

/// 第二行：当前模式下可选的指标，多选，至少保留一个。
#[component]
pub fn MetricSelector() -> Element {
    let actions = use_app_actions();
    let app_state = use_app_state();

    let snapshot = app_state.read();
    let chips: Vec<_> = snapshot
        .view
        .available_metrics()
        .iter()
        .map(|metric| (*metric, snapshot.view.is_metric_selected(*metric)))
        .collect();
    drop(snapshot);

    rsx! {
        div { class: "bg-white border-b border-slate-100 py-3 px-4 z-10",
            div { class: "flex justify-start gap-3 overflow-x-auto no-scrollbar",
                for (metric, is_active) in chips {
                    button {
                        key: "{metric:?}",
                        class: if is_active {
                            "relative flex flex-col items-center justify-center flex-shrink-0 w-[72px] py-2 px-1 rounded-lg border bg-indigo-50 border-indigo-200 text-indigo-700"
                        } else {
                            "relative flex flex-col items-center justify-center flex-shrink-0 w-[72px] py-2 px-1 rounded-lg border bg-white border-slate-100 text-slate-500 hover:bg-slate-50"
                        },
                        onclick: move |_| actions.toggle_metric(metric),
                        if is_active {
                            span { class: "absolute top-1 right-1 h-1.5 w-1.5 rounded-full bg-indigo-600" }
                        }
                        span { class: "text-xs font-medium whitespace-nowrap", "{metric}" }
                    }
                }
            }
        }
    }
}
