use dioxus::prelude::*;

use crate::state::{use_app_actions, use_app_state};

/// 底部条目选择栏，横向滚动。
#[component]
pub fn EntitySelector() -> Element {
    let actions = use_app_actions();
    let app_state = use_app_state();

    let snapshot = app_state.read();
    let total = snapshot.view.raw_data().len();
    let selected = snapshot.view.selected_ids().len();
    let items: Vec<(String, String, String, bool)> = snapshot
        .view
        .raw_data()
        .iter()
        .map(|item| {
            (
                item.id.clone(),
                item.id.clone(),
                item.name.clone(),
                snapshot.view.is_id_selected(&item.id),
            )
        })
        .collect();
    drop(snapshot);

    rsx! {
        div { class: "bg-white border-t border-slate-200 pb-safe",
            div { class: "px-3 py-2",
                div { class: "flex justify-between items-center mb-2",
                    p { class: "text-[10px] text-slate-400 font-bold uppercase tracking-wider",
                        "可选列表 ({total})"
                    }
                    span { class: "text-[10px] text-indigo-600 font-medium bg-indigo-50 px-2 py-0.5 rounded-full",
                        "已选 {selected}"
                    }
                }
                div { class: "flex space-x-2 overflow-x-auto no-scrollbar pb-1",
                    for (key, id, name, is_selected) in items {
                        button {
                            key: "{key}",
                            class: if is_selected {
                                "flex-shrink-0 px-3 py-1.5 rounded-md text-xs font-medium border select-none bg-slate-800 text-white border-slate-800 shadow-sm"
                            } else {
                                "flex-shrink-0 px-3 py-1.5 rounded-md text-xs font-medium border select-none bg-white text-slate-600 border-slate-200 hover:border-slate-300"
                            },
                            onclick: move |_| actions.toggle_id(&id),
                            "{name}"
                        }
                    }
                }
            }
        }
    }
}
