use dioxus::prelude::*;
use tracing::warn;

use crate::models::{parse_iso_date, parse_iso_month, DateRange, Mode};
use crate::state::{use_app_actions, use_app_state, AppActions};
use crate::worker::LifecycleState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DateTab {
    Daily,
    Monthly,
    Range,
}

impl DateTab {
    const ALL: [DateTab; 3] = [DateTab::Daily, DateTab::Monthly, DateTab::Range];

    fn label(self) -> &'static str {
        match self {
            DateTab::Daily => "日报",
            DateTab::Monthly => "月报",
            DateTab::Range => "区间",
        }
    }
}

/// 顶部栏：左侧切换模式，右侧选择日期区间，并显示离线缓存状态。
#[component]
pub fn Header() -> Element {
    let actions = use_app_actions();
    let app_state = use_app_state();
    let mut mode_open = use_signal(|| false);
    let mut time_open = use_signal(|| false);

    let snapshot = app_state.read();
    let current_mode = snapshot.view.mode();
    let range = snapshot.view.date_range();
    let offline = snapshot.offline.clone();
    drop(snapshot);

    let range_label = range.label();
    let offline_class = match offline.lifecycle {
        LifecycleState::Active => "rounded-full bg-emerald-50 px-2 py-0.5 text-[10px] text-emerald-700",
        _ if offline.error.is_some() => "rounded-full bg-rose-50 px-2 py-0.5 text-[10px] text-rose-600",
        _ => "rounded-full bg-slate-100 px-2 py-0.5 text-[10px] text-slate-500",
    };
    let offline_title = offline
        .error
        .clone()
        .or_else(|| offline.cache_name.clone().map(|name| format!("{name} · {}", offline.policy)))
        .unwrap_or_default();

    rsx! {
        header { class: "flex justify-between items-center px-4 py-3 bg-white shadow-sm z-50 sticky top-0 border-b border-slate-100",
            div { class: "relative",
                button {
                    class: "flex items-center space-x-2 text-slate-800 font-bold text-lg active:opacity-70",
                    onclick: move |_| {
                        let open = *mode_open.read();
                        mode_open.set(!open);
                        time_open.set(false);
                    },
                    span { "{current_mode}" }
                }
                if *mode_open.read() {
                    div { class: "absolute top-full left-0 mt-2 w-48 bg-white rounded-xl shadow-xl border border-slate-100 overflow-hidden",
                        for mode in Mode::ALL {
                            button {
                                key: "{mode}",
                                class: if mode == current_mode {
                                    "w-full text-left px-4 py-3 text-sm font-medium bg-indigo-50 text-indigo-600"
                                } else {
                                    "w-full text-left px-4 py-3 text-sm font-medium text-slate-600 hover:bg-slate-50"
                                },
                                onclick: move |_| {
                                    actions.set_mode(mode);
                                    mode_open.set(false);
                                },
                                "{mode}"
                            }
                        }
                    }
                }
            }

            div { class: "flex items-center gap-2",
                span { class: offline_class, title: "{offline_title}", {offline.lifecycle.label()} }
                div { class: "relative",
                    button {
                        class: "flex items-center space-x-2 bg-slate-100 px-3 py-1.5 rounded-full text-xs text-slate-600 font-medium max-w-[160px]",
                        onclick: move |_| {
                            let open = *time_open.read();
                            time_open.set(!open);
                            mode_open.set(false);
                        },
                        span { class: "truncate", "{range_label}" }
                    }
                    if *time_open.read() {
                        DatePicker { range: range, on_close: move |_| time_open.set(false) }
                    }
                }
            }
        }
    }
}

#[component]
fn DatePicker(range: DateRange, on_close: EventHandler<()>) -> Element {
    let actions = use_app_actions();
    let mut tab = use_signal(|| DateTab::Range);
    let active = *tab.read();

    let start_iso = range.start_iso();
    let end_iso = range.end_iso();
    let month_iso = range.start_month_iso();

    let fields = match active {
        DateTab::Daily => rsx! {
            label { class: "text-xs text-slate-500", "选择日期" }
            input {
                r#type: "date",
                class: "w-full bg-slate-50 border border-slate-200 rounded-lg px-3 py-2 text-sm",
                value: "{start_iso}",
                oninput: move |evt| apply_daily(actions, &evt.value()),
            }
        },
        DateTab::Monthly => rsx! {
            label { class: "text-xs text-slate-500", "选择月份" }
            input {
                r#type: "month",
                class: "w-full bg-slate-50 border border-slate-200 rounded-lg px-3 py-2 text-sm",
                value: "{month_iso}",
                oninput: move |evt| apply_monthly(actions, &evt.value()),
            }
        },
        DateTab::Range => {
            let end_for_start = end_iso.clone();
            let start_for_end = start_iso.clone();
            rsx! {
                label { class: "text-xs text-slate-500", "开始日期" }
                input {
                    r#type: "date",
                    class: "w-full bg-slate-50 border border-slate-200 rounded-lg px-3 py-2 text-sm",
                    value: "{start_iso}",
                    oninput: move |evt| apply_range(actions, &evt.value(), &end_for_start),
                }
                label { class: "text-xs text-slate-500", "结束日期" }
                input {
                    r#type: "date",
                    class: "w-full bg-slate-50 border border-slate-200 rounded-lg px-3 py-2 text-sm",
                    value: "{end_iso}",
                    oninput: move |evt| apply_range(actions, &start_for_end, &evt.value()),
                }
            }
        }
    };

    rsx! {
        div { class: "absolute top-full right-0 mt-2 w-72 bg-white rounded-xl shadow-xl border border-slate-100 p-4",
            div { class: "flex bg-slate-100 rounded-lg p-1 mb-4",
                for option in DateTab::ALL {
                    button {
                        key: "{option:?}",
                        class: if option == active {
                            "flex-1 py-1.5 rounded-md text-xs font-medium bg-white text-indigo-600 shadow-sm"
                        } else {
                            "flex-1 py-1.5 rounded-md text-xs font-medium text-slate-500 hover:text-slate-700"
                        },
                        onclick: move |_| tab.set(option),
                        {option.label()}
                    }
                }
            }

            div { class: "space-y-4", {fields} }

            button {
                class: "w-full mt-4 bg-indigo-600 text-white text-sm font-medium py-2 rounded-lg hover:bg-indigo-700",
                onclick: move |_| on_close.call(()),
                "确定"
            }
        }
    }
}

fn apply_daily(actions: AppActions, value: &str) {
    match parse_iso_date(value) {
        Ok(date) => actions.set_date_range(DateRange::single_day(date)),
        Err(err) => warn!(%err, "ignoring daily date input"),
    }
}

fn apply_monthly(actions: AppActions, value: &str) {
    match parse_iso_month(value).and_then(|(year, month)| DateRange::month(year, month)) {
        Ok(range) => actions.set_date_range(range),
        Err(err) => warn!(%err, "ignoring month input"),
    }
}

fn apply_range(actions: AppActions, start: &str, end: &str) {
    match DateRange::parse(start, end) {
        Ok(range) => actions.set_date_range(range),
        Err(err) => warn!(%err, "ignoring date range input"),
    }
}
