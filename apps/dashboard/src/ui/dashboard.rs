use dioxus::prelude::*;

use crate::models::{DataItem, Metric};
use crate::state::use_app_state;

/// 中部数据区：每个已选条目一张卡片，卡片内按指标选择顺序排列。
#[component]
pub fn DataDashboard() -> Element {
    let app_state = use_app_state();

    let snapshot = app_state.read();
    let view = snapshot.view.filtered_view();
    let items = view.to_vec();
    let metrics = view.metrics.to_vec();
    drop(snapshot);

    if items.is_empty() {
        return rsx! { EmptyHint { message: "请在下方选择至少一项条目" } };
    }
    if metrics.is_empty() {
        return rsx! { EmptyHint { message: "请在上方选择至少一个指标" } };
    }

    rsx! {
        div { class: "p-4 space-y-4 pb-20",
            for item in items {
                EntityCard { key: "{item.id}", item: item.clone(), metrics: metrics.clone() }
            }
        }
    }
}

#[component]
fn EmptyHint(message: &'static str) -> Element {
    rsx! {
        div { class: "flex flex-col items-center justify-center h-full text-slate-400",
            p { "{message}" }
        }
    }
}

#[component]
fn EntityCard(item: DataItem, metrics: Vec<Metric>) -> Element {
    let short_id = item.short_id().to_string();

    rsx! {
        div { class: "bg-white rounded-2xl p-5 shadow-sm border border-slate-100",
            div { class: "flex justify-between items-start mb-2 border-b border-slate-50 pb-2",
                h3 { class: "font-bold text-slate-800 text-lg", "{item.name}" }
                span { class: "text-xs font-medium px-2 py-1 bg-slate-100 text-slate-500 rounded-md",
                    "ID: {short_id}"
                }
            }
            div { class: "space-y-4",
                for (index, metric) in metrics.iter().copied().enumerate() {
                    if index > 0 {
                        div { class: "h-px bg-slate-100 my-2" }
                    }
                    {metric_block(metric, &item)}
                }
            }
        }
    }
}

fn metric_block(metric: Metric, item: &DataItem) -> Element {
    match metric {
        Metric::Income | Metric::Expense => {
            let is_income = metric == Metric::Income;
            let amount = format_currency(if is_income { item.income } else { item.expense });
            let bar_class = if is_income {
                "flex-1 rounded-t bg-indigo-500"
            } else {
                "flex-1 rounded-t bg-rose-500"
            };
            let bars = bar_heights(item);
            rsx! {
                div { class: "h-40 w-full mt-2",
                    div { class: "flex justify-between items-center mb-1 px-1",
                        span { class: "text-xs font-bold px-2 py-0.5 rounded bg-slate-100", "{metric}" }
                        span { class: "text-lg font-bold", "{amount}" }
                    }
                    div { class: "flex items-end gap-1 h-28",
                        for (label, height) in bars {
                            div { key: "{label}", class: bar_class, title: "{label}", style: "height: {height}%" }
                        }
                    }
                }
            }
        }
        Metric::ProfitRate => {
            let bars = bar_heights(item);
            rsx! {
                div { class: "h-40 w-full mt-2",
                    div { class: "flex justify-between items-center mb-1 px-1",
                        span { class: "text-xs font-bold px-2 py-0.5 rounded bg-emerald-100 text-emerald-700", "盈利率" }
                        span { class: "text-lg font-bold text-emerald-700", "{item.profit_rate}%" }
                    }
                    div { class: "flex items-end h-28",
                        for (label, height) in bars {
                            div { key: "{label}", class: "flex-1 bg-emerald-200/60", style: "height: {height}%" }
                        }
                    }
                }
            }
        }
        Metric::Manager => {
            let initial = item.manager.chars().next().map(String::from).unwrap_or_default();
            rsx! {
                div { class: "flex items-center space-x-4 p-3 bg-slate-50 rounded-xl border border-slate-100 mt-2",
                    div { class: "h-10 w-10 rounded-full bg-indigo-100 flex items-center justify-center text-indigo-600 font-bold text-sm",
                        "{initial}"
                    }
                    div {
                        p { class: "text-xs text-slate-500", "当前负责人" }
                        p { class: "text-base font-bold text-slate-800", "{item.manager}" }
                    }
                }
            }
        }
        Metric::Progress => rsx! {
            div { class: "mt-4 px-1",
                div { class: "flex justify-between items-center mb-2",
                    span { class: "text-xs font-bold px-2 py-0.5 rounded bg-blue-100 text-blue-700", "进度" }
                    span { class: "text-lg font-bold text-blue-600", "{item.progress}%" }
                }
                div { class: "w-full bg-slate-100 rounded-full h-3",
                    div { class: "bg-blue-500 h-3 rounded-full", style: "width: {item.progress}%" }
                }
            }
        },
        Metric::WorkHours => rsx! {
            div { class: "mt-4 px-1 flex items-center justify-between",
                div {
                    p { class: "text-xs text-slate-500 font-bold", "本月工时" }
                    p { class: "text-lg font-bold text-slate-800", "{item.work_hours} 小时" }
                }
            }
        },
        Metric::SafetyScore => {
            let score_class = if item.safety_score > 90 {
                "text-xl font-bold text-emerald-600"
            } else {
                "text-xl font-bold text-amber-600"
            };
            rsx! {
                div { class: "mt-4 px-1",
                    p { class: "text-xs text-slate-500 font-bold", "安全评分" }
                    p { class: score_class, "{item.safety_score}" }
                }
            }
        }
        other => rsx! {
            div { class: "mt-2 px-1 flex justify-between text-xs text-slate-500",
                span { "{other}" }
                span { "-" }
            }
        },
    }
}

/// 历史柱高，按最高点的百分比计算
fn bar_heights(item: &DataItem) -> Vec<(String, u32)> {
    let max = item
        .history
        .iter()
        .map(|point| point.value)
        .max()
        .unwrap_or(0)
        .max(1);
    item.history
        .iter()
        .map(|point| (point.label.clone(), point.value * 100 / max))
        .collect()
}

/// 人民币金额，保留三位有效数字，例如 `¥123,000`
fn format_currency(value: u32) -> String {
    let digits = value.checked_ilog10().unwrap_or(0);
    let scale = 10u64.pow(digits.saturating_sub(2));
    let rounded = (u64::from(value) + scale / 2) / scale * scale;

    let raw = rounded.to_string();
    let mut grouped = String::with_capacity(raw.len() + raw.len() / 3);
    for (index, ch) in raw.chars().enumerate() {
        if index > 0 && (raw.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("¥{grouped}")
}
