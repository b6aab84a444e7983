use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::macros::format_description;
use time::{Date, Month};

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Personnel,
    Project,
    Leader,
    Enterprise,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Personnel, Mode::Project, Mode::Leader, Mode::Enterprise];

    pub fn label(self) -> &'static str {
        match self {
            Mode::Personnel => "人员模式",
            Mode::Project => "项目模式",
            Mode::Leader => "带班模式",
            Mode::Enterprise => "企业模式",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Income,
    Expense,
    Manager,
    ProfitRate,
    Progress,
    WorkHours,
    SafetyScore,

    Pricing,
    Project,
    TeamLeader,
    Measurement,
    UnitPrice,
    Amount,
    Date,
    Remarks,
}

impl Metric {
    pub fn label(self) -> &'static str {
        match self {
            Metric::Income => "收入",
            Metric::Expense => "支出",
            Metric::Manager => "负责人",
            Metric::ProfitRate => "盈利率",
            Metric::Progress => "进度",
            Metric::WorkHours => "工时",
            Metric::SafetyScore => "安全分",
            Metric::Pricing => "计价",
            Metric::Project => "项目",
            Metric::TeamLeader => "带班",
            Metric::Measurement => "计量",
            Metric::UnitPrice => "单价",
            Metric::Amount => "金额",
            Metric::Date => "日期",
            Metric::Remarks => "备注",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 某模式下可选的指标，第一项为切换模式后的默认选择
pub fn mode_metrics(mode: Mode) -> &'static [Metric] {
    match mode {
        Mode::Personnel => &[
            Metric::Pricing,
            Metric::Project,
            Metric::TeamLeader,
            Metric::Measurement,
            Metric::UnitPrice,
            Metric::Amount,
            Metric::Date,
            Metric::Remarks,
        ],
        Mode::Project => &[
            Metric::Progress,
            Metric::Income,
            Metric::Expense,
            Metric::ProfitRate,
            Metric::Manager,
        ],
        Mode::Leader => &[Metric::SafetyScore, Metric::WorkHours, Metric::Manager],
        Mode::Enterprise => &[Metric::Income, Metric::Expense, Metric::ProfitRate],
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HistoryPoint {
    pub label: String,
    pub value: u32,
}

/// 单个可查看的对象：人员、项目、领导或部门
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DataItem {
    pub id: String,
    pub name: String,
    pub manager: String,
    pub income: u32,
    pub expense: u32,
    pub profit_rate: f64,
    pub progress: u8,
    pub work_hours: u16,
    pub safety_score: u8,
    pub history: Vec<HistoryPoint>,
}

impl DataItem {
    /// `id-N` 的数字后缀，用于卡片角标
    pub fn short_id(&self) -> &str {
        self.id.rsplit('-').next().unwrap_or(&self.id)
    }
}

/// 盈利率（百分比），保留一位小数
pub fn profit_rate(income: u32, expense: u32) -> f64 {
    if income == 0 {
        return 0.0;
    }
    let raw = (f64::from(income) - f64::from(expense)) / f64::from(income) * 100.0;
    (raw * 10.0).round() / 10.0
}

/// 应用清单（Web App Manifest）中页面用到的字段
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppManifest {
    pub name: String,
    #[serde(default)]
    pub short_name: Option<String>,
}

impl AppManifest {
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    pub fn title(&self) -> &str {
        self.short_name.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("invalid date `{value}`: expected YYYY-MM-DD")]
    InvalidDate { value: String },
    #[error("invalid month {year}-{month}")]
    InvalidMonth { year: i32, month: u8 },
}

/// 日期区间：只用于展示，不参与数据过滤
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    /// 构造区间，起点晚于终点时自动交换
    pub fn new(start: Date, end: Date) -> Self {
        if start > end {
            tracing::debug!(%start, %end, "inverted date range normalized");
            Self { start: end, end: start }
        } else {
            Self { start, end }
        }
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, DateRangeError> {
        Ok(Self::new(parse_iso_date(start)?, parse_iso_date(end)?))
    }

    pub fn single_day(date: Date) -> Self {
        Self { start: date, end: date }
    }

    pub fn month(year: i32, month: u8) -> Result<Self, DateRangeError> {
        let invalid = || DateRangeError::InvalidMonth { year, month };
        let calendar_month = Month::try_from(month).map_err(|_| invalid())?;
        let start = Date::from_calendar_date(year, calendar_month, 1).map_err(|_| invalid())?;
        let last_day = time::util::days_in_year_month(year, calendar_month);
        let end = Date::from_calendar_date(year, calendar_month, last_day).map_err(|_| invalid())?;
        Ok(Self { start, end })
    }

    /// 本月第一天到 `today`
    pub fn current_month(today: Date) -> Self {
        let start = today.replace_day(1).unwrap_or(today);
        Self { start, end: today }
    }

    pub fn start(&self) -> Date {
        self.start
    }

    pub fn end(&self) -> Date {
        self.end
    }

    pub fn is_single_day(&self) -> bool {
        self.start == self.end
    }

    pub fn start_iso(&self) -> String {
        iso_date(self.start)
    }

    pub fn end_iso(&self) -> String {
        iso_date(self.end)
    }

    /// 起始日期的 `YYYY-MM`，供月份选择器使用
    pub fn start_month_iso(&self) -> String {
        format!("{:04}-{:02}", self.start.year(), u8::from(self.start.month()))
    }

    pub fn label(&self) -> String {
        if self.is_single_day() {
            slashed_date(self.start)
        } else {
            format!("{} - {}", slashed_date(self.start), slashed_date(self.end))
        }
    }
}

pub fn parse_iso_date(value: &str) -> Result<Date, DateRangeError> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]")).map_err(|_| {
        DateRangeError::InvalidDate {
            value: value.to_string(),
        }
    })
}

/// 解析月份选择器的 `YYYY-MM` 值
pub fn parse_iso_month(value: &str) -> Result<(i32, u8), DateRangeError> {
    let invalid = || DateRangeError::InvalidDate {
        value: value.to_string(),
    };
    let (year, month) = value.trim().split_once('-').ok_or_else(invalid)?;
    let year = year.parse::<i32>().map_err(|_| invalid())?;
    let month = month.parse::<u8>().map_err(|_| invalid())?;
    Ok((year, month))
}

fn iso_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

fn slashed_date(date: Date) -> String {
    format!(
        "{:04}/{:02}/{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}
