use std::cell::RefCell;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{profit_rate, DataItem, HistoryPoint, Mode};

const NAMES: [&str; 20] = [
    "张伟", "李强", "王芳", "赵杰", "孙敏", "周涛", "吴兰", "郑华", "陈明", "刘静", "杨洋", "徐辉",
    "朱丽", "郭平", "马超", "罗薇", "胡康", "林森", "何光", "高建",
];

const PROJECTS: [&str; 15] = [
    "阿尔法塔楼",
    "贝塔商业中心",
    "海湾大桥维修",
    "地铁3号线",
    "高新区软件园",
    "中心医院扩建",
    "滨江公园景观",
    "智慧城市系统",
    "东部快速路",
    "西城改造",
    "云端数据中心",
    "未来学校一期",
    "国际会展中心",
    "深海探测基地",
    "航空物流园",
];

const DEPARTMENTS: [&str; 8] = [
    "总经办",
    "工程部",
    "财务部",
    "市场部",
    "人力资源部",
    "技术研发部",
    "安全质检部",
    "后勤保障部",
];

pub const HISTORY_LEN: usize = 6;

/// 实体数据来源。每次调用都会生成一组全新的实体，数值不保证稳定。
pub trait EntitySource {
    fn generate(&self, mode: Mode) -> Vec<DataItem>;
}

/// 演示用的随机数据源，在接入真实后端之前驱动整个看板。
#[derive(Clone, Debug)]
pub struct MockDataSource {
    rng: RefCell<StdRng>,
}

impl Default for MockDataSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDataSource {
    pub fn new() -> Self {
        Self {
            rng: RefCell::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl EntitySource for MockDataSource {
    fn generate(&self, mode: Mode) -> Vec<DataItem> {
        let mut rng = self.rng.borrow_mut();
        source_names(mode)
            .into_iter()
            .enumerate()
            .map(|(index, name)| build_item(&mut *rng, index, name))
            .collect()
    }
}

fn source_names(mode: Mode) -> Vec<String> {
    match mode {
        Mode::Personnel | Mode::Leader => doubled(&NAMES, " (B组)"),
        Mode::Project => doubled(&PROJECTS, " 二期"),
        Mode::Enterprise => DEPARTMENTS.iter().map(|name| name.to_string()).collect(),
    }
}

fn doubled(names: &[&str], suffix: &str) -> Vec<String> {
    names
        .iter()
        .map(|name| name.to_string())
        .chain(names.iter().map(|name| format!("{name}{suffix}")))
        .collect()
}

fn build_item<R: Rng + ?Sized>(rng: &mut R, index: usize, name: String) -> DataItem {
    let income: u32 = rng.gen_range(50_000..=500_000);
    let ratio: u32 = rng.gen_range(40..=90);
    let expense = (u64::from(income) * u64::from(ratio) / 100) as u32;

    let history = (0..HISTORY_LEN)
        .map(|month| HistoryPoint {
            label: format!("{}月", month + 1),
            value: rng.gen_range(10_000..=100_000),
        })
        .collect();

    DataItem {
        id: format!("id-{index}"),
        name,
        manager: NAMES[rng.gen_range(0..NAMES.len())].to_string(),
        income,
        expense,
        profit_rate: profit_rate(income, expense),
        progress: rng.gen_range(10..=95),
        work_hours: rng.gen_range(120..=200),
        safety_score: rng.gen_range(85..=100),
        history,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_counts_follow_mode() {
        let source = MockDataSource::seeded(7);
        assert_eq!(source.generate(Mode::Personnel).len(), 40);
        assert_eq!(source.generate(Mode::Leader).len(), 40);
        assert_eq!(source.generate(Mode::Project).len(), 30);
        assert_eq!(source.generate(Mode::Enterprise).len(), 8);
    }

    #[test]
    fn generated_fields_stay_in_range() {
        let source = MockDataSource::seeded(42);
        for mode in Mode::ALL {
            for (index, item) in source.generate(mode).iter().enumerate() {
                assert_eq!(item.id, format!("id-{index}"));
                assert!((50_000..=500_000).contains(&item.income));
                assert!((10..=95).contains(&item.progress));
                assert!((120..=200).contains(&item.work_hours));
                assert!((85..=100).contains(&item.safety_score));
                assert_eq!(item.profit_rate, profit_rate(item.income, item.expense));
                assert_eq!(item.history.len(), HISTORY_LEN);
                assert_eq!(item.history[0].label, "1月");
                assert_eq!(item.history[5].label, "6月");
                assert!(NAMES.contains(&item.manager.as_str()));
            }
        }
    }

    #[test]
    fn project_names_include_second_phase() {
        let items = MockDataSource::seeded(1).generate(Mode::Project);
        assert_eq!(items[0].name, "阿尔法塔楼");
        assert_eq!(items[15].name, "阿尔法塔楼 二期");
    }

    #[test]
    fn seeded_sources_are_reproducible() {
        let left = MockDataSource::seeded(99).generate(Mode::Enterprise);
        let right = MockDataSource::seeded(99).generate(Mode::Enterprise);
        assert_eq!(left, right);
    }
}
