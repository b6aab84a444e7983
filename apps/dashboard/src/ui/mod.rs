pub mod dashboard;
pub mod entity_selector;
pub mod header;
pub mod metric_selector;
