//! # 数据模型模块
//!
//! 定义 collection 记录、处理结果与报告的统一数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `pipeline/`, `report/` 使用
//! - 子模块: processing, collection, report

pub mod collection;
pub mod processing;
pub mod report;

pub use collection::{CollectionFiles, CollectionRecord, DiffCenter, ImageSet};
pub use processing::{
    AutoProcSummary, CellData, ProcessingResult, ScaleData, ScreeningResult, Shell, ShellStatistics,
};
pub use report::{PuckGroup, RenderContext, ReportModel};
