//! # 报告模型构建
//!
//! 纯聚合：把合并后的记录按 puck 分组（保持发现顺序），生成 `ReportModel`，
//! 并生成渲染上下文。此处不做任何解析或 I/O；生成时间由调用方注入。
//!
//! ## 依赖关系
//! - 被 `pipeline/mod.rs`, `commands/` 调用
//! - 使用 `models/report.rs`

use crate::models::{CollectionRecord, PuckGroup, RenderContext, ReportModel};
use chrono::NaiveDateTime;

/// 按 puck 分组，puck 顺序为首次出现顺序，组内保持输入顺序
pub fn build_model(records: Vec<(String, CollectionRecord)>, csv_loaded: bool) -> ReportModel {
    let mut pucks: Vec<PuckGroup> = Vec::new();

    for (puck, record) in records {
        match pucks.iter_mut().rev().find(|g| g.puck == puck) {
            Some(group) => group.collections.push(record),
            None => pucks.push(PuckGroup {
                puck,
                collections: vec![record],
            }),
        }
    }

    ReportModel { pucks, csv_loaded }
}

/// 渲染上下文
pub fn render_context(
    model: &ReportModel,
    report_title: impl Into<String>,
    generated_at: NaiveDateTime,
) -> RenderContext {
    RenderContext {
        report_title: report_title.into(),
        csv_loaded: model.csv_loaded,
        generated_at,
    }
}
