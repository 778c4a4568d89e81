//! # CSV 元数据合并
//!
//! 按 (puck, collection) 精确匹配，把 CSV 项目表中的 `Project` 与
//! `Staff_Comments` 附加到规范化记录上。CSV 只做补充：不会新增或删除记录。
//!
//! ## 依赖关系
//! - 被 `pipeline/mod.rs` 调用
//! - 使用 `parsers/project_sheet.rs` 的 `ProjectSheet`

use crate::error::JoinKeyMismatch;
use crate::models::CollectionRecord;
use crate::parsers::ProjectSheet;

use std::collections::HashSet;
use tracing::debug;

/// 合并结果
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    /// (puck, record)，顺序与输入一致
    pub records: Vec<(String, CollectionRecord)>,
    /// CSV 已解析且非空
    pub csv_loaded: bool,
    /// 匹配到 CSV 行的记录数
    pub matched: usize,
    /// 未匹配任何记录的 CSV 行
    pub unmatched: Vec<JoinKeyMismatch>,
}

/// 合并 CSV 项目信息
pub fn merge(records: Vec<(String, CollectionRecord)>, sheet: Option<&ProjectSheet>) -> MergeOutcome {
    let Some(sheet) = sheet.filter(|s| !s.is_empty()) else {
        return MergeOutcome {
            records,
            csv_loaded: false,
            matched: 0,
            unmatched: Vec::new(),
        };
    };

    let mut matched = 0;
    let records: Vec<(String, CollectionRecord)> = records
        .into_iter()
        .map(|(puck, record)| match sheet.get(&puck, &record.collection) {
            Some(row) => {
                matched += 1;
                let record =
                    record.with_project_metadata(row.project.clone(), row.staff_comments.clone());
                (puck, record)
            }
            None => (puck, record),
        })
        .collect();

    let known: HashSet<(&str, &str)> = records
        .iter()
        .map(|(puck, record)| (puck.as_str(), record.collection.as_str()))
        .collect();
    let unmatched: Vec<JoinKeyMismatch> = sheet
        .rows()
        .iter()
        .filter(|row| !known.contains(&(row.puck.as_str(), row.collection.as_str())))
        .map(|row| JoinKeyMismatch {
            puck: row.puck.clone(),
            collection: row.collection.clone(),
        })
        .collect();

    for mismatch in &unmatched {
        debug!("{}", mismatch);
    }
    debug!(
        rows = sheet.len(),
        matched,
        unmatched = unmatched.len(),
        "CSV metadata merged"
    );

    MergeOutcome {
        records,
        csv_loaded: true,
        matched,
        unmatched,
    }
}
