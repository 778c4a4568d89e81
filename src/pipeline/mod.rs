//! # 数据收集与规范化流水线
//!
//! 目录发现 → 逐 collection 规范化（并行）→ CSV 元数据合并 → 报告模型构建。
//!
//! 只有根目录发现失败是致命的；其余错误都在字段或 CSV 层面降级，
//! 即使所有文件都缺失也能得到结构完整的（大部分为空的）报告模型。
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 使用 `batch/`, `parsers/`, `models/`
//! - 子模块: normalizer, merger, builder

pub mod builder;
pub mod merger;
pub mod normalizer;

pub use builder::{build_model, render_context};
pub use merger::merge;
pub use normalizer::CollectionNormalizer;

use crate::batch::{BatchRunner, DiscoveredCollection, Layout, PathDiscoverer};
use crate::error::Result;
use crate::models::ReportModel;
use crate::parsers::{FormatReader, ProjectSheetReader};

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// 收集选项
#[derive(Debug, Clone)]
pub struct CollectOptions {
    /// 目录布局
    pub layout: Layout,
    /// 并行作业数（0 = 全部 CPU）
    pub jobs: usize,
    /// 可选 CSV 项目表
    pub csv: Option<PathBuf>,
    /// 是否显示进度条
    pub show_progress: bool,
}

impl Default for CollectOptions {
    fn default() -> Self {
        CollectOptions {
            layout: Layout::Flat,
            jobs: 0,
            csv: None,
            show_progress: true,
        }
    }
}

/// 运行统计（不写入 JSON 模型）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub pucks: usize,
    pub collections: usize,
    pub with_processing: usize,
    pub screened: usize,
    pub parse_failures: usize,
    /// 第一个解析失败的描述
    pub first_failure: Option<String>,
    pub csv_rows: usize,
    pub csv_matched: usize,
    pub csv_unmatched: usize,
}

/// 收集结果
#[derive(Debug, Clone)]
pub struct CollectOutcome {
    pub model: ReportModel,
    pub stats: RunStats,
}

/// 从数据根目录收集并构建报告模型
pub fn collect(root: &Path, options: &CollectOptions) -> Result<CollectOutcome> {
    info!(root = %root.display(), layout = %options.layout, "starting data collection");

    let discovery = PathDiscoverer::new(root)
        .with_layout(options.layout)
        .discover()?;
    debug!(pucks = ?discovery.puck_keys(), "pucks discovered");
    let found: Vec<DiscoveredCollection> = discovery.collect();

    let normalizer = CollectionNormalizer::new();
    let runner = BatchRunner::new(options.jobs).with_progress(options.show_progress);
    debug!(jobs = runner.jobs(), collections = found.len(), "normalizing");
    let normalized = runner.run(found, "Normalizing collections", |c| normalizer.normalize(c));

    let mut stats = RunStats {
        collections: normalized.len(),
        parse_failures: normalized.iter().map(|n| n.failures.len()).sum(),
        first_failure: normalized
            .iter()
            .find_map(|n| n.failures.first().cloned()),
        ..Default::default()
    };

    let sheet = options.csv.as_deref().and_then(|path| {
        let outcome = ProjectSheetReader.read(Some(path));
        if outcome.is_failed() {
            warn!(path = %path.display(), "CSV enrichment disabled");
        }
        outcome.into_option()
    });

    let records = normalized
        .into_iter()
        .map(|n| (n.puck, n.record))
        .collect::<Vec<_>>();
    let merged = merge(records, sheet.as_ref());

    stats.csv_rows = sheet.as_ref().map(|s| s.len()).unwrap_or(0);
    stats.csv_matched = merged.matched;
    stats.csv_unmatched = merged.unmatched.len();

    let model = build_model(merged.records, merged.csv_loaded);

    stats.pucks = model.puck_keys().count();
    stats.with_processing = model
        .records()
        .filter(|(_, r)| r.processing.is_some())
        .count();
    stats.screened = model.records().filter(|(_, r)| r.screen).count();

    info!(
        pucks = stats.pucks,
        collections = stats.collections,
        processed = stats.with_processing,
        screened = stats.screened,
        parse_failures = stats.parse_failures,
        csv_loaded = model.csv_loaded,
        "data collection completed"
    );

    Ok(CollectOutcome { model, stats })
}
