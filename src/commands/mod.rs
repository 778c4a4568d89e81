//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `pipeline/`, `report/`, `utils/`
//! - 子模块: collect, render, report

pub mod collect;
pub mod render;
pub mod report;

use crate::cli::Commands;
use crate::error::Result;
use crate::pipeline::RunStats;
use crate::utils::output;

use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

/// 执行命令，`generated_at` 为报告生成时间
pub fn run(cmd: Commands, generated_at: NaiveDateTime) -> Result<()> {
    match cmd {
        Commands::Report(args) => report::execute(args, generated_at),
        Commands::Render(args) => render::execute(args, generated_at),
        Commands::Collect(args) => collect::execute(args),
    }
}

/// 行程名：目录名（相对路径先规范化）
pub(crate) fn trip_name(dir: &Path) -> String {
    dir.canonicalize()
        .ok()
        .as_deref()
        .unwrap_or(dir)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "Trip".to_string())
}

/// 默认报告标题
pub(crate) fn default_title(name: &str) -> String {
    format!("{} Trip Report", name)
}

/// 默认报告目录（当前目录下）
pub(crate) fn default_report_dir(name: &str) -> PathBuf {
    PathBuf::from(format!("{}_Trip_Report", name))
}

/// 打印运行统计
pub(crate) fn print_run_stats(stats: &RunStats, csv_requested: bool, csv_loaded: bool) {
    output::print_info("Collection summary:");
    output::print_count("Pucks", stats.pucks);
    output::print_count("Collections", stats.collections);
    output::print_count("With processing results", stats.with_processing);
    output::print_count("Screened", stats.screened);
    if stats.parse_failures > 0 {
        output::print_warning(&format!(
            "{} file(s) could not be parsed; affected fields are left empty",
            stats.parse_failures
        ));
        if let Some(reason) = &stats.first_failure {
            output::print_info(&format!("First failure: {}", reason));
        }
    }
    if csv_loaded {
        output::print_count("CSV rows", stats.csv_rows);
        output::print_count("CSV rows matched", stats.csv_matched);
        output::print_count("CSV rows unmatched", stats.csv_unmatched);
    } else if csv_requested {
        output::print_warning("CSV project sheet not loaded; Project columns omitted");
    }
}
