//! # report 命令实现
//!
//! 完整流程：收集数据 → 导出 `data.json` → 放置文件 → 生成 HTML。
//!
//! ## 依赖关系
//! - 使用 `cli/report.rs` 定义的参数
//! - 使用 `pipeline/`, `report/`
//! - 使用 `utils/output.rs`

use super::{default_report_dir, default_title, print_run_stats, trip_name};
use crate::cli::report::ReportArgs;
use crate::error::Result;
use crate::pipeline::{self, render_context, CollectOptions};
use crate::report::{self, ReportOptions};
use crate::utils::output;

use chrono::NaiveDateTime;

/// 执行 report 命令
pub fn execute(args: ReportArgs, generated_at: NaiveDateTime) -> Result<()> {
    output::print_header("Generating Trip Report");

    let name = args
        .report_name
        .clone()
        .unwrap_or_else(|| trip_name(&args.base_directory));
    let csv_requested = args.csv.is_some();

    output::print_info(&format!(
        "Scanning '{}' ({} layout)...",
        args.base_directory.display(),
        crate::batch::Layout::from(args.layout)
    ));

    let options = CollectOptions {
        layout: args.layout.into(),
        jobs: args.jobs,
        csv: args.csv,
        show_progress: true,
    };
    let outcome = pipeline::collect(&args.base_directory, &options)?;
    print_run_stats(&outcome.stats, csv_requested, outcome.model.csv_loaded);

    let ctx = render_context(&outcome.model, default_title(&name), generated_at);
    let report_options = ReportOptions {
        output_dir: args.output.unwrap_or_else(|| default_report_dir(&name)),
        file_method: args.file_method.into(),
    };
    let summary = report::generate(&outcome.model, &ctx, &report_options)?;

    if summary.placement_failures > 0 {
        output::print_warning(&format!(
            "{} file(s) could not be placed; their links are omitted",
            summary.placement_failures
        ));
    }
    output::print_done(&format!(
        "'{}' written to '{}' ({} pages, {} files)",
        ctx.report_title,
        report_options.output_dir.display(),
        summary.pages,
        summary.placed_files
    ));

    Ok(())
}
