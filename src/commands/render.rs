//! # render 命令实现
//!
//! 从导出的 `data.json` 重新生成报告，不重新扫描数据目录。
//! 源文件路径取自 JSON 中记录的 `files`。
//!
//! ## 依赖关系
//! - 使用 `cli/render.rs` 定义的参数
//! - 使用 `report/`
//! - 使用 `utils/output.rs`

use super::{default_report_dir, default_title, trip_name};
use crate::cli::render::RenderArgs;
use crate::error::Result;
use crate::pipeline::render_context;
use crate::report::{self, export, ReportOptions};
use crate::utils::output;

use chrono::NaiveDateTime;
use std::path::Path;

/// 执行 render 命令
pub fn execute(args: RenderArgs, generated_at: NaiveDateTime) -> Result<()> {
    output::print_header("Rendering Trip Report");

    let model = export::read_json(&args.json_file)?;
    output::print_info(&format!(
        "Loaded {} pucks, {} collections from '{}'",
        model.pucks.len(),
        model.num_collections(),
        args.json_file.display()
    ));

    let name = args.report_name.clone().unwrap_or_else(|| {
        let parent = args.json_file.parent().unwrap_or(Path::new("."));
        let parent = if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        };
        trip_name(parent)
    });
    let title = args.title.clone().unwrap_or_else(|| default_title(&name));

    let ctx = render_context(&model, title, generated_at);
    let options = ReportOptions {
        output_dir: args.output.unwrap_or_else(|| default_report_dir(&name)),
        file_method: args.file_method.into(),
    };
    let summary = report::generate(&model, &ctx, &options)?;

    if summary.placement_failures > 0 {
        output::print_warning(&format!(
            "{} file(s) could not be placed; their links are omitted",
            summary.placement_failures
        ));
    }
    output::print_done(&format!(
        "'{}' written to '{}' ({} pages)",
        ctx.report_title,
        options.output_dir.display(),
        summary.pages
    ));

    Ok(())
}
