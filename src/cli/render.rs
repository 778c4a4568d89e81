//! # render 子命令 CLI 定义
//!
//! 从导出的 `data.json` 重新生成报告
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/render.rs`

use super::FileMethodArg;
use clap::Args;
use std::path::PathBuf;

/// render 子命令参数
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Previously exported data.json
    pub json_file: PathBuf,

    /// Report directory, used as-is (--report-name only affects the default) [default: ./<name>_Trip_Report]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report name [default: JSON file's parent directory name]
    #[arg(long)]
    pub report_name: Option<String>,

    /// Report title [default: "<name> Trip Report"]
    #[arg(long)]
    pub title: Option<String>,

    /// How to place images and result pages into the report
    #[arg(long, value_enum, default_value = "copy")]
    pub file_method: FileMethodArg,
}
