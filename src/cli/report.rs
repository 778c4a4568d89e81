//! # report 子命令 CLI 定义
//!
//! 收集数据、导出 JSON、放置文件并生成 HTML 报告
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/report.rs`

use super::{FileMethodArg, LayoutArg};
use clap::Args;
use std::path::PathBuf;

/// report 子命令参数
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Root data directory of the trip
    pub base_directory: PathBuf,

    /// CSV project sheet (Puck, Collection, Project, Staff_Comments)
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Report directory, used as-is (--report-name only affects the default) [default: ./<name>_Trip_Report]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report name, used for the default output directory and title
    #[arg(long)]
    pub report_name: Option<String>,

    /// How to place images and result pages into the report
    #[arg(long, value_enum, default_value = "copy")]
    pub file_method: FileMethodArg,

    /// Data directory layout
    #[arg(long, value_enum, default_value = "flat")]
    pub layout: LayoutArg,

    /// Number of parallel jobs (0 = all CPUs)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,
}
