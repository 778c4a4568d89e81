//! # collect 子命令 CLI 定义
//!
//! 仅收集数据并导出 JSON
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/collect.rs`

use super::LayoutArg;
use clap::Args;
use std::path::PathBuf;

/// collect 子命令参数
#[derive(Args, Debug)]
pub struct CollectArgs {
    /// Root data directory of the trip
    pub base_directory: PathBuf,

    /// CSV project sheet (Puck, Collection, Project, Staff_Comments)
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Data directory layout
    #[arg(long, value_enum, default_value = "flat")]
    pub layout: LayoutArg,

    /// Number of parallel jobs (0 = all CPUs)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Output JSON file [default: stdout]
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
