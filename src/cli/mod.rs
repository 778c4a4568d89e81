//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `report`: 收集数据并生成完整 HTML 报告
//! - `render`: 从导出的 `data.json` 重新生成报告
//! - `collect`: 仅收集数据并导出 JSON
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: collect, render, report

pub mod collect;
pub mod render;
pub mod report;

use crate::batch::Layout;
use crate::report::FileMethod;
use clap::{Parser, Subcommand, ValueEnum};

/// trip-report - 同步辐射晶体学数据采集报告生成工具
#[derive(Parser)]
#[command(name = "trip-report")]
#[command(version)]
#[command(about = "Collect beamline trip data and generate an HTML trip report", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true, default_value_t = false)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Collect data and generate the full HTML trip report
    Report(report::ReportArgs),

    /// Re-render a report from a previously exported data.json
    Render(render::RenderArgs),

    /// Collect data and export it as JSON only
    Collect(collect::CollectArgs),
}

/// 目录布局
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum LayoutArg {
    /// <root>/<puck>/<collection>
    Flat,
    /// <root>/<site>/<puck>/<position>/<collection>
    Site,
}

impl From<LayoutArg> for Layout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Flat => Layout::Flat,
            LayoutArg::Site => Layout::Site,
        }
    }
}

/// 报告文件放置方式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum FileMethodArg {
    /// Copy files into the report directory
    Copy,
    /// Symlink files into the report directory
    Symlink,
}

impl From<FileMethodArg> for FileMethod {
    fn from(arg: FileMethodArg) -> Self {
        match arg {
            FileMethodArg::Copy => FileMethod::Copy,
            FileMethodArg::Symlink => FileMethod::Symlink,
        }
    }
}
